//! Fichiers projet
//!
//! Un projet regroupe tout ce qu'il faut pour recalculer un levé : point
//! de départ, points de contrôle supplémentaires, azimut de départ tel
//! que saisi, carnet de terrain par stationnement et type de cheminement.
//! Persisté en JSON.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cheminement::{Point, TraverseType};

use crate::fieldbook::StationSetup;

/// Projet sauvegardé
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Nom du projet
    pub name: String,

    /// Dossier logique de rangement
    #[serde(default)]
    pub folder: String,

    /// Horodatage de dernière sauvegarde (millisecondes Unix)
    #[serde(default)]
    pub last_modified: Option<u64>,

    /// Données du levé
    pub data: ProjectData,
}

/// Données du levé
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    /// Point de départ (contrôle figé)
    pub start_point: Point,

    /// Points de contrôle supplémentaires (fermeture, références)
    #[serde(default)]
    pub extra_control_points: Vec<Point>,

    /// Azimut de départ tel que saisi (texte, lu par `parse_angle`)
    pub start_azimuth: String,

    /// Carnet de terrain, un bloc par stationnement
    pub setups: Vec<StationSetup>,

    /// Type de cheminement (fermé par défaut)
    #[serde(default = "default_traverse_type")]
    pub traverse_type: TraverseType,

    /// Point de contrôle de fermeture distinct (cheminement encadré) ;
    /// doit référencer un point de `extra_control_points`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_point_id: Option<String>,
}

fn default_traverse_type() -> TraverseType {
    TraverseType::ClosedLoop
}

impl Project {
    /// Charge un projet depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read project file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse project JSON")
    }

    /// Sauvegarde le projet (horodatage mis à jour)
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.last_modified = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_millis() as u64);

        let json = serde_json::to_string_pretty(self).context("Failed to serialize project")?;
        std::fs::write(path, json)
            .context(format!("Failed to write project file: {}", path.display()))?;
        Ok(())
    }

    /// Retrouve le point de fermeture désigné par `closing_point_id`
    pub fn closing_point(&self) -> Option<&Point> {
        let id = self.data.closing_point_id.as_deref()?;
        self.data
            .extra_control_points
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(id))
    }

    /// Fusionne des points de contrôle (remplacement par identifiant)
    pub fn merge_control_points(&mut self, points: Vec<Point>) {
        for point in points {
            match self
                .data
                .extra_control_points
                .iter_mut()
                .find(|p| p.id == point.id)
            {
                Some(existing) => *existing = point,
                None => self.data.extra_control_points.push(point),
            }
        }
    }
}
