//! Types de données pour le crate cheminement

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Précision rapportée quand la fermeture est exactement nulle
/// (jamais de division par zéro)
pub const PRECISION_SENTINEL: f64 = 999_999.0;

/// Un point du levé (station, point de détail ou point de contrôle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Identifiant unique dans le calcul (ex: "STN1", "TREE1")
    pub id: String,

    /// Coordonnée Est (mètres)
    pub easting: f64,

    /// Coordonnée Nord (mètres)
    pub northing: f64,

    /// Altitude optionnelle (ignorée par la réduction planaire)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,

    /// Point de contrôle / datum
    #[serde(default)]
    pub is_control: bool,

    /// Coordonnées figées : ne bougent pas sous compensation
    #[serde(default)]
    pub fixed: bool,

    /// Description terrain optionnelle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Point {
    /// Crée un point dérivé (non contrôle, non figé)
    pub fn new(id: impl Into<String>, easting: f64, northing: f64) -> Self {
        Self {
            id: id.into(),
            easting,
            northing,
            elevation: None,
            is_control: false,
            fixed: false,
            description: None,
        }
    }

    /// Crée un point de contrôle figé
    pub fn control(id: impl Into<String>, easting: f64, northing: f64) -> Self {
        Self {
            id: id.into(),
            easting,
            northing,
            elevation: None,
            is_control: true,
            fixed: true,
            description: None,
        }
    }
}

/// Une observation de terrain dirigée (angle + distance)
///
/// `horizontal_angle` est en degrés décimaux et doit déjà être un azimut
/// absolu au moment où le moteur est invoqué. La dérivation depuis un
/// angle tourné se fait en amont, voir [`crate::engine::orientation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Identifiant de l'observation
    pub id: String,

    /// Station occupée
    pub from_point_id: String,

    /// Point visé
    pub to_point_id: String,

    /// Angle horizontal en degrés décimaux
    pub horizontal_angle: f64,

    /// Distance horizontale en mètres (≥ 0)
    pub horizontal_distance: f64,

    /// Membre de la polygonale principale (sinon: rayonnement)
    #[serde(default)]
    pub is_traverse_leg: bool,
}

/// Classification du cheminement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraverseType {
    /// Polygonale fermée sur son point de départ (ou un point de contrôle)
    #[serde(rename = "CLOSED_LOOP")]
    ClosedLoop,

    /// Cheminement ouvert : le point final brut est accepté tel quel
    #[serde(rename = "OPEN")]
    Open,
}

/// Un côté calculé du cheminement (sortie du moteur, une par observation)
///
/// Même forme pour les côtés de la polygonale et les rayonnements ; pour
/// un rayonnement les champs ajustés valent les champs bruts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraverseLeg {
    /// Point de départ (instantané des coordonnées au calcul)
    pub from: Point,

    /// Point d'arrivée (coordonnées brutes du calcul avant compensation)
    pub to: Point,

    /// Observation source
    pub obs: Observation,

    /// Azimut calculé en degrés [0,360)
    pub calc_azimuth: f64,

    /// Latitude brute (dN)
    pub calc_lat: f64,

    /// Départ brut (dE)
    pub calc_dep: f64,

    /// Latitude compensée (dN + correction Bowditch, nulle en rayonnement)
    pub adj_lat: f64,

    /// Départ compensé (dE + correction Bowditch)
    pub adj_dep: f64,

    /// Est compensé du point d'arrivée
    pub adj_easting: f64,

    /// Nord compensé du point d'arrivée
    pub adj_northing: f64,

    /// Observation de rayonnement (hors polygonale, jamais compensée)
    pub is_side_shot: bool,
}

/// Diagnostic non fatal émis pendant la réduction
///
/// Le contrat numérique n'est pas modifié : l'observation en cause est
/// ignorée, le diagnostic est seulement collecté.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReductionWarning {
    /// Rayonnement depuis une station inconnue de la polygonale
    UnresolvedSideShot {
        /// Identifiant de l'observation ignorée
        obs_id: String,
        /// Station introuvable
        station_id: String,
    },
}

/// Résultat complet d'une réduction de cheminement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraverseResult {
    /// Côtés compensés de la polygonale (dans l'ordre du cheminement),
    /// suivis des rayonnements (dans l'ordre d'entrée)
    pub legs: Vec<TraverseLeg>,

    /// Distance de fermeture (mètres, 0 pour un cheminement ouvert)
    pub misclosure_dist: f64,

    /// Azimut du vecteur de fermeture en degrés [0,360)
    pub misclosure_azimuth: f64,

    /// Précision relative `1:N` (longueur totale / fermeture ;
    /// [`PRECISION_SENTINEL`] si la fermeture est exactement nulle)
    pub precision: f64,

    /// Longueur totale de la polygonale (mètres)
    pub total_length: f64,

    /// Composante Est de la fermeture (cible − calculé)
    pub delta_e: f64,

    /// Composante Nord de la fermeture
    pub delta_n: f64,

    /// Carte identifiant → point final (stations compensées, points
    /// rayonnés, points de contrôle inchangés)
    pub adjusted_points: HashMap<String, Point>,

    /// Type de cheminement utilisé
    pub traverse_type: TraverseType,

    /// Diagnostics non fatals (rayonnements ignorés, etc.)
    pub warnings: Vec<ReductionWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_constructors() {
        let p = Point::new("STN2", 100.0, 200.0);
        assert!(!p.is_control);
        assert!(!p.fixed);

        let c = Point::control("STN1", 500_000.0, 2_000_000.0);
        assert!(c.is_control);
        assert!(c.fixed);
    }

    #[test]
    fn test_traverse_type_serde() {
        let json = serde_json::to_string(&TraverseType::ClosedLoop).unwrap();
        assert_eq!(json, "\"CLOSED_LOOP\"");

        let t: TraverseType = serde_json::from_str("\"OPEN\"").unwrap();
        assert_eq!(t, TraverseType::Open);
    }

    #[test]
    fn test_point_serde_defaults() {
        // Un point minimal se désérialise avec les drapeaux à faux
        let p: Point =
            serde_json::from_str(r#"{"id":"A","easting":10.0,"northing":20.0}"#).unwrap();
        assert_eq!(p.id, "A");
        assert!(!p.is_control);
        assert!(p.elevation.is_none());
    }
}
