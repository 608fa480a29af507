//! Carnet de terrain
//!
//! Le carnet est saisi par stationnement : une station occupée et ses
//! visées, angle et distance en texte libre. L'aplatissement produit les
//! observations numériques du moteur ; les lignes illisibles sont
//! exclues du calcul (jamais comptées comme zéro) et rapportées.

use serde::{Deserialize, Serialize};
use tracing::warn;

use cheminement::{parse_angle, CheminementError, Observation};

/// Une visée brute du carnet, telle que saisie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupObservation {
    /// Identifiant de la ligne
    pub id: String,

    /// Point visé
    pub target_id: String,

    /// Angle saisi (DMS ou décimal)
    pub angle_str: String,

    /// Distance saisie (mètres)
    pub dist_str: String,

    /// Côté de la polygonale (sinon rayonnement)
    #[serde(default)]
    pub is_traverse_leg: bool,
}

/// Un stationnement : la station occupée et ses visées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSetup {
    /// Identifiant du bloc
    pub id: String,

    /// Station occupée
    pub station_id: String,

    /// Visées depuis cette station
    pub observations: Vec<SetupObservation>,
}

/// Ligne du carnet exclue du calcul, avec sa raison
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    /// Stationnement d'origine
    pub setup_id: String,

    /// Ligne en cause
    pub obs_id: String,

    /// Raison de l'exclusion
    pub reason: String,
}

/// Aplatit le carnet en observations numériques pour le moteur
///
/// Les lignes sans station ou sans point visé sont ignorées sans bruit
/// (lignes vides de saisie). Les lignes dont l'angle ou la distance ne se
/// lit pas, ou dont la distance est négative, sont exclues et rapportées.
pub fn flatten_setups(setups: &[StationSetup]) -> (Vec<Observation>, Vec<SkippedRow>) {
    let mut observations = Vec::new();
    let mut skipped = Vec::new();

    for setup in setups {
        if setup.station_id.trim().is_empty() {
            continue;
        }

        for obs in &setup.observations {
            if obs.target_id.trim().is_empty() {
                continue;
            }

            let mut skip = |reason: String| {
                warn!(
                    setup = %setup.id,
                    obs = %obs.id,
                    reason = %reason,
                    "ligne de carnet exclue du calcul"
                );
                skipped.push(SkippedRow {
                    setup_id: setup.id.clone(),
                    obs_id: obs.id.clone(),
                    reason,
                });
            };

            let angle = match parse_angle(&obs.angle_str) {
                Ok(a) => a,
                Err(e) => {
                    skip(CheminementError::from(e).to_string());
                    continue;
                }
            };

            let distance = match obs.dist_str.trim().parse::<f64>() {
                Ok(d) if d.is_finite() && d >= 0.0 => d,
                _ => {
                    skip(CheminementError::invalid_distance(&obs.dist_str).to_string());
                    continue;
                }
            };

            observations.push(Observation {
                id: obs.id.clone(),
                from_point_id: setup.station_id.clone(),
                to_point_id: obs.target_id.clone(),
                horizontal_angle: angle,
                horizontal_distance: distance,
                is_traverse_leg: obs.is_traverse_leg,
            });
        }
    }

    (observations, skipped)
}
