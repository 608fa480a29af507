//! Pré-résolution des angles en azimuts
//!
//! Le moteur de réduction exige des azimuts absolus : il n'ajoute jamais
//! d'orientation de station à l'angle stocké. Quand le carnet contient
//! des angles tournés (mesurés depuis la visée arrière), la conversion se
//! fait ici, en une passe séparée, jamais mélangée au calcul de
//! cheminement.

use std::collections::HashMap;

use crate::geometry::normalize_azimuth;
use crate::types::Observation;

/// Interprétation des angles du carnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AzimuthMode {
    /// L'angle stocké est déjà un azimut absolu (comportement par défaut)
    #[default]
    Direct,

    /// L'angle est tourné horaire depuis la visée arrière ; l'azimut est
    /// propagé de proche en proche à partir de l'azimut de départ
    TurnedAngle,
}

/// Résout les angles d'un carnet en azimuts absolus selon le mode choisi
///
/// En mode [`AzimuthMode::TurnedAngle`] :
/// - premier côté de la polygonale : `azimut = start_azimuth + angle` ;
/// - côtés suivants : `azimut = azimut précédent + 180° + angle`
///   (retournement sur la visée arrière, puis angle horaire) ;
/// - rayonnements : orientation de la station occupée (azimut de départ à
///   la station initiale, azimut inverse du côté entrant ailleurs). Un
///   rayonnement depuis une station absente de la polygonale garde son
///   angle tel quel — le moteur l'ignorera et émettra un diagnostic.
///
/// Les angles résolus sont toujours normalisés dans [0,360). Les
/// observations d'entrée ne sont pas modifiées.
pub fn resolve_azimuths(
    mode: AzimuthMode,
    start_azimuth: f64,
    observations: &[Observation],
) -> Vec<Observation> {
    match mode {
        AzimuthMode::Direct => observations
            .iter()
            .map(|obs| Observation {
                horizontal_angle: normalize_azimuth(obs.horizontal_angle),
                ..obs.clone()
            })
            .collect(),
        AzimuthMode::TurnedAngle => resolve_turned(start_azimuth, observations),
    }
}

fn resolve_turned(start_azimuth: f64, observations: &[Observation]) -> Vec<Observation> {
    // Même règle de partition que le moteur : si rien n'est marqué,
    // tout le carnet est la polygonale
    let has_explicit_legs = observations.iter().any(|o| o.is_traverse_leg);
    let is_chain = |o: &Observation| !has_explicit_legs || o.is_traverse_leg;

    // Passe 1 : azimuts de la polygonale + orientation de chaque station
    let mut chain_azimuths: HashMap<String, f64> = HashMap::new();
    let mut station_orientation: HashMap<String, f64> = HashMap::new();
    let mut previous_azimuth: Option<f64> = None;

    for obs in observations.iter().filter(|o| is_chain(o)) {
        let orientation = match previous_azimuth {
            None => {
                station_orientation
                    .entry(obs.from_point_id.clone())
                    .or_insert(start_azimuth);
                start_azimuth
            }
            Some(prev) => normalize_azimuth(prev + 180.0),
        };

        let azimuth = normalize_azimuth(orientation + obs.horizontal_angle);
        chain_azimuths.insert(obs.id.clone(), azimuth);
        // Première occupation gagnante : sur une boucle fermée, le côté de
        // fermeture ne réoriente pas la station de départ
        station_orientation
            .entry(obs.to_point_id.clone())
            .or_insert_with(|| normalize_azimuth(azimuth + 180.0));
        previous_azimuth = Some(azimuth);
    }

    // Passe 2 : réécriture du carnet dans l'ordre d'entrée
    observations
        .iter()
        .map(|obs| {
            let angle = if is_chain(obs) {
                chain_azimuths[&obs.id]
            } else {
                match station_orientation.get(&obs.from_point_id) {
                    Some(orientation) => normalize_azimuth(orientation + obs.horizontal_angle),
                    None => obs.horizontal_angle,
                }
            };
            Observation {
                horizontal_angle: angle,
                ..obs.clone()
            }
        })
        .collect()
}
