//! Moteur de réduction de cheminement
//!
//! Fonction pure : aucune entrée mutée, aucune E/S, structures de sortie
//! fraîches à chaque appel. Précondition documentée : les angles des
//! observations sont déjà des azimuts absolus (voir [`orientation`] pour
//! la conversion depuis des angles tournés).
//!
//! Déroulement pour [`reduce_traverse`] :
//!
//! 1. partition polygonale / rayonnements (tout le carnet est la
//!    polygonale si rien n'est marqué) ;
//! 2. calcul direct non compensé le long de la polygonale ;
//! 3. fermeture (polygonale fermée uniquement) ;
//! 4. compensation Bowditch, proportionnelle à la part de distance de
//!    chaque côté, curseur réamorcé sur le point de départ figé ;
//! 5. rayonnements depuis les stations compensées ;
//! 6. assemblage du résultat.

pub mod orientation;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::geometry::{inverse_azimuth, normalize_azimuth, plane_distance};
use crate::types::{
    Observation, Point, ReductionWarning, TraverseLeg, TraverseResult, TraverseType,
    PRECISION_SENTINEL,
};

/// Composantes Est/Nord d'un côté de longueur `distance` porté par `azimuth`
fn components(azimuth: f64, distance: f64) -> (f64, f64) {
    let rad = azimuth.to_radians();
    (distance * rad.sin(), distance * rad.cos())
}

/// Réduit un cheminement polygonal avec rayonnements éventuels
///
/// Seules les observations marquées `is_traverse_leg` entrent dans la
/// fermeture et la compensation (toutes, si aucune n'est marquée). Les
/// rayonnements sont calculés depuis les coordonnées *compensées* des
/// stations.
///
/// `end_point` désigne un point de fermeture distinct (cheminement fermé
/// sur deux points de contrôle) ; `None` ferme sur `start_point`.
/// `start_azimuth_deg` n'intervient pas dans le calcul : il documente
/// l'orientation du carnet, résolue en amont.
pub fn reduce_traverse(
    start_point: &Point,
    start_azimuth_deg: f64,
    observations: &[Observation],
    traverse_type: TraverseType,
    end_point: Option<&Point>,
) -> TraverseResult {
    debug!(
        start = %start_point.id,
        start_azimuth = start_azimuth_deg,
        observations = observations.len(),
        traverse_type = ?traverse_type,
        "reduction du cheminement"
    );

    // 1. Partition polygonale / rayonnements
    let has_explicit_legs = observations.iter().any(|o| o.is_traverse_leg);
    let chain_obs: Vec<&Observation> = if has_explicit_legs {
        observations.iter().filter(|o| o.is_traverse_leg).collect()
    } else {
        observations.iter().collect()
    };

    let target_point = end_point.unwrap_or(start_point);

    // 2. Calcul direct (non compensé)
    let mut current_e = start_point.easting;
    let mut current_n = start_point.northing;
    let mut total_length = 0.0;

    let mut chain_legs: Vec<TraverseLeg> = Vec::with_capacity(chain_obs.len());
    let mut adjusted_points: HashMap<String, Point> = HashMap::new();
    adjusted_points.insert(start_point.id.clone(), start_point.clone());

    for obs in &chain_obs {
        let leg_azimuth = normalize_azimuth(obs.horizontal_angle);
        let (d_e, d_n) = components(leg_azimuth, obs.horizontal_distance);

        let leg_start = Point::new(obs.from_point_id.clone(), current_e, current_n);

        current_e += d_e;
        current_n += d_n;
        total_length += obs.horizontal_distance;

        let leg_end = Point::new(obs.to_point_id.clone(), current_e, current_n);

        chain_legs.push(TraverseLeg {
            from: leg_start,
            to: leg_end,
            obs: (*obs).clone(),
            calc_azimuth: leg_azimuth,
            calc_lat: d_n,
            calc_dep: d_e,
            adj_lat: 0.0,
            adj_dep: 0.0,
            adj_easting: 0.0,
            adj_northing: 0.0,
            is_side_shot: false,
        });
    }

    // 3. Fermeture — uniquement en polygonale fermée ; un cheminement
    // ouvert accepte le point final brut
    let mut delta_e = 0.0;
    let mut delta_n = 0.0;
    let mut misclosure_dist = 0.0;
    let mut misclosure_azimuth = 0.0;
    let mut precision = 0.0;

    if traverse_type == TraverseType::ClosedLoop {
        delta_e = target_point.easting - current_e;
        delta_n = target_point.northing - current_n;
        misclosure_dist = plane_distance(current_e, current_n, target_point.easting, target_point.northing);
        misclosure_azimuth = if misclosure_dist > 0.0 {
            normalize_azimuth(inverse_azimuth(
                current_e,
                current_n,
                target_point.easting,
                target_point.northing,
            ))
        } else {
            0.0
        };
        precision = if misclosure_dist > 0.0 {
            total_length / misclosure_dist
        } else {
            PRECISION_SENTINEL
        };
    }

    // 4. Compensation Bowditch. Le curseur compensé repart des
    // coordonnées figées du point de départ : la polygonale compensée
    // commence (et, fermée, se termine) exactement sur le contrôle
    let distribute = traverse_type == TraverseType::ClosedLoop && total_length > 0.0;
    let mut adj_e = start_point.easting;
    let mut adj_n = start_point.northing;

    for leg in &mut chain_legs {
        let (corr_e, corr_n) = if distribute {
            let share = leg.obs.horizontal_distance / total_length;
            (delta_e * share, delta_n * share)
        } else {
            (0.0, 0.0)
        };

        leg.adj_lat = leg.calc_lat + corr_n;
        leg.adj_dep = leg.calc_dep + corr_e;

        adj_e += leg.adj_dep;
        adj_n += leg.adj_lat;
        leg.adj_easting = adj_e;
        leg.adj_northing = adj_n;

        adjusted_points.insert(
            leg.to.id.clone(),
            Point::new(leg.to.id.clone(), adj_e, adj_n),
        );
    }

    // 5. Rayonnements depuis les stations compensées. La carte des
    // points est complète à ce stade : un rayonnement vers l'avant de la
    // polygonale se résout aussi
    let side_obs: Vec<&Observation> = if has_explicit_legs {
        observations.iter().filter(|o| !o.is_traverse_leg).collect()
    } else {
        Vec::new()
    };

    let mut side_legs: Vec<TraverseLeg> = Vec::with_capacity(side_obs.len());
    let mut warnings: Vec<ReductionWarning> = Vec::new();

    for obs in side_obs {
        let Some(station) = adjusted_points.get(&obs.from_point_id).cloned() else {
            warn!(
                obs = %obs.id,
                station = %obs.from_point_id,
                "rayonnement depuis une station inconnue, observation ignoree"
            );
            warnings.push(ReductionWarning::UnresolvedSideShot {
                obs_id: obs.id.clone(),
                station_id: obs.from_point_id.clone(),
            });
            continue;
        };

        side_legs.push(radiate_leg(&station, obs, &mut adjusted_points));
    }

    // 6. Assemblage : côtés compensés puis rayonnements
    let mut legs = chain_legs;
    legs.append(&mut side_legs);

    TraverseResult {
        legs,
        misclosure_dist,
        misclosure_azimuth,
        precision,
        total_length,
        delta_e,
        delta_n,
        adjusted_points,
        traverse_type,
        warnings,
    }
}

/// Réduit un levé par rayonnement pur depuis une station fixe
///
/// Cas dégénéré du même calcul : aucune fermeture, aucune compensation ;
/// chaque observation devient un côté non compensé depuis la station.
pub fn reduce_radiation(station_point: &Point, observations: &[Observation]) -> TraverseResult {
    debug!(
        station = %station_point.id,
        observations = observations.len(),
        "reduction par rayonnement"
    );

    let mut adjusted_points: HashMap<String, Point> = HashMap::new();
    adjusted_points.insert(station_point.id.clone(), station_point.clone());

    let legs: Vec<TraverseLeg> = observations
        .iter()
        .map(|obs| radiate_leg(station_point, obs, &mut adjusted_points))
        .collect();

    TraverseResult {
        legs,
        misclosure_dist: 0.0,
        misclosure_azimuth: 0.0,
        precision: 0.0,
        total_length: observations.iter().map(|o| o.horizontal_distance).sum(),
        delta_e: 0.0,
        delta_n: 0.0,
        adjusted_points,
        traverse_type: TraverseType::Open,
        warnings: Vec::new(),
    }
}

/// Calcule un rayonnement depuis `station` et insère le point visé dans
/// la carte. "Compensé" vaut "brut" : un rayonnement n'est jamais corrigé
fn radiate_leg(
    station: &Point,
    obs: &Observation,
    adjusted_points: &mut HashMap<String, Point>,
) -> TraverseLeg {
    let azimuth = normalize_azimuth(obs.horizontal_angle);
    let (d_e, d_n) = components(azimuth, obs.horizontal_distance);

    let target_e = station.easting + d_e;
    let target_n = station.northing + d_n;
    let target = Point::new(obs.to_point_id.clone(), target_e, target_n);

    adjusted_points.insert(target.id.clone(), target.clone());

    TraverseLeg {
        from: station.clone(),
        to: target,
        obs: obs.clone(),
        calc_azimuth: azimuth,
        calc_lat: d_n,
        calc_dep: d_e,
        adj_lat: d_n,
        adj_dep: d_e,
        adj_easting: target_e,
        adj_northing: target_n,
        is_side_shot: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leg_obs(id: &str, from: &str, to: &str, azimuth: f64, dist: f64) -> Observation {
        Observation {
            id: id.to_string(),
            from_point_id: from.to_string(),
            to_point_id: to.to_string(),
            horizontal_angle: azimuth,
            horizontal_distance: dist,
            is_traverse_leg: true,
        }
    }

    fn side_obs(id: &str, from: &str, to: &str, azimuth: f64, dist: f64) -> Observation {
        Observation {
            is_traverse_leg: false,
            ..leg_obs(id, from, to, azimuth, dist)
        }
    }

    /// Carré parfait de 100 m : fermeture exactement nulle
    fn square_obs() -> Vec<Observation> {
        vec![
            leg_obs("1", "A", "B", 0.0, 100.0),
            leg_obs("2", "B", "C", 90.0, 100.0),
            leg_obs("3", "C", "D", 180.0, 100.0),
            leg_obs("4", "D", "A", 270.0, 100.0),
        ]
    }

    #[test]
    fn test_perfect_square_closes_exactly() {
        let start = Point::control("A", 1000.0, 1000.0);
        let result =
            reduce_traverse(&start, 0.0, &square_obs(), TraverseType::ClosedLoop, None);

        assert_eq!(result.misclosure_dist, 0.0);
        assert_eq!(result.precision, PRECISION_SENTINEL);
        assert_relative_eq!(result.total_length, 400.0);

        // Corrections toutes nulles : compensé == brut
        for leg in &result.legs {
            assert_relative_eq!(leg.adj_lat, leg.calc_lat);
            assert_relative_eq!(leg.adj_dep, leg.calc_dep);
        }
    }

    #[test]
    fn test_unmarked_observations_are_all_chain() {
        // Rien n'est marqué : tout le carnet est la polygonale, aucun
        // rayonnement
        let obs: Vec<Observation> = square_obs()
            .into_iter()
            .map(|o| Observation {
                is_traverse_leg: false,
                ..o
            })
            .collect();
        let start = Point::control("A", 0.0, 0.0);
        let result = reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, None);

        assert_eq!(result.legs.len(), 4);
        assert!(result.legs.iter().all(|l| !l.is_side_shot));
    }

    #[test]
    fn test_open_traverse_has_zero_misclosure() {
        let start = Point::control("A", 0.0, 0.0);
        let obs = vec![
            leg_obs("1", "A", "B", 45.0, 100.0),
            leg_obs("2", "B", "C", 135.0, 80.0),
        ];
        let result = reduce_traverse(&start, 0.0, &obs, TraverseType::Open, None);

        assert_eq!(result.misclosure_dist, 0.0);
        assert_eq!(result.misclosure_azimuth, 0.0);
        assert_eq!(result.delta_e, 0.0);
        assert_eq!(result.delta_n, 0.0);

        // Compensé == brut sur un cheminement ouvert
        for leg in &result.legs {
            assert_relative_eq!(leg.adj_easting, leg.to.easting);
            assert_relative_eq!(leg.adj_northing, leg.to.northing);
        }
    }

    #[test]
    fn test_adjusted_loop_closes_on_start() {
        // Fermeture volontairement grossière : le dernier côté est trop
        // court de 2 m
        let start = Point::control("A", 500.0, 500.0);
        let obs = vec![
            leg_obs("1", "A", "B", 0.0, 100.0),
            leg_obs("2", "B", "C", 90.0, 100.0),
            leg_obs("3", "C", "D", 180.0, 100.0),
            leg_obs("4", "D", "A", 270.0, 98.0),
        ];
        let result = reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, None);

        assert!(result.misclosure_dist > 1.9 && result.misclosure_dist < 2.1);

        // Post-compensation la polygonale retombe exactement sur le départ
        let last = &result.legs[3];
        assert_relative_eq!(last.adj_easting, 500.0, epsilon = 1e-9);
        assert_relative_eq!(last.adj_northing, 500.0, epsilon = 1e-9);

        // Somme des départs compensés = déplacement exact
        let sum_dep: f64 = result.legs.iter().map(|l| l.adj_dep).sum();
        let sum_lat: f64 = result.legs.iter().map(|l| l.adj_lat).sum();
        assert_relative_eq!(start.easting + sum_dep, start.easting, epsilon = 1e-9);
        assert_relative_eq!(start.northing + sum_lat, start.northing, epsilon = 1e-9);
    }

    #[test]
    fn test_closed_link_onto_distinct_end_point() {
        // Fermeture sur un second point de contrôle (cheminement encadré)
        let start = Point::control("A", 0.0, 0.0);
        let end = Point::control("Z", 200.0, 0.5);
        let obs = vec![
            leg_obs("1", "A", "B", 90.0, 100.0),
            leg_obs("2", "B", "Z", 90.0, 100.0),
        ];
        let result =
            reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, Some(&end));

        assert_relative_eq!(result.delta_n, 0.5, epsilon = 1e-9);
        let last = result.legs.last().unwrap();
        assert_relative_eq!(last.adj_easting, 200.0, epsilon = 1e-9);
        assert_relative_eq!(last.adj_northing, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_side_shots_radiate_from_adjusted_stations() {
        let start = Point::control("A", 500.0, 500.0);
        let mut obs = vec![
            leg_obs("1", "A", "B", 0.0, 100.0),
            leg_obs("2", "B", "C", 90.0, 100.0),
            leg_obs("3", "C", "D", 180.0, 100.0),
            leg_obs("4", "D", "A", 270.0, 98.0),
        ];
        // Rayonnement déclaré AVANT que sa station ne soit atteinte dans
        // la polygonale : doit quand même se résoudre
        obs.insert(1, side_obs("s1", "C", "TREE", 90.0, 10.0));

        let result = reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, None);

        // Les rayonnements viennent après les côtés de la polygonale
        assert_eq!(result.legs.len(), 5);
        let side = result.legs.last().unwrap();
        assert!(side.is_side_shot);

        // Depuis la station compensée C, pas la station brute
        let c = &result.adjusted_points["C"];
        assert_relative_eq!(side.from.easting, c.easting);
        assert_relative_eq!(side.adj_easting, c.easting + 10.0, epsilon = 1e-9);
        assert_relative_eq!(side.adj_northing, c.northing, epsilon = 1e-9);

        // Le point rayonné est dans la carte
        assert!(result.adjusted_points.contains_key("TREE"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_side_shots_do_not_move_chain() {
        let start = Point::control("A", 500.0, 500.0);
        let chain = vec![
            leg_obs("1", "A", "B", 0.0, 100.0),
            leg_obs("2", "B", "C", 90.0, 100.0),
            leg_obs("3", "C", "D", 180.0, 100.0),
            leg_obs("4", "D", "A", 270.0, 98.0),
        ];
        let mut with_sides = chain.clone();
        with_sides.push(side_obs("s1", "B", "GATE", 45.0, 25.0));
        with_sides.push(side_obs("s2", "D", "WALL", 300.0, 12.5));

        let bare = reduce_traverse(&start, 0.0, &chain, TraverseType::ClosedLoop, None);
        let full = reduce_traverse(&start, 0.0, &with_sides, TraverseType::ClosedLoop, None);

        for (a, b) in bare.legs.iter().zip(full.legs.iter().take(4)) {
            assert_eq!(a.adj_easting, b.adj_easting);
            assert_eq!(a.adj_northing, b.adj_northing);
        }
        assert_eq!(bare.misclosure_dist, full.misclosure_dist);
    }

    #[test]
    fn test_unresolvable_side_shot_is_skipped_with_warning() {
        let start = Point::control("A", 0.0, 0.0);
        let obs = vec![
            leg_obs("1", "A", "B", 90.0, 100.0),
            side_obs("s1", "NOWHERE", "ROCK", 10.0, 5.0),
        ];
        let result = reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, None);

        assert_eq!(result.legs.len(), 1);
        assert!(!result.adjusted_points.contains_key("ROCK"));
        assert_eq!(
            result.warnings,
            vec![ReductionWarning::UnresolvedSideShot {
                obs_id: "s1".to_string(),
                station_id: "NOWHERE".to_string(),
            }]
        );
    }

    #[test]
    fn test_inputs_never_mutated() {
        let start = Point::control("A", 500.0, 500.0);
        let obs = square_obs();
        let before = obs.clone();
        let _ = reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, None);
        assert_eq!(obs, before);
    }

    #[test]
    fn test_radiation_mode() {
        let station = Point::control("STN", 1000.0, 2000.0);
        let obs = vec![
            side_obs("r1", "STN", "P1", 0.0, 50.0),
            side_obs("r2", "STN", "P2", 90.0, 25.0),
        ];
        let result = reduce_radiation(&station, &obs);

        assert_eq!(result.legs.len(), 2);
        assert!(result.legs.iter().all(|l| l.is_side_shot));
        assert_eq!(result.misclosure_dist, 0.0);
        assert_relative_eq!(result.total_length, 75.0);
        assert_eq!(result.traverse_type, TraverseType::Open);

        let p1 = &result.adjusted_points["P1"];
        assert_relative_eq!(p1.northing, 2050.0, epsilon = 1e-9);
        let p2 = &result.adjusted_points["P2"];
        assert_relative_eq!(p2.easting, 1025.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_observation_list_is_total() {
        // L'appelant doit court-circuiter, mais le moteur reste total
        let start = Point::control("A", 0.0, 0.0);
        let result = reduce_traverse(&start, 0.0, &[], TraverseType::Open, None);
        assert!(result.legs.is_empty());
        assert_eq!(result.total_length, 0.0);
        assert_eq!(result.adjusted_points.len(), 1);
    }
}
