//! # cheminement
//!
//! Réduction de cheminements polygonaux planaires : calcul direct,
//! fermeture, compensation par la règle de Bowditch (compass rule) et
//! rayonnements, depuis des observations angle/distance de terrain.
//!
//! ## Features
//!
//! - Lecture souple des angles saisis (DMS `120 30 15`, `120°30'15"`,
//!   décimal `120.5`) et formatage inverse en `D°MM'SS"`
//! - Primitives géométriques planaires (azimuts, gisement inverse)
//! - Moteur de réduction pur et total : aucune E/S, aucune mutation des
//!   entrées, jamais de division par zéro
//! - Pré-résolution optionnelle des angles tournés en azimuts absolus
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cheminement::{reduce_traverse, Observation, Point, TraverseType};
//!
//! let start = Point::control("STN1", 500_000.0, 2_000_000.0);
//! let result = reduce_traverse(&start, 0.0, &observations, TraverseType::ClosedLoop, None);
//! println!("fermeture: {:.4} m (1:{:.0})", result.misclosure_dist, result.precision);
//! ```
//!
//! Contrat d'entrée du moteur : `Observation::horizontal_angle` est un
//! azimut absolu. Un carnet en angles tournés passe d'abord par
//! [`engine::orientation::resolve_azimuths`].

pub mod angle;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod types;

pub use angle::{decimal_to_dms, is_valid_angle, parse_angle};
pub use engine::orientation::{resolve_azimuths, AzimuthMode};
pub use engine::{reduce_radiation, reduce_traverse};
pub use error::{AngleError, CheminementError};
pub use geometry::{inverse_azimuth, normalize_azimuth, plane_distance};
pub use types::{
    Observation, Point, ReductionWarning, TraverseLeg, TraverseResult, TraverseType,
    PRECISION_SENTINEL,
};
