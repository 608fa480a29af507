//! # station-one
//!
//! Outil de bureau autour du moteur [`cheminement`] : projets de levé
//! persistés en JSON, aplatissement du carnet de terrain, réduction,
//! rapport de précision et import/export de points.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Réduction d'un projet, export des points compensés
//! station-one reduce --project leve.json --points-csv points.csv
//!
//! # Carnet en angles tournés
//! station-one reduce --project leve.json --azimuth-mode turned
//!
//! # Rayonnement pur depuis la station de départ
//! station-one radiate --project leve.json
//!
//! # Fusion de points de contrôle CSV dans un projet
//! station-one import-points --csv bornes.csv --project leve.json
//! ```

pub mod cli;
pub mod export;
pub mod fieldbook;
pub mod project;
pub mod report;

pub use project::{Project, ProjectData};
pub use report::{AccuracySnapshot, FieldDecision, ReductionReport, SurveyClass};
