//! Export et import de données de levé
//!
//! - `csv` : points de contrôle et points compensés au format CSV
//! - `json` : archivage JSON (résultat complet, rapport, instantané)

pub mod csv;
pub mod json;
