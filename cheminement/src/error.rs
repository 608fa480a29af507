//! Types d'erreurs pour le crate cheminement

use thiserror::Error;

/// Erreurs de lecture d'un angle saisi
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AngleError {
    /// Saisie vide
    #[error("empty angle input")]
    Empty,

    /// Minutes hors de [0,60)
    #[error("minutes out of range in '{input}': {minutes}")]
    MinutesOutOfRange { input: String, minutes: u32 },

    /// Secondes hors de [0,60)
    #[error("seconds out of range in '{input}': {seconds}")]
    SecondsOutOfRange { input: String, seconds: f64 },

    /// Aucune des grammaires reconnues (DMS ou décimal)
    #[error("unparseable angle: '{0}'")]
    Unparseable(String),
}

/// Erreurs pouvant survenir en amont du moteur de réduction
#[derive(Debug, Error)]
pub enum CheminementError {
    /// Angle invalide dans un carnet de terrain
    #[error("invalid angle: {0}")]
    Angle(#[from] AngleError),

    /// Distance illisible ou négative
    #[error("invalid distance: '{input}'")]
    InvalidDistance { input: String },
}

impl CheminementError {
    /// Crée une erreur de distance invalide
    pub fn invalid_distance(input: impl Into<String>) -> Self {
        Self::InvalidDistance {
            input: input.into(),
        }
    }
}
