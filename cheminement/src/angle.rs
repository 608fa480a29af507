//! Lecture et formatage des angles
//!
//! Les saisies de terrain arrivent sous plusieurs formes :
//!
//! - `"120 30 15"` ou `"120-30-15"` (D M S séparés)
//! - `"120°30'15\""` (symboles sexagésimaux)
//! - `"120.5"` (degrés décimaux — PAS le format compacté DDD.MMSS :
//!   `120.5` vaut 120,5° et non 120°30')
//!
//! Tout est canonisé en degrés décimaux ; le formatage inverse produit
//! `D°MM'SS"`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AngleError;
use crate::geometry::normalize_azimuth;

/// Grammaire DMS complète : séparateurs symboliques, espaces, tirets, deux-points
static DMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\d+)[°\s:-]+(\d+)[′'\s:-]+(\d+(?:\.\d+)?)[″"]?$"#).expect("regex DMS valide")
});

/// Grammaire simple : trois groupes séparés par espace ou tiret
static SIMPLE_DMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)[\s-](\d+)[\s-](\d+(?:\.\d+)?)$").expect("regex DMS simple valide")
});

/// Lit un angle saisi et le convertit en degrés décimaux
///
/// Essaie d'abord les grammaires DMS, puis une valeur décimale nue.
/// Une saisie vide ou illisible est une erreur : l'appelant doit exclure
/// l'observation du calcul, jamais la traiter comme zéro.
pub fn parse_angle(input: &str) -> Result<f64, AngleError> {
    let clean = input.trim();
    if clean.is_empty() {
        return Err(AngleError::Empty);
    }

    let captures = DMS_RE.captures(clean).or_else(|| SIMPLE_DMS_RE.captures(clean));

    if let Some(caps) = captures {
        // Les groupes sont garantis numériques par les regex
        let d: u32 = caps[1].parse().map_err(|_| AngleError::Unparseable(clean.to_string()))?;
        let m: u32 = caps[2].parse().map_err(|_| AngleError::Unparseable(clean.to_string()))?;
        let s: f64 = caps[3].parse().map_err(|_| AngleError::Unparseable(clean.to_string()))?;

        if m >= 60 {
            return Err(AngleError::MinutesOutOfRange {
                input: clean.to_string(),
                minutes: m,
            });
        }
        if s >= 60.0 {
            return Err(AngleError::SecondsOutOfRange {
                input: clean.to_string(),
                seconds: s,
            });
        }

        return Ok(f64::from(d) + f64::from(m) / 60.0 + s / 3600.0);
    }

    // Valeur décimale nue ("120.45")
    clean
        .parse::<f64>()
        .map_err(|_| AngleError::Unparseable(clean.to_string()))
}

/// Vrai si la saisie se lit et tombe dans [0,360)
pub fn is_valid_angle(input: &str) -> bool {
    matches!(parse_angle(input), Ok(v) if (0.0..360.0).contains(&v))
}

/// Formate des degrés décimaux en `D°MM'SS"`
///
/// L'entrée est d'abord normalisée dans [0,360) (une valeur négative ou
/// ≥ 360° est formatée sous sa forme normalisée). Les secondes sont
/// arrondies à la seconde entière affichée, avec report sur les minutes
/// et degrés.
pub fn decimal_to_dms(decimal: f64) -> String {
    let norm = normalize_azimuth(decimal);

    // L'arrondi peut reporter jusqu'au degré : 359°59'59.6" reboucle sur 0°
    let total_seconds = (norm * 3600.0).round() as u64 % 1_296_000;
    let d = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;

    format!("{}°{:02}'{:02}\"", d, m, s)
}
