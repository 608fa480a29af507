//! Primitives géométriques planaires
//!
//! Tous les azimuts sont comptés en degrés décimaux, dans le sens
//! horaire depuis le Nord, plage [0,360). Les distances sont planaires :
//! l'altitude n'intervient jamais.

/// Normalise un azimut dans [0,360)
///
/// Idempotente : `normalize_azimuth(normalize_azimuth(x)) == normalize_azimuth(x)`.
pub fn normalize_azimuth(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// Distance euclidienne 2D entre deux couples (Est, Nord)
pub fn plane_distance(e1: f64, n1: f64, e2: f64, n2: f64) -> f64 {
    (e2 - e1).hypot(n2 - n1)
}

/// Azimut du point 1 vers le point 2 (gisement inverse)
///
/// `atan2(ΔE, ΔN)` : le premier argument est le delta Est, donc l'angle
/// est bien compté horaire depuis le Nord. Résultat dans [0,360).
pub fn inverse_azimuth(e1: f64, n1: f64, e2: f64, n2: f64) -> f64 {
    let de = e2 - e1;
    let dn = n2 - n1;
    let mut rad = de.atan2(dn);
    if rad < 0.0 {
        rad += 2.0 * std::f64::consts::PI;
    }
    rad.to_degrees()
}
