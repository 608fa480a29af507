//! Archivage JSON des résultats

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Écrit une valeur sérialisable en JSON indenté
///
/// Sert au résultat complet de réduction, au rapport et à l'instantané
/// d'exactitude ; le format est celui des structures `serde` du crate
/// `cheminement` (la carte des points devient un objet indexé par
/// identifiant).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .context(format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).context("Failed to serialize to JSON")?;
    Ok(())
}
