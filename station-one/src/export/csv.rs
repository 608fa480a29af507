//! Import/export CSV des points
//!
//! Export : `id,easting,northing,elevation,description,type`, coordonnées
//! à 4 décimales, `type` FIXED pour les points figés et ADJUSTED pour les
//! points calculés. Ordre stable : point de départ, stations de la
//! polygonale dans l'ordre du cheminement, puis points rayonnés.
//!
//! Import : lignes `id,easting,northing[,elevation[,description]]`,
//! importées comme points de contrôle figés. Les lignes illisibles
//! (y compris une éventuelle ligne d'en-tête) sont comptées et ignorées.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use cheminement::{Point, TraverseResult};

/// Exporte les points finaux d'une réduction en CSV
pub fn write_points<W: Write>(writer: W, result: &TraverseResult, start: &Point) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "easting", "northing", "elevation", "description", "type"])?;

    let mut written: HashSet<&str> = HashSet::new();

    // Point de départ d'abord, tel que figé
    write_point(&mut wtr, start)?;
    written.insert(start.id.as_str());

    // Stations de la polygonale dans l'ordre du cheminement, puis points
    // rayonnés dans l'ordre des côtés
    for leg in &result.legs {
        if written.contains(leg.to.id.as_str()) {
            continue;
        }
        if let Some(point) = result.adjusted_points.get(&leg.to.id) {
            write_point(&mut wtr, point)?;
            written.insert(leg.to.id.as_str());
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exporte les points vers un fichier
pub fn write_points_file(path: &Path, result: &TraverseResult, start: &Point) -> Result<()> {
    let file = std::fs::File::create(path)
        .context(format!("Failed to create file: {}", path.display()))?;
    write_points(file, result, start)
}

fn write_point<W: Write>(wtr: &mut csv::Writer<W>, point: &Point) -> Result<()> {
    wtr.write_record(&[
        point.id.clone(),
        format!("{:.4}", point.easting),
        format!("{:.4}", point.northing),
        point.elevation.map(|e| format!("{:.3}", e)).unwrap_or_default(),
        point.description.clone().unwrap_or_default(),
        (if point.fixed { "FIXED" } else { "ADJUSTED" }).to_string(),
    ])?;
    Ok(())
}

/// Lit des points de contrôle depuis un CSV
///
/// Retourne les points lus et le nombre de lignes ignorées.
pub fn read_points<R: Read>(reader: R) -> Result<(Vec<Point>, usize)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for record in rdr.records() {
        let record = record.context("Failed to read CSV row")?;

        if record.len() < 3 {
            skipped += 1;
            continue;
        }

        let id = record[0].to_string();
        let easting = record[1].parse::<f64>();
        let northing = record[2].parse::<f64>();

        let (Ok(easting), Ok(northing)) = (easting, northing) else {
            // Ligne d'en-tête ou coordonnées illisibles
            skipped += 1;
            continue;
        };

        if id.is_empty() {
            skipped += 1;
            continue;
        }

        let mut point = Point::control(id, easting, northing);
        point.elevation = record.get(3).and_then(|s| s.parse::<f64>().ok());
        point.description = record
            .get(4)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        points.push(point);
    }

    if skipped > 0 {
        warn!(skipped, "lignes CSV ignorees a l'import");
    }

    Ok((points, skipped))
}

/// Lit des points de contrôle depuis un fichier CSV
pub fn read_points_file(path: &Path) -> Result<(Vec<Point>, usize)> {
    let file = std::fs::File::open(path)
        .context(format!("Failed to open file: {}", path.display()))?;
    read_points(file)
}
