//! Définition et implémentation des commandes CLI
//!
//! - `reduce`  : carnet de terrain → coordonnées compensées + rapport
//! - `radiate` : rayonnement pur depuis la station de départ
//! - `import-points` : fusion de points de contrôle CSV dans un projet

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use tracing::{info, warn};

use cheminement::{
    parse_angle, reduce_radiation, reduce_traverse, resolve_azimuths, AzimuthMode, Observation,
    TraverseResult,
};

use crate::export::{csv, json};
use crate::fieldbook::{flatten_setups, SkippedRow};
use crate::project::Project;
use crate::report::ReductionReport;

/// Interprétation des angles du carnet (voir `cheminement::AzimuthMode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AngleInterpretation {
    /// Les angles saisis sont des azimuts absolus
    #[default]
    Direct,
    /// Les angles sont tournés depuis la visée arrière
    Turned,
}

impl From<AngleInterpretation> for AzimuthMode {
    fn from(value: AngleInterpretation) -> Self {
        match value {
            AngleInterpretation::Direct => AzimuthMode::Direct,
            AngleInterpretation::Turned => AzimuthMode::TurnedAngle,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reduce the project field book into adjusted coordinates
    Reduce {
        /// Path to the project JSON file
        #[arg(short, long)]
        project: PathBuf,

        /// Angle interpretation of the field book
        #[arg(long, value_enum, default_value = "direct")]
        azimuth_mode: AngleInterpretation,

        /// Write final points as CSV
        #[arg(long)]
        points_csv: Option<PathBuf>,

        /// Write the full reduction result as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the accuracy snapshot (advisory payload) as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Field notes attached to the accuracy snapshot
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Radiate every field book observation from the start station
    Radiate {
        /// Path to the project JSON file
        #[arg(short, long)]
        project: PathBuf,

        /// Write radiated points as CSV
        #[arg(long)]
        points_csv: Option<PathBuf>,

        /// Write the result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Merge control points from a CSV file into a project
    ImportPoints {
        /// CSV file (`id,easting,northing[,elevation[,description]]`)
        #[arg(short, long)]
        csv: PathBuf,

        /// Project JSON file to update
        #[arg(short, long)]
        project: PathBuf,
    },
}

/// Exécute la commande reduce
pub fn cmd_reduce(
    project_path: &Path,
    azimuth_mode: AngleInterpretation,
    points_csv: Option<&Path>,
    json_out: Option<&Path>,
    snapshot_out: Option<&Path>,
    notes: &str,
    quiet: bool,
) -> Result<()> {
    let project = Project::load(project_path)?;

    let start_azimuth = parse_start_azimuth(&project.data.start_azimuth);
    let (observations, skipped) = flatten_setups(&project.data.setups);
    if observations.is_empty() {
        bail!("field book contains no computable observations");
    }

    let resolved = resolve_azimuths(azimuth_mode.into(), start_azimuth, &observations);
    let result = reduce_traverse(
        &project.data.start_point,
        start_azimuth,
        &resolved,
        project.data.traverse_type,
        project.closing_point(),
    );

    finish(
        &project, &result, notes, &skipped, points_csv, json_out, snapshot_out, quiet,
    )
}

/// Exécute la commande radiate
pub fn cmd_radiate(
    project_path: &Path,
    points_csv: Option<&Path>,
    json_out: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let project = Project::load(project_path)?;

    let (observations, skipped) = flatten_setups(&project.data.setups);
    if observations.is_empty() {
        bail!("field book contains no computable observations");
    }

    // En mode rayonnement chaque visée part de la station de départ,
    // marquage polygonale ignoré
    let observations: Vec<Observation> = observations
        .into_iter()
        .map(|o| Observation {
            is_traverse_leg: false,
            ..o
        })
        .collect();

    let result = reduce_radiation(&project.data.start_point, &observations);

    finish(&project, &result, "", &skipped, points_csv, json_out, None, quiet)
}

/// Exécute la commande import-points
pub fn cmd_import_points(csv_path: &Path, project_path: &Path) -> Result<()> {
    let (points, skipped) = csv::read_points_file(csv_path)?;
    if points.is_empty() {
        bail!("no usable control point in {}", csv_path.display());
    }

    let mut project = Project::load(project_path)?;
    let imported = points.len();
    project.merge_control_points(points);
    project.save(project_path)?;

    info!(
        imported,
        skipped,
        project = %project_path.display(),
        "points de controle fusionnes"
    );
    println!(
        "{} control point(s) merged into {} ({} row(s) skipped)",
        imported,
        project_path.display(),
        skipped
    );
    Ok(())
}

/// Rapport + exports communs aux commandes de calcul
fn finish(
    project: &Project,
    result: &TraverseResult,
    notes: &str,
    skipped: &[SkippedRow],
    points_csv: Option<&Path>,
    json_out: Option<&Path>,
    snapshot_out: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let report = ReductionReport::from_result(&project.name, result, notes, skipped);
    if quiet {
        // Une seule ligne en mode silencieux
        println!("{}", report.summary());
    } else {
        report.display();
    }

    if let Some(path) = points_csv {
        csv::write_points_file(path, result, &project.data.start_point)?;
        info!(path = %path.display(), "points exportes en CSV");
    }
    if let Some(path) = json_out {
        json::write_json(path, result)?;
        info!(path = %path.display(), "resultat exporte en JSON");
    }
    if let Some(path) = snapshot_out {
        json::write_json(path, &report.snapshot)?;
        info!(path = %path.display(), "instantane d'exactitude exporte");
    }

    Ok(())
}

/// Lit l'azimut de départ saisi ; une saisie illisible vaut 0 (avec warning)
fn parse_start_azimuth(input: &str) -> f64 {
    match parse_angle(input) {
        Ok(azimuth) => azimuth,
        Err(e) => {
            if !input.trim().is_empty() {
                warn!(input, error = %e, "azimut de depart illisible, 0 utilise");
            }
            0.0
        }
    }
}
