//! Point d'entrée CLI pour station-one

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use station_one::cli::{self, Commands};

/// Réduire des levés de cheminement en coordonnées compensées
#[derive(Parser)]
#[command(name = "station-one")]
#[command(author, version)]
#[command(about = "Réduire des carnets de terrain en coordonnées compensées (règle de Bowditch)")]
#[command(
    long_about = "Outil de bureau pour la réduction de cheminements polygonaux : calcul direct, fermeture, compensation Bowditch, rayonnements, rapport de précision et export des points."
)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Reduce {
            project,
            azimuth_mode,
            points_csv,
            json,
            snapshot,
            notes,
        } => {
            info!(project = %project.display(), mode = ?azimuth_mode, "Reduction du cheminement");
            cli::cmd_reduce(
                &project,
                azimuth_mode,
                points_csv.as_deref(),
                json.as_deref(),
                snapshot.as_deref(),
                &notes,
                cli.quiet,
            )?;
        }
        Commands::Radiate {
            project,
            points_csv,
            json,
        } => {
            info!(project = %project.display(), "Reduction par rayonnement");
            cli::cmd_radiate(&project, points_csv.as_deref(), json.as_deref(), cli.quiet)?;
        }
        Commands::ImportPoints { csv, project } => {
            info!(csv = %csv.display(), project = %project.display(), "Import de points");
            cli::cmd_import_points(&csv, &project)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
