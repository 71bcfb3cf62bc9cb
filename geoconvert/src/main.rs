//! Point d'entrée CLI pour geoconvert

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use geodesie::{Coordinates, RawPoint};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use geoconvert::Config;

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Backend, Commands};

/// Convertir des coordonnées entre systèmes géodésiques français
#[derive(Parser)]
#[command(name = "geoconvert")]
#[command(author, version)]
#[command(about = "Conversion de coordonnées : Lambert 93, CC42-CC50, NTF Lambert I-IV, WGS84")]
#[command(long_about = "Conversion de coordonnées entre les systèmes de référence français.\n\nSans --from/--to, les systèmes par défaut viennent de la configuration (--config, puis GEOCONVERT_CONFIG).")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config preset name (default/narrow-zones) or path to a JSON config
    #[arg(long, global = true)]
    config: Option<String>,

    /// Projection backend
    #[arg(long, value_enum, default_value_t = Backend::Lite, global = true)]
    backend: Backend,

    /// Geoid grid file, overrides the config
    #[arg(long, global = true)]
    geoid: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let mut config = Config::resolve(cli.config.as_deref())?;
    if cli.geoid.is_some() {
        config.geoid_grid = cli.geoid;
    }
    debug!(?config, "Configuration resolved");

    let converter = cli::build_converter(&config, cli.backend)?;

    match cli.command {
        Commands::Convert { x, y, z, from, to } => {
            let point = RawPoint { x, y, z };
            cli::cmd_convert(
                &converter,
                &config,
                point,
                from.unwrap_or(config.default_from),
                to.unwrap_or(config.default_to),
            )?;
        }
        Commands::All { x, y, z, from } => {
            let mut input = Coordinates::new(x, y, from.unwrap_or(config.default_from));
            input.z = z;
            cli::cmd_all(&converter, &config, input)?;
        }
        Commands::Guess { x, y, geojson } => {
            cli::cmd_guess(&converter, &config, x, y, geojson.as_deref())?;
        }
        Commands::Batch {
            input,
            from,
            to,
            output,
            format,
            report,
        } => {
            let report = cli::cmd_batch(
                &converter,
                &input,
                from.unwrap_or(config.default_from),
                to.unwrap_or(config.default_to),
                output.as_deref(),
                format,
                report.as_deref(),
            )?;
            if report.rows_converted == 0 && report.rows_total > 0 {
                anyhow::bail!("No row could be converted");
            }
        }
        Commands::Reproject {
            input,
            output,
            from,
            to,
        } => {
            cli::cmd_reproject(
                &converter,
                &input,
                &output,
                from.unwrap_or(config.default_from),
                to.unwrap_or(config.default_to),
            )?;
        }
        Commands::Systems => cli::cmd_systems(),
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
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .init();
}
