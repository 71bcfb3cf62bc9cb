//! Définition et implémentation des commandes CLI
//!
//! - `convert` : un point, d'un système vers un autre
//! - `all` : un point vers tous les systèmes
//! - `guess` : détection du système d'un couple brut
//! - `batch` : fichier texte/CSV, une ligne par point
//! - `reproject` : document GeoJSON
//! - `systems` : registre des systèmes

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use geodesie::{
    label_of, parameters_of, CoordinateSystem, Converter, Coordinates, GeoidModel, GridGeoid,
    LinearGeoid, LitePrimitive, ProjectionPrimitive, RawPoint,
};
use tracing::{info, warn};

use geoconvert::config::Config;
use geoconvert::export::{self, OutputFormat};
use geoconvert::report::BatchReport;

/// Convertisseur dont géoïde et primitive sont choisis à l'exécution
pub type DynConverter = Converter<Box<dyn GeoidModel>, Box<dyn ProjectionPrimitive>>;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single point between two systems
    Convert {
        /// X (metres) or longitude (degrees)
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Y (metres) or latitude (degrees)
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Ellipsoidal height (metres)
        #[arg(allow_negative_numbers = true)]
        z: Option<f64>,

        /// Source system (EPSG code or alias, default from config)
        #[arg(long)]
        from: Option<CoordinateSystem>,

        /// Target system (EPSG code or alias, default from config)
        #[arg(long)]
        to: Option<CoordinateSystem>,
    },

    /// Express a point in every supported system
    All {
        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,

        #[arg(allow_negative_numbers = true)]
        z: Option<f64>,

        /// Source system (default from config)
        #[arg(long)]
        from: Option<CoordinateSystem>,
    },

    /// Guess the system of a raw coordinate pair
    Guess {
        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Export plausible hypotheses as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Convert a text/CSV file, one point per line
    Batch {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Source system of every line (default from config)
        #[arg(long)]
        from: Option<CoordinateSystem>,

        /// Target system written to the output (default from config)
        #[arg(long)]
        to: Option<CoordinateSystem>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Save the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Reproject every geometry of a GeoJSON document
    Reproject {
        /// Input GeoJSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Source system (default from config)
        #[arg(long)]
        from: Option<CoordinateSystem>,

        /// Target system (default from config)
        #[arg(long)]
        to: Option<CoordinateSystem>,
    },

    /// List supported systems
    Systems,
}

/// Implémentation de la primitive de projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// Pure Rust Lambert + Helmert
    #[default]
    Lite,
    /// PROJ library (requires the `proj` feature)
    Proj,
}

/// Construit le convertisseur depuis la configuration
pub fn build_converter(config: &Config, backend: Backend) -> Result<DynConverter> {
    let geoid: Box<dyn GeoidModel> = match &config.geoid_grid {
        Some(path) => Box::new(
            GridGeoid::load(path)
                .with_context(|| format!("Failed to load geoid grid {}", path.display()))?,
        ),
        None => Box::new(LinearGeoid),
    };

    let primitive: Box<dyn ProjectionPrimitive> = match backend {
        Backend::Lite => Box::new(LitePrimitive),
        #[cfg(feature = "proj")]
        Backend::Proj => Box::new(geodesie::ProjPrimitive),
        #[cfg(not(feature = "proj"))]
        Backend::Proj => anyhow::bail!("PROJ backend unavailable: rebuild with --features proj"),
    };

    info!(
        primitive = primitive.description(),
        geoid = if config.geoid_grid.is_some() { "grid" } else { "linear" },
        "Converter ready"
    );
    Ok(Converter::with_parts(geoid, primitive))
}

/// Exécute la commande convert
pub fn cmd_convert(
    converter: &DynConverter,
    config: &Config,
    point: RawPoint,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<()> {
    let out = converter
        .convert(point, from, to)
        .with_context(|| format!("Conversion {} -> {} failed", from, to))?;

    println!("=== {} ({}) -> {} ({}) ===", from, label_of(from), to, label_of(to));
    let decimals = config.precision.for_system(to);
    println!("X: {:.*}", decimals, out.x);
    println!("Y: {:.*}", decimals, out.y);
    print_heights(&out);

    Ok(())
}

/// Exécute la commande all
pub fn cmd_all(converter: &DynConverter, config: &Config, input: Coordinates) -> Result<()> {
    println!("=== {} ({}) ===", input.system, label_of(input.system));

    let mut failed = 0;
    for (target, result) in CoordinateSystem::horizontal().zip(converter.project_to_all(&input)) {
        match result {
            Ok(c) => {
                let decimals = config.precision.for_system(target);
                println!(
                    "{:<11} {:<28} {:>18.*} {:>18.*}",
                    target.code(),
                    label_of(target),
                    decimals,
                    c.x,
                    decimals,
                    c.y
                );
            }
            Err(e) => {
                failed += 1;
                println!("{:<11} {:<28} ERROR: {}", target.code(), label_of(target), e);
            }
        }
    }

    if let Ok(out) = converter.convert(RawPoint::from(&input), input.system, CoordinateSystem::NgfIgn69) {
        print_heights(&out);
    }
    if failed > 0 {
        warn!(failed, "Some targets could not be computed");
    }

    Ok(())
}

/// Exécute la commande guess
pub fn cmd_guess(
    converter: &DynConverter,
    config: &Config,
    x: f64,
    y: f64,
    geojson: Option<&Path>,
) -> Result<()> {
    let suggestions = config.classifier.suggest_system(x, y);
    let hypotheses = config.classifier.hypotheses(converter, x, y);

    println!("=== Guess ({}, {}) ===", x, y);
    println!("\n--- BOUNDING BOXES ---");
    if suggestions.is_empty() {
        println!("  (none)");
    }
    for system in &suggestions {
        println!("  {:<11} {}", system.code(), label_of(*system));
    }

    println!("\n--- HYPOTHESES (WGS84) ---");
    if hypotheses.is_empty() {
        println!("  (none in continental France)");
    }
    for h in &hypotheses {
        println!(
            "  {:<11} {:<28} lon {:>12.7} lat {:>12.7}",
            h.system.code(),
            h.label,
            h.lon,
            h.lat
        );
    }

    if let Some(path) = geojson {
        let collection = export::geojson::hypotheses_collection(x, y, &hypotheses);
        export::geojson::export_to_geojson(&collection, path)?;
        println!("\nHypotheses written to {}", path.display());
    }

    Ok(())
}

/// Exécute la commande batch
pub fn cmd_batch(
    converter: &DynConverter,
    input: &Path,
    from: CoordinateSystem,
    to: CoordinateSystem,
    output: Option<&Path>,
    format: OutputFormat,
    report_path: Option<&Path>,
) -> Result<BatchReport> {
    let text = read_input(input)?;
    info!(input = %input.display(), from = %from, to = %to, format = ?format, "Starting batch");

    let start = Instant::now();
    let results = converter.process_batch(&text, from);
    let rows = export::select_target(converter, &results, to);

    let mut report = BatchReport::from_results(from, to, &results);
    report.set_duration(start.elapsed());

    match (format, output) {
        (OutputFormat::Csv, Some(path)) => export::csv::export_to_csv(&rows, from, to, path)?,
        (OutputFormat::Json, Some(path)) => export::export_to_json(&results, path)?,
        (OutputFormat::Geojson, Some(path)) => {
            export::geojson::export_to_geojson(&export::geojson::batch_collection(&rows, to), path)?
        }
        (OutputFormat::Csv, None) => {
            let mut stdout = std::io::stdout().lock();
            export::csv::write_csv(&mut stdout, &rows, from, to)?;
            stdout.flush()?;
        }
        (OutputFormat::Json, None) => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &results)?;
            println!();
        }
        (OutputFormat::Geojson, None) => {
            serde_json::to_writer(std::io::stdout().lock(), &export::geojson::batch_collection(&rows, to))?;
            println!();
        }
    }

    if output.is_some() {
        report.display();
    } else {
        eprintln!("{}", report.summary());
    }

    if let Some(path) = report_path {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(report)
}

/// Exécute la commande reproject
pub fn cmd_reproject(
    converter: &DynConverter,
    input: &Path,
    output: &Path,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<()> {
    let document = export::geojson::read_geojson(input)?;
    let (collection, failures) = export::geojson::reproject_geojson(converter, document, from, to)?;
    export::geojson::export_to_geojson(&collection, output)?;

    println!(
        "Reprojected {} features {} -> {} to {}",
        collection.features.len(),
        from,
        to,
        output.display()
    );
    if failures > 0 {
        warn!("{} features could not be reprojected", failures);
    }
    Ok(())
}

/// Exécute la commande systems
pub fn cmd_systems() {
    for system in CoordinateSystem::ALL {
        println!("{:<11} {:<28} {}", system.code(), label_of(system), parameters_of(system).proj_string());
    }
}

fn print_heights(out: &Coordinates) {
    if let Some(z) = out.z {
        println!("Alt. ellipsoïdale: {:.3}", z);
    }
    if let Some(h) = out.h {
        println!("Alt. NGF-IGN69 (approx.): {:.3}", h);
    }
}

/// Lit le fichier d'entrée, ou stdin pour "-"
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).context(format!("Failed to read input file: {}", input.display()))
}
