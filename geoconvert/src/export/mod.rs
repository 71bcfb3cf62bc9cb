//! Modules d'export (CSV, GeoJSON, JSON)

pub mod csv;
pub mod geojson;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use geodesie::{
    BulkResult, CoordinateSystem, Converter, Coordinates, GeoidModel, ProjectionPrimitive, RawPoint,
    RowError,
};
use serde::Serialize;

/// Format de sortie d'un lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `Input;SourceSystem;TargetSystem;Result_X;...`
    #[default]
    Csv,
    /// Résultats complets, tous systèmes
    Json,
    /// Points WGS84 avec le résultat cible en propriétés
    Geojson,
}

/// Résultat d'une ligne dans le système cible
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub input: String,
    /// Point dans le système cible
    pub target: Option<Coordinates>,
    /// Position WGS84 (pour l'export GeoJSON)
    pub wgs84: Option<Coordinates>,
    pub error: Option<RowError>,
}

/// Extrait le résultat cible de chaque ligne
///
/// Le fan-out ne couvre pas le pseudo-système altimétrique : dans ce cas
/// le point est reconverti depuis sa position WGS84.
pub fn select_target<G: GeoidModel, P: ProjectionPrimitive>(
    converter: &Converter<G, P>,
    results: &[BulkResult],
    to: CoordinateSystem,
) -> Vec<ExportRow> {
    results
        .iter()
        .map(|r| {
            let wgs84 = r.get(CoordinateSystem::Wgs84).copied();
            let target = match (&r.error, r.get(to), wgs84) {
                (Some(e), _, _) => Err(e.clone()),
                (None, Some(c), _) => Ok(Some(*c)),
                (None, None, Some(w)) => converter
                    .convert(RawPoint::from(&w), CoordinateSystem::Wgs84, to)
                    .map(Some)
                    .map_err(RowError::Projection),
                (None, None, None) => Ok(None),
            };

            match target {
                Ok(target) => ExportRow {
                    input: r.original.clone(),
                    target,
                    wgs84,
                    error: None,
                },
                Err(e) => ExportRow {
                    input: r.original.clone(),
                    target: None,
                    wgs84,
                    error: Some(e),
                },
            }
        })
        .collect()
}

/// Exporte les résultats complets en JSON
pub fn export_to_json(results: &[BulkResult], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}
