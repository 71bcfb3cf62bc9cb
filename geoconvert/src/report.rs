//! Rapport de traitement par lot
//!
//! Ce module collecte et affiche le bilan d'un lot : lignes converties,
//! lignes en erreur avec leur numéro et leur cause.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use geodesie::{BulkResult, CoordinateSystem, RowError};
use serde::Serialize;

/// Nombre d'erreurs conservées en détail
const MAX_DETAILED_ERRORS: usize = 100;

/// Statut global du lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStatus {
    /// Toutes les lignes converties
    Success,
    /// Au moins une ligne convertie et au moins une en erreur
    PartialSuccess,
    /// Aucune ligne convertie
    Failed,
}

/// Ligne en erreur
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// Numéro de ligne (1-based, lignes vides exclues)
    pub row: usize,
    /// Texte original
    pub input: String,
    /// Marqueur court (`invalid_format`, `conversion_error`)
    pub tag: &'static str,
    /// Message d'erreur
    pub message: String,
}

/// Rapport complet d'un lot
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub source: CoordinateSystem,
    pub target: CoordinateSystem,
    /// Durée du traitement
    pub duration_secs: f64,
    pub status: BatchStatus,

    pub rows_total: usize,
    pub rows_converted: usize,
    /// Lignes rejetées à la lecture
    pub parse_errors: usize,
    /// Lignes dont une projection a échoué
    pub projection_errors: usize,

    /// Premières erreurs
    pub errors: Vec<RowFailure>,
}

impl BatchReport {
    /// Crée un rapport vide
    pub fn new(source: CoordinateSystem, target: CoordinateSystem) -> Self {
        Self {
            source,
            target,
            duration_secs: 0.0,
            status: BatchStatus::Success,
            rows_total: 0,
            rows_converted: 0,
            parse_errors: 0,
            projection_errors: 0,
            errors: Vec::new(),
        }
    }

    /// Construit le rapport depuis les résultats du lot
    pub fn from_results(
        source: CoordinateSystem,
        target: CoordinateSystem,
        results: &[BulkResult],
    ) -> Self {
        let mut report = Self::new(source, target);
        for (i, result) in results.iter().enumerate() {
            match &result.error {
                None => report.record_success(),
                Some(e) => report.record_failure(i + 1, &result.original, e),
            }
        }
        report.finalize();
        report
    }

    /// Enregistre une ligne convertie
    pub fn record_success(&mut self) {
        self.rows_total += 1;
        self.rows_converted += 1;
    }

    /// Enregistre une ligne en erreur
    pub fn record_failure(&mut self, row: usize, input: &str, error: &RowError) {
        self.rows_total += 1;
        match error {
            RowError::Parse(_) => self.parse_errors += 1,
            RowError::Projection(_) => self.projection_errors += 1,
        }
        if self.errors.len() < MAX_DETAILED_ERRORS {
            self.errors.push(RowFailure {
                row,
                input: input.to_string(),
                tag: error.tag(),
                message: error.to_string(),
            });
        }
    }

    /// Définit la durée du traitement
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Nombre de lignes en erreur
    pub fn rows_failed(&self) -> usize {
        self.parse_errors + self.projection_errors
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let has_errors = self.rows_failed() > 0;
        let has_success = self.rows_converted > 0;

        self.status = if has_errors && has_success {
            BatchStatus::PartialSuccess
        } else if has_errors {
            BatchStatus::Failed
        } else {
            BatchStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("BATCH REPORT - {} -> {}", self.source, self.target);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Rows: {} total, {} converted, {} failed",
            self.rows_total,
            self.rows_converted,
            self.rows_failed()
        );
        println!(
            "Errors: {} invalid format, {} conversion",
            self.parse_errors, self.projection_errors
        );

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.rows_failed());
            for e in self.errors.iter().take(20) {
                println!("  [line {}] {} {:?}: {}", e.row, e.tag, e.input, e.message);
            }
            if self.rows_failed() > 20 {
                println!("  ... and {} more", self.rows_failed() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: {} converted, {} errors",
            self.source,
            self.target,
            self.rows_converted,
            self.rows_failed()
        )
    }
}
