//! Traitement par lot de coordonnées en texte libre
//!
//! Une ligne = un point. Les séparateurs acceptés sont l'espace, la
//! tabulation et le point-virgule ; la virgule décimale est tolérée.
//! Une ligne en échec donne un [`BulkResult`] en erreur sans interrompre le lot.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::engine::Converter;
use crate::error::{ParseError, RowError};
use crate::geoid::GeoidModel;
use crate::primitive::ProjectionPrimitive;
use crate::types::{BulkResult, CoordinateSystem, Coordinates, RawPoint};

/// Lit X, Y et Z optionnel depuis une ligne de texte
///
/// Chaque jeton est lu sur son préfixe numérique (`652436.5m` donne 652436.5) ;
/// les jetons sans préfixe numérique sont ignorés.
pub fn parse_line(line: &str) -> Result<RawPoint, ParseError> {
    let normalized = line.replace(',', ".");
    let numbers: Vec<f64> = normalized
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| fast_float::parse_partial::<f64, _>(tok).ok())
        .map(|(v, _)| v)
        .filter(|v| v.is_finite())
        .take(3)
        .collect();

    match numbers[..] {
        [x, y] => Ok(RawPoint::new(x, y)),
        [x, y, z] => Ok(RawPoint::with_z(x, y, z)),
        _ => Err(ParseError::TooFewNumbers {
            found: numbers.len(),
        }),
    }
}

impl<G: GeoidModel, P: ProjectionPrimitive> Converter<G, P> {
    /// Convertit une ligne vers tous les systèmes planimétriques
    ///
    /// Une seule cible en échec suffit à marquer la ligne en erreur.
    pub fn process_line(&self, line: &str, default_system: CoordinateSystem) -> BulkResult {
        let point = match parse_line(line) {
            Ok(p) => p,
            Err(e) => return BulkResult::failure(line, e),
        };

        let mut input = Coordinates::new(point.x, point.y, default_system);
        input.z = point.z;

        let converted: Result<Vec<Coordinates>, _> = self.project_to_all(&input).into_iter().collect();
        match converted {
            Ok(all) => BulkResult::success(line, all),
            Err(e) => BulkResult::failure(line, RowError::Projection(e)),
        }
    }

    /// Traite un texte multi-lignes, en parallèle, dans l'ordre d'entrée
    ///
    /// Les lignes vides ou blanches sont ignorées.
    pub fn process_batch(&self, text: &str, default_system: CoordinateSystem) -> Vec<BulkResult> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        debug!(lines = lines.len(), from = %default_system, "Processing batch");

        let results: Vec<BulkResult> = lines
            .par_iter()
            .map(|line| self.process_line(line, default_system))
            .collect();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(
            total = results.len(),
            failed,
            "Batch processed"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_separators() {
        assert_eq!(parse_line("700000 6600000").unwrap(), RawPoint::new(700000.0, 6600000.0));
        assert_eq!(parse_line("700000;6600000").unwrap(), RawPoint::new(700000.0, 6600000.0));
        assert_eq!(parse_line("700000\t6600000\t120").unwrap(), RawPoint::with_z(700000.0, 6600000.0, 120.0));
        assert_eq!(parse_line("  2,35 ; 48,85 ").unwrap(), RawPoint::new(2.35, 48.85));
    }

    #[test]
    fn test_parse_line_skips_labels() {
        assert_eq!(
            parse_line("borne B12 652436.5 6861545.2").unwrap(),
            RawPoint::new(652436.5, 6861545.2)
        );
        // Au-delà de trois valeurs, le reste est ignoré
        assert_eq!(parse_line("1 2 3 4 5").unwrap(), RawPoint::with_z(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_line_reads_numeric_prefix() {
        assert_eq!(
            parse_line("652436.5m 6861545.2m").unwrap(),
            RawPoint::new(652436.5, 6861545.2)
        );
        assert_eq!(parse_line("2,35° 48,85°").unwrap(), RawPoint::new(2.35, 48.85));
        // Pas de préfixe numérique : jeton ignoré
        assert_eq!(parse_line("X700000 Y6600000"), Err(ParseError::TooFewNumbers { found: 0 }));
    }

    #[test]
    fn test_parse_line_rejects() {
        assert_eq!(parse_line("BADROW"), Err(ParseError::TooFewNumbers { found: 0 }));
        assert_eq!(parse_line("700000"), Err(ParseError::TooFewNumbers { found: 1 }));
        assert_eq!(parse_line("NaN inf 12"), Err(ParseError::TooFewNumbers { found: 1 }));
    }

    #[test]
    fn test_batch_isolates_bad_row() {
        let conv = Converter::new();
        let results = conv.process_batch(
            "700000 6600000\nBADROW\n700100 6600200",
            CoordinateSystem::Lambert93,
        );

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(!results[1].is_ok());
        assert!(results[2].is_ok());

        assert_eq!(results[1].original, "BADROW");
        assert!(results[1].converted.is_empty());
        assert_eq!(results[1].error.as_ref().unwrap().tag(), "invalid_format");

        assert_eq!(results[0].converted.len(), 16);
        let wgs = results[2].get(CoordinateSystem::Wgs84).unwrap();
        assert!((wgs.x - 3.0013).abs() < 1e-3, "lon={}", wgs.x);
        assert!((wgs.y - 46.5018).abs() < 1e-3, "lat={}", wgs.y);
    }

    #[test]
    fn test_batch_skips_blank_lines() {
        let conv = Converter::new();
        let results = conv.process_batch("\n  \n700000 6600000\r\n\n", CoordinateSystem::Lambert93);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].original, "700000 6600000");
    }

    #[test]
    fn test_batch_projection_failure_is_row_error() {
        let conv = Converter::new();
        let results = conv.process_batch("2 48\n2 95", CoordinateSystem::Wgs84);
        assert!(results[0].is_ok());
        assert_eq!(results[1].error.as_ref().unwrap().tag(), "conversion_error");
    }

    #[test]
    fn test_batch_carries_height() {
        let conv = Converter::new();
        let results = conv.process_batch("700000 6600000 300", CoordinateSystem::Lambert93);
        for c in &results[0].converted {
            assert_eq!(c.z, Some(300.0));
            assert!((c.h.unwrap() - 252.4).abs() < 1e-6);
        }
    }
}
