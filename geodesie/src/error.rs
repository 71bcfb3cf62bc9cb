//! Types d'erreurs pour le crate geodesie

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Étape du calcul où une projection a échoué
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Plan → géographique
    Inverse,
    /// Géographique → plan
    Forward,
    /// Changement de datum (Helmert)
    DatumShift,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inverse => "inverse projection",
            Self::Forward => "forward projection",
            Self::DatumShift => "datum shift",
        })
    }
}

/// Erreurs de la primitive de projection
///
/// Toujours récupérable : un point en échec n'invalide jamais un lot.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionError {
    /// Coordonnées hors du domaine de validité (latitude > 90°, valeur non finie)
    #[error("EPSG:{epsg}: input ({x}, {y}) outside projection domain")]
    OutOfDomain { epsg: u32, x: f64, y: f64 },

    /// Le calcul a produit une valeur non finie
    #[error("EPSG:{epsg}: non-finite result during {stage}")]
    NonFinite { epsg: u32, stage: Stage },

    /// Erreur remontée par la bibliothèque PROJ
    #[error("projection backend error: {message}")]
    Backend { message: String },
}

/// Erreur de lecture d'une ligne de lot
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// Moins de deux valeurs numériques sur la ligne
    #[error("invalid format: expected at least 2 numeric values, found {found}")]
    TooFewNumbers { found: usize },
}

/// Erreur attachée à une ligne de lot
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum RowError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl RowError {
    /// Marqueur court affiché à la place des valeurs numériques
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Parse(_) => "invalid_format",
            Self::Projection(_) => "conversion_error",
        }
    }
}

/// Erreurs générales du crate (identifiants, grilles de géoïde)
#[derive(Debug, Error)]
pub enum GeodesieError {
    /// Identifiant de système inconnu
    #[error("Unknown coordinate system: {0}")]
    UnknownSystem(String),

    /// Erreur d'I/O lors de la lecture d'une grille
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Grille de géoïde mal formée
    #[error("Invalid geoid grid at line {line}: {reason}")]
    InvalidGrid { line: usize, reason: String },
}

impl GeodesieError {
    /// Crée une erreur de grille avec contexte
    pub fn invalid_grid(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidGrid {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_tags() {
        let parse: RowError = ParseError::TooFewNumbers { found: 1 }.into();
        assert_eq!(parse.tag(), "invalid_format");

        let proj: RowError = ProjectionError::NonFinite {
            epsg: 2154,
            stage: Stage::Inverse,
        }
        .into();
        assert_eq!(proj.tag(), "conversion_error");
        assert!(proj.to_string().contains("EPSG:2154"));
        assert!(proj.to_string().contains("inverse projection"));
    }

    #[test]
    fn test_row_error_serialization() {
        let err: RowError = ParseError::TooFewNumbers { found: 0 }.into();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains(r#""type":"parse""#), "{}", json);
        assert!(json.contains(r#""found":0"#), "{}", json);
    }
}
