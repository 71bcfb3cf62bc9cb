//! # geodesie
//!
//! Conversion de coordonnées entre les systèmes de référence français.
//!
//! ## Features
//!
//! - Lambert 93, coniques conformes CC42 à CC50, Lambert I-IV et II étendu (NTF), WGS84
//! - Changement de datum Helmert 7 paramètres, méridien de Paris
//! - Altitude orthométrique via un modèle de géoïde injectable
//! - Détection du système probable d'un couple de valeurs brutes
//! - Traitement par lot parallèle (`rayon`) avec isolation des erreurs par ligne
//! - Backend PROJ optionnel (feature `proj`)
//!
//! ## Usage
//!
//! ```rust
//! use geodesie::{convert, CoordinateSystem, RawPoint};
//!
//! let paris = convert(
//!     RawPoint::new(652436.5, 6861545.2),
//!     CoordinateSystem::Lambert93,
//!     CoordinateSystem::Wgs84,
//! )?;
//! assert!((paris.x - 2.35).abs() < 0.01);
//! # Ok::<(), geodesie::ProjectionError>(())
//! ```

pub mod batch;
pub mod classify;
pub mod engine;
pub mod error;
pub mod geoid;
pub mod primitive;
pub mod registry;
pub mod types;

pub use batch::parse_line;
pub use classify::{BoundingBox, ClassifierConfig, HYPOTHESIS_CANDIDATES};
pub use engine::Converter;
pub use error::{GeodesieError, ParseError, ProjectionError, RowError, Stage};
pub use geoid::{estimate_separation, GeoidModel, GridGeoid, LinearGeoid};
#[cfg(feature = "proj")]
pub use primitive::ProjPrimitive;
pub use primitive::{Ellipsoid, Geographic, Helmert, LitePrimitive, ProjectionPrimitive};
pub use registry::{label_of, parameters_of, ProjectionParameters};
pub use types::{BulkResult, CoordinateSystem, Coordinates, Hypothesis, RawPoint};

/// Convertit un point avec le convertisseur par défaut
pub fn convert(
    point: RawPoint,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<Coordinates, ProjectionError> {
    Converter::new().convert(point, from, to)
}

/// Représentation du point dans tous les systèmes planimétriques
pub fn project_to_all(input: &Coordinates) -> Vec<Result<Coordinates, ProjectionError>> {
    Converter::new().project_to_all(input)
}

/// Systèmes plausibles d'après les boîtes englobantes par défaut
pub fn suggest_system(x: f64, y: f64) -> Vec<CoordinateSystem> {
    ClassifierConfig::default().suggest_system(x, y)
}

/// Candidats dont la position WGS84 tombe en France continentale
pub fn get_hypotheses(x: f64, y: f64) -> Vec<Hypothesis> {
    ClassifierConfig::default().hypotheses(&Converter::new(), x, y)
}

/// Traite un lot de lignes texte depuis `default_system`
pub fn process_batch(text: &str, default_system: CoordinateSystem) -> Vec<BulkResult> {
    Converter::new().process_batch(text, default_system)
}
