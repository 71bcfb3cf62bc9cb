//! # geoconvert
//!
//! Conversion de coordonnées françaises en ligne de commande, au-dessus du
//! crate `geodesie`.
//!
//! ## Features
//!
//! - Conversion d'un point, vers un système ou vers tous
//! - Détection du système d'un couple brut, export GeoJSON des hypothèses
//! - Traitement par lot (CSV, JSON, GeoJSON) avec rapport
//! - Reprojection de documents GeoJSON
//! - Backend PROJ optionnel (feature `proj`)
//!
//! ## Usage CLI
//!
//! ```bash
//! geoconvert convert 652436.5 6861545.2 --from L93 --to WGS84
//! geoconvert all 700000 6600000 300 --from EPSG:2154
//! geoconvert guess 1234567 2345678 --geojson hypotheses.geojson
//! geoconvert batch --input points.txt --from L93 --to CC46 --output out.csv --report report.json
//! ```

pub mod config;
pub mod export;
pub mod report;

pub use config::Config;
pub use export::OutputFormat;
pub use report::{BatchReport, BatchStatus};
