//! Projection via la bibliothèque PROJ
//!
//! Ce module est disponible uniquement avec le feature `proj`.

use proj::Proj;

use super::{Geographic, ProjectionPrimitive};
use crate::error::ProjectionError;
use crate::registry::ProjectionParameters;

const WGS84_DEF: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Projection déléguée à PROJ, à partir des définitions du registre
///
/// `Proj` n'est pas `Sync` : une transformation est créée par appel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjPrimitive;

impl ProjPrimitive {
    fn transform(source: &str, target: &str, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let proj = Proj::new_known_crs(source, target, None).map_err(|e| ProjectionError::Backend {
            message: format!("Failed to create projection from {} to {}: {}", source, target, e),
        })?;

        let (x, y) = proj.convert((x, y)).map_err(|e| ProjectionError::Backend {
            message: format!("Coordinate transformation failed: {}", e),
        })?;

        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::Backend {
                message: "Coordinate transformation returned a non-finite value".to_string(),
            });
        }
        Ok((x, y))
    }
}

impl ProjectionPrimitive for ProjPrimitive {
    fn to_wgs84(&self, params: &ProjectionParameters, x: f64, y: f64) -> Result<Geographic, ProjectionError> {
        if params.is_geographic() {
            if !x.is_finite() || !y.is_finite() || y.abs() > 90.0 {
                return Err(ProjectionError::OutOfDomain {
                    epsg: params.epsg,
                    x,
                    y,
                });
            }
            return Ok(Geographic::from_degrees(x, y));
        }

        let (lon, lat) = Self::transform(&params.proj_string(), WGS84_DEF, x, y)?;
        Ok(Geographic::from_degrees(lon, lat))
    }

    fn from_wgs84(&self, params: &ProjectionParameters, geo: Geographic) -> Result<(f64, f64), ProjectionError> {
        let (lon, lat) = geo.to_degrees();
        if params.is_geographic() {
            return Ok((lon, lat));
        }
        Self::transform(WGS84_DEF, &params.proj_string(), lon, lat)
    }

    fn description(&self) -> &'static str {
        "proj (PROJ library)"
    }
}
