//! Primitive de projection géodésique
//!
//! Deux implémentations du trait [`ProjectionPrimitive`] :
//! - [`LitePrimitive`] : Rust pur, conique conforme de Lambert + Helmert
//! - `ProjPrimitive` : bibliothèque PROJ (feature `proj`)
//!
//! Le pivot commun est la position géographique WGS84.

mod ellipsoid;
mod helmert;
mod lambert;
#[cfg(feature = "proj")]
mod proj;

pub use ellipsoid::Ellipsoid;
pub use helmert::Helmert;
#[cfg(feature = "proj")]
pub use self::proj::ProjPrimitive;

use crate::error::{ProjectionError, Stage};
use crate::registry::{ProjectionKind, ProjectionParameters};
use lambert::LambertConic;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
    /// Hauteur ellipsoïdale en mètres, portée à travers les changements de datum
    pub h: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat, h: 0.0 }
    }

    /// Convertit en degrés (longitude, latitude)
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(lon_deg.to_radians(), lat_deg.to_radians())
    }

    pub fn with_height(self, h: f64) -> Self {
        Self { h, ..self }
    }

    fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.h.is_finite()
    }
}

/// Projection d'un système vers WGS84 et retour
///
/// Les implémentations sont sans état mutable et partageables entre threads.
pub trait ProjectionPrimitive: Send + Sync {
    /// Coordonnées natives du système → position WGS84
    fn to_wgs84(&self, params: &ProjectionParameters, x: f64, y: f64) -> Result<Geographic, ProjectionError>;

    /// Position WGS84 → coordonnées natives du système
    fn from_wgs84(&self, params: &ProjectionParameters, geo: Geographic) -> Result<(f64, f64), ProjectionError>;

    /// Description de l'implémentation
    fn description(&self) -> &'static str;
}

impl<P: ProjectionPrimitive + ?Sized> ProjectionPrimitive for Box<P> {
    fn to_wgs84(&self, params: &ProjectionParameters, x: f64, y: f64) -> Result<Geographic, ProjectionError> {
        (**self).to_wgs84(params, x, y)
    }

    fn from_wgs84(&self, params: &ProjectionParameters, geo: Geographic) -> Result<(f64, f64), ProjectionError> {
        (**self).from_wgs84(params, geo)
    }

    fn description(&self) -> &'static str {
        (**self).description()
    }
}

/// Projection légère en Rust pur
#[derive(Debug, Clone, Copy, Default)]
pub struct LitePrimitive;

impl ProjectionPrimitive for LitePrimitive {
    fn to_wgs84(&self, params: &ProjectionParameters, x: f64, y: f64) -> Result<Geographic, ProjectionError> {
        let out_of_domain = ProjectionError::OutOfDomain {
            epsg: params.epsg,
            x,
            y,
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(out_of_domain);
        }

        // Étape 1: Source → Géographique (ellipsoïde local)
        let local = match &params.kind {
            ProjectionKind::Geographic => {
                if y.abs() > 90.0 {
                    return Err(out_of_domain);
                }
                return Ok(Geographic::from_degrees(x, y));
            }
            ProjectionKind::ConformalConic(c) => {
                let mut geo = LambertConic::new(c, &params.ellipsoid).inverse(x, y);
                geo.lon += params.prime_meridian.to_radians();
                geo
            }
        };
        if !local.is_finite() {
            return Err(non_finite(params, Stage::Inverse));
        }

        // Étape 2: Changement de datum
        let wgs = helmert::to_wgs84(local, &params.ellipsoid, &params.to_wgs84);
        if !wgs.is_finite() {
            return Err(non_finite(params, Stage::DatumShift));
        }
        Ok(wgs)
    }

    fn from_wgs84(&self, params: &ProjectionParameters, geo: Geographic) -> Result<(f64, f64), ProjectionError> {
        if !geo.is_finite() || geo.lat.abs() > std::f64::consts::FRAC_PI_2 {
            let (x, y) = geo.to_degrees();
            return Err(ProjectionError::OutOfDomain {
                epsg: params.epsg,
                x,
                y,
            });
        }

        let c = match &params.kind {
            ProjectionKind::Geographic => return Ok(geo.to_degrees()),
            ProjectionKind::ConformalConic(c) => c,
        };

        let mut local = helmert::from_wgs84(geo, &params.ellipsoid, &params.to_wgs84);
        if !local.is_finite() {
            return Err(non_finite(params, Stage::DatumShift));
        }
        local.lon -= params.prime_meridian.to_radians();

        let (x, y) = LambertConic::new(c, &params.ellipsoid).forward(local);
        if !x.is_finite() || !y.is_finite() {
            return Err(non_finite(params, Stage::Forward));
        }
        Ok((x, y))
    }

    fn description(&self) -> &'static str {
        "lite (pure Rust)"
    }
}

fn non_finite(params: &ProjectionParameters, stage: Stage) -> ProjectionError {
    ProjectionError::NonFinite {
        epsg: params.epsg,
        stage,
    }
}
