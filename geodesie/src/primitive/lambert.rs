//! Projection conique conforme de Lambert
//!
//! Formulation IGN (latitude isométrique), à un parallèle standard avec
//! facteur d'échelle k0 (NTF Lambert I-IV) ou à deux parallèles
//! standards (Lambert 93, CC42-CC50).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::ellipsoid::Ellipsoid;
use super::Geographic;
use crate::registry::ConicParameters;

/// Constantes dérivées d'une projection conique
#[derive(Debug, Clone, Copy)]
pub(crate) struct LambertConic {
    /// Exposant de la projection
    n: f64,
    /// Constante de projection
    c: f64,
    /// Rayon à l'origine
    r0: f64,
    /// Longitude origine (radians, relative au méridien d'origine)
    lon0: f64,
    x0: f64,
    y0: f64,
    e: f64,
}

impl LambertConic {
    pub(crate) fn new(params: &ConicParameters, ellipsoid: &Ellipsoid) -> Self {
        let e = ellipsoid.e();
        let lat0 = params.lat_0.to_radians();
        let lat1 = params.lat_1.to_radians();
        let lat2 = params.lat_2.to_radians();

        let n1 = ellipsoid.grande_normale(lat1);
        let iso_lat1 = isometric_latitude(lat1, e);

        // Sécante (2 parallèles) ou tangente (1 parallèle + k0)
        let n = if (lat1 - lat2).abs() > 1e-12 {
            let n2 = ellipsoid.grande_normale(lat2);
            let iso_lat2 = isometric_latitude(lat2, e);
            ((n1 * lat1.cos()).ln() - (n2 * lat2.cos()).ln()) / (iso_lat2 - iso_lat1)
        } else {
            lat1.sin()
        };

        let c = params.k_0 * n1 * lat1.cos() / n * (n * iso_lat1).exp();
        let r0 = c * (-n * isometric_latitude(lat0, e)).exp();

        Self {
            n,
            c,
            r0,
            lon0: params.lon_0.to_radians(),
            x0: params.x_0,
            y0: params.y_0,
            e,
        }
    }

    /// Plan → géographique (radians, méridien d'origine du système)
    pub(crate) fn inverse(&self, x: f64, y: f64) -> Geographic {
        let dx = x - self.x0;
        let dy = y - self.y0;

        let (r, gamma) = if self.n < 0.0 {
            (-dx.hypot(self.r0 - dy), (-dx).atan2(dy - self.r0))
        } else {
            (dx.hypot(self.r0 - dy), dx.atan2(self.r0 - dy))
        };

        let iso_lat = -(r / self.c).ln() / self.n;
        let lat = latitude_from_isometric(iso_lat, self.e);
        let lon = self.lon0 + gamma / self.n;

        Geographic::new(lon, lat)
    }

    /// Géographique (radians, méridien d'origine du système) → plan
    pub(crate) fn forward(&self, geo: Geographic) -> (f64, f64) {
        let r = self.c * (-self.n * isometric_latitude(geo.lat, self.e)).exp();
        let gamma = self.n * (geo.lon - self.lon0);

        let x = self.x0 + r * gamma.sin();
        let y = self.y0 + self.r0 - r * gamma.cos();
        (x, y)
    }
}

/// Calcule la latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Calcule la latitude depuis la latitude isométrique (itératif)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - FRAC_PI_2;

    for _ in 0..20 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let new_lat = 2.0 * (iso_lat.exp() * term).atan() - FRAC_PI_2;

        if (new_lat - lat).abs() < 1e-12 {
            return new_lat;
        }
        lat = new_lat;
    }
    lat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::parameters_of;
    use crate::types::CoordinateSystem;

    fn conic(system: CoordinateSystem) -> LambertConic {
        let params = parameters_of(system);
        let cone = params.conic().unwrap();
        LambertConic::new(cone, &params.ellipsoid)
    }

    #[test]
    fn test_lambert93_constants() {
        // Valeurs publiées par l'IGN (NTG_71)
        let l93 = conic(CoordinateSystem::Lambert93);
        assert!((l93.n - 0.7256077650).abs() < 1e-9, "n={}", l93.n);
        assert!((l93.c - 11754255.426).abs() < 1e-2, "c={}", l93.c);
    }

    #[test]
    fn test_origin_maps_to_false_origin() {
        let l93 = conic(CoordinateSystem::Lambert93);
        let geo = l93.inverse(700000.0, 6600000.0);
        let (lon, lat) = geo.to_degrees();
        assert!((lon - 3.0).abs() < 1e-12, "lon={}", lon);
        assert!((lat - 46.5).abs() < 1e-9, "lat={}", lat);
    }

    #[test]
    fn test_paris_eiffel() {
        // Tour Eiffel approximativement
        let geo = conic(CoordinateSystem::Lambert93).inverse(648237.0, 6862107.0);
        let (lon, lat) = geo.to_degrees();

        // Tour Eiffel: 2.2945°E, 48.8584°N
        assert!((lon - 2.2945).abs() < 0.01, "lon={}", lon);
        assert!((lat - 48.8584).abs() < 0.01, "lat={}", lat);
    }

    #[test]
    fn test_marseille() {
        // Vieux-Port approximativement
        let geo = conic(CoordinateSystem::Lambert93).inverse(893193.0, 6245829.0);
        let (lon, lat) = geo.to_degrees();

        // Marseille: 5.37°E, 43.30°N
        assert!((lon - 5.37).abs() < 0.1, "lon={}", lon);
        assert!((lat - 43.30).abs() < 0.1, "lat={}", lat);
    }

    #[test]
    fn test_forward_inverse_tangent_cone() {
        // Lambert II (un parallèle standard, k0 < 1)
        let l2 = conic(CoordinateSystem::LambertII);
        let geo = Geographic::from_degrees(0.5, 47.2);
        let (x, y) = l2.forward(geo);
        let back = l2.inverse(x, y);
        assert!((back.lon - geo.lon).abs() < 1e-12);
        assert!((back.lat - geo.lat).abs() < 1e-12);
    }

    #[test]
    fn test_isometric_latitude_inverse() {
        let e = Ellipsoid::GRS80.e();
        for deg in [-60.0_f64, -10.0, 0.0, 42.0, 46.5, 51.0, 80.0] {
            let lat = deg.to_radians();
            let back = latitude_from_isometric(isometric_latitude(lat, e), e);
            assert!((back - lat).abs() < 1e-11, "lat={} back={}", deg, back.to_degrees());
        }
    }
}
