//! Changement de datum par similitude à 7 paramètres (Helmert)
//!
//! Convention "position vector" (celle de `+towgs84` dans PROJ) :
//! X_wgs84 = T + (1 + ds) · R · X_local

use serde::{Deserialize, Serialize};

use super::ellipsoid::Ellipsoid;
use super::Geographic;

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Paramètres de transformation vers WGS84
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Helmert {
    /// Translations (mètres)
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations (secondes d'arc)
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Facteur d'échelle (ppm)
    pub ds: f64,
}

impl Helmert {
    /// Aucun changement de datum : le repère est confondu avec WGS84
    pub const ZERO: Helmert = Helmert::translation(0.0, 0.0, 0.0);

    /// Translation seule (3 paramètres)
    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            tx,
            ty,
            tz,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            ds: 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Les 7 paramètres dans l'ordre de `+towgs84`
    pub fn to_array(&self) -> [f64; 7] {
        [self.tx, self.ty, self.tz, self.rx, self.ry, self.rz, self.ds]
    }

    fn rotation(&self) -> [[f64; 3]; 3] {
        let (rx, ry, rz) = (
            self.rx * ARCSEC_TO_RAD,
            self.ry * ARCSEC_TO_RAD,
            self.rz * ARCSEC_TO_RAD,
        );
        let m = 1.0 + self.ds * 1e-6;
        [
            [m, -m * rz, m * ry],
            [m * rz, m, -m * rx],
            [-m * ry, m * rx, m],
        ]
    }

    /// Repère local → WGS84 (cartésien géocentrique)
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let r = self.rotation();
        [
            self.tx + r[0][0] * p[0] + r[0][1] * p[1] + r[0][2] * p[2],
            self.ty + r[1][0] * p[0] + r[1][1] * p[1] + r[1][2] * p[2],
            self.tz + r[2][0] * p[0] + r[2][1] * p[1] + r[2][2] * p[2],
        ]
    }

    /// WGS84 → repère local (inverse exacte, règle de Cramer)
    pub fn invert(&self, p: [f64; 3]) -> [f64; 3] {
        let r = self.rotation();
        let v = [p[0] - self.tx, p[1] - self.ty, p[2] - self.tz];

        let det3 = |m: [[f64; 3]; 3]| {
            m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
                - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
                + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
        };
        let det = det3(r);

        let mut out = [0.0; 3];
        for (col, value) in out.iter_mut().enumerate() {
            let mut m = r;
            for row in 0..3 {
                m[row][col] = v[row];
            }
            *value = det3(m) / det;
        }
        out
    }
}

impl Default for Helmert {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Géographique → cartésien géocentrique
fn to_cartesian(geo: Geographic, ellipsoid: &Ellipsoid) -> [f64; 3] {
    let n = ellipsoid.grande_normale(geo.lat);
    let (sin_lat, cos_lat) = geo.lat.sin_cos();
    let (sin_lon, cos_lon) = geo.lon.sin_cos();
    [
        (n + geo.h) * cos_lat * cos_lon,
        (n + geo.h) * cos_lat * sin_lon,
        (n * (1.0 - ellipsoid.e2()) + geo.h) * sin_lat,
    ]
}

/// Cartésien géocentrique → géographique (itératif)
fn to_geographic(p: [f64; 3], ellipsoid: &Ellipsoid) -> Geographic {
    let e2 = ellipsoid.e2();
    let lon = p[1].atan2(p[0]);
    let rho = p[0].hypot(p[1]);

    let mut lat = p[2].atan2(rho * (1.0 - e2));
    let mut h = 0.0;
    for _ in 0..20 {
        let n = ellipsoid.grande_normale(lat);
        h = rho / lat.cos() - n;
        let new_lat = p[2].atan2(rho * (1.0 - e2 * n / (n + h)));
        if (new_lat - lat).abs() < 1e-14 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }
    let n = ellipsoid.grande_normale(lat);
    h = if lat.cos().abs() > 1e-10 {
        rho / lat.cos() - n
    } else {
        h
    };

    Geographic { lon, lat, h }
}

/// Position sur l'ellipsoïde local → position WGS84
pub(crate) fn to_wgs84(geo: Geographic, ellipsoid: &Ellipsoid, shift: &Helmert) -> Geographic {
    if shift.is_zero() {
        return geo;
    }
    let p = shift.apply(to_cartesian(geo, ellipsoid));
    to_geographic(p, &Ellipsoid::WGS84)
}

/// Position WGS84 → position sur l'ellipsoïde local
pub(crate) fn from_wgs84(geo: Geographic, ellipsoid: &Ellipsoid, shift: &Helmert) -> Geographic {
    if shift.is_zero() {
        return geo;
    }
    let p = shift.invert(to_cartesian(geo, &Ellipsoid::WGS84));
    to_geographic(p, ellipsoid)
}
