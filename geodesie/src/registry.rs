//! Registre des systèmes de coordonnées
//!
//! Table statique des paramètres de projection et des libellés. Un `match`
//! exhaustif sur [`CoordinateSystem`] garantit à la compilation que chaque
//! système a exactement une entrée.

use std::fmt::Write as _;

use serde::Serialize;

use crate::primitive::{Ellipsoid, Helmert};
use crate::types::CoordinateSystem;

/// Méridien de Paris, en degrés à l'est de Greenwich (2°20'14.025")
pub const PARIS_MERIDIAN: f64 = 2.337229166667;

/// Paramètres d'une projection conique conforme (angles en degrés)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConicParameters {
    /// Premier parallèle standard
    pub lat_1: f64,
    /// Deuxième parallèle standard (égal au premier pour une conique tangente)
    pub lat_2: f64,
    /// Latitude origine
    pub lat_0: f64,
    /// Longitude origine, relative au méridien d'origine
    pub lon_0: f64,
    /// Facteur d'échelle à l'origine
    pub k_0: f64,
    /// False easting
    pub x_0: f64,
    /// False northing
    pub y_0: f64,
}

/// Type de projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Coordonnées géographiques passées telles quelles (longitude, latitude)
    Geographic,
    /// Conique conforme de Lambert
    ConformalConic(ConicParameters),
}

/// Unité linéaire des coordonnées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearUnit {
    Degree,
    Metre,
}

/// Paramètres immuables d'un système
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionParameters {
    /// Code EPSG
    pub epsg: u32,
    pub kind: ProjectionKind,
    pub ellipsoid: Ellipsoid,
    /// Changement de datum vers WGS84 (zéro pour RGF93, confondu avec WGS84)
    pub to_wgs84: Helmert,
    /// Méridien d'origine, en degrés à l'est de Greenwich
    pub prime_meridian: f64,
    pub unit: LinearUnit,
}

impl ProjectionParameters {
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, ProjectionKind::Geographic)
    }

    /// Paramètres coniques, si le système est projeté
    pub fn conic(&self) -> Option<&ConicParameters> {
        match &self.kind {
            ProjectionKind::ConformalConic(c) => Some(c),
            ProjectionKind::Geographic => None,
        }
    }

    /// Vrai si les deux systèmes ont la même définition (au code EPSG près)
    pub fn same_definition(&self, other: &ProjectionParameters) -> bool {
        self.kind == other.kind
            && self.ellipsoid == other.ellipsoid
            && self.to_wgs84 == other.to_wgs84
            && self.prime_meridian == other.prime_meridian
            && self.unit == other.unit
    }

    /// Définition PROJ équivalente
    pub fn proj_string(&self) -> String {
        let c = match &self.kind {
            ProjectionKind::Geographic => return "+proj=longlat +datum=WGS84 +no_defs".to_string(),
            ProjectionKind::ConformalConic(c) => c,
        };

        let mut def = format!(
            "+proj=lcc +lat_1={} +lat_2={} +lat_0={} +lon_0={} +k_0={} +x_0={} +y_0={} {}",
            c.lat_1, c.lat_2, c.lat_0, c.lon_0, c.k_0, c.x_0, c.y_0, self.ellipsoid.proj_def
        );
        let towgs84: Vec<String> = self
            .to_wgs84
            .to_array()
            .iter()
            .map(|v| v.to_string())
            .collect();
        let _ = write!(def, " +towgs84={}", towgs84.join(","));
        if self.prime_meridian != 0.0 {
            let _ = write!(def, " +pm={}", self.prime_meridian);
        }
        def.push_str(" +units=m +no_defs");
        def
    }
}

const NTF_TO_WGS84: Helmert = Helmert::translation(-168.0, -60.0, 320.0);

const WGS84: ProjectionParameters = ProjectionParameters {
    epsg: 4326,
    kind: ProjectionKind::Geographic,
    ellipsoid: Ellipsoid::WGS84,
    to_wgs84: Helmert::ZERO,
    prime_meridian: 0.0,
    unit: LinearUnit::Degree,
};

/// Repère horizontal de l'altimétrie : WGS84 géographique
const NGF_IGN69: ProjectionParameters = ProjectionParameters {
    epsg: 5720,
    ..WGS84
};

const LAMBERT_93: ProjectionParameters = rgf93_conic(2154, 49.0, 44.0, 46.5, 700000.0, 6600000.0);

const CC42: ProjectionParameters = rgf93_conic(3942, 41.25, 42.75, 42.0, 1700000.0, 1200000.0);
const CC43: ProjectionParameters = rgf93_conic(3943, 42.25, 43.75, 43.0, 1700000.0, 2200000.0);
const CC44: ProjectionParameters = rgf93_conic(3944, 43.25, 44.75, 44.0, 1700000.0, 3200000.0);
const CC45: ProjectionParameters = rgf93_conic(3945, 44.25, 45.75, 45.0, 1700000.0, 4200000.0);
const CC46: ProjectionParameters = rgf93_conic(3946, 45.25, 46.75, 46.0, 1700000.0, 5200000.0);
const CC47: ProjectionParameters = rgf93_conic(3947, 46.25, 47.75, 47.0, 1700000.0, 6200000.0);
const CC48: ProjectionParameters = rgf93_conic(3948, 47.25, 48.75, 48.0, 1700000.0, 7200000.0);
const CC49: ProjectionParameters = rgf93_conic(3949, 48.25, 49.75, 49.0, 1700000.0, 8200000.0);
const CC50: ProjectionParameters = rgf93_conic(3950, 49.25, 50.75, 50.0, 1700000.0, 9200000.0);

const LAMBERT_I: ProjectionParameters = ntf_conic(27561, 49.5, 0.999877341, 600000.0, 200000.0);
const LAMBERT_II: ProjectionParameters = ntf_conic(27562, 46.8, 0.99987742, 600000.0, 200000.0);
const LAMBERT_III: ProjectionParameters = ntf_conic(27563, 44.1, 0.999877499, 600000.0, 200000.0);
const LAMBERT_IV: ProjectionParameters = ntf_conic(27564, 42.165, 0.99994471, 234.358, 185861.369);
const LAMBERT_II_ETENDU: ProjectionParameters =
    ntf_conic(27572, 46.8, 0.99987742, 600000.0, 2200000.0);

/// Conique sécante RGF93 (GRS80, méridien origine 3°E)
const fn rgf93_conic(
    epsg: u32,
    lat_1: f64,
    lat_2: f64,
    lat_0: f64,
    x_0: f64,
    y_0: f64,
) -> ProjectionParameters {
    ProjectionParameters {
        epsg,
        kind: ProjectionKind::ConformalConic(ConicParameters {
            lat_1,
            lat_2,
            lat_0,
            lon_0: 3.0,
            k_0: 1.0,
            x_0,
            y_0,
        }),
        ellipsoid: Ellipsoid::GRS80,
        to_wgs84: Helmert::ZERO,
        prime_meridian: 0.0,
        unit: LinearUnit::Metre,
    }
}

/// Conique tangente NTF (Clarke 1880 IGN, méridien de Paris)
const fn ntf_conic(epsg: u32, lat_0: f64, k_0: f64, x_0: f64, y_0: f64) -> ProjectionParameters {
    ProjectionParameters {
        epsg,
        kind: ProjectionKind::ConformalConic(ConicParameters {
            lat_1: lat_0,
            lat_2: lat_0,
            lat_0,
            lon_0: 0.0,
            k_0,
            x_0,
            y_0,
        }),
        ellipsoid: Ellipsoid::CLARKE_1880_IGN,
        to_wgs84: NTF_TO_WGS84,
        prime_meridian: PARIS_MERIDIAN,
        unit: LinearUnit::Metre,
    }
}

/// Paramètres de projection d'un système
pub fn parameters_of(system: CoordinateSystem) -> &'static ProjectionParameters {
    use CoordinateSystem::*;

    match system {
        Wgs84 => &WGS84,
        Lambert93 => &LAMBERT_93,
        Cc42 => &CC42,
        Cc43 => &CC43,
        Cc44 => &CC44,
        Cc45 => &CC45,
        Cc46 => &CC46,
        Cc47 => &CC47,
        Cc48 => &CC48,
        Cc49 => &CC49,
        Cc50 => &CC50,
        LambertI => &LAMBERT_I,
        LambertII => &LAMBERT_II,
        LambertIII => &LAMBERT_III,
        LambertIV => &LAMBERT_IV,
        LambertIIEtendu => &LAMBERT_II_ETENDU,
        NgfIgn69 => &NGF_IGN69,
    }
}

/// Libellé lisible d'un système
pub fn label_of(system: CoordinateSystem) -> &'static str {
    use CoordinateSystem::*;

    match system {
        Wgs84 => "WGS84 (GPS)",
        Lambert93 => "Lambert 93 (France)",
        Cc42 => "Lambert CC42",
        Cc43 => "Lambert CC43",
        Cc44 => "Lambert CC44",
        Cc45 => "Lambert CC45",
        Cc46 => "Lambert CC46",
        Cc47 => "Lambert CC47",
        Cc48 => "Lambert CC48",
        Cc49 => "Lambert CC49",
        Cc50 => "Lambert CC50",
        LambertI => "Lambert I (Nord)",
        LambertII => "Lambert II (Centre)",
        LambertIII => "Lambert III (Sud)",
        LambertIV => "Lambert IV (Corse)",
        LambertIIEtendu => "Lambert II Étendu",
        NgfIgn69 => "Alt. NGF-IGN69",
    }
}
