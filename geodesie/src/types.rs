//! Types de données pour le crate geodesie

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeodesieError, RowError};

/// Système de coordonnées supporté
///
/// L'ordre de déclaration est l'ordre d'affichage : le fan-out et les
/// tableaux de résultats le suivent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// WGS84 géographique (GPS)
    #[serde(rename = "EPSG:4326")]
    Wgs84,
    /// RGF93 / Lambert 93
    #[serde(rename = "EPSG:2154")]
    Lambert93,
    #[serde(rename = "EPSG:3942")]
    Cc42,
    #[serde(rename = "EPSG:3943")]
    Cc43,
    #[serde(rename = "EPSG:3944")]
    Cc44,
    #[serde(rename = "EPSG:3945")]
    Cc45,
    #[serde(rename = "EPSG:3946")]
    Cc46,
    #[serde(rename = "EPSG:3947")]
    Cc47,
    #[serde(rename = "EPSG:3948")]
    Cc48,
    #[serde(rename = "EPSG:3949")]
    Cc49,
    #[serde(rename = "EPSG:3950")]
    Cc50,
    /// NTF (Paris) / Lambert zone I
    #[serde(rename = "EPSG:27561")]
    LambertI,
    /// NTF (Paris) / Lambert zone II
    #[serde(rename = "EPSG:27562")]
    LambertII,
    /// NTF (Paris) / Lambert zone III
    #[serde(rename = "EPSG:27563")]
    LambertIII,
    /// NTF (Paris) / Lambert zone IV (Corse)
    #[serde(rename = "EPSG:27564")]
    LambertIV,
    /// NTF (Paris) / Lambert II étendu
    #[serde(rename = "EPSG:27572")]
    LambertIIEtendu,
    /// Altitudes NGF-IGN69 : pseudo-système, uniquement un libellé d'altimétrie
    #[serde(rename = "EPSG:5720")]
    NgfIgn69,
}

impl CoordinateSystem {
    /// Tous les systèmes, dans l'ordre de déclaration
    pub const ALL: [CoordinateSystem; 17] = [
        Self::Wgs84,
        Self::Lambert93,
        Self::Cc42,
        Self::Cc43,
        Self::Cc44,
        Self::Cc45,
        Self::Cc46,
        Self::Cc47,
        Self::Cc48,
        Self::Cc49,
        Self::Cc50,
        Self::LambertI,
        Self::LambertII,
        Self::LambertIII,
        Self::LambertIV,
        Self::LambertIIEtendu,
        Self::NgfIgn69,
    ];

    /// Les neuf zones coniques conformes, du sud au nord
    pub const CC_ZONES: [CoordinateSystem; 9] = [
        Self::Cc42,
        Self::Cc43,
        Self::Cc44,
        Self::Cc45,
        Self::Cc46,
        Self::Cc47,
        Self::Cc48,
        Self::Cc49,
        Self::Cc50,
    ];

    /// Les quatre zones Lambert historiques (NTF)
    pub const NTF_ZONES: [CoordinateSystem; 4] = [
        Self::LambertI,
        Self::LambertII,
        Self::LambertIII,
        Self::LambertIV,
    ];

    /// Code EPSG numérique
    pub fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::Lambert93 => 2154,
            Self::Cc42 => 3942,
            Self::Cc43 => 3943,
            Self::Cc44 => 3944,
            Self::Cc45 => 3945,
            Self::Cc46 => 3946,
            Self::Cc47 => 3947,
            Self::Cc48 => 3948,
            Self::Cc49 => 3949,
            Self::Cc50 => 3950,
            Self::LambertI => 27561,
            Self::LambertII => 27562,
            Self::LambertIII => 27563,
            Self::LambertIV => 27564,
            Self::LambertIIEtendu => 27572,
            Self::NgfIgn69 => 5720,
        }
    }

    /// Retrouve un système depuis son code EPSG
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.epsg() == epsg)
    }

    /// Identifiant stable "EPSG:xxxx"
    pub fn code(self) -> String {
        format!("EPSG:{}", self.epsg())
    }

    /// Vrai pour le pseudo-système d'altimétrie
    pub fn is_altimetry_only(self) -> bool {
        self == Self::NgfIgn69
    }

    /// Systèmes planimétriques (tous sauf l'altimétrie), ordre de déclaration
    pub fn horizontal() -> impl Iterator<Item = CoordinateSystem> {
        Self::ALL.into_iter().filter(|s| !s.is_altimetry_only())
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for CoordinateSystem {
    type Err = GeodesieError;

    /// Accepte "EPSG:2154", "2154" et les alias usuels ("L93", "CC46", "L2E"...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| if matches!(c, 'é' | 'É') { 'E' } else { c })
            .collect::<String>()
            .to_ascii_uppercase();

        let code = normalized.strip_prefix("EPSG:").unwrap_or(&normalized);
        if let Ok(epsg) = code.parse::<u32>() {
            return Self::from_epsg(epsg).ok_or_else(|| GeodesieError::UnknownSystem(s.to_string()));
        }

        let system = match code {
            "WGS84" | "GPS" | "LONLAT" => Self::Wgs84,
            "L93" | "LAMBERT93" | "RGF93" => Self::Lambert93,
            "CC42" => Self::Cc42,
            "CC43" => Self::Cc43,
            "CC44" => Self::Cc44,
            "CC45" => Self::Cc45,
            "CC46" => Self::Cc46,
            "CC47" => Self::Cc47,
            "CC48" => Self::Cc48,
            "CC49" => Self::Cc49,
            "CC50" => Self::Cc50,
            "L1" | "LI" | "LAMBERT1" | "LAMBERTI" => Self::LambertI,
            "L2" | "LII" | "LAMBERT2" | "LAMBERTII" => Self::LambertII,
            "L3" | "LIII" | "LAMBERT3" | "LAMBERTIII" => Self::LambertIII,
            "L4" | "LIV" | "LAMBERT4" | "LAMBERTIV" => Self::LambertIV,
            "L2E" | "LIIE" | "LAMBERT2E" | "LAMBERT2ETENDU" | "LAMBERTIIETENDU" => {
                Self::LambertIIEtendu
            }
            "NGF" | "IGN69" | "NGFIGN69" => Self::NgfIgn69,
            _ => return Err(GeodesieError::UnknownSystem(s.to_string())),
        };
        Ok(system)
    }
}

/// Point brut à convertir : X/Y dans le système source, Z ellipsoïdal optionnel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl RawPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

impl From<&Coordinates> for RawPoint {
    fn from(c: &Coordinates) -> Self {
        Self {
            x: c.x,
            y: c.y,
            z: c.z,
        }
    }
}

/// Point exprimé dans un système donné
///
/// Jamais modifié après construction : chaque conversion produit une nouvelle valeur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// X (mètres) ou longitude (degrés) selon le système
    pub x: f64,

    /// Y (mètres) ou latitude (degrés) selon le système
    pub y: f64,

    /// Hauteur ellipsoïdale, indépendante du système
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,

    /// Altitude orthométrique dérivée : h = z - N(lat, lon)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,

    /// Système de coordonnées
    pub system: CoordinateSystem,
}

impl Coordinates {
    pub fn new(x: f64, y: f64, system: CoordinateSystem) -> Self {
        Self {
            x,
            y,
            z: None,
            h: None,
            system,
        }
    }

    /// Même point avec une hauteur ellipsoïdale
    pub fn with_z(self, z: f64) -> Self {
        Self { z: Some(z), ..self }
    }
}

/// Interprétation candidate d'un couple de valeurs sans système déclaré
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hypothesis {
    pub system: CoordinateSystem,
    /// Longitude WGS84 (degrés)
    pub lon: f64,
    /// Latitude WGS84 (degrés)
    pub lat: f64,
    pub label: &'static str,
}

/// Résultat d'une ligne de lot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResult {
    /// Texte original de la ligne
    pub original: String,

    /// Une entrée par système planimétrique, vide en cas d'erreur
    pub converted: Vec<Coordinates>,

    /// Erreur de la ligne (lecture ou conversion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RowError>,
}

impl BulkResult {
    pub fn success(original: impl Into<String>, converted: Vec<Coordinates>) -> Self {
        Self {
            original: original.into(),
            converted,
            error: None,
        }
    }

    pub fn failure(original: impl Into<String>, error: impl Into<RowError>) -> Self {
        Self {
            original: original.into(),
            converted: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Résultat pour un système donné
    pub fn get(&self, system: CoordinateSystem) -> Option<&Coordinates> {
        self.converted.iter().find(|c| c.system == system)
    }
}
