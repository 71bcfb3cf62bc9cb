//! Détection du système d'un couple de valeurs sans système déclaré
//!
//! Deux stratégies :
//! - [`ClassifierConfig::suggest_system`] : boîtes englobantes sur les valeurs
//!   brutes, sans calcul de projection
//! - [`ClassifierConfig::hypotheses`] : projection effective vers WGS84 de
//!   chaque candidat, conservé seulement s'il tombe dans la fenêtre France
//!
//! Les bornes sont des constantes empiriques : un filtre grossier, rien de plus.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::engine::Converter;
use crate::geoid::GeoidModel;
use crate::primitive::ProjectionPrimitive;
use crate::registry::label_of;
use crate::types::{CoordinateSystem, Hypothesis};

/// Candidats testés par projection, dans l'ordre de restitution
pub const HYPOTHESIS_CANDIDATES: [CoordinateSystem; 16] = [
    CoordinateSystem::Lambert93,
    CoordinateSystem::LambertIIEtendu,
    CoordinateSystem::LambertI,
    CoordinateSystem::LambertII,
    CoordinateSystem::LambertIII,
    CoordinateSystem::LambertIV,
    CoordinateSystem::Cc42,
    CoordinateSystem::Cc43,
    CoordinateSystem::Cc44,
    CoordinateSystem::Cc45,
    CoordinateSystem::Cc46,
    CoordinateSystem::Cc47,
    CoordinateSystem::Cc48,
    CoordinateSystem::Cc49,
    CoordinateSystem::Cc50,
    CoordinateSystem::Wgs84,
];

/// Rectangle ouvert : les bords sont exclus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }
}

/// Bornes des deux classifieurs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Degrés plausibles pour WGS84 (lon, lat)
    pub geographic: BoundingBox,
    /// Lambert 93 (mètres)
    pub national: BoundingBox,
    /// Lambert II étendu (mètres)
    pub extended: BoundingBox,
    /// Eastings des zones CC (bornes exclues)
    pub zone_easting_min: f64,
    pub zone_easting_max: f64,
    /// Début de la bande de northing de CC42 ; chaque zone suivante +`zone_band_height`
    pub zone_band_start: f64,
    pub zone_band_height: f64,
    /// Lambert I-IV (mètres)
    pub historical: BoundingBox,
    /// Fenêtre géographique France continentale (lon, lat)
    pub continental: BoundingBox,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            geographic: BoundingBox::new(-10.0, 35.0, 15.0, 55.0),
            national: BoundingBox::new(100_000.0, 6_000_000.0, 1_300_000.0, 7_200_000.0),
            extended: BoundingBox::new(100_000.0, 1_000_000.0, 1_300_000.0, 3_500_000.0),
            zone_easting_min: 1_000_000.0,
            zone_easting_max: 2_300_000.0,
            zone_band_start: 1_000_000.0,
            zone_band_height: 1_000_000.0,
            historical: BoundingBox::new(100_000.0, f64::MIN, 1_300_000.0, 1_000_000.0),
            continental: BoundingBox::new(-15.0, 30.0, 20.0, 60.0),
        }
    }
}

impl ClassifierConfig {
    /// Systèmes dont les boîtes contiennent le couple brut
    ///
    /// Ordre : géographique, national, Lambert II étendu, CC42..CC50,
    /// puis les quatre zones historiques en bloc.
    pub fn suggest_system(&self, x: f64, y: f64) -> Vec<CoordinateSystem> {
        let mut suggestions = Vec::new();

        if self.geographic.contains(x, y) {
            suggestions.push(CoordinateSystem::Wgs84);
        }
        if self.national.contains(x, y) {
            suggestions.push(CoordinateSystem::Lambert93);
        }
        if self.extended.contains(x, y) {
            suggestions.push(CoordinateSystem::LambertIIEtendu);
        }

        if x > self.zone_easting_min && x < self.zone_easting_max {
            for (i, zone) in CoordinateSystem::CC_ZONES.into_iter().enumerate() {
                let low = self.zone_band_start + i as f64 * self.zone_band_height;
                if y >= low && y < low + self.zone_band_height {
                    suggestions.push(zone);
                }
            }
        }

        if self.historical.contains(x, y) {
            suggestions.extend(CoordinateSystem::NTF_ZONES);
        }

        suggestions
    }

    /// Candidats dont la projection WGS84 tombe dans la fenêtre continentale
    ///
    /// Un candidat dont la projection échoue est écarté sans erreur.
    pub fn hypotheses<G: GeoidModel, P: ProjectionPrimitive>(
        &self,
        converter: &Converter<G, P>,
        x: f64,
        y: f64,
    ) -> Vec<Hypothesis> {
        HYPOTHESIS_CANDIDATES
            .into_iter()
            .filter_map(|system| {
                let geo = match converter.geographic_position(x, y, system) {
                    Ok(geo) => geo,
                    Err(e) => {
                        trace!(system = %system, error = %e, "Candidate dropped");
                        return None;
                    }
                };
                let (lon, lat) = geo.to_degrees();
                if !self.continental.contains(lon, lat) {
                    trace!(system = %system, lon, lat, "Candidate outside continental window");
                    return None;
                }
                Some(Hypothesis {
                    system,
                    lon,
                    lat,
                    label: label_of(system),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_lambert93() {
        let s = ClassifierConfig::default().suggest_system(652436.5, 6861545.2);
        assert_eq!(s, vec![CoordinateSystem::Lambert93]);
    }

    #[test]
    fn test_suggest_wgs84() {
        let s = ClassifierConfig::default().suggest_system(2.35, 48.85);
        assert_eq!(s, vec![CoordinateSystem::Wgs84]);
    }

    #[test]
    fn test_suggest_zone_bands() {
        let config = ClassifierConfig::default();
        assert_eq!(config.suggest_system(1_650_000.0, 8_180_000.0), vec![CoordinateSystem::Cc49]);
        // Bande semi-ouverte : 2 000 000 appartient à CC43
        assert_eq!(config.suggest_system(1_700_000.0, 2_000_000.0), vec![CoordinateSystem::Cc43]);
    }

    #[test]
    fn test_suggest_overlapping_boxes() {
        let s = ClassifierConfig::default().suggest_system(1_234_567.0, 2_345_678.0);
        assert_eq!(s, vec![CoordinateSystem::LambertIIEtendu, CoordinateSystem::Cc43]);
    }

    #[test]
    fn test_suggest_historical_block() {
        let s = ClassifierConfig::default().suggest_system(600_000.0, 150_000.0);
        assert_eq!(s, CoordinateSystem::NTF_ZONES.to_vec());
    }

    #[test]
    fn test_suggest_nothing() {
        assert!(ClassifierConfig::default().suggest_system(-5e7, 3e9).is_empty());
    }

    #[test]
    fn test_hypotheses_paris_lambert93() {
        let conv = Converter::new();
        let h = ClassifierConfig::default().hypotheses(&conv, 652436.5, 6861545.2);
        let first = h.first().unwrap();
        assert_eq!(first.system, CoordinateSystem::Lambert93);
        assert_eq!(first.label, "Lambert 93 (France)");
        assert!((first.lon - 2.35).abs() < 0.01, "lon={}", first.lon);
        assert!((first.lat - 48.85).abs() < 0.01, "lat={}", first.lat);
    }

    #[test]
    fn test_hypotheses_wgs84_last() {
        let conv = Converter::new();
        let h = ClassifierConfig::default().hypotheses(&conv, 2.35, 48.85);
        assert_eq!(h.last().unwrap().system, CoordinateSystem::Wgs84);
    }

    #[test]
    fn test_config_partial_json() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"zone_easting_min": 1600000, "zone_easting_max": 1800000}"#).unwrap();
        assert_eq!(config.zone_easting_min, 1_600_000.0);
        assert_eq!(config.national, ClassifierConfig::default().national);
        assert!(config.suggest_system(1_234_567.0, 2_345_678.0) == vec![CoordinateSystem::LambertIIEtendu]);
    }
}
