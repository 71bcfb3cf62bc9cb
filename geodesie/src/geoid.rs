//! Modèles de géoïde : séparation N entre ellipsoïde et géoïde
//!
//! Altitude orthométrique = hauteur ellipsoïdale - N(lat, lon).
//!
//! [`LinearGeoid`] n'est qu'une approximation grossière, linéaire en
//! latitude. Une grille réelle (RAF20 ou autre) se branche via
//! [`GridGeoid`] ou toute implémentation de [`GeoidModel`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::GeodesieError;

/// Fournisseur de séparation du géoïde
pub trait GeoidModel: Send + Sync {
    /// Séparation N en mètres au point (latitude, longitude) en degrés WGS84
    fn estimate_separation(&self, lat: f64, lon: f64) -> f64;
}

impl<G: GeoidModel + ?Sized> GeoidModel for Box<G> {
    fn estimate_separation(&self, lat: f64, lon: f64) -> f64 {
        (**self).estimate_separation(lat, lon)
    }
}

impl<G: GeoidModel + ?Sized> GeoidModel for &G {
    fn estimate_separation(&self, lat: f64, lon: f64) -> f64 {
        (**self).estimate_separation(lat, lon)
    }
}

/// Estimation linéaire en latitude : N = 44 + (lat - 42) × 0.8
///
/// Placeholder : ne remplace pas une grille de géoïde.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearGeoid;

impl LinearGeoid {
    /// Séparation à la latitude de référence (mètres)
    pub const BASE: f64 = 44.0;
    /// Latitude de référence (degrés)
    pub const LAT_REF: f64 = 42.0;
    /// Pente (mètres par degré de latitude)
    pub const SLOPE: f64 = 0.8;
}

impl GeoidModel for LinearGeoid {
    fn estimate_separation(&self, lat: f64, _lon: f64) -> f64 {
        Self::BASE + (lat - Self::LAT_REF) * Self::SLOPE
    }
}

/// Séparation estimée par le modèle linéaire
pub fn estimate_separation(lat: f64, lon: f64) -> f64 {
    LinearGeoid.estimate_separation(lat, lon)
}

/// Taille maximale d'une grille (nœuds)
const MAX_GRID_NODES: usize = 100_000_000;

/// Grille régulière latitude/longitude, interpolation bilinéaire
///
/// Format texte : une ligne d'en-tête `lat_min lat_max lon_min lon_max dlat dlon`
/// puis les valeurs, rangées du sud au nord, d'ouest en est. Les valeurs
/// peuvent être réparties librement sur les lignes.
#[derive(Debug, Clone)]
pub struct GridGeoid {
    lat_min: f64,
    lon_min: f64,
    dlat: f64,
    dlon: f64,
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl GridGeoid {
    /// Crée une grille depuis ses valeurs (rangées sud → nord)
    pub fn new(
        lat_min: f64,
        lon_min: f64,
        dlat: f64,
        dlon: f64,
        rows: usize,
        cols: usize,
        values: Vec<f64>,
    ) -> Result<Self, GeodesieError> {
        if rows < 2 || cols < 2 {
            return Err(GeodesieError::invalid_grid(0, "grid needs at least 2x2 nodes"));
        }
        if !(dlat > 0.0 && dlon > 0.0) {
            return Err(GeodesieError::invalid_grid(0, "grid steps must be positive"));
        }
        let expected = rows
            .checked_mul(cols)
            .filter(|&n| n <= MAX_GRID_NODES)
            .ok_or_else(|| GeodesieError::invalid_grid(0, "grid too large"))?;
        if values.len() != expected {
            return Err(GeodesieError::invalid_grid(
                0,
                format!("expected {} values, found {}", expected, values.len()),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeodesieError::invalid_grid(0, "grid contains non-finite values"));
        }

        Ok(Self {
            lat_min,
            lon_min,
            dlat,
            dlon,
            rows,
            cols,
            values,
        })
    }

    /// Charge une grille depuis un fichier texte
    pub fn load(path: &Path) -> Result<Self, GeodesieError> {
        let grid = Self::from_reader(BufReader::new(File::open(path)?))?;
        debug!(
            path = %path.display(),
            rows = grid.rows,
            cols = grid.cols,
            "Geoid grid loaded"
        );
        Ok(grid)
    }

    /// Lit une grille depuis un flux texte
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, GeodesieError> {
        let mut header: Option<[f64; 6]> = None;
        let mut values = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let numbers: Result<Vec<f64>, _> = content
                .split_whitespace()
                .map(|tok| {
                    fast_float::parse::<f64, _>(tok).map_err(|_| {
                        GeodesieError::invalid_grid(line_no, format!("not a number: {}", tok))
                    })
                })
                .collect();
            let numbers = numbers?;

            if header.is_none() {
                let h: [f64; 6] = numbers.as_slice().try_into().map_err(|_| {
                    GeodesieError::invalid_grid(
                        line_no,
                        "header must be: lat_min lat_max lon_min lon_max dlat dlon",
                    )
                })?;
                header = Some(h);
            } else {
                values.extend(numbers);
            }
        }

        let [lat_min, lat_max, lon_min, lon_max, dlat, dlon] =
            header.ok_or_else(|| GeodesieError::invalid_grid(0, "empty grid file"))?;
        if !(dlat > 0.0 && dlon > 0.0) || lat_max <= lat_min || lon_max <= lon_min {
            return Err(GeodesieError::invalid_grid(1, "inconsistent grid extent"));
        }

        let rows = node_count(lat_max - lat_min, dlat)
            .ok_or_else(|| GeodesieError::invalid_grid(1, "latitude extent does not fit the step"))?;
        let cols = node_count(lon_max - lon_min, dlon)
            .ok_or_else(|| GeodesieError::invalid_grid(1, "longitude extent does not fit the step"))?;
        Self::new(lat_min, lon_min, dlat, dlon, rows, cols, values)
    }

    fn node(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }
}

/// Nombre de nœuds sur un axe, `None` si le rapport étendue / pas est inexploitable
fn node_count(extent: f64, step: f64) -> Option<usize> {
    let steps = (extent / step).round();
    if !steps.is_finite() || steps < 1.0 || steps >= MAX_GRID_NODES as f64 {
        return None;
    }
    (steps as usize).checked_add(1)
}

impl GeoidModel for GridGeoid {
    /// Hors de la grille, la valeur du bord le plus proche est utilisée
    fn estimate_separation(&self, lat: f64, lon: f64) -> f64 {
        let max_row = (self.rows - 1) as f64;
        let max_col = (self.cols - 1) as f64;
        let fr = ((lat - self.lat_min) / self.dlat).clamp(0.0, max_row);
        let fc = ((lon - self.lon_min) / self.dlon).clamp(0.0, max_col);
        // NaN en entrée : nœud d'origine
        let (fr, fc) = (
            if fr.is_nan() { 0.0 } else { fr },
            if fc.is_nan() { 0.0 } else { fc },
        );

        let r0 = (fr.floor() as usize).min(self.rows - 2);
        let c0 = (fc.floor() as usize).min(self.cols - 2);
        let (tr, tc) = (fr - r0 as f64, fc - c0 as f64);

        let south = self.node(r0, c0) * (1.0 - tc) + self.node(r0, c0 + 1) * tc;
        let north = self.node(r0 + 1, c0) * (1.0 - tc) + self.node(r0 + 1, c0 + 1) * tc;
        south * (1.0 - tr) + north * tr
    }
}
