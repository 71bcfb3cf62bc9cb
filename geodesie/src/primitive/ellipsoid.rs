//! Définitions des ellipsoïdes

use serde::Serialize;

/// Ellipsoïde de référence, défini par ses demi-axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipsoid {
    /// Nom usuel
    pub name: &'static str,
    /// Demi-grand axe (rayon équatorial) en mètres
    pub a: f64,
    /// Demi-petit axe (rayon polaire) en mètres
    pub b: f64,
    /// Fragment de définition PROJ
    #[serde(skip)]
    pub proj_def: &'static str,
}

impl Ellipsoid {
    /// Ellipsoïde WGS84
    pub const WGS84: Ellipsoid = Ellipsoid {
        name: "WGS84",
        a: 6378137.0,
        b: 6378137.0 * (1.0 - 1.0 / 298.257223563),
        proj_def: "+ellps=WGS84",
    };

    /// Ellipsoïde GRS80 (RGF93, Lambert 93 et CC)
    /// Note: Quasi identique à WGS84, différence < 0.1mm
    pub const GRS80: Ellipsoid = Ellipsoid {
        name: "GRS80",
        a: 6378137.0,
        b: 6378137.0 * (1.0 - 1.0 / 298.257222101),
        proj_def: "+ellps=GRS80",
    };

    /// Clarke 1880 IGN (NTF, zones Lambert historiques)
    pub const CLARKE_1880_IGN: Ellipsoid = Ellipsoid {
        name: "Clarke 1880 (IGN)",
        a: 6378249.2,
        b: 6356515.0,
        proj_def: "+a=6378249.2 +b=6356515",
    };

    /// Aplatissement
    pub fn flattening(&self) -> f64 {
        (self.a - self.b) / self.a
    }

    /// Première excentricité au carré
    pub fn e2(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }

    /// Première excentricité
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Grande normale (rayon de courbure dans le premier vertical)
    pub fn grande_normale(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.e2() * lat.sin().powi(2)).sqrt()
    }
}
