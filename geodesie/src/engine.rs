//! Moteur de conversion entre systèmes
//!
//! Chaque conversion passe par la position WGS84 du point : inverse du
//! système source, changement de datum, puis projection vers la cible.
//! Cette position sert aussi au calcul de l'altitude orthométrique.

use geo::{Coord, Geometry, MapCoords};
use tracing::debug;

use crate::error::ProjectionError;
use crate::geoid::{GeoidModel, LinearGeoid};
use crate::primitive::{Geographic, LitePrimitive, ProjectionPrimitive};
use crate::registry::parameters_of;
use crate::types::{CoordinateSystem, Coordinates, RawPoint};

/// Convertisseur : primitive de projection + modèle de géoïde injectés
///
/// Sans état mutable : partageable entre threads pour le traitement par lot.
#[derive(Debug, Clone, Default)]
pub struct Converter<G = LinearGeoid, P = LitePrimitive> {
    geoid: G,
    primitive: P,
}

impl Converter {
    /// Convertisseur par défaut : Rust pur, géoïde linéaire
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: GeoidModel, P: ProjectionPrimitive> Converter<G, P> {
    pub fn with_parts(geoid: G, primitive: P) -> Self {
        Self { geoid, primitive }
    }

    /// Remplace le modèle de géoïde
    pub fn with_geoid<G2: GeoidModel>(self, geoid: G2) -> Converter<G2, P> {
        Converter {
            geoid,
            primitive: self.primitive,
        }
    }

    /// Remplace la primitive de projection
    pub fn with_primitive<P2: ProjectionPrimitive>(self, primitive: P2) -> Converter<G, P2> {
        Converter {
            geoid: self.geoid,
            primitive,
        }
    }

    pub fn geoid(&self) -> &G {
        &self.geoid
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Position WGS84 d'un point exprimé dans `system`
    pub fn geographic_position(
        &self,
        x: f64,
        y: f64,
        system: CoordinateSystem,
    ) -> Result<Geographic, ProjectionError> {
        self.primitive.to_wgs84(parameters_of(system), x, y)
    }

    /// Convertit un point de `from` vers `to`
    ///
    /// `z` est recopié tel quel ; `h = z - N(lat, lon)` est recalculé à la
    /// position WGS84 du point. Sans `z`, pas de `h`.
    pub fn convert(
        &self,
        point: RawPoint,
        from: CoordinateSystem,
        to: CoordinateSystem,
    ) -> Result<Coordinates, ProjectionError> {
        let from_params = parameters_of(from);
        let to_params = parameters_of(to);

        let geo = self.primitive.to_wgs84(from_params, point.x, point.y)?;

        let (x, y) = if from == to || from_params.same_definition(to_params) {
            (point.x, point.y)
        } else {
            self.primitive.from_wgs84(to_params, geo)?
        };

        let h = point.z.map(|z| {
            let (lon, lat) = geo.to_degrees();
            z - self.geoid.estimate_separation(lat, lon)
        });

        Ok(Coordinates {
            x,
            y,
            z: point.z,
            h,
            system: to,
        })
    }

    /// Représentation du point dans chaque système planimétrique
    ///
    /// Une entrée par système, dans l'ordre de déclaration ; une cible en
    /// échec donne une entrée `Err` sans affecter les autres.
    pub fn project_to_all(&self, input: &Coordinates) -> Vec<Result<Coordinates, ProjectionError>> {
        let point = RawPoint::from(input);
        CoordinateSystem::horizontal()
            .map(|target| {
                let result = self.convert(point, input.system, target);
                if let Err(ref e) = result {
                    debug!(from = %input.system, to = %target, error = %e, "Fan-out target failed");
                }
                result
            })
            .collect()
    }

    /// Reprojette les sommets d'une géométrie
    pub fn transform_geometry(
        &self,
        geom: &Geometry,
        from: CoordinateSystem,
        to: CoordinateSystem,
    ) -> Result<Geometry, ProjectionError> {
        if from == to {
            return Ok(geom.clone());
        }
        geom.try_map_coords(|c: Coord| {
            let out = self.convert(RawPoint::new(c.x, c.y), from, to)?;
            Ok(Coord { x: out.x, y: out.y })
        })
    }
}
