//! Export et reprojection GeoJSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geodesie::{CoordinateSystem, Converter, GeoidModel, Hypothesis, ProjectionPrimitive};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use tracing::warn;

use super::ExportRow;

/// Membre `crs` pour un système autre que WGS84
fn crs_member(system: CoordinateSystem) -> Option<JsonObject> {
    if system == CoordinateSystem::Wgs84 {
        return None;
    }
    let crs = serde_json::json!({
        "type": "name",
        "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", system.epsg()) }
    });
    let mut members = JsonObject::new();
    members.insert("crs".to_string(), crs);
    Some(members)
}

fn point(lon: f64, lat: f64) -> Geometry {
    Geometry::new(Value::Point(vec![lon, lat]))
}

fn feature(geometry: Option<Geometry>) -> Feature {
    Feature {
        bbox: None,
        geometry,
        id: None,
        properties: None,
        foreign_members: None,
    }
}

/// Hypothèses de détection, en points WGS84
pub fn hypotheses_collection(x: f64, y: f64, hypotheses: &[Hypothesis]) -> FeatureCollection {
    let features = hypotheses
        .iter()
        .map(|h| {
            let mut feature = feature(Some(point(h.lon, h.lat)));
            feature.set_property("system", h.system.code());
            feature.set_property("epsg", h.system.epsg());
            feature.set_property("label", h.label);
            feature.set_property("input_x", x);
            feature.set_property("input_y", y);
            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Résultats d'un lot : position WGS84 en géométrie, résultat cible en propriétés
///
/// Les lignes en erreur gardent une géométrie nulle et leur message.
pub fn batch_collection(rows: &[ExportRow], to: CoordinateSystem) -> FeatureCollection {
    let features = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut feature = feature(row.wgs84.map(|w| point(w.x, w.y)));
            feature.set_property("row", i + 1);
            feature.set_property("input", row.input.as_str());
            feature.set_property("target_system", to.code());

            if let Some(t) = row.target {
                feature.set_property("x", t.x);
                feature.set_property("y", t.y);
                if let Some(z) = t.z {
                    feature.set_property("alt_ellips", z);
                }
                if let Some(h) = t.h {
                    feature.set_property("alt_ngf_ign69", h);
                }
            }
            if let Some(ref e) = row.error {
                feature.set_property("error", e.tag());
                feature.set_property("message", e.to_string());
            }
            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Reprojette toutes les géométries d'un document GeoJSON
///
/// Une géométrie en échec devient nulle ; le nombre d'échecs est retourné.
pub fn reproject_geojson<G: GeoidModel, P: ProjectionPrimitive>(
    converter: &Converter<G, P>,
    document: GeoJson,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<(FeatureCollection, usize)> {
    let features = match document {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![feature(Some(g))],
    };

    let mut failures = 0;
    let features = features
        .into_iter()
        .enumerate()
        .map(|(i, mut feature)| {
            if let Some(geometry) = feature.geometry.take() {
                match reproject_geometry(converter, geometry, from, to) {
                    Ok(g) => feature.geometry = Some(g),
                    Err(e) => {
                        warn!(feature = i, error = %e, "Feature reprojection failed");
                        feature.set_property("reprojection_error", e.to_string());
                        failures += 1;
                    }
                }
            }
            feature
        })
        .collect();

    Ok((
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: crs_member(to),
        },
        failures,
    ))
}

fn reproject_geometry<G: GeoidModel, P: ProjectionPrimitive>(
    converter: &Converter<G, P>,
    geometry: Geometry,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<Geometry> {
    let geom: geo::Geometry<f64> = geometry.try_into().context("Unsupported GeoJSON geometry")?;
    let out = converter.transform_geometry(&geom, from, to)?;
    Ok(Geometry::new(Value::from(&out)))
}

/// Lit un document GeoJSON
pub fn read_geojson(path: &Path) -> Result<GeoJson> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read file: {}", path.display()))?;
    content
        .parse::<GeoJson>()
        .context(format!("Failed to parse GeoJSON: {}", path.display()))
}

/// Écrit une FeatureCollection
pub fn export_to_geojson(collection: &FeatureCollection, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;
    Ok(())
}

/// Valeur d'une propriété, pour les tests et l'affichage
pub fn property<'a>(feature: &'a Feature, key: &str) -> Option<&'a JsonValue> {
    feature.properties.as_ref()?.get(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodesie::{get_hypotheses, Coordinates, ParseError, RowError};

    #[test]
    fn test_hypotheses_collection() {
        let hypotheses = get_hypotheses(652436.5, 6861545.2);
        let fc = hypotheses_collection(652436.5, 6861545.2, &hypotheses);

        assert_eq!(fc.features.len(), hypotheses.len());
        let first = &fc.features[0];
        assert_eq!(property(first, "system").unwrap(), "EPSG:2154");
        assert_eq!(property(first, "epsg").unwrap(), 2154);
        match &first.geometry.as_ref().unwrap().value {
            Value::Point(c) => assert!((c[0] - 2.35).abs() < 0.01 && (c[1] - 48.85).abs() < 0.01),
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_collection_error_row() {
        let rows = vec![
            ExportRow {
                input: "700000 6600000".to_string(),
                target: Some(Coordinates::new(3.0, 46.5, CoordinateSystem::Wgs84)),
                wgs84: Some(Coordinates::new(3.0, 46.5, CoordinateSystem::Wgs84)),
                error: None,
            },
            ExportRow {
                input: "BADROW".to_string(),
                target: None,
                wgs84: None,
                error: Some(RowError::Parse(ParseError::TooFewNumbers { found: 0 })),
            },
        ];
        let fc = batch_collection(&rows, CoordinateSystem::Wgs84);

        assert!(fc.features[0].geometry.is_some());
        assert_eq!(property(&fc.features[0], "x").unwrap(), 3.0);
        assert!(fc.features[1].geometry.is_none());
        assert_eq!(property(&fc.features[1], "error").unwrap(), "invalid_format");
        assert_eq!(property(&fc.features[1], "row").unwrap(), 2);
    }

    #[test]
    fn test_reproject_feature_collection() {
        let doc: GeoJson = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"paris"},"geometry":{"type":"Point","coordinates":[2.35,48.85]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[2.0,120.0]}},
            {"type":"Feature","properties":{},"geometry":null}
        ]}"#
        .parse()
        .unwrap();

        let conv = Converter::new();
        let (fc, failures) =
            reproject_geojson(&conv, doc, CoordinateSystem::Wgs84, CoordinateSystem::Lambert93).unwrap();

        assert_eq!(failures, 1);
        assert_eq!(fc.features.len(), 3);
        match &fc.features[0].geometry.as_ref().unwrap().value {
            Value::Point(c) => {
                assert!((c[0] - 652_000.0).abs() < 2_000.0, "x={}", c[0]);
                assert!((c[1] - 6_862_000.0).abs() < 2_000.0, "y={}", c[1]);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
        assert_eq!(property(&fc.features[0], "name").unwrap(), "paris");
        assert!(fc.features[1].geometry.is_none());
        assert!(property(&fc.features[1], "reprojection_error").is_some());

        let crs = fc.foreign_members.as_ref().unwrap().get("crs").unwrap();
        assert_eq!(crs["properties"]["name"], "urn:ogc:def:crs:EPSG::2154");
    }

    #[test]
    fn test_export_to_geojson() {
        let fc = hypotheses_collection(2.35, 48.85, &get_hypotheses(2.35, 48.85));
        let output_path = std::env::temp_dir().join("test_geoconvert_hypotheses.geojson");

        export_to_geojson(&fc, &output_path).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains(r#""type":"FeatureCollection""#));
        assert!(content.contains("EPSG:4326"));

        std::fs::remove_file(output_path).ok();
    }
}
