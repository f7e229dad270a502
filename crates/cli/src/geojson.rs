//! Minimal GeoJSON FeatureCollection I/O on top of `serde_json::Value`.
//!
//! Only `Polygon` and `MultiPolygon` geometries are decoded; every other part
//! of a feature (id, properties, foreign members) is carried through untouched.

use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};

use ortho::api::{Geometry, MultiPolygon, Point, Polygon, Ring};

/// Parsed collection; features stay as raw JSON until they are rewritten.
pub struct FeatureCollection {
    root: Map<String, Value>,
    features: Vec<Value>,
    offset: usize,
}

impl FeatureCollection {
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("parsing GeoJSON")?;
        let Value::Object(mut root) = value else {
            bail!("GeoJSON root is not an object");
        };
        match root.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {}
            other => bail!("expected a FeatureCollection, found type {other:?}"),
        }
        let features = match root.remove("features") {
            Some(Value::Array(features)) => features,
            _ => bail!("FeatureCollection has no features array"),
        };
        Ok(Self {
            root,
            features,
            offset: 0,
        })
    }

    /// Keep only features `[k·size, (k+1)·size)`.
    pub fn slice(&mut self, k: usize, size: usize) {
        let start = k.saturating_mul(size).min(self.features.len());
        let end = start.saturating_add(size).min(self.features.len());
        self.features.truncate(end);
        self.features.drain(..start);
        self.offset += start;
    }

    /// Index of `features()[0]` in the file that was parsed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn features(&self) -> &[Value] {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut [Value] {
        &mut self.features
    }

    pub fn to_value(&self) -> Value {
        let mut root = self.root.clone();
        root.insert("features".into(), Value::Array(self.features.clone()));
        Value::Object(root)
    }
}

fn point(v: &Value) -> Result<Point> {
    let xy = v.as_array().context("position is not an array")?;
    match (xy.first().and_then(Value::as_f64), xy.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => bail!("position needs two numbers"),
    }
}

fn ring_points(v: &Value) -> Result<Vec<Point>> {
    v.as_array()
        .context("linear ring is not an array")?
        .iter()
        .map(point)
        .collect()
}

fn polygon(v: &Value) -> Result<Polygon> {
    let rings = v.as_array().context("polygon coordinates are not an array")?;
    let (exterior, holes) = rings.split_first().context("polygon has no rings")?;
    let holes = holes.iter().map(ring_points).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(ring_points(exterior)?, holes)?)
}

/// Decode a GeoJSON geometry object.
pub fn geometry_from_value(v: &Value) -> Result<Geometry> {
    let kind = v
        .get("type")
        .and_then(Value::as_str)
        .context("geometry has no type")?;
    let coords = v.get("coordinates").context("geometry has no coordinates")?;
    match kind {
        "Polygon" => Ok(Geometry::Polygon(polygon(coords)?)),
        "MultiPolygon" => {
            let parts = coords
                .as_array()
                .context("multipolygon coordinates are not an array")?
                .iter()
                .enumerate()
                .map(|(k, p)| polygon(p).with_context(|| format!("part {k}")))
                .collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon(parts)))
        }
        other => bail!("unsupported geometry type {other}"),
    }
}

/// Decode the `geometry` member of a feature.
pub fn feature_geometry(feature: &Value) -> Result<Geometry> {
    let geometry = feature
        .get("geometry")
        .filter(|g| !g.is_null())
        .context("feature has no geometry")?;
    geometry_from_value(geometry)
}

fn ring_value(r: &Ring) -> Value {
    Value::Array(r.points().iter().map(|p| json!([p.x, p.y])).collect())
}

fn polygon_coords(p: &Polygon) -> Value {
    let mut rings = vec![ring_value(p.exterior())];
    rings.extend(p.interiors().iter().map(ring_value));
    Value::Array(rings)
}

/// Encode a geometry as a GeoJSON geometry object.
pub fn geometry_to_value(g: &Geometry) -> Value {
    match g {
        Geometry::Polygon(p) => json!({"type": "Polygon", "coordinates": polygon_coords(p)}),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
        }),
    }
}

/// Replace a feature's geometry and merge `props` into its properties.
pub fn rewrite_feature(feature: &mut Value, geometry: &Geometry, props: Map<String, Value>) {
    let Value::Object(obj) = feature else {
        return;
    };
    obj.insert("geometry".into(), geometry_to_value(geometry));
    let slot = obj.entry("properties").or_insert_with(|| json!({}));
    if !slot.is_object() {
        *slot = json!({});
    }
    if let Value::Object(existing) = slot {
        existing.extend(props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "name": "buildings",
        "features": [
            {"type": "Feature", "id": 7, "properties": {"height": 6.5},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,2],[0,2],[0,0]]]}},
            {"type": "Feature", "properties": null,
             "geometry": {"type": "MultiPolygon", "coordinates": [
                 [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
                 [[[5,5],[7,5],[7,7],[5,7],[5,5]], [[5.5,5.5],[5.5,6],[6,6],[6,5.5],[5.5,5.5]]]
             ]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }"#;

    #[test]
    fn decodes_polygons_and_multipolygons() {
        let fc = FeatureCollection::parse(SQUARE).unwrap();
        assert_eq!(fc.features().len(), 4);
        let g0 = feature_geometry(&fc.features()[0]).unwrap();
        assert!(matches!(&g0, Geometry::Polygon(p) if p.exterior().len() == 5));
        match feature_geometry(&fc.features()[1]).unwrap() {
            Geometry::MultiPolygon(mp) => {
                assert_eq!(mp.0.len(), 2);
                assert_eq!(mp.0[1].interiors().len(), 1);
            }
            Geometry::Polygon(_) => panic!("expected a multipolygon"),
        }
        assert!(feature_geometry(&fc.features()[2]).is_err());
        assert!(feature_geometry(&fc.features()[3]).is_err());
    }

    #[test]
    fn malformed_ring_is_an_error() {
        let open = json!({"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,2],[0,2]]]});
        let err = geometry_from_value(&open).unwrap_err();
        assert!(format!("{err:#}").contains("not closed"), "{err:#}");
        let short = json!({"type": "Polygon", "coordinates": [[[0,0],[4,0],[0,0]]]});
        assert!(geometry_from_value(&short).is_err());
        let text = json!({"type": "Polygon", "coordinates": [[["a", 0]]]});
        assert!(geometry_from_value(&text).is_err());
    }

    #[test]
    fn rewrite_keeps_foreign_members_and_properties() {
        let mut fc = FeatureCollection::parse(SQUARE).unwrap();
        let g = feature_geometry(&fc.features()[0]).unwrap();
        let mut props = Map::new();
        props.insert("ortho_accepted".into(), json!(true));
        rewrite_feature(&mut fc.features_mut()[0], &g, props.clone());
        rewrite_feature(&mut fc.features_mut()[1], &g, props);

        let out = fc.to_value();
        assert_eq!(out["name"], "buildings");
        let f0 = &out["features"][0];
        assert_eq!(f0["id"], 7);
        assert_eq!(f0["properties"]["height"], 6.5);
        assert_eq!(f0["properties"]["ortho_accepted"], true);
        assert_eq!(f0["geometry"]["coordinates"][0][2], json!([4.0, 2.0]));
        // Null properties are replaced by an object.
        assert_eq!(out["features"][1]["properties"]["ortho_accepted"], true);
        assert_eq!(geometry_from_value(&f0["geometry"]).unwrap(), g);
    }

    #[test]
    fn slice_selects_window_and_tracks_offset() {
        let mut fc = FeatureCollection::parse(SQUARE).unwrap();
        fc.slice(1, 3);
        assert_eq!(fc.features().len(), 1);
        assert_eq!(fc.offset(), 3);
        assert!(fc.features()[0]["geometry"].is_null());

        let mut empty = FeatureCollection::parse(SQUARE).unwrap();
        empty.slice(5, 3);
        assert!(empty.features().is_empty());
    }

    #[test]
    fn rejects_non_collections() {
        assert!(FeatureCollection::parse(r#"{"type": "Feature"}"#).is_err());
        assert!(FeatureCollection::parse("[]").is_err());
        assert!(FeatureCollection::parse("{").is_err());
    }
}
