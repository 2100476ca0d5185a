//! GeoJSON 写出
//!
//! 记录映射为 FeatureCollection 中的 Feature，坐标顺序为 `[lon, lat, z]`。

use crate::kml::closed_ring;
use ::geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Position, Value};
use dxfgeo_core::math::Vertex;
use dxfgeo_core::record::{GeometryKind, GeometryRecord};

fn position(v: &Vertex) -> Position {
    vec![v.x, v.y, v.z]
}

fn positions(vertices: &[Vertex]) -> Vec<Position> {
    vertices.iter().map(position).collect()
}

/// 单条记录的几何，没有顶点时为 `None`
pub fn geometry(record: &GeometryRecord) -> Option<Geometry> {
    let first = record.vertices.first()?;

    let value = match record.kind {
        GeometryKind::Point => Value::Point(position(first)),
        GeometryKind::Line | GeometryKind::Path => Value::LineString(positions(&record.vertices)),
        GeometryKind::Ring => Value::Polygon(vec![positions(&closed_ring(&record.vertices))]),
    };
    Some(Geometry::new(value))
}

/// 单条记录的 Feature，属性为 `layer` 和 `kind`
pub fn feature(record: &GeometryRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("layer".to_string(), JsonValue::from(record.layer.clone()));
    properties.insert("kind".to_string(), JsonValue::from(record.kind.as_str()));

    Feature {
        bbox: None,
        geometry: geometry(record),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// 全部记录组成的 FeatureCollection
pub fn feature_collection(records: &[GeometryRecord]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: records.iter().map(feature).collect(),
        foreign_members: None,
    }
}

/// 序列化为带缩进的字符串
pub fn write(records: &[GeometryRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&feature_collection(records))
}
