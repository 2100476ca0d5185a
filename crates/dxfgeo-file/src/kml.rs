//! KML 写出
//!
//! 每条记录生成一个 Placemark，名称为图层名：
//! - Point → `<Point>`
//! - Line / Path → `<LineString>`
//! - Ring → `<Polygon>` 外边界（不含内环）

use dxfgeo_core::math::{coincident, Vertex};
use dxfgeo_core::record::{GeometryKind, GeometryRecord};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// KML 高程模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AltitudeMode {
    /// 贴地（默认）
    #[default]
    ClampToGround,
    /// 相对地面
    RelativeToGround,
    /// 绝对高程
    Absolute,
}

impl AltitudeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AltitudeMode::ClampToGround => "clampToGround",
            AltitudeMode::RelativeToGround => "relativeToGround",
            AltitudeMode::Absolute => "absolute",
        }
    }
}

impl FromStr for AltitudeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clampToGround" | "clamp-to-ground" => Ok(AltitudeMode::ClampToGround),
            "relativeToGround" | "relative-to-ground" => Ok(AltitudeMode::RelativeToGround),
            "absolute" => Ok(AltitudeMode::Absolute),
            _ => Err(format!("unknown altitude mode: {}", s)),
        }
    }
}

/// KML 写出选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmlOptions {
    /// 文档名称
    pub document_name: String,
    /// 高程模式
    pub altitude_mode: AltitudeMode,
    /// 按图层分文件夹
    pub folder_per_layer: bool,
}

impl Default for KmlOptions {
    fn default() -> Self {
        Self {
            document_name: "dxfgeo export".to_string(),
            altitude_mode: AltitudeMode::default(),
            folder_per_layer: false,
        }
    }
}

/// KML 导出器
pub struct KmlWriter {
    options: KmlOptions,
}

impl KmlWriter {
    pub fn new(options: KmlOptions) -> Self {
        Self { options }
    }

    /// 导出记录为 KML 字符串
    pub fn write(&self, records: &[GeometryRecord]) -> String {
        let mut kml = String::new();

        kml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
"#,
        );
        kml.push_str(&format!(
            "    <name>{}</name>\n",
            escape(&self.options.document_name)
        ));

        if self.options.folder_per_layer {
            let mut by_layer: BTreeMap<&str, Vec<&GeometryRecord>> = BTreeMap::new();
            for record in records {
                by_layer.entry(record.layer.as_str()).or_default().push(record);
            }
            for (layer, records) in by_layer {
                kml.push_str("    <Folder>\n");
                kml.push_str(&format!("      <name>{}</name>\n", escape(layer)));
                for record in records {
                    kml.push_str(&self.placemark(record, "      "));
                }
                kml.push_str("    </Folder>\n");
            }
        } else {
            for record in records {
                kml.push_str(&self.placemark(record, "    "));
            }
        }

        kml.push_str("  </Document>\n</kml>\n");
        kml
    }

    fn placemark(&self, record: &GeometryRecord, indent: &str) -> String {
        let layer = escape(&record.layer);
        let mut kml = format!("{indent}<Placemark>\n");
        kml.push_str(&format!("{indent}  <name>{layer}</name>\n"));
        kml.push_str(&format!("{indent}  <ExtendedData>\n"));
        kml.push_str(&format!(
            "{indent}    <Data name=\"layer\"><value>{layer}</value></Data>\n"
        ));
        kml.push_str(&format!(
            "{indent}    <Data name=\"kind\"><value>{}</value></Data>\n",
            record.kind
        ));
        kml.push_str(&format!("{indent}  </ExtendedData>\n"));

        let altitude_mode = format!(
            "<altitudeMode>{}</altitudeMode>",
            self.options.altitude_mode.as_str()
        );
        match record.kind {
            GeometryKind::Point => {
                let coords = coordinates(&record.vertices);
                kml.push_str(&format!("{indent}  <Point>\n"));
                kml.push_str(&format!("{indent}    {altitude_mode}\n"));
                kml.push_str(&format!("{indent}    <coordinates>{coords}</coordinates>\n"));
                kml.push_str(&format!("{indent}  </Point>\n"));
            }
            GeometryKind::Line | GeometryKind::Path => {
                let coords = coordinates(&record.vertices);
                kml.push_str(&format!("{indent}  <LineString>\n"));
                kml.push_str(&format!("{indent}    {altitude_mode}\n"));
                kml.push_str(&format!("{indent}    <coordinates>{coords}</coordinates>\n"));
                kml.push_str(&format!("{indent}  </LineString>\n"));
            }
            GeometryKind::Ring => {
                let coords = coordinates(&closed_ring(&record.vertices));
                kml.push_str(&format!("{indent}  <Polygon>\n"));
                kml.push_str(&format!("{indent}    {altitude_mode}\n"));
                kml.push_str(&format!("{indent}    <outerBoundaryIs>\n"));
                kml.push_str(&format!("{indent}      <LinearRing>\n"));
                kml.push_str(&format!("{indent}        <coordinates>{coords}</coordinates>\n"));
                kml.push_str(&format!("{indent}      </LinearRing>\n"));
                kml.push_str(&format!("{indent}    </outerBoundaryIs>\n"));
                kml.push_str(&format!("{indent}  </Polygon>\n"));
            }
        }

        kml.push_str(&format!("{indent}</Placemark>\n"));
        kml
    }
}

impl Default for KmlWriter {
    fn default() -> Self {
        Self::new(KmlOptions::default())
    }
}

/// `lon,lat,z` 以空格分隔
fn coordinates(vertices: &[Vertex]) -> String {
    vertices
        .iter()
        .map(|v| format!("{},{},{}", v.x, v.y, v.z))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 输出格式要求首尾相同；末点与首点不重合时补上首点
pub(crate) fn closed_ring(vertices: &[Vertex]) -> Vec<Vertex> {
    let mut ring = vertices.to_vec();
    if let (Some(first), Some(last)) = (vertices.first(), vertices.last()) {
        if !coincident(first, last) {
            ring.push(*first);
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfgeo_core::math::vertex2;

    fn records() -> Vec<GeometryRecord> {
        vec![
            GeometryRecord::new(GeometryKind::Point, "Survey", vec![Vertex::new(9.5, 47.25, 12.0)]),
            GeometryRecord::new(
                GeometryKind::Ring,
                "Parcels & Lots",
                vec![vertex2(0.0, 0.0), vertex2(1.0, 0.0), vertex2(1.0, 1.0)],
            ),
            GeometryRecord::new(
                GeometryKind::Path,
                "Survey",
                vec![vertex2(0.0, 0.0), vertex2(2.0, 2.0)],
            ),
        ]
    }

    #[test]
    fn test_geometry_elements() {
        let kml = KmlWriter::default().write(&records());

        assert!(kml.starts_with("<?xml"));
        assert_eq!(kml.matches("<Placemark>").count(), 3);
        assert!(kml.contains("<coordinates>9.5,47.25,12</coordinates>"));
        assert!(kml.contains("<LineString>"));
        assert!(kml.contains("<outerBoundaryIs>"));
        assert!(kml.contains("<altitudeMode>clampToGround</altitudeMode>"));
        assert!(kml.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn test_ring_is_closed_and_layer_escaped() {
        let kml = KmlWriter::default().write(&records());
        assert!(kml.contains("<coordinates>0,0,0 1,0,0 1,1,0 0,0,0</coordinates>"));
        assert!(kml.contains("<name>Parcels &amp; Lots</name>"));
    }

    #[test]
    fn test_folders_per_layer() {
        let writer = KmlWriter::new(KmlOptions {
            folder_per_layer: true,
            altitude_mode: AltitudeMode::Absolute,
            ..KmlOptions::default()
        });
        let kml = writer.write(&records());
        assert_eq!(kml.matches("<Folder>").count(), 2);
        assert!(kml.contains("<altitudeMode>absolute</altitudeMode>"));
    }

    #[test]
    fn test_placemark_layout() {
        let record =
            GeometryRecord::new(GeometryKind::Point, "Survey", vec![Vertex::new(1.5, 2.0, 0.0)]);
        let expected = concat!(
            "  <Placemark>\n",
            "    <name>Survey</name>\n",
            "    <ExtendedData>\n",
            "      <Data name=\"layer\"><value>Survey</value></Data>\n",
            "      <Data name=\"kind\"><value>Point</value></Data>\n",
            "    </ExtendedData>\n",
            "    <Point>\n",
            "      <altitudeMode>clampToGround</altitudeMode>\n",
            "      <coordinates>1.5,2,0</coordinates>\n",
            "    </Point>\n",
            "  </Placemark>\n",
        );
        assert_eq!(KmlWriter::default().placemark(&record, "  "), expected);
    }

    #[test]
    fn test_closed_ring_keeps_existing_closure() {
        let ring = vec![
            vertex2(0.0, 0.0),
            vertex2(1.0, 0.0),
            vertex2(1.0, 1.0),
            vertex2(0.0, 0.0),
        ];
        assert_eq!(closed_ring(&ring).len(), 4);
        assert!(closed_ring(&[]).is_empty());
    }

    #[test]
    fn test_altitude_mode_parse() {
        assert_eq!(
            "relativeToGround".parse::<AltitudeMode>(),
            Ok(AltitudeMode::RelativeToGround)
        );
        assert!("floating".parse::<AltitudeMode>().is_err());
    }
}
