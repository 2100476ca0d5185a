//! dxfgeo 文件格式处理
//!
//! 支持：
//! - `.dxf` 导入
//! - `.kml` / `.geojson` 写出

pub mod document;
pub mod dxf_io;
pub mod error;
pub mod export;
pub mod geojson;
pub mod kml;

pub use document::ImportedDrawing;
pub use error::FileError;
pub use export::{write_records, OutputFormat};
pub use kml::{AltitudeMode, KmlOptions, KmlWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use dxfgeo_core::prelude::*;

    fn entity(layer: &str, specific: dxf::entities::EntityType) -> dxf::entities::Entity {
        let mut entity = dxf::entities::Entity::new(specific);
        entity.common.layer = layer.to_string();
        entity
    }

    #[test]
    fn test_dxf_file_to_records() {
        let mut drawing = dxf::Drawing::new();

        let mut line = dxf::entities::Line::default();
        line.p1 = dxf::Point::new(0.0, 0.0, 0.0);
        line.p2 = dxf::Point::new(10.0, 0.0, 0.0);
        drawing.add_entity(entity("Roads", dxf::entities::EntityType::Line(line)));

        let mut circle = dxf::entities::Circle::default();
        circle.center = dxf::Point::new(5.0, 5.0, 0.0);
        circle.radius = 2.0;
        drawing.add_entity(entity("Trees", dxf::entities::EntityType::Circle(circle)));

        let file_name = format!("dxfgeo-roundtrip-{}.dxf", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        drawing.save_file(&path).unwrap();

        let imported = ImportedDrawing::open(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(imported.entities.len(), 2);
        assert_eq!(imported.entities_per_layer()["Roads"], 1);
        assert_eq!(imported.file_path(), Some(path.as_path()));

        let options = ConversionOptions::default().with_segments(8);
        let converter = Converter::new(Identity, options).unwrap();
        let conversion = converter.run(&imported.entities);

        assert!(conversion.report.failures.is_empty());
        assert_eq!(conversion.report.counts.get(GeometryKind::Line), 1);
        assert_eq!(conversion.report.counts.get(GeometryKind::Ring), 1);

        let kml = KmlWriter::default().write(&conversion.records);
        assert_eq!(kml.matches("<Placemark>").count(), 2);
        assert!(kml.contains("<name>Trees</name>"));
    }
}
