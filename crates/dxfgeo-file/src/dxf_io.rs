//! DXF文件导入
//!
//! 把模型空间实体转换为 [`DrawingEntity`]：
//! - 点、线段、轻量多段线、顶点链多段线
//! - 圆、圆弧（角度保持为度）
//! - 样条曲线（阶数、节点、权重、控制点、拟合点）
//!
//! 其余实体类型按类型名计数后跳过。

use crate::document::ImportedDrawing;
use crate::error::FileError;
use dxfgeo_core::entity::DrawingEntity;
use dxfgeo_core::geometry::{SplineCurve, SplineType};
use dxfgeo_core::math::{Point2, Vertex};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// DXF 样条标志位：有理样条
const SPLINE_RATIONAL_FLAG: i32 = 4;

/// 从DXF文件导入
pub fn import(path: &Path) -> Result<ImportedDrawing, FileError> {
    let drawing = dxf::Drawing::load_file(path).map_err(|e| FileError::Dxf(e.to_string()))?;

    let mut imported = convert_drawing(&drawing);
    imported.set_file_path(path);

    info!(
        path = %path.display(),
        entities = imported.entities.len(),
        unsupported = imported.unsupported_count(),
        "DXF imported"
    );
    Ok(imported)
}

/// 从任意读取器导入（如上传的字节流）
pub fn import_reader<R: Read + ?Sized>(reader: &mut R) -> Result<ImportedDrawing, FileError> {
    let drawing = dxf::Drawing::load(reader).map_err(|e| FileError::Dxf(e.to_string()))?;
    Ok(convert_drawing(&drawing))
}

/// 转换整张图纸
pub fn convert_drawing(drawing: &dxf::Drawing) -> ImportedDrawing {
    let mut imported = ImportedDrawing::new();

    // 图层表
    imported.layer_table = drawing.layers().map(|layer| layer.name.clone()).collect();

    // 模型空间实体
    for entity in drawing.entities() {
        match convert_dxf_entity(entity) {
            Some(converted) => imported.add_entity(converted),
            None => {
                let type_name = unsupported_type_name(&entity.specific);
                debug!(
                    entity_type = type_name,
                    layer = %entity.common.layer,
                    "unsupported DXF entity"
                );
                imported.skip_unsupported(type_name);
            }
        }
    }

    imported
}

fn vertex(p: &dxf::Point) -> Vertex {
    Vertex::new(p.x, p.y, p.z)
}

/// 将DXF实体转换为图纸实体
pub fn convert_dxf_entity(entity: &dxf::entities::Entity) -> Option<DrawingEntity> {
    let layer = entity.common.layer.clone();

    let converted = match &entity.specific {
        dxf::entities::EntityType::ModelPoint(point) => {
            DrawingEntity::point(layer, vertex(&point.location))
        }

        dxf::entities::EntityType::Line(line) => {
            DrawingEntity::line(layer, vertex(&line.p1), vertex(&line.p2))
        }

        dxf::entities::EntityType::LwPolyline(lwpoly) => {
            let vertices: Vec<Point2> = lwpoly
                .vertices
                .iter()
                .map(|v| Point2::new(v.x, v.y))
                .collect();

            DrawingEntity::lw_polyline(layer, vertices, lwpoly.is_closed())
        }

        dxf::entities::EntityType::Polyline(poly) => {
            let vertices: Vec<Vertex> = poly.vertices().map(|v| vertex(&v.location)).collect();

            DrawingEntity::polyline(layer, vertices, poly.is_closed())
        }

        dxf::entities::EntityType::Circle(circle) => {
            let center = Point2::new(circle.center.x, circle.center.y);
            DrawingEntity::circle(layer, center, circle.radius)
        }

        dxf::entities::EntityType::Arc(arc) => {
            let center = Point2::new(arc.center.x, arc.center.y);
            DrawingEntity::arc(layer, center, arc.radius, arc.start_angle, arc.end_angle)
        }

        dxf::entities::EntityType::Spline(spline) => {
            DrawingEntity::spline(layer, convert_spline(spline))
        }

        _ => return None,
    };

    Some(converted)
}

fn convert_spline(spline: &dxf::entities::Spline) -> SplineCurve {
    let degree = spline.degree_of_curve.clamp(0, u8::MAX as i32) as u8;

    let mut curve = SplineCurve::new(degree);
    curve.control_points = spline.control_points.iter().map(vertex).collect();
    curve.knots = spline.knot_values.clone();
    curve.fit_points = spline.fit_points.iter().map(vertex).collect();
    curve.closed = spline.is_closed();

    // 非有理样条的权重全为 1，不保留
    if spline.flags & SPLINE_RATIONAL_FLAG != 0 {
        curve.spline_type = SplineType::Nurbs;
        curve.weights = spline.weight_values.clone();
    }

    curve
}

fn unsupported_type_name(specific: &dxf::entities::EntityType) -> &'static str {
    match specific {
        dxf::entities::EntityType::Text(_) => "Text",
        dxf::entities::EntityType::MText(_) => "MText",
        dxf::entities::EntityType::Ellipse(_) => "Ellipse",
        dxf::entities::EntityType::Insert(_) => "Insert",
        dxf::entities::EntityType::Leader(_) => "Leader",
        dxf::entities::EntityType::Solid(_) => "Solid",
        dxf::entities::EntityType::RotatedDimension(_)
        | dxf::entities::EntityType::RadialDimension(_)
        | dxf::entities::EntityType::DiameterDimension(_) => "Dimension",
        _ => "Other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxf::entities::EntityType;
    use dxfgeo_core::entity::EntityShape;

    fn dxf_entity(layer: &str, specific: EntityType) -> dxf::entities::Entity {
        let mut entity = dxf::entities::Entity::new(specific);
        entity.common.layer = layer.to_string();
        entity
    }

    #[test]
    fn test_convert_line_keeps_layer_and_elevation() {
        let mut line = dxf::entities::Line::default();
        line.p1 = dxf::Point::new(1.0, 2.0, 3.0);
        line.p2 = dxf::Point::new(4.0, 5.0, 6.0);

        let converted = convert_dxf_entity(&dxf_entity("Roads", EntityType::Line(line))).unwrap();
        assert_eq!(converted.layer, "Roads");
        assert_eq!(
            converted.shape,
            EntityShape::Line {
                start: Vertex::new(1.0, 2.0, 3.0),
                end: Vertex::new(4.0, 5.0, 6.0),
            }
        );
    }

    #[test]
    fn test_convert_lw_polyline_flag() {
        let mut lwpoly = dxf::entities::LwPolyline::default();
        lwpoly.set_is_closed(true);
        lwpoly.vertices = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]
            .iter()
            .map(|&(x, y)| {
                let mut v = dxf::LwPolylineVertex::default();
                v.x = x;
                v.y = y;
                v
            })
            .collect();

        let entity = dxf_entity("Parcels", EntityType::LwPolyline(lwpoly));
        match convert_dxf_entity(&entity).unwrap().shape {
            EntityShape::LwPolyline { vertices, closed } => {
                assert!(closed);
                assert_eq!(vertices.len(), 3);
                assert_eq!(vertices[2], Point2::new(1.0, 1.0));
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_convert_arc_keeps_degrees() {
        let mut arc = dxf::entities::Arc::default();
        arc.center = dxf::Point::new(10.0, 20.0, 0.0);
        arc.radius = 5.0;
        arc.start_angle = 350.0;
        arc.end_angle = 10.0;

        let converted = convert_dxf_entity(&dxf_entity("0", EntityType::Arc(arc))).unwrap();
        assert_eq!(
            converted.shape,
            EntityShape::Arc {
                center: Point2::new(10.0, 20.0),
                radius: 5.0,
                start_angle: 350.0,
                end_angle: 10.0,
            }
        );
    }

    #[test]
    fn test_convert_rational_spline() {
        let mut spline = dxf::entities::Spline::default();
        spline.degree_of_curve = 2;
        spline.flags |= SPLINE_RATIONAL_FLAG;
        spline.control_points = vec![
            dxf::Point::new(1.0, 0.0, 0.0),
            dxf::Point::new(1.0, 1.0, 0.0),
            dxf::Point::new(0.0, 1.0, 0.0),
        ];
        spline.knot_values = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        spline.weight_values = vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0];

        let entity = dxf_entity("Curves", EntityType::Spline(spline));
        match convert_dxf_entity(&entity).unwrap().shape {
            EntityShape::Spline(curve) => {
                assert_eq!(curve.degree, 2);
                assert_eq!(curve.spline_type, SplineType::Nurbs);
                assert_eq!(curve.weights.len(), 3);
                assert_eq!(curve.knots.len(), 6);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_entity_is_counted() {
        let mut drawing = dxf::Drawing::new();
        let text = EntityType::Text(dxf::entities::Text::default());
        let circle = EntityType::Circle(dxf::entities::Circle::default());
        drawing.add_entity(dxf_entity("Notes", text));
        drawing.add_entity(dxf_entity("0", circle));

        let imported = convert_drawing(&drawing);
        assert_eq!(imported.entities.len(), 1);
        assert_eq!(imported.unsupported["Text"], 1);
    }

    #[test]
    fn test_import_reader_from_bytes() {
        let mut drawing = dxf::Drawing::new();

        let mut line = dxf::entities::Line::default();
        line.p1 = dxf::Point::new(0.0, 0.0, 0.0);
        line.p2 = dxf::Point::new(3.0, 4.0, 0.0);
        drawing.add_entity(dxf_entity("Roads", EntityType::Line(line)));

        let mut arc = dxf::entities::Arc::default();
        arc.center = dxf::Point::new(1.0, 1.0, 0.0);
        arc.radius = 2.0;
        arc.start_angle = 0.0;
        arc.end_angle = 90.0;
        drawing.add_entity(dxf_entity("Curbs", EntityType::Arc(arc)));

        let mut bytes: Vec<u8> = Vec::new();
        drawing.save(&mut bytes).unwrap();

        let imported = import_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(imported.entities.len(), 2);
        assert_eq!(imported.entities[0].layer, "Roads");
        assert_eq!(imported.entities[1].shape.type_name(), "Arc");
        assert!(imported.file_path().is_none());
    }
}
