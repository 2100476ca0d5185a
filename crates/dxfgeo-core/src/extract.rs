//! 几何提取
//!
//! 按实体类型生成原始（未投影）顶点序列并判定闭合，曲线类实体交给离散器。
//!
//! | 实体 | 顶点来源 | 闭合判定 |
//! |---|---|---|
//! | Point | 单个坐标，保留高程 | 从不闭合 |
//! | Line | 两个端点 | 从不闭合 |
//! | LwPolyline | 平面顶点 | 闭合标志，或首尾重合 |
//! | Polyline | 各顶点位置 | 实体闭合标志 |
//! | Circle | 0°..360° 离散 | 总是可作为环 |
//! | Arc | 按实体角度离散 | 从不闭合（即使扫过 360°） |
//! | Spline | 参数曲线离散 | 从不闭合 |
//!
//! 顶点数量下限：点 1 个，其余 2 个。样条退化为控制点本身不算错误，
//! 但退化后的顶点（或一个顶点的多段线）不足以构成路径时，实体按退化几何跳过。

use crate::entity::{DrawingEntity, EntityShape};
use crate::error::{GeometryError, Result};
use crate::flatten::{flatten_arc, flatten_parametric};
use crate::geometry::{CircularArc, SplineCurve};
use crate::math::{Point2, Vertex, VertexSequence};
use crate::record::{GeometryKind, GeometryRecord};
use crate::ring::is_ring;

/// 提取一个实体的原始几何
pub fn extract(entity: &DrawingEntity, segments: u32) -> Result<GeometryRecord> {
    if segments == 0 {
        return Err(GeometryError::InvalidResolution(segments));
    }

    let (kind, vertices) = match &entity.shape {
        EntityShape::Point { location } => (GeometryKind::Point, vec![*location]),
        EntityShape::Line { start, end } => (GeometryKind::Line, vec![*start, *end]),
        EntityShape::LwPolyline { vertices, closed } => extract_lw_polyline(vertices, *closed),
        EntityShape::Polyline { vertices, closed } => extract_polyline(vertices, *closed),
        EntityShape::Circle { center, radius } => extract_circle(*center, *radius, segments)?,
        EntityShape::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => extract_arc(
            &CircularArc::new(*center, *radius, *start_angle, *end_angle),
            segments,
        )?,
        EntityShape::Spline(spline) => extract_spline(spline, segments)?,
    };

    check_vertex_count(kind, &vertices, entity.shape.type_name())?;
    Ok(GeometryRecord::new(kind, entity.layer.clone(), vertices))
}

fn closed_or_open(closed: bool) -> GeometryKind {
    if closed {
        GeometryKind::Ring
    } else {
        GeometryKind::Path
    }
}

fn extract_lw_polyline(points: &[Point2], closed: bool) -> (GeometryKind, VertexSequence) {
    let vertices: VertexSequence = points.iter().map(|p| Vertex::new(p.x, p.y, 0.0)).collect();
    (closed_or_open(is_ring(closed, &vertices)), vertices)
}

fn extract_polyline(vertices: &[Vertex], closed: bool) -> (GeometryKind, VertexSequence) {
    (closed_or_open(closed), vertices.to_vec())
}

fn extract_circle(
    center: Point2,
    radius: f64,
    segments: u32,
) -> Result<(GeometryKind, VertexSequence)> {
    let vertices = flatten_arc(&CircularArc::full_circle(center, radius), segments)?;
    Ok((closed_or_open(is_ring(true, &vertices)), vertices))
}

fn extract_arc(arc: &CircularArc, segments: u32) -> Result<(GeometryKind, VertexSequence)> {
    Ok((GeometryKind::Path, flatten_arc(arc, segments)?))
}

fn extract_spline(spline: &SplineCurve, segments: u32) -> Result<(GeometryKind, VertexSequence)> {
    Ok((GeometryKind::Path, flatten_parametric(&spline.as_parametric(), segments)?))
}

/// 点需要 1 个顶点，其余类型至少需要 2 个
fn check_vertex_count(kind: GeometryKind, vertices: &[Vertex], type_name: &str) -> Result<()> {
    let required = match kind {
        GeometryKind::Point => 1,
        GeometryKind::Line | GeometryKind::Path | GeometryKind::Ring => 2,
    };
    if vertices.len() < required {
        return Err(GeometryError::DegenerateGeometry(format!(
            "{} produced {} vertices, at least {} required",
            type_name,
            vertices.len(),
            required
        )));
    }
    Ok(())
}
