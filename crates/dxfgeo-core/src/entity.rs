//! 图纸实体
//!
//! 文档源（如 DXF 读取器）把每个实体转换为 [`DrawingEntity`]：图层名 + 封闭的形状枚举。

use crate::geometry::SplineCurve;
use crate::math::{Point2, Vertex};
use serde::{Deserialize, Serialize};

/// 实体形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityShape {
    /// 点（保留高程）
    Point { location: Vertex },
    /// 线段
    Line { start: Vertex, end: Vertex },
    /// 轻量多段线：平面顶点 + 闭合标志
    LwPolyline { vertices: Vec<Point2>, closed: bool },
    /// 顶点链多段线：每个顶点的位置 + 闭合标志
    Polyline { vertices: Vec<Vertex>, closed: bool },
    /// 圆
    Circle { center: Point2, radius: f64 },
    /// 圆弧（角度为度）
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    /// 样条曲线
    Spline(SplineCurve),
}

impl EntityShape {
    /// 获取形状的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityShape::Point { .. } => "Point",
            EntityShape::Line { .. } => "Line",
            EntityShape::LwPolyline { .. } => "LwPolyline",
            EntityShape::Polyline { .. } => "Polyline",
            EntityShape::Circle { .. } => "Circle",
            EntityShape::Arc { .. } => "Arc",
            EntityShape::Spline(_) => "Spline",
        }
    }
}

/// 图纸实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingEntity {
    /// 所属图层名
    pub layer: String,

    /// 几何形状
    pub shape: EntityShape,
}

impl DrawingEntity {
    /// 创建新实体
    pub fn new(layer: impl Into<String>, shape: EntityShape) -> Self {
        Self {
            layer: layer.into(),
            shape,
        }
    }

    pub fn point(layer: impl Into<String>, location: Vertex) -> Self {
        Self::new(layer, EntityShape::Point { location })
    }

    pub fn line(layer: impl Into<String>, start: Vertex, end: Vertex) -> Self {
        Self::new(layer, EntityShape::Line { start, end })
    }

    pub fn circle(layer: impl Into<String>, center: Point2, radius: f64) -> Self {
        Self::new(layer, EntityShape::Circle { center, radius })
    }

    pub fn arc(
        layer: impl Into<String>,
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self::new(
            layer,
            EntityShape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            },
        )
    }

    pub fn lw_polyline(layer: impl Into<String>, vertices: Vec<Point2>, closed: bool) -> Self {
        Self::new(layer, EntityShape::LwPolyline { vertices, closed })
    }

    pub fn polyline(layer: impl Into<String>, vertices: Vec<Vertex>, closed: bool) -> Self {
        Self::new(layer, EntityShape::Polyline { vertices, closed })
    }

    pub fn spline(layer: impl Into<String>, spline: SplineCurve) -> Self {
        Self::new(layer, EntityShape::Spline(spline))
    }
}
