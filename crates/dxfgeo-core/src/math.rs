//! 数学基础类型
//!
//! 基于 nalgebra 提供的点类型别名，以及顶点比较用的容差。

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 2D点类型
pub type Point2 = na::Point2<f64>;

/// 顶点：平面坐标 + 高程（默认 0）
pub type Vertex = na::Point3<f64>;

/// 有序顶点序列，顺序决定路径方向/环绕方向
pub type VertexSequence = Vec<Vertex>;

/// 2D变换矩阵
pub type Matrix3 = na::Matrix3<f64>;

/// 数值容差，用于浮点比较
pub const EPSILON: f64 = 1e-10;

/// 顶点重合容差（源坐标单位）
pub const COINCIDENCE_EPSILON: f64 = 1e-6;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 两个顶点在平面上是否重合（只比较 x、y）
#[inline]
pub fn coincident(a: &Vertex, b: &Vertex) -> bool {
    (a.x - b.x).abs() < COINCIDENCE_EPSILON && (a.y - b.y).abs() < COINCIDENCE_EPSILON
}

/// 从平面坐标创建高程为 0 的顶点
#[inline]
pub fn vertex2(x: f64, y: f64) -> Vertex {
    Vertex::new(x, y, 0.0)
}

/// 2D包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 创建空的包围盒（无效状态）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    /// 从顶点集创建包围盒（忽略高程）
    pub fn from_vertices<'a>(vertices: impl IntoIterator<Item = &'a Vertex>) -> Self {
        let mut bbox = Self::empty();
        for v in vertices {
            bbox.expand_to_include(&Point2::new(v.x, v.y));
        }
        bbox
    }

    /// 扩展包围盒以包含指定点
    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并两个包围盒
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}
