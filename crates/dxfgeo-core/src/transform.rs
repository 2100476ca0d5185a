//! 投影前的2D仿射变换
//!
//! 用于图纸单位换算（如毫米 → 米）和局部坐标平移。只作用于 x、y，高程不变。

use crate::math::{Matrix3, Vertex};
use serde::{Deserialize, Serialize};

/// 2D仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3,
}

impl Transform2D {
    /// 创建单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new(
                1.0, 0.0, dx,
                0.0, 1.0, dy,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建缩放变换（绕原点）
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix3::new(
                sx, 0.0, 0.0,
                0.0, sy, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建均匀缩放变换
    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// 先按 `scale` 缩放，再平移 `(dx, dy)`
    pub fn scale_then_offset(scale: f64, dx: f64, dy: f64) -> Self {
        Self::translation(dx, dy).then(&Self::uniform_scale(scale))
    }

    /// 组合两个变换（self 在后，other 在前）
    pub fn then(&self, other: &Transform2D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// 是否为单位变换
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// 变换一个顶点，高程保持不变
    pub fn transform_vertex(&self, vertex: &Vertex) -> Vertex {
        let v = self.matrix * nalgebra::Vector3::new(vertex.x, vertex.y, 1.0);
        Vertex::new(v.x, v.y, vertex.z)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
