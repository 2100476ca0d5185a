//! 几何记录
//!
//! 每个源实体产生一条 [`GeometryRecord`]，先是原始坐标，经重投影后交给下游写出。

use crate::error::Result;
use crate::math::{BoundingBox2, VertexSequence};
use crate::projection::Projection;
use crate::reproject::reproject;
use crate::ring::MIN_RING_VERTICES;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 输出要素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    Line,
    Path,
    Ring,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::Line => "Line",
            GeometryKind::Path => "Path",
            GeometryKind::Ring => "Ring",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 几何记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub kind: GeometryKind,
    pub layer: String,
    pub vertices: VertexSequence,
}

impl GeometryRecord {
    pub fn new(kind: GeometryKind, layer: impl Into<String>, vertices: VertexSequence) -> Self {
        Self {
            kind,
            layer: layer.into(),
            vertices,
        }
    }

    /// 对 x、y 应用仿射变换
    pub fn transformed(self, transform: &Transform2D) -> Self {
        if transform.is_identity() {
            return self;
        }
        let vertices = self
            .vertices
            .iter()
            .map(|v| transform.transform_vertex(v))
            .collect();
        Self { vertices, ..self }
    }

    /// 重投影所有顶点，类型与图层不变
    pub fn reprojected<P: Projection + ?Sized>(self, projection: &P) -> Result<Self> {
        let vertices = reproject(projection, &self.vertices)?;
        Ok(Self { vertices, ..self })
    }

    /// 确定最终输出类型：顶点数不足的环降级为路径
    pub fn settled(self) -> Self {
        if self.kind == GeometryKind::Ring && self.vertices.len() < MIN_RING_VERTICES {
            return Self {
                kind: GeometryKind::Path,
                ..self
            };
        }
        self
    }

    /// 平面包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_vertices(&self.vertices)
    }
}

/// 各类型要素计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    pub points: usize,
    pub lines: usize,
    pub paths: usize,
    pub rings: usize,
}

impl FeatureCounts {
    /// 统计一条记录
    pub fn record(&mut self, kind: GeometryKind) {
        match kind {
            GeometryKind::Point => self.points += 1,
            GeometryKind::Line => self.lines += 1,
            GeometryKind::Path => self.paths += 1,
            GeometryKind::Ring => self.rings += 1,
        }
    }

    /// 指定类型的数量
    pub fn get(&self, kind: GeometryKind) -> usize {
        match kind {
            GeometryKind::Point => self.points,
            GeometryKind::Line => self.lines,
            GeometryKind::Path => self.paths,
            GeometryKind::Ring => self.rings,
        }
    }

    /// 总数
    pub fn total(&self) -> usize {
        self.points + self.lines + self.paths + self.rings
    }
}

impl<'a> FromIterator<&'a GeometryRecord> for FeatureCounts {
    fn from_iter<I: IntoIterator<Item = &'a GeometryRecord>>(iter: I) -> Self {
        let mut counts = Self::default();
        for record in iter {
            counts.record(record.kind);
        }
        counts
    }
}
