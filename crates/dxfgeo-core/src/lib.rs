//! dxfgeo 核心管线
//!
//! 把平面投影坐标系下的CAD图元转换为 WGS84 经纬度要素，保留拓扑（开放路径/闭合环）和图层信息。
//!
//! # 架构设计
//!
//! 自底向上：
//! - `math`: 顶点类型与重合容差
//! - `flatten`: 圆、圆弧、样条 → 折线
//! - `ring`: 开放路径/闭合环判定
//! - `reproject`: 逐顶点投影，保持顺序与长度
//! - `extract`: 按实体类型分派的几何提取
//! - `pipeline`: 图层过滤、逐实体隔离失败、计数
//!
//! # 示例
//!
//! ```rust
//! use dxfgeo_core::prelude::*;
//!
//! let entities = vec![DrawingEntity::circle("Trees", Point2::new(100.0, 100.0), 10.0)];
//! let options = ConversionOptions::default().with_segments(4);
//! let converter = Converter::new(Identity, options).unwrap();
//! let conversion = converter.run(&entities);
//!
//! assert_eq!(conversion.records[0].kind, GeometryKind::Ring);
//! assert_eq!(conversion.records[0].vertices.len(), 5);
//! ```

pub mod entity;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod geometry;
pub mod layer;
pub mod math;
pub mod pipeline;
pub mod projection;
pub mod record;
pub mod reproject;
pub mod ring;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::entity::{DrawingEntity, EntityShape};
    pub use crate::error::GeometryError;
    pub use crate::geometry::{CircularArc, CurveEvaluator, CurveSpec, ParametricCurve, SplineCurve};
    pub use crate::layer::LayerFilter;
    pub use crate::math::{Point2, Vertex, VertexSequence};
    pub use crate::pipeline::{Conversion, ConversionOptions, ConversionReport, Converter};
    pub use crate::projection::{Identity, Projection, SourceCrs, SourceProjection};
    pub use crate::record::{FeatureCounts, GeometryKind, GeometryRecord};
    pub use crate::transform::Transform2D;
}
