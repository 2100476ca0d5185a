//! 顶点重投影
//!
//! 对序列中每个顶点的 (x, y) 单独调用投影，高程原样保留。
//! 不去重、不排序、不裁剪，输出长度与顺序与输入完全一致。

use crate::error::Result;
use crate::math::{Vertex, VertexSequence};
use crate::projection::Projection;

/// 重投影单个顶点
#[inline]
pub fn reproject_vertex<P: Projection + ?Sized>(projection: &P, vertex: &Vertex) -> Result<Vertex> {
    let (lon, lat) = projection.project(vertex.x, vertex.y)?;
    Ok(Vertex::new(lon, lat, vertex.z))
}

/// 重投影顶点序列，任一顶点失败即返回该错误
pub fn reproject<P: Projection + ?Sized>(
    projection: &P,
    vertices: &[Vertex],
) -> Result<VertexSequence> {
    vertices
        .iter()
        .map(|v| reproject_vertex(projection, v))
        .collect()
}
