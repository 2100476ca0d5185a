//! 闭合环判定

use crate::math::{coincident, Vertex};

/// 作为面输出时环至少需要的顶点数
pub const MIN_RING_VERTICES: usize = 3;

/// 判断顶点序列是否为闭合环
///
/// 实体自身的闭合标志优先；没有标志时，顶点数大于 2 且首尾重合即视为闭合。
pub fn is_ring(explicit_closed: bool, vertices: &[Vertex]) -> bool {
    if explicit_closed {
        return true;
    }
    is_geometrically_closed(vertices)
}

/// 首尾重合（容差 1e-6）且顶点数大于 2
pub fn is_geometrically_closed(vertices: &[Vertex]) -> bool {
    match (vertices.first(), vertices.last()) {
        (Some(first), Some(last)) if vertices.len() > 2 => coincident(first, last),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vertex2;

    #[test]
    fn test_explicit_flag_wins() {
        assert!(is_ring(true, &[]));
        assert!(is_ring(true, &[vertex2(0.0, 0.0), vertex2(1.0, 0.0)]));
    }

    #[test]
    fn test_open_triangle_is_not_ring() {
        let triangle = [vertex2(0.0, 0.0), vertex2(1.0, 0.0), vertex2(0.0, 1.0)];
        assert!(!is_ring(false, &triangle));
    }

    #[test]
    fn test_geometric_closure_detected() {
        let closed = [
            vertex2(0.0, 0.0),
            vertex2(1.0, 0.0),
            vertex2(1.0, 1.0),
            vertex2(5e-7, -5e-7),
        ];
        assert!(is_ring(false, &closed));
    }

    #[test]
    fn test_two_coincident_vertices_are_not_ring() {
        let pair = [vertex2(3.0, 3.0), vertex2(3.0, 3.0)];
        assert!(!is_ring(false, &pair));
        assert!(!is_ring(false, &[]));
    }
}
