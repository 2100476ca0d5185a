//! 曲线离散
//!
//! 把圆、圆弧和参数曲线按给定分段数近似为折线。
//! 分段数为 `segments` 时总是输出 `segments + 1` 个顶点（参数曲线回退到控制点时除外）。

use crate::error::{GeometryError, Result};
use crate::geometry::{CircularArc, CurveSpec, ParametricCurve};
use crate::math::VertexSequence;
use tracing::debug;

/// 默认分段数
pub const DEFAULT_SEGMENTS: u32 = 64;

/// 按分段数离散曲线
pub fn flatten(shape: &CurveSpec<'_>, segments: u32) -> Result<VertexSequence> {
    if segments == 0 {
        return Err(GeometryError::InvalidResolution(segments));
    }

    match shape {
        CurveSpec::CircularArc(arc) => flatten_arc(arc, segments),
        CurveSpec::Parametric(curve) => flatten_parametric(curve, segments),
    }
}

/// 圆弧离散
///
/// 终止角小于起始角时先加 360°，圆弧总是沿角度增大方向扫过。
/// 整圆的最后一个顶点与第一个重合，这个重复点需要保留。
pub fn flatten_arc(arc: &CircularArc, segments: u32) -> Result<VertexSequence> {
    if segments == 0 {
        return Err(GeometryError::InvalidResolution(segments));
    }
    arc.validate()?;

    let start = arc.start_angle_deg;
    let step = arc.sweep_deg() / segments as f64;

    Ok((0..=segments)
        .map(|i| arc.point_at_angle(start + i as f64 * step))
        .collect())
}

/// 参数曲线离散
///
/// 在 `t = i / segments` 处采样。没有求值器或任一采样失败时，原样返回控制点。
/// 分段数为 0 是调用错误，不回退。
pub fn flatten_parametric(curve: &ParametricCurve<'_>, segments: u32) -> Result<VertexSequence> {
    if segments == 0 {
        return Err(GeometryError::InvalidResolution(segments));
    }

    let Some(evaluator) = curve.evaluator else {
        debug!("curve has no evaluator, using control points");
        return Ok(curve.fallback_control_points.to_vec());
    };

    let sampled: Result<VertexSequence> = (0..=segments)
        .map(|i| evaluator.point_at(i as f64 / segments as f64))
        .collect();

    match sampled {
        Ok(vertices) => Ok(vertices),
        Err(err) => {
            debug!(error = %err, "curve evaluation degraded, using control points");
            Ok(curve.fallback_control_points.to_vec())
        }
    }
}
