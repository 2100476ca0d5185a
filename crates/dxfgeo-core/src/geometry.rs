//! 曲线描述
//!
//! 曲线离散器的输入：
//! - 圆弧 (CircularArc)，整圆是 0°..360° 的特例
//! - 参数曲线 (ParametricCurve)，由可失败的求值器 + 控制点回退组成
//! - 样条曲线 (SplineCurve)，B-样条/NURBS 求值器的一个实现

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vertex, EPSILON};
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// 圆弧（角度以度为单位，只在求值时转换为弧度）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularArc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（度）
    pub start_angle_deg: f64,
    /// 终止角度（度）
    pub end_angle_deg: f64,
}

impl CircularArc {
    pub fn new(center: Point2, radius: f64, start_angle_deg: f64, end_angle_deg: f64) -> Self {
        Self {
            center,
            radius,
            start_angle_deg,
            end_angle_deg,
        }
    }

    /// 整圆
    pub fn full_circle(center: Point2, radius: f64) -> Self {
        Self::new(center, radius, 0.0, 360.0)
    }

    /// 检查半径和角度是否可用于求值
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GeometryError::MalformedCurve(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !self.start_angle_deg.is_finite() || !self.end_angle_deg.is_finite() {
            return Err(GeometryError::MalformedCurve(format!(
                "angles must be finite, got {}..{}",
                self.start_angle_deg, self.end_angle_deg
            )));
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(GeometryError::MalformedCurve(
                "center must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// 扫过的角度（度），始终沿角度增大方向，不为负
    pub fn sweep_deg(&self) -> f64 {
        self.effective_end_deg() - self.start_angle_deg
    }

    /// 终止角度小于起始角度时加 360°
    pub fn effective_end_deg(&self) -> f64 {
        if self.end_angle_deg < self.start_angle_deg {
            self.end_angle_deg + 360.0
        } else {
            self.end_angle_deg
        }
    }

    /// 获取圆上指定角度（度）的点
    pub fn point_at_angle(&self, angle_deg: f64) -> Vertex {
        let angle = angle_deg.to_radians();
        Vertex::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            0.0,
        )
    }
}

/// 参数曲线求值器
///
/// `t` 取值 [0, 1]。求值失败时返回 `Err`，调用方退回到控制点。
pub trait CurveEvaluator {
    fn point_at(&self, t: f64) -> Result<Vertex>;
}

impl<F> CurveEvaluator for F
where
    F: Fn(f64) -> Result<Vertex>,
{
    fn point_at(&self, t: f64) -> Result<Vertex> {
        self(t)
    }
}

/// 参数曲线：可选的求值器 + 回退用的原始控制点
#[derive(Clone, Copy)]
pub struct ParametricCurve<'a> {
    pub evaluator: Option<&'a dyn CurveEvaluator>,
    pub fallback_control_points: &'a [Vertex],
}

impl<'a> ParametricCurve<'a> {
    pub fn new(evaluator: &'a dyn CurveEvaluator, fallback_control_points: &'a [Vertex]) -> Self {
        Self {
            evaluator: Some(evaluator),
            fallback_control_points,
        }
    }

    /// 没有求值能力，只能返回控制点
    pub fn control_points_only(fallback_control_points: &'a [Vertex]) -> Self {
        Self {
            evaluator: None,
            fallback_control_points,
        }
    }
}

impl std::fmt::Debug for ParametricCurve<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParametricCurve")
            .field("has_evaluator", &self.evaluator.is_some())
            .field("fallback_control_points", &self.fallback_control_points)
            .finish()
    }
}

/// 曲线描述
#[derive(Debug, Clone, Copy)]
pub enum CurveSpec<'a> {
    CircularArc(CircularArc),
    Parametric(ParametricCurve<'a>),
}

/// 样条类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SplineType {
    /// B-样条（默认）
    #[default]
    BSpline,
    /// 有理 B-样条
    Nurbs,
}

/// 样条曲线
///
/// 使用 De Boor 算法求值，权重非空时按齐次坐标计算（NURBS）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineCurve {
    /// 样条类型
    pub spline_type: SplineType,
    /// 曲线阶数（通常为 3）
    pub degree: u8,
    /// 控制点
    pub control_points: Vec<Vertex>,
    /// 节点向量（knot vector）
    pub knots: Vec<f64>,
    /// 权重（用于 NURBS，如果为空则默认全为 1）
    pub weights: Vec<f64>,
    /// 是否闭合（仅记录，不影响环判定）
    pub closed: bool,
    /// 拟合点
    pub fit_points: Vec<Vertex>,
}

impl SplineCurve {
    /// 创建一个空的 B-样条
    pub fn new(degree: u8) -> Self {
        Self {
            spline_type: SplineType::BSpline,
            degree,
            control_points: Vec::new(),
            knots: Vec::new(),
            weights: Vec::new(),
            closed: false,
            fit_points: Vec::new(),
        }
    }

    /// 从控制点创建钳位（clamped）均匀 B-样条
    pub fn from_control_points(control_points: Vec<Vertex>, degree: u8) -> Self {
        let n = control_points.len();
        let k = degree as usize;
        let mut knots = Vec::with_capacity(n + k + 1);

        if n > k {
            let spans = (n - k) as f64;
            for i in 0..n + k + 1 {
                let knot = if i <= k {
                    0.0
                } else if i >= n {
                    1.0
                } else {
                    (i - k) as f64 / spans
                };
                knots.push(knot);
            }
        }

        Self {
            knots,
            control_points,
            ..Self::new(degree)
        }
    }

    /// 求值失败时使用的顶点：控制点，没有控制点时用拟合点
    pub fn fallback_vertices(&self) -> &[Vertex] {
        if self.control_points.is_empty() {
            &self.fit_points
        } else {
            &self.control_points
        }
    }

    /// 参数曲线视图
    pub fn as_parametric(&self) -> ParametricCurve<'_> {
        ParametricCurve::new(self, self.fallback_vertices())
    }

    /// 检查节点向量与控制点是否匹配
    fn check(&self) -> Result<()> {
        let n = self.control_points.len();
        let k = self.degree as usize;

        if k == 0 {
            return Err(GeometryError::CurveEvaluation("degree must be at least 1".into()));
        }
        if n <= k {
            return Err(GeometryError::CurveEvaluation(format!(
                "{} control points are not enough for degree {}",
                n, k
            )));
        }
        if self.knots.len() != n + k + 1 {
            return Err(GeometryError::CurveEvaluation(format!(
                "expected {} knots, got {}",
                n + k + 1,
                self.knots.len()
            )));
        }
        if self.knots.windows(2).any(|w| w[1] < w[0]) || self.knots.iter().any(|k| !k.is_finite()) {
            return Err(GeometryError::CurveEvaluation("knot vector is not non-decreasing".into()));
        }
        if !self.weights.is_empty() && self.weights.len() != n {
            return Err(GeometryError::CurveEvaluation(format!(
                "expected {} weights, got {}",
                n,
                self.weights.len()
            )));
        }
        if self.weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(GeometryError::CurveEvaluation("weights must be positive".into()));
        }

        let (start, end) = self.param_range();
        if end - start < EPSILON {
            return Err(GeometryError::CurveEvaluation("empty parameter range".into()));
        }
        Ok(())
    }

    /// 获取参数范围
    pub fn param_range(&self) -> (f64, f64) {
        let k = self.degree as usize;
        let start = self.knots.get(k).copied().unwrap_or(0.0);
        let end = self
            .knots
            .get(self.control_points.len())
            .copied()
            .unwrap_or(1.0);
        (start, end)
    }

    /// 找到 u 所在的节点区间 [knots[span], knots[span + 1])
    fn find_span(&self, u: f64) -> usize {
        let n = self.control_points.len();
        let k = self.degree as usize;
        let mut span = k;
        while span < n - 1 && self.knots[span + 1] <= u {
            span += 1;
        }
        span
    }

    /// 使用 De Boor 算法计算参数 u 处的点
    fn de_boor(&self, u: f64) -> Vertex {
        let k = self.degree as usize;
        let span = self.find_span(u);
        let weight = |i: usize| self.weights.get(i).copied().unwrap_or(1.0);

        // 齐次坐标 (wx, wy, wz, w)
        let mut d: Vec<Vector4<f64>> = (0..=k)
            .map(|j| {
                let i = span - k + j;
                let p = self.control_points[i];
                let w = weight(i);
                Vector4::new(p.x * w, p.y * w, p.z * w, w)
            })
            .collect();

        for r in 1..=k {
            for j in (r..=k).rev() {
                let i = span - k + j;
                let left = self.knots[i];
                let right = self.knots[i + k + 1 - r];
                let denom = right - left;
                let alpha = if denom.abs() < EPSILON {
                    0.0
                } else {
                    (u - left) / denom
                };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }

        let h = d[k];
        Vertex::new(h.x / h.w, h.y / h.w, h.z / h.w)
    }
}

impl CurveEvaluator for SplineCurve {
    fn point_at(&self, t: f64) -> Result<Vertex> {
        self.check()?;
        if !(0.0..=1.0).contains(&t) {
            return Err(GeometryError::CurveEvaluation(format!(
                "parameter {} outside [0, 1]",
                t
            )));
        }

        let (start, end) = self.param_range();
        let point = self.de_boor(start + (end - start) * t);
        if point.coords.iter().all(|c| c.is_finite()) {
            Ok(point)
        } else {
            Err(GeometryError::CurveEvaluation(format!(
                "non-finite point at t = {}",
                t
            )))
        }
    }
}
