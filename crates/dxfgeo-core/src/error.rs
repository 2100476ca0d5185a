//! 几何管线错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid resolution: {0} segments (at least 1 required)")]
    InvalidResolution(u32),

    #[error("Malformed curve: {0}")]
    MalformedCurve(String),

    #[error("Curve evaluation failed: {0}")]
    CurveEvaluation(String),

    #[error("Projection failed at ({x}, {y}): {reason}")]
    Projection { x: f64, y: f64, reason: String },

    #[error("Invalid coordinate reference system: {0}")]
    InvalidCrs(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
