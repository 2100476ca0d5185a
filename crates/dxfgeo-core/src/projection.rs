//! 坐标投影
//!
//! 投影能力 `project(x, y) -> (lon, lat)`：把源平面坐标系下的坐标转换为 WGS84 经纬度（度）。
//! 投影对象在一次转换中只构造一次，之后只读共享。

use crate::error::{GeometryError, Result};
use geodesy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WGS84 长半轴（米）
pub const WGS84_SEMIMAJOR: f64 = 6_378_137.0;

/// 平面坐标 → 经纬度
pub trait Projection {
    /// 返回 `(lon, lat)`，单位为度。坐标超出定义域时返回错误。
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> Result<(f64, f64)>,
{
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self(x, y)
    }
}

fn finite_or_fail(x: f64, y: f64, lon: f64, lat: f64) -> Result<(f64, f64)> {
    if lon.is_finite() && lat.is_finite() {
        Ok((lon, lat))
    } else {
        Err(GeometryError::Projection {
            x,
            y,
            reason: "transform produced a non-finite coordinate".to_string(),
        })
    }
}

/// 源坐标已是经纬度（x = lon，y = lat）
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, y))
    }
}

/// 球面 Web Mercator 反算（EPSG:3857）
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    semimajor: f64,
}

impl WebMercator {
    pub fn new(semimajor: f64) -> Self {
        Self { semimajor }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(WGS84_SEMIMAJOR)
    }
}

impl Projection for WebMercator {
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let lon = (x / self.semimajor).to_degrees();
        let lat =
            (2.0 * (y / self.semimajor).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        finite_or_fail(x, y, lon, lat)
    }
}

/// 基于 geodesy 算子定义的投影，按逆方向应用（投影坐标 → 经纬度）
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
    definition: String,
}

impl GeodesyProjection {
    pub fn new(definition: &str) -> Result<Self> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|e| GeometryError::InvalidCrs(format!("{}: {}", definition, e)))?;
        Ok(Self {
            context,
            op,
            definition: definition.to_string(),
        })
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeodesyProjection")
            .field("definition", &self.definition)
            .finish()
    }
}

impl Projection for GeodesyProjection {
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let mut data = [Coor2D([x, y])];
        self.context
            .apply(self.op, Inv, &mut data)
            .map_err(|e| GeometryError::Projection {
                x,
                y,
                reason: e.to_string(),
            })?;

        finite_or_fail(x, y, data[0].0[0].to_degrees(), data[0].0[1].to_degrees())
    }
}

/// 源坐标参考系
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceCrs {
    /// EPSG:4326，坐标已是经纬度
    Geographic,
    /// EPSG:3857
    WebMercator,
    /// UTM 分带（EPSG:326NN 北半球 / EPSG:327NN 南半球）
    Utm { zone: u8, south: bool },
    /// 任意 geodesy 算子定义
    Geodesy(String),
}

impl SourceCrs {
    /// 构造投影对象
    pub fn build(&self) -> Result<SourceProjection> {
        Ok(match self {
            SourceCrs::Geographic => SourceProjection::Identity(Identity),
            SourceCrs::WebMercator => SourceProjection::WebMercator(WebMercator::default()),
            SourceCrs::Utm { zone, south } => {
                let definition = if *south {
                    format!("utm zone={} south", zone)
                } else {
                    format!("utm zone={}", zone)
                };
                SourceProjection::Geodesy(GeodesyProjection::new(&definition)?)
            }
            SourceCrs::Geodesy(definition) => {
                SourceProjection::Geodesy(GeodesyProjection::new(definition)?)
            }
        })
    }
}

impl FromStr for SourceCrs {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(definition) = trimmed.strip_prefix("geodesy:") {
            let definition = definition.trim();
            if definition.is_empty() {
                return Err(GeometryError::InvalidCrs(s.to_string()));
            }
            return Ok(SourceCrs::Geodesy(definition.to_string()));
        }

        let upper = trimmed.to_ascii_uppercase();
        if upper == "WGS84" {
            return Ok(SourceCrs::Geographic);
        }

        let code: u32 = upper
            .strip_prefix("EPSG:")
            .and_then(|c| c.parse().ok())
            .ok_or_else(|| GeometryError::InvalidCrs(s.to_string()))?;

        match code {
            4326 => Ok(SourceCrs::Geographic),
            3857 | 900913 => Ok(SourceCrs::WebMercator),
            32601..=32660 => Ok(SourceCrs::Utm {
                zone: (code - 32600) as u8,
                south: false,
            }),
            32701..=32760 => Ok(SourceCrs::Utm {
                zone: (code - 32700) as u8,
                south: true,
            }),
            _ => Err(GeometryError::InvalidCrs(format!(
                "unsupported EPSG code {}",
                code
            ))),
        }
    }
}

impl fmt::Display for SourceCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCrs::Geographic => write!(f, "EPSG:4326"),
            SourceCrs::WebMercator => write!(f, "EPSG:3857"),
            SourceCrs::Utm { zone, south: false } => write!(f, "EPSG:{}", 32600 + *zone as u32),
            SourceCrs::Utm { zone, south: true } => write!(f, "EPSG:{}", 32700 + *zone as u32),
            SourceCrs::Geodesy(definition) => write!(f, "geodesy:{}", definition),
        }
    }
}

/// 由 [`SourceCrs`] 构造出的投影
#[derive(Debug)]
pub enum SourceProjection {
    Identity(Identity),
    WebMercator(WebMercator),
    Geodesy(GeodesyProjection),
}

impl Projection for SourceProjection {
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        match self {
            SourceProjection::Identity(p) => p.project(x, y),
            SourceProjection::WebMercator(p) => p.project(x, y),
            SourceProjection::Geodesy(p) => p.project(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_epsg_codes() {
        assert_eq!("EPSG:4326".parse::<SourceCrs>().unwrap(), SourceCrs::Geographic);
        assert_eq!("epsg:3857".parse::<SourceCrs>().unwrap(), SourceCrs::WebMercator);
        assert_eq!(
            "EPSG:32633".parse::<SourceCrs>().unwrap(),
            SourceCrs::Utm { zone: 33, south: false }
        );
        assert_eq!(
            " EPSG:32756 ".parse::<SourceCrs>().unwrap(),
            SourceCrs::Utm { zone: 56, south: true }
        );
        assert_eq!(
            "geodesy:tmerc lon_0=9".parse::<SourceCrs>().unwrap(),
            SourceCrs::Geodesy("tmerc lon_0=9".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!("EPSG:2154".parse::<SourceCrs>(), Err(GeometryError::InvalidCrs(_))));
        assert!(matches!("EPSG:32661".parse::<SourceCrs>(), Err(GeometryError::InvalidCrs(_))));
        assert!(matches!("not a crs".parse::<SourceCrs>(), Err(GeometryError::InvalidCrs(_))));
        assert!(matches!("geodesy:".parse::<SourceCrs>(), Err(GeometryError::InvalidCrs(_))));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for crs in [
            SourceCrs::Geographic,
            SourceCrs::WebMercator,
            SourceCrs::Utm { zone: 7, south: true },
        ] {
            assert_eq!(crs.to_string().parse::<SourceCrs>().unwrap(), crs);
        }
    }

    #[test]
    fn test_web_mercator_inverse() {
        let merc = WebMercator::default();
        let (lon, lat) = merc.project(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(lon, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, 0.0, epsilon = 1e-12);

        let half_world = std::f64::consts::PI * WGS84_SEMIMAJOR;
        let (lon, _) = merc.project(half_world, 0.0).unwrap();
        assert_abs_diff_eq!(lon, 180.0, epsilon = 1e-9);

        // y = R * ln(tan(pi/4 + lat/2))，lat = 45°
        let y =
            WGS84_SEMIMAJOR * (std::f64::consts::FRAC_PI_4 + 45f64.to_radians() / 2.0).tan().ln();
        let (_, lat) = merc.project(0.0, y).unwrap();
        assert_abs_diff_eq!(lat, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_web_mercator_rejects_non_finite() {
        assert!(matches!(
            WebMercator::default().project(f64::NAN, 0.0),
            Err(GeometryError::Projection { .. })
        ));
    }

    #[test]
    fn test_utm_central_meridian() {
        let projection = SourceCrs::Utm { zone: 32, south: false }.build().unwrap();
        // 中央经线 9°E，赤道处假东距 500 km
        let (lon, lat) = projection.project(500_000.0, 0.0).unwrap();
        assert_abs_diff_eq!(lon, 9.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_geodesy_definition() {
        assert!(matches!(
            SourceCrs::Geodesy("no_such_operator".to_string()).build(),
            Err(GeometryError::InvalidCrs(_))
        ));
    }

    #[test]
    fn test_closure_projection() {
        let shift = |x: f64, y: f64| -> Result<(f64, f64)> { Ok((x + 1.0, y - 1.0)) };
        assert_eq!(shift.project(1.0, 1.0).unwrap(), (2.0, 0.0));
    }
}
