//! 程序配置
//!
//! JSON 配置文件 + 命令行覆盖，使用前统一校验。

use anyhow::{bail, Context, Result};
use dxfgeo_core::layer::LayerFilter;
use dxfgeo_core::pipeline::ConversionOptions;
use dxfgeo_core::projection::SourceCrs;
use dxfgeo_core::transform::Transform2D;
use dxfgeo_file::{AltitudeMode, KmlOptions, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 曲线分段数的可用范围
pub const MIN_SEGMENTS: u32 = 12;
pub const MAX_SEGMENTS: u32 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 输入 DXF 文件
    pub input: Option<PathBuf>,
    /// 输出文件，缺省时与输入同名
    pub output: Option<PathBuf>,
    /// 源坐标系，如 `EPSG:32633`
    pub crs: String,
    /// 圆/圆弧/样条的分段数
    pub segments: u32,
    /// 只转换这些图层，空表示全部
    pub layers: Vec<String>,
    pub altitude_mode: AltitudeMode,
    /// 输出格式，缺省时按扩展名推断
    pub format: Option<OutputFormat>,
    /// 图纸单位到源坐标系单位的比例
    pub unit_scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// KML 中按图层分文件夹
    pub folder_per_layer: bool,
    pub document_name: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            crs: "EPSG:4326".to_string(),
            segments: dxfgeo_core::flatten::DEFAULT_SEGMENTS,
            layers: Vec::new(),
            altitude_mode: AltitudeMode::default(),
            format: None,
            unit_scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            folder_per_layer: false,
            document_name: None,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// 校验配置，分段数超出范围时收紧到边界
    pub fn validate(&mut self) -> Result<()> {
        self.source_crs()?;

        let clamped = self.segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        if clamped != self.segments {
            warn!(requested = self.segments, used = clamped, "segment count out of range");
            self.segments = clamped;
        }

        if !self.unit_scale.is_finite() || self.unit_scale == 0.0 {
            bail!("unit scale must be finite and non-zero, got {}", self.unit_scale);
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            bail!("offsets must be finite");
        }
        if self.layers.iter().any(|l| l.is_empty()) {
            bail!("layer names must not be empty");
        }
        Ok(())
    }

    pub fn source_crs(&self) -> Result<SourceCrs> {
        self.crs
            .parse()
            .with_context(|| format!("Unsupported source CRS: {}", self.crs))
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        let layers = if self.layers.is_empty() {
            LayerFilter::all()
        } else {
            LayerFilter::only(self.layers.iter().cloned())
        };

        let transform =
            Transform2D::scale_then_offset(self.unit_scale, self.offset_x, self.offset_y);

        ConversionOptions::default()
            .with_segments(self.segments)
            .with_layers(layers)
            .with_pre_transform(transform)
    }

    pub fn kml_options(&self) -> KmlOptions {
        let mut options = KmlOptions {
            altitude_mode: self.altitude_mode,
            folder_per_layer: self.folder_per_layer,
            ..KmlOptions::default()
        };
        if let Some(name) = &self.document_name {
            options.document_name = name.clone();
        } else if let Some(stem) = self.input.as_deref().and_then(Path::file_stem) {
            options.document_name = stem.to_string_lossy().into_owned();
        }
        options
    }

    /// 输出路径：显式指定或输入文件换扩展名
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => input.with_extension(self.format.unwrap_or_default().extension()),
        }
    }
}
