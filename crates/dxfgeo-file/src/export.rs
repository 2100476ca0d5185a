//! 导出模块
//!
//! 将几何记录写出为 KML 或 GeoJSON

use crate::error::FileError;
use crate::geojson;
use crate::kml::{KmlOptions, KmlWriter};
use dxfgeo_core::record::GeometryRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Kml,
    GeoJson,
}

impl OutputFormat {
    /// 按扩展名推断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "kml" => Some(OutputFormat::Kml),
            "geojson" | "json" => Some(OutputFormat::GeoJson),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Kml => "kml",
            OutputFormat::GeoJson => "geojson",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kml" => Ok(OutputFormat::Kml),
            "geojson" | "json" => Ok(OutputFormat::GeoJson),
            _ => Err(FileError::InvalidFormat(format!("Unknown output format: {}", s))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 渲染为字符串
pub fn render(
    records: &[GeometryRecord],
    format: OutputFormat,
    kml_options: &KmlOptions,
) -> Result<String, FileError> {
    match format {
        OutputFormat::Kml => Ok(KmlWriter::new(kml_options.clone()).write(records)),
        OutputFormat::GeoJson => Ok(geojson::write(records)?),
    }
}

/// 通用导出函数
///
/// `format` 为 `None` 时按输出路径扩展名推断。
pub fn write_records(
    records: &[GeometryRecord],
    format: Option<OutputFormat>,
    kml_options: &KmlOptions,
    path: &Path,
) -> Result<OutputFormat, FileError> {
    let format = match format.or_else(|| OutputFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(FileError::InvalidFormat(format!(
                "Cannot infer output format from {}",
                path.display()
            )))
        }
    };

    let content = render(records, format, kml_options)?;
    std::fs::write(path, content)?;

    info!(path = %path.display(), %format, records = records.len(), "output written");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfgeo_core::math::vertex2;
    use dxfgeo_core::record::GeometryKind;

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.KML")), Some(OutputFormat::Kml));
        assert_eq!(OutputFormat::from_path(Path::new("out.geojson")), Some(OutputFormat::GeoJson));
        assert_eq!(OutputFormat::from_path(Path::new("out.json")), Some(OutputFormat::GeoJson));
        assert_eq!(OutputFormat::from_path(Path::new("out.shp")), None);
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("GeoJSON".parse::<OutputFormat>().unwrap(), OutputFormat::GeoJson);
        assert!("svg".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_records_to_file() {
        let records = vec![GeometryRecord::new(
            GeometryKind::Line,
            "Roads",
            vec![vertex2(8.0, 47.0), vertex2(8.1, 47.1)],
        )];
        let file_name = format!("dxfgeo-export-{}.geojson", std::process::id());
        let path = std::env::temp_dir().join(file_name);

        let format = write_records(&records, None, &KmlOptions::default(), &path).unwrap();
        assert_eq!(format, OutputFormat::GeoJson);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"FeatureCollection\""));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_write_records_unknown_extension() {
        let path = std::env::temp_dir().join("dxfgeo-export-unknown.txt");
        assert!(matches!(
            write_records(&[], None, &KmlOptions::default(), &path),
            Err(FileError::InvalidFormat(_))
        ));
    }
}
