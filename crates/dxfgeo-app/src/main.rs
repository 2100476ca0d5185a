//! dxfgeo 命令行入口
//!
//! 读取 DXF 图纸，投影到 WGS84 后写出 KML 或 GeoJSON。

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use config::AppConfig;
use dxfgeo_core::pipeline::{Conversion, Converter};
use dxfgeo_core::record::GeometryKind;
use dxfgeo_file::{write_records, AltitudeMode, ImportedDrawing, OutputFormat};

/// 将 DXF 图纸转换为 KML / GeoJSON
#[derive(Parser, Debug)]
#[command(name = "dxfgeo", version, about = "Convert DXF drawings to KML or GeoJSON")]
struct Args {
    /// 输入 DXF 文件
    input: Option<PathBuf>,

    /// 输出文件（.kml / .geojson）
    output: Option<PathBuf>,

    /// JSON 配置文件，命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,

    /// 源坐标系，如 EPSG:32633、EPSG:3857 或 geodesy:<定义>
    #[arg(long)]
    crs: Option<String>,

    /// 曲线分段数
    #[arg(long)]
    segments: Option<u32>,

    /// 只转换指定图层，可重复
    #[arg(long = "layer")]
    layers: Vec<String>,

    /// clampToGround / relativeToGround / absolute
    #[arg(long)]
    altitude_mode: Option<AltitudeMode>,

    /// kml / geojson
    #[arg(long)]
    format: Option<OutputFormat>,

    /// 图纸单位比例，如 0.001 表示毫米转米
    #[arg(long)]
    unit_scale: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<f64>,

    /// KML 按图层分文件夹
    #[arg(long)]
    folders: bool,

    /// 只列出图层
    #[arg(long)]
    list_layers: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.input = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if let Some(crs) = &self.crs {
            config.crs = crs.clone();
        }
        if let Some(segments) = self.segments {
            config.segments = segments;
        }
        if !self.layers.is_empty() {
            config.layers = self.layers.clone();
        }
        if let Some(mode) = self.altitude_mode {
            config.altitude_mode = mode;
        }
        if let Some(format) = self.format {
            config.format = Some(format);
        }
        if let Some(scale) = self.unit_scale {
            config.unit_scale = scale;
        }
        if let Some(dx) = self.offset_x {
            config.offset_x = dx;
        }
        if let Some(dy) = self.offset_y {
            config.offset_y = dy;
        }
        if self.folders {
            config.folder_per_layer = true;
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish(),
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    debug!(?config, "configuration");

    let input = config.input.clone().context("No input DXF file given")?;
    let drawing = ImportedDrawing::open(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if args.list_layers {
        for (layer, count) in drawing.entities_per_layer() {
            println!("{}\t{}", layer, count);
        }
        return Ok(());
    }

    let crs = config.source_crs()?;
    let projection = crs
        .build()
        .with_context(|| format!("Failed to set up projection for {}", crs))?;
    let converter = Converter::new(projection, config.conversion_options())?;

    info!(input = %input.display(), %crs, entities = drawing.entities.len(), "converting");
    let conversion = converter.run(&drawing.entities);

    let output = config.output_path(&input);
    let format = write_records(&conversion.records, config.format, &config.kml_options(), &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_summary(&drawing, &conversion, format, &output);
    Ok(())
}

fn print_summary(
    drawing: &ImportedDrawing,
    conversion: &Conversion,
    format: OutputFormat,
    output: &Path,
) {
    let report = &conversion.report;

    println!("Wrote {} features to {} ({})", conversion.records.len(), output.display(), format);
    for kind in [GeometryKind::Point, GeometryKind::Line, GeometryKind::Path, GeometryKind::Ring] {
        println!("  {:<6} {}", kind.as_str(), report.counts.get(kind));
    }

    if report.filtered > 0 {
        println!("Filtered by layer: {}", report.filtered);
    }
    for (type_name, count) in &drawing.unsupported {
        println!("Unsupported {}: {}", type_name, count);
    }
    if !report.failures.is_empty() {
        println!("Failed entities: {}", report.failures.len());
        for failure in &report.failures {
            println!(
                "  #{} {} on {}: {}",
                failure.index, failure.entity_type, failure.layer, failure.error
            );
        }
    }

    if let Some(extent) = &report.extent {
        println!(
            "Extent: lon {:.6}..{:.6}, lat {:.6}..{:.6}",
            extent.min.x, extent.max.x, extent.min.y, extent.max.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "dxfgeo",
            "plan.dxf",
            "--crs",
            "EPSG:32633",
            "--layer",
            "Roads",
            "--layer",
            "Trees",
            "--offset-x",
            "-500",
            "--altitude-mode",
            "absolute",
            "--format",
            "geojson",
        ]);

        let mut config = AppConfig {
            segments: 32,
            ..AppConfig::default()
        };
        args.apply(&mut config);
        config.validate().unwrap();

        assert_eq!(config.input, Some(PathBuf::from("plan.dxf")));
        assert_eq!(config.layers, vec!["Roads", "Trees"]);
        assert_eq!(config.offset_x, -500.0);
        assert_eq!(config.segments, 32);
        assert_eq!(config.altitude_mode, AltitudeMode::Absolute);
        assert_eq!(config.output_path(Path::new("plan.dxf")), PathBuf::from("plan.geojson"));
    }
}
