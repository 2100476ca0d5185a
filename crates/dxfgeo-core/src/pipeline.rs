//! 转换管线
//!
//! 图层过滤 → 几何提取 → 仿射变换 → 重投影 → 确定输出类型。
//! 每个实体独立处理，单个实体失败只跳过它本身，其余实体继续。

use crate::entity::DrawingEntity;
use crate::error::{GeometryError, Result};
use crate::extract::extract;
use crate::flatten::DEFAULT_SEGMENTS;
use crate::layer::LayerFilter;
use crate::math::BoundingBox2;
use crate::projection::Projection;
use crate::record::{FeatureCounts, GeometryRecord};
use crate::transform::Transform2D;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 转换选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// 曲线分段数（至少为 1）
    pub segments: u32,
    /// 图层允许列表
    pub layers: LayerFilter,
    /// 投影前的仿射变换
    pub pre_transform: Transform2D,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            layers: LayerFilter::all(),
            pre_transform: Transform2D::identity(),
        }
    }
}

impl ConversionOptions {
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_layers(mut self, layers: LayerFilter) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_pre_transform(mut self, transform: Transform2D) -> Self {
        self.pre_transform = transform;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.segments == 0 {
            return Err(GeometryError::InvalidResolution(self.segments));
        }
        Ok(())
    }
}

/// 被跳过的实体
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFailure {
    /// 实体在输入中的序号
    pub index: usize,
    pub layer: String,
    pub entity_type: &'static str,
    pub error: GeometryError,
}

/// 转换统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub counts: FeatureCounts,
    /// 被图层过滤掉的实体数
    pub filtered: usize,
    pub failures: Vec<EntityFailure>,
    /// 输出要素的经纬度范围
    pub extent: Option<BoundingBox2>,
}

impl ConversionReport {
    /// 已处理（未被过滤）的实体数
    pub fn processed(&self) -> usize {
        self.counts.total() + self.failures.len()
    }
}

/// 转换结果
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub records: Vec<GeometryRecord>,
    pub report: ConversionReport,
}

enum Outcome {
    Filtered,
    Converted(GeometryRecord),
    Failed(EntityFailure),
}

/// 转换器：持有一次转换中固定的投影与选项
pub struct Converter<P> {
    projection: P,
    options: ConversionOptions,
}

impl<P: Projection> Converter<P> {
    pub fn new(projection: P, options: ConversionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            projection,
            options,
        })
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// 转换单个实体（不做图层过滤）
    pub fn convert_entity(&self, entity: &DrawingEntity) -> Result<GeometryRecord> {
        let record = extract(entity, self.options.segments)?
            .transformed(&self.options.pre_transform)
            .reprojected(&self.projection)?;
        Ok(record.settled())
    }

    fn process(&self, index: usize, entity: &DrawingEntity) -> Outcome {
        if !self.options.layers.allows(&entity.layer) {
            return Outcome::Filtered;
        }

        match self.convert_entity(entity) {
            Ok(record) => {
                debug!(
                    index,
                    layer = %entity.layer,
                    kind = %record.kind,
                    vertices = record.vertices.len(),
                    "entity converted"
                );
                Outcome::Converted(record)
            }
            Err(error) => {
                warn!(
                    index,
                    layer = %entity.layer,
                    entity_type = entity.shape.type_name(),
                    %error,
                    "skipping entity"
                );
                Outcome::Failed(EntityFailure {
                    index,
                    layer: entity.layer.clone(),
                    entity_type: entity.shape.type_name(),
                    error,
                })
            }
        }
    }

    /// 顺序转换所有实体
    pub fn run<'a, I>(&self, entities: I) -> Conversion
    where
        I: IntoIterator<Item = &'a DrawingEntity>,
    {
        let outcomes = entities
            .into_iter()
            .enumerate()
            .map(|(index, entity)| self.process(index, entity));
        collect(outcomes)
    }
}

impl<P: Projection + Sync> Converter<P> {
    /// 并行转换，输出顺序与输入一致
    pub fn run_parallel(&self, entities: &[DrawingEntity]) -> Conversion {
        let outcomes: Vec<Outcome> = entities
            .par_iter()
            .enumerate()
            .map(|(index, entity)| self.process(index, entity))
            .collect();
        collect(outcomes)
    }
}

fn collect(outcomes: impl IntoIterator<Item = Outcome>) -> Conversion {
    let mut conversion = Conversion::default();
    let report = &mut conversion.report;

    for outcome in outcomes {
        match outcome {
            Outcome::Filtered => report.filtered += 1,
            Outcome::Converted(record) => {
                report.counts.record(record.kind);
                let bbox = record.bounding_box();
                report.extent = Some(match report.extent {
                    Some(extent) => extent.union(&bbox),
                    None => bbox,
                });
                conversion.records.push(record);
            }
            Outcome::Failed(failure) => report.failures.push(failure),
        }
    }

    info!(
        points = report.counts.points,
        lines = report.counts.lines,
        paths = report.counts.paths,
        rings = report.counts.rings,
        filtered = report.filtered,
        skipped = report.failures.len(),
        "conversion finished"
    );
    conversion
}
