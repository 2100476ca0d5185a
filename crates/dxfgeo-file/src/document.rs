//! 导入后的图纸

use dxfgeo_core::entity::DrawingEntity;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 从文档源读入的实体集合
#[derive(Debug, Clone, Default)]
pub struct ImportedDrawing {
    /// 模型空间实体（保持文件中的顺序）
    pub entities: Vec<DrawingEntity>,

    /// 图层表中的图层名
    pub layer_table: Vec<String>,

    /// 不支持而被跳过的实体数，按类型名统计
    pub unsupported: BTreeMap<String, usize>,

    /// 文件路径
    file_path: Option<PathBuf>,
}

impl ImportedDrawing {
    /// 创建空图纸
    pub fn new() -> Self {
        Self::default()
    }

    /// 从文件加载
    pub fn open(path: impl AsRef<Path>) -> Result<Self, crate::FileError> {
        let path = path.as_ref();

        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("dxf") => crate::dxf_io::import(path),
            _ => Err(crate::FileError::InvalidFormat(format!(
                "Unknown input file extension: {}",
                path.display()
            ))),
        }
    }

    pub fn set_file_path(&mut self, path: impl AsRef<Path>) {
        self.file_path = Some(path.as_ref().to_path_buf());
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// 添加实体
    pub fn add_entity(&mut self, entity: DrawingEntity) {
        self.entities.push(entity);
    }

    /// 记录一个不支持的实体
    pub fn skip_unsupported(&mut self, type_name: &str) {
        *self.unsupported.entry(type_name.to_string()).or_insert(0) += 1;
    }

    /// 不支持的实体总数
    pub fn unsupported_count(&self) -> usize {
        self.unsupported.values().sum()
    }

    /// 每个图层上的实体数量，包含图层表中没有实体的图层，按名称排序
    pub fn entities_per_layer(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for layer in &self.layer_table {
            counts.entry(layer.as_str()).or_insert(0);
        }
        for entity in &self.entities {
            *counts.entry(entity.layer.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfgeo_core::math::vertex2;

    #[test]
    fn test_entities_per_layer_merges_table_and_entities() {
        let mut drawing = ImportedDrawing::new();
        drawing.layer_table = vec!["0".to_string(), "Empty".to_string()];
        drawing.add_entity(DrawingEntity::point("Survey", vertex2(0.0, 0.0)));
        drawing.add_entity(DrawingEntity::point("0", vertex2(1.0, 0.0)));
        drawing.add_entity(DrawingEntity::point("Survey", vertex2(2.0, 0.0)));

        let counts = drawing.entities_per_layer();
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec!["0", "Empty", "Survey"]);
        assert_eq!(counts["Survey"], 2);
        assert_eq!(counts["Empty"], 0);
        assert_eq!(counts["0"], 1);
    }

    #[test]
    fn test_unsupported_counts() {
        let mut drawing = ImportedDrawing::new();
        drawing.skip_unsupported("Text");
        drawing.skip_unsupported("Text");
        drawing.skip_unsupported("Hatch");
        assert_eq!(drawing.unsupported_count(), 3);
        assert_eq!(drawing.unsupported["Text"], 2);
    }

    #[test]
    fn test_open_rejects_unknown_extension() {
        assert!(matches!(
            ImportedDrawing::open("drawing.dwg"),
            Err(crate::FileError::InvalidFormat(_))
        ));
    }
}
