//! 图层过滤
//!
//! 允许列表为空表示不过滤；否则只处理名称完全匹配（区分大小写）的图层。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 图层允许列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerFilter {
    allowed: BTreeSet<String>,
}

impl LayerFilter {
    /// 不过滤任何图层
    pub fn all() -> Self {
        Self::default()
    }

    /// 只允许指定的图层
    pub fn only<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: layers.into_iter().map(Into::into).collect(),
        }
    }

    /// 添加允许的图层
    pub fn allow(&mut self, layer: impl Into<String>) {
        self.allowed.insert(layer.into());
    }

    /// 是否不做过滤
    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    /// 图层是否被允许
    pub fn allows(&self, layer: &str) -> bool {
        self.allowed.is_empty() || self.allowed.contains(layer)
    }

    /// 允许的图层名
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LayerFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::only(iter)
    }
}
