use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::index::CatalogIndex;
use crate::error::{Result, RuleForgeError};

/// 目录包：事件、操作符与动作目录，三者均可省略
#[derive(Debug, Default, Deserialize)]
pub struct CatalogBundle {
    #[serde(default)]
    pub events: Value,
    #[serde(default)]
    pub operators: Value,
    #[serde(default)]
    pub actions: Value,
}

impl CatalogBundle {
    pub fn into_index(self) -> CatalogIndex {
        CatalogIndex::from_raw(&self.events, &self.operators, &self.actions)
    }
}

/// 从 JSON 字符串加载目录
pub fn load_catalog_from_str(raw: &str) -> Result<CatalogIndex> {
    let bundle: CatalogBundle = serde_json::from_str(raw)
        .map_err(|err| RuleForgeError::catalog("<inline>", err.to_string()))?;
    Ok(bundle.into_index())
}

/// 从文件加载目录
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogIndex> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|err| RuleForgeError::catalog(path.display().to_string(), err.to_string()))?;
    let bundle: CatalogBundle = serde_json::from_str(&raw)
        .map_err(|err| RuleForgeError::catalog(path.display().to_string(), err.to_string()))?;
    tracing::debug!(path = %path.display(), "catalog bundle loaded");
    Ok(bundle.into_index())
}
