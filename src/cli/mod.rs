use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::CatalogIndex;
use crate::error::{Result, RuleForgeError};

/// `catalog` 列表中的一行
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub section: &'static str,
    pub id: String,
    pub label: String,
    pub detail: String,
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let content = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(content)
}

/// 指定 `output` 时写入文件，否则写到标准输出
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{content}"),
    }
    Ok(())
}

pub fn catalog_entries(catalog: &CatalogIndex) -> Vec<CatalogEntry> {
    let events = catalog.events().iter().map(|event| CatalogEntry {
        section: "event",
        id: event.event_type.clone(),
        label: event.label.clone(),
        detail: event.description.clone().unwrap_or_default(),
    });
    let operators = catalog.operators().iter().map(|operator| CatalogEntry {
        section: "operator",
        id: operator.id.clone(),
        label: operator.label.clone(),
        detail: match (operator.value_required, operator.multi_value) {
            (false, _) => "no value".to_string(),
            (true, true) => "multiple values".to_string(),
            (true, false) => String::new(),
        },
    });
    let actions = catalog.actions().iter().map(|action| CatalogEntry {
        section: "action",
        id: action.action_type.clone(),
        label: action.label.clone(),
        detail: action
            .params
            .iter()
            .map(|param| {
                if param.required {
                    format!("{}*", param.name)
                } else {
                    param.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
    });
    events.chain(operators).chain(actions).collect()
}

/// 将校验问题转换为 CLI 报告的错误
pub fn ensure_valid(issues: Vec<String>) -> Result<()> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(RuleForgeError::Invalid(issues))
    }
}
