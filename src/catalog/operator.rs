use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json::{bool_field, str_field};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub value_required: bool,
    pub multi_value: bool,
}

impl OperatorDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            description: None,
            aliases: Vec::new(),
            value_required: true,
            multi_value: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn value_optional(mut self) -> Self {
        self.value_required = false;
        self
    }

    pub fn multi_value(mut self) -> Self {
        self.multi_value = true;
        self
    }

    fn from_raw(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        let id = str_field(object, &["operator", "value", "op"])?.to_string();
        let label = str_field(object, &["label", "name"])
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());
        let description = str_field(object, &["description"]).map(str::to_string);

        let aliases = match object.get("aliases") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|alias| !alias.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(alias)) if !alias.trim().is_empty() => {
                vec![alias.trim().to_string()]
            }
            _ => Vec::new(),
        };

        Some(Self {
            id,
            label,
            description,
            aliases,
            value_required: bool_field(
                object,
                &["value_required", "valueRequired", "requiresValue"],
                true,
            ),
            multi_value: bool_field(object, &["multi_value", "multiValue"], false),
        })
    }
}

/// 清洗原始操作符列表：格式错误的条目丢弃，重复 id 以首次出现为准
pub fn normalize_operators(raw: &Value) -> Vec<OperatorDescriptor> {
    let Some(entries) = raw.as_array() else {
        if !raw.is_null() {
            tracing::debug!("operator catalog is not an array; ignoring");
        }
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut operators = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match OperatorDescriptor::from_raw(entry) {
            Some(operator) => {
                if seen.insert(operator.id.clone()) {
                    operators.push(operator);
                } else {
                    tracing::debug!(operator = %operator.id, "duplicate operator dropped");
                }
            }
            None => tracing::debug!(index, "malformed operator entry dropped"),
        }
    }
    operators
}
