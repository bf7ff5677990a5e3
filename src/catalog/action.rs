use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::json::{bool_field, str_field};

/// 目录未声明控制参数时，用于选择变体的同级参数
pub const DEFAULT_CONTROLLER: &str = "provider";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionDescriptor {
    #[serde(rename = "type")]
    pub action_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ActionParamDescriptor>,
}

impl ActionDescriptor {
    pub fn new(action_type: impl Into<String>) -> Self {
        let action_type = action_type.into();
        Self {
            label: action_type.clone(),
            action_type,
            description: None,
            params: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_param(mut self, param: ActionParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// 在顶层参数及所有变体参数中查找
    pub fn find_param(&self, name: &str) -> Option<&ActionParamDescriptor> {
        find_in(&self.params, name)
    }

    /// 由 `controller` 控制的变体参数
    pub fn variants_controlled_by<'a>(
        &'a self,
        controller: &'a str,
    ) -> impl Iterator<Item = &'a ActionParamDescriptor> + 'a {
        self.params.iter().filter(move |param| {
            matches!(&param.kind, ParamKind::Variant { controller: c, .. } if c == controller)
        })
    }
}

fn find_in<'a>(
    params: &'a [ActionParamDescriptor],
    name: &str,
) -> Option<&'a ActionParamDescriptor> {
    params.iter().find_map(|param| {
        if param.name == name {
            return Some(param);
        }
        match &param.kind {
            ParamKind::Variant { variants, .. } => variants
                .iter()
                .find_map(|variant| find_in(&variant.params, name)),
            _ => None,
        }
    })
}

/// 动作表单支持的参数类型
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum ParamKind {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "array<string>")]
    StringArray,
    /// 自身不携带值；判别值等于控制参数当前值的变体向动作贡献其参数
    #[serde(rename = "variant")]
    Variant {
        controller: String,
        variants: Vec<VariantSchema>,
    },
}

impl ParamKind {
    fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "number" | "float" => ParamKind::Number,
            "integer" | "int" => ParamKind::Integer,
            "boolean" | "bool" => ParamKind::Boolean,
            "object" | "json" => ParamKind::Object,
            "array<string>" | "array" | "string[]" | "list" => ParamKind::StringArray,
            _ => ParamKind::String,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VariantSchema {
    pub discriminator: String,
    #[serde(default)]
    pub params: Vec<ActionParamDescriptor>,
}

impl VariantSchema {
    pub fn new(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: ActionParamDescriptor) -> Self {
        self.params.push(param);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionParamDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ActionParamDescriptor {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            input_hint: None,
            choices: Vec::new(),
            required: false,
            hidden: false,
            readonly: false,
            default: None,
        }
    }

    pub fn variant(
        name: impl Into<String>,
        controller: impl Into<String>,
        variants: Vec<VariantSchema>,
    ) -> Self {
        Self::new(
            name,
            ParamKind::Variant {
                controller: controller.into(),
                variants,
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_choice(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.push(Choice {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_single_select(&self) -> bool {
        !self.choices.is_empty() && self.kind != ParamKind::StringArray
    }

    /// 按 `controller_value` 选中的变体（仅变体参数）
    pub fn active_variant(&self, controller_value: Option<&str>) -> Option<&VariantSchema> {
        let ParamKind::Variant { variants, .. } = &self.kind else {
            return None;
        };
        let selected = controller_value?;
        variants
            .iter()
            .find(|variant| variant.discriminator == selected)
    }

    fn from_raw(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        let name = str_field(object, &["name"])?.to_string();

        let variants = object
            .get("variants")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(variant_from_raw).collect::<Vec<_>>())
            .unwrap_or_default();

        let kind = if variants.is_empty() {
            str_field(object, &["kind", "type"])
                .map(ParamKind::parse)
                .unwrap_or(ParamKind::String)
        } else {
            ParamKind::Variant {
                controller: str_field(object, &["controller"])
                    .unwrap_or(DEFAULT_CONTROLLER)
                    .to_string(),
                variants,
            }
        };

        let choices = object
            .get("choices")
            .or_else(|| object.get("options"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(choice_from_raw).collect())
            .unwrap_or_default();

        Some(Self {
            name,
            label: str_field(object, &["label"]).map(str::to_string),
            kind,
            input_hint: str_field(object, &["inputHint", "input_hint", "input"])
                .map(str::to_string),
            choices,
            required: bool_field(object, &["required"], false),
            hidden: bool_field(object, &["hidden"], false),
            readonly: bool_field(object, &["readonly", "read_only", "readOnly"], false),
            default: object.get("default").filter(|value| !value.is_null()).cloned(),
        })
    }
}

fn choice_from_raw(raw: &Value) -> Option<Choice> {
    match raw {
        Value::String(value) => Some(Choice {
            value: value.clone(),
            label: value.clone(),
        }),
        Value::Object(object) => {
            let value = choice_value(object)?;
            let label = str_field(object, &["label", "name"])
                .map(str::to_string)
                .unwrap_or_else(|| value.clone());
            Some(Choice { value, label })
        }
        _ => None,
    }
}

fn choice_value(object: &Map<String, Value>) -> Option<String> {
    match object.get("value")? {
        Value::String(value) => Some(value.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn variant_from_raw(raw: &Value) -> Option<VariantSchema> {
    let object = raw.as_object()?;
    let discriminator =
        str_field(object, &["discriminatorValue", "discriminator", "value"])?.to_string();
    let params = object
        .get("params")
        .map(normalize_params)
        .unwrap_or_default();
    Some(VariantSchema {
        discriminator,
        params,
    })
}

fn normalize_params(raw: &Value) -> Vec<ActionParamDescriptor> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(ActionParamDescriptor::from_raw)
        .filter(|param| seen.insert(param.name.clone()))
        .collect()
}

/// 清洗原始动作目录：缺少 `type` 的条目丢弃，重复类型以首次出现为准
pub fn normalize_actions(raw: &Value) -> Vec<ActionDescriptor> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut actions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            tracing::debug!(index, "malformed action entry dropped");
            continue;
        };
        let Some(action_type) = str_field(object, &["type"]) else {
            tracing::debug!(index, "action entry without type dropped");
            continue;
        };
        if !seen.insert(action_type.to_string()) {
            tracing::debug!(action = %action_type, "duplicate action dropped");
            continue;
        }
        actions.push(ActionDescriptor {
            action_type: action_type.to_string(),
            label: str_field(object, &["label", "name"])
                .unwrap_or(action_type)
                .to_string(),
            description: str_field(object, &["description"]).map(str::to_string),
            params: object.get("params").map(normalize_params).unwrap_or_default(),
        });
    }
    actions
}
