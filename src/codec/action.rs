use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::condition::{coerce_bool, stringify_value};
use super::params::{join_list, split_list, ParamMap, ParamValue};
use crate::catalog::{ActionDescriptor, ActionParamDescriptor, CatalogIndex, ParamKind};
use crate::rule::RuleAction;
use crate::utils::json::number_value;

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// 动作行的客户端关联键，不会写入载荷
pub fn next_action_id() -> String {
    format!("action-{}", NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// 单个规则动作的可编辑状态
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionField {
    #[serde(default = "next_action_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub action_type: String,
    #[serde(default)]
    pub params: ParamMap,
    /// 动作类型不在目录中（例如连接器已停用）
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub impaired: bool,
    /// 受损动作的原始参数，保存时原样写回
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retained: Option<Map<String, Value>>,
}

impl ActionField {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            id: next_action_id(),
            action_type: action_type.into(),
            params: ParamMap::new(),
            impaired: false,
            retained: None,
        }
    }
}

pub fn default_param(descriptor: &ActionParamDescriptor) -> Option<ParamValue> {
    let default = descriptor.default.as_ref();
    let value = match &descriptor.kind {
        ParamKind::Variant { .. } => return None,
        _ if descriptor.is_single_select() => match default {
            Some(value) => ParamValue::Text(stringify_value(Some(value))),
            None => ParamValue::Text(
                descriptor
                    .choices
                    .first()
                    .map(|choice| choice.value.clone())
                    .unwrap_or_default(),
            ),
        },
        ParamKind::StringArray => ParamValue::Text(String::new()),
        ParamKind::Object => match default {
            Some(Value::Object(object)) => ParamValue::Object(object.clone()),
            _ => ParamValue::Object(Map::new()),
        },
        ParamKind::Boolean => ParamValue::Flag(default.map(coerce_bool).unwrap_or(true)),
        ParamKind::String | ParamKind::Number | ParamKind::Integer => {
            ParamValue::Text(stringify_value(default))
        }
    };
    Some(value)
}

pub fn build_action_state(descriptor: &ActionDescriptor) -> ActionField {
    let mut field = ActionField::new(descriptor.action_type.clone());
    seed_defaults(&descriptor.params, &mut field.params);
    seed_variants(&descriptor.params, &mut field.params);
    field
}

fn seed_defaults(params: &[ActionParamDescriptor], into: &mut ParamMap) {
    for param in params {
        if into.contains(&param.name) {
            continue;
        }
        if let Some(value) = default_param(param) {
            into.insert(param.name.clone(), value);
        }
    }
}

/// 为当前选中的变体补齐缺失参数，递归处理嵌套变体
fn seed_variants(params: &[ActionParamDescriptor], into: &mut ParamMap) {
    for param in params {
        let ParamKind::Variant { controller, .. } = &param.kind else {
            continue;
        };
        let selected = into.get(controller).map(ParamValue::to_text);
        if let Some(variant) = param.active_variant(selected.as_deref()) {
            seed_defaults(&variant.params, into);
            seed_variants(&variant.params, into);
        }
    }
}

/// 更新单个参数；修改变体控制参数时，替换为新变体的默认参数
pub fn set_param(
    field: &mut ActionField,
    descriptor: &ActionDescriptor,
    name: &str,
    value: ParamValue,
) {
    field.params.insert(name, value);

    let controlled: Vec<&ActionParamDescriptor> =
        descriptor.variants_controlled_by(name).collect();
    if controlled.is_empty() {
        return;
    }

    let selected = field.params.get(name).map(ParamValue::to_text);
    for param in controlled {
        let ParamKind::Variant { variants, .. } = &param.kind else {
            continue;
        };
        let active = param.active_variant(selected.as_deref());
        for variant in variants {
            if active.map_or(false, |a| a.discriminator == variant.discriminator) {
                continue;
            }
            for stale in &variant.params {
                let shared = active
                    .map_or(false, |a| a.params.iter().any(|p| p.name == stale.name));
                if !shared {
                    field.params.remove(&stale.name);
                }
            }
        }
        if let Some(active) = active {
            seed_defaults(&active.params, &mut field.params);
            seed_variants(&active.params, &mut field.params);
        }
    }
}

/// 根据已存储的动作重建可编辑状态
///
/// 目录中不存在的类型会被保留并标记为受损，其配置不会丢弃。
pub fn reconcile(stored: &RuleAction, catalog: &CatalogIndex) -> ActionField {
    let Some(descriptor) = catalog.action(&stored.action_type) else {
        tracing::warn!(
            action = %stored.action_type,
            "action type not in catalog; keeping it as impaired"
        );
        let mut field = ActionField::new(stored.action_type.clone());
        for (name, value) in &stored.params {
            field.params.insert(name.clone(), ParamValue::from_stored(value));
        }
        field.impaired = true;
        field.retained = Some(stored.params.clone());
        return field;
    };

    let mut field = ActionField::new(descriptor.action_type.clone());
    seed_defaults(&descriptor.params, &mut field.params);
    for (name, value) in &stored.params {
        let editable = match descriptor.find_param(name) {
            Some(param) => editable_value(param, value),
            None => ParamValue::from_stored(value),
        };
        field.params.insert(name.clone(), editable);
    }
    seed_variants(&descriptor.params, &mut field.params);
    field
}

/// 同 [`reconcile`]，但保留已有行的客户端 id
pub fn reconcile_into(field: &mut ActionField, stored: &RuleAction, catalog: &CatalogIndex) {
    let id = std::mem::take(&mut field.id);
    *field = reconcile(stored, catalog);
    field.id = id;
}

fn editable_value(param: &ActionParamDescriptor, value: &Value) -> ParamValue {
    match (&param.kind, value) {
        (ParamKind::Boolean, value) => ParamValue::Flag(coerce_bool(value)),
        (_, Value::Array(items)) => ParamValue::Text(join_list(items)),
        (ParamKind::Object, Value::Object(object)) => ParamValue::Object(object.clone()),
        (_, value) => ParamValue::Text(stringify_value(Some(value))),
    }
}

/// 当前生效的参数：声明的参数加上各选中变体的参数
pub fn active_params<'a>(
    descriptor: &'a ActionDescriptor,
    params: &ParamMap,
) -> Vec<&'a ActionParamDescriptor> {
    let mut collected = Vec::new();
    collect_active(&descriptor.params, params, &mut collected);
    collected
}

fn collect_active<'a>(
    declared: &'a [ActionParamDescriptor],
    params: &ParamMap,
    out: &mut Vec<&'a ActionParamDescriptor>,
) {
    for param in declared {
        match &param.kind {
            ParamKind::Variant { controller, .. } => {
                let selected = params.get(controller).map(ParamValue::to_text);
                if let Some(variant) = param.active_variant(selected.as_deref()) {
                    collect_active(&variant.params, params, out);
                }
            }
            _ => out.push(param),
        }
    }
}

/// 按类型规范化后的参数载荷值，为空时返回 `None`
pub fn normalize_param(
    param: &ActionParamDescriptor,
    value: Option<&ParamValue>,
) -> Option<Value> {
    if param.kind == ParamKind::Boolean {
        return Some(Value::Bool(value.map_or(false, ParamValue::to_bool)));
    }
    let value = value?;
    match (&param.kind, value) {
        (ParamKind::Object, ParamValue::Object(object)) => {
            (!object.is_empty()).then(|| Value::Object(object.clone()))
        }
        (_, ParamValue::Object(object)) => Some(Value::Object(object.clone())),
        (_, ParamValue::Flag(flag)) => Some(Value::String(flag.to_string())),
        (kind, ParamValue::Text(text)) => normalize_text(kind, text),
    }
}

fn normalize_text(kind: &ParamKind, text: &str) -> Option<Value> {
    if *kind == ParamKind::StringArray {
        let items = split_list(text);
        return (!items.is_empty()).then_some(Value::Array(items));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = match kind {
        ParamKind::Number => trimmed.parse::<f64>().ok().and_then(number_value),
        ParamKind::Integer => trimmed
            .parse::<i64>()
            .ok()
            .map(Value::from)
            .or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(number_value)
                    .filter(Value::is_i64)
            }),
        ParamKind::Object => serde_json::from_str::<Value>(trimmed)
            .ok()
            .filter(Value::is_object),
        _ => None,
    };
    Some(parsed.unwrap_or_else(|| Value::String(trimmed.to_string())))
}

fn empty_value(kind: &ParamKind) -> Value {
    match kind {
        ParamKind::StringArray => Value::Array(Vec::new()),
        ParamKind::Object => Value::Object(Map::new()),
        ParamKind::Boolean => Value::Bool(false),
        _ => Value::String(String::new()),
    }
}

/// 将可编辑动作编译为载荷
///
/// 规范化后为空的可选参数省略，必填参数始终写出。未选中变体的参数以及描述符
/// 未声明的键都会丢弃；只有受损动作会写回未声明的键。
pub fn compile_action(field: &ActionField, catalog: &CatalogIndex) -> RuleAction {
    let action_type = field.action_type.trim().to_string();
    let mut params = Map::new();

    let Some(descriptor) = catalog.action(&action_type) else {
        for (name, value) in field.params.iter() {
            let retained = field.retained.as_ref().and_then(|raw| raw.get(name));
            if let Some(raw) = retained.filter(|raw| ParamValue::from_stored(raw) == *value) {
                params.insert(name.to_string(), raw.clone());
            } else if let Some(wire) = generic_wire_value(value) {
                params.insert(name.to_string(), wire);
            }
        }
        return RuleAction {
            action_type,
            params,
        };
    };

    for param in active_params(descriptor, &field.params) {
        match normalize_param(param, field.params.get(&param.name)) {
            Some(value) => {
                params.insert(param.name.clone(), value);
            }
            None if param.required => {
                params.insert(param.name.clone(), empty_value(&param.kind));
            }
            None => {}
        }
    }

    RuleAction {
        action_type,
        params,
    }
}

fn generic_wire_value(value: &ParamValue) -> Option<Value> {
    match value {
        ParamValue::Flag(flag) => Some(Value::Bool(*flag)),
        ParamValue::Object(object) => Some(Value::Object(object.clone())),
        ParamValue::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
    }
}
