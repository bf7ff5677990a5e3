use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::expression::Expression;

/// 编译后的规则，即规则存储中读写的形状
///
/// 读取是宽松的，外部编写的记录也能加载：缺失或 `null` 字段取默认值，
/// `priority` 接受浮点数和数字字符串。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: i64,
    #[serde(default = "default_active", deserialize_with = "lenient_active")]
    pub active: bool,
    #[serde(default)]
    pub expression: Expression,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<RuleAction>,
}

/// 缺失的 `type` 读为空字符串，由校验报告
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub action_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Map<String, Value>,
}

impl RuleAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// 有限数字（向零截断）或数字字符串，其余为 `0`
pub fn coerce_priority(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(text) => parse_priority(text),
        _ => 0,
    }
}

/// 解析文本框中输入的优先级，非数字输入得到 `0`
pub fn parse_priority(text: &str) -> i64 {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        })
        .unwrap_or(0)
}

fn default_active() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Value::deserialize(deserializer).map(|value| coerce_priority(&value))
}

fn lenient_active<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|value| !matches!(value, Value::Bool(false)))
}
