use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::condition::{coerce_bool, stringify_value};

/// 单个动作参数的可编辑值
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
    Object(Map<String, Value>),
}

impl ParamValue {
    pub fn text(value: impl Into<String>) -> Self {
        ParamValue::Text(value.into())
    }

    /// 存储值的通用编辑形式：数组以逗号连接，布尔和对象原样保留，其余转为字符串
    pub fn from_stored(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => ParamValue::Flag(*flag),
            Value::Object(object) => ParamValue::Object(object.clone()),
            Value::Array(items) => ParamValue::Text(join_list(items)),
            other => ParamValue::Text(stringify_value(Some(other))),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Text(text) => text.clone(),
            ParamValue::Flag(flag) => flag.to_string(),
            ParamValue::Object(object) => Value::Object(object.clone()).to_string(),
        }
    }

    /// 规范布尔读取：布尔原样通过，文本仅 `"true"` 为真
    pub fn to_bool(&self) -> bool {
        match self {
            ParamValue::Flag(flag) => *flag,
            ParamValue::Text(text) => coerce_bool(&Value::String(text.clone())),
            ParamValue::Object(_) => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ParamValue::Text(text) => Value::String(text.clone()),
            ParamValue::Flag(flag) => Value::Bool(*flag),
            ParamValue::Object(object) => Value::Object(object.clone()),
        }
    }
}

pub(crate) fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| stringify_value(Some(item)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn split_list(text: &str) -> Vec<Value> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| Value::String(item.to_string()))
        .collect()
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| ParamValue::from_stored(&value))
    }
}

/// 编辑中动作的参数表，保持插入顺序
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 已存在时原位替换，保持原有位置
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(position).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }
}

impl<K: Into<String>> FromIterator<(K, ParamValue)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, ParamValue)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParamMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .map(|(key, value)| (key.clone(), ParamValue::from_stored(value)))
            .collect())
    }
}
