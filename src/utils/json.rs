use serde_json::{Map, Number, Value};

/// 按 `keys` 顺序取第一个非空字符串
pub fn str_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// 目录标志的宽松布尔读取
///
/// 接受布尔、数字（非零为真）以及几种常见字符串写法。
pub fn loose_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// 按 `keys` 顺序取第一个标志，否则为 `default`
pub fn bool_field(object: &Map<String, Value>, keys: &[&str], default: bool) -> bool {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(loose_bool)
        .unwrap_or(default)
}

/// 按文本框显示方式渲染数字：整数值浮点数去掉 `.0`
pub fn number_to_string(number: &Number) -> String {
    if number.is_f64() {
        if let Some(float) = number.as_f64() {
            if let Some(int) = integral(float) {
                return int.to_string();
            }
        }
    }
    number.to_string()
}

/// 构造 JSON 数字，`float` 无小数部分时优先用整数表示
pub fn number_value(float: f64) -> Option<Value> {
    if !float.is_finite() {
        return None;
    }
    match integral(float) {
        Some(int) => Some(Value::from(int)),
        None => Number::from_f64(float).map(Value::Number),
    }
}

fn integral(float: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    if float.is_finite() && float.fract() == 0.0 && float.abs() <= LIMIT {
        Some(float as i64)
    } else {
        None
    }
}
