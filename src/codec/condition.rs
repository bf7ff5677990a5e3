use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expression::{Condition, Operand, PathRef};
use crate::utils::json::{number_to_string, number_value};

/// 条件值在编辑表单中的类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Number,
    Boolean,
}

/// 表单中的单个条件，值始终以字符串形式编辑
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionField {
    pub path: String,
    pub operator: String,
    pub value: String,
    pub value_type: ValueType,
    /// 跨字段比较时右侧引用的路径
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_path: Option<String>,
}

impl ConditionField {
    pub fn empty(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            ..Self::default()
        }
    }

    pub fn compare_path(&self) -> Option<&str> {
        self.compare_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

/// 推断值类型：数字、布尔，其余（包括缺失和 null）均为字符串
pub fn infer_value_type(value: Option<&Value>) -> ValueType {
    match value {
        Some(Value::Number(_)) => ValueType::Number,
        Some(Value::Bool(_)) => ValueType::Boolean,
        _ => ValueType::String,
    }
}

/// 将编辑中的字符串转换为目标类型
///
/// 数字解析失败时原样返回字符串，不会静默变为 0。
pub fn coerce_value(raw: &str, value_type: ValueType) -> Value {
    match value_type {
        ValueType::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Value::String(raw.to_string());
            }
            let parsed = match trimmed.parse::<i64>() {
                Ok(int) => Some(Value::from(int)),
                Err(_) => trimmed.parse::<f64>().ok().and_then(number_value),
            };
            parsed.unwrap_or_else(|| Value::String(raw.to_string()))
        }
        ValueType::Boolean => Value::Bool(raw == "true"),
        ValueType::String => Value::String(raw.to_string()),
    }
}

/// 规范布尔转换：布尔值原样通过，字符串仅 `"true"` 为真
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text == "true",
        _ => false,
    }
}

/// 布尔感知的字符串化，null 和缺失值为空字符串
pub fn stringify_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number_to_string(number),
        Some(other) => other.to_string(),
    }
}

pub fn build_condition_field(condition: &Condition) -> ConditionField {
    let (value, value_type, compare_path) = match &condition.right {
        Some(Operand::Path(reference)) => (
            String::new(),
            ValueType::String,
            Some(reference.path.clone()),
        ),
        Some(Operand::Literal(literal)) => (
            stringify_value(Some(literal)),
            infer_value_type(Some(literal)),
            None,
        ),
        None => (String::new(), ValueType::String, None),
    };

    ConditionField {
        path: condition.left.path.clone(),
        operator: condition.op.clone(),
        value,
        value_type,
        compare_path,
    }
}

/// 表单条件还原为表达式叶子；可选值的操作符同样写出右值（可能为空字符串）
pub fn condition_from_field(field: &ConditionField) -> Condition {
    let right = match field.compare_path() {
        Some(path) => Operand::Path(PathRef::new(path)),
        None => Operand::Literal(coerce_value(&field.value, field.value_type)),
    };
    Condition {
        op: field.operator.clone(),
        left: PathRef::new(field.path.trim()),
        right: Some(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn infers_types() {
        assert_eq!(infer_value_type(Some(&json!(1.5))), ValueType::Number);
        assert_eq!(infer_value_type(Some(&json!(false))), ValueType::Boolean);
        assert_eq!(infer_value_type(Some(&json!("x"))), ValueType::String);
        assert_eq!(infer_value_type(Some(&Value::Null)), ValueType::String);
        assert_eq!(infer_value_type(None), ValueType::String);
    }

    #[test]
    fn number_coercion_falls_back_to_text() {
        assert_eq!(coerce_value("42", ValueType::Number), json!(42));
        assert_eq!(coerce_value(" 2.5 ", ValueType::Number), json!(2.5));
        assert_eq!(coerce_value("1e3", ValueType::Number), json!(1000));
        assert_eq!(coerce_value("12abc", ValueType::Number), json!("12abc"));
        assert_eq!(coerce_value("", ValueType::Number), json!(""));
        assert_eq!(coerce_value("NaN", ValueType::Number), json!("NaN"));
    }

    #[test]
    fn boolean_coercion_is_literal() {
        assert_eq!(coerce_value("true", ValueType::Boolean), json!(true));
        assert_eq!(coerce_value("TRUE", ValueType::Boolean), json!(false));
        assert_eq!(coerce_value("yes", ValueType::Boolean), json!(false));
        assert!(coerce_bool(&json!(true)));
        assert!(!coerce_bool(&json!(1)));
    }

    #[test]
    fn stringifies_for_editing() {
        assert_eq!(stringify_value(Some(&json!(true))), "true");
        assert_eq!(stringify_value(Some(&json!(3.0))), "3");
        assert_eq!(stringify_value(Some(&json!(null))), "");
        assert_eq!(stringify_value(Some(&json!(["a", "b"]))), r#"["a","b"]"#);
    }

    #[test]
    fn path_reference_becomes_compare_path() {
        let condition = Condition::new(">", "$.a", Some(Operand::path("$.b")));
        let field = build_condition_field(&condition);
        assert_eq!(field.compare_path.as_deref(), Some("$.b"));
        assert_eq!(field.value, "");
        assert_eq!(condition_from_field(&field), condition);
    }

    #[test]
    fn unknown_operators_pass_through() {
        let condition = Condition::new("eq", "$.a", Some(Operand::literal(5)));
        let field = build_condition_field(&condition);
        assert_eq!(field.operator, "eq");
        assert_eq!(field.value_type, ValueType::Number);
        assert_eq!(condition_from_field(&field), condition);
    }
}
