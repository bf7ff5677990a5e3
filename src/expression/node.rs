use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// 表达式分组的布尔聚合符
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    #[default]
    And,
    Or,
}

impl Aggregator {
    /// 除 `or`（不区分大小写）外一律视为 `and`
    pub fn normalize(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("or") {
            Aggregator::Or
        } else {
            Aggregator::And
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::And => "and",
            Aggregator::Or => "or",
        }
    }
}

/// 指向事件载荷的 JSON 路径
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRef {
    #[serde(default)]
    pub path: String,
}

impl PathRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// 条件右值：另一个路径或字面量
///
/// 任何带字符串 `path` 键的 JSON 对象都视为路径引用。
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Path(PathRef),
    Literal(Value),
}

impl Operand {
    pub fn path(path: impl Into<String>) -> Self {
        Operand::Path(PathRef::new(path))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Operand::Literal(value) => Some(value),
            Operand::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&str> {
        match self {
            Operand::Path(reference) => Some(reference.path.as_str()),
            Operand::Literal(_) => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        if let Some(Value::String(path)) = value.get("path") {
            return Operand::path(path.clone());
        }
        Operand::Literal(value)
    }
}

impl From<&Operand> for Value {
    fn from(operand: &Operand) -> Self {
        match operand {
            Operand::Path(reference) => {
                let mut object = Map::new();
                object.insert("path".into(), Value::String(reference.path.clone()));
                Value::Object(object)
            }
            Operand::Literal(value) => value.clone(),
        }
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Operand::from)
    }
}

/// 表达式树的比较叶子
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Condition {
    pub op: String,
    pub left: PathRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Operand>,
}

impl Condition {
    pub fn new(op: impl Into<String>, path: impl Into<String>, right: Option<Operand>) -> Self {
        Self {
            op: op.into(),
            left: PathRef::new(path),
            right,
        }
    }

    /// 宽松读取叶子：`left` 缺少字符串 `path` 时路径为空，`op` 非字符串时操作符为空，
    /// 右值为 `null` 时视为缺失
    fn from_object(object: &Map<String, Value>) -> Self {
        let path = object
            .get("left")
            .and_then(|left| left.get("path"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let op = object.get("op").and_then(Value::as_str).unwrap_or_default();
        let right = object
            .get("right")
            .filter(|right| !right.is_null())
            .cloned()
            .map(Operand::from);
        Self::new(op, path, right)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(Condition::from_object(&object)),
            other => Err(D::Error::custom(format!(
                "expected a condition object, found {other}"
            ))),
        }
    }
}

/// 分组节点 `{ op, args }`，`op` 原样保留，通过 [`Expression::aggregator`] 解释
///
/// 读取不会失败：缺失或非字符串的 `op` 视为 `and`，缺失的 `args` 视为空列表，
/// 非对象视为空表达式。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Expression {
    pub op: String,
    pub args: Vec<ExpressionNode>,
}

impl Expression {
    fn from_object(object: &Map<String, Value>) -> Self {
        let op = object
            .get("op")
            .and_then(Value::as_str)
            .unwrap_or(Aggregator::And.as_str());
        let args: Vec<ExpressionNode> = object
            .get("args")
            .and_then(Value::as_array)
            .map(|items| items.iter().cloned().map(ExpressionNode::from).collect())
            .unwrap_or_default();
        Self {
            op: op.to_string(),
            args,
        }
    }

    pub fn new(aggregator: Aggregator, args: Vec<ExpressionNode>) -> Self {
        Self {
            op: aggregator.as_str().to_string(),
            args,
        }
    }

    /// 单个聚合符包裹扁平叶子，编译器只写出这种形状
    pub fn flat(aggregator: Aggregator, conditions: Vec<Condition>) -> Self {
        Self::new(
            aggregator,
            conditions.into_iter().map(ExpressionNode::Condition).collect(),
        )
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::normalize(&self.op)
    }

    pub fn is_flat(&self) -> bool {
        self.args
            .iter()
            .all(|node| !matches!(node, ExpressionNode::Group(_)))
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::new(Aggregator::And, Vec::new())
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_object()
            .map(Expression::from_object)
            .unwrap_or_default())
    }
}

/// 表达式分组的子节点
///
/// 同时含 `left` 和 `op` 的节点是叶子（不论 `left` 形状），含 `args` 数组的是分组，
/// 其余原样保留，扁平化时忽略。
#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionNode {
    Condition(Condition),
    Group(Expression),
    Unrecognized(Value),
}

impl From<Value> for ExpressionNode {
    fn from(value: Value) -> Self {
        let parsed = value.as_object().and_then(|object| {
            if object.contains_key("left") && object.contains_key("op") {
                Some(ExpressionNode::Condition(Condition::from_object(object)))
            } else if object.get("args").map_or(false, Value::is_array) {
                Some(ExpressionNode::Group(Expression::from_object(object)))
            } else {
                None
            }
        });
        parsed.unwrap_or(ExpressionNode::Unrecognized(value))
    }
}

impl Serialize for ExpressionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExpressionNode::Condition(condition) => condition.serialize(serializer),
            ExpressionNode::Group(group) => group.serialize(serializer),
            ExpressionNode::Unrecognized(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ExpressionNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ExpressionNode::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_shaped_objects_are_references() {
        assert_eq!(Operand::from(json!({ "path": "$.a" })), Operand::path("$.a"));
        assert_eq!(
            Operand::from(json!({ "path": 3 })),
            Operand::Literal(json!({ "path": 3 }))
        );
        assert_eq!(Operand::from(json!([1, 2])), Operand::literal(json!([1, 2])));
    }

    #[test]
    fn classifies_nodes() {
        let expression: Expression = serde_json::from_value(json!({
            "op": "and",
            "args": [
                { "op": "==", "left": { "path": "$.a" }, "right": 1 },
                { "op": "or", "args": [] },
                { "weird": true },
                "text"
            ]
        }))
        .unwrap();

        assert!(matches!(expression.args[0], ExpressionNode::Condition(_)));
        assert!(matches!(expression.args[1], ExpressionNode::Group(_)));
        assert!(matches!(expression.args[2], ExpressionNode::Unrecognized(_)));
        assert!(matches!(expression.args[3], ExpressionNode::Unrecognized(_)));
        assert!(!expression.is_flat());
    }

    #[test]
    fn absent_right_stays_absent_on_write() {
        let condition = Condition::new("exists", "$.user.id", None);
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            json!({ "op": "exists", "left": { "path": "$.user.id" } })
        );
    }

    #[test]
    fn malformed_leaves_stay_leaves() {
        let expression: Expression = serde_json::from_value(json!({
            "op": "and",
            "args": [
                { "op": "==", "left": null, "right": 2 },
                { "op": "==", "left": "$.c", "right": null },
                { "op": 7, "left": { "path": 3 }, "right": "x" }
            ]
        }))
        .unwrap();

        assert_eq!(
            expression.args,
            vec![
                ExpressionNode::Condition(Condition::new("==", "", Some(Operand::literal(2)))),
                ExpressionNode::Condition(Condition::new("==", "", None)),
                ExpressionNode::Condition(Condition::new("", "", Some(Operand::literal("x")))),
            ]
        );
    }

    #[test]
    fn non_object_expression_reads_as_empty() {
        let expression: Expression = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(expression, Expression::default());
        let expression: Expression = serde_json::from_value(json!({ "op": null })).unwrap();
        assert_eq!(expression.op, "and");
        assert!(expression.args.is_empty());
    }

    #[test]
    fn aggregator_normalization() {
        assert_eq!(Aggregator::normalize("OR"), Aggregator::Or);
        assert_eq!(Aggregator::normalize("xor"), Aggregator::And);
    }
}
