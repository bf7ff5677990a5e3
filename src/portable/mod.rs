//! 可移植的导出/导入文档
//!
//! 文档是扁平的且不依赖目录，可在部署之间复制或存为文件。导入是严格的：
//! 每个结构问题都以具体的 [`ImportError`] 报告。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ImportError;
use crate::expression::{flatten, Aggregator, Condition, Expression, Operand, PathRef};
use crate::rule::{coerce_priority, Rule, RuleAction};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortableDoc {
    pub name: String,
    pub description: String,
    pub event: String,
    pub priority: i64,
    pub active: bool,
    pub aggregator: Aggregator,
    pub conditions: Vec<PortableCondition>,
    pub actions: Vec<PortableAction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortableCondition {
    pub path: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(
        rename = "comparePath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortableAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

pub fn serialize(rule: &Rule) -> PortableDoc {
    let flattened = flatten(&rule.expression);
    let conditions = flattened
        .conditions
        .iter()
        .map(|condition| {
            let (value, compare_path) = match &condition.right {
                Some(Operand::Path(reference)) => (None, Some(reference.path.clone())),
                Some(Operand::Literal(literal)) => (Some(literal.clone()), None),
                None => (None, None),
            };
            PortableCondition {
                path: condition.left.path.clone(),
                operator: condition.op.clone(),
                value,
                compare_path,
            }
        })
        .collect();

    PortableDoc {
        name: rule.name.clone(),
        description: rule.description.clone().unwrap_or_default(),
        event: rule.event.clone(),
        priority: rule.priority,
        active: rule.active,
        aggregator: rule.expression.aggregator(),
        conditions,
        actions: rule
            .actions
            .iter()
            .map(|action| PortableAction {
                action_type: action.action_type.clone(),
                params: action.params.clone(),
            })
            .collect(),
    }
}

/// 格式化的导出文本
pub fn to_json_string(rule: &Rule) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serialize(rule))
}

pub fn deserialize_str(raw: &str) -> Result<Rule, ImportError> {
    if raw.trim().is_empty() {
        return Err(ImportError::EmptyInput);
    }
    let value: Value =
        serde_json::from_str(raw).map_err(|err| ImportError::InvalidJson(err.to_string()))?;
    deserialize_value(&value)
}

pub fn deserialize_value(value: &Value) -> Result<Rule, ImportError> {
    let document = value.as_object().ok_or(ImportError::NotAnObject)?;

    let raw_conditions = document
        .get("conditions")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or(ImportError::NoConditions)?;
    let conditions = raw_conditions
        .iter()
        .enumerate()
        .map(|(idx, raw)| import_condition(idx + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let raw_actions = document
        .get("actions")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or(ImportError::NoActions)?;
    let actions = raw_actions
        .iter()
        .enumerate()
        .map(|(idx, raw)| import_action(idx + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let text = |key: &str| {
        document
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let description = text("description");
    let aggregator = document
        .get("aggregator")
        .and_then(Value::as_str)
        .map(Aggregator::normalize)
        .unwrap_or_default();

    Ok(Rule {
        name: text("name"),
        description: (!description.trim().is_empty()).then_some(description),
        event: text("event"),
        priority: document.get("priority").map(coerce_priority).unwrap_or(0),
        active: !matches!(document.get("active"), Some(Value::Bool(false))),
        expression: Expression::flat(aggregator, conditions),
        actions,
    })
}

fn import_condition(index: usize, raw: &Value) -> Result<Condition, ImportError> {
    let object = raw
        .as_object()
        .ok_or(ImportError::ConditionMissingPath { index })?;
    let path = non_blank(object, "path").ok_or(ImportError::ConditionMissingPath { index })?;
    let operator =
        non_blank(object, "operator").ok_or(ImportError::ConditionMissingOperator { index })?;

    let right = if let Some(compare) = non_blank(object, "comparePath") {
        Some(Operand::Path(PathRef::new(compare)))
    } else if let Some(right) = present(object, "right") {
        Some(Operand::from(right.clone()))
    } else if let Some(value) = present(object, "value") {
        Some(Operand::Literal(value.clone()))
    } else {
        present(object, "values").map(|values| Operand::Literal(values.clone()))
    };

    Ok(Condition {
        op: operator.to_string(),
        left: PathRef::new(path),
        right,
    })
}

fn import_action(index: usize, raw: &Value) -> Result<RuleAction, ImportError> {
    let object = raw
        .as_object()
        .ok_or(ImportError::ActionMissingType { index })?;
    let action_type =
        non_blank(object, "type").ok_or(ImportError::ActionMissingType { index })?;
    let params = object
        .get("params")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    Ok(RuleAction {
        action_type: action_type.to_string(),
        params,
    })
}

fn non_blank<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_path_references_as_compare_path() {
        let rule = Rule {
            name: "r".into(),
            description: None,
            event: "e".into(),
            priority: 3,
            active: true,
            expression: Expression::flat(
                Aggregator::Or,
                vec![
                    Condition::new(">", "$.a", Some(Operand::path("$.b"))),
                    Condition::new("in", "$.c", Some(Operand::literal(json!(["x", "y"])))),
                    Condition::new("exists", "$.d", None),
                ],
            ),
            actions: vec![RuleAction::new("tag")],
        };

        assert_eq!(
            serde_json::to_value(serialize(&rule)).unwrap(),
            json!({
                "name": "r",
                "description": "",
                "event": "e",
                "priority": 3,
                "active": true,
                "aggregator": "or",
                "conditions": [
                    { "path": "$.a", "operator": ">", "comparePath": "$.b" },
                    { "path": "$.c", "operator": "in", "value": ["x", "y"] },
                    { "path": "$.d", "operator": "exists" }
                ],
                "actions": [{ "type": "tag", "params": {} }]
            })
        );
    }

    #[test]
    fn unknown_aggregators_export_as_and() {
        let mut rule = deserialize_value(&json!({
            "conditions": [{ "path": "$.a", "operator": "==", "value": 1 }],
            "actions": [{ "type": "t" }]
        }))
        .unwrap();
        rule.expression.op = "nand".into();
        assert_eq!(serialize(&rule).aggregator, Aggregator::And);
    }

    #[test]
    fn right_resolution_priority() {
        let rule = deserialize_value(&json!({
            "conditions": [
                { "path": "$.a", "operator": "==", "comparePath": "$.b", "value": 1 },
                { "path": "$.a", "operator": "==", "right": { "path": "$.c" }, "value": 1 },
                { "path": "$.a", "operator": "==", "right": 5, "value": 1 },
                { "path": "$.a", "operator": "==", "value": 1, "values": [2] },
                { "path": "$.a", "operator": "in", "values": [2, 3] },
                { "path": "$.a", "operator": "exists" }
            ],
            "actions": [{ "type": "t" }]
        }))
        .unwrap();

        let rights: Vec<_> = flatten(&rule.expression)
            .conditions
            .into_iter()
            .map(|condition| condition.right)
            .collect();
        assert_eq!(
            rights,
            vec![
                Some(Operand::path("$.b")),
                Some(Operand::path("$.c")),
                Some(Operand::literal(5)),
                Some(Operand::literal(1)),
                Some(Operand::literal(json!([2, 3]))),
                None,
            ]
        );
    }

    #[test]
    fn import_defaults() {
        let rule = deserialize_value(&json!({
            "name": "R",
            "priority": "9.7",
            "active": "false",
            "aggregator": "whatever",
            "conditions": [{ "path": "$.a", "operator": "==", "value": 1 }],
            "actions": [{ "type": "t", "params": { "k": "v" }, "id": "client-only" }]
        }))
        .unwrap();

        assert_eq!(rule.priority, 9);
        assert!(rule.active);
        assert_eq!(rule.expression.op, "and");
        assert_eq!(rule.description, None);
        assert_eq!(rule.event, "");
        assert_eq!(rule.actions, vec![RuleAction::new("t").with_param("k", "v")]);
    }

    #[test]
    fn import_errors_are_specific() {
        assert_eq!(deserialize_str("  "), Err(ImportError::EmptyInput));
        assert!(matches!(deserialize_str("{nope"), Err(ImportError::InvalidJson(_))));
        assert_eq!(deserialize_str("[1]"), Err(ImportError::NotAnObject));
        assert_eq!(
            deserialize_value(&json!({ "conditions": [{ "operator": "==" }], "actions": [{}] })),
            Err(ImportError::ConditionMissingPath { index: 1 })
        );
        assert_eq!(
            deserialize_value(&json!({
                "conditions": [{ "path": "$.a", "operator": "==" }, { "path": "$.b" }],
                "actions": [{ "type": "t" }]
            })),
            Err(ImportError::ConditionMissingOperator { index: 2 })
        );
        assert_eq!(
            deserialize_value(&json!({
                "conditions": [{ "path": "$.a", "operator": "==" }],
                "actions": []
            })),
            Err(ImportError::NoActions)
        );
        assert_eq!(
            deserialize_value(&json!({
                "conditions": [{ "path": "$.a", "operator": "==" }],
                "actions": [{ "params": {} }]
            })),
            Err(ImportError::ActionMissingType { index: 1 })
        );
    }
}
