#![allow(dead_code)]

use ruleforge::{Aggregator, CatalogIndex, Condition, Expression, Operand, Rule, RuleAction};
use serde_json::json;

pub fn catalog() -> CatalogIndex {
    CatalogIndex::from_raw(
        &json!([
            { "type": "http.request", "name": "HTTP request" },
            { "type": "mcp.tool_call", "name": "MCP tool call" }
        ]),
        &json!([
            { "operator": "==", "label": "equals" },
            { "operator": ">", "label": "greater than" },
            { "operator": "exists", "value_required": false }
        ]),
        &json!([
            {
                "type": "tag",
                "label": "Tag",
                "params": [{ "name": "tags", "kind": "array<string>", "required": true }]
            },
            {
                "type": "webhook",
                "label": "Webhook",
                "params": [
                    { "name": "url", "required": true },
                    { "name": "method", "choices": ["POST", "PUT"] },
                    { "name": "retry", "kind": "boolean" },
                    { "name": "timeout", "kind": "integer" },
                    { "name": "headers", "kind": "object" }
                ]
            }
        ]),
    )
}

/// A rule with one aggregator level, as the compiler writes them.
pub fn flat_rule() -> Rule {
    Rule {
        name: "Block admin".into(),
        description: Some("Flags admin traffic".into()),
        event: "http.request".into(),
        priority: 5,
        active: false,
        expression: Expression::flat(
            Aggregator::Or,
            vec![
                Condition::new("==", "$.path", Some(Operand::literal("/admin"))),
                Condition::new(">", "$.status", Some(Operand::literal(400))),
                Condition::new("==", "$.secure", Some(Operand::literal(true))),
                Condition::new("==", "$.host", Some(Operand::path("$.origin"))),
            ],
        ),
        actions: vec![
            RuleAction::new("tag").with_param("tags", json!(["admin", "audit"])),
            RuleAction::new("webhook")
                .with_param("url", "https://hooks.example.com")
                .with_param("method", "PUT")
                .with_param("retry", false)
                .with_param("timeout", 30)
                .with_param("headers", json!({ "x-source": "ruleforge" })),
        ],
    }
}
