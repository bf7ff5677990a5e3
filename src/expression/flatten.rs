use super::node::{Aggregator, Condition, Expression, ExpressionNode};

/// 表达式树扁平化为线性条件列表的结果
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flattened {
    pub conditions: Vec<Condition>,
    /// 嵌套分组的聚合符与父级不同时置位；扁平列表无法表达该分组，只报告不修复
    pub collapsed_nesting: bool,
}

/// 深度优先、先序扁平化 `expression`
pub fn flatten(expression: &Expression) -> Flattened {
    let mut flattened = Flattened::default();
    walk(expression, expression.aggregator(), &mut flattened);
    if flattened.collapsed_nesting {
        tracing::warn!(
            conditions = flattened.conditions.len(),
            "mixed aggregators collapsed while flattening expression"
        );
    }
    flattened
}

fn walk(expression: &Expression, aggregator: Aggregator, out: &mut Flattened) {
    for node in &expression.args {
        match node {
            ExpressionNode::Condition(condition) => out.conditions.push(condition.clone()),
            ExpressionNode::Group(group) => {
                let nested = group.aggregator();
                if nested != aggregator {
                    out.collapsed_nesting = true;
                }
                walk(group, nested, out);
            }
            ExpressionNode::Unrecognized(_) => {
                tracing::debug!("skipping unrecognized expression node");
            }
        }
    }
}
