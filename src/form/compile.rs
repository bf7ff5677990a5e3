use crate::catalog::CatalogIndex;
use crate::codec::{compile_action, condition_from_field};
use crate::expression::Expression;
use crate::rule::{parse_priority, Rule};

use super::state::FormState;

/// 将表单编译为载荷；应先运行校验，本函数不会失败
pub fn compile(form: &FormState, catalog: &CatalogIndex) -> Rule {
    let description = form.description.trim();
    let conditions = form.conditions.iter().map(condition_from_field).collect();
    let actions = form
        .actions
        .iter()
        .map(|action| compile_action(action, catalog))
        .collect();

    Rule {
        name: form.name.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        event: form.event.trim().to_string(),
        priority: parse_priority(&form.priority),
        active: form.active,
        expression: Expression::flat(form.aggregator, conditions),
        actions,
    }
}
