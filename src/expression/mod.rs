// 表达式树：规则引擎消费的嵌套布尔结构

mod flatten;
mod node;

pub use flatten::{flatten, Flattened};
pub use node::{Aggregator, Condition, Expression, ExpressionNode, Operand, PathRef};
