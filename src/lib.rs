//! 规则表达式编译器
//!
//! 在三种形状之间转换自动化规则：规则引擎消费的嵌套布尔表达式树、规则编辑表单中的
//! 扁平条件列表，以及用于导出导入的可移植 JSON 文档。事件、操作符和动作目录以 JSON
//! 提供，决定表单默认状态和校验。

pub mod catalog;
pub mod cli;
pub mod codec;
pub mod compiler;
pub mod config;
pub mod error;
pub mod expression;
pub mod form;
pub mod portable;
pub mod rule;
pub mod utils;
pub mod validation;

pub use catalog::{
    load_catalog, load_catalog_from_str, ActionDescriptor, ActionParamDescriptor, CatalogIndex,
    EventDescriptor, OperatorDescriptor, ParamKind, VariantSchema,
};
pub use codec::{
    build_action_state, build_condition_field, coerce_value, infer_value_type, reconcile,
    ActionField, ConditionField, ParamMap, ParamValue, ValueType,
};
pub use compiler::RuleCompiler;
pub use config::CompilerConfig;
pub use error::{ImportError, Result, RuleForgeError};
pub use expression::{flatten, Aggregator, Condition, Expression, ExpressionNode, Flattened, Operand};
pub use form::{build_form, compile, FormState};
pub use portable::{PortableAction, PortableCondition, PortableDoc};
pub use rule::{Rule, RuleAction};
pub use utils::{logging, LoggingConfig};
pub use validation::validate;
