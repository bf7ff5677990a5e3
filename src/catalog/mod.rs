// 目录模块：规范化外部目录并建立索引

pub mod action;
pub mod event;
pub mod index;
pub mod loader;
pub mod operator;

pub use action::{
    normalize_actions, ActionDescriptor, ActionParamDescriptor, Choice, ParamKind, VariantSchema,
    DEFAULT_CONTROLLER,
};
pub use event::{normalize_events, EventDescriptor};
pub use index::CatalogIndex;
pub use loader::{load_catalog, load_catalog_from_str, CatalogBundle};
pub use operator::{normalize_operators, OperatorDescriptor};
