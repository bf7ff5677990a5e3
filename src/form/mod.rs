// 表单编译：规则 <-> 可编辑表单 <-> 提交载荷

mod compile;
mod state;

pub use compile::compile;
pub use state::{build_form, FormState};
