/// 工具模块 - 日志与 JSON 辅助函数
pub mod json;
pub mod logging;

pub use logging::LoggingConfig;
