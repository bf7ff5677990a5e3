pub mod compiler;
pub mod env;

pub use compiler::CompilerConfig;
pub use env::EnvConfig;
