// Internal modules
#[macro_use]
pub mod logging;
pub mod assembler;
pub mod ast;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod segmenter;
pub mod template_file;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use engine::{render, EngineStatistics, LoadError, TemplateEngine};
pub use evaluator::{ExecutionResult, Value, VariableMap};
