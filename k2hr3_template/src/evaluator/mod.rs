//! Evaluator: runs an assembled template against a variable map

mod error;
mod interpreter;
pub mod operators;
mod result;
mod value;

pub use error::{ExecutionError, ExecutionOutcome};
pub use interpreter::Interpreter;
pub use result::{ExecutionResult, VariablePath};
pub use value::{Value, VariableMap};

use crate::assembler::AssembledTemplate;

/// Execute every top-level statement of `template` in order
pub fn execute(
    template: &AssembledTemplate,
    variables: &mut VariableMap,
    loop_budget: Option<u64>,
) -> ExecutionResult {
    Interpreter::new(&template.arena, variables)
        .with_loop_budget(loop_budget)
        .execute_forest(&template.roots)
}
