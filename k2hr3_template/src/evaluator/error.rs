//! Failures raised while evaluating a node
//!
//! These never leave the evaluator as `Err`; they are folded into a failed
//! [`super::ExecutionResult`].

use crate::ast::NodeId;
use crate::logging::{codes, Code};

pub type ExecutionOutcome<T> = Result<T, ExecutionError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    #[error("'{operator}' expects {expected}, found {found}")]
    TypeMismatch {
        operator: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{operator}' operands must have the same kind, found {left} and {right}")]
    MismatchedOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("'{operator}' by zero")]
    DivisionByZero { operator: &'static str },

    #[error("Invalid assignment: {message}")]
    InvalidAssignment { message: String },

    #[error("Loop exceeded {limit} iterations")]
    LoopLimitExceeded { limit: u64 },

    #[error("Maximum execution depth {max} exceeded")]
    MaxDepthExceeded { max: usize },

    #[error("No template has been loaded")]
    NotLoaded,

    #[error("Node {node} is not assembled")]
    UnassembledNode { node: NodeId },
}

impl ExecutionError {
    pub fn type_mismatch(operator: &'static str, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            operator,
            expected,
            found,
        }
    }

    pub fn invalid_assignment(message: impl Into<String>) -> Self {
        Self::InvalidAssignment {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::TypeMismatch { .. } | Self::MismatchedOperands { .. } => {
                codes::execution::TYPE_MISMATCH
            }
            Self::DivisionByZero { .. } => codes::execution::DIVISION_BY_ZERO,
            Self::InvalidAssignment { .. } => codes::execution::INVALID_ASSIGNMENT,
            Self::LoopLimitExceeded { .. } => codes::execution::LOOP_LIMIT_EXCEEDED,
            Self::MaxDepthExceeded { .. } => codes::execution::MAX_EXECUTION_DEPTH,
            Self::NotLoaded => codes::execution::NOT_LOADED,
            Self::UnassembledNode { .. } => codes::execution::UNASSEMBLED_NODE,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}
