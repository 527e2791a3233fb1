//! Assembler errors with code mapping and source spans

use crate::ast::{ArenaError, NodeType, SyntaxKind};
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type AssembleResult<T> = Result<T, AssembleError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssembleError {
    #[error("Unexpected {found} in {node_type} statement at {span}")]
    UnexpectedUnit {
        node_type: NodeType,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of statement in {node_type}: expected {expected} at {span}")]
    UnexpectedEnd {
        node_type: NodeType,
        expected: String,
        span: Span,
    },

    #[error("'{unit}' is neither a variable nor a literal at {span}")]
    InvalidLiteral { unit: String, span: Span },

    #[error("No statement kind accepts {found} at {span}")]
    UnknownStatement { found: String, span: Span },

    #[error("'{keyword}' has no matching {expected} at {span}")]
    UnmatchedTerminator {
        keyword: SyntaxKind,
        expected: String,
        span: Span,
    },

    #[error("'{keyword}' block starting at {span} is never closed")]
    UnterminatedBlock { keyword: SyntaxKind, span: Span },

    #[error("Invalid operand for {node_type}: {message} at {span}")]
    InvalidOperand {
        node_type: NodeType,
        message: String,
        span: Span,
    },

    #[error("'{keyword}' outside of a loop at {span}")]
    MisplacedControl { keyword: SyntaxKind, span: Span },

    #[error("Maximum assembler depth {max} exceeded at {span}")]
    MaxDepthExceeded { max: usize, span: Span },

    #[error("Internal assembler error: {0}")]
    Internal(#[from] ArenaError),
}

impl AssembleError {
    pub fn unexpected_unit(node_type: NodeType, found: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedUnit {
            node_type,
            found: found.into(),
            span,
        }
    }

    pub fn unexpected_end(node_type: NodeType, expected: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedEnd {
            node_type,
            expected: expected.into(),
            span,
        }
    }

    pub fn invalid_operand(node_type: NodeType, message: impl Into<String>, span: Span) -> Self {
        Self::InvalidOperand {
            node_type,
            message: message.into(),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedUnit { .. } | Self::UnknownStatement { .. } => {
                codes::assembler::UNEXPECTED_UNIT
            }
            Self::UnexpectedEnd { .. } => codes::assembler::UNEXPECTED_END,
            Self::InvalidLiteral { .. } => codes::tokenizer::INVALID_LITERAL,
            Self::UnmatchedTerminator { .. } => codes::assembler::UNMATCHED_TERMINATOR,
            Self::UnterminatedBlock { .. } => codes::assembler::UNTERMINATED_BLOCK,
            Self::InvalidOperand { .. } => codes::assembler::INVALID_OPERAND,
            Self::MisplacedControl { .. } => codes::assembler::MISPLACED_CONTROL,
            Self::MaxDepthExceeded { .. } => codes::assembler::MAX_RECURSION_DEPTH,
            Self::Internal(_) => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedUnit { span, .. }
            | Self::UnexpectedEnd { span, .. }
            | Self::InvalidLiteral { span, .. }
            | Self::UnknownStatement { span, .. }
            | Self::UnmatchedTerminator { span, .. }
            | Self::UnterminatedBlock { span, .. }
            | Self::InvalidOperand { span, .. }
            | Self::MisplacedControl { span, .. }
            | Self::MaxDepthExceeded { span, .. } => Some(*span),
            Self::Internal(_) => None,
        }
    }

    /// Node kind whose attempt produced the error, when known
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            Self::UnexpectedUnit { node_type, .. }
            | Self::UnexpectedEnd { node_type, .. }
            | Self::InvalidOperand { node_type, .. } => Some(*node_type),
            Self::UnmatchedTerminator { .. }
            | Self::UnterminatedBlock { .. }
            | Self::MisplacedControl { .. } => Some(NodeType::Syntax),
            Self::InvalidLiteral { .. } => Some(NodeType::Variable),
            Self::UnknownStatement { .. } | Self::MaxDepthExceeded { .. } | Self::Internal(_) => {
                None
            }
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_spans() {
        let error = AssembleError::UnterminatedBlock {
            keyword: SyntaxKind::If,
            span: Span::dummy(),
        };
        assert_eq!(error.error_code(), codes::assembler::UNTERMINATED_BLOCK);
        assert_eq!(error.node_type(), Some(NodeType::Syntax));
        assert_eq!(error.span(), Some(Span::dummy()));
        assert!(error.to_string().contains("'if'"));
    }

    #[test]
    fn test_internal_error_from_arena() {
        let error: AssembleError = ArenaError::UnknownNode(crate::ast::NodeId(9)).into();
        assert_eq!(error.error_code(), codes::system::INTERNAL_ERROR);
        assert!(error.span().is_none());
    }
}
