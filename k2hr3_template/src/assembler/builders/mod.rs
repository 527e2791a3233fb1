//! Node builders tried by the assembler, one per node kind

pub mod formula;
pub mod statements;
pub mod syntax;
pub mod variable;

use super::{AssembleError, AssembleResult, Assembler};
use crate::ast::{NodeId, NodeKind, NodeType, Slot};
use crate::tokens::Token;
use crate::utils::Span;

/// Entry points of one node kind
pub struct Builder {
    pub node_type: NodeType,
    /// Cheap check on the leading token
    pub can_attempt: fn(&Assembler) -> bool,
    pub assemble: fn(&mut Assembler, Option<NodeId>) -> AssembleResult<NodeId>,
}

/// Trial order of the node kinds
pub const BUILDERS: [Builder; 7] = [
    Builder {
        node_type: NodeType::Static,
        can_attempt: statements::can_attempt_static,
        assemble: statements::assemble_static,
    },
    Builder {
        node_type: NodeType::Comment,
        can_attempt: statements::can_attempt_comment,
        assemble: statements::assemble_comment,
    },
    Builder {
        node_type: NodeType::Print,
        can_attempt: statements::can_attempt_print,
        assemble: statements::assemble_print,
    },
    Builder {
        node_type: NodeType::Syntax,
        can_attempt: syntax::can_attempt_syntax,
        assemble: syntax::assemble_syntax,
    },
    Builder {
        node_type: NodeType::Condition,
        can_attempt: formula::can_attempt_condition,
        assemble: formula::assemble_condition,
    },
    Builder {
        node_type: NodeType::Calculate,
        can_attempt: formula::can_attempt_calculate,
        assemble: formula::assemble_calculate,
    },
    Builder {
        node_type: NodeType::Variable,
        can_attempt: variable::can_attempt_variable,
        assemble: variable::assemble_variable_statement,
    },
];

/// Allocate a node under `parent`
pub(crate) fn new_node(
    asm: &mut Assembler,
    kind: NodeKind,
    parent: Option<NodeId>,
    span: Span,
) -> AssembleResult<NodeId> {
    let node = asm.arena.alloc(kind, span);
    if parent.is_some() {
        asm.arena.link(node, Slot::Parent, parent)?;
    }
    Ok(node)
}

/// Record the node's final span and mark it assembled
pub(crate) fn finish(asm: &mut Assembler, node: NodeId, start: usize) -> AssembleResult<NodeId> {
    let span = asm.span_from(start);
    asm.arena.set_span(node, span)?;
    asm.arena.mark_assembled(node)?;
    Ok(node)
}

pub(crate) fn at_statement_end(asm: &Assembler) -> bool {
    asm.tokens
        .current_token()
        .map_or(true, Token::is_statement_end)
}

/// Consume the `;` or `}}` ending a statement
pub(crate) fn expect_statement_end(asm: &mut Assembler, node_type: NodeType) -> AssembleResult<()> {
    match asm.tokens.current_token() {
        Some(Token::Semicolon) | Some(Token::Close) => {
            asm.tokens.advance();
            Ok(())
        }
        None | Some(Token::Text(_)) => Ok(()),
        Some(token) => Err(AssembleError::unexpected_unit(
            node_type,
            token.describe(),
            asm.tokens.current_span(),
        )),
    }
}

/// Consume the unit `expected` or fail
pub(crate) fn expect_unit(
    asm: &mut Assembler,
    node_type: NodeType,
    expected: &str,
) -> AssembleResult<()> {
    if asm.tokens.advance_if_unit(expected) {
        return Ok(());
    }

    let span = asm.tokens.current_span();
    match asm.tokens.current_token() {
        Some(Token::Unit(found)) => Err(AssembleError::unexpected_unit(
            node_type,
            format!("'{}' where '{}' was expected", found, expected),
            span,
        )),
        _ => Err(AssembleError::unexpected_end(
            node_type,
            format!("'{}'", expected),
            span,
        )),
    }
}
