//! Static text, comment and print statements

use super::{at_statement_end, expect_statement_end, finish, formula, new_node};
use crate::assembler::{AssembleError, AssembleResult, Assembler};
use crate::ast::{NodeId, NodeKind, NodeType, Slot};
use crate::tokens::token::is_comment_unit;
use crate::tokens::Token;

pub fn can_attempt_static(asm: &Assembler) -> bool {
    matches!(asm.tokens.current_token(), Some(Token::Text(_)))
}

pub fn assemble_static(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let span = asm.tokens.current_span();
    let text = match asm.tokens.advance().map(|token| token.value) {
        Some(Token::Text(text)) => text,
        _ => {
            return Err(AssembleError::unexpected_end(
                NodeType::Static,
                "literal text",
                span,
            ))
        }
    };

    let node = new_node(asm, NodeKind::StaticText(text), parent, span)?;
    finish(asm, node, start)
}

pub fn can_attempt_comment(asm: &Assembler) -> bool {
    asm.tokens.current_unit().is_some_and(is_comment_unit)
}

pub fn assemble_comment(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let span = asm.tokens.current_span();
    let text = asm
        .tokens
        .current_unit()
        .map(str::to_string)
        .unwrap_or_default();
    asm.tokens.advance();

    let node = new_node(asm, NodeKind::Comment(text), parent, span)?;
    expect_statement_end(asm, NodeType::Comment)?;
    finish(asm, node, start)
}

pub fn can_attempt_print(asm: &Assembler) -> bool {
    asm.tokens.current_unit() == Some("=")
}

pub fn assemble_print(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let span = asm.tokens.current_span();
    asm.tokens.advance();

    let node = new_node(asm, NodeKind::Print { child: None }, parent, span)?;

    if at_statement_end(asm) {
        return Err(AssembleError::unexpected_end(
            NodeType::Print,
            "an expression to print",
            asm.tokens.current_span(),
        ));
    }

    let child = formula::assemble_expression(asm, Some(node))?;
    asm.arena.adopt(node, Slot::Child, child)?;
    expect_statement_end(asm, NodeType::Print)?;
    finish(asm, node, start)
}
