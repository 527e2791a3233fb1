//! Control constructs: if/elif/else/endif, while/done, do/while, for,
//! foreach/in, break and continue
//!
//! Terminators (`elif`, `else`, `endif`, `done` and the `while` closing a
//! `do`) walk the parent chain back to the nearest construct that has no
//! `right` link yet and attach themselves there.

use super::{at_statement_end, expect_statement_end, finish, formula, new_node, variable};
use crate::assembler::{AssembleError, AssembleResult, Assembler};
use crate::ast::{NodeId, NodeKind, NodeType, Slot, SyntaxKind, SyntaxNode};
use crate::tokens::{Keyword, Token};
use crate::utils::Span;

/// Constructs that stay open until a terminator arrives
const OPEN_CONSTRUCTS: [SyntaxKind; 7] = [
    SyntaxKind::If,
    SyntaxKind::Elif,
    SyntaxKind::Else,
    SyntaxKind::While,
    SyntaxKind::Do,
    SyntaxKind::For,
    SyntaxKind::Foreach,
];

pub fn can_attempt_syntax(asm: &Assembler) -> bool {
    asm.tokens
        .current_unit()
        .is_some_and(|unit| Keyword::from_unit(unit).is_some())
}

pub fn assemble_syntax(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let span = asm.tokens.current_span();
    let keyword = asm
        .tokens
        .current_unit()
        .and_then(Keyword::from_unit)
        .ok_or_else(|| AssembleError::unexpected_end(NodeType::Syntax, "a keyword", span))?;
    asm.tokens.advance();

    let kind = syntax_kind(keyword);
    let node = new_node(asm, NodeKind::Syntax(SyntaxNode::new(kind)), parent, span)?;

    match kind {
        SyntaxKind::If => {
            attach_condition(asm, node, kind)?;
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.assemble_body(node)?;
        }
        SyntaxKind::Elif => {
            let target = find_open_construct(
                asm,
                parent,
                kind,
                span,
                &[SyntaxKind::If, SyntaxKind::Elif],
            )?;
            attach_condition(asm, node, kind)?;
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.arena.adopt(target, Slot::Right, node)?;
            asm.assemble_body(node)?;
        }
        SyntaxKind::Else => {
            let target = find_open_construct(
                asm,
                parent,
                kind,
                span,
                &[SyntaxKind::If, SyntaxKind::Elif],
            )?;
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.arena.adopt(target, Slot::Right, node)?;
            asm.assemble_body(node)?;
        }
        SyntaxKind::EndIf => {
            let target = find_open_construct(
                asm,
                parent,
                kind,
                span,
                &[SyntaxKind::If, SyntaxKind::Elif, SyntaxKind::Else],
            )?;
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.arena.adopt(target, Slot::Right, node)?;
        }
        SyntaxKind::While => {
            let closes_do = nearest_open_construct(asm, parent)
                .is_some_and(|(_, open)| open == SyntaxKind::Do);

            attach_condition(asm, node, kind)?;
            expect_statement_end(asm, NodeType::Syntax)?;

            if closes_do {
                let target = find_open_construct(asm, parent, kind, span, &[SyntaxKind::Do])?;
                asm.arena.adopt(target, Slot::Right, node)?;
            } else {
                asm.assemble_body(node)?;
            }
        }
        SyntaxKind::Do => {
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.assemble_body(node)?;
        }
        SyntaxKind::Done => {
            let target = find_open_construct(
                asm,
                parent,
                kind,
                span,
                &[SyntaxKind::While, SyntaxKind::For, SyntaxKind::Foreach],
            )?;
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.arena.adopt(target, Slot::Right, node)?;
        }
        SyntaxKind::For => {
            assemble_for_header(asm, node)?;
            asm.assemble_body(node)?;
        }
        SyntaxKind::Foreach => {
            assemble_foreach_header(asm, node)?;
            expect_statement_end(asm, NodeType::Syntax)?;
            asm.assemble_body(node)?;
        }
        SyntaxKind::In => {
            return Err(AssembleError::unexpected_unit(
                NodeType::Syntax,
                "'in' outside of a foreach header",
                span,
            ));
        }
        SyntaxKind::Break | SyntaxKind::Continue => {
            if !inside_loop(asm, parent) {
                return Err(AssembleError::MisplacedControl { keyword: kind, span });
            }
            expect_statement_end(asm, NodeType::Syntax)?;
        }
    }

    finish(asm, node, start)
}

fn syntax_kind(keyword: Keyword) -> SyntaxKind {
    match keyword {
        Keyword::If => SyntaxKind::If,
        Keyword::Elif => SyntaxKind::Elif,
        Keyword::Else => SyntaxKind::Else,
        Keyword::EndIf => SyntaxKind::EndIf,
        Keyword::While => SyntaxKind::While,
        Keyword::Do => SyntaxKind::Do,
        Keyword::Done => SyntaxKind::Done,
        Keyword::For => SyntaxKind::For,
        Keyword::Foreach => SyntaxKind::Foreach,
        Keyword::In => SyntaxKind::In,
        Keyword::Break => SyntaxKind::Break,
        Keyword::Continue => SyntaxKind::Continue,
    }
}

/// Parse the required condition expression into `left`
fn attach_condition(asm: &mut Assembler, node: NodeId, kind: SyntaxKind) -> AssembleResult<()> {
    if at_statement_end(asm) {
        return Err(AssembleError::unexpected_end(
            NodeType::Syntax,
            format!("a condition after '{}'", kind),
            asm.tokens.current_span(),
        ));
    }
    let condition = formula::assemble_expression(asm, Some(node))?;
    asm.arena.adopt(node, Slot::Left, condition)?;
    Ok(())
}

/// Nearest construct on the parent chain still waiting for its terminator
fn nearest_open_construct(asm: &Assembler, from: Option<NodeId>) -> Option<(NodeId, SyntaxKind)> {
    asm.arena.ancestors(from).find_map(|id| {
        let syntax = asm.arena[id].kind.as_syntax()?;
        (syntax.right.is_none() && OPEN_CONSTRUCTS.contains(&syntax.kind))
            .then_some((id, syntax.kind))
    })
}

/// The open construct `keyword` terminates; a different open construct in
/// between means the blocks are crossed.
fn find_open_construct(
    asm: &Assembler,
    from: Option<NodeId>,
    keyword: SyntaxKind,
    span: Span,
    targets: &[SyntaxKind],
) -> AssembleResult<NodeId> {
    let expected = targets
        .iter()
        .map(SyntaxKind::keyword)
        .collect::<Vec<_>>()
        .join("/");

    match nearest_open_construct(asm, from) {
        Some((id, kind)) if targets.contains(&kind) => Ok(id),
        Some((id, kind)) => Err(AssembleError::UnmatchedTerminator {
            keyword,
            expected: format!("{} (found open '{}' at {})", expected, kind, asm.arena[id].span),
            span,
        }),
        None => Err(AssembleError::UnmatchedTerminator {
            keyword,
            expected,
            span,
        }),
    }
}

fn inside_loop(asm: &Assembler, from: Option<NodeId>) -> bool {
    asm.arena.ancestors(from).any(|id| {
        asm.arena[id]
            .kind
            .as_syntax()
            .is_some_and(|syntax| syntax.right.is_none() && syntax.kind.is_loop())
    })
}

/// `for [init] ; cond [; [step]]` with the statement close at the end
fn assemble_for_header(asm: &mut Assembler, node: NodeId) -> AssembleResult<()> {
    if asm.tokens.current_token() != Some(&Token::Semicolon) {
        if at_statement_end(asm) {
            return Err(missing_for_condition(asm));
        }
        let init = formula::assemble_expression(asm, Some(node))?;
        asm.arena.adopt(node, Slot::Init, init)?;
    }

    match asm.tokens.current_token() {
        Some(Token::Semicolon) => {
            asm.tokens.advance();
        }
        Some(Token::Unit(unit)) => {
            return Err(AssembleError::unexpected_unit(
                NodeType::Syntax,
                format!("'{}' in for initializer", unit),
                asm.tokens.current_span(),
            ))
        }
        _ => return Err(missing_for_condition(asm)),
    }

    if at_statement_end(asm) {
        return Err(missing_for_condition(asm));
    }
    let condition = formula::assemble_expression(asm, Some(node))?;
    asm.arena.adopt(node, Slot::Left, condition)?;

    if asm.tokens.current_token() == Some(&Token::Semicolon) {
        asm.tokens.advance();
        if !at_statement_end(asm) {
            let step = formula::assemble_expression(asm, Some(node))?;
            asm.arena.adopt(node, Slot::Aux, step)?;
        }
    }

    match asm.tokens.current_token() {
        Some(Token::Close) => {
            asm.tokens.advance();
            Ok(())
        }
        Some(token) => Err(AssembleError::unexpected_unit(
            NodeType::Syntax,
            format!("{} after for header", token.describe()),
            asm.tokens.current_span(),
        )),
        None => Ok(()),
    }
}

fn missing_for_condition(asm: &Assembler) -> AssembleError {
    AssembleError::unexpected_end(
        NodeType::Syntax,
        "a loop condition in for header",
        asm.tokens.current_span(),
    )
}

/// `foreach %bound% in %source%`
fn assemble_foreach_header(asm: &mut Assembler, node: NodeId) -> AssembleResult<()> {
    let bound = variable::assemble_variable(asm, Some(node))?;
    require_named(asm, bound, "foreach binds a variable, not a literal")?;
    asm.arena.adopt(node, Slot::Left, bound)?;

    let in_start = asm.tokens.position();
    let in_span = asm.tokens.current_span();
    if asm.tokens.current_unit().and_then(Keyword::from_unit) != Some(Keyword::In) {
        return Err(AssembleError::unexpected_end(
            NodeType::Syntax,
            "'in' after the foreach variable",
            in_span,
        ));
    }
    asm.tokens.advance();

    let in_node = new_node(
        asm,
        NodeKind::Syntax(SyntaxNode::new(SyntaxKind::In)),
        Some(node),
        in_span,
    )?;
    let source = variable::assemble_variable(asm, Some(in_node))?;
    require_named(asm, source, "foreach iterates a variable, not a literal")?;
    asm.arena.adopt(in_node, Slot::Left, source)?;
    finish(asm, in_node, in_start)?;

    asm.arena.adopt(node, Slot::Aux, in_node)?;
    Ok(())
}

fn require_named(asm: &Assembler, node: NodeId, message: &str) -> AssembleResult<()> {
    if asm.arena[node].kind.variable_name().is_some() {
        Ok(())
    } else {
        Err(AssembleError::invalid_operand(
            NodeType::Syntax,
            message,
            asm.arena[node].span,
        ))
    }
}
