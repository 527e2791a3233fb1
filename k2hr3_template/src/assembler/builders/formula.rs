//! Operator expressions and precedence rotation
//!
//! An expression is parsed as an operand followed by postfix `++`/`--`
//! and at most one binary operator whose right-hand side is the rest of
//! the expression. Attaching that right-hand side goes through
//! [`recombine`], which rotates the tree until every operator binds
//! according to its priority.

use super::{expect_statement_end, finish, new_node, variable};
use crate::assembler::{AssembleError, AssembleResult, Assembler};
use crate::ast::{CalcOp, CondOp, NodeId, NodeKind, NodeType, Slot};
use crate::tokens::Token;

pub fn can_attempt_condition(asm: &Assembler) -> bool {
    asm.tokens
        .current_unit()
        .is_some_and(|unit| CondOp::from_unit(unit).is_some())
}

/// A condition operator cannot start a statement
pub fn assemble_condition(asm: &mut Assembler, _parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let unit = asm.tokens.current_unit().unwrap_or_default().to_string();
    Err(AssembleError::invalid_operand(
        NodeType::Condition,
        format!("'{}' needs a left operand", unit),
        asm.tokens.current_span(),
    ))
}

pub fn can_attempt_calculate(asm: &Assembler) -> bool {
    asm.tokens
        .current_unit()
        .and_then(CalcOp::from_unit)
        .is_some_and(|op| op.is_prefix())
}

/// Expression statement starting with `!`, `-`, `++` or `--`
pub fn assemble_calculate(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let node = assemble_expression(asm, parent)?;
    expect_statement_end(asm, NodeType::Calculate)?;
    Ok(node)
}

pub fn assemble_expression(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    asm.enter()?;
    let result = expression(asm, parent);
    asm.leave();
    result
}

fn expression(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let mut current = assemble_operand(asm, parent)?;

    loop {
        let Some(unit) = asm.tokens.current_unit() else {
            return Ok(current);
        };

        if unit == "++" || unit == "--" {
            let op = if unit == "++" { CalcOp::Inc } else { CalcOp::Dec };
            let span = asm.tokens.current_span();
            asm.tokens.advance();

            let node = new_node(
                asm,
                NodeKind::Calculate {
                    op,
                    left: None,
                    right: None,
                },
                parent,
                span,
            )?;
            asm.arena.adopt(node, Slot::Left, current)?;
            current = finish(asm, node, start)?;
            continue;
        }

        let Some(kind) = binary_kind(unit) else {
            return Ok(current);
        };

        let span = asm.tokens.current_span();
        asm.tokens.advance();
        let node = new_node(asm, kind, parent, span)?;
        asm.arena.adopt(node, Slot::Left, current)?;

        let rhs = assemble_expression(asm, Some(node))?;
        finish(asm, node, start)?;
        return recombine(asm, node, rhs);
    }
}

/// Unary prefix operators applied to a single operand, or a variable/literal
pub fn assemble_operand(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    asm.enter()?;
    let result = operand(asm, parent);
    asm.leave();
    result
}

fn operand(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let span = asm.tokens.current_span();

    let unit = match asm.tokens.current_token() {
        Some(Token::Unit(unit)) => unit.clone(),
        _ => {
            return Err(AssembleError::unexpected_end(
                NodeType::Calculate,
                "an operand",
                span,
            ))
        }
    };

    if let Some(op) = CalcOp::from_unit(&unit).filter(CalcOp::is_prefix) {
        asm.tokens.advance();
        let node = new_node(
            asm,
            NodeKind::Calculate {
                op,
                left: None,
                right: None,
            },
            parent,
            span,
        )?;
        let operand = assemble_operand(asm, Some(node))?;
        asm.arena.adopt(node, Slot::Right, operand)?;
        return finish(asm, node, start);
    }

    if binary_kind(&unit).is_some() || matches!(unit.as_str(), "[" | "]" | "{" | "}") {
        return Err(AssembleError::unexpected_unit(
            NodeType::Calculate,
            format!("'{}' where an operand was expected", unit),
            span,
        ));
    }

    variable::assemble_variable(asm, parent)
}

fn binary_kind(unit: &str) -> Option<NodeKind> {
    if let Some(op) = CondOp::from_unit(unit) {
        return Some(NodeKind::Condition {
            op,
            left: None,
            right: None,
        });
    }

    CalcOp::from_unit(unit)
        .filter(|op| !matches!(op, CalcOp::Not | CalcOp::Inc | CalcOp::Dec))
        .map(|op| NodeKind::Calculate {
            op,
            left: None,
            right: None,
        })
}

/// Binding strength, higher binds tighter
pub fn priority(kind: &NodeKind) -> Option<u8> {
    match kind {
        NodeKind::Calculate { op, left, .. } => Some(match op {
            CalcOp::Inc | CalcOp::Dec => 14,
            CalcOp::Not => 13,
            CalcOp::Sub if left.is_none() => 13,
            CalcOp::Mul | CalcOp::Div | CalcOp::Rem => 12,
            CalcOp::Add | CalcOp::Sub => 11,
            CalcOp::Lshift | CalcOp::Rshift => 10,
            CalcOp::BitAnd => 7,
            CalcOp::BitOr => 6,
            CalcOp::Set => 1,
        }),
        NodeKind::Condition { op, .. } => Some(match op {
            CondOp::Lt | CondOp::Gt | CondOp::Le | CondOp::Ge => 9,
            CondOp::Eq | CondOp::Ne => 8,
            CondOp::And => 5,
            CondOp::Or => 4,
        }),
        _ => None,
    }
}

/// Binary operator node that already holds its left operand
fn binary_with_left(asm: &Assembler, node: NodeId) -> Option<(u8, NodeId)> {
    let kind = &asm.arena[node].kind;
    let left = match kind {
        NodeKind::Calculate {
            op: CalcOp::Not | CalcOp::Inc | CalcOp::Dec,
            ..
        } => None,
        NodeKind::Calculate { left, .. } | NodeKind::Condition { left, .. } => *left,
        _ => None,
    }?;
    Some((priority(kind)?, left))
}

/// Attach `rhs` as the right operand of binary operator `op`.
///
/// When `rhs` is itself a binary operator binding less tightly than `op`
/// (or equally tightly, except for right-associative `=`), `rhs` takes
/// `op`'s place and `op` is recombined with `rhs`'s left operand instead.
/// Returns the root of the combined subtree.
pub fn recombine(asm: &mut Assembler, op: NodeId, rhs: NodeId) -> AssembleResult<NodeId> {
    let op_priority = priority(&asm.arena[op].kind).ok_or_else(|| {
        AssembleError::invalid_operand(
            asm.arena[op].node_type(),
            "operator expected",
            asm.arena[op].span,
        )
    })?;
    let op_is_set = matches!(asm.arena[op].kind, NodeKind::Calculate { op: CalcOp::Set, .. });

    if let Some((rhs_priority, rhs_left)) = binary_with_left(asm, rhs) {
        if rhs_priority < op_priority || (rhs_priority == op_priority && !op_is_set) {
            let outer = asm.arena[op].parent;
            let new_left = recombine(asm, op, rhs_left)?;
            asm.arena.adopt(rhs, Slot::Left, new_left)?;
            asm.arena.link(rhs, Slot::Parent, outer)?;
            let span = asm.arena[new_left].span.merge(asm.arena[rhs].span);
            asm.arena.set_span(rhs, span)?;
            return Ok(rhs);
        }
    }

    asm.arena.adopt(op, Slot::Right, rhs)?;
    Ok(op)
}
