//! Variable references, literals and expression statements

use super::{expect_statement_end, expect_unit, finish, formula, new_node};
use crate::assembler::{AssembleError, AssembleResult, Assembler};
use crate::ast::{NodeId, NodeKind, NodeType, Subscript, SubscriptKind, VariableNode};
use crate::evaluator::Value;
use crate::tokens::token::{is_quoted, variable_name};

pub fn can_attempt_variable(asm: &Assembler) -> bool {
    asm.tokens
        .current_unit()
        .is_some_and(|unit| variable_name(unit).is_some() || classify_literal(unit).is_some())
}

/// A statement made of one expression, such as `%i% = 0` or `%i%++`
pub fn assemble_variable_statement(
    asm: &mut Assembler,
    parent: Option<NodeId>,
) -> AssembleResult<NodeId> {
    let node = formula::assemble_expression(asm, parent)?;
    expect_statement_end(asm, NodeType::Variable)?;
    Ok(node)
}

/// `%name%` with an optional `[expr]` or `{expr}` subscript, or a literal
pub fn assemble_variable(asm: &mut Assembler, parent: Option<NodeId>) -> AssembleResult<NodeId> {
    let start = asm.tokens.position();
    let span = asm.tokens.current_span();

    let Some(unit) = asm.tokens.current_unit().map(str::to_string) else {
        return Err(AssembleError::unexpected_end(
            NodeType::Variable,
            "a variable or literal",
            span,
        ));
    };

    if let Some(name) = variable_name(&unit) {
        let kind = NodeKind::Variable(VariableNode::Named {
            name: name.to_string(),
            index: None,
        });
        asm.tokens.advance();
        let node = new_node(asm, kind, parent, span)?;

        let subscript = match asm.tokens.current_unit() {
            Some("[") => Some((SubscriptKind::Array, "]")),
            Some("{") => Some((SubscriptKind::Object, "}")),
            _ => None,
        };

        if let Some((kind, closer)) = subscript {
            asm.tokens.advance();
            let expr = formula::assemble_expression(asm, Some(node))?;
            check_subscript_literal(asm, kind, expr)?;
            expect_unit(asm, NodeType::Variable, closer)?;
            asm.arena.set_subscript(node, Subscript { kind, expr })?;
        }

        return finish(asm, node, start);
    }

    match classify_literal(&unit) {
        Some(value) => {
            asm.tokens.advance();
            let node = new_node(
                asm,
                NodeKind::Variable(VariableNode::Literal(value)),
                parent,
                span,
            )?;
            finish(asm, node, start)
        }
        None => Err(AssembleError::InvalidLiteral { unit, span }),
    }
}

/// `[...]` indexes arrays by number, `{...}` indexes objects by string
fn check_subscript_literal(
    asm: &Assembler,
    kind: SubscriptKind,
    expr: NodeId,
) -> AssembleResult<()> {
    let NodeKind::Variable(VariableNode::Literal(value)) = &asm.arena[expr].kind else {
        return Ok(());
    };

    let (accepted, target) = match kind {
        SubscriptKind::Array => (matches!(value, Value::Number(_)), "an array"),
        SubscriptKind::Object => (matches!(value, Value::String(_)), "an object"),
    };

    if accepted {
        Ok(())
    } else {
        Err(AssembleError::invalid_operand(
            NodeType::Variable,
            format!("{} literal cannot index {}", value.kind_name(), target),
            asm.arena[expr].span,
        ))
    }
}

/// Literal value of a unit: `null`, `true`, `false` (any case), hex
/// (`0x`/`x`), octal (`0o`), binary (`0b`) or decimal numbers, or a quoted
/// string.
pub fn classify_literal(unit: &str) -> Option<Value> {
    if unit.eq_ignore_ascii_case("null") {
        return Some(Value::Null);
    }
    if unit.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if unit.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }

    let lower = unit.to_ascii_lowercase();
    let radix_digits = [("0x", 16), ("x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| lower.strip_prefix(prefix).map(|digits| (digits, radix)));

    if let Some((digits, radix)) = radix_digits {
        return if digits.is_empty() {
            None
        } else {
            fold_radix_digits(digits, radix).map(Value::Number)
        };
    }

    if is_decimal(unit) {
        return unit.parse::<f64>().ok().map(Value::Number);
    }

    if is_quoted(unit) {
        return Some(Value::String(unescape(&unit[1..unit.len() - 1])));
    }

    None
}

/// Digits of any length folded into a double, like decimal literals
fn fold_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    digits.chars().try_fold(0.0_f64, |acc, ch| {
        ch.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// Digits with at most one inner decimal point
fn is_decimal(unit: &str) -> bool {
    let mut parts = unit.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_literals() {
        assert_eq!(classify_literal("NULL"), Some(Value::Null));
        assert_eq!(classify_literal("True"), Some(Value::Bool(true)));
        assert_eq!(classify_literal("false"), Some(Value::Bool(false)));
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(classify_literal("42"), Some(Value::from(42)));
        assert_eq!(classify_literal("0x1f"), Some(Value::from(31)));
        assert_eq!(classify_literal("xFF"), Some(Value::from(255)));
        assert_eq!(classify_literal("0o17"), Some(Value::from(15)));
        assert_eq!(classify_literal("0b101"), Some(Value::from(5)));
        assert_eq!(classify_literal("1.5"), Some(Value::from(1.5)));
        assert_eq!(
            classify_literal("0xFFFFFFFFFFFFFFFF"),
            Some(Value::from(2f64.powi(64)))
        );
        assert_eq!(
            classify_literal(&format!("0b1{}", "0".repeat(70))),
            Some(Value::from(2f64.powi(70)))
        );
        assert_eq!(classify_literal("0x"), None);
        assert_eq!(classify_literal("0b102"), None);
        assert_eq!(classify_literal("1."), None);
        assert_eq!(classify_literal("12ab"), None);
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(classify_literal("'abc'"), Some(Value::from("abc")));
        assert_eq!(classify_literal("\"a\\nb\""), Some(Value::from("a\nb")));
        assert_eq!(classify_literal("'it\\'s'"), Some(Value::from("it's")));
        assert_eq!(classify_literal("''"), Some(Value::from("")));
    }

    #[test]
    fn test_words_are_not_literals() {
        assert_eq!(classify_literal("hello"), None);
        assert_eq!(classify_literal("%a%"), None);
    }
}
