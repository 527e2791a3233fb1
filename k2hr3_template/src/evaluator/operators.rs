//! Value-level semantics of the binary and unary operators

use super::error::{ExecutionError, ExecutionOutcome};
use super::Value;
use crate::ast::{CalcOp, CondOp};

/// Apply a binary arithmetic or bitwise operator
pub fn calculate(op: CalcOp, left: &Value, right: &Value) -> ExecutionOutcome<Value> {
    let symbol = op.symbol();
    match op {
        CalcOp::Add => add(left, right),
        CalcOp::Sub | CalcOp::Mul | CalcOp::Div | CalcOp::Rem => {
            let (a, b) = numbers(symbol, left, right)?;
            match op {
                CalcOp::Sub => Ok(Value::Number(a - b)),
                CalcOp::Mul => Ok(Value::Number(a * b)),
                _ if b == 0.0 => Err(ExecutionError::DivisionByZero { operator: symbol }),
                CalcOp::Div => Ok(Value::Number(a / b)),
                _ => Ok(Value::Number(a % b)),
            }
        }
        CalcOp::BitAnd | CalcOp::BitOr => bitwise(op, left, right),
        CalcOp::Lshift | CalcOp::Rshift => {
            let (a, b) = numbers(symbol, left, right)?;
            let shift = (to_int32(b) as u32) & 0x1f;
            let shifted = if op == CalcOp::Lshift {
                to_int32(a).wrapping_shl(shift)
            } else {
                to_int32(a).wrapping_shr(shift)
            };
            Ok(Value::Number(f64::from(shifted)))
        }
        CalcOp::Not => Ok(Value::Bool(!right.is_truthy())),
        CalcOp::Set => Ok(right.clone()),
        CalcOp::Inc | CalcOp::Dec => step(op, left),
    }
}

/// `+` concatenates when either side is a string or null
fn add(left: &Value, right: &Value) -> ExecutionOutcome<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(_) | Value::Null, _) | (_, Value::String(_) | Value::Null) => {
            Ok(Value::String(format!("{}{}", left.stringify(), right.stringify())))
        }
        (Value::Number(_), other) | (other, _) => Err(ExecutionError::type_mismatch(
            "+",
            "numbers or strings",
            other.kind_name(),
        )),
    }
}

fn bitwise(op: CalcOp, left: &Value, right: &Value) -> ExecutionOutcome<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == CalcOp::BitAnd {
            *a & *b
        } else {
            *a | *b
        })),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (to_int32(*a), to_int32(*b));
            let result = if op == CalcOp::BitAnd { a & b } else { a | b };
            Ok(Value::Number(f64::from(result)))
        }
        _ => Err(ExecutionError::MismatchedOperands {
            operator: op.symbol(),
            left: left.kind_name(),
            right: right.kind_name(),
        }),
    }
}

/// `++` and `--` on a number
pub fn step(op: CalcOp, value: &Value) -> ExecutionOutcome<Value> {
    let n = value
        .as_number()
        .ok_or_else(|| ExecutionError::type_mismatch(op.symbol(), "a number", value.kind_name()))?;
    Ok(Value::Number(if op == CalcOp::Dec { n - 1.0 } else { n + 1.0 }))
}

pub fn negate(value: &Value) -> ExecutionOutcome<Value> {
    value
        .as_number()
        .map(|n| Value::Number(-n))
        .ok_or_else(|| ExecutionError::type_mismatch("-", "a number", value.kind_name()))
}

/// Relational and equality operators. `&&` and `||` short-circuit in the
/// interpreter and only reach here with both condition flags known.
pub fn compare(op: CondOp, left: &Value, right: &Value) -> ExecutionOutcome<bool> {
    match op {
        CondOp::Eq => Ok(left.loose_eq(right)),
        CondOp::Ne => Ok(!left.loose_eq(right)),
        CondOp::And => Ok(left.is_truthy() && right.is_truthy()),
        CondOp::Or => Ok(left.is_truthy() || right.is_truthy()),
        CondOp::Lt | CondOp::Gt | CondOp::Le | CondOp::Ge => {
            let (a, b) = numbers(op.symbol(), left, right)?;
            Ok(match op {
                CondOp::Lt => a < b,
                CondOp::Gt => a > b,
                CondOp::Le => a <= b,
                _ => a >= b,
            })
        }
    }
}

fn numbers(operator: &'static str, left: &Value, right: &Value) -> ExecutionOutcome<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        (Value::Number(_), other) | (other, _) => Err(ExecutionError::type_mismatch(
            operator,
            "numbers",
            other.kind_name(),
        )),
    }
}

/// Truncate to a wrapping 32-bit integer
fn to_int32(n: f64) -> i32 {
    if n.is_finite() {
        (n.trunc() as i64) as i32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn n(value: f64) -> Value {
        Value::Number(value)
    }

    #[test]
    fn test_add_overloads() {
        assert_eq!(calculate(CalcOp::Add, &n(1.0), &n(2.0)), Ok(n(3.0)));
        assert_eq!(
            calculate(CalcOp::Add, &Value::from("a"), &Value::from("b")),
            Ok(Value::from("ab"))
        );
        assert_eq!(
            calculate(CalcOp::Add, &n(1.0), &Value::from("b")),
            Ok(Value::from("1b"))
        );
        assert_eq!(
            calculate(CalcOp::Add, &Value::Null, &n(5.0)),
            Ok(Value::from("5"))
        );
        assert_matches!(
            calculate(CalcOp::Add, &n(1.0), &Value::Bool(true)),
            Err(ExecutionError::TypeMismatch { found: "boolean", .. })
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            calculate(CalcOp::Div, &n(1.0), &n(0.0)),
            Err(ExecutionError::DivisionByZero { operator: "/" })
        );
        assert_eq!(
            calculate(CalcOp::Rem, &n(1.0), &n(0.0)),
            Err(ExecutionError::DivisionByZero { operator: "%" })
        );
        assert_eq!(calculate(CalcOp::Rem, &n(7.0), &n(3.0)), Ok(n(1.0)));
    }

    #[test]
    fn test_bitwise_kinds_must_match() {
        assert_eq!(calculate(CalcOp::BitAnd, &n(6.0), &n(3.0)), Ok(n(2.0)));
        assert_eq!(
            calculate(CalcOp::BitOr, &Value::Bool(false), &Value::Bool(true)),
            Ok(Value::Bool(true))
        );
        assert_matches!(
            calculate(CalcOp::BitOr, &n(1.0), &Value::Bool(true)),
            Err(ExecutionError::MismatchedOperands { .. })
        );
    }

    #[test]
    fn test_shifts() {
        assert_eq!(calculate(CalcOp::Lshift, &n(1.0), &n(4.0)), Ok(n(16.0)));
        assert_eq!(calculate(CalcOp::Rshift, &n(-16.0), &n(2.0)), Ok(n(-4.0)));
        assert_eq!(calculate(CalcOp::Lshift, &n(1.0), &n(33.0)), Ok(n(2.0)));
    }

    #[test]
    fn test_step_and_negate() {
        assert_eq!(step(CalcOp::Inc, &n(1.0)), Ok(n(2.0)));
        assert_eq!(step(CalcOp::Dec, &n(1.0)), Ok(n(0.0)));
        assert_matches!(step(CalcOp::Inc, &Value::Null), Err(ExecutionError::TypeMismatch { .. }));
        assert_eq!(negate(&n(3.0)), Ok(n(-3.0)));
    }

    #[test]
    fn test_relational_requires_numbers() {
        assert_eq!(compare(CondOp::Lt, &n(1.0), &n(2.0)), Ok(true));
        assert_eq!(compare(CondOp::Ge, &n(2.0), &n(2.0)), Ok(true));
        assert_matches!(
            compare(CondOp::Gt, &Value::from("b"), &Value::from("a")),
            Err(ExecutionError::TypeMismatch { found: "string", .. })
        );
    }

    #[test]
    fn test_equality_table() {
        assert_eq!(compare(CondOp::Eq, &Value::Null, &Value::Null), Ok(true));
        assert_eq!(compare(CondOp::Ne, &n(1.0), &Value::from("1")), Ok(true));
        assert_eq!(compare(CondOp::Eq, &Value::Bool(true), &n(5.0)), Ok(true));
    }
}
