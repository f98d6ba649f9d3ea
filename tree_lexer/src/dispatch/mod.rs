//! Operator dispatch over runtime values
//!
//! Each operator defines which operand variants it accepts. Anything else is
//! a [`DispatchError::TypeMismatch`] naming both operands; the caller decides
//! how severe that is.

pub mod error;

use crate::runtime::Value;
use crate::tokens::Operator;

pub use error::DispatchError;

/// Apply a binary operator
pub fn apply(op: Operator, left: &Value, right: &Value) -> Result<Value, DispatchError> {
    use Value::*;

    let result = match (op, left, right) {
        (Operator::Addition, Number(a), Number(b)) => Number(a + b),
        (Operator::Addition, String(a), String(b)) => String(format!("{}{}", a, b)),
        (Operator::Subtraction, Number(a), Number(b)) => Number(a - b),
        (Operator::Multiplication, Number(a), Number(b)) => Number(a * b),
        (Operator::Division, Number(a), Number(b)) => Number(a / b),
        (Operator::Remainder, Number(a), Number(b)) => Number(a % b),

        (Operator::Equals | Operator::NotEquals, _, _) => {
            let equal = same_variant_equality(op, left, right)?;
            Boolean(if op == Operator::Equals { equal } else { !equal })
        }

        (Operator::Greater, Number(a), Number(b)) => Boolean(a > b),
        (Operator::GreaterEqual, Number(a), Number(b)) => Boolean(a >= b),
        (Operator::Less, Number(a), Number(b)) => Boolean(a < b),
        (Operator::LessEqual, Number(a), Number(b)) => Boolean(a <= b),

        (Operator::And, Boolean(a), Boolean(b)) => Boolean(*a && *b),
        (Operator::Or, Boolean(a), Boolean(b)) => Boolean(*a || *b),

        (Operator::Range, Number(a), Number(b)) => Range { start: *a, end: *b },

        (Operator::Not, _, _) => {
            return Err(DispatchError::Arity {
                operator: op,
                expected: 1,
            })
        }

        _ => return Err(mismatch(op, left, right)),
    };

    Ok(result)
}

/// Apply a unary operator. Only `not` takes one operand.
pub fn apply_unary(op: Operator, operand: &Value) -> Result<Value, DispatchError> {
    match (op, operand) {
        (Operator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (Operator::Not, other) => {
            crate::log_debug!("Unary type mismatch",
                "operator" => op,
                "operand" => other.type_name()
            );
            Err(DispatchError::TypeMismatch {
                operator: op,
                left: other.to_string(),
                right: "nothing".to_string(),
            })
        }
        _ => Err(DispatchError::Arity {
            operator: op,
            expected: 2,
        }),
    }
}

fn same_variant_equality(op: Operator, left: &Value, right: &Value) -> Result<bool, DispatchError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        (Value::Null, Value::Null) => Ok(true),
        _ => Err(mismatch(op, left, right)),
    }
}

fn mismatch(op: Operator, left: &Value, right: &Value) -> DispatchError {
    crate::log_debug!("Operator type mismatch",
        "operator" => op,
        "left" => left.type_name(),
        "right" => right.type_name()
    );

    DispatchError::TypeMismatch {
        operator: op,
        left: left.to_string(),
        right: right.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{codes, service, with_scoped_logger};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(apply(Operator::Addition, &num(2.0), &num(3.0)), Ok(num(5.0)));
        assert_eq!(apply(Operator::Subtraction, &num(2.0), &num(3.0)), Ok(num(-1.0)));
        assert_eq!(apply(Operator::Multiplication, &num(4.0), &num(2.5)), Ok(num(10.0)));
        assert_eq!(apply(Operator::Remainder, &num(7.0), &num(4.0)), Ok(num(3.0)));
    }

    #[test]
    fn test_division_follows_ieee() {
        let result = apply(Operator::Division, &num(1.0), &num(0.0)).unwrap();
        assert_eq!(result.as_number(), Some(f64::INFINITY));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            apply(Operator::Addition, &Value::from("a"), &Value::from("b")),
            Ok(Value::from("ab"))
        );
        assert_matches!(
            apply(Operator::Subtraction, &Value::from("a"), &Value::from("b")),
            Err(DispatchError::TypeMismatch { .. })
        );
    }

    #[test]
    fn test_mixed_addition_is_mismatch() {
        let error = apply(Operator::Addition, &num(1.0), &Value::from("x")).unwrap_err();
        assert_eq!(error.to_string(), "Cannot add 1 and \"x\".");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(apply(Operator::Greater, &num(3.0), &num(2.0)), Ok(Value::from(true)));
        assert_eq!(apply(Operator::LessEqual, &num(3.0), &num(2.0)), Ok(Value::from(false)));
        assert_matches!(
            apply(Operator::Less, &Value::from("a"), &Value::from("b")),
            Err(DispatchError::TypeMismatch { .. })
        );
    }

    #[test]
    fn test_equality_per_variant() {
        assert_eq!(apply(Operator::Equals, &num(1.0), &num(1.0)), Ok(Value::from(true)));
        assert_eq!(
            apply(Operator::NotEquals, &Value::from("a"), &Value::from("b")),
            Ok(Value::from(true))
        );
        assert_eq!(apply(Operator::Equals, &Value::Null, &Value::Null), Ok(Value::from(true)));
        assert_matches!(
            apply(Operator::Equals, &num(1.0), &Value::from("1")),
            Err(DispatchError::TypeMismatch { operator: Operator::Equals, .. })
        );
    }

    #[test]
    fn test_logical() {
        assert_eq!(
            apply(Operator::And, &Value::from(true), &Value::from(false)),
            Ok(Value::from(false))
        );
        assert_eq!(
            apply(Operator::Or, &Value::from(true), &Value::from(false)),
            Ok(Value::from(true))
        );
        assert_matches!(
            apply(Operator::And, &num(1.0), &Value::from(true)),
            Err(DispatchError::TypeMismatch { .. })
        );
    }

    #[test]
    fn test_range() {
        assert_eq!(
            apply(Operator::Range, &num(1.0), &num(5.0)),
            Ok(Value::Range { start: 1.0, end: 5.0 })
        );
    }

    #[test]
    fn test_not_is_unary() {
        assert_matches!(
            apply(Operator::Not, &Value::from(true), &Value::from(true)),
            Err(DispatchError::Arity { expected: 1, .. })
        );
        assert_eq!(apply_unary(Operator::Not, &Value::from(true)), Ok(Value::from(false)));
        assert_matches!(
            apply_unary(Operator::Not, &num(0.0)),
            Err(DispatchError::TypeMismatch { .. })
        );
        assert_matches!(
            apply_unary(Operator::Addition, &num(1.0)),
            Err(DispatchError::Arity { expected: 2, .. })
        );
    }

    #[test]
    fn test_mismatch_logged_at_debug() {
        let (svc, memory) = service::create_memory_service();

        let result = with_scoped_logger(Arc::new(svc), || {
            apply(Operator::Range, &Value::from("a"), &num(1.0))
        });

        assert_eq!(result.unwrap_err().error_code(), codes::dispatch::TYPE_MISMATCH);
        let events = memory.get_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].context.get("left").map(String::as_str), Some("string"));
    }
}
