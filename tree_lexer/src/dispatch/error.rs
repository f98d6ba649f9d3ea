use crate::logging::{codes, Code};
use crate::tokens::Operator;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// Operands are rendered the way the values display
    #[error("Cannot {} {left} and {right}.", .operator.verb())]
    TypeMismatch {
        operator: Operator,
        left: String,
        right: String,
    },

    #[error("Operator '{operator}' takes {expected} operand(s).")]
    Arity { operator: Operator, expected: usize },
}

impl DispatchError {
    pub fn error_code(&self) -> Code {
        match self {
            DispatchError::TypeMismatch { .. } => codes::dispatch::TYPE_MISMATCH,
            DispatchError::Arity { .. } => codes::dispatch::ARITY_MISMATCH,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            DispatchError::TypeMismatch { operator, .. } | DispatchError::Arity { operator, .. } => {
                *operator
            }
        }
    }
}
