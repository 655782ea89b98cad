//! Runtime error types for the galaxy evaluator.

use crate::transport::TransportError;
use galaxy_modem::ModemError;
use thiserror::Error;

/// Evaluation error. Every failure aborts the operation in progress.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A builtin or the codec needed one variant after forcing but found another.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The protocol result did not destructure as `(flag, (state, (data, _)))`.
    #[error("unexpected shape: {0}")]
    Shape(String),

    /// Checked arithmetic left the `i64` range.
    #[error("integer overflow in {0}")]
    Overflow(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    /// Demodulation rejected a bit sequence.
    #[error("malformed bits: {0}")]
    MalformedBits(#[from] ModemError),

    /// The external send operation failed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The reduction step limit was exceeded.
    #[error("gas exhausted")]
    GasExhausted,
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
