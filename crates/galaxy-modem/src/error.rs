//! Demodulation error types.

use galaxy_types::ParseBitsError;
use thiserror::Error;

/// Errors raised while decoding a modulated bit sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModemError {
    /// The sequence ended in the middle of a token.
    #[error("bits ended unexpectedly at offset {at}")]
    UnexpectedEnd { at: usize },

    /// An integer token did not start with `01` or `10`.
    #[error("integer at offset {at} must start with 01 or 10")]
    InvalidSign { at: usize },

    /// Fewer bits remain than the declared nibble count needs.
    #[error("expected {expected} nibble bits at offset {at}")]
    Misaligned { at: usize, expected: usize },

    /// The declared magnitude does not fit in a signed 64-bit integer.
    #[error("integer of {nibbles} nibbles does not fit in 64 bits")]
    IntegerTooWide { nibbles: usize },

    /// A complete value was decoded but bits remain.
    #[error("trailing bits after offset {at}")]
    TrailingBits { at: usize },

    /// The text form contained something other than `0` or `1`.
    #[error("invalid bit character {ch:?} at offset {at}")]
    InvalidChar { ch: char, at: usize },
}

impl From<ParseBitsError> for ModemError {
    fn from(e: ParseBitsError) -> Self {
        ModemError::InvalidChar { ch: e.ch, at: e.at }
    }
}

/// Codec result type alias.
pub type ModemResult<T> = Result<T, ModemError>;
