//! Galaxy modulation codec.
//!
//! Modulation is a self-delimiting prefix code over a flat bit sequence:
//!
//! ```text
//! nil        00
//! pair       11 <first> <second>
//! integer    <sign> <width> <nibbles>
//!            sign   = 01 (zero or positive) | 10 (negative)
//!            width  = one `1` per nibble, then `0`
//!            nibbles = |n| in big-endian, left-padded to a nibble boundary
//! ```
//!
//! Zero has width 0, so it is encoded as `010`.

mod demodulate;
mod error;
mod modulate;

pub use demodulate::{demodulate, demodulate_str, Demodulator};
pub use error::{ModemError, ModemResult};
pub use modulate::{modulate, modulate_int};

/// Largest nibble count that can still describe an `i64` magnitude.
pub const MAX_NIBBLES: usize = 16;
