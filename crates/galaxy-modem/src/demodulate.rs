use crate::error::{ModemError, ModemResult};
use crate::MAX_NIBBLES;
use galaxy_types::{Bits, Data};

/// Decode a complete bit sequence holding exactly one value.
pub fn demodulate(bits: &Bits) -> ModemResult<Data> {
    let mut demod = Demodulator::new(bits.as_slice());
    let value = demod.next_value()?;
    if !demod.is_finished() {
        return Err(ModemError::TrailingBits { at: demod.position() });
    }
    Ok(value)
}

/// Decode the `0`/`1` text form of a modulated value.
pub fn demodulate_str(text: &str) -> ModemResult<Data> {
    let bits: Bits = text.parse()?;
    demodulate(&bits)
}

enum Token {
    Nil,
    Pair,
    Int(i64),
}

/// Cursor over a modulated bit stream.
///
/// Each call to [`Demodulator::next_value`] consumes exactly one value tree
/// and leaves the cursor on the first bit after it.
pub struct Demodulator<'a> {
    bits: &'a [bool],
    cursor: usize,
}

impl<'a> Demodulator<'a> {
    pub fn new(bits: &'a [bool]) -> Self {
        Self { bits, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.bits.len()
    }

    /// Decode the next complete value tree.
    ///
    /// Pairs are assembled on an explicit stack so long lists do not
    /// recurse. A `None` slot is a pair still waiting for its first
    /// component, `Some(first)` one waiting for its second.
    pub fn next_value(&mut self) -> ModemResult<Data> {
        let mut pending: Vec<Option<Data>> = Vec::new();
        loop {
            let mut value = match self.next_token()? {
                Token::Pair => {
                    pending.push(None);
                    continue;
                }
                Token::Nil => Data::Nil,
                Token::Int(n) => Data::Int(n),
            };
            loop {
                match pending.pop() {
                    None => return Ok(value),
                    Some(None) => {
                        pending.push(Some(value));
                        break;
                    }
                    Some(Some(first)) => value = Data::pair(first, value),
                }
            }
        }
    }

    /// Decode a bare integer token.
    pub fn next_int(&mut self) -> ModemResult<i64> {
        let start = self.cursor;
        let negative = self.read_bit()?;
        let positive = self.read_bit()?;
        if negative == positive {
            return Err(ModemError::InvalidSign { at: start });
        }

        let mut nibbles = 0;
        while self.read_bit()? {
            nibbles += 1;
        }
        if nibbles > MAX_NIBBLES {
            return Err(ModemError::IntegerTooWide { nibbles });
        }

        let width = nibbles * 4;
        if self.bits.len() - self.cursor < width {
            return Err(ModemError::Misaligned {
                at: self.cursor,
                expected: width,
            });
        }
        let magnitude = self.bits[self.cursor..self.cursor + width]
            .iter()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit));
        self.cursor += width;

        if negative {
            0i64
                .checked_sub_unsigned(magnitude)
                .ok_or(ModemError::IntegerTooWide { nibbles })
        } else {
            i64::try_from(magnitude).map_err(|_| ModemError::IntegerTooWide { nibbles })
        }
    }

    fn next_token(&mut self) -> ModemResult<Token> {
        let first = self.peek_bit(0)?;
        let second = self.peek_bit(1)?;
        match (first, second) {
            (false, false) => {
                self.cursor += 2;
                Ok(Token::Nil)
            }
            (true, true) => {
                self.cursor += 2;
                Ok(Token::Pair)
            }
            _ => self.next_int().map(Token::Int),
        }
    }

    fn peek_bit(&self, offset: usize) -> ModemResult<bool> {
        self.bits
            .get(self.cursor + offset)
            .copied()
            .ok_or(ModemError::UnexpectedEnd {
                at: self.cursor + offset,
            })
    }

    fn read_bit(&mut self) -> ModemResult<bool> {
        let bit = self.peek_bit(0)?;
        self.cursor += 1;
        Ok(bit)
    }
}
