use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A flat, ordered bit sequence produced by modulation.
///
/// The text form is a string of `0` and `1` characters, most significant
/// (first emitted) bit first. Serde uses the same text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bits(Vec<bool>);

/// A character other than `0` or `1` in a bit string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bit character {ch:?} at offset {at}")]
pub struct ParseBitsError {
    pub ch: char,
    pub at: usize,
}

impl Bits {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// Append every bit of `bits` in order.
    pub fn extend_from_slice(&mut self, bits: &[bool]) {
        self.0.extend_from_slice(bits);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for Bits {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Bits {
    type Err = ParseBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(at, ch)| match ch {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(ParseBitsError { ch, at }),
            })
            .collect()
    }
}

impl Serialize for Bits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_round_trips() {
        let bits: Bits = "1101000".parse().unwrap();
        assert_eq!(bits.len(), 7);
        assert_eq!(bits.get(0), Some(true));
        assert_eq!(bits.get(2), Some(false));
        assert_eq!(bits.to_string(), "1101000");
    }

    #[test]
    fn rejects_foreign_characters() {
        let err = "01x1".parse::<Bits>().unwrap_err();
        assert_eq!(err, ParseBitsError { ch: 'x', at: 2 });
    }

    #[test]
    fn empty_string_is_empty_bits() {
        let bits: Bits = "".parse().unwrap();
        assert!(bits.is_empty());
    }

    #[test]
    fn serializes_as_string() {
        let bits: Bits = "010".parse().unwrap();
        assert_eq!(serde_json::to_string(&bits).unwrap(), "\"010\"");
        let back: Bits = serde_json::from_str("\"010\"").unwrap();
        assert_eq!(back, bits);
        assert!(serde_json::from_str::<Bits>("\"012\"").is_err());
    }
}
