//! Integration tests for the modulation codec.
//!
//! Tests cover:
//! - bit-exact encodings of nil, integers and pairs
//! - decode of hand-written bit strings
//! - malformed input (truncation, misalignment, overflow, trailing bits)
//! - the text form used on the wire

use galaxy_modem::{demodulate, demodulate_str, modulate, ModemError};
use galaxy_types::{Bits, Data};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn int(n: i64) -> Data {
    Data::Int(n)
}

fn pair(a: Data, b: Data) -> Data {
    Data::pair(a, b)
}

fn encoded(data: &Data) -> String {
    modulate(data).to_string()
}

fn round_trip(data: Data) {
    let bits = modulate(&data);
    assert_eq!(demodulate(&bits), Ok(data), "round trip of {bits}");
}

// ══════════════════════════════════════════════════════════════════════════════
// Encoding
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn nil_is_two_zero_bits() {
    assert_eq!(encoded(&Data::Nil), "00");
}

#[test]
fn zero_is_sign_then_terminator() {
    assert_eq!(encoded(&int(0)), "010");
}

#[test]
fn one_and_minus_one_share_width_and_nibble() {
    assert_eq!(encoded(&int(1)), "01100001");
    assert_eq!(encoded(&int(-1)), "10100001");
}

#[test]
fn pair_is_prefix_then_first_then_second() {
    assert_eq!(
        encoded(&pair(int(1), int(2))),
        format!("11{}{}", "01100001", "01100010")
    );
}

#[test]
fn nested_list() {
    // [1, [2, 3], 4]
    let data = Data::list([int(1), Data::list([int(2), int(3)]), int(4)]);
    assert_eq!(
        encoded(&data),
        "1101100001111101100010110110001100110110010000"
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Decoding
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn decodes_hand_written_strings() {
    assert_eq!(demodulate_str("00"), Ok(Data::Nil));
    assert_eq!(demodulate_str("010"), Ok(int(0)));
    assert_eq!(demodulate_str("0111000010000"), Ok(int(16)));
    assert_eq!(demodulate_str("1011011111111"), Ok(int(-255)));
    assert_eq!(demodulate_str("110000"), Ok(pair(Data::Nil, Data::Nil)));
    assert_eq!(
        demodulate_str("1101000"),
        Ok(pair(int(0), Data::Nil))
    );
}

#[test]
fn round_trips() {
    round_trip(Data::Nil);
    round_trip(int(0));
    round_trip(int(17));
    round_trip(int(-123_456_789));
    round_trip(int(i64::MAX));
    round_trip(int(i64::MIN));
    round_trip(pair(pair(int(1), Data::Nil), pair(int(-2), int(3))));
    round_trip(Data::list((0..500).map(int)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Malformed input
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn empty_input_is_unexpected_end() {
    assert_eq!(demodulate_str(""), Err(ModemError::UnexpectedEnd { at: 0 }));
}

#[test]
fn single_bit_is_unexpected_end() {
    assert_eq!(demodulate_str("1"), Err(ModemError::UnexpectedEnd { at: 1 }));
}

#[test]
fn pair_missing_second_component() {
    assert_eq!(
        demodulate_str("1100"),
        Err(ModemError::UnexpectedEnd { at: 4 })
    );
}

#[test]
fn unterminated_width() {
    assert_eq!(
        demodulate_str("0111"),
        Err(ModemError::UnexpectedEnd { at: 4 })
    );
}

#[test]
fn truncated_nibbles_are_misaligned() {
    assert_eq!(
        demodulate_str("0110001"),
        Err(ModemError::Misaligned { at: 4, expected: 4 })
    );
}

#[test]
fn trailing_bits_are_rejected() {
    assert_eq!(
        demodulate_str("0100"),
        Err(ModemError::TrailingBits { at: 3 })
    );
}

#[test]
fn too_many_nibbles() {
    let text = format!("01{}0{}", "1".repeat(17), "0".repeat(68));
    assert_eq!(
        demodulate_str(&text),
        Err(ModemError::IntegerTooWide { nibbles: 17 })
    );
}

#[test]
fn magnitude_above_i64_max() {
    // 16 nibbles, all ones: u64::MAX
    let text = format!("01{}0{}", "1".repeat(16), "1".repeat(64));
    assert_eq!(
        demodulate_str(&text),
        Err(ModemError::IntegerTooWide { nibbles: 16 })
    );
}

#[test]
fn foreign_characters() {
    assert_eq!(
        demodulate_str("01 0"),
        Err(ModemError::InvalidChar { ch: ' ', at: 2 })
    );
}

#[test]
fn long_list_round_trips() {
    let long = Data::list((0..200_000).map(int));
    let bits = modulate(&long);
    let back = demodulate(&bits).unwrap();
    assert_eq!(back.as_list().map(|items| items.len()), Some(200_000));
    assert_eq!(back, long);
    drop(back);
    drop(long);
}

// ══════════════════════════════════════════════════════════════════════════════
// Wire form
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn bits_travel_as_json_strings() {
    let bits = modulate(&pair(int(1), Data::Nil));
    let json = serde_json::to_string(&bits).unwrap();
    assert_eq!(json, "\"110110000100\"");
    let back: Bits = serde_json::from_str(&json).unwrap();
    assert_eq!(demodulate(&back), Ok(pair(int(1), Data::Nil)));
}
