use galaxy_types::{Bits, Data};

/// Encode a data tree, pre-order, first component before second.
pub fn modulate(data: &Data) -> Bits {
    let mut bits = Bits::new();
    let mut stack = vec![data];
    while let Some(top) = stack.pop() {
        match top {
            Data::Nil => bits.extend_from_slice(&[false, false]),
            Data::Int(n) => modulate_int(*n, &mut bits),
            Data::Pair(first, second) => {
                bits.extend_from_slice(&[true, true]);
                stack.push(second);
                stack.push(first);
            }
        }
    }
    bits
}

/// Append the encoding of a single integer to `bits`.
pub fn modulate_int(n: i64, bits: &mut Bits) {
    if n >= 0 {
        bits.extend_from_slice(&[false, true]);
    } else {
        bits.extend_from_slice(&[true, false]);
    }

    let magnitude = n.unsigned_abs();
    let significant = (u64::BITS - magnitude.leading_zeros()) as usize;
    let nibbles = significant.div_ceil(4);

    for _ in 0..nibbles {
        bits.push(true);
    }
    bits.push(false);

    for shift in (0..nibbles * 4).rev() {
        bits.push((magnitude >> shift) & 1 == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_bits(n: i64) -> String {
        let mut bits = Bits::new();
        modulate_int(n, &mut bits);
        bits.to_string()
    }

    #[test]
    fn zero_has_no_nibbles() {
        assert_eq!(int_bits(0), "010");
    }

    #[test]
    fn small_integers() {
        assert_eq!(int_bits(1), "01100001");
        assert_eq!(int_bits(-1), "10100001");
        assert_eq!(int_bits(15), "01101111");
        assert_eq!(int_bits(16), "0111000010000");
        assert_eq!(int_bits(-255), "1011011111111");
        assert_eq!(int_bits(256), "011110000100000000");
    }

    #[test]
    fn extremes_use_sixteen_nibbles() {
        let max = int_bits(i64::MAX);
        assert_eq!(max.len(), 2 + 17 + 64);
        let min = int_bits(i64::MIN);
        assert_eq!(min.len(), 2 + 17 + 64);
        assert!(min.starts_with("10"));
        assert!(min.ends_with(&format!("1{}", "0".repeat(63))));
    }
}
