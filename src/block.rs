//! Fixed-size block arithmetic and numeric field decoding.

use crate::error::{Result, TarError};

/// Size of a tar block. Headers occupy exactly one block and entry bodies are
/// padded out to a whole number of them.
pub const BLOCK_SIZE: usize = 512;

const BLOCK_SIZE_U64: u64 = BLOCK_SIZE as u64;

/// Returns the number of blocks needed to hold `n` bytes.
pub fn blocks_for_bytes(n: u64) -> u64 {
    n.div_ceil(BLOCK_SIZE_U64)
}

/// Returns `n` rounded up to the next block boundary.
///
/// Fails if the rounded value cannot be represented.
pub fn padded_len(n: u64) -> Result<u64> {
    blocks_for_bytes(n)
        .checked_mul(BLOCK_SIZE_U64)
        .ok_or_else(|| TarError::InvalidSize(n.to_string()))
}

/// Returns whether `block` consists only of NUL bytes.
pub fn is_zero_block(block: &[u8]) -> bool {
    block.iter().all(|b| *b == 0)
}

/// Decodes a NUL/space padded ASCII octal numeral.
///
/// Leading spaces and a single `+` are skipped. Decoding stops at the first
/// byte that is not an octal digit, so a field without digits is 0. A leading
/// `-` or a value wider than 64 bits is rejected.
pub fn decode_octal(field: &[u8]) -> Result<u64> {
    let start = field
        .iter()
        .position(|b| *b != b' ')
        .unwrap_or(field.len());
    let mut digits = &field[start..];
    match digits.first() {
        Some(b'-') => return Err(invalid(field)),
        Some(b'+') => digits = &digits[1..],
        _ => {}
    }

    let mut value: u64 = 0;
    for &b in digits.iter().take_while(|b| (b'0'..=b'7').contains(*b)) {
        value = value
            .checked_mul(8)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or_else(|| invalid(field))?;
    }
    Ok(value)
}

fn invalid(field: &[u8]) -> TarError {
    TarError::InvalidSize(String::from_utf8_lossy(crate::header::truncate(field)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn block_rounding() {
        assert_eq!(blocks_for_bytes(0), 0);
        assert_eq!(blocks_for_bytes(1), 1);
        assert_eq!(blocks_for_bytes(511), 1);
        assert_eq!(blocks_for_bytes(512), 1);
        assert_eq!(blocks_for_bytes(513), 2);
        assert_eq!(blocks_for_bytes(u64::MAX), u64::MAX / 512 + 1);
    }

    #[test]
    fn rounding_bounds_hold() {
        let mut rng = SmallRng::seed_from_u64(0x7a12);
        for _ in 0..10_000 {
            let n = rng.gen_range(0..u64::MAX - 511);
            let padded = blocks_for_bytes(n) * 512;
            assert!(padded >= n, "{} rounded down to {}", n, padded);
            assert!(padded < n + 512, "{} rounded up too far to {}", n, padded);
        }
    }

    #[test]
    fn padded_len_overflow() {
        assert_eq!(padded_len(10).unwrap(), 512);
        assert_eq!(padded_len(1024).unwrap(), 1024);
        assert!(padded_len(u64::MAX).is_err());
    }

    #[test]
    fn octal_fields() {
        assert_eq!(decode_octal(b"00000000012\0").unwrap(), 10);
        assert_eq!(decode_octal(b"0000644\0").unwrap(), 0o644);
        assert_eq!(decode_octal(b"     123 ").unwrap(), 0o123);
        assert_eq!(decode_octal(b"+17\0").unwrap(), 0o17);
        assert_eq!(decode_octal(b"\0\0\0\0").unwrap(), 0);
        assert_eq!(decode_octal(b"        ").unwrap(), 0);
        assert_eq!(decode_octal(b"").unwrap(), 0);
    }

    #[test]
    fn octal_stops_at_first_invalid_digit() {
        assert_eq!(decode_octal(b"128\0").unwrap(), 0o12);
        assert_eq!(decode_octal(b"7x7\0").unwrap(), 7);
        assert_eq!(decode_octal(b"abc\0").unwrap(), 0);
    }

    #[test]
    fn octal_rejects_negative_and_overflow() {
        assert!(matches!(
            decode_octal(b"-0000012\0"),
            Err(TarError::InvalidSize(_))
        ));
        assert!(matches!(
            decode_octal(b"7777777777777777777777777"),
            Err(TarError::InvalidSize(_))
        ));
    }

    #[test]
    fn zero_blocks() {
        assert!(is_zero_block(&[0; BLOCK_SIZE]));
        let mut block = [0; BLOCK_SIZE];
        block[511] = 1;
        assert!(!is_zero_block(&block));
    }
}
