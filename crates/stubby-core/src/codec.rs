//! Base-62 codec between identifiers and short codes.
//!
//! Identifiers are written in positional base 62, most significant digit
//! first, over the alphabet `a-z`, `A-Z`, `0-9` (so `a` is the zero digit).
//! Zero encodes to `"a"` rather than to the empty string.

use crate::error::CodecError;
use crate::shortcode::ShortCode;

/// The ordered code alphabet. Index 0 is `a`, index 61 is `9`.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number base of the codec.
pub const BASE: u64 = ALPHABET.len() as u64;

/// Largest identifier handed out by the store. Identifiers are kept within
/// 63 bits so they fit a signed 64-bit SQL column.
pub const MAX_ID: u64 = i64::MAX as u64;

/// Longest code `encode` can produce for any `u64` (62^11 > 2^64).
pub const MAX_ENCODED_LEN: usize = 11;

/// Maps an ASCII byte back to its digit value.
const fn digit_table() -> [u8; 256] {
    let mut table = [u8::MAX; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const DIGITS: [u8; 256] = digit_table();

/// Returns the digit value of `ch`, or `None` when it is outside the alphabet.
pub fn digit_of(ch: char) -> Option<u64> {
    if !ch.is_ascii() {
        return None;
    }
    match DIGITS[ch as usize] {
        u8::MAX => None,
        digit => Some(u64::from(digit)),
    }
}

/// Encodes an identifier as a short code.
pub fn encode(id: u64) -> ShortCode {
    let mut buf = [0u8; MAX_ENCODED_LEN];
    let mut pos = buf.len();
    let mut rest = id;

    loop {
        pos -= 1;
        buf[pos] = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
        if rest == 0 {
            break;
        }
    }

    // Only alphabet bytes were written, all of which are ASCII.
    let encoded = buf[pos..].iter().map(|&b| b as char).collect::<String>();
    ShortCode::from_encoded(encoded)
}

/// Decodes a short code back into its identifier.
///
/// This is the left inverse of [`encode`]. Leading zero digits are accepted,
/// so `"ab"` and `"b"` both decode to 1.
pub fn decode(code: &str) -> Result<u64, CodecError> {
    if code.is_empty() {
        return Err(CodecError::Empty);
    }

    code.chars().enumerate().try_fold(0u64, |acc, (position, ch)| {
        let digit = digit_of(ch).ok_or(CodecError::InvalidCharacter { ch, position })?;
        acc.checked_mul(BASE)
            .and_then(|value| value.checked_add(digit))
            .ok_or(CodecError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_unique_and_url_safe() {
        let mut seen = std::collections::HashSet::new();
        for &b in ALPHABET {
            assert!(b.is_ascii_alphanumeric());
            assert!(seen.insert(b));
        }
        assert_eq!(seen.len(), 62);
    }

    #[test]
    fn encodes_known_vectors() {
        assert_eq!(encode(0).as_str(), "a");
        assert_eq!(encode(1).as_str(), "b");
        assert_eq!(encode(2).as_str(), "c");
        assert_eq!(encode(25).as_str(), "z");
        assert_eq!(encode(26).as_str(), "A");
        assert_eq!(encode(51).as_str(), "Z");
        assert_eq!(encode(52).as_str(), "0");
        assert_eq!(encode(61).as_str(), "9");
        assert_eq!(encode(62).as_str(), "ba");
        assert_eq!(encode(63).as_str(), "bb");
        assert_eq!(encode(3843).as_str(), "99");
        assert_eq!(encode(3844).as_str(), "baa");
    }

    #[test]
    fn widest_values_fit_the_buffer() {
        assert_eq!(encode(u64::MAX).as_str().len(), MAX_ENCODED_LEN);
        assert!(encode(MAX_ID).as_str().len() <= MAX_ENCODED_LEN);
    }

    #[test]
    fn decode_reverses_encode() {
        let samples = [0, 1, 61, 62, 3843, 3844, 238_327, 1 << 32, MAX_ID, u64::MAX];
        for n in samples {
            assert_eq!(decode(encode(n).as_str()), Ok(n), "value {n}");
        }

        // Walk every digit boundary up to 62^10.
        let mut power = 1u64;
        for _ in 0..10 {
            power *= BASE;
            for n in [power - 1, power, power + 1] {
                assert_eq!(decode(encode(n).as_str()), Ok(n), "value {n}");
            }
        }
    }

    #[test]
    fn distinct_ids_give_distinct_codes() {
        let mut seen = std::collections::HashSet::new();
        for n in 0..20_000u64 {
            assert!(seen.insert(encode(n)), "duplicate code for {n}");
        }
    }

    #[test]
    fn decode_accepts_leading_zero_digits() {
        assert_eq!(decode("ab"), Ok(1));
        assert_eq!(decode("aaa"), Ok(0));
    }

    #[test]
    fn decode_rejects_foreign_characters() {
        assert_eq!(
            decode("ab-c"),
            Err(CodecError::InvalidCharacter { ch: '-', position: 2 })
        );
        assert_eq!(
            decode("has space"),
            Err(CodecError::InvalidCharacter { ch: ' ', position: 3 })
        );
        assert_eq!(
            decode("é"),
            Err(CodecError::InvalidCharacter { ch: 'é', position: 0 })
        );
    }

    #[test]
    fn decode_rejects_empty_and_overflowing_input() {
        assert_eq!(decode(""), Err(CodecError::Empty));
        // One past u64::MAX needs a twelfth digit.
        assert_eq!(decode("baaaaaaaaaaa"), Err(CodecError::Overflow));
        assert_eq!(decode("999999999999"), Err(CodecError::Overflow));
    }
}
