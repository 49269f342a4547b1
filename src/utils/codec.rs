//! Base-62 short codes.
//!
//! A short code is the base-62 rendering of a link id, most significant digit
//! first, over the alphabet `a-z A-Z 0-9` (digit values 0..=61). The mapping is
//! a bijection between positive ids and canonical codes, i.e. codes that do not
//! start with `a` (the zero digit).

const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const BASE: i64 = 62;

/// Renders an id as a short code. Ids below 1 have no code and yield `""`.
///
/// ```
/// use littleu::utils::codec::encode;
///
/// assert_eq!(encode(1), "b");
/// assert_eq!(encode(61), "9");
/// assert_eq!(encode(62), "ba");
/// ```
pub fn encode(id: i64) -> String {
    if id <= 0 {
        return String::new();
    }

    let mut n = id;
    let mut digits = Vec::with_capacity(11);
    while n > 0 {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Lenient decode: anything that is not a valid code decodes to `0`.
///
/// Use [`try_decode`] for user-supplied input.
pub fn decode(code: &str) -> i64 {
    try_decode_any(code).unwrap_or(0)
}

/// Strict decode of a canonical short code.
///
/// Returns `None` for empty input, symbols outside the alphabet, a leading
/// zero digit (`a`) and values that overflow `i64`.
pub fn try_decode(code: &str) -> Option<i64> {
    if code.starts_with('a') {
        return None;
    }
    try_decode_any(code).filter(|id| *id >= 1)
}

/// Whether `code` is the canonical rendering of some id.
pub fn is_valid_code(code: &str) -> bool {
    try_decode(code).is_some()
}

fn try_decode_any(code: &str) -> Option<i64> {
    if code.is_empty() {
        return None;
    }

    code.bytes().try_fold(0i64, |id, c| {
        id.checked_mul(BASE)?.checked_add(digit(c)?)
    })
}

fn digit(c: u8) -> Option<i64> {
    let value = match c {
        b'a'..=b'z' => c - b'a',
        b'A'..=b'Z' => c - b'A' + 26,
        b'0'..=b'9' => c - b'0' + 52,
        _ => return None,
    };
    Some(value as i64)
}
