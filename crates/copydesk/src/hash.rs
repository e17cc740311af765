//! Content fingerprinting for analytics de-duplication.
//!
//! The fingerprint is a 32-bit rolling hash (`h * 31 + unit` with i32
//! wraparound) over the UTF-16 code units of the trimmed, lower-cased text,
//! printed as the absolute value in base 36. It must stay bit-for-bit
//! stable: ledgers written by earlier versions are compared against it.
//! It is not collision resistant and is not meant to be.

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fingerprint `content` for duplicate detection.
///
/// # Example
///
/// ```
/// use copydesk::content_hash;
///
/// assert_eq!(content_hash("a"), "2p");
/// assert_eq!(content_hash("  A "), content_hash("a"));
/// assert_eq!(content_hash(""), "0");
/// ```
pub fn content_hash(content: &str) -> String {
    let normalized = normalize(content);
    let hash = normalized.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    to_base36(hash.unsigned_abs())
}

/// Trim and lower-case.
fn normalize(content: &str) -> String {
    content.trim_matches(is_trimmed).to_lowercase()
}

/// ECMAScript white space and line terminators: Unicode `White_Space`
/// plus the byte-order mark, minus U+0085 NEXT LINE.
fn is_trimmed(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let index = (value % 36) as usize;
        if let Some(digit) = DIGITS.get(index) {
            digits.push(char::from(*digit));
        }
        value /= 36;
    }
    digits.iter().rev().collect()
}
