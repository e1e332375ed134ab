//! Random file content, file naming and file-count parsing

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Generate `entropy_bytes` bytes from the OS CSPRNG, base64 encoded
pub fn random_content(entropy_bytes: usize) -> String {
    let mut bytes = vec![0u8; entropy_bytes];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// Name of the `index`-th generated file: `<prefix>_<index>.txt`
pub fn file_name(prefix: &str, index: u64) -> String {
    format!("{}_{}.txt", prefix, index)
}

/// Number of loop iterations for a requested count; non-positive counts run none
pub fn iterations(requested: i64) -> u64 {
    requested.max(0) as u64
}

/// Parse a file count permissively.
///
/// Leading whitespace and an optional sign are accepted, then the longest run
/// of digits (single underscores allowed between digits). Anything that does
/// not start like a number yields 0. Out-of-range values saturate.
pub fn parse_file_count(input: &str) -> i64 {
    let mut chars = input.trim_start().chars().peekable();

    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    let mut last_was_digit = false;
    while let Some(&c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            let digit = digit as i64;
            value = if negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            };
            last_was_digit = true;
            chars.next();
        } else if c == '_' && last_was_digit {
            chars.next();
            match chars.peek() {
                Some(next) if next.is_ascii_digit() => last_was_digit = false,
                _ => break,
            }
        } else {
            break;
        }
    }

    value
}
