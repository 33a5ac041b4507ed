//! Numeric formatting and parsing in the current BASE

use crate::Cell;

/// Render a cell for `.`
///
/// Base 16 gives uppercase hexadecimal without a prefix; any other base
/// renders decimal. Negative hex values keep a leading minus sign rather than
/// showing the two's complement bit pattern.
pub fn format_cell(value: Cell, base: Cell) -> String {
    if base == 16 {
        if value < 0 {
            format!("-{:X}", value.unsigned_abs())
        } else {
            format!("{:X}", value)
        }
    } else {
        value.to_string()
    }
}

/// Parse a token as an integer literal in `base`
///
/// Accepted forms, each with an optional leading `+` or `-`:
///
/// - plain digits in `base` (`2..=36`)
/// - the base's own radix prefix: `0x` in base 16, `0o` in base 8, `0b` in
///   base 2 (`0xFF` is a number in HEX, not in DECIMAL)
/// - with base 0, any of `0x`/`0o`/`0b`, otherwise decimal
/// - a prefix that overrides BASE for one literal: `#` decimal, `$` hex,
///   `%` binary (`#10` is ten in every base); the sign may follow the prefix
///
/// Returns `None` when the token is not a number, does not fit a cell, or
/// `base` is neither 0 nor in `2..=36`.
pub fn parse_cell(token: &str, base: Cell) -> Option<Cell> {
    let (mut negative, mut digits) = split_sign(token);

    let radix = match override_prefix(digits) {
        Some((radix, rest)) => {
            digits = rest;
            if !negative {
                (negative, digits) = split_sign(digits);
            }
            radix
        }
        None => match base {
            0 => {
                let (radix, rest) = radix_prefix(digits).unwrap_or((10, digits));
                digits = rest;
                radix
            }
            2..=36 => {
                let radix = base as u32;
                if let Some((prefixed, rest)) = radix_prefix(digits) {
                    if prefixed == radix {
                        digits = rest;
                    }
                }
                radix
            }
            _ => return None,
        },
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Cell::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn split_sign(token: &str) -> (bool, &str) {
    if let Some(rest) = token.strip_prefix('-') {
        (true, rest)
    } else {
        (false, token.strip_prefix('+').unwrap_or(token))
    }
}

/// `0x`, `0o`, `0b` (either case)
fn radix_prefix(digits: &str) -> Option<(u32, &str)> {
    let bytes = digits.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    Some((radix, &digits[2..]))
}

/// `#` decimal, `$` hex, `%` binary
fn override_prefix(digits: &str) -> Option<(u32, &str)> {
    let radix = match digits.as_bytes().first()? {
        b'#' => 10,
        b'$' => 16,
        b'%' => 2,
        _ => return None,
    };
    Some((radix, &digits[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_cell(255, 10), "255");
        assert_eq!(format_cell(-42, 10), "-42");
        assert_eq!(format_cell(0, 10), "0");
    }

    #[test]
    fn test_format_hex_is_uppercase_without_prefix() {
        assert_eq!(format_cell(255, 16), "FF");
        assert_eq!(format_cell(0xDEAD, 16), "DEAD");
        assert_eq!(format_cell(-255, 16), "-FF");
        assert_eq!(format_cell(Cell::MIN, 16), "-8000000000000000");
    }

    #[test]
    fn test_format_unrecognized_base_falls_back_to_decimal() {
        assert_eq!(format_cell(255, 8), "255");
        assert_eq!(format_cell(255, 0), "255");
    }

    #[test]
    fn test_parse_in_base() {
        assert_eq!(parse_cell("42", 10), Some(42));
        assert_eq!(parse_cell("-7", 10), Some(-7));
        assert_eq!(parse_cell("+7", 10), Some(7));
        assert_eq!(parse_cell("ff", 16), Some(255));
        assert_eq!(parse_cell("FF", 16), Some(255));
        assert_eq!(parse_cell("FF", 10), None);
        assert_eq!(parse_cell("101", 2), Some(5));
    }

    #[test]
    fn test_parse_rejects_non_numbers_and_bad_bases() {
        assert_eq!(parse_cell("", 10), None);
        assert_eq!(parse_cell("-", 10), None);
        assert_eq!(parse_cell("+-5", 10), None);
        assert_eq!(parse_cell("DUP", 10), None);
        assert_eq!(parse_cell("10", 1), None);
        assert_eq!(parse_cell("10", 37), None);
        assert_eq!(parse_cell("10", -16), None);
    }

    #[test]
    fn test_parse_base_zero_detects_prefix() {
        assert_eq!(parse_cell("10", 0), Some(10));
        assert_eq!(parse_cell("-10", 0), Some(-10));
        assert_eq!(parse_cell("0x1F", 0), Some(31));
        assert_eq!(parse_cell("-0x1f", 0), Some(-31));
        assert_eq!(parse_cell("0o17", 0), Some(15));
        assert_eq!(parse_cell("0b101", 0), Some(5));
        assert_eq!(parse_cell("0x", 0), None);
        assert_eq!(parse_cell("FF", 0), None);
    }

    #[test]
    fn test_parse_accepts_own_radix_prefix_only() {
        assert_eq!(parse_cell("0xFF", 16), Some(255));
        assert_eq!(parse_cell("-0XFF", 16), Some(-255));
        assert_eq!(parse_cell("0b101", 2), Some(5));
        assert_eq!(parse_cell("0o17", 8), Some(15));
        assert_eq!(parse_cell("0xFF", 10), None);
        // In HEX, 0B1 is the hex number B1, not a binary prefix
        assert_eq!(parse_cell("0B1", 16), Some(0xB1));
    }

    #[test]
    fn test_parse_override_prefix_ignores_base() {
        for base in [0, 2, 10, 16] {
            assert_eq!(parse_cell("#10", base), Some(10), "base {}", base);
            assert_eq!(parse_cell("$10", base), Some(16), "base {}", base);
            assert_eq!(parse_cell("%10", base), Some(2), "base {}", base);
        }
        assert_eq!(parse_cell("#-13", 16), Some(-13));
        assert_eq!(parse_cell("-$FF", 10), Some(-255));
        assert_eq!(parse_cell("-#-1", 10), None);
        assert_eq!(parse_cell("#", 10), None);
        assert_eq!(parse_cell("$G", 10), None);
    }

    #[test]
    fn test_parse_cell_extremes() {
        assert_eq!(parse_cell("-9223372036854775808", 10), Some(Cell::MIN));
        assert_eq!(parse_cell("9223372036854775807", 10), Some(Cell::MAX));
        assert_eq!(parse_cell("9223372036854775808", 10), None);
    }

    #[test]
    fn test_parse_overflow_is_not_a_number() {
        assert_eq!(parse_cell("99999999999999999999", 10), None);
    }
}
