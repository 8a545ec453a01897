//! Literal scanners for re-parsed source text
//!
//! Each scanner reads a literal from the start of the argument text the
//! update engine extracted from a source line. Scanning is prefix-based:
//! trailing text (type suffixes, closing parens, commas, comments) is left
//! alone, so `-9.81f32);` parses as `-9.81`. Numeric literals follow Rust
//! grammar - `_` digit separators and `0x`/`0o`/`0b` radix prefixes are
//! accepted.

/// Byte at `i`, or NUL past the end. NUL matches none of the scanners'
/// character classes, so it doubles as a terminator.
fn peek(bytes: &[u8], i: usize) -> u8 {
    bytes.get(i).copied().unwrap_or(0)
}

/// Append digits (and skip `_` separators) starting at `*i`; returns the
/// number of digits taken.
fn take_digits(bytes: &[u8], i: &mut usize, buf: &mut String) -> usize {
    let mut count = 0;
    loop {
        let b = peek(bytes, *i);
        if b.is_ascii_digit() {
            buf.push(b as char);
            count += 1;
        } else if b == b'_' && count > 0 {
            // Rust digit separator, dropped
        } else {
            break;
        }
        *i += 1;
    }
    count
}

/// Scan a float literal prefix: optional sign, digits with optional
/// fraction, optional exponent.
pub(crate) fn scan_f32(text: &str) -> Option<f32> {
    let bytes = text.as_bytes();
    let mut buf = String::new();
    let mut i = 0;

    if peek(bytes, i) == b'+' || peek(bytes, i) == b'-' {
        buf.push(bytes[i] as char);
        i += 1;
    }
    let whole = take_digits(bytes, &mut i, &mut buf);
    let mut frac = 0;
    if peek(bytes, i) == b'.' {
        buf.push('.');
        i += 1;
        frac = take_digits(bytes, &mut i, &mut buf);
    }
    if whole == 0 && frac == 0 {
        return None;
    }

    // An exponent only counts if at least one digit follows it; `2e` stays 2.
    if peek(bytes, i) == b'e' || peek(bytes, i) == b'E' {
        let mut j = i + 1;
        if peek(bytes, j) == b'+' || peek(bytes, j) == b'-' {
            j += 1;
        }
        if peek(bytes, j).is_ascii_digit() {
            for &b in &bytes[i..j] {
                buf.push(b as char);
            }
            i = j;
            take_digits(bytes, &mut i, &mut buf);
        }
    }

    buf.parse().ok()
}

/// Scan an integer literal prefix: optional sign, optional radix prefix,
/// digits.
pub(crate) fn scan_i32(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    let mut i = 0;

    let negative = match peek(bytes, i) {
        b'-' => {
            i += 1;
            true
        }
        b'+' => {
            i += 1;
            false
        }
        _ => false,
    };

    let radix = if peek(bytes, i) == b'0' {
        match peek(bytes, i + 1) {
            b'x' | b'X' => {
                i += 2;
                16
            }
            b'o' | b'O' => {
                i += 2;
                8
            }
            b'b' | b'B' => {
                i += 2;
                2
            }
            _ => 10,
        }
    } else {
        10
    };

    let mut digits = String::new();
    loop {
        let b = peek(bytes, i);
        if (b as char).is_digit(radix) {
            digits.push(b as char);
        } else if b == b'_' && !digits.is_empty() {
            // separator
        } else {
            break;
        }
        i += 1;
    }
    if digits.is_empty() {
        return None;
    }

    // Accumulate in i64 so i32::MIN survives the sign flip.
    let magnitude = i64::from_str_radix(&digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Scan a bool literal: `true`/`TRUE`, `false`/`FALSE`, or `1`/`0`.
pub(crate) fn scan_bool(text: &str) -> Option<bool> {
    if text.starts_with("true") || text.starts_with("TRUE") {
        return Some(true);
    }
    if text.starts_with("false") || text.starts_with("FALSE") {
        return Some(false);
    }
    match text.as_bytes().first() {
        Some(b'1') => Some(true),
        Some(b'0') => Some(false),
        _ => None,
    }
}

/// Scan a single-quoted char literal with an optional one-character
/// backslash escape.
pub(crate) fn scan_char(text: &str) -> Option<char> {
    let start = text.find('\'')?;
    let mut chars = text[start + 1..].chars();
    let value = match chars.next()? {
        // '' is not a char literal
        '\'' => return None,
        '\\' => decode_escape(chars.next()?),
        c => c,
    };
    match chars.next() {
        Some('\'') => Some(value),
        _ => None,
    }
}

/// Escape table shared by char and string literals. Escapes outside the
/// table decode to the escaped character itself.
fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        c => c,
    }
}

/// Scan a double-quoted string literal, decoding backslash escapes.
///
/// `\n`, `\t`, `\r`, `\\`, `\"` and `\'` decode; any other escaped
/// character passes through literally, backslash included. Returns `None`
/// if no opening quote is found or the literal is unterminated on the line.
pub(crate) fn scan_str(text: &str) -> Option<String> {
    let start = text.find('"')?;
    let mut out = String::new();
    let mut chars = text[start + 1..].chars();
    loop {
        match chars.next()? {
            '"' => return Some(out),
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                c @ ('\\' | '"' | '\'') => out.push(c),
                c => {
                    out.push('\\');
                    out.push(c);
                }
            },
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_f32_plain() {
        assert_eq!(scan_f32("3.14"), Some(3.14));
        assert_eq!(scan_f32("-9.81);"), Some(-9.81));
        assert_eq!(scan_f32("+0.5, trailing"), Some(0.5));
        assert_eq!(scan_f32("42"), Some(42.0));
        assert_eq!(scan_f32("2."), Some(2.0));
        assert_eq!(scan_f32(".5"), Some(0.5));
    }

    #[test]
    fn test_scan_f32_rust_grammar() {
        assert_eq!(scan_f32("3.14f32);"), Some(3.14));
        assert_eq!(scan_f32("1_000.25"), Some(1000.25));
        assert_eq!(scan_f32("2.5e3"), Some(2500.0));
        assert_eq!(scan_f32("1e-2"), Some(0.01));
        // `e` without digits is not an exponent
        assert_eq!(scan_f32("2e)"), Some(2.0));
    }

    #[test]
    fn test_scan_f32_rejects() {
        assert_eq!(scan_f32("oops"), None);
        assert_eq!(scan_f32(""), None);
        assert_eq!(scan_f32("-"), None);
        assert_eq!(scan_f32("."), None);
        assert_eq!(scan_f32("inf"), None);
    }

    #[test]
    fn test_scan_i32_plain() {
        assert_eq!(scan_i32("42"), Some(42));
        assert_eq!(scan_i32("-17);"), Some(-17));
        assert_eq!(scan_i32("+3,"), Some(3));
        assert_eq!(scan_i32("0"), Some(0));
        assert_eq!(scan_i32("1_000_000"), Some(1_000_000));
        assert_eq!(scan_i32("16i32);"), Some(16));
    }

    #[test]
    fn test_scan_i32_radix_prefixes() {
        assert_eq!(scan_i32("0x1F"), Some(31));
        assert_eq!(scan_i32("0xff,"), Some(255));
        assert_eq!(scan_i32("-0x10"), Some(-16));
        assert_eq!(scan_i32("0o17"), Some(15));
        assert_eq!(scan_i32("0b1010"), Some(10));
    }

    #[test]
    fn test_scan_i32_range() {
        assert_eq!(scan_i32("2147483647"), Some(i32::MAX));
        assert_eq!(scan_i32("-2147483648"), Some(i32::MIN));
        assert_eq!(scan_i32("2147483648"), None);
        assert_eq!(scan_i32("0x"), None);
        assert_eq!(scan_i32("x"), None);
    }

    #[test]
    fn test_scan_bool_tokens() {
        assert_eq!(scan_bool("true);"), Some(true));
        assert_eq!(scan_bool("TRUE,"), Some(true));
        assert_eq!(scan_bool("false);"), Some(false));
        assert_eq!(scan_bool("FALSE"), Some(false));
    }

    #[test]
    fn test_scan_bool_digits() {
        // 1 is true and 0 is false, the conventional mapping
        assert_eq!(scan_bool("1);"), Some(true));
        assert_eq!(scan_bool("0);"), Some(false));
        assert_eq!(scan_bool("yes"), None);
        assert_eq!(scan_bool(""), None);
    }

    #[test]
    fn test_scan_char() {
        assert_eq!(scan_char("'a');"), Some('a'));
        assert_eq!(scan_char("'Z'"), Some('Z'));
        assert_eq!(scan_char("' '"), Some(' '));
        assert_eq!(scan_char("'\\n'"), Some('\n'));
        assert_eq!(scan_char("'\\t'"), Some('\t'));
        assert_eq!(scan_char("'\\\\'"), Some('\\'));
        assert_eq!(scan_char("'\\''"), Some('\''));
    }

    #[test]
    fn test_scan_char_malformed() {
        assert_eq!(scan_char("''"), None);
        assert_eq!(scan_char("'ab'"), None);
        assert_eq!(scan_char("'a"), None);
        assert_eq!(scan_char("a"), None);
        assert_eq!(scan_char(""), None);
    }

    #[test]
    fn test_scan_str_plain() {
        assert_eq!(scan_str("\"hello\");"), Some("hello".to_owned()));
        assert_eq!(scan_str("\"\""), Some(String::new()));
        assert_eq!(scan_str("\"with spaces\" ,"), Some("with spaces".to_owned()));
    }

    #[test]
    fn test_scan_str_escapes() {
        // a\nb\tc\"d in source decodes to a<LF>b<TAB>c"d
        assert_eq!(
            scan_str(r#""a\nb\tc\"d");"#),
            Some("a\nb\tc\"d".to_owned())
        );
        assert_eq!(scan_str(r#""\r\\""#), Some("\r\\".to_owned()));
        assert_eq!(scan_str(r#""\'""#), Some("'".to_owned()));
        // unknown escapes pass through with the backslash
        assert_eq!(scan_str(r#""a\qb""#), Some("a\\qb".to_owned()));
    }

    #[test]
    fn test_scan_str_unterminated() {
        assert_eq!(scan_str("\"no closing"), None);
        assert_eq!(scan_str("\"ends in escape\\"), None);
        assert_eq!(scan_str("no quote at all"), None);
    }
}
