//! Parameter encoding for generated Python scripts.
//!
//! Caller-supplied strings (commands, symbol names, DLL paths) are embedded
//! into script text; without escaping, a crafted value could break out of its
//! quotes and splice arbitrary statements into the script. All interpolation
//! funnels through `py_str`, and binary-looking parameters are validated as
//! hex before any file is written.

use crate::error::ToolError;

/// Render `s` as a Python single-quoted string literal.
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render `s` as a Python expression that evaluates to exactly `s`.
///
/// Used to embed whole script bodies (for the file-drop fallback); JSON
/// string encoding is a valid Python string literal.
pub fn py_text_expr(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| py_str(s))
}

/// Validate and normalize a hex byte string (patches, fills, shellcode).
///
/// Separators (space, comma, colon, dash, underscore) and `0x` prefixes are
/// stripped; the remainder must be non-empty, even-length, and hex digits
/// only. Returns the contiguous lowercase hex string.
pub fn clean_hex(s: &str) -> Result<String, ToolError> {
    let mut cleaned = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '0' if matches!(chars.peek(), Some('x') | Some('X')) => {
                chars.next();
            }
            c if c.is_ascii_hexdigit() => cleaned.push(c.to_ascii_lowercase()),
            ' ' | '\t' | ',' | ':' | '-' | '_' => {}
            c => {
                return Err(ToolError::InvalidParams(format!(
                    "invalid hex character: {c}"
                )))
            }
        }
    }
    if cleaned.is_empty() {
        return Err(ToolError::InvalidParams("no hex bytes provided".to_string()));
    }
    if cleaned.len() % 2 != 0 {
        return Err(ToolError::InvalidParams(
            "hex string has odd length".to_string(),
        ));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::{clean_hex, py_str, py_text_expr};

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(py_str("bp 0x401000"), "'bp 0x401000'");
        assert_eq!(py_str(r"C:\x64dbg\plugins"), r"'C:\\x64dbg\\plugins'");
        assert_eq!(py_str("it's"), r"'it\'s'");
        assert_eq!(py_str(r#"say "hi""#), r#"'say \"hi\"'"#);
        assert_eq!(py_str("a\nb"), r"'a\nb'");
    }

    #[test]
    fn injection_attempt_stays_inside_the_literal() {
        let hostile = "'); import os; os.system('calc'); ('";
        let lit = py_str(hostile);
        // Every quote inside the literal must be escaped.
        assert!(lit.starts_with('\'') && lit.ends_with('\''));
        let inner = lit[1..lit.len() - 1].as_bytes();
        for (i, &b) in inner.iter().enumerate() {
            if b == b'\'' {
                assert!(i > 0 && inner[i - 1] == b'\\');
            }
        }
    }

    #[test]
    fn text_expr_is_json_string() {
        assert_eq!(py_text_expr("print('hi')"), r#""print('hi')""#);
    }

    #[test]
    fn hex_normalization() {
        assert_eq!(clean_hex("90 90 90").unwrap(), "909090");
        assert_eq!(clean_hex("0x48,0x89,0xE5").unwrap(), "4889e5");
        assert_eq!(clean_hex("DE-AD-BE-EF").unwrap(), "deadbeef");
    }

    #[test]
    fn hex_rejects_odd_and_invalid() {
        assert!(clean_hex("").is_err());
        assert!(clean_hex("   ").is_err());
        assert!(clean_hex("abc").is_err());
        assert!(clean_hex("zz").is_err());
    }
}
