//! Address parsing, formatting, and arithmetic.
//!
//! Addresses arrive from clients as strings, either `0x`-prefixed hex or
//! plain decimal. Parse failures are explicit errors, never a silent zero.

use crate::error::ToolError;

/// Parse an address string into an integer.
///
/// Leading/trailing whitespace and interior spaces are stripped first.
/// `0x`/`0X` prefix selects base 16, everything else is base 10.
pub fn parse_address(text: &str) -> Result<u64, ToolError> {
    let cleaned: String = text.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(ToolError::InvalidAddress(text.to_string()));
    }
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|_| ToolError::InvalidAddress(text.to_string()))
    } else {
        cleaned
            .parse::<u64>()
            .map_err(|_| ToolError::InvalidAddress(text.to_string()))
    }
}

/// Format an address in the requested style.
///
/// Styles are `hex`, `decimal`, `octal`, and `binary` (case-insensitive).
/// Unknown styles fall back to hex rather than erroring; callers that care
/// must validate the style name themselves.
pub fn format_address(value: u64, style: &str) -> String {
    match style.to_ascii_lowercase().as_str() {
        "decimal" => value.to_string(),
        "octal" => format!("0o{value:o}"),
        "binary" => format!("0b{value:b}"),
        _ => format!("{value:#x}"),
    }
}

/// Compute `base + offset` where `base` is an address string and `offset`
/// may be negative. Overflow in either direction is rejected.
pub fn calculate_address(base: &str, offset: i64) -> Result<u64, ToolError> {
    let base_value = parse_address(base)?;
    let result = if offset >= 0 {
        base_value.checked_add(offset as u64)
    } else {
        base_value.checked_sub(offset.unsigned_abs())
    };
    result.ok_or_else(|| {
        ToolError::InvalidAddress(format!("{base} {offset:+} overflows the address space"))
    })
}

#[cfg(test)]
mod tests {
    use super::{calculate_address, format_address, parse_address};

    #[test]
    fn parses_hex_and_decimal() {
        assert_eq!(parse_address("0x401000").unwrap(), 0x401000);
        assert_eq!(parse_address("0X401000").unwrap(), 0x401000);
        assert_eq!(parse_address("4198400").unwrap(), 4198400);
        assert_eq!(parse_address("  0x40 10 00 ").unwrap(), 0x401000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_address("").is_err());
        assert!(parse_address("   ").is_err());
        assert!(parse_address("0xzz").is_err());
        assert!(parse_address("40g0").is_err());
        assert!(parse_address("-5").is_err());
    }

    #[test]
    fn formats_all_styles() {
        assert_eq!(format_address(0x401000, "hex"), "0x401000");
        assert_eq!(format_address(0x401000, "HEX"), "0x401000");
        assert_eq!(format_address(255, "decimal"), "255");
        assert_eq!(format_address(8, "octal"), "0o10");
        assert_eq!(format_address(5, "binary"), "0b101");
    }

    #[test]
    fn unknown_style_falls_back_to_hex() {
        assert_eq!(format_address(16, "roman"), "0x10");
    }

    #[test]
    fn round_trips_to_canonical_hex() {
        for s in ["0x401000", "4198400", "0xFFFF", "0"] {
            let v = parse_address(s).unwrap();
            assert_eq!(parse_address(&format_address(v, "hex")).unwrap(), v);
        }
    }

    #[test]
    fn zero_offset_is_identity() {
        assert_eq!(
            calculate_address("0x7ff123400000", 0).unwrap(),
            parse_address("0x7ff123400000").unwrap()
        );
    }

    #[test]
    fn negative_offsets_and_overflow() {
        assert_eq!(calculate_address("0x1000", -0x10).unwrap(), 0xff0);
        assert!(calculate_address("0x0", -1).is_err());
        assert!(calculate_address("0xffffffffffffffff", 1).is_err());
        assert!(calculate_address("not-an-addr", 0).is_err());
    }
}
