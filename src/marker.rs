//! Result marker protocol.
//!
//! Every script this server renders reports its outcome by printing a single
//! line of the form `MCP_RESULT:{...}` on each exit path. The plugin side is
//! not under our control and may interleave the marker with arbitrary debugger
//! chatter, so extraction degrades gracefully instead of raising:
//!
//! 1. scan the captured text for every `MCP_RESULT:` marker,
//! 2. take the **last** one (later markers override provisional ones),
//! 3. decode strictly as JSON, then once more with `'` swapped for `"`
//!    (older plugin builds print Python dict literals),
//! 4. if nothing decodes, return the raw output under a degraded envelope.

use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

/// Literal token a script prints in front of its result mapping.
pub const MARKER: &str = "MCP_RESULT:";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"MCP_RESULT:\s*\{").expect("valid marker regex"))
}

/// Extract a brace-balanced mapping literal starting at `text`'s first `{`.
///
/// Tracks single- and double-quoted strings so braces inside values do not
/// terminate the scan early. Returns `None` when the braces never balance.
fn balanced_mapping(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn decode_mapping(literal: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(literal) {
        return Some(map);
    }
    // Repair pass for Python dict literals: swap quote styles and retry.
    let repaired = literal.replace('\'', "\"");
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parse captured script output into a result envelope.
///
/// Never fails: when no marker decodes, the envelope is
/// `status: success` with the full text under `raw_output`.
pub fn parse_script_result(output: &str) -> Value {
    let mut last: Option<Map<String, Value>> = None;
    for m in marker_regex().find_iter(output) {
        if let Some(literal) = balanced_mapping(&output[m.start()..]) {
            if let Some(map) = decode_mapping(literal) {
                last = Some(map);
            }
        }
    }
    match last {
        Some(map) => Value::Object(map),
        None => json!({
            "status": "success",
            "raw_output": output,
            "message": "script completed but no structured result was found",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{balanced_mapping, parse_script_result, MARKER};
    use serde_json::{json, Value};

    #[test]
    fn round_trips_scalar_mappings() {
        let m = json!({"status": "success", "count": 3, "ok": true, "ratio": 0.5, "cmd": "bp 0x401000"});
        let line = format!("{MARKER}{}", serde_json::to_string(&m).unwrap());
        assert_eq!(parse_script_result(&line), m);
    }

    #[test]
    fn last_marker_wins() {
        let output = "MCP_RESULT:{\"status\": \"pending\", \"step\": 1}\n\
                      some debugger chatter\n\
                      MCP_RESULT:{\"status\": \"success\", \"step\": 2}\n";
        let result = parse_script_result(output);
        assert_eq!(result["status"], "success");
        assert_eq!(result["step"], 2);
    }

    #[test]
    fn no_marker_degrades_to_raw_output() {
        let output = "INFO: breakpoint at 00401000\nDone.";
        let result = parse_script_result(output);
        assert_eq!(result["status"], "success");
        assert_eq!(result["raw_output"], output);
        assert!(result["message"]
            .as_str()
            .unwrap()
            .contains("no structured result"));
    }

    #[test]
    fn repairs_python_dict_literals() {
        let output = "MCP_RESULT:{'status': 'success', 'address': '0x401000'}";
        let result = parse_script_result(output);
        assert_eq!(result["status"], "success");
        assert_eq!(result["address"], "0x401000");
    }

    #[test]
    fn undecodable_marker_degrades_instead_of_raising() {
        let output = "MCP_RESULT:{not json at all";
        let result = parse_script_result(output);
        assert_eq!(result["status"], "success");
        assert_eq!(result["raw_output"], output);
    }

    #[test]
    fn nested_mappings_survive_extraction() {
        let output = r#"MCP_RESULT:{"status": "success", "data": {"is_debugging": true, "pid": 1234}}"#;
        let result = parse_script_result(output);
        assert_eq!(result["data"]["pid"], 1234);
    }

    #[test]
    fn braces_inside_strings_do_not_terminate_scan() {
        let literal = balanced_mapping(r#"{"msg": "weird { value }", "n": 1} trailing"#).unwrap();
        let parsed: Value = serde_json::from_str(literal).unwrap();
        assert_eq!(parsed["n"], 1);
    }

    #[test]
    fn marker_spans_newlines() {
        let output = "MCP_RESULT:{\"status\": \"success\",\n \"lines\": 2}";
        let result = parse_script_result(output);
        assert_eq!(result["lines"], 2);
    }
}
