//! Breakpoint operations: software, conditional, hardware, watchpoints,
//! hit counters, and batch set/remove.

use crate::dbg::{batch_envelope, error_envelope, DbgController};
use crate::error::ToolError;
use crate::script::DbgScript;
use serde_json::{Map, Value};

use super::canon_addr;

/// Upper bound on addresses per batch call.
pub const MAX_BATCH_BREAKPOINTS: usize = 1000;

pub fn set_breakpoint(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    ctl.execute_command(&format!("bp {addr}"), true, true)
}

pub fn remove_breakpoint(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    ctl.execute_command(&format!("bpc {addr}"), true, true)
}

pub fn enable_breakpoint(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    ctl.execute_command(&format!("bpe {addr}"), true, true)
}

pub fn disable_breakpoint(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    ctl.execute_command(&format!("bpd {addr}"), true, true)
}

pub fn list_breakpoints(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("bplist", true, true)
}

/// An empty condition degrades to a plain breakpoint.
pub fn set_conditional_breakpoint(
    ctl: &DbgController,
    address: &str,
    condition: &str,
) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    let condition = condition.trim();
    if condition.is_empty() {
        return ctl.execute_command(&format!("bp {addr}"), true, true);
    }
    ctl.execute_command(&format!("bp {addr},{condition}"), true, true)
}

pub fn breakpoint_hit_count(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg breakpoint hit count")
        .bind("addr", format!("{value:#x}"))
        .cap_call(
            "getBreakpointHitCount",
            &["addr"],
            &format!("bphitcount {addr}"),
        )
        .field_str("address", &addr)
        .field("hit_count", "result if isinstance(result, int) else str(result)");
    ctl.execute_script(&script)
}

pub fn reset_breakpoint_hit_count(
    ctl: &DbgController,
    address: &str,
) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg reset breakpoint hit count")
        .bind("addr", format!("{value:#x}"))
        .cap_call(
            "resetBreakpointHitCount",
            &["addr"],
            &format!("bpresethitcount {addr}"),
        )
        .field_str("address", &addr)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

fn hardware_type_code(bp_type: &str) -> Result<u8, ToolError> {
    match bp_type.to_ascii_lowercase().as_str() {
        "execute" | "e" | "x" => Ok(0),
        "write" | "w" => Ok(1),
        "read" | "r" => Ok(2),
        "readwrite" | "rw" => Ok(3),
        other => Err(ToolError::InvalidParams(format!(
            "invalid hardware breakpoint type '{other}' (expected execute, write, read, or readwrite)"
        ))),
    }
}

pub fn set_hardware_breakpoint(
    ctl: &DbgController,
    address: &str,
    bp_type: &str,
    size: u32,
) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let type_code = hardware_type_code(bp_type)?;
    if !matches!(size, 1 | 2 | 4 | 8) {
        return Err(ToolError::InvalidParams(format!(
            "invalid hardware breakpoint size {size} (expected 1, 2, 4, or 8)"
        )));
    }
    let script = DbgScript::new("x64dbg hardware breakpoint")
        .bind("addr", format!("{value:#x}"))
        .stmt(format!("bp_type = {type_code}"))
        .stmt(format!("bp_size = {size}"))
        .cap_call(
            "setHardwareBreakpoint",
            &["addr", "bp_type", "bp_size"],
            &format!("hwbp {addr}, {type_code}, {size}"),
        )
        .field_str("address", &addr)
        .field_str("type", &bp_type.to_ascii_lowercase())
        .field_num("size", size)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn remove_hardware_breakpoint(
    ctl: &DbgController,
    address: &str,
) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    ctl.execute_command(&format!("hwbpdel {addr}"), true, true)
}

/// Watchpoints are hardware breakpoints on data access.
pub fn set_watchpoint(
    ctl: &DbgController,
    address: &str,
    watch_type: &str,
    size: u32,
) -> Result<Value, ToolError> {
    let bp_type = match watch_type.to_ascii_lowercase().as_str() {
        "read" | "r" => "read",
        "write" | "w" => "write",
        "readwrite" | "rw" | "access" => "readwrite",
        other => {
            return Err(ToolError::InvalidParams(format!(
                "invalid watchpoint type '{other}' (expected read, write, or readwrite)"
            )))
        }
    };
    set_hardware_breakpoint(ctl, address, bp_type, size)
}

pub fn remove_watchpoint(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    remove_hardware_breakpoint(ctl, address)
}

fn check_batch(addresses: &[String]) -> Result<(), ToolError> {
    if addresses.is_empty() {
        return Err(ToolError::InvalidParams(
            "address list must not be empty".to_string(),
        ));
    }
    if addresses.len() > MAX_BATCH_BREAKPOINTS {
        return Err(ToolError::InvalidParams(format!(
            "batch of {} exceeds maximum of {MAX_BATCH_BREAKPOINTS} breakpoints",
            addresses.len()
        )));
    }
    Ok(())
}

/// Per-address results; a bad address fails its slot without aborting the rest.
pub fn batch_set_breakpoints(
    ctl: &DbgController,
    addresses: &[String],
) -> Result<Value, ToolError> {
    check_batch(addresses)?;
    let mut results = Map::new();
    for address in addresses {
        let outcome = match set_breakpoint(ctl, address) {
            Ok(v) => v,
            Err(ToolError::NotInstalled(msg)) => return Err(ToolError::NotInstalled(msg)),
            Err(e) => error_envelope(&e),
        };
        results.insert(address.clone(), outcome);
    }
    Ok(batch_envelope(results))
}

pub fn batch_remove_breakpoints(
    ctl: &DbgController,
    addresses: &[String],
) -> Result<Value, ToolError> {
    check_batch(addresses)?;
    let mut results = Map::new();
    for address in addresses {
        let outcome = match remove_breakpoint(ctl, address) {
            Ok(v) => v,
            Err(ToolError::NotInstalled(msg)) => return Err(ToolError::NotInstalled(msg)),
            Err(e) => error_envelope(&e),
        };
        results.insert(address.clone(), outcome);
    }
    Ok(batch_envelope(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbgConfig;

    fn controller() -> (tempfile::TempDir, DbgController) {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        (tmp, DbgController::new(config))
    }

    #[test]
    fn breakpoint_commands_use_canonical_hex() {
        let (_tmp, ctl) = controller();
        let envelope = set_breakpoint(&ctl, "4198400").unwrap();
        assert_eq!(envelope["command"], "bp 0x401000");
        let envelope = remove_breakpoint(&ctl, "0x401000").unwrap();
        assert_eq!(envelope["command"], "bpc 0x401000");
    }

    #[test]
    fn empty_condition_degrades_to_plain_breakpoint() {
        let (_tmp, ctl) = controller();
        let envelope = set_conditional_breakpoint(&ctl, "0x401000", "  ").unwrap();
        assert_eq!(envelope["command"], "bp 0x401000");
        let envelope = set_conditional_breakpoint(&ctl, "0x401000", "eax == 1").unwrap();
        assert_eq!(envelope["command"], "bp 0x401000,eax == 1");
    }

    #[test]
    fn hardware_breakpoint_validates_type_and_size() {
        let (_tmp, ctl) = controller();
        assert!(matches!(
            set_hardware_breakpoint(&ctl, "0x401000", "bogus", 1),
            Err(ToolError::InvalidParams(_))
        ));
        assert!(matches!(
            set_hardware_breakpoint(&ctl, "0x401000", "write", 3),
            Err(ToolError::InvalidParams(_))
        ));
        assert!(set_hardware_breakpoint(&ctl, "0x401000", "rw", 4).is_ok());
    }

    #[test]
    fn watchpoint_maps_to_hardware_type() {
        assert_eq!(hardware_type_code("execute").unwrap(), 0);
        assert_eq!(hardware_type_code("w").unwrap(), 1);
        assert_eq!(hardware_type_code("r").unwrap(), 2);
        assert_eq!(hardware_type_code("rw").unwrap(), 3);
        assert!(hardware_type_code("jump").is_err());
    }

    #[test]
    fn batch_limits_are_enforced() {
        let (_tmp, ctl) = controller();
        let err = batch_set_breakpoints(&ctl, &[]).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));

        let too_many: Vec<String> = (0..1001).map(|i| format!("{i:#x}")).collect();
        let err = batch_set_breakpoints(&ctl, &too_many).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum of 1000"));
    }

    #[test]
    fn batch_reports_partial_on_bad_address() {
        let (_tmp, ctl) = controller();
        let addresses = vec!["0x401000".to_string(), "not-an-address".to_string()];
        let envelope = batch_set_breakpoints(&ctl, &addresses).unwrap();
        assert_eq!(envelope["status"], "partial");
        assert_eq!(envelope["succeeded"], 1);
        assert_eq!(envelope["failed"], 1);
        assert_eq!(envelope["results"]["not-an-address"]["status"], "error");
    }
}
