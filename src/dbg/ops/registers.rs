//! Register operations.

use crate::dbg::{batch_envelope, error_envelope, DbgController};
use crate::error::ToolError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Registers the `set` command accepts, 64-bit names plus their 32/16/8-bit
/// aliases and the common flag bits.
pub const VALID_REGISTERS: &[&str] = &[
    "rax", "rbx", "rcx", "rdx", "rsi", "rdi", "rbp", "rsp", "rip", "r8", "r9", "r10", "r11",
    "r12", "r13", "r14", "r15", "eax", "ebx", "ecx", "edx", "esi", "edi", "ebp", "esp", "eip",
    "ax", "bx", "cx", "dx", "si", "di", "al", "bl", "cl", "dl", "ah", "bh", "ch", "dh",
    "eflags", "cf", "pf", "af", "zf", "sf", "tf", "if", "df", "of",
];

pub fn get_registers(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("r", true, true)
}

pub fn set_register(ctl: &DbgController, name: &str, value: &str) -> Result<Value, ToolError> {
    let name = name.trim().to_ascii_lowercase();
    if !VALID_REGISTERS.contains(&name.as_str()) {
        return Err(ToolError::InvalidParams(format!(
            "unknown register '{name}'"
        )));
    }
    let value = crate::addr::parse_address(value)?;
    ctl.execute_command(&format!("set {name}={value:#x}"), true, true)
}

/// One `set` per entry; an invalid name or value fails its slot only.
pub fn set_registers(
    ctl: &DbgController,
    registers: &BTreeMap<String, String>,
) -> Result<Value, ToolError> {
    if registers.is_empty() {
        return Err(ToolError::InvalidParams(
            "register map must not be empty".to_string(),
        ));
    }
    let mut results = serde_json::Map::new();
    for (name, value) in registers {
        let outcome = match set_register(ctl, name, value) {
            Ok(v) => v,
            Err(ToolError::NotInstalled(msg)) => return Err(ToolError::NotInstalled(msg)),
            Err(e) => error_envelope(&e),
        };
        results.insert(name.clone(), outcome);
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
    fn rejects_unknown_register() {
        let (_tmp, ctl) = controller();
        assert!(set_register(&ctl, "xmm0", "0").is_err());
        assert!(set_register(&ctl, "rax; DebugContinue", "0").is_err());
    }

    #[test]
    fn set_register_builds_canonical_command() {
        let (_tmp, ctl) = controller();
        let envelope = set_register(&ctl, "RIP", "0x401000").unwrap();
        assert_eq!(envelope["command"], "set rip=0x401000");
        let envelope = set_register(&ctl, "eax", "255").unwrap();
        assert_eq!(envelope["command"], "set eax=0xff");
    }

    #[test]
    fn set_registers_is_partial_on_bad_entry() {
        let (_tmp, ctl) = controller();
        let mut regs = BTreeMap::new();
        regs.insert("rax".to_string(), "0x1".to_string());
        regs.insert("bogus".to_string(), "0x2".to_string());
        let envelope = set_registers(&ctl, &regs).unwrap();
        assert_eq!(envelope["status"], "partial");
        assert_eq!(envelope["results"]["bogus"]["status"], "error");
    }
}
