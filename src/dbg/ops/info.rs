//! Read-only inspection: modules, stack, memory map, strings, xrefs,
//! imports, and exports.

use crate::dbg::DbgController;
use crate::error::ToolError;
use serde_json::Value;

use super::canon_addr;

pub const MAX_STACK_ENTRIES: usize = 50;
pub const MAX_CALLSTACK_DEPTH: usize = 100;
pub const DEFAULT_STRING_MIN_LENGTH: usize = 4;

pub fn list_modules(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("mod", true, true)
}

pub fn get_stack(ctl: &DbgController, count: usize) -> Result<Value, ToolError> {
    if count == 0 || count > MAX_STACK_ENTRIES {
        return Err(ToolError::InvalidParams(format!(
            "stack entry count {count} out of range (1..={MAX_STACK_ENTRIES})"
        )));
    }
    ctl.execute_command(&format!("stack {count}"), true, true)
}

pub fn get_call_stack(ctl: &DbgController, depth: usize) -> Result<Value, ToolError> {
    if depth == 0 || depth > MAX_CALLSTACK_DEPTH {
        return Err(ToolError::InvalidParams(format!(
            "call stack depth {depth} out of range (1..={MAX_CALLSTACK_DEPTH})"
        )));
    }
    ctl.execute_command(&format!("callstack {depth}"), true, true)
}

pub fn memory_map(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("mem", true, true)
}

pub fn list_strings(ctl: &DbgController, min_length: usize) -> Result<Value, ToolError> {
    if min_length == 0 || min_length > 100 {
        return Err(ToolError::InvalidParams(format!(
            "minimum string length {min_length} out of range (1..=100)"
        )));
    }
    ctl.execute_command(&format!("strref {min_length}"), true, true)
}

pub fn xrefs(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    ctl.execute_command(&format!("xref {addr}"), true, true)
}

pub fn list_imports(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("imp", true, true)
}

pub fn list_exports(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("exp", true, true)
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
    fn stack_count_bounds() {
        let (_tmp, ctl) = controller();
        assert!(get_stack(&ctl, 0).is_err());
        assert!(get_stack(&ctl, 51).is_err());
        assert_eq!(get_stack(&ctl, 16).unwrap()["command"], "stack 16");
    }

    #[test]
    fn xrefs_canonicalizes_address() {
        let (_tmp, ctl) = controller();
        assert_eq!(xrefs(&ctl, "4198400").unwrap()["command"], "xref 0x401000");
    }
}
