//! Anti-debug bypasses, exception handling, and log capture.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::encode::py_str;
use crate::script::DbgScript;
use serde_json::Value;

pub const MAX_LOG_LINES: usize = 10_000;
pub const DEFAULT_LOG_LINES: usize = 100;

/// Patch the common anti-debug tells. `method` selects one technique or
/// `all`; the marker reports per-technique outcomes.
pub fn bypass_antidebug(ctl: &DbgController, method: &str) -> Result<Value, ToolError> {
    let method = method.trim().to_ascii_lowercase();
    if !matches!(method.as_str(), "all" | "peb" | "ntquery" | "debugport") {
        return Err(ToolError::InvalidParams(format!(
            "unknown bypass method '{method}' (expected all, peb, ntquery, or debugport)"
        )));
    }
    let all = method == "all";
    let mut script = DbgScript::new("x64dbg anti-debug bypass")
        .stmt("results = {}")
        .stmt("peb = dbg.getPEB() if hasattr(dbg, 'getPEB') else None");
    if all || method == "peb" {
        script = script
            .stmt("if peb:")
            .stmt("    dbg.write(peb + 0x02, b'\\x00')")
            .stmt("    results['peb_being_debugged'] = 'cleared'")
            .stmt("else:")
            .stmt("    results['peb_being_debugged'] = 'peb unavailable'");
    }
    if all || method == "ntquery" {
        script = script
            .stmt("if hasattr(dbg, 'hookNtQueryInformationProcess'):")
            .stmt("    dbg.hookNtQueryInformationProcess()")
            .stmt("    results['ntquery'] = 'hooked'")
            .stmt("else:")
            .stmt("    results['ntquery'] = 'hook capability unavailable'");
    }
    if all || method == "debugport" {
        script = script
            .stmt("if peb:")
            .stmt("    dbg.write(peb + 0xbc, b'\\x00\\x00\\x00\\x00')")
            .stmt("    results['nt_global_flag'] = 'cleared'")
            .stmt("else:")
            .stmt("    results['nt_global_flag'] = 'peb unavailable'");
    }
    let script = script
        .field_str("method", &method)
        .field("results", "results");
    ctl.execute_script(&script)
}

pub fn set_exception_handler(
    ctl: &DbgController,
    exception_code: u32,
    action: &str,
) -> Result<Value, ToolError> {
    let action = action.trim().to_ascii_lowercase();
    if !matches!(action.as_str(), "ignore" | "handle" | "log") {
        return Err(ToolError::InvalidParams(format!(
            "unknown exception action '{action}' (expected ignore, handle, or log)"
        )));
    }
    let script = DbgScript::new("x64dbg exception handler")
        .bind("code", format!("{exception_code:#x}"))
        .bind("action", py_str(&action))
        .cap_call(
            "setExceptionHandler",
            &["code", "action"],
            &format!("SetExceptionBPX {exception_code:#x}"),
        )
        .field_num("exception_code", exception_code)
        .field("action", "action")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn exception_info(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg exception info")
        .cap_call("getLastException", &[], "exinfo")
        .field("exception", "str(result)");
    ctl.execute_script(&script)
}

pub fn debugger_logs(ctl: &DbgController, count: usize) -> Result<Value, ToolError> {
    if count == 0 || count > MAX_LOG_LINES {
        return Err(ToolError::InvalidParams(format!(
            "log line count {count} out of range (1..={MAX_LOG_LINES})"
        )));
    }
    let script = DbgScript::new("x64dbg log tail")
        .bind("count", count.to_string())
        .cap_call("getLogs", &["count"], "LogSave")
        .field_num("count", count)
        .field("logs", "str(result)");
    ctl.execute_script(&script)
}

/// Run a command with output capture and marker parsing forced on.
pub fn capture_output(ctl: &DbgController, command: &str) -> Result<Value, ToolError> {
    ctl.execute_command(command, true, true)
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

    fn only_script(dir: &std::path::Path) -> String {
        let files: Vec<_> = std::fs::read_dir(dir.join("mcp_temp"))
            .unwrap()
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect();
        assert_eq!(files.len(), 1);
        std::fs::read_to_string(&files[0]).unwrap()
    }

    #[test]
    fn bypass_method_is_validated() {
        let (_tmp, ctl) = controller();
        assert!(bypass_antidebug(&ctl, "rootkit").is_err());
    }

    #[test]
    fn peb_bypass_clears_being_debugged() {
        let (tmp, ctl) = controller();
        bypass_antidebug(&ctl, "peb").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains("dbg.write(peb + 0x02"));
        assert!(!script.contains("nt_global_flag"));
    }

    #[test]
    fn all_includes_every_technique() {
        let (tmp, ctl) = controller();
        bypass_antidebug(&ctl, "all").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains("peb_being_debugged"));
        assert!(script.contains("ntquery"));
        assert!(script.contains("nt_global_flag"));
    }

    #[test]
    fn exception_action_is_validated() {
        let (_tmp, ctl) = controller();
        assert!(set_exception_handler(&ctl, 0xC0000005, "explode").is_err());
        assert!(set_exception_handler(&ctl, 0xC0000005, "ignore").is_ok());
    }
}
