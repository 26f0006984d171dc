//! Process attach/detach and debugger status.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::DbgScript;
use serde_json::Value;

pub fn debugger_status(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg debugger status")
        .bind("debugging", "dbg.isDebugging() if hasattr(dbg, 'isDebugging') else None")
        .bind("running", "dbg.isRunning() if hasattr(dbg, 'isRunning') else None")
        .bind("pid", "dbg.getProcessId() if hasattr(dbg, 'getProcessId') else None")
        .bind("tid", "dbg.getThreadId() if hasattr(dbg, 'getThreadId') else None")
        .bind(
            "cip",
            "hex(dbg.getCurrentAddress()) if debugging and hasattr(dbg, 'getCurrentAddress') else None",
        )
        .field("is_debugging", "debugging")
        .field("is_running", "running")
        .field("current_pid", "pid")
        .field("current_tid", "tid")
        .field("current_address", "cip");
    ctl.execute_script(&script)
}

pub fn attach_process(ctl: &DbgController, pid: u32) -> Result<Value, ToolError> {
    if pid == 0 {
        return Err(ToolError::InvalidParams(
            "pid must be greater than zero".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg attach")
        .bind("pid", pid.to_string())
        .cap_call("attachProcess", &["pid"], &format!("attach {pid}"))
        .field_num("pid", pid)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn detach_process(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("detach", true, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbgConfig;

    #[test]
    fn attach_rejects_pid_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        let ctl = DbgController::new(config);
        assert!(attach_process(&ctl, 0).is_err());
        assert!(attach_process(&ctl, 1234).is_ok());
    }
}
