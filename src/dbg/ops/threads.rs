//! Thread operations.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::DbgScript;
use serde_json::Value;

pub fn list_threads(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("thread", true, true)
}

pub fn switch_thread(ctl: &DbgController, thread_id: u32) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg switch thread")
        .bind("tid", thread_id.to_string())
        .cap_call("switchThread", &["tid"], &format!("switchthread {thread_id}"))
        .field_num("thread_id", thread_id)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn suspend_thread(ctl: &DbgController, thread_id: u32) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg suspend thread")
        .bind("tid", thread_id.to_string())
        .cap_call(
            "suspendThread",
            &["tid"],
            &format!("suspendthread {thread_id}"),
        )
        .field_num("thread_id", thread_id)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn resume_thread(ctl: &DbgController, thread_id: u32) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg resume thread")
        .bind("tid", thread_id.to_string())
        .cap_call(
            "resumeThread",
            &["tid"],
            &format!("resumethread {thread_id}"),
        )
        .field_num("thread_id", thread_id)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn thread_context(ctl: &DbgController, thread_id: u32) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg thread context")
        .bind("tid", thread_id.to_string())
        .cap_call(
            "getThreadContext",
            &["tid"],
            &format!("threadcontext {thread_id}"),
        )
        .field_num("thread_id", thread_id)
        .field("context", "str(result)");
    ctl.execute_script(&script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbgConfig;

    #[test]
    fn capability_scripts_carry_thread_id() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        let ctl = DbgController::new(config);

        let envelope = switch_thread(&ctl, 4242).unwrap();
        assert_eq!(envelope["status"], "success");

        let files: Vec<_> = std::fs::read_dir(tmp.path().join("mcp_temp"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(files.len(), 1);
        let content = std::fs::read_to_string(files[0].path()).unwrap();
        assert!(content.contains("switchThread"));
        assert!(content.contains("switchthread 4242"));
    }
}
