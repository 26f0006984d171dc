//! Execution control: stepping, run/pause, tracing, and profiling.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::DbgScript;
use serde_json::Value;

pub const MAX_TRACE_RECORDS: usize = 10_000;
pub const DEFAULT_TRACE_RECORDS: usize = 100;

pub fn step_over(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("stepover", true, true)
}

pub fn step_into(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("stepinto", true, true)
}

pub fn run(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("run", true, true)
}

pub fn pause(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("pause", true, true)
}

pub fn start_trace(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg start trace")
        .cap_call("startTrace", &[], "TraceIntoConditional 0")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn stop_trace(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg stop trace")
        .cap_call("stopTrace", &[], "StopTrace")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn trace_records(ctl: &DbgController, count: usize) -> Result<Value, ToolError> {
    if count == 0 || count > MAX_TRACE_RECORDS {
        return Err(ToolError::InvalidParams(format!(
            "trace record count {count} out of range (1..={MAX_TRACE_RECORDS})"
        )));
    }
    let script = DbgScript::new("x64dbg trace records")
        .bind("count", count.to_string())
        .cap_call("getTraceRecords", &["count"], &format!("tracelist {count}"))
        .field_num("count", count)
        .field("records", "str(result)");
    ctl.execute_script(&script)
}

pub fn start_profiling(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg start profiling")
        .cap_call("startProfiling", &[], "profile start")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn stop_profiling(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg stop profiling")
        .cap_call("stopProfiling", &[], "profile stop")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn profiling_results(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg profiling results")
        .cap_call("getProfilingResults", &[], "profile results")
        .field("results", "str(result)");
    ctl.execute_script(&script)
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
    fn stepping_uses_command_path() {
        let (_tmp, ctl) = controller();
        assert_eq!(step_over(&ctl).unwrap()["command"], "stepover");
        assert_eq!(step_into(&ctl).unwrap()["command"], "stepinto");
        assert_eq!(run(&ctl).unwrap()["command"], "run");
        assert_eq!(pause(&ctl).unwrap()["command"], "pause");
    }

    #[test]
    fn trace_record_count_bounds() {
        let (_tmp, ctl) = controller();
        assert!(trace_records(&ctl, 0).is_err());
        assert!(trace_records(&ctl, 10_001).is_err());
        assert!(trace_records(&ctl, 10_000).is_ok());
    }
}
