//! File loading, address arithmetic, script persistence, and named
//! debugger configurations.

use crate::addr;
use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::encode::py_str;
use crate::script::DbgScript;
use serde_json::{json, Value};

use super::canon_addr;

pub const MAX_HISTORY_ENTRIES: usize = 100;
pub const DEFAULT_HISTORY_ENTRIES: usize = 20;

pub fn load_file(ctl: &DbgController, file_path: &str) -> Result<Value, ToolError> {
    let file_path = file_path.trim();
    if file_path.is_empty() {
        return Err(ToolError::InvalidParams(
            "file path must not be empty".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg load file")
        .bind("file_path", py_str(file_path))
        .stmt("import os")
        .stmt("if not os.path.exists(file_path):")
        .stmt("    raise FileNotFoundError(file_path)")
        .cap_call("loadFile", &["file_path"], &format!("init {file_path}"))
        .field("file_path", "file_path")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn save_memory_to_file(
    ctl: &DbgController,
    address: &str,
    size: usize,
    output_file: &str,
) -> Result<Value, ToolError> {
    let output_file = output_file.trim();
    if output_file.is_empty() {
        return Err(ToolError::InvalidParams(
            "output file path must not be empty".to_string(),
        ));
    }
    super::memory::dump_memory(ctl, address, size, Some(output_file))
}

/// Pure address arithmetic; no debugger involved.
pub fn calculate_address(base: &str, offset: i64) -> Result<Value, ToolError> {
    let result = addr::calculate_address(base, offset)?;
    let (_, base) = canon_addr(base)?;
    Ok(json!({
        "status": "success",
        "base_address": base,
        "offset": offset,
        "result_address": format!("{result:#x}"),
        "result_decimal": result,
    }))
}

/// Pure formatting; no debugger involved.
pub fn format_address(address: &str, format_type: &str) -> Result<Value, ToolError> {
    let value = addr::parse_address(address)?;
    Ok(json!({
        "status": "success",
        "address": format!("{value:#x}"),
        "format": format_type,
        "result": addr::format_address(value, format_type),
    }))
}

/// Persist a script body to an explicit path on this host.
pub fn save_script(file_path: &str, content: &str) -> Result<Value, ToolError> {
    let file_path = file_path.trim();
    if file_path.is_empty() {
        return Err(ToolError::InvalidParams(
            "file path must not be empty".to_string(),
        ));
    }
    std::fs::write(file_path, content)
        .map_err(|e| ToolError::ScriptWrite(format!("{file_path}: {e}")))?;
    Ok(json!({
        "status": "success",
        "file_path": file_path,
        "size": content.len(),
    }))
}

pub fn load_script(file_path: &str) -> Result<Value, ToolError> {
    let file_path = file_path.trim();
    if file_path.is_empty() {
        return Err(ToolError::InvalidParams(
            "file path must not be empty".to_string(),
        ));
    }
    let content = std::fs::read_to_string(file_path)?;
    Ok(json!({
        "status": "success",
        "file_path": file_path,
        "size": content.len(),
        "content": content,
    }))
}

/// The most recently generated scripts, newest first.
pub fn script_history(ctl: &DbgController, count: usize) -> Result<Value, ToolError> {
    if count == 0 || count > MAX_HISTORY_ENTRIES {
        return Err(ToolError::InvalidParams(format!(
            "history count {count} out of range (1..={MAX_HISTORY_ENTRIES})"
        )));
    }
    let entries = ctl.store().history(count)?;
    Ok(json!({
        "status": "success",
        "count": entries.len(),
        "directory": ctl.store().dir().display().to_string(),
        "history": entries,
    }))
}

fn check_config_name(name: &str) -> Result<&str, ToolError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::InvalidParams(
            "configuration name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

pub fn save_config(ctl: &DbgController, name: &str) -> Result<Value, ToolError> {
    let name = check_config_name(name)?;
    let script = DbgScript::new("x64dbg save config")
        .bind("name", py_str(name))
        .cap_call("saveConfig", &["name"], &format!("config save, {name}"))
        .field("name", "name")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn load_config(ctl: &DbgController, name: &str) -> Result<Value, ToolError> {
    let name = check_config_name(name)?;
    let script = DbgScript::new("x64dbg load config")
        .bind("name", py_str(name))
        .cap_call("loadConfig", &["name"], &format!("config load, {name}"))
        .field("name", "name")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn list_configs(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg list configs")
        .cap_call("listConfigs", &[], "config list")
        .field("configs", "str(result)");
    ctl.execute_script(&script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbgConfig;
    use crate::script::ScriptKind;

    fn controller() -> (tempfile::TempDir, DbgController) {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        (tmp, DbgController::new(config))
    }

    #[test]
    fn calculate_and_format_need_no_debugger() {
        let envelope = calculate_address("0x401000", 0x20).unwrap();
        assert_eq!(envelope["result_address"], "0x401020");
        assert_eq!(envelope["result_decimal"], 0x401020);

        let envelope = format_address("4198400", "hex").unwrap();
        assert_eq!(envelope["result"], "0x401000");
        assert!(calculate_address("0x0", -1).is_err());
    }

    #[test]
    fn script_round_trips_through_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("saved.py").display().to_string();
        save_script(&path, "print('hi')").unwrap();
        let envelope = load_script(&path).unwrap();
        assert_eq!(envelope["content"], "print('hi')");
    }

    #[test]
    fn history_lists_generated_scripts() {
        let (_tmp, ctl) = controller();
        ctl.store().write(ScriptKind::Command, "print(1)").unwrap();
        ctl.store().write(ScriptKind::Auto, "print(2)").unwrap();
        let envelope = script_history(&ctl, 10).unwrap();
        assert_eq!(envelope["count"], 2);
        assert!(script_history(&ctl, 0).is_err());
        assert!(script_history(&ctl, 101).is_err());
    }

    #[test]
    fn config_name_is_required() {
        let (_tmp, ctl) = controller();
        assert!(save_config(&ctl, " ").is_err());
        assert!(load_config(&ctl, "fuzzing-session").is_ok());
    }
}
