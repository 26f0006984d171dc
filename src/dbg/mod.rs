//! Command dispatch facade.
//!
//! Every catalog operation funnels through [`DbgController`]. The controller
//! never executes debugger operations itself: it renders a script, writes it
//! to the script store, and returns an envelope describing what was dropped.
//! "Auto execute" refers to the *generated script* probing for the plugin
//! runtime when x64dbg loads it, not to this process invoking the debugger.
//! Whether x64dbg ever consumes a written file is not observed here; the
//! contract is fire-and-forget.

pub mod ops;

use crate::config::DbgConfig;
use crate::error::ToolError;
use crate::marker;
use crate::script::{template, DbgScript, ScriptKind, ScriptStore};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

/// Timeout for the rarely used direct-subprocess path.
const DIRECT_TIMEOUT_SECS: u64 = 10;

pub struct DbgController {
    config: DbgConfig,
    store: ScriptStore,
}

impl DbgController {
    /// Build a controller from explicit configuration. No global state;
    /// tests construct isolated instances freely.
    pub fn new(config: DbgConfig) -> Self {
        let store = ScriptStore::new(config.plugin_dir.as_deref());
        Self { config, store }
    }

    pub fn config(&self) -> &DbgConfig {
        &self.config
    }

    pub fn store(&self) -> &ScriptStore {
        &self.store
    }

    /// Render and materialize a command script.
    ///
    /// With `auto_execute` the script carries the capability probe and
    /// file-drop fallback; otherwise it is a plain script the user loads
    /// manually. Nothing is executed from this process either way.
    pub fn execute_command(
        &self,
        command: &str,
        auto_execute: bool,
        parse_result: bool,
    ) -> Result<Value, ToolError> {
        self.config.ensure_installed()?;
        let command = command.trim();
        if command.is_empty() {
            return Err(ToolError::InvalidParams(
                "command must not be empty".to_string(),
            ));
        }

        if auto_execute {
            let fallback = self.store.reserve_path(ScriptKind::Command);
            let script = template::auto_command_script(command, &fallback);
            let path = self.store.write(ScriptKind::Auto, &script)?;
            debug!(path = %path.display(), command, "auto-execute script written");
            Ok(json!({
                "status": "success",
                "command": command,
                "script_file": path.display().to_string(),
                "parse_result_enabled": parse_result,
                "message": "auto-execute script created; x64dbg runs it when the plugin picks it up",
            }))
        } else {
            let script = template::command_script(command);
            let path = self.store.write(ScriptKind::Command, &script)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(path = %path.display(), command, "command script written");
            Ok(json!({
                "status": "success",
                "command": command,
                "script_file": path.display().to_string(),
                "parse_result_enabled": parse_result,
                "message": format!(
                    "command script created: {command}. Load it in x64dbg via File -> Script -> Load -> {file_name}"
                ),
            }))
        }
    }

    /// Materialize a capability script behind the auto-execute wrapper.
    pub fn execute_script(&self, script: &DbgScript) -> Result<Value, ToolError> {
        self.config.ensure_installed()?;
        let fallback = self.store.reserve_path(ScriptKind::Command);
        let wrapped = template::auto_wrap(&script.render(), &fallback);
        let path = self.store.write(ScriptKind::Auto, &wrapped)?;
        debug!(path = %path.display(), "capability script written");
        Ok(json!({
            "status": "success",
            "script_file": path.display().to_string(),
            "message": "auto-execute script created; x64dbg runs it when the plugin picks it up",
        }))
    }

    /// Run `x64dbg -script <command>` directly and capture its output.
    ///
    /// The only blocking external interaction in the system; enforces a
    /// fixed timeout and reports it distinctly from other failures. When
    /// `parse_result` is set, captured stdout goes through the marker
    /// parser.
    pub async fn execute_command_direct(
        &self,
        command: &str,
        parse_result: bool,
    ) -> Result<Value, ToolError> {
        let exe = self.config.ensure_installed()?;
        let command = command.trim();
        if command.is_empty() {
            return Err(ToolError::InvalidParams(
                "command must not be empty".to_string(),
            ));
        }

        let output = tokio::time::timeout(
            Duration::from_secs(DIRECT_TIMEOUT_SECS),
            tokio::process::Command::new(exe)
                .arg("-script")
                .arg(command)
                .output(),
        )
        .await
        .map_err(|_| ToolError::Timeout(DIRECT_TIMEOUT_SECS))??;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let mut envelope = json!({
            "status": "success",
            "command": command,
            "output": stdout,
            "error": stderr,
        });
        if parse_result {
            envelope["parsed"] = marker::parse_script_result(&stdout);
        }
        Ok(envelope)
    }
}

/// Aggregate per-item results of a batch operation.
///
/// `partial` when at least one item failed; there is no rollback, partial
/// application is expected and must stay visible.
pub(crate) fn batch_envelope(results: Map<String, Value>) -> Value {
    let total = results.len();
    let succeeded = results
        .values()
        .filter(|v| v.get("status").and_then(Value::as_str) == Some("success"))
        .count();
    let failed = total - succeeded;
    json!({
        "status": if failed == 0 { "success" } else { "partial" },
        "total": total,
        "succeeded": succeeded,
        "failed": failed,
        "results": results,
    })
}

/// Envelope for an operation that failed without reaching dispatch.
pub(crate) fn error_envelope(err: &ToolError) -> Value {
    json!({ "status": "error", "message": err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::{batch_envelope, DbgController};
    use crate::config::DbgConfig;
    use crate::error::ToolError;
    use serde_json::{json, Map};

    fn installed_controller() -> (tempfile::TempDir, DbgController) {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        (tmp, DbgController::new(config))
    }

    fn uninstalled_controller() -> (tempfile::TempDir, DbgController) {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig {
            x64dbg_path: None,
            plugin_dir: Some(tmp.path().to_path_buf()),
        };
        (tmp, DbgController::new(config))
    }

    fn script_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(dir.join("mcp_temp"))
            .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
            .unwrap_or_default()
    }

    #[test]
    fn plain_path_writes_command_script() {
        let (tmp, ctl) = installed_controller();
        let envelope = ctl.execute_command("bp 0x401000", false, true).unwrap();
        assert_eq!(envelope["status"], "success");
        let files = script_files(tmp.path());
        assert_eq!(files.len(), 1);
        let content = std::fs::read_to_string(&files[0]).unwrap();
        assert!(content.contains("bp 0x401000"));
    }

    #[test]
    fn auto_path_embeds_fallback_file() {
        let (tmp, ctl) = installed_controller();
        let envelope = ctl.execute_command("r", true, true).unwrap();
        assert_eq!(envelope["status"], "success");
        let files = script_files(tmp.path());
        assert_eq!(files.len(), 1);
        let content = std::fs::read_to_string(&files[0]).unwrap();
        assert!(content.contains("mcp_cmd_"));
        assert!(content.contains("'pending'"));
    }

    #[test]
    fn empty_command_is_rejected_before_io() {
        let (tmp, ctl) = installed_controller();
        let err = ctl.execute_command("   ", true, true).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
        assert!(script_files(tmp.path()).is_empty());
    }

    #[test]
    fn installation_guard_creates_zero_files() {
        let (tmp, ctl) = uninstalled_controller();
        let err = ctl.execute_command("bp 0x401000", true, true).unwrap_err();
        assert!(matches!(err, ToolError::NotInstalled(_)));
        assert!(script_files(tmp.path()).is_empty());
    }

    #[test]
    fn batch_envelope_reports_partial() {
        let mut results = Map::new();
        results.insert("0x1".to_string(), json!({"status": "success"}));
        results.insert("0x2".to_string(), json!({"status": "error", "message": "nope"}));
        let envelope = batch_envelope(results);
        assert_eq!(envelope["status"], "partial");
        assert_eq!(envelope["total"], 2);
        assert_eq!(envelope["succeeded"], 1);
        assert_eq!(envelope["failed"], 1);

        let mut all_good = Map::new();
        all_good.insert("0x1".to_string(), json!({"status": "success"}));
        assert_eq!(batch_envelope(all_good)["status"], "success");
    }
}
