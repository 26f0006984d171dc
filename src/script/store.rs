//! Script file materialization.
//!
//! Rendered scripts land in `<plugin_dir>/mcp_temp`; when that directory
//! cannot be created the store falls back to the OS temp directory with a
//! single warning. File names carry the process id (the plugin-side
//! consumer convention) plus a monotonically increasing sequence number so
//! concurrent calls within one process never clobber each other's file.

use crate::error::ToolError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::UNIX_EPOCH;
use tracing::warn;

const TEMP_SUBDIR: &str = "mcp_temp";

/// Which flavor of script a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Plain command script, loaded manually in x64dbg.
    Command,
    /// Auto-execute wrapper script.
    Auto,
}

impl ScriptKind {
    fn prefix(self) -> &'static str {
        match self {
            ScriptKind::Command => "mcp_cmd",
            ScriptKind::Auto => "mcp_auto",
        }
    }
}

/// One entry of the on-disk script history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub file: String,
    pub path: String,
    /// Modification time, seconds since the Unix epoch.
    pub modified: u64,
}

/// Owns the temp script directory and hands out collision-free paths.
#[derive(Debug)]
pub struct ScriptStore {
    dir: PathBuf,
}

impl ScriptStore {
    /// Resolve and create the script directory.
    ///
    /// Prefers `<plugin_dir>/mcp_temp`; falls back to the OS temp directory
    /// when the plugin dir is unknown or the subdirectory cannot be created.
    pub fn new(plugin_dir: Option<&Path>) -> Self {
        let preferred = plugin_dir
            .map(|d| d.join(TEMP_SUBDIR))
            .unwrap_or_else(|| std::env::temp_dir().join(TEMP_SUBDIR));
        let dir = match std::fs::create_dir_all(&preferred) {
            Ok(()) => preferred,
            Err(e) => {
                warn!(
                    dir = %preferred.display(),
                    error = %e,
                    "cannot create script directory, falling back to OS temp dir"
                );
                std::env::temp_dir()
            }
        };
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the next script path without writing anything.
    ///
    /// Auto-execute wrappers embed a reserved command-script path as their
    /// file-drop fallback target, so reservation and writing are separate.
    pub fn reserve_path(&self, kind: ScriptKind) -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(1);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            "{}_{}_{}.py",
            kind.prefix(),
            std::process::id(),
            seq
        ))
    }

    /// Write script content to a fresh path and return it.
    pub fn write(&self, kind: ScriptKind, content: &str) -> Result<PathBuf, ToolError> {
        let path = self.reserve_path(kind);
        std::fs::write(&path, content)
            .map_err(|e| ToolError::ScriptWrite(format!("{}: {e}", path.display())))?;
        Ok(path)
    }

    /// Default output path for memory dumps.
    pub fn dump_path(&self, address: u64, size: usize) -> PathBuf {
        self.dir.join(format!("dump_{address:x}_{size}.bin"))
    }

    /// The newest `count` scripts in the directory, most recent first.
    pub fn history(&self, count: usize) -> Result<Vec<HistoryEntry>, ToolError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("py") {
                continue;
            }
            let modified = entry
                .metadata()?
                .modified()?
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            entries.push(HistoryEntry {
                file: entry.file_name().to_string_lossy().into_owned(),
                path: path.display().to_string(),
                modified,
            });
        }
        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(b.file.cmp(&a.file)));
        entries.truncate(count);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptKind, ScriptStore};

    #[test]
    fn creates_subdir_under_plugin_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScriptStore::new(Some(tmp.path()));
        assert_eq!(store.dir(), tmp.path().join("mcp_temp"));
        assert!(store.dir().is_dir());
    }

    #[test]
    fn falls_back_when_plugin_dir_is_unwritable() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("plugins");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = ScriptStore::new(Some(&blocker));
        assert_eq!(store.dir(), std::env::temp_dir());
    }

    #[test]
    fn sequential_paths_never_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScriptStore::new(Some(tmp.path()));
        let a = store.reserve_path(ScriptKind::Command);
        let b = store.reserve_path(ScriptKind::Command);
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("mcp_cmd_{}_", std::process::id())));
        assert!(name.ends_with(".py"));
    }

    #[test]
    fn writes_and_lists_history() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScriptStore::new(Some(tmp.path()));
        let p1 = store.write(ScriptKind::Command, "print(1)").unwrap();
        let p2 = store.write(ScriptKind::Auto, "print(2)").unwrap();
        assert!(p1.is_file());
        assert!(p2.is_file());
        let history = store.history(10).unwrap();
        assert_eq!(history.len(), 2);
        let history = store.history(1).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn dump_path_encodes_address_and_size() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScriptStore::new(Some(tmp.path()));
        let p = store.dump_path(0x401000, 256);
        assert!(p.to_string_lossy().ends_with("dump_401000_256.bin"));
    }
}
