//! x64dbg installation discovery.
//!
//! The server needs two paths: the x64dbg executable (for the rarely used
//! direct-subprocess path) and the plugin directory (where generated scripts
//! are dropped for the Python plugin to pick up). Both come from environment
//! overrides or a fixed list of common install locations; when neither
//! resolves, every operation short-circuits on the installation guard
//! instead of crashing.

use crate::error::ToolError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment override for the x64dbg executable path.
pub const ENV_X64DBG_PATH: &str = "X64DBG_PATH";
/// Environment override for the plugin directory.
pub const ENV_PLUGIN_DIR: &str = "X64DBG_PLUGIN_DIR";

const COMMON_INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\x64dbg\release\x64\x64dbg.exe",
    r"C:\x64dbg\release\x64\x64dbg.exe",
    r"D:\x64dbg\release\x64\x64dbg.exe",
];

/// Resolved (or unresolved) debugger installation paths.
#[derive(Debug, Clone, Default)]
pub struct DbgConfig {
    pub x64dbg_path: Option<PathBuf>,
    pub plugin_dir: Option<PathBuf>,
}

impl DbgConfig {
    /// Build a config from explicit paths. Used by tests and the CLI.
    pub fn with_paths(x64dbg_path: impl Into<PathBuf>, plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            x64dbg_path: Some(x64dbg_path.into()),
            plugin_dir: Some(plugin_dir.into()),
        }
    }

    /// Detect an installation: env overrides first, then common locations.
    pub fn detect() -> Self {
        let mut exe = std::env::var_os(ENV_X64DBG_PATH)
            .map(PathBuf::from)
            .filter(|p| p.is_file());

        if exe.is_none() {
            exe = COMMON_INSTALL_PATHS
                .iter()
                .map(PathBuf::from)
                .chain(home_install_path())
                .find(|p| p.is_file());
        }

        let plugin_dir = std::env::var_os(ENV_PLUGIN_DIR)
            .map(PathBuf::from)
            .filter(|p| p.is_dir())
            .or_else(|| {
                exe.as_deref()
                    .and_then(Path::parent)
                    .map(|dir| dir.join("plugins"))
            });

        match &exe {
            Some(path) => debug!(path = %path.display(), "x64dbg installation found"),
            None => debug!("no x64dbg installation found"),
        }

        Self {
            x64dbg_path: exe,
            plugin_dir,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.x64dbg_path.is_some()
    }

    /// Installation guard: the pre-flight check every operation runs before
    /// touching the filesystem.
    pub fn ensure_installed(&self) -> Result<&Path, ToolError> {
        self.x64dbg_path
            .as_deref()
            .ok_or_else(|| ToolError::NotInstalled(Self::remediation().to_string()))
    }

    /// Multi-line remediation text for the NOT_INSTALLED envelope.
    pub fn remediation() -> &'static str {
        "x64dbg was not found in any of the common install locations.\n\
         To fix this:\n\
         1. Install x64dbg from https://x64dbg.com\n\
         2. Set the X64DBG_PATH environment variable to the full path of x64dbg.exe\n\
            (and optionally X64DBG_PLUGIN_DIR to the plugins directory)\n\
         3. Restart the MCP server"
    }
}

fn home_install_path() -> Option<PathBuf> {
    let home = std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME"))?;
    Some(
        PathBuf::from(home)
            .join("x64dbg")
            .join("release")
            .join("x64")
            .join("x64dbg.exe"),
    )
}

#[cfg(test)]
mod tests {
    use super::DbgConfig;
    use crate::error::ToolError;

    #[test]
    fn guard_rejects_unconfigured_install() {
        let config = DbgConfig::default();
        match config.ensure_installed() {
            Err(ToolError::NotInstalled(msg)) => assert!(msg.contains("X64DBG_PATH")),
            other => panic!("expected NotInstalled, got {other:?}"),
        }
    }

    #[test]
    fn guard_passes_with_explicit_paths() {
        let config = DbgConfig::with_paths("/opt/x64dbg/x64dbg.exe", "/opt/x64dbg/plugins");
        assert!(config.is_installed());
        assert!(config.ensure_installed().is_ok());
    }
}
