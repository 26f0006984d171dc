//! Address bookmarks.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::encode::py_str;
use crate::script::DbgScript;
use serde_json::Value;

use super::canon_addr;

/// An empty name defaults to the canonical address string.
pub fn add_bookmark(ctl: &DbgController, address: &str, name: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let name = name.trim();
    let name = if name.is_empty() { addr.as_str() } else { name };
    let script = DbgScript::new("x64dbg add bookmark")
        .bind("addr", format!("{value:#x}"))
        .bind("name", py_str(name))
        .cap_call("setBookmark", &["addr", "name"], &format!("bookmarkset {addr}"))
        .field_str("address", &addr)
        .field("name", "name")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn remove_bookmark(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg remove bookmark")
        .bind("addr", format!("{value:#x}"))
        .cap_call("removeBookmark", &["addr"], &format!("bookmarkdel {addr}"))
        .field_str("address", &addr)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn list_bookmarks(ctl: &DbgController) -> Result<Value, ToolError> {
    let script = DbgScript::new("x64dbg list bookmarks")
        .cap_call("getBookmarks", &[], "bookmarklist")
        .field("bookmarks", "str(result)");
    ctl.execute_script(&script)
}

pub fn goto_bookmark(ctl: &DbgController, name: &str) -> Result<Value, ToolError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::InvalidParams(
            "bookmark name must not be empty".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg goto bookmark")
        .bind("name", py_str(name))
        .cap_call("getBookmarkAddress", &["name"], &format!("disasm {name}"))
        .field("name", "name")
        .field(
            "address",
            "hex(result) if isinstance(result, int) else str(result)",
        );
    ctl.execute_script(&script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbgConfig;

    #[test]
    fn empty_name_defaults_to_address() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        let ctl = DbgController::new(config);
        add_bookmark(&ctl, "0x401000", "  ").unwrap();
        let files: Vec<_> = std::fs::read_dir(tmp.path().join("mcp_temp"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        let content = std::fs::read_to_string(files[0].path()).unwrap();
        assert!(content.contains("name = '0x401000'"));
        assert!(goto_bookmark(&ctl, "").is_err());
    }
}
