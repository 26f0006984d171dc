//! Binary modification: patches, code injection, and DLL inject/eject.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::encode::{clean_hex, py_str};
use crate::script::DbgScript;
use serde_json::Value;

use super::canon_addr;

pub fn apply_patch(
    ctl: &DbgController,
    address: &str,
    data: &str,
    description: &str,
) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let hex = clean_hex(data)?;
    let script = DbgScript::new("x64dbg apply patch")
        .bind("addr", format!("{value:#x}"))
        .stmt(format!("patch_data = bytes.fromhex('{hex}')"))
        .bind("description", py_str(description.trim()))
        .stmt("if hasattr(dbg, 'setPatch'):")
        .stmt("    result = dbg.setPatch(addr, patch_data, description)")
        .stmt("else:")
        .stmt("    dbg.write(addr, patch_data)")
        .stmt("    result = 'patched'")
        .field_str("address", &addr)
        .field_str("bytes", &hex)
        .field("description", "description")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn remove_patch(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg remove patch")
        .bind("addr", format!("{value:#x}"))
        .cap_call("removePatch", &["addr"], &format!("patchdel {addr}"))
        .field_str("address", &addr)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn list_patches(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("patchlist", true, true)
}

/// Write shellcode into the target. Without an address the script allocates
/// a buffer first; with `create_thread` it spins up a thread at the entry.
pub fn inject_code(
    ctl: &DbgController,
    address: Option<&str>,
    shellcode: &str,
    create_thread: bool,
) -> Result<Value, ToolError> {
    let hex = clean_hex(shellcode)?;
    let mut script = DbgScript::new("x64dbg inject code")
        .stmt(format!("code = bytes.fromhex('{hex}')"));
    script = match address {
        Some(address) => {
            let (value, _) = canon_addr(address)?;
            script.bind("addr", format!("{value:#x}"))
        }
        None => script.stmt("addr = dbg.malloc(len(code))"),
    };
    script = script.stmt("dbg.write(addr, code)");
    if create_thread {
        script = script
            .stmt("thread_id = dbg.createThread(addr)")
            .field("thread_id", "thread_id")
            .field("executed", "True");
    } else {
        script = script
            .field("executed", "False")
            .field_str("note", "code written; point RIP at it or inject with create_thread");
    }
    let script = script
        .field("address", "hex(addr)")
        .field("size", "len(code)");
    ctl.execute_script(&script)
}

pub fn inject_dll(ctl: &DbgController, dll_path: &str) -> Result<Value, ToolError> {
    let dll_path = dll_path.trim();
    if dll_path.is_empty() {
        return Err(ToolError::InvalidParams(
            "DLL path must not be empty".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg inject dll")
        .bind("dll_path", py_str(dll_path))
        .stmt("if hasattr(dbg, 'injectDLL'):")
        .stmt("    result = dbg.injectDLL(dll_path)")
        .stmt("else:")
        .stmt("    load_library = dbg.getAddressFromSymbol('kernel32.LoadLibraryA')")
        .stmt("    path_bytes = dll_path.encode('utf-8') + b'\\x00'")
        .stmt("    path_addr = dbg.malloc(len(path_bytes))")
        .stmt("    dbg.write(path_addr, path_bytes)")
        .stmt("    result = dbg.createThread(load_library, path_addr)")
        .field("dll_path", "dll_path")
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn eject_dll(ctl: &DbgController, dll_name: &str) -> Result<Value, ToolError> {
    let dll_name = dll_name.trim();
    if dll_name.is_empty() {
        return Err(ToolError::InvalidParams(
            "DLL name must not be empty".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg eject dll")
        .bind("dll_name", py_str(dll_name))
        .stmt("module_base = dbg.getModuleBase(dll_name)")
        .stmt("if not module_base:")
        .stmt("    raise RuntimeError('module not found: ' + dll_name)")
        .stmt("free_library = dbg.getAddressFromSymbol('kernel32.FreeLibrary')")
        .stmt("result = dbg.createThread(free_library, module_base)")
        .field("dll_name", "dll_name")
        .field("module_base", "hex(module_base)")
        .field("result", "str(result)");
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

    fn only_script(dir: &std::path::Path) -> String {
        let files: Vec<_> = std::fs::read_dir(dir.join("mcp_temp"))
            .unwrap()
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect();
        assert_eq!(files.len(), 1);
        std::fs::read_to_string(&files[0]).unwrap()
    }

    #[test]
    fn patch_rejects_bad_hex_before_io() {
        let (tmp, ctl) = controller();
        assert!(apply_patch(&ctl, "0x401000", "0xZZ", "").is_err());
        assert!(std::fs::read_dir(tmp.path().join("mcp_temp"))
            .unwrap()
            .next()
            .is_none());
    }

    #[test]
    fn patch_embeds_normalized_bytes() {
        let (tmp, ctl) = controller();
        apply_patch(&ctl, "0x401000", "90 90 CC", "nop out check").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains("bytes.fromhex('9090cc')"));
        assert!(script.contains("setPatch"));
        assert!(script.contains("'nop out check'"));
    }

    #[test]
    fn inject_code_allocates_when_no_address_given() {
        let (tmp, ctl) = controller();
        inject_code(&ctl, None, "cc", true).unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains("addr = dbg.malloc(len(code))"));
        assert!(script.contains("dbg.createThread(addr)"));
    }

    #[test]
    fn dll_path_is_escaped() {
        let (tmp, ctl) = controller();
        inject_dll(&ctl, r"C:\evil\payload.dll").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains(r"dll_path = 'C:\\evil\\payload.dll'"));
        assert!(inject_dll(&ctl, "  ").is_err());
    }
}
