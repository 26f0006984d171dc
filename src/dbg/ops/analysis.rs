//! Analysis: disassembly, symbols, structures, expressions, functions,
//! labels, and comments.

use crate::dbg::DbgController;
use crate::error::ToolError;
use crate::script::encode::py_str;
use crate::script::DbgScript;
use serde_json::Value;

use super::canon_addr;

pub const MAX_DISASM_COUNT: usize = 100;

pub fn disassemble(ctl: &DbgController, address: &str, count: usize) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    if count == 0 || count > MAX_DISASM_COUNT {
        return Err(ToolError::InvalidParams(format!(
            "instruction count {count} out of range (1..={MAX_DISASM_COUNT})"
        )));
    }
    ctl.execute_command(&format!("disasm {addr} {count}"), true, true)
}

pub fn resolve_symbol(ctl: &DbgController, symbol: &str) -> Result<Value, ToolError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ToolError::InvalidParams(
            "symbol name must not be empty".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg resolve symbol")
        .bind("symbol", py_str(symbol))
        .cap_call(
            "getAddressFromSymbol",
            &["symbol"],
            &format!("? {symbol}"),
        )
        .field("symbol", "symbol")
        .field(
            "address",
            "hex(result) if isinstance(result, int) else str(result)",
        );
    ctl.execute_script(&script)
}

/// Known structure layouts: field name, offset, read size in bytes.
/// Offsets are the 64-bit layouts.
fn structure_fields(structure: &str) -> Option<&'static [(&'static str, u64, u8)]> {
    const PEB: &[(&str, u64, u8)] = &[
        ("InheritedAddressSpace", 0x00, 1),
        ("ReadImageFileExecOptions", 0x01, 1),
        ("BeingDebugged", 0x02, 1),
        ("ImageBaseAddress", 0x10, 8),
        ("Ldr", 0x18, 8),
        ("ProcessParameters", 0x20, 8),
        ("ProcessHeap", 0x30, 8),
        ("NtGlobalFlag", 0xbc, 4),
    ];
    const TEB: &[(&str, u64, u8)] = &[
        ("ExceptionList", 0x00, 8),
        ("StackBase", 0x08, 8),
        ("StackLimit", 0x10, 8),
        ("ProcessEnvironmentBlock", 0x60, 8),
        ("LastErrorValue", 0x68, 4),
        ("ClientId_ProcessId", 0x40, 8),
        ("ClientId_ThreadId", 0x48, 8),
    ];
    match structure.to_ascii_uppercase().as_str() {
        "PEB" => Some(PEB),
        "TEB" => Some(TEB),
        _ => None,
    }
}

fn reader_for(size: u8) -> &'static str {
    match size {
        1 => "readByte",
        2 => "readWord",
        4 => "readDword",
        _ => "readQword",
    }
}

/// Render field tables for known structures (PEB, TEB); anything else is
/// handed to the debugger's own struct viewer.
pub fn view_structure(
    ctl: &DbgController,
    address: &str,
    structure_type: &str,
) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let structure_type = structure_type.trim();
    let Some(fields) = structure_fields(structure_type) else {
        if structure_type.is_empty() {
            return Err(ToolError::InvalidParams(
                "structure type must not be empty".to_string(),
            ));
        }
        return ctl.execute_command(&format!("struct {addr}, {structure_type}"), true, true);
    };

    let mut script = DbgScript::new("x64dbg structure view")
        .bind("base", format!("{value:#x}"))
        .stmt("fields = {}");
    for (name, offset, size) in fields {
        let reader = reader_for(*size);
        script = script.stmt(format!(
            "fields['{name}'] = {{'offset': {offset:#x}, 'address': hex(base + {offset:#x}), 'value': hex(dbg.{reader}(base + {offset:#x})), 'size': {size}}}"
        ));
    }
    let script = script
        .field_str("structure", &structure_type.to_ascii_uppercase())
        .field_str("address", &addr)
        .field("fields", "fields");
    ctl.execute_script(&script)
}

pub fn evaluate_expression(ctl: &DbgController, expression: &str) -> Result<Value, ToolError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(ToolError::InvalidParams(
            "expression must not be empty".to_string(),
        ));
    }
    let script = DbgScript::new("x64dbg evaluate expression")
        .bind("expression", py_str(expression))
        .cap_call(
            "evaluateExpression",
            &["expression"],
            &format!("? {expression}"),
        )
        .field("expression", "expression")
        .field(
            "result",
            "hex(result) if isinstance(result, int) else str(result)",
        );
    ctl.execute_script(&script)
}

pub fn list_functions(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("functionlist", true, true)
}

pub fn list_labels(ctl: &DbgController) -> Result<Value, ToolError> {
    ctl.execute_command("labellist", true, true)
}

pub fn get_comments(ctl: &DbgController, address: Option<&str>) -> Result<Value, ToolError> {
    match address {
        Some(address) => {
            let (_, addr) = canon_addr(address)?;
            ctl.execute_command(&format!("commentlist {addr}"), true, true)
        }
        None => ctl.execute_command("commentlist", true, true),
    }
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
    fn disasm_count_bounds() {
        let (_tmp, ctl) = controller();
        assert!(disassemble(&ctl, "0x401000", 0).is_err());
        assert!(disassemble(&ctl, "0x401000", 101).is_err());
        assert_eq!(
            disassemble(&ctl, "0x401000", 10).unwrap()["command"],
            "disasm 0x401000 10"
        );
    }

    #[test]
    fn peb_view_reads_being_debugged_flag() {
        let (tmp, ctl) = controller();
        view_structure(&ctl, "0x7ffd0000", "peb").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains("fields['BeingDebugged']"));
        assert!(script.contains("dbg.readByte(base + 0x2)"));
        assert!(script.contains("'structure': 'PEB'"));
    }

    #[test]
    fn unknown_structure_falls_back_to_struct_command() {
        let (_tmp, ctl) = controller();
        let envelope = view_structure(&ctl, "0x401000", "IMAGE_DOS_HEADER").unwrap();
        assert_eq!(envelope["command"], "struct 0x401000, IMAGE_DOS_HEADER");
    }

    #[test]
    fn symbol_and_expression_are_escaped() {
        let (tmp, ctl) = controller();
        resolve_symbol(&ctl, "kernel32.LoadLibraryA").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains("symbol = 'kernel32.LoadLibraryA'"));
        assert!(script.contains("getAddressFromSymbol"));

        let (tmp, ctl) = controller();
        evaluate_expression(&ctl, "it's").unwrap();
        let script = only_script(tmp.path());
        assert!(script.contains(r"expression = 'it\'s'"));
    }
}
