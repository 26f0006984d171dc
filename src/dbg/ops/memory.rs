//! Memory operations: read/write, search, dump, protection, compare, fill,
//! allocation, region info, and batch reads.

use crate::dbg::{batch_envelope, error_envelope, DbgController};
use crate::error::ToolError;
use crate::script::encode::{clean_hex, py_str};
use crate::script::DbgScript;
use serde_json::{Map, Value};

use super::canon_addr;

pub const MAX_READ_SIZE: usize = 4096;
pub const MAX_BATCH_READS: usize = 100;
pub const MAX_ALLOC_SIZE: usize = 100 * 1024 * 1024;
pub const DEFAULT_READ_SIZE: usize = 64;

fn check_read_size(size: usize) -> Result<(), ToolError> {
    if size == 0 || size > MAX_READ_SIZE {
        return Err(ToolError::InvalidParams(format!(
            "read size {size} out of range (1..={MAX_READ_SIZE})"
        )));
    }
    Ok(())
}

fn check_positive_size(size: usize) -> Result<(), ToolError> {
    if size == 0 {
        return Err(ToolError::InvalidParams(
            "size must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub fn read_memory(ctl: &DbgController, address: &str, size: usize) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    check_read_size(size)?;
    ctl.execute_command(&format!("dump {addr} {size}"), true, true)
}

pub fn write_memory(ctl: &DbgController, address: &str, data: &str) -> Result<Value, ToolError> {
    let (_, addr) = canon_addr(address)?;
    let hex = clean_hex(data)?;
    ctl.execute_command(&format!("write {addr} {hex}"), true, true)
}

/// `start` and `end` bound the search only when both are given.
pub fn search_memory(
    ctl: &DbgController,
    pattern: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Value, ToolError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(ToolError::InvalidParams(
            "search pattern must not be empty".to_string(),
        ));
    }
    let command = match (start, end) {
        (Some(start), Some(end)) => {
            let (start_value, start) = canon_addr(start)?;
            let (end_value, _) = canon_addr(end)?;
            let range = end_value.saturating_sub(start_value);
            format!("findmem {start}, {pattern}, {range:#x}")
        }
        _ => format!("findmem 0, {pattern}"),
    };
    ctl.execute_command(&command, true, true)
}

/// Dump a region to a file on the debugger host. Without `output_file` the
/// dump lands next to the generated scripts.
pub fn dump_memory(
    ctl: &DbgController,
    address: &str,
    size: usize,
    output_file: Option<&str>,
) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    check_positive_size(size)?;
    let path = match output_file {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => ctl.store().dump_path(value, size).display().to_string(),
    };
    let script = DbgScript::new("x64dbg memory dump")
        .bind("addr", format!("{value:#x}"))
        .bind("size", size.to_string())
        .bind("out_path", py_str(&path))
        .stmt("data = dbg.read(addr, size)")
        .stmt("with open(out_path, 'wb') as f:")
        .stmt("    f.write(data)")
        .field_str("address", &addr)
        .field_num("size", size)
        .field("output_file", "out_path")
        .field("bytes_written", "len(data)");
    ctl.execute_script(&script)
}

fn protection_constant(protection: &str) -> Option<&'static str> {
    match protection.to_ascii_uppercase().as_str() {
        "R" | "READ" => Some("PAGE_READONLY"),
        "W" | "WRITE" | "RW" | "READWRITE" => Some("PAGE_READWRITE"),
        "X" | "EXECUTE" => Some("PAGE_EXECUTE"),
        "RX" | "READEXECUTE" => Some("PAGE_EXECUTE_READ"),
        "RWX" | "ALL" => Some("PAGE_EXECUTE_READWRITE"),
        "NONE" | "NOACCESS" => Some("PAGE_NOACCESS"),
        _ => None,
    }
}

pub fn set_memory_protection(
    ctl: &DbgController,
    address: &str,
    size: usize,
    protection: &str,
) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    check_positive_size(size)?;
    let constant = protection_constant(protection).ok_or_else(|| {
        ToolError::InvalidParams(format!(
            "unknown protection '{protection}' (expected R, RW, X, RX, RWX, or NONE)"
        ))
    })?;
    let script = DbgScript::new("x64dbg set memory protection")
        .bind("addr", format!("{value:#x}"))
        .bind("size", size.to_string())
        .bind("protection", py_str(constant))
        .cap_call(
            "setMemoryProtection",
            &["addr", "size", "protection"],
            &format!("setpagerights {addr}, {constant}"),
        )
        .field_str("address", &addr)
        .field_num("size", size)
        .field_str("protection", constant)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn get_memory_protection(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg get memory protection")
        .bind("addr", format!("{value:#x}"))
        .cap_call(
            "getMemoryProtection",
            &["addr"],
            &format!("getpagerights {addr}"),
        )
        .field_str("address", &addr)
        .field("protection", "str(result)");
    ctl.execute_script(&script)
}

/// Byte-wise comparison; the marker carries at most 100 differences.
pub fn compare_memory(
    ctl: &DbgController,
    address1: &str,
    address2: &str,
    size: usize,
) -> Result<Value, ToolError> {
    let (value1, addr1) = canon_addr(address1)?;
    let (value2, addr2) = canon_addr(address2)?;
    check_positive_size(size)?;
    let script = DbgScript::new("x64dbg memory compare")
        .bind("addr1", format!("{value1:#x}"))
        .bind("addr2", format!("{value2:#x}"))
        .bind("size", size.to_string())
        .stmt("mem1 = dbg.read(addr1, size)")
        .stmt("mem2 = dbg.read(addr2, size)")
        .stmt("differences = []")
        .stmt("for i in range(size):")
        .stmt("    if mem1[i] != mem2[i]:")
        .stmt("        differences.append({'offset': i, 'value1': mem1[i], 'value2': mem2[i]})")
        .field_str("address1", &addr1)
        .field_str("address2", &addr2)
        .field_num("size", size)
        .field("identical", "len(differences) == 0")
        .field("difference_count", "len(differences)")
        .field("differences", "differences[:100]");
    ctl.execute_script(&script)
}

pub fn fill_memory(
    ctl: &DbgController,
    address: &str,
    size: usize,
    value: u32,
) -> Result<Value, ToolError> {
    let (addr_value, addr) = canon_addr(address)?;
    check_positive_size(size)?;
    if value > 255 {
        return Err(ToolError::InvalidParams(format!(
            "fill value {value} out of range (0..=255)"
        )));
    }
    let script = DbgScript::new("x64dbg memory fill")
        .bind("addr", format!("{addr_value:#x}"))
        .bind("size", size.to_string())
        .bind("fill_value", value.to_string())
        .stmt("dbg.write(addr, bytes([fill_value]) * size)")
        .field_str("address", &addr)
        .field_num("size", size)
        .field_num("value", value);
    ctl.execute_script(&script)
}

pub fn allocate_memory(
    ctl: &DbgController,
    size: usize,
    protection: &str,
) -> Result<Value, ToolError> {
    if size == 0 || size > MAX_ALLOC_SIZE {
        return Err(ToolError::InvalidParams(format!(
            "allocation size {size} out of range (1..={MAX_ALLOC_SIZE})"
        )));
    }
    let constant = protection_constant(protection).ok_or_else(|| {
        ToolError::InvalidParams(format!(
            "unknown protection '{protection}' (expected R, RW, X, RX, RWX, or NONE)"
        ))
    })?;
    let script = DbgScript::new("x64dbg memory alloc")
        .bind("size", size.to_string())
        .bind("protection", py_str(constant))
        .cap_call("malloc", &["size"], &format!("alloc {size:#x}"))
        .stmt("if hasattr(dbg, 'setMemoryProtection') and isinstance(result, int):")
        .stmt("    dbg.setMemoryProtection(result, size, protection)")
        .field_num("size", size)
        .field_str("protection", constant)
        .field(
            "address",
            "hex(result) if isinstance(result, int) else str(result)",
        );
    ctl.execute_script(&script)
}

pub fn free_memory(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg memory free")
        .bind("addr", format!("{value:#x}"))
        .cap_call("free", &["addr"], &format!("free {addr}"))
        .field_str("address", &addr)
        .field("result", "str(result)");
    ctl.execute_script(&script)
}

pub fn memory_region_info(ctl: &DbgController, address: &str) -> Result<Value, ToolError> {
    let (value, addr) = canon_addr(address)?;
    let script = DbgScript::new("x64dbg memory region info")
        .bind("addr", format!("{value:#x}"))
        .cap_call(
            "getMemoryRegionInfo",
            &["addr"],
            &format!("meminfo {addr}"),
        )
        .field_str("address", &addr)
        .field("region", "str(result)");
    ctl.execute_script(&script)
}

/// One read per address; `sizes`, when given, must match `addresses` in
/// length, otherwise every read uses [`DEFAULT_READ_SIZE`].
pub fn batch_read_memory(
    ctl: &DbgController,
    addresses: &[String],
    sizes: Option<&[usize]>,
) -> Result<Value, ToolError> {
    if addresses.is_empty() {
        return Err(ToolError::InvalidParams(
            "address list must not be empty".to_string(),
        ));
    }
    if addresses.len() > MAX_BATCH_READS {
        return Err(ToolError::InvalidParams(format!(
            "batch of {} exceeds maximum of {MAX_BATCH_READS} reads",
            addresses.len()
        )));
    }
    if let Some(sizes) = sizes {
        if sizes.len() != addresses.len() {
            return Err(ToolError::InvalidParams(format!(
                "sizes length {} does not match addresses length {}",
                sizes.len(),
                addresses.len()
            )));
        }
    }

    let mut results = Map::new();
    for (i, address) in addresses.iter().enumerate() {
        let size = sizes.map_or(DEFAULT_READ_SIZE, |s| s[i]);
        let outcome = match read_memory(ctl, address, size) {
            Ok(v) => v,
            Err(ToolError::NotInstalled(msg)) => return Err(ToolError::NotInstalled(msg)),
            Err(e) => error_envelope(&e),
        };
        results.insert(address.clone(), outcome);
    }
    Ok(batch_envelope(results))
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
    fn read_size_bounds() {
        let (_tmp, ctl) = controller();
        assert!(read_memory(&ctl, "0x401000", 0).is_err());
        assert!(read_memory(&ctl, "0x401000", 4097).is_err());
        let envelope = read_memory(&ctl, "0x401000", 4096).unwrap();
        assert_eq!(envelope["command"], "dump 0x401000 4096");
    }

    #[test]
    fn write_normalizes_hex() {
        let (_tmp, ctl) = controller();
        let envelope = write_memory(&ctl, "0x401000", "90 90 0xCC").unwrap();
        assert_eq!(envelope["command"], "write 0x401000 9090cc");
        assert!(write_memory(&ctl, "0x401000", "bad!").is_err());
    }

    #[test]
    fn fill_value_checked_before_any_file() {
        let (tmp, ctl) = controller();
        let err = fill_memory(&ctl, "0x401000", 16, 256).unwrap_err();
        assert!(err.to_string().contains("0..=255"));
        let files: Vec<_> = std::fs::read_dir(tmp.path().join("mcp_temp"))
            .unwrap()
            .collect();
        assert!(files.is_empty());
    }

    #[test]
    fn allocation_size_capped_at_100_mib() {
        let (_tmp, ctl) = controller();
        assert!(allocate_memory(&ctl, 0, "RWX").is_err());
        assert!(allocate_memory(&ctl, 100 * 1024 * 1024 + 1, "RWX").is_err());
        assert!(allocate_memory(&ctl, 4096, "RWX").is_ok());
        assert!(allocate_memory(&ctl, 4096, "SECRET").is_err());
    }

    #[test]
    fn protection_names_map_to_page_constants() {
        assert_eq!(protection_constant("rw").unwrap(), "PAGE_READWRITE");
        assert_eq!(protection_constant("RWX").unwrap(), "PAGE_EXECUTE_READWRITE");
        assert_eq!(protection_constant("none").unwrap(), "PAGE_NOACCESS");
        assert!(protection_constant("wat").is_none());
    }

    #[test]
    fn batch_read_validates_sizes_length() {
        let (_tmp, ctl) = controller();
        let addresses = vec!["0x1000".to_string(), "0x2000".to_string()];
        let err = batch_read_memory(&ctl, &addresses, Some(&[8])).unwrap_err();
        assert!(err.to_string().contains("does not match"));

        let too_many: Vec<String> = (0..101).map(|i| format!("{i:#x}")).collect();
        let err = batch_read_memory(&ctl, &too_many, None).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum of 100"));

        let envelope = batch_read_memory(&ctl, &addresses, Some(&[8, 16])).unwrap();
        assert_eq!(envelope["status"], "success");
        assert_eq!(envelope["total"], 2);
    }

    #[test]
    fn dump_defaults_to_store_path() {
        let (tmp, ctl) = controller();
        let envelope = dump_memory(&ctl, "0x401000", 256, None).unwrap();
        assert_eq!(envelope["status"], "success");
        let files: Vec<_> = std::fs::read_dir(tmp.path().join("mcp_temp"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(files.len(), 1);
        let content = std::fs::read_to_string(files[0].path()).unwrap();
        assert!(content.contains("dump_401000_256.bin"));
    }
}
