//! MCP tool request types.
//!
//! These structs define the parameters for each MCP tool exposed by the server.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmptyParams {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteCommandRequest {
    #[schemars(description = "x64dbg command to run, e.g. 'bp 0x401000' or 'r'")]
    #[serde(alias = "cmd")]
    pub command: String,
    #[schemars(
        description = "If true (default), generate an auto-execute script the plugin picks up; \
        if false, generate a script to load manually via File -> Script -> Load"
    )]
    pub auto_execute: Option<bool>,
    #[schemars(description = "Parse the MCP_RESULT marker from the script output (default: true)")]
    pub parse_result: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteCommandDirectRequest {
    #[schemars(description = "x64dbg command to run via the CLI (-script)")]
    #[serde(alias = "cmd")]
    pub command: String,
    #[schemars(description = "Parse the MCP_RESULT marker from captured stdout (default: true)")]
    pub parse_result: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToolCatalogRequest {
    #[schemars(description = "Search query describing what you want to do")]
    pub query: Option<String>,
    #[schemars(description = "Category to list tools from (e.g. 'breakpoints', 'memory')")]
    pub category: Option<String>,
    #[schemars(description = "Maximum results (default: 7, max: 15)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToolHelpRequest {
    #[schemars(description = "Tool name to get documentation for")]
    #[serde(alias = "tool")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddressRequest {
    #[schemars(description = "Address, hex (0x-prefixed) or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConditionalBreakpointRequest {
    #[schemars(description = "Breakpoint address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Break condition in x64dbg expression syntax, e.g. 'eax == 1'. Empty sets a plain breakpoint")]
    pub condition: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HardwareBreakpointRequest {
    #[schemars(description = "Breakpoint address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Breakpoint type: execute, write, read, or readwrite (default: execute)")]
    #[serde(alias = "type")]
    pub bp_type: Option<String>,
    #[schemars(description = "Watched size in bytes: 1, 2, 4, or 8 (default: 1)")]
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WatchpointRequest {
    #[schemars(description = "Watched address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Access type: read, write, or readwrite (default: readwrite)")]
    #[serde(alias = "type")]
    pub watch_type: Option<String>,
    #[schemars(description = "Watched size in bytes: 1, 2, 4, or 8 (default: 4)")]
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BatchAddressesRequest {
    #[schemars(description = "List of addresses, hex or decimal (max 1000)")]
    #[serde(alias = "addrs")]
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadMemoryRequest {
    #[schemars(description = "Address to read from, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Bytes to read (1-4096, default: 64)")]
    pub size: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteMemoryRequest {
    #[schemars(description = "Address to write to, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Hex byte string, separators tolerated, e.g. '90 90 0xCC'")]
    #[serde(alias = "bytes")]
    pub data: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchMemoryRequest {
    #[schemars(description = "Byte pattern to search for (hex, ?? wildcards supported)")]
    pub pattern: String,
    #[schemars(description = "Optional search range start (applies only with end)")]
    pub start: Option<String>,
    #[schemars(description = "Optional search range end (applies only with start)")]
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DumpMemoryRequest {
    #[schemars(description = "Region start address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Region size in bytes")]
    pub size: usize,
    #[schemars(description = "Output file path on the debugger host (default: dump_<addr>_<size>.bin in the script directory)")]
    #[serde(alias = "file")]
    pub output_file: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MemoryProtectionRequest {
    #[schemars(description = "Region start address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Region size in bytes")]
    pub size: usize,
    #[schemars(description = "New protection: R, RW, X, RX, RWX, or NONE")]
    pub protection: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompareMemoryRequest {
    #[schemars(description = "First region address")]
    #[serde(alias = "addr1")]
    pub address1: String,
    #[schemars(description = "Second region address")]
    #[serde(alias = "addr2")]
    pub address2: String,
    #[schemars(description = "Bytes to compare")]
    pub size: usize,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FillMemoryRequest {
    #[schemars(description = "Region start address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Bytes to fill")]
    pub size: usize,
    #[schemars(description = "Fill byte value (0-255, default: 0x90 NOP)")]
    pub value: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AllocateMemoryRequest {
    #[schemars(description = "Allocation size in bytes (max 100 MB)")]
    pub size: usize,
    #[schemars(description = "Protection: R, RW, X, RX, RWX, or NONE (default: RWX)")]
    pub protection: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BatchReadMemoryRequest {
    #[schemars(description = "Addresses to read from (max 100)")]
    #[serde(alias = "addrs")]
    pub addresses: Vec<String>,
    #[schemars(description = "Per-address read sizes; must match addresses in length (default: 64 each)")]
    pub sizes: Option<Vec<usize>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetRegisterRequest {
    #[schemars(description = "Register name, e.g. 'rax', 'eip', 'zf'")]
    #[serde(alias = "register")]
    pub name: String,
    #[schemars(description = "New value, hex or decimal")]
    pub value: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetRegistersRequest {
    #[schemars(description = "Map of register name to value, e.g. {\"rax\": \"0x1\"}")]
    pub registers: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ThreadRequest {
    #[schemars(description = "Thread id")]
    #[serde(alias = "tid")]
    pub thread_id: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AttachProcessRequest {
    #[schemars(description = "Process id to attach to")]
    pub pid: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CountRequest {
    #[schemars(description = "Number of entries to return")]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CallStackRequest {
    #[schemars(description = "Maximum stack frames to walk (1-100, default: 20)")]
    pub depth: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListStringsRequest {
    #[schemars(description = "Minimum string length (1-100, default: 4)")]
    pub min_length: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DisassembleRequest {
    #[schemars(description = "Address to disassemble at, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Number of instructions (1-100, default: 10)")]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResolveSymbolRequest {
    #[schemars(description = "Symbol name, e.g. 'kernel32.LoadLibraryA'")]
    #[serde(alias = "name")]
    pub symbol: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ViewStructureRequest {
    #[schemars(description = "Structure base address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Structure name: PEB and TEB are decoded field by field, other names go to the debugger's struct viewer")]
    #[serde(alias = "type")]
    pub structure_type: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EvaluateExpressionRequest {
    #[schemars(description = "Expression in x64dbg syntax, e.g. '[rsp+8]'")]
    #[serde(alias = "expr")]
    pub expression: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommentsRequest {
    #[schemars(description = "Optional address to list comments at")]
    #[serde(alias = "addr")]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ApplyPatchRequest {
    #[schemars(description = "Patch address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Patch bytes as hex string, separators tolerated")]
    #[serde(alias = "bytes")]
    pub data: String,
    #[schemars(description = "Optional patch description")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InjectCodeRequest {
    #[schemars(description = "Target address; omitted to allocate a fresh buffer")]
    #[serde(alias = "addr")]
    pub address: Option<String>,
    #[schemars(description = "Shellcode bytes as hex string")]
    #[serde(alias = "code")]
    pub shellcode: String,
    #[schemars(description = "Start a thread at the injected code (default: false)")]
    pub create_thread: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InjectDllRequest {
    #[schemars(description = "DLL path on the debugger host")]
    #[serde(alias = "path")]
    pub dll_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EjectDllRequest {
    #[schemars(description = "Module name of the DLL to unload, e.g. 'monitor.dll'")]
    #[serde(alias = "name")]
    pub dll_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BypassAntidebugRequest {
    #[schemars(description = "Technique: all, peb, ntquery, or debugport (default: all)")]
    pub method: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExceptionHandlerRequest {
    #[schemars(description = "Exception code, e.g. 0xC0000005 as decimal 3221225477")]
    #[serde(alias = "code")]
    pub exception_code: u32,
    #[schemars(description = "Action: ignore, handle, or log")]
    pub action: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CaptureOutputRequest {
    #[schemars(description = "x64dbg command to run with output capture")]
    #[serde(alias = "cmd")]
    pub command: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddBookmarkRequest {
    #[schemars(description = "Bookmark address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Bookmark name (default: the address string)")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GotoBookmarkRequest {
    #[schemars(description = "Bookmark name to resolve")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoadFileRequest {
    #[schemars(description = "Executable path on the debugger host")]
    #[serde(alias = "path")]
    pub file_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveMemoryToFileRequest {
    #[schemars(description = "Region start address, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Region size in bytes")]
    pub size: usize,
    #[schemars(description = "Output file path on the debugger host")]
    #[serde(alias = "file")]
    pub output_file: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CalculateAddressRequest {
    #[schemars(description = "Base address, hex or decimal")]
    #[serde(alias = "address", alias = "addr")]
    pub base: String,
    #[schemars(description = "Signed offset to add")]
    pub offset: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FormatAddressRequest {
    #[schemars(description = "Address to format, hex or decimal")]
    #[serde(alias = "addr")]
    pub address: String,
    #[schemars(description = "Output format: hex, decimal, octal, or binary (default: hex)")]
    #[serde(alias = "format")]
    pub format_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveScriptRequest {
    #[schemars(description = "Destination path for the script")]
    #[serde(alias = "path")]
    pub file_path: String,
    #[schemars(description = "Script body to save")]
    pub content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoadScriptRequest {
    #[schemars(description = "Script path to read")]
    #[serde(alias = "path")]
    pub file_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConfigNameRequest {
    #[schemars(description = "Configuration name")]
    pub name: String,
}
