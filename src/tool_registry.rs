//! Tool registry for dynamic tool discovery.
//!
//! All tools are exposed in tools/list by default to support MCP clients that
//! only register tools at connection time. `tool_catalog` is still recommended
//! for discovery.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tool category for grouping related tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Raw command dispatch and discovery (always available)
    Core,
    /// Software/hardware breakpoints and watchpoints
    Breakpoints,
    /// Memory read/write/search/protection
    Memory,
    /// CPU register access
    Registers,
    /// Thread enumeration and control
    Threads,
    /// Attach/detach and debugger state
    Process,
    /// Stepping, run/pause, tracing, profiling
    DebugControl,
    /// Modules, stack, memory map, strings, imports/exports
    Information,
    /// Disassembly, symbols, structures, expressions
    Analysis,
    /// Patching and code/DLL injection
    Editing,
    /// Anti-debug bypass and exception handling
    Advanced,
    /// Address bookmarks
    Bookmarks,
    /// File loading, address math, script persistence
    Utility,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Breakpoints => "breakpoints",
            Self::Memory => "memory",
            Self::Registers => "registers",
            Self::Threads => "threads",
            Self::Process => "process",
            Self::DebugControl => "debug_control",
            Self::Information => "information",
            Self::Analysis => "analysis",
            Self::Editing => "editing",
            Self::Advanced => "advanced",
            Self::Bookmarks => "bookmarks",
            Self::Utility => "utility",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Core => "Raw x64dbg command dispatch and tool discovery",
            Self::Breakpoints => "Set, remove, and manage breakpoints and watchpoints",
            Self::Memory => "Read, write, search, dump, and protect memory",
            Self::Registers => "Read and modify CPU registers",
            Self::Threads => "List, switch, suspend, and resume threads",
            Self::Process => "Attach, detach, and query debugger state",
            Self::DebugControl => "Step, run, pause, trace, and profile execution",
            Self::Information => "Modules, stack, memory map, strings, imports, exports",
            Self::Analysis => "Disassembly, symbols, structures, and expressions",
            Self::Editing => "Patch bytes and inject code or DLLs",
            Self::Advanced => "Anti-debug bypasses, exceptions, and log capture",
            Self::Bookmarks => "Named address bookmarks",
            Self::Utility => "File loading, address math, and script persistence",
        }
    }

    pub fn all() -> &'static [ToolCategory] {
        &[
            Self::Core,
            Self::Breakpoints,
            Self::Memory,
            Self::Registers,
            Self::Threads,
            Self::Process,
            Self::DebugControl,
            Self::Information,
            Self::Analysis,
            Self::Editing,
            Self::Advanced,
            Self::Bookmarks,
            Self::Utility,
        ]
    }
}

impl FromStr for ToolCategory {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "core" => Ok(Self::Core),
            "breakpoints" | "breakpoint" | "bp" => Ok(Self::Breakpoints),
            "memory" | "mem" => Ok(Self::Memory),
            "registers" | "register" | "regs" => Ok(Self::Registers),
            "threads" | "thread" => Ok(Self::Threads),
            "process" | "proc" => Ok(Self::Process),
            "debug_control" | "debugcontrol" | "control" | "stepping" => Ok(Self::DebugControl),
            "information" | "info" => Ok(Self::Information),
            "analysis" | "analyze" | "disasm" => Ok(Self::Analysis),
            "editing" | "edit" | "patching" => Ok(Self::Editing),
            "advanced" | "antidebug" => Ok(Self::Advanced),
            "bookmarks" | "bookmark" => Ok(Self::Bookmarks),
            "utility" | "util" | "misc" => Ok(Self::Utility),
            _ => Err(()),
        }
    }
}

/// Metadata for a single tool
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub category: ToolCategory,
    /// Short description (1 line, <100 chars) - used in tool_catalog results
    pub short_desc: &'static str,
    /// Full description with usage details - used in tool_help
    pub full_desc: &'static str,
    /// Example invocation (JSON)
    pub example: &'static str,
    /// Whether this tool is in the default (core) set
    pub default: bool,
    /// Keywords for semantic search
    pub keywords: &'static [&'static str],
}

/// Static registry of all tools
pub static TOOL_REGISTRY: &[ToolInfo] = &[
    // === CORE ===
    ToolInfo {
        name: "execute_command",
        category: ToolCategory::Core,
        short_desc: "Run any x64dbg command via a generated script",
        full_desc: "Run an arbitrary x64dbg command. The command is rendered into a Python \
                    script for the x64dbg scripting plugin and dropped into the shared script \
                    directory; the plugin picks it up and runs it inside the debugger. \
                    With auto_execute=false the script must be loaded manually via \
                    File -> Script -> Load. The script prints an MCP_RESULT marker with the \
                    command output. This is the escape hatch when no dedicated tool fits.",
        example: r#"{"command": "bp 0x401000", "auto_execute": true}"#,
        default: true,
        keywords: &["command", "execute", "run", "dbgcmd", "raw", "script"],
    },
    ToolInfo {
        name: "execute_command_direct",
        category: ToolCategory::Core,
        short_desc: "Run a command via the x64dbg CLI and capture output",
        full_desc: "Launch the x64dbg executable with -script and the given command, wait up \
                    to 10 seconds, and return captured stdout/stderr. Unlike execute_command \
                    this blocks on the debugger process; use it only when the script-drop \
                    path is unavailable. With parse_result=true the output is scanned for an \
                    MCP_RESULT marker.",
        example: r#"{"command": "r", "parse_result": true}"#,
        default: false,
        keywords: &["command", "direct", "subprocess", "cli", "timeout", "capture"],
    },
    ToolInfo {
        name: "tool_catalog",
        category: ToolCategory::Core,
        short_desc: "Discover available tools by query or category",
        full_desc: "Search for relevant tools based on what you're trying to accomplish. \
                    Returns tool names with short descriptions and relevance reasons. \
                    Use this to find the right tool before calling tool_help for full details.",
        example: r#"{"query": "set a breakpoint on write"}"#,
        default: true,
        keywords: &["discover", "find", "search", "tools", "help", "catalog"],
    },
    ToolInfo {
        name: "tool_help",
        category: ToolCategory::Core,
        short_desc: "Get full documentation for a tool",
        full_desc: "Returns complete documentation for a specific tool including: \
                    full description and example invocation. \
                    Use tool_catalog first to find the tool name.",
        example: r#"{"name": "set_hardware_breakpoint"}"#,
        default: true,
        keywords: &["help", "docs", "documentation", "usage"],
    },

    // === BREAKPOINTS ===
    ToolInfo {
        name: "set_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Set a software breakpoint at an address",
        full_desc: "Set a software (INT3) breakpoint at the given address. \
                    Accepts hex (0x-prefixed) or decimal addresses.",
        example: r#"{"address": "0x401000"}"#,
        default: true,
        keywords: &["breakpoint", "bp", "set", "int3", "software"],
    },
    ToolInfo {
        name: "remove_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Remove a software breakpoint",
        full_desc: "Remove the software breakpoint at the given address.",
        example: r#"{"address": "0x401000"}"#,
        default: true,
        keywords: &["breakpoint", "remove", "delete", "clear", "bpc"],
    },
    ToolInfo {
        name: "enable_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Enable a disabled breakpoint",
        full_desc: "Re-enable a previously disabled breakpoint at the given address.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["breakpoint", "enable", "bpe"],
    },
    ToolInfo {
        name: "disable_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Disable a breakpoint without removing it",
        full_desc: "Disable the breakpoint at the given address while keeping it in the list.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["breakpoint", "disable", "bpd"],
    },
    ToolInfo {
        name: "list_breakpoints",
        category: ToolCategory::Breakpoints,
        short_desc: "List all breakpoints",
        full_desc: "List all software, hardware, and memory breakpoints with their state.",
        example: r#"{}"#,
        default: true,
        keywords: &["breakpoint", "list", "enumerate", "bplist"],
    },
    ToolInfo {
        name: "set_conditional_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Set a breakpoint with a break condition",
        full_desc: "Set a software breakpoint that only breaks when the condition expression \
                    evaluates true (x64dbg expression syntax, e.g. 'eax == 1'). \
                    An empty condition sets a plain breakpoint.",
        example: r#"{"address": "0x401000", "condition": "eax == 1"}"#,
        default: false,
        keywords: &["breakpoint", "conditional", "condition", "expression"],
    },
    ToolInfo {
        name: "breakpoint_hit_count",
        category: ToolCategory::Breakpoints,
        short_desc: "Get the hit count of a breakpoint",
        full_desc: "Return how many times the breakpoint at the given address has been hit.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["breakpoint", "hit", "count", "statistics"],
    },
    ToolInfo {
        name: "reset_breakpoint_hit_count",
        category: ToolCategory::Breakpoints,
        short_desc: "Reset a breakpoint's hit counter",
        full_desc: "Reset the hit counter of the breakpoint at the given address to zero.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["breakpoint", "hit", "count", "reset"],
    },
    ToolInfo {
        name: "set_hardware_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Set a hardware breakpoint (debug register)",
        full_desc: "Set a hardware breakpoint using a CPU debug register. \
                    bp_type is one of execute, write, read, readwrite; size is 1, 2, 4, or 8 \
                    bytes. At most four hardware breakpoints can be active.",
        example: r#"{"address": "0x401000", "bp_type": "write", "size": 4}"#,
        default: false,
        keywords: &["breakpoint", "hardware", "hwbp", "debug register", "dr7"],
    },
    ToolInfo {
        name: "remove_hardware_breakpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Remove a hardware breakpoint",
        full_desc: "Remove the hardware breakpoint at the given address, freeing its debug register.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["breakpoint", "hardware", "remove", "hwbpdel"],
    },
    ToolInfo {
        name: "set_watchpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Watch an address for read/write access",
        full_desc: "Set a data watchpoint (hardware breakpoint on access). watch_type is \
                    read, write, or readwrite; size is 1, 2, 4, or 8 bytes.",
        example: r#"{"address": "0x404000", "watch_type": "readwrite", "size": 4}"#,
        default: false,
        keywords: &["watchpoint", "watch", "data", "access", "memory"],
    },
    ToolInfo {
        name: "remove_watchpoint",
        category: ToolCategory::Breakpoints,
        short_desc: "Remove a watchpoint",
        full_desc: "Remove the watchpoint at the given address.",
        example: r#"{"address": "0x404000"}"#,
        default: false,
        keywords: &["watchpoint", "remove", "delete"],
    },
    ToolInfo {
        name: "batch_set_breakpoints",
        category: ToolCategory::Breakpoints,
        short_desc: "Set breakpoints at many addresses at once",
        full_desc: "Set software breakpoints at up to 1000 addresses in one call. \
                    Returns a per-address result map; a bad address fails its slot without \
                    aborting the rest, and the overall status is 'partial' when any slot failed.",
        example: r#"{"addresses": ["0x401000", "0x401050", "0x4010a0"]}"#,
        default: false,
        keywords: &["breakpoint", "batch", "multiple", "bulk"],
    },
    ToolInfo {
        name: "batch_remove_breakpoints",
        category: ToolCategory::Breakpoints,
        short_desc: "Remove breakpoints at many addresses at once",
        full_desc: "Remove software breakpoints at up to 1000 addresses in one call, with \
                    the same per-address result map as batch_set_breakpoints.",
        example: r#"{"addresses": ["0x401000", "0x401050"]}"#,
        default: false,
        keywords: &["breakpoint", "batch", "remove", "bulk"],
    },

    // === MEMORY ===
    ToolInfo {
        name: "read_memory",
        category: ToolCategory::Memory,
        short_desc: "Read bytes from an address (max 4096)",
        full_desc: "Read up to 4096 bytes of memory at the given address and show them as a \
                    hex dump. For larger regions use dump_memory.",
        example: r#"{"address": "0x401000", "size": 64}"#,
        default: true,
        keywords: &["memory", "read", "dump", "bytes", "hex"],
    },
    ToolInfo {
        name: "write_memory",
        category: ToolCategory::Memory,
        short_desc: "Write hex bytes to an address",
        full_desc: "Write bytes to memory. data is a hex string; separators (spaces, commas, \
                    dashes, colons) and 0x prefixes are tolerated, e.g. '90 90 0xCC'.",
        example: r#"{"address": "0x401000", "data": "90 90"}"#,
        default: true,
        keywords: &["memory", "write", "bytes", "hex", "modify"],
    },
    ToolInfo {
        name: "search_memory",
        category: ToolCategory::Memory,
        short_desc: "Search memory for a byte pattern",
        full_desc: "Search process memory for a pattern (hex bytes, ?? wildcards supported by \
                    x64dbg). Optionally bound the search with start and end addresses; the \
                    bounds only apply when both are given.",
        example: r#"{"pattern": "48 8B 05 ?? ?? ?? ??", "start": "0x400000", "end": "0x500000"}"#,
        default: false,
        keywords: &["memory", "search", "find", "pattern", "findmem", "scan"],
    },
    ToolInfo {
        name: "dump_memory",
        category: ToolCategory::Memory,
        short_desc: "Dump a memory region to a file",
        full_desc: "Dump a memory region to a binary file on the debugger host. Without \
                    output_file the dump lands in the script directory as \
                    dump_<address>_<size>.bin.",
        example: r#"{"address": "0x400000", "size": 65536}"#,
        default: false,
        keywords: &["memory", "dump", "file", "save", "extract"],
    },
    ToolInfo {
        name: "set_memory_protection",
        category: ToolCategory::Memory,
        short_desc: "Change page protection of a region",
        full_desc: "Change the protection of a memory region. protection is one of R, RW, X, \
                    RX, RWX, or NONE and maps to the corresponding PAGE_* constant.",
        example: r#"{"address": "0x401000", "size": 4096, "protection": "RWX"}"#,
        default: false,
        keywords: &["memory", "protection", "page", "virtualprotect", "rights"],
    },
    ToolInfo {
        name: "get_memory_protection",
        category: ToolCategory::Memory,
        short_desc: "Query page protection at an address",
        full_desc: "Return the current page protection of the region containing the address.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["memory", "protection", "query", "rights"],
    },
    ToolInfo {
        name: "compare_memory",
        category: ToolCategory::Memory,
        short_desc: "Compare two memory regions byte by byte",
        full_desc: "Compare two memory regions of the same size and report differing offsets \
                    (at most the first 100 differences).",
        example: r#"{"address1": "0x401000", "address2": "0x501000", "size": 256}"#,
        default: false,
        keywords: &["memory", "compare", "diff", "differences"],
    },
    ToolInfo {
        name: "fill_memory",
        category: ToolCategory::Memory,
        short_desc: "Fill a region with a byte value",
        full_desc: "Fill a memory region with a single byte value (0-255). \
                    Commonly used to NOP out code with 0x90.",
        example: r#"{"address": "0x401000", "size": 16, "value": 144}"#,
        default: false,
        keywords: &["memory", "fill", "nop", "memset", "pattern"],
    },
    ToolInfo {
        name: "allocate_memory",
        category: ToolCategory::Memory,
        short_desc: "Allocate memory in the target (max 100 MB)",
        full_desc: "Allocate memory in the debugged process, up to 100 MB per call. \
                    protection defaults to RWX. Returns the allocated base address.",
        example: r#"{"size": 4096, "protection": "RWX"}"#,
        default: false,
        keywords: &["memory", "allocate", "alloc", "malloc", "virtualalloc"],
    },
    ToolInfo {
        name: "free_memory",
        category: ToolCategory::Memory,
        short_desc: "Free memory allocated in the target",
        full_desc: "Free a region previously allocated with allocate_memory.",
        example: r#"{"address": "0x1a0000"}"#,
        default: false,
        keywords: &["memory", "free", "release", "virtualfree"],
    },
    ToolInfo {
        name: "memory_region_info",
        category: ToolCategory::Memory,
        short_desc: "Get region info for an address",
        full_desc: "Return base, size, state, and protection of the memory region containing \
                    the given address.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["memory", "region", "info", "virtualquery"],
    },
    ToolInfo {
        name: "batch_read_memory",
        category: ToolCategory::Memory,
        short_desc: "Read from many addresses at once (max 100)",
        full_desc: "Read memory at up to 100 addresses in one call. sizes, when given, must \
                    match the addresses list in length; otherwise each read uses 64 bytes. \
                    Returns a per-address result map with 'partial' status on mixed outcomes.",
        example: r#"{"addresses": ["0x401000", "0x402000"], "sizes": [32, 64]}"#,
        default: false,
        keywords: &["memory", "batch", "read", "multiple", "bulk"],
    },

    // === REGISTERS ===
    ToolInfo {
        name: "get_registers",
        category: ToolCategory::Registers,
        short_desc: "Show all CPU registers",
        full_desc: "Show the full register dump of the current thread (the x64dbg 'r' command).",
        example: r#"{}"#,
        default: true,
        keywords: &["registers", "cpu", "rax", "rip", "eflags", "dump"],
    },
    ToolInfo {
        name: "set_register",
        category: ToolCategory::Registers,
        short_desc: "Set a CPU register value",
        full_desc: "Set a register of the current thread. Accepts 64/32/16/8-bit register \
                    names and flag bits; the value may be hex or decimal.",
        example: r#"{"name": "rip", "value": "0x401000"}"#,
        default: true,
        keywords: &["register", "set", "write", "modify", "rip", "rax"],
    },
    ToolInfo {
        name: "set_registers",
        category: ToolCategory::Registers,
        short_desc: "Set several registers in one call",
        full_desc: "Set multiple registers at once from a name-to-value map. Each register is \
                    set independently; invalid entries fail their slot and the overall status \
                    becomes 'partial'.",
        example: r#"{"registers": {"rax": "0x1", "rbx": "0x2"}}"#,
        default: false,
        keywords: &["registers", "batch", "multiple", "set"],
    },

    // === THREADS ===
    ToolInfo {
        name: "list_threads",
        category: ToolCategory::Threads,
        short_desc: "List threads of the debugged process",
        full_desc: "List all threads with id, entry point, and suspend state.",
        example: r#"{}"#,
        default: true,
        keywords: &["threads", "list", "enumerate"],
    },
    ToolInfo {
        name: "switch_thread",
        category: ToolCategory::Threads,
        short_desc: "Switch the active thread",
        full_desc: "Make the given thread the debugger's current thread; register views and \
                    stepping then apply to it.",
        example: r#"{"thread_id": 1234}"#,
        default: false,
        keywords: &["thread", "switch", "current", "active"],
    },
    ToolInfo {
        name: "suspend_thread",
        category: ToolCategory::Threads,
        short_desc: "Suspend a thread",
        full_desc: "Suspend the given thread.",
        example: r#"{"thread_id": 1234}"#,
        default: false,
        keywords: &["thread", "suspend", "pause", "freeze"],
    },
    ToolInfo {
        name: "resume_thread",
        category: ToolCategory::Threads,
        short_desc: "Resume a suspended thread",
        full_desc: "Resume the given thread.",
        example: r#"{"thread_id": 1234}"#,
        default: false,
        keywords: &["thread", "resume", "continue", "unfreeze"],
    },
    ToolInfo {
        name: "thread_context",
        category: ToolCategory::Threads,
        short_desc: "Get a thread's register context",
        full_desc: "Return the register context (CONTEXT) of the given thread without \
                    switching to it.",
        example: r#"{"thread_id": 1234}"#,
        default: false,
        keywords: &["thread", "context", "registers"],
    },

    // === PROCESS ===
    ToolInfo {
        name: "debugger_status",
        category: ToolCategory::Process,
        short_desc: "Report debugger state (debugging, running, pid, address)",
        full_desc: "Report whether a target is being debugged, whether it is running, the \
                    current process and thread ids, and the current instruction address.",
        example: r#"{}"#,
        default: true,
        keywords: &["status", "state", "debugging", "running", "pid"],
    },
    ToolInfo {
        name: "attach_process",
        category: ToolCategory::Process,
        short_desc: "Attach the debugger to a running process",
        full_desc: "Attach to a running process by pid.",
        example: r#"{"pid": 1234}"#,
        default: true,
        keywords: &["attach", "process", "pid", "debug"],
    },
    ToolInfo {
        name: "detach_process",
        category: ToolCategory::Process,
        short_desc: "Detach from the debugged process",
        full_desc: "Detach the debugger, leaving the target running.",
        example: r#"{}"#,
        default: true,
        keywords: &["detach", "release", "process"],
    },

    // === DEBUG CONTROL ===
    ToolInfo {
        name: "step_over",
        category: ToolCategory::DebugControl,
        short_desc: "Step over the current instruction",
        full_desc: "Execute one instruction, stepping over calls.",
        example: r#"{}"#,
        default: true,
        keywords: &["step", "over", "next", "execute"],
    },
    ToolInfo {
        name: "step_into",
        category: ToolCategory::DebugControl,
        short_desc: "Step into the current instruction",
        full_desc: "Execute one instruction, following calls into the callee.",
        example: r#"{}"#,
        default: true,
        keywords: &["step", "into", "trace", "execute"],
    },
    ToolInfo {
        name: "run",
        category: ToolCategory::DebugControl,
        short_desc: "Resume execution",
        full_desc: "Resume the target until the next breakpoint or exception.",
        example: r#"{}"#,
        default: true,
        keywords: &["run", "continue", "resume", "go"],
    },
    ToolInfo {
        name: "pause",
        category: ToolCategory::DebugControl,
        short_desc: "Pause the running target",
        full_desc: "Break into the running target.",
        example: r#"{}"#,
        default: true,
        keywords: &["pause", "break", "halt", "suspend"],
    },
    ToolInfo {
        name: "start_trace",
        category: ToolCategory::DebugControl,
        short_desc: "Start instruction tracing",
        full_desc: "Start recording an instruction trace of the target.",
        example: r#"{}"#,
        default: false,
        keywords: &["trace", "start", "record", "instructions"],
    },
    ToolInfo {
        name: "stop_trace",
        category: ToolCategory::DebugControl,
        short_desc: "Stop instruction tracing",
        full_desc: "Stop the running instruction trace.",
        example: r#"{}"#,
        default: false,
        keywords: &["trace", "stop", "end"],
    },
    ToolInfo {
        name: "trace_records",
        category: ToolCategory::DebugControl,
        short_desc: "Fetch recorded trace entries (max 10000)",
        full_desc: "Return up to 10000 recorded trace entries from the current trace.",
        example: r#"{"count": 100}"#,
        default: false,
        keywords: &["trace", "records", "list", "history"],
    },
    ToolInfo {
        name: "start_profiling",
        category: ToolCategory::DebugControl,
        short_desc: "Start execution profiling",
        full_desc: "Start collecting execution profile data for the target.",
        example: r#"{}"#,
        default: false,
        keywords: &["profiling", "start", "performance"],
    },
    ToolInfo {
        name: "stop_profiling",
        category: ToolCategory::DebugControl,
        short_desc: "Stop execution profiling",
        full_desc: "Stop the running profiling session.",
        example: r#"{}"#,
        default: false,
        keywords: &["profiling", "stop"],
    },
    ToolInfo {
        name: "profiling_results",
        category: ToolCategory::DebugControl,
        short_desc: "Fetch profiling results",
        full_desc: "Return the collected profiling data.",
        example: r#"{}"#,
        default: false,
        keywords: &["profiling", "results", "report"],
    },

    // === INFORMATION ===
    ToolInfo {
        name: "list_modules",
        category: ToolCategory::Information,
        short_desc: "List loaded modules",
        full_desc: "List all modules loaded in the debugged process with base and size.",
        example: r#"{}"#,
        default: true,
        keywords: &["modules", "dll", "list", "loaded"],
    },
    ToolInfo {
        name: "get_stack",
        category: ToolCategory::Information,
        short_desc: "Show stack entries (max 50)",
        full_desc: "Show up to 50 entries from the current thread's stack.",
        example: r#"{"count": 16}"#,
        default: false,
        keywords: &["stack", "esp", "rsp", "dump"],
    },
    ToolInfo {
        name: "get_call_stack",
        category: ToolCategory::Information,
        short_desc: "Show the call stack (max depth 100)",
        full_desc: "Walk the call stack of the current thread up to the given depth.",
        example: r#"{"depth": 20}"#,
        default: true,
        keywords: &["callstack", "backtrace", "frames", "return"],
    },
    ToolInfo {
        name: "memory_map",
        category: ToolCategory::Information,
        short_desc: "Show the process memory map",
        full_desc: "Show all memory regions of the debugged process with protections.",
        example: r#"{}"#,
        default: true,
        keywords: &["memory", "map", "regions", "layout"],
    },
    ToolInfo {
        name: "list_strings",
        category: ToolCategory::Information,
        short_desc: "Find string references in the target",
        full_desc: "Scan for referenced strings of at least min_length characters (default 4).",
        example: r#"{"min_length": 6}"#,
        default: false,
        keywords: &["strings", "references", "strref", "text"],
    },
    ToolInfo {
        name: "xrefs",
        category: ToolCategory::Information,
        short_desc: "Find cross-references to an address",
        full_desc: "Find all cross-references pointing to the given address.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["xref", "references", "callers", "usage"],
    },
    ToolInfo {
        name: "list_imports",
        category: ToolCategory::Information,
        short_desc: "List imported functions",
        full_desc: "List the import table of the main module.",
        example: r#"{}"#,
        default: false,
        keywords: &["imports", "iat", "api", "external"],
    },
    ToolInfo {
        name: "list_exports",
        category: ToolCategory::Information,
        short_desc: "List exported functions",
        full_desc: "List the export table of the main module.",
        example: r#"{}"#,
        default: false,
        keywords: &["exports", "eat", "symbols", "public"],
    },

    // === ANALYSIS ===
    ToolInfo {
        name: "disassemble",
        category: ToolCategory::Analysis,
        short_desc: "Disassemble instructions at an address (max 100)",
        full_desc: "Disassemble up to 100 instructions starting at the given address.",
        example: r#"{"address": "0x401000", "count": 20}"#,
        default: true,
        keywords: &["disassemble", "disasm", "assembly", "instructions", "code"],
    },
    ToolInfo {
        name: "resolve_symbol",
        category: ToolCategory::Analysis,
        short_desc: "Resolve a symbol name to an address",
        full_desc: "Resolve a symbol like 'kernel32.LoadLibraryA' to its address in the \
                    debugged process.",
        example: r#"{"symbol": "kernel32.LoadLibraryA"}"#,
        default: true,
        keywords: &["symbol", "resolve", "name", "address", "api"],
    },
    ToolInfo {
        name: "view_structure",
        category: ToolCategory::Analysis,
        short_desc: "Decode a structure at an address (PEB, TEB, ...)",
        full_desc: "Decode a known structure at the given address. PEB and TEB are rendered \
                    field by field (64-bit offsets); other names are handed to the debugger's \
                    own struct viewer.",
        example: r#"{"address": "0x7ffd0000", "structure_type": "PEB"}"#,
        default: false,
        keywords: &["structure", "struct", "peb", "teb", "fields", "decode"],
    },
    ToolInfo {
        name: "evaluate_expression",
        category: ToolCategory::Analysis,
        short_desc: "Evaluate an x64dbg expression",
        full_desc: "Evaluate an expression in x64dbg syntax, e.g. '[esp+8]' or \
                    'kernel32:Base + 0x1000'. Returns the value.",
        example: r#"{"expression": "[rsp+8]"}"#,
        default: false,
        keywords: &["expression", "evaluate", "calc", "compute"],
    },
    ToolInfo {
        name: "list_functions",
        category: ToolCategory::Analysis,
        short_desc: "List analyzed functions",
        full_desc: "List function boundaries found by x64dbg's analysis.",
        example: r#"{}"#,
        default: false,
        keywords: &["functions", "list", "analysis", "subroutines"],
    },
    ToolInfo {
        name: "list_labels",
        category: ToolCategory::Analysis,
        short_desc: "List labels",
        full_desc: "List user and automatic labels in the database.",
        example: r#"{}"#,
        default: false,
        keywords: &["labels", "list", "names"],
    },
    ToolInfo {
        name: "get_comments",
        category: ToolCategory::Analysis,
        short_desc: "List comments, optionally at one address",
        full_desc: "List comments in the database. With an address, only comments at that \
                    address are returned.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["comments", "annotations", "notes"],
    },

    // === EDITING ===
    ToolInfo {
        name: "apply_patch",
        category: ToolCategory::Editing,
        short_desc: "Patch bytes at an address",
        full_desc: "Write a byte patch at the given address and register it in the patch \
                    list. data is a hex string with tolerated separators; description is an \
                    optional note.",
        example: r#"{"address": "0x401000", "data": "90 90", "description": "nop out check"}"#,
        default: true,
        keywords: &["patch", "bytes", "modify", "edit", "nop"],
    },
    ToolInfo {
        name: "remove_patch",
        category: ToolCategory::Editing,
        short_desc: "Revert a patch",
        full_desc: "Restore the original bytes at a patched address.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["patch", "remove", "revert", "restore"],
    },
    ToolInfo {
        name: "list_patches",
        category: ToolCategory::Editing,
        short_desc: "List applied patches",
        full_desc: "List all patches currently applied to the target.",
        example: r#"{}"#,
        default: false,
        keywords: &["patches", "list", "modifications"],
    },
    ToolInfo {
        name: "inject_code",
        category: ToolCategory::Editing,
        short_desc: "Write shellcode into the target",
        full_desc: "Write shellcode bytes into the target. Without an address a buffer is \
                    allocated first. With create_thread=true a thread is started at the code; \
                    otherwise the code is written but not executed.",
        example: r#"{"shellcode": "90 90 C3", "create_thread": false}"#,
        default: false,
        keywords: &["inject", "shellcode", "code", "execute"],
    },
    ToolInfo {
        name: "inject_dll",
        category: ToolCategory::Editing,
        short_desc: "Inject a DLL into the target",
        full_desc: "Inject a DLL into the debugged process, via the scripting API when \
                    available or a LoadLibraryA remote thread otherwise. The path must exist \
                    on the debugger host.",
        example: r#"{"dll_path": "C:\\hooks\\monitor.dll"}"#,
        default: false,
        keywords: &["inject", "dll", "loadlibrary", "library"],
    },
    ToolInfo {
        name: "eject_dll",
        category: ToolCategory::Editing,
        short_desc: "Unload an injected DLL",
        full_desc: "Unload a DLL from the target by module name using a FreeLibrary remote \
                    thread.",
        example: r#"{"dll_name": "monitor.dll"}"#,
        default: false,
        keywords: &["eject", "unload", "dll", "freelibrary"],
    },

    // === ADVANCED ===
    ToolInfo {
        name: "bypass_antidebug",
        category: ToolCategory::Advanced,
        short_desc: "Patch common anti-debug checks",
        full_desc: "Patch common anti-debug tells in the target. method is one of: \
                    'peb' (clear PEB.BeingDebugged), 'ntquery' (hook \
                    NtQueryInformationProcess), 'debugport' (clear NtGlobalFlag), or 'all'. \
                    Returns per-technique outcomes.",
        example: r#"{"method": "all"}"#,
        default: false,
        keywords: &["antidebug", "bypass", "peb", "beingdebugged", "evasion"],
    },
    ToolInfo {
        name: "set_exception_handler",
        category: ToolCategory::Advanced,
        short_desc: "Configure handling for an exception code",
        full_desc: "Configure how the debugger reacts to a specific exception code. action \
                    is ignore, handle, or log.",
        example: r#"{"exception_code": 3221225477, "action": "ignore"}"#,
        default: false,
        keywords: &["exception", "handler", "ignore", "access violation"],
    },
    ToolInfo {
        name: "exception_info",
        category: ToolCategory::Advanced,
        short_desc: "Show the last exception",
        full_desc: "Return details of the most recent exception in the target.",
        example: r#"{}"#,
        default: false,
        keywords: &["exception", "info", "last", "crash"],
    },
    ToolInfo {
        name: "debugger_logs",
        category: ToolCategory::Advanced,
        short_desc: "Fetch recent debugger log lines (max 10000)",
        full_desc: "Return up to 10000 recent lines from the x64dbg log window.",
        example: r#"{"count": 100}"#,
        default: false,
        keywords: &["logs", "log", "output", "history"],
    },
    ToolInfo {
        name: "capture_output",
        category: ToolCategory::Advanced,
        short_desc: "Run a command and capture its full output",
        full_desc: "Run an x64dbg command with output capture and marker parsing forced on. \
                    Equivalent to execute_command with parse_result=true.",
        example: r#"{"command": "mod"}"#,
        default: false,
        keywords: &["capture", "output", "command", "parse"],
    },

    // === BOOKMARKS ===
    ToolInfo {
        name: "add_bookmark",
        category: ToolCategory::Bookmarks,
        short_desc: "Bookmark an address",
        full_desc: "Add a named bookmark at the given address. An empty name defaults to the \
                    address string.",
        example: r#"{"address": "0x401000", "name": "license check"}"#,
        default: false,
        keywords: &["bookmark", "add", "mark", "name"],
    },
    ToolInfo {
        name: "remove_bookmark",
        category: ToolCategory::Bookmarks,
        short_desc: "Remove a bookmark",
        full_desc: "Remove the bookmark at the given address.",
        example: r#"{"address": "0x401000"}"#,
        default: false,
        keywords: &["bookmark", "remove", "delete"],
    },
    ToolInfo {
        name: "list_bookmarks",
        category: ToolCategory::Bookmarks,
        short_desc: "List bookmarks",
        full_desc: "List all bookmarks with their names and addresses.",
        example: r#"{}"#,
        default: false,
        keywords: &["bookmark", "list", "enumerate"],
    },
    ToolInfo {
        name: "goto_bookmark",
        category: ToolCategory::Bookmarks,
        short_desc: "Resolve a bookmark name to its address",
        full_desc: "Look up a bookmark by name and return its address.",
        example: r#"{"name": "license check"}"#,
        default: false,
        keywords: &["bookmark", "goto", "navigate", "find"],
    },

    // === UTILITY ===
    ToolInfo {
        name: "load_file",
        category: ToolCategory::Utility,
        short_desc: "Load an executable into the debugger",
        full_desc: "Load an executable file into x64dbg for debugging. The path must exist on \
                    the debugger host.",
        example: r#"{"file_path": "C:\\samples\\target.exe"}"#,
        default: true,
        keywords: &["load", "open", "file", "executable", "init"],
    },
    ToolInfo {
        name: "save_memory_to_file",
        category: ToolCategory::Utility,
        short_desc: "Save a memory region to an explicit file",
        full_desc: "Dump a memory region to the given file path. Same as dump_memory with a \
                    mandatory output file.",
        example: r#"{"address": "0x400000", "size": 65536, "output_file": "C:\\dumps\\image.bin"}"#,
        default: false,
        keywords: &["memory", "save", "dump", "file", "export"],
    },
    ToolInfo {
        name: "calculate_address",
        category: ToolCategory::Utility,
        short_desc: "Add an offset to a base address",
        full_desc: "Compute base + offset with overflow checking. Negative offsets subtract. \
                    Works without a debugger.",
        example: r#"{"base": "0x401000", "offset": 32}"#,
        default: false,
        keywords: &["address", "calculate", "offset", "arithmetic", "rva"],
    },
    ToolInfo {
        name: "format_address",
        category: ToolCategory::Utility,
        short_desc: "Format an address as hex/decimal/octal/binary",
        full_desc: "Re-format an address. format_type is hex, decimal, octal, or binary; \
                    unknown formats fall back to hex. Works without a debugger.",
        example: r#"{"address": "4198400", "format_type": "hex"}"#,
        default: false,
        keywords: &["address", "format", "hex", "decimal", "convert"],
    },
    ToolInfo {
        name: "save_script",
        category: ToolCategory::Utility,
        short_desc: "Save a script body to a file",
        full_desc: "Write a script body to an explicit path on this host for later reuse.",
        example: r#"{"file_path": "C:\\scripts\\unpack.py", "content": "dbgcmd('run')"}"#,
        default: false,
        keywords: &["script", "save", "write", "file"],
    },
    ToolInfo {
        name: "load_script",
        category: ToolCategory::Utility,
        short_desc: "Load a script file's content",
        full_desc: "Read a previously saved script file and return its content.",
        example: r#"{"file_path": "C:\\scripts\\unpack.py"}"#,
        default: false,
        keywords: &["script", "load", "read", "file"],
    },
    ToolInfo {
        name: "script_history",
        category: ToolCategory::Utility,
        short_desc: "List recently generated scripts (max 100)",
        full_desc: "List the most recently generated script files in the script directory, \
                    newest first.",
        example: r#"{"count": 20}"#,
        default: false,
        keywords: &["script", "history", "recent", "generated"],
    },
    ToolInfo {
        name: "save_config",
        category: ToolCategory::Utility,
        short_desc: "Save the debugger configuration under a name",
        full_desc: "Save the current x64dbg configuration (breakpoints, settings) under a \
                    named slot.",
        example: r#"{"name": "unpack-session"}"#,
        default: false,
        keywords: &["config", "save", "settings", "session"],
    },
    ToolInfo {
        name: "load_config",
        category: ToolCategory::Utility,
        short_desc: "Load a named debugger configuration",
        full_desc: "Restore a previously saved configuration by name.",
        example: r#"{"name": "unpack-session"}"#,
        default: false,
        keywords: &["config", "load", "restore", "session"],
    },
    ToolInfo {
        name: "list_configs",
        category: ToolCategory::Utility,
        short_desc: "List saved configurations",
        full_desc: "List all saved configuration names.",
        example: r#"{}"#,
        default: false,
        keywords: &["config", "list", "saved"],
    },
];

/// Get tools in the default (core) set
pub fn default_tools() -> impl Iterator<Item = &'static ToolInfo> {
    TOOL_REGISTRY.iter().filter(|t| t.default)
}

/// Get all tools
pub fn all_tools() -> impl Iterator<Item = &'static ToolInfo> {
    TOOL_REGISTRY.iter()
}

/// Get tool by name
pub fn get_tool(name: &str) -> Option<&'static ToolInfo> {
    TOOL_REGISTRY.iter().find(|t| t.name == name)
}

/// Get tools by category
pub fn tools_by_category(category: ToolCategory) -> impl Iterator<Item = &'static ToolInfo> {
    TOOL_REGISTRY.iter().filter(move |t| t.category == category)
}

/// Search tools by query (simple keyword matching)
pub fn search_tools(query: &str, limit: usize) -> Vec<(&'static ToolInfo, Vec<&'static str>)> {
    let query_lower = query.to_lowercase();
    let query_words: Vec<&str> = query_lower.split_whitespace().collect();

    let mut results: Vec<(&'static ToolInfo, Vec<&'static str>, usize)> = Vec::new();

    for tool in TOOL_REGISTRY.iter() {
        let mut matched_keywords = Vec::new();
        let mut score = 0usize;

        // Check tool name
        let name_lower = tool.name.to_lowercase();
        for word in &query_words {
            if name_lower.contains(word) {
                score += 10;
                matched_keywords.push("name match");
            }
        }

        // Check short description
        let desc_lower = tool.short_desc.to_lowercase();
        for word in &query_words {
            if desc_lower.contains(word) {
                score += 5;
            }
        }

        // Check keywords
        for keyword in tool.keywords {
            let kw_lower = keyword.to_lowercase();
            for word in &query_words {
                if kw_lower.contains(word) || word.contains(&kw_lower) {
                    score += 3;
                    if !matched_keywords.contains(keyword) {
                        matched_keywords.push(keyword);
                    }
                }
            }
        }

        // Check category
        let cat_str = tool.category.as_str().to_lowercase();
        for word in &query_words {
            if cat_str.contains(word) {
                score += 2;
                matched_keywords.push(tool.category.as_str());
            }
        }

        if score > 0 {
            results.push((tool, matched_keywords, score));
        }
    }

    // Sort by score descending
    results.sort_by(|a, b| b.2.cmp(&a.2));

    // Return top results
    results
        .into_iter()
        .take(limit)
        .map(|(tool, keywords, _)| (tool, keywords))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::tool_registry::*;

    #[test]
    fn test_default_tools() {
        let defaults: Vec<_> = default_tools().collect();
        assert!(defaults.iter().any(|t| t.name == "execute_command"));
        assert!(defaults.iter().any(|t| t.name == "tool_catalog"));
        assert!(defaults.iter().any(|t| t.name == "tool_help"));
        assert!(defaults.iter().any(|t| t.name == "set_breakpoint"));
    }

    #[test]
    fn test_search_tools() {
        let results = search_tools("watch memory write", 5);
        assert!(!results.is_empty());
        assert!(results.iter().any(|(t, _)| t.name == "set_watchpoint"));
    }

    #[test]
    fn test_get_tool() {
        assert!(get_tool("read_memory").is_some());
        assert!(get_tool("nonexistent").is_none());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<_> = TOOL_REGISTRY.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TOOL_REGISTRY.len());
    }

    #[test]
    fn test_category_parsing() {
        use std::str::FromStr;
        assert_eq!(ToolCategory::from_str("bp"), Ok(ToolCategory::Breakpoints));
        assert_eq!(
            ToolCategory::from_str("Debug-Control"),
            Ok(ToolCategory::DebugControl)
        );
        assert!(ToolCategory::from_str("wat").is_err());
    }
}
