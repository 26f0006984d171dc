//! x64dbg MCP Server
//!
//! This library provides an MCP (Model Context Protocol) server that drives
//! the x64dbg debugger. It lets LLM agents set breakpoints, inspect memory
//! and registers, control execution, and patch running Windows targets.
//!
//! # Architecture
//!
//! The server never talks to a live x64dbg process directly. Every tool call
//! renders a small Python script for the x64dbg scripting plugin and writes
//! it into a shared directory (`<plugin_dir>/mcp_temp`); the plugin polls
//! that directory and runs each script inside the debugger. Scripts report
//! structured results by printing an `MCP_RESULT:` marker followed by a JSON
//! object to the plugin log.
//!
//! Because of that relay, a success envelope from most tools confirms that a
//! script was *created*, not that the debugger has already executed it. The
//! one synchronous path is `execute_command_direct`, which launches the
//! x64dbg executable with `-script` and captures its output under a timeout.
//!
//! - **DbgConfig**: Locates the x64dbg installation and plugin directory
//!   (explicit paths, environment variables, then common install locations).
//! - **DbgController**: Renders scripts and hands them to the store; owns
//!   the direct-execution path.
//! - **ScriptStore**: Collision-free script file naming and history.
//! - **X64DbgMcpServer**: The MCP server exposing the tools, built on the
//!   `rmcp` crate.
//!
//! # Tools
//!
//! ## Core
//! - `execute_command`: Run any x64dbg command via a generated script
//! - `execute_command_direct`: Run through the executable and capture output
//! - `tool_catalog` / `tool_help`: Tool discovery and documentation
//!
//! ## Breakpoints
//! - Software: `set_breakpoint`, `remove_breakpoint`, `enable_breakpoint`,
//!   `disable_breakpoint`, `list_breakpoints`, `set_conditional_breakpoint`,
//!   hit counters, and `batch_set_breakpoints`/`batch_remove_breakpoints`
//! - Hardware: `set_hardware_breakpoint`, `remove_hardware_breakpoint`,
//!   `set_watchpoint`, `remove_watchpoint`
//!
//! ## Memory
//! - `read_memory`, `write_memory`, `search_memory`, `dump_memory`,
//!   `compare_memory`, `fill_memory`, `batch_read_memory`
//! - `set_memory_protection`, `get_memory_protection`, `allocate_memory`,
//!   `free_memory`, `memory_region_info`
//!
//! ## Execution
//! - `get_registers`, `set_register`, `set_registers`
//! - `list_threads`, `switch_thread`, `suspend_thread`, `resume_thread`,
//!   `thread_context`
//! - `step_over`, `step_into`, `run`, `pause`, tracing and profiling
//! - `debugger_status`, `attach_process`, `detach_process`
//!
//! ## Inspection
//! - `list_modules`, `get_stack`, `get_call_stack`, `memory_map`,
//!   `list_strings`, `xrefs`, `list_imports`, `list_exports`
//! - `disassemble`, `resolve_symbol`, `view_structure`,
//!   `evaluate_expression`, `list_functions`, `list_labels`, `get_comments`
//!
//! ## Modification
//! - `apply_patch`, `remove_patch`, `list_patches`
//! - `inject_code`, `inject_dll`, `eject_dll`
//! - `bypass_antidebug`, `set_exception_handler`, `exception_info`
//!
//! ## Workspace
//! - `add_bookmark`, `remove_bookmark`, `list_bookmarks`, `goto_bookmark`
//! - `load_file`, `save_memory_to_file`, `calculate_address`,
//!   `format_address`, `save_script`, `load_script`, `script_history`,
//!   `save_config`, `load_config`, `list_configs`

pub mod addr;
pub mod config;
pub mod dbg;
pub mod error;
pub mod marker;
pub mod script;
pub mod server;
pub mod tool_registry;

pub use config::DbgConfig;
pub use dbg::DbgController;
pub use error::ToolError;
pub use server::X64DbgMcpServer;
pub use tool_registry::{ToolCategory, ToolInfo, TOOL_REGISTRY};
