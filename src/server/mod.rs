//! MCP server implementation with x64dbg tools.

mod requests;

pub use requests::*;

use crate::dbg::{ops, DbgController};
use crate::error::ToolError;
use crate::tool_registry::{self, ToolCategory};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo, Tool},
    schemars::{schema_for, JsonSchema},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// MCP server that drives x64dbg through generated scripts
#[derive(Clone)]
pub struct X64DbgMcpServer {
    controller: Arc<DbgController>,
    tool_mux: ToolMux<X64DbgMcpServer>,
}

#[derive(Clone)]
struct ToolMux<S> {
    call_router: ToolRouter<S>,
}

impl<S> ToolMux<S>
where
    S: Send + Sync + 'static,
{
    fn new(call_router: ToolRouter<S>) -> Self {
        Self { call_router }
    }

    async fn call(
        &self,
        context: ToolCallContext<'_, S>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.call_router.call(context).await
    }

    fn get(&self, name: &str) -> Option<&Tool> {
        self.call_router.get(name)
    }

    fn list_all(&self) -> Vec<Tool> {
        let mut tools = Vec::new();
        for info in tool_registry::all_tools() {
            if let Some(route) = self.call_router.map.get(info.name) {
                tools.push(route.attr.clone());
            }
        }
        tools
    }
}

impl X64DbgMcpServer {
    pub fn new(controller: Arc<DbgController>) -> Self {
        info!("Creating x64dbg MCP server");
        let call_router = Self::tool_router();
        Self {
            controller,
            tool_mux: ToolMux::new(call_router),
        }
    }

    fn instructions(&self) -> String {
        "x64dbg debugging server for Windows binary analysis. \
         \n\nThe server does not talk to x64dbg directly: every operation renders a Python \
         script for the x64dbg scripting plugin and drops it into a shared directory; the \
         plugin runs it inside the debugger and the script reports back via an MCP_RESULT \
         marker. Success envelopes therefore confirm that a script was created, not that the \
         debugger has already executed it. \
         \n\nWorkflow: \
         \n1. load_file or attach_process: get a target under the debugger \
         \n2. tool_catalog: Discover tools for your task (e.g., 'watch memory writes') \
         \n3. tool_help: Get full docs for a specific tool \
         \n4. Use the discovered tools; execute_command covers anything without a dedicated tool \
         \n\nNote: tools/list exposes the full tool set by default; use tool_catalog/tool_help to discover usage. \
         \n\nTool Categories: \
         \n- core: execute_command, tool_catalog, tool_help \
         \n- breakpoints: software/hardware/conditional breakpoints, watchpoints, batches \
         \n- memory: read/write/search/dump/protect/allocate, batch reads \
         \n- registers: get/set CPU registers \
         \n- threads: list/switch/suspend/resume, thread context \
         \n- process: attach/detach, debugger_status \
         \n- debug_control: step/run/pause, tracing, profiling \
         \n- information: modules, stack, memory map, strings, imports/exports \
         \n- analysis: disassemble, resolve_symbol, view_structure, expressions \
         \n- editing: patches, inject_code, inject_dll \
         \n- advanced: bypass_antidebug, exceptions, log capture \
         \n- bookmarks, utility: named addresses, address math, script files \
         \n\nTip: Use tool_catalog(query='what you want to do') to find the right tool."
            .to_string()
    }

    /// Render an operation outcome as a tool result. Domain errors become
    /// error results with the envelope contract, not protocol errors.
    fn envelope(outcome: Result<Value, ToolError>) -> Result<CallToolResult, McpError> {
        match outcome {
            Ok(value) => Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
            )])),
            Err(e) => Ok(e.to_tool_result()),
        }
    }
}

// Tool implementations using the #[tool_router] attribute

#[tool_router]
impl X64DbgMcpServer {
    // === CORE ===

    #[tool(
        description = "Run an arbitrary x64dbg command via a generated script. \
        With auto_execute=true (default) the script is picked up by the scripting plugin; \
        otherwise load it manually via File -> Script -> Load. \
        The success envelope confirms script creation, not debugger execution. \
        Use this when no dedicated tool covers the command."
    )]
    #[instrument(skip(self), fields(command = %req.command))]
    async fn execute_command(
        &self,
        Parameters(req): Parameters<ExecuteCommandRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: execute_command");
        Self::envelope(self.controller.execute_command(
            &req.command,
            req.auto_execute.unwrap_or(true),
            req.parse_result.unwrap_or(true),
        ))
    }

    #[tool(
        description = "Run a command through the x64dbg executable (-script) and capture its \
        output, with a 10 second timeout. Blocks on the debugger process; prefer \
        execute_command unless you need the captured output synchronously."
    )]
    #[instrument(skip(self), fields(command = %req.command))]
    async fn execute_command_direct(
        &self,
        Parameters(req): Parameters<ExecuteCommandDirectRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: execute_command_direct");
        Self::envelope(
            self.controller
                .execute_command_direct(&req.command, req.parse_result.unwrap_or(true))
                .await,
        )
    }

    #[tool(description = "Discover available tools by query or category. \
        Use this to find the right tool for your task before calling tool_help for full details.")]
    #[instrument(skip(self))]
    async fn tool_catalog(
        &self,
        Parameters(req): Parameters<ToolCatalogRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: tool_catalog");
        let limit = req.limit.unwrap_or(7).min(15);

        // If category specified, list tools in that category
        if let Some(cat_str) = &req.category {
            if let Ok(cat) = cat_str.parse::<ToolCategory>() {
                let tools: Vec<_> = tool_registry::tools_by_category(cat)
                    .take(limit)
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.short_desc,
                            "category": t.category.as_str(),
                        })
                    })
                    .collect();

                return Ok(CallToolResult::success(vec![Content::text(
                    serde_json::to_string_pretty(&json!({
                        "category": cat.as_str(),
                        "category_description": cat.description(),
                        "tools": tools,
                        "hint": "Use tool_help(name) for full documentation and examples"
                    }))
                    .unwrap(),
                )]));
            }
        }

        // If query specified, search for matching tools
        if let Some(query) = &req.query {
            let results = tool_registry::search_tools(query, limit);
            let tools: Vec<_> = results
                .iter()
                .map(|(t, keywords)| {
                    json!({
                        "name": t.name,
                        "description": t.short_desc,
                        "category": t.category.as_str(),
                        "matched": keywords,
                    })
                })
                .collect();

            return Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&json!({
                    "query": query,
                    "tools": tools,
                    "hint": "Use tool_help(name) for full documentation and examples"
                }))
                .unwrap(),
            )]));
        }

        // No query or category - list all categories
        let categories: Vec<_> = ToolCategory::all()
            .iter()
            .map(|c| {
                let count = tool_registry::tools_by_category(*c).count();
                json!({
                    "category": c.as_str(),
                    "description": c.description(),
                    "tool_count": count,
                })
            })
            .collect();

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&json!({
                "categories": categories,
                "hint": "Use tool_catalog(category='...') to list tools in a category, or tool_catalog(query='...') to search. tools/list already includes all tools."
            }))
            .unwrap(),
        )]))
    }

    #[tool(
        description = "Get full documentation for a tool including description, parameters schema, and example."
    )]
    #[instrument(skip(self))]
    async fn tool_help(
        &self,
        Parameters(req): Parameters<ToolHelpRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: tool_help for {}", req.name);

        if let Some(tool) = tool_registry::get_tool(&req.name) {
            let params = tool_params_schema(&req.name);
            Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&json!({
                    "name": tool.name,
                    "category": tool.category.as_str(),
                    "description": tool.full_desc,
                    "parameters": params,
                    "example": tool.example,
                    "keywords": tool.keywords,
                }))
                .unwrap(),
            )]))
        } else {
            // Suggest similar tools
            let suggestions = tool_registry::search_tools(&req.name, 3);
            let suggestion_names: Vec<_> = suggestions.iter().map(|(t, _)| t.name).collect();

            Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&json!({
                    "error": format!("Tool '{}' not found", req.name),
                    "suggestions": suggestion_names,
                    "hint": "Use tool_catalog to discover available tools"
                }))
                .unwrap(),
            )]))
        }
    }

    // === BREAKPOINTS ===

    #[tool(description = "Set a software (INT3) breakpoint at an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn set_breakpoint(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_breakpoint");
        Self::envelope(ops::breakpoints::set_breakpoint(&self.controller, &req.address))
    }

    #[tool(description = "Remove the software breakpoint at an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn remove_breakpoint(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: remove_breakpoint");
        Self::envelope(ops::breakpoints::remove_breakpoint(&self.controller, &req.address))
    }

    #[tool(description = "Re-enable a disabled breakpoint.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn enable_breakpoint(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: enable_breakpoint");
        Self::envelope(ops::breakpoints::enable_breakpoint(&self.controller, &req.address))
    }

    #[tool(description = "Disable a breakpoint without removing it from the list.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn disable_breakpoint(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: disable_breakpoint");
        Self::envelope(ops::breakpoints::disable_breakpoint(&self.controller, &req.address))
    }

    #[tool(description = "List all breakpoints with their state.")]
    #[instrument(skip(self))]
    async fn list_breakpoints(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_breakpoints");
        Self::envelope(ops::breakpoints::list_breakpoints(&self.controller))
    }

    #[tool(description = "Set a breakpoint that only breaks when a condition expression is \
        true (x64dbg expression syntax, e.g. 'eax == 1'). Empty condition sets a plain breakpoint.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn set_conditional_breakpoint(
        &self,
        Parameters(req): Parameters<ConditionalBreakpointRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_conditional_breakpoint");
        Self::envelope(ops::breakpoints::set_conditional_breakpoint(
            &self.controller,
            &req.address,
            req.condition.as_deref().unwrap_or(""),
        ))
    }

    #[tool(description = "Get the hit count of the breakpoint at an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn breakpoint_hit_count(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: breakpoint_hit_count");
        Self::envelope(ops::breakpoints::breakpoint_hit_count(&self.controller, &req.address))
    }

    #[tool(description = "Reset the hit counter of the breakpoint at an address to zero.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn reset_breakpoint_hit_count(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: reset_breakpoint_hit_count");
        Self::envelope(ops::breakpoints::reset_breakpoint_hit_count(
            &self.controller,
            &req.address,
        ))
    }

    #[tool(description = "Set a hardware breakpoint (CPU debug register). \
        bp_type: execute, write, read, readwrite. size: 1, 2, 4, or 8 bytes. \
        At most four hardware breakpoints can be active.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn set_hardware_breakpoint(
        &self,
        Parameters(req): Parameters<HardwareBreakpointRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_hardware_breakpoint");
        Self::envelope(ops::breakpoints::set_hardware_breakpoint(
            &self.controller,
            &req.address,
            req.bp_type.as_deref().unwrap_or("execute"),
            req.size.unwrap_or(1),
        ))
    }

    #[tool(description = "Remove the hardware breakpoint at an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn remove_hardware_breakpoint(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: remove_hardware_breakpoint");
        Self::envelope(ops::breakpoints::remove_hardware_breakpoint(
            &self.controller,
            &req.address,
        ))
    }

    #[tool(description = "Watch an address for data access (hardware breakpoint on \
        read/write/readwrite). size: 1, 2, 4, or 8 bytes.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn set_watchpoint(
        &self,
        Parameters(req): Parameters<WatchpointRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_watchpoint");
        Self::envelope(ops::breakpoints::set_watchpoint(
            &self.controller,
            &req.address,
            req.watch_type.as_deref().unwrap_or("readwrite"),
            req.size.unwrap_or(4),
        ))
    }

    #[tool(description = "Remove the watchpoint at an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn remove_watchpoint(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: remove_watchpoint");
        Self::envelope(ops::breakpoints::remove_watchpoint(&self.controller, &req.address))
    }

    #[tool(description = "Set software breakpoints at up to 1000 addresses in one call. \
        Returns per-address results; overall status is 'partial' if any slot failed.")]
    #[instrument(skip(self), fields(count = req.addresses.len()))]
    async fn batch_set_breakpoints(
        &self,
        Parameters(req): Parameters<BatchAddressesRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: batch_set_breakpoints");
        Self::envelope(ops::breakpoints::batch_set_breakpoints(
            &self.controller,
            &req.addresses,
        ))
    }

    #[tool(description = "Remove software breakpoints at up to 1000 addresses in one call, \
        with per-address results.")]
    #[instrument(skip(self), fields(count = req.addresses.len()))]
    async fn batch_remove_breakpoints(
        &self,
        Parameters(req): Parameters<BatchAddressesRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: batch_remove_breakpoints");
        Self::envelope(ops::breakpoints::batch_remove_breakpoints(
            &self.controller,
            &req.addresses,
        ))
    }

    // === MEMORY ===

    #[tool(description = "Read up to 4096 bytes of memory at an address as a hex dump.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn read_memory(
        &self,
        Parameters(req): Parameters<ReadMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: read_memory");
        Self::envelope(ops::memory::read_memory(
            &self.controller,
            &req.address,
            req.size.unwrap_or(ops::memory::DEFAULT_READ_SIZE),
        ))
    }

    #[tool(description = "Write hex bytes to memory. Separators and 0x prefixes in the data \
        string are tolerated, e.g. '90 90 0xCC'.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn write_memory(
        &self,
        Parameters(req): Parameters<WriteMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: write_memory");
        Self::envelope(ops::memory::write_memory(&self.controller, &req.address, &req.data))
    }

    #[tool(description = "Search memory for a byte pattern (?? wildcards supported). \
        start/end bound the search only when both are given.")]
    #[instrument(skip(self))]
    async fn search_memory(
        &self,
        Parameters(req): Parameters<SearchMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: search_memory");
        Self::envelope(ops::memory::search_memory(
            &self.controller,
            &req.pattern,
            req.start.as_deref(),
            req.end.as_deref(),
        ))
    }

    #[tool(description = "Dump a memory region to a binary file on the debugger host. \
        Default output: dump_<addr>_<size>.bin in the script directory.")]
    #[instrument(skip(self), fields(address = %req.address, size = req.size))]
    async fn dump_memory(
        &self,
        Parameters(req): Parameters<DumpMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: dump_memory");
        Self::envelope(ops::memory::dump_memory(
            &self.controller,
            &req.address,
            req.size,
            req.output_file.as_deref(),
        ))
    }

    #[tool(description = "Change page protection of a region. protection: R, RW, X, RX, RWX, or NONE.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn set_memory_protection(
        &self,
        Parameters(req): Parameters<MemoryProtectionRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_memory_protection");
        Self::envelope(ops::memory::set_memory_protection(
            &self.controller,
            &req.address,
            req.size,
            &req.protection,
        ))
    }

    #[tool(description = "Query the page protection of the region containing an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn get_memory_protection(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: get_memory_protection");
        Self::envelope(ops::memory::get_memory_protection(&self.controller, &req.address))
    }

    #[tool(description = "Compare two memory regions byte by byte; reports at most the first \
        100 differing offsets.")]
    #[instrument(skip(self))]
    async fn compare_memory(
        &self,
        Parameters(req): Parameters<CompareMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: compare_memory");
        Self::envelope(ops::memory::compare_memory(
            &self.controller,
            &req.address1,
            &req.address2,
            req.size,
        ))
    }

    #[tool(description = "Fill a memory region with a byte value (0-255, default 0x90 NOP).")]
    #[instrument(skip(self), fields(address = %req.address, size = req.size))]
    async fn fill_memory(
        &self,
        Parameters(req): Parameters<FillMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: fill_memory");
        Self::envelope(ops::memory::fill_memory(
            &self.controller,
            &req.address,
            req.size,
            req.value.unwrap_or(0x90),
        ))
    }

    #[tool(description = "Allocate memory in the target (max 100 MB). protection defaults to RWX.")]
    #[instrument(skip(self), fields(size = req.size))]
    async fn allocate_memory(
        &self,
        Parameters(req): Parameters<AllocateMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: allocate_memory");
        Self::envelope(ops::memory::allocate_memory(
            &self.controller,
            req.size,
            req.protection.as_deref().unwrap_or("RWX"),
        ))
    }

    #[tool(description = "Free a region previously allocated with allocate_memory.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn free_memory(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: free_memory");
        Self::envelope(ops::memory::free_memory(&self.controller, &req.address))
    }

    #[tool(description = "Get base, size, state, and protection of the region containing an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn memory_region_info(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: memory_region_info");
        Self::envelope(ops::memory::memory_region_info(&self.controller, &req.address))
    }

    #[tool(description = "Read memory at up to 100 addresses in one call. sizes, when given, \
        must match addresses in length (default 64 bytes each). Per-address results.")]
    #[instrument(skip(self), fields(count = req.addresses.len()))]
    async fn batch_read_memory(
        &self,
        Parameters(req): Parameters<BatchReadMemoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: batch_read_memory");
        Self::envelope(ops::memory::batch_read_memory(
            &self.controller,
            &req.addresses,
            req.sizes.as_deref(),
        ))
    }

    // === REGISTERS ===

    #[tool(description = "Show the full register dump of the current thread.")]
    #[instrument(skip(self))]
    async fn get_registers(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: get_registers");
        Self::envelope(ops::registers::get_registers(&self.controller))
    }

    #[tool(description = "Set a CPU register of the current thread. Accepts 64/32/16/8-bit \
        register names and flag bits; value may be hex or decimal.")]
    #[instrument(skip(self), fields(name = %req.name))]
    async fn set_register(
        &self,
        Parameters(req): Parameters<SetRegisterRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_register");
        Self::envelope(ops::registers::set_register(&self.controller, &req.name, &req.value))
    }

    #[tool(description = "Set multiple registers from a name-to-value map. Invalid entries \
        fail their slot; overall status becomes 'partial'.")]
    #[instrument(skip(self), fields(count = req.registers.len()))]
    async fn set_registers(
        &self,
        Parameters(req): Parameters<SetRegistersRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_registers");
        Self::envelope(ops::registers::set_registers(&self.controller, &req.registers))
    }

    // === THREADS ===

    #[tool(description = "List all threads of the debugged process.")]
    #[instrument(skip(self))]
    async fn list_threads(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_threads");
        Self::envelope(ops::threads::list_threads(&self.controller))
    }

    #[tool(description = "Make a thread the debugger's current thread.")]
    #[instrument(skip(self), fields(thread_id = req.thread_id))]
    async fn switch_thread(
        &self,
        Parameters(req): Parameters<ThreadRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: switch_thread");
        Self::envelope(ops::threads::switch_thread(&self.controller, req.thread_id))
    }

    #[tool(description = "Suspend a thread.")]
    #[instrument(skip(self), fields(thread_id = req.thread_id))]
    async fn suspend_thread(
        &self,
        Parameters(req): Parameters<ThreadRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: suspend_thread");
        Self::envelope(ops::threads::suspend_thread(&self.controller, req.thread_id))
    }

    #[tool(description = "Resume a suspended thread.")]
    #[instrument(skip(self), fields(thread_id = req.thread_id))]
    async fn resume_thread(
        &self,
        Parameters(req): Parameters<ThreadRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: resume_thread");
        Self::envelope(ops::threads::resume_thread(&self.controller, req.thread_id))
    }

    #[tool(description = "Get the register context of a thread without switching to it.")]
    #[instrument(skip(self), fields(thread_id = req.thread_id))]
    async fn thread_context(
        &self,
        Parameters(req): Parameters<ThreadRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: thread_context");
        Self::envelope(ops::threads::thread_context(&self.controller, req.thread_id))
    }

    // === PROCESS ===

    #[tool(description = "Report debugger state: debugging/running flags, current pid, tid, \
        and instruction address.")]
    #[instrument(skip(self))]
    async fn debugger_status(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: debugger_status");
        Self::envelope(ops::process::debugger_status(&self.controller))
    }

    #[tool(description = "Attach the debugger to a running process by pid.")]
    #[instrument(skip(self), fields(pid = req.pid))]
    async fn attach_process(
        &self,
        Parameters(req): Parameters<AttachProcessRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: attach_process");
        Self::envelope(ops::process::attach_process(&self.controller, req.pid))
    }

    #[tool(description = "Detach from the debugged process, leaving it running.")]
    #[instrument(skip(self))]
    async fn detach_process(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: detach_process");
        Self::envelope(ops::process::detach_process(&self.controller))
    }

    // === DEBUG CONTROL ===

    #[tool(description = "Execute one instruction, stepping over calls.")]
    #[instrument(skip(self))]
    async fn step_over(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: step_over");
        Self::envelope(ops::debug_control::step_over(&self.controller))
    }

    #[tool(description = "Execute one instruction, following calls into the callee.")]
    #[instrument(skip(self))]
    async fn step_into(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: step_into");
        Self::envelope(ops::debug_control::step_into(&self.controller))
    }

    #[tool(description = "Resume the target until the next breakpoint or exception.")]
    #[instrument(skip(self))]
    async fn run(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: run");
        Self::envelope(ops::debug_control::run(&self.controller))
    }

    #[tool(description = "Break into the running target.")]
    #[instrument(skip(self))]
    async fn pause(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: pause");
        Self::envelope(ops::debug_control::pause(&self.controller))
    }

    #[tool(description = "Start recording an instruction trace.")]
    #[instrument(skip(self))]
    async fn start_trace(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: start_trace");
        Self::envelope(ops::debug_control::start_trace(&self.controller))
    }

    #[tool(description = "Stop the running instruction trace.")]
    #[instrument(skip(self))]
    async fn stop_trace(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: stop_trace");
        Self::envelope(ops::debug_control::stop_trace(&self.controller))
    }

    #[tool(description = "Fetch up to 10000 recorded trace entries (default: 100).")]
    #[instrument(skip(self))]
    async fn trace_records(
        &self,
        Parameters(req): Parameters<CountRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: trace_records");
        Self::envelope(ops::debug_control::trace_records(
            &self.controller,
            req.count.unwrap_or(ops::debug_control::DEFAULT_TRACE_RECORDS),
        ))
    }

    #[tool(description = "Start collecting execution profile data.")]
    #[instrument(skip(self))]
    async fn start_profiling(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: start_profiling");
        Self::envelope(ops::debug_control::start_profiling(&self.controller))
    }

    #[tool(description = "Stop the running profiling session.")]
    #[instrument(skip(self))]
    async fn stop_profiling(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: stop_profiling");
        Self::envelope(ops::debug_control::stop_profiling(&self.controller))
    }

    #[tool(description = "Fetch the collected profiling data.")]
    #[instrument(skip(self))]
    async fn profiling_results(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: profiling_results");
        Self::envelope(ops::debug_control::profiling_results(&self.controller))
    }

    // === INFORMATION ===

    #[tool(description = "List all modules loaded in the debugged process.")]
    #[instrument(skip(self))]
    async fn list_modules(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_modules");
        Self::envelope(ops::info::list_modules(&self.controller))
    }

    #[tool(description = "Show up to 50 entries from the current thread's stack (default: 16).")]
    #[instrument(skip(self))]
    async fn get_stack(
        &self,
        Parameters(req): Parameters<CountRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: get_stack");
        Self::envelope(ops::info::get_stack(&self.controller, req.count.unwrap_or(16)))
    }

    #[tool(description = "Walk the call stack of the current thread (max depth 100, default 20).")]
    #[instrument(skip(self))]
    async fn get_call_stack(
        &self,
        Parameters(req): Parameters<CallStackRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: get_call_stack");
        Self::envelope(ops::info::get_call_stack(&self.controller, req.depth.unwrap_or(20)))
    }

    #[tool(description = "Show all memory regions of the debugged process with protections.")]
    #[instrument(skip(self))]
    async fn memory_map(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: memory_map");
        Self::envelope(ops::info::memory_map(&self.controller))
    }

    #[tool(description = "Scan for referenced strings of at least min_length characters (default 4).")]
    #[instrument(skip(self))]
    async fn list_strings(
        &self,
        Parameters(req): Parameters<ListStringsRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_strings");
        Self::envelope(ops::info::list_strings(
            &self.controller,
            req.min_length.unwrap_or(ops::info::DEFAULT_STRING_MIN_LENGTH),
        ))
    }

    #[tool(description = "Find all cross-references pointing to an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn xrefs(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: xrefs");
        Self::envelope(ops::info::xrefs(&self.controller, &req.address))
    }

    #[tool(description = "List the import table of the main module.")]
    #[instrument(skip(self))]
    async fn list_imports(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_imports");
        Self::envelope(ops::info::list_imports(&self.controller))
    }

    #[tool(description = "List the export table of the main module.")]
    #[instrument(skip(self))]
    async fn list_exports(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_exports");
        Self::envelope(ops::info::list_exports(&self.controller))
    }

    // === ANALYSIS ===

    #[tool(description = "Disassemble up to 100 instructions at an address (default: 10).")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn disassemble(
        &self,
        Parameters(req): Parameters<DisassembleRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: disassemble");
        Self::envelope(ops::analysis::disassemble(
            &self.controller,
            &req.address,
            req.count.unwrap_or(10),
        ))
    }

    #[tool(description = "Resolve a symbol like 'kernel32.LoadLibraryA' to its address.")]
    #[instrument(skip(self), fields(symbol = %req.symbol))]
    async fn resolve_symbol(
        &self,
        Parameters(req): Parameters<ResolveSymbolRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: resolve_symbol");
        Self::envelope(ops::analysis::resolve_symbol(&self.controller, &req.symbol))
    }

    #[tool(description = "Decode a known structure at an address. PEB and TEB are decoded \
        field by field (64-bit offsets); other names go to the debugger's struct viewer.")]
    #[instrument(skip(self), fields(address = %req.address, structure = %req.structure_type))]
    async fn view_structure(
        &self,
        Parameters(req): Parameters<ViewStructureRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: view_structure");
        Self::envelope(ops::analysis::view_structure(
            &self.controller,
            &req.address,
            &req.structure_type,
        ))
    }

    #[tool(description = "Evaluate an expression in x64dbg syntax, e.g. '[rsp+8]'.")]
    #[instrument(skip(self))]
    async fn evaluate_expression(
        &self,
        Parameters(req): Parameters<EvaluateExpressionRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: evaluate_expression");
        Self::envelope(ops::analysis::evaluate_expression(&self.controller, &req.expression))
    }

    #[tool(description = "List function boundaries found by x64dbg's analysis.")]
    #[instrument(skip(self))]
    async fn list_functions(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_functions");
        Self::envelope(ops::analysis::list_functions(&self.controller))
    }

    #[tool(description = "List user and automatic labels.")]
    #[instrument(skip(self))]
    async fn list_labels(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_labels");
        Self::envelope(ops::analysis::list_labels(&self.controller))
    }

    #[tool(description = "List comments, optionally restricted to one address.")]
    #[instrument(skip(self))]
    async fn get_comments(
        &self,
        Parameters(req): Parameters<CommentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: get_comments");
        Self::envelope(ops::analysis::get_comments(
            &self.controller,
            req.address.as_deref(),
        ))
    }

    // === EDITING ===

    #[tool(description = "Write a byte patch at an address and register it in the patch list.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn apply_patch(
        &self,
        Parameters(req): Parameters<ApplyPatchRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: apply_patch");
        Self::envelope(ops::modify::apply_patch(
            &self.controller,
            &req.address,
            &req.data,
            req.description.as_deref().unwrap_or(""),
        ))
    }

    #[tool(description = "Restore the original bytes at a patched address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn remove_patch(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: remove_patch");
        Self::envelope(ops::modify::remove_patch(&self.controller, &req.address))
    }

    #[tool(description = "List all patches currently applied to the target.")]
    #[instrument(skip(self))]
    async fn list_patches(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_patches");
        Self::envelope(ops::modify::list_patches(&self.controller))
    }

    #[tool(description = "Write shellcode into the target. Without an address a buffer is \
        allocated first; create_thread=true starts a thread at the code.")]
    #[instrument(skip(self))]
    async fn inject_code(
        &self,
        Parameters(req): Parameters<InjectCodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: inject_code");
        Self::envelope(ops::modify::inject_code(
            &self.controller,
            req.address.as_deref(),
            &req.shellcode,
            req.create_thread.unwrap_or(false),
        ))
    }

    #[tool(description = "Inject a DLL into the debugged process (scripting API or a \
        LoadLibraryA remote thread).")]
    #[instrument(skip(self), fields(dll_path = %req.dll_path))]
    async fn inject_dll(
        &self,
        Parameters(req): Parameters<InjectDllRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: inject_dll");
        Self::envelope(ops::modify::inject_dll(&self.controller, &req.dll_path))
    }

    #[tool(description = "Unload a DLL from the target by module name (FreeLibrary remote thread).")]
    #[instrument(skip(self), fields(dll_name = %req.dll_name))]
    async fn eject_dll(
        &self,
        Parameters(req): Parameters<EjectDllRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: eject_dll");
        Self::envelope(ops::modify::eject_dll(&self.controller, &req.dll_name))
    }

    // === ADVANCED ===

    #[tool(description = "Patch common anti-debug tells. method: all, peb (clear \
        PEB.BeingDebugged), ntquery (hook NtQueryInformationProcess), or debugport \
        (clear NtGlobalFlag). Returns per-technique outcomes.")]
    #[instrument(skip(self))]
    async fn bypass_antidebug(
        &self,
        Parameters(req): Parameters<BypassAntidebugRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: bypass_antidebug");
        Self::envelope(ops::advanced::bypass_antidebug(
            &self.controller,
            req.method.as_deref().unwrap_or("all"),
        ))
    }

    #[tool(description = "Configure how the debugger reacts to an exception code. \
        action: ignore, handle, or log.")]
    #[instrument(skip(self), fields(code = req.exception_code))]
    async fn set_exception_handler(
        &self,
        Parameters(req): Parameters<ExceptionHandlerRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: set_exception_handler");
        Self::envelope(ops::advanced::set_exception_handler(
            &self.controller,
            req.exception_code,
            &req.action,
        ))
    }

    #[tool(description = "Return details of the most recent exception in the target.")]
    #[instrument(skip(self))]
    async fn exception_info(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: exception_info");
        Self::envelope(ops::advanced::exception_info(&self.controller))
    }

    #[tool(description = "Fetch up to 10000 recent lines from the x64dbg log (default: 100).")]
    #[instrument(skip(self))]
    async fn debugger_logs(
        &self,
        Parameters(req): Parameters<CountRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: debugger_logs");
        Self::envelope(ops::advanced::debugger_logs(
            &self.controller,
            req.count.unwrap_or(ops::advanced::DEFAULT_LOG_LINES),
        ))
    }

    #[tool(description = "Run an x64dbg command with output capture and marker parsing forced on.")]
    #[instrument(skip(self), fields(command = %req.command))]
    async fn capture_output(
        &self,
        Parameters(req): Parameters<CaptureOutputRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: capture_output");
        Self::envelope(ops::advanced::capture_output(&self.controller, &req.command))
    }

    // === BOOKMARKS ===

    #[tool(description = "Add a named bookmark at an address. Empty name defaults to the address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn add_bookmark(
        &self,
        Parameters(req): Parameters<AddBookmarkRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: add_bookmark");
        Self::envelope(ops::bookmarks::add_bookmark(
            &self.controller,
            &req.address,
            req.name.as_deref().unwrap_or(""),
        ))
    }

    #[tool(description = "Remove the bookmark at an address.")]
    #[instrument(skip(self), fields(address = %req.address))]
    async fn remove_bookmark(
        &self,
        Parameters(req): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: remove_bookmark");
        Self::envelope(ops::bookmarks::remove_bookmark(&self.controller, &req.address))
    }

    #[tool(description = "List all bookmarks with names and addresses.")]
    #[instrument(skip(self))]
    async fn list_bookmarks(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_bookmarks");
        Self::envelope(ops::bookmarks::list_bookmarks(&self.controller))
    }

    #[tool(description = "Look up a bookmark by name and return its address.")]
    #[instrument(skip(self), fields(name = %req.name))]
    async fn goto_bookmark(
        &self,
        Parameters(req): Parameters<GotoBookmarkRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: goto_bookmark");
        Self::envelope(ops::bookmarks::goto_bookmark(&self.controller, &req.name))
    }

    // === UTILITY ===

    #[tool(description = "Load an executable into x64dbg for debugging. The path must exist \
        on the debugger host.")]
    #[instrument(skip(self), fields(file_path = %req.file_path))]
    async fn load_file(
        &self,
        Parameters(req): Parameters<LoadFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: load_file");
        Self::envelope(ops::utility::load_file(&self.controller, &req.file_path))
    }

    #[tool(description = "Dump a memory region to an explicit file path on the debugger host.")]
    #[instrument(skip(self), fields(address = %req.address, size = req.size))]
    async fn save_memory_to_file(
        &self,
        Parameters(req): Parameters<SaveMemoryToFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: save_memory_to_file");
        Self::envelope(ops::utility::save_memory_to_file(
            &self.controller,
            &req.address,
            req.size,
            &req.output_file,
        ))
    }

    #[tool(description = "Compute base + offset with overflow checking. Negative offsets \
        subtract. Works without a debugger.")]
    #[instrument(skip(self))]
    async fn calculate_address(
        &self,
        Parameters(req): Parameters<CalculateAddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: calculate_address");
        Self::envelope(ops::utility::calculate_address(&req.base, req.offset))
    }

    #[tool(description = "Re-format an address as hex, decimal, octal, or binary. Unknown \
        formats fall back to hex. Works without a debugger.")]
    #[instrument(skip(self))]
    async fn format_address(
        &self,
        Parameters(req): Parameters<FormatAddressRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: format_address");
        Self::envelope(ops::utility::format_address(
            &req.address,
            req.format_type.as_deref().unwrap_or("hex"),
        ))
    }

    #[tool(description = "Write a script body to an explicit path on this host for later reuse.")]
    #[instrument(skip(self), fields(file_path = %req.file_path))]
    async fn save_script(
        &self,
        Parameters(req): Parameters<SaveScriptRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: save_script");
        Self::envelope(ops::utility::save_script(&req.file_path, &req.content))
    }

    #[tool(description = "Read a previously saved script file and return its content.")]
    #[instrument(skip(self), fields(file_path = %req.file_path))]
    async fn load_script(
        &self,
        Parameters(req): Parameters<LoadScriptRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: load_script");
        Self::envelope(ops::utility::load_script(&req.file_path))
    }

    #[tool(description = "List the most recently generated script files, newest first \
        (max 100, default 20).")]
    #[instrument(skip(self))]
    async fn script_history(
        &self,
        Parameters(req): Parameters<CountRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: script_history");
        Self::envelope(ops::utility::script_history(
            &self.controller,
            req.count.unwrap_or(ops::utility::DEFAULT_HISTORY_ENTRIES),
        ))
    }

    #[tool(description = "Save the current x64dbg configuration under a named slot.")]
    #[instrument(skip(self), fields(name = %req.name))]
    async fn save_config(
        &self,
        Parameters(req): Parameters<ConfigNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: save_config");
        Self::envelope(ops::utility::save_config(&self.controller, &req.name))
    }

    #[tool(description = "Restore a previously saved configuration by name.")]
    #[instrument(skip(self), fields(name = %req.name))]
    async fn load_config(
        &self,
        Parameters(req): Parameters<ConfigNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: load_config");
        Self::envelope(ops::utility::load_config(&self.controller, &req.name))
    }

    #[tool(description = "List all saved configuration names.")]
    #[instrument(skip(self))]
    async fn list_configs(
        &self,
        Parameters(_req): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool call: list_configs");
        Self::envelope(ops::utility::list_configs(&self.controller))
    }
}

fn tool_params_schema(name: &str) -> Option<Value> {
    fn schema<T: JsonSchema>() -> Value {
        serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({}))
    }

    match name {
        // Core
        "execute_command" => Some(schema::<ExecuteCommandRequest>()),
        "execute_command_direct" => Some(schema::<ExecuteCommandDirectRequest>()),
        "tool_catalog" => Some(schema::<ToolCatalogRequest>()),
        "tool_help" => Some(schema::<ToolHelpRequest>()),

        // Breakpoints
        "set_breakpoint" | "remove_breakpoint" | "enable_breakpoint" | "disable_breakpoint"
        | "breakpoint_hit_count" | "reset_breakpoint_hit_count"
        | "remove_hardware_breakpoint" | "remove_watchpoint" => Some(schema::<AddressRequest>()),
        "list_breakpoints" => Some(schema::<EmptyParams>()),
        "set_conditional_breakpoint" => Some(schema::<ConditionalBreakpointRequest>()),
        "set_hardware_breakpoint" => Some(schema::<HardwareBreakpointRequest>()),
        "set_watchpoint" => Some(schema::<WatchpointRequest>()),
        "batch_set_breakpoints" | "batch_remove_breakpoints" => {
            Some(schema::<BatchAddressesRequest>())
        }

        // Memory
        "read_memory" => Some(schema::<ReadMemoryRequest>()),
        "write_memory" => Some(schema::<WriteMemoryRequest>()),
        "search_memory" => Some(schema::<SearchMemoryRequest>()),
        "dump_memory" => Some(schema::<DumpMemoryRequest>()),
        "set_memory_protection" => Some(schema::<MemoryProtectionRequest>()),
        "get_memory_protection" | "free_memory" | "memory_region_info" => {
            Some(schema::<AddressRequest>())
        }
        "compare_memory" => Some(schema::<CompareMemoryRequest>()),
        "fill_memory" => Some(schema::<FillMemoryRequest>()),
        "allocate_memory" => Some(schema::<AllocateMemoryRequest>()),
        "batch_read_memory" => Some(schema::<BatchReadMemoryRequest>()),

        // Registers
        "get_registers" => Some(schema::<EmptyParams>()),
        "set_register" => Some(schema::<SetRegisterRequest>()),
        "set_registers" => Some(schema::<SetRegistersRequest>()),

        // Threads / Process
        "list_threads" | "debugger_status" | "detach_process" => Some(schema::<EmptyParams>()),
        "switch_thread" | "suspend_thread" | "resume_thread" | "thread_context" => {
            Some(schema::<ThreadRequest>())
        }
        "attach_process" => Some(schema::<AttachProcessRequest>()),

        // Debug control
        "step_over" | "step_into" | "run" | "pause" | "start_trace" | "stop_trace"
        | "start_profiling" | "stop_profiling" | "profiling_results" => {
            Some(schema::<EmptyParams>())
        }
        "trace_records" => Some(schema::<CountRequest>()),

        // Information
        "list_modules" | "memory_map" | "list_imports" | "list_exports" => {
            Some(schema::<EmptyParams>())
        }
        "get_stack" => Some(schema::<CountRequest>()),
        "get_call_stack" => Some(schema::<CallStackRequest>()),
        "list_strings" => Some(schema::<ListStringsRequest>()),
        "xrefs" => Some(schema::<AddressRequest>()),

        // Analysis
        "disassemble" => Some(schema::<DisassembleRequest>()),
        "resolve_symbol" => Some(schema::<ResolveSymbolRequest>()),
        "view_structure" => Some(schema::<ViewStructureRequest>()),
        "evaluate_expression" => Some(schema::<EvaluateExpressionRequest>()),
        "list_functions" | "list_labels" => Some(schema::<EmptyParams>()),
        "get_comments" => Some(schema::<CommentsRequest>()),

        // Editing
        "apply_patch" => Some(schema::<ApplyPatchRequest>()),
        "remove_patch" => Some(schema::<AddressRequest>()),
        "list_patches" => Some(schema::<EmptyParams>()),
        "inject_code" => Some(schema::<InjectCodeRequest>()),
        "inject_dll" => Some(schema::<InjectDllRequest>()),
        "eject_dll" => Some(schema::<EjectDllRequest>()),

        // Advanced
        "bypass_antidebug" => Some(schema::<BypassAntidebugRequest>()),
        "set_exception_handler" => Some(schema::<ExceptionHandlerRequest>()),
        "exception_info" => Some(schema::<EmptyParams>()),
        "debugger_logs" => Some(schema::<CountRequest>()),
        "capture_output" => Some(schema::<CaptureOutputRequest>()),

        // Bookmarks
        "add_bookmark" => Some(schema::<AddBookmarkRequest>()),
        "remove_bookmark" => Some(schema::<AddressRequest>()),
        "list_bookmarks" => Some(schema::<EmptyParams>()),
        "goto_bookmark" => Some(schema::<GotoBookmarkRequest>()),

        // Utility
        "load_file" => Some(schema::<LoadFileRequest>()),
        "save_memory_to_file" => Some(schema::<SaveMemoryToFileRequest>()),
        "calculate_address" => Some(schema::<CalculateAddressRequest>()),
        "format_address" => Some(schema::<FormatAddressRequest>()),
        "save_script" => Some(schema::<SaveScriptRequest>()),
        "load_script" => Some(schema::<LoadScriptRequest>()),
        "script_history" => Some(schema::<CountRequest>()),
        "save_config" | "load_config" => Some(schema::<ConfigNameRequest>()),
        "list_configs" => Some(schema::<EmptyParams>()),

        _ => None,
    }
}

#[tool_handler(router = self.tool_mux)]
impl ServerHandler for X64DbgMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbgConfig;
    use crate::tool_registry::TOOL_REGISTRY;

    fn test_server() -> (tempfile::TempDir, X64DbgMcpServer) {
        let tmp = tempfile::tempdir().unwrap();
        let config = DbgConfig::with_paths(tmp.path().join("x64dbg.exe"), tmp.path());
        let controller = Arc::new(DbgController::new(config));
        (tmp, X64DbgMcpServer::new(controller))
    }

    #[test]
    fn every_registry_entry_has_a_route() {
        let (_tmp, server) = test_server();
        let routed = server.tool_mux.list_all();
        assert_eq!(
            routed.len(),
            TOOL_REGISTRY.len(),
            "registry and router out of sync"
        );
    }

    #[test]
    fn router_resolves_tools_by_name() {
        let (_tmp, server) = test_server();
        for name in ["read_memory", "set_breakpoint", "tool_catalog"] {
            let tool = server.tool_mux.get(name);
            assert_eq!(tool.map(|t| t.name.as_ref()), Some(name));
        }
        assert!(server.tool_mux.get("no_such_tool").is_none());
    }

    #[test]
    fn every_registry_entry_has_a_params_schema() {
        for info in TOOL_REGISTRY {
            assert!(
                tool_params_schema(info.name).is_some(),
                "missing schema for {}",
                info.name
            );
        }
    }

    #[test]
    fn envelope_maps_domain_errors_to_tool_errors() {
        let result =
            X64DbgMcpServer::envelope(Err(ToolError::InvalidAddress("wat".to_string()))).unwrap();
        assert_eq!(result.is_error, Some(true));

        let result = X64DbgMcpServer::envelope(Ok(json!({"status": "success"}))).unwrap();
        assert_ne!(result.is_error, Some(true));
    }
}
