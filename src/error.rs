//! Error types for the x64dbg MCP server.
//!
//! Tool execution errors are returned with `is_error: true` in CallToolResult,
//! while protocol errors (invalid tool name, malformed args) are handled by rmcp.

use rmcp::model::{CallToolResult, Content};
use serde_json::json;
use thiserror::Error;

/// Tool execution errors - returned with is_error: true in CallToolResult
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid tool category: {0}")]
    InvalidToolCategory(String),

    #[error("Invalid tool name: {0}")]
    InvalidToolName(String),

    #[error("x64dbg is not installed or not configured:\n{0}")]
    NotInstalled(String),

    #[error("Failed to write script file: {0}")]
    ScriptWrite(String),

    #[error("Failed to parse script result: {0}")]
    ResultParse(String),

    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Convert to MCP CallToolResult with is_error: true.
    ///
    /// `NotInstalled` additionally carries a machine-readable `error_code`
    /// so callers can distinguish a missing installation from runtime faults.
    pub fn to_tool_result(&self) -> CallToolResult {
        let text = match self {
            ToolError::NotInstalled(_) => json!({
                "status": "error",
                "error_code": "NOT_INSTALLED",
                "message": self.to_string(),
            })
            .to_string(),
            _ => self.to_string(),
        };
        CallToolResult {
            content: vec![Content::text(text)],
            is_error: Some(true),
            meta: None,
            structured_content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ToolError;

    #[test]
    fn not_installed_carries_error_code() {
        let err = ToolError::NotInstalled("set X64DBG_PATH".to_string());
        let result = err.to_tool_result();
        assert_eq!(result.is_error, Some(true));
        let text = result.content[0].as_text().expect("text content");
        assert!(text.text.contains("NOT_INSTALLED"));
        assert!(text.text.contains("X64DBG_PATH"));
    }

    #[test]
    fn plain_errors_render_message_only() {
        let err = ToolError::InvalidAddress("0xzz".to_string());
        let result = err.to_tool_result();
        let text = result.content[0].as_text().expect("text content");
        assert!(text.text.contains("0xzz"));
        assert!(!text.text.contains("error_code"));
    }
}
