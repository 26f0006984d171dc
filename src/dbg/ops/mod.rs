//! The operation catalog.
//!
//! Free functions grouped by domain, all taking a [`DbgController`] and
//! returning an envelope [`Value`]. Parameter validation happens here,
//! before any script file is written; invalid input never reaches disk.

pub mod advanced;
pub mod analysis;
pub mod bookmarks;
pub mod breakpoints;
pub mod debug_control;
pub mod info;
pub mod memory;
pub mod modify;
pub mod process;
pub mod registers;
pub mod threads;
pub mod utility;

use crate::addr;
use crate::error::ToolError;

/// Parse an address string and return it with its canonical `0x` form.
pub(crate) fn canon_addr(address: &str) -> Result<(u64, String), ToolError> {
    let value = addr::parse_address(address)?;
    Ok((value, format!("{value:#x}")))
}
