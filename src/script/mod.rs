//! Script generation and materialization.
//!
//! The server never talks to x64dbg directly; it renders small Python
//! scripts for the debugger's scripting plugin and drops them into a
//! well-known directory. Everything that enters a rendered script goes
//! through one encoder (`encode`) so quoting and hex validation live in a
//! single place instead of being repeated per catalog entry.

pub mod encode;
pub mod store;
pub mod template;

pub use store::{ScriptKind, ScriptStore};
pub use template::DbgScript;
