//! Tools domain module.
//!
//! Tools are the callable operations exposed to MCP clients. Each API tool
//! maps to exactly one Com Laude REST endpoint.
//!
//! ## Architecture
//!
//! - `catalog.rs` - Declarative table of API tools (path, verb, parameters)
//! - `dispatcher.rs` - Generic validation and request building for the table
//! - `definitions/` - Tools with their own logic (`configure_api`)
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and dispatch by name
//! - `handlers.rs` - Result shaping
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! Add a `ToolSpec` entry to `CATALOG` in `catalog.rs`. The router, the
//! registry and the resource descriptors pick it up automatically.

pub mod catalog;
pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use dispatcher::{ToolDispatcher, build_request, require_present};
pub use error::ToolError;
pub use handlers::{ToolOutput, call_result_to_json, into_call_result};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
