//! Tool definitions that do not fit the declarative catalog.
//!
//! API-backed tools live in `catalog.rs`; only tools with their own logic
//! get a file here.

pub mod configure;

pub use configure::{ConfigureApiParams, ConfigureApiTool};
