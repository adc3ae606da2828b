//! Com Laude MCP Server Library
//!
//! This crate exposes the Com Laude domain registrar REST API as Model Context
//! Protocol tools and resources.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including the API client, configuration,
//!   error handling, transports and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Declarative API tools plus `configure_api`
//!   - **resources**: Static descriptors for each API family
//!
//! # Example
//!
//! ```rust,no_run
//! use comlaude_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
