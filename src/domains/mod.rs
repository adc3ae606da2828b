//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server: callable tools backed by the Com Laude API, and static resources
//! describing each API family.

pub mod resources;
pub mod tools;
