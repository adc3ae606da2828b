//! Resources domain module.
//!
//! Resources are static, read-only descriptors of the Com Laude data
//! categories (accounts, domains, SSL certificates, contacts, services).
//! They are metadata only; live data is fetched through tools.
//!
//! ## Architecture
//!
//! - `definitions/` - The resource categories and their metadata
//! - `registry.rs` - Builds resource entries from the categories
//! - `service.rs` - Resource service for listing and reading

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::{ResourceCategory, ResourceDefinition};
pub use error::ResourceError;
pub use registry::{get_all_resources, resource_uris};
pub use service::{ResourceEntry, ResourceService};
