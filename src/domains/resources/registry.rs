//! Resource Registry - central registration of all resources.
//!
//! Every [`ResourceCategory`] becomes one resource. Its content is a static
//! JSON descriptor listing the tools that operate on that category, derived
//! from the tool catalog.

use rmcp::model::{AnnotateAble, RawResource};

use super::definitions::{ResourceCategory, ResourceDefinition};
use super::service::ResourceEntry;
use crate::domains::tools::catalog::CATALOG;

/// Build the resource entry for one category.
fn build_resource(category: ResourceCategory) -> ResourceEntry {
    let mut raw = RawResource::new(category.uri(), category.name());
    raw.description = Some(category.description().to_string());
    raw.mime_type = Some(category.mime_type().to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: descriptor(category).to_string(),
    }
}

/// Static descriptor served by `resources/read`.
fn descriptor(category: ResourceCategory) -> serde_json::Value {
    let tools: Vec<_> = CATALOG
        .iter()
        .filter(|spec| spec.category == category)
        .map(|spec| {
            serde_json::json!({
                "name": spec.name,
                "method": spec.verb.as_str(),
                "path": spec.path,
            })
        })
        .collect();

    serde_json::json!({
        "uri": category.uri(),
        "name": category.name(),
        "description": category.description(),
        "tools": tools,
    })
}

/// Get all registered resources, in listing order.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    ResourceCategory::ALL
        .into_iter()
        .map(build_resource)
        .collect()
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    ResourceCategory::ALL.iter().map(|c| c.uri()).collect()
}
