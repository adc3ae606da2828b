//! Tool catalog - the declarative table of API-backed tools.
//!
//! Every entry maps one tool name to one REST endpoint. The dispatcher reads
//! this table to validate arguments and build requests; the MCP input schema
//! of each tool is generated from it as well.

use reqwest::Method;
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domains::resources::ResourceCategory;

/// HTTP verb used by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Patch,
    Post,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Patch => "PATCH",
            Self::Post => "POST",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Patch => Method::PATCH,
            Self::Post => Method::POST,
        }
    }
}

/// JSON type accepted for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Object,
}

impl ParamKind {
    fn schema_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Object => "object",
        }
    }
}

/// Where a parameter ends up in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a `{name}` placeholder of the path.
    Path,
    /// Appended to the query string.
    Query,
    /// Added as a field of the JSON body.
    Body,
    /// Sent as the entire JSON body.
    WholeBody,
}

/// Value used when an optional parameter is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    None,
    Integer(u64),
    EmptyObject,
}

impl Fallback {
    pub fn value(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Integer(n) => Some(json!(n)),
            Self::EmptyObject => Some(json!({})),
        }
    }
}

/// One tool parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub location: ParamLocation,
    pub required: bool,
    pub fallback: Fallback,
    pub minimum: Option<u64>,
    pub description: &'static str,
}

/// One API-backed tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ResourceCategory,
    pub verb: HttpVerb,
    /// Path template relative to the base URL, e.g. `/groups/{group_id}/accounts`.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolSpec {
    /// Names of the required parameters, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &'static str> {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// JSON Schema for the tool arguments.
    pub fn input_schema(&self) -> JsonObject {
        let mut properties = serde_json::Map::new();
        for param in self.params {
            let mut schema = json!({
                "type": param.kind.schema_type(),
                "description": param.description,
            });
            if let Some(default) = param.fallback.value() {
                schema["default"] = default;
            }
            if let Some(minimum) = param.minimum {
                schema["minimum"] = json!(minimum);
            }
            properties.insert(param.name.to_string(), schema);
        }

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert(
            "required".to_string(),
            Value::Array(self.required().map(Value::from).collect()),
        );
        schema
    }

    /// Create a Tool model for this entry (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Look up a tool by name.
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

// ============================================================================
// Parameters
// ============================================================================

const GROUP_ID: ParamSpec = ParamSpec {
    name: "group_id",
    kind: ParamKind::String,
    location: ParamLocation::Path,
    required: true,
    fallback: Fallback::None,
    minimum: None,
    description: "Group ID",
};

const fn path_id(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        location: ParamLocation::Path,
        required: true,
        fallback: Fallback::None,
        minimum: None,
        description,
    }
}

const fn limit(location: ParamLocation) -> ParamSpec {
    ParamSpec {
        name: "limit",
        kind: ParamKind::Integer,
        location,
        required: false,
        fallback: Fallback::Integer(50),
        minimum: Some(1),
        description: "Maximum number of results",
    }
}

const fn page(location: ParamLocation) -> ParamSpec {
    ParamSpec {
        name: "page",
        kind: ParamKind::Integer,
        location,
        required: false,
        fallback: Fallback::Integer(1),
        minimum: Some(1),
        description: "Page number",
    }
}

const fn sort(location: ParamLocation) -> ParamSpec {
    ParamSpec {
        name: "sort",
        kind: ParamKind::String,
        location,
        required: false,
        fallback: Fallback::None,
        minimum: None,
        description: "Sort field (with - prefix for descending)",
    }
}

const LIST_PARAMS: &[ParamSpec] = &[
    GROUP_ID,
    limit(ParamLocation::Query),
    page(ParamLocation::Query),
    sort(ParamLocation::Query),
];

// ============================================================================
// Catalog
// ============================================================================

/// All API-backed tools.
pub static CATALOG: &[ToolSpec] = &[
    ToolSpec {
        name: "get_accounts",
        description: "Get list of accounts for a group",
        category: ResourceCategory::Accounts,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/accounts",
        params: LIST_PARAMS,
    },
    ToolSpec {
        name: "get_account",
        description: "Get details for a specific account",
        category: ResourceCategory::Accounts,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/accounts/{account_id}",
        params: &[GROUP_ID, path_id("account_id", "Account ID")],
    },
    ToolSpec {
        name: "update_account",
        description: "Update account information",
        category: ResourceCategory::Accounts,
        verb: HttpVerb::Patch,
        path: "/groups/{group_id}/accounts/{account_id}",
        params: &[
            GROUP_ID,
            path_id("account_id", "Account ID"),
            ParamSpec {
                name: "updates",
                kind: ParamKind::Object,
                location: ParamLocation::WholeBody,
                required: true,
                fallback: Fallback::None,
                minimum: None,
                description: "Account fields to update",
            },
        ],
    },
    ToolSpec {
        name: "search_accounts",
        description: "Search accounts with filters",
        category: ResourceCategory::Accounts,
        verb: HttpVerb::Post,
        path: "/groups/{group_id}/accounts/search",
        params: &[
            GROUP_ID,
            ParamSpec {
                name: "filters",
                kind: ParamKind::Object,
                location: ParamLocation::Body,
                required: false,
                fallback: Fallback::EmptyObject,
                minimum: None,
                description: "Search filters to be sent in request body",
            },
            limit(ParamLocation::Body),
            page(ParamLocation::Body),
            sort(ParamLocation::Body),
            ParamSpec {
                name: "fields",
                kind: ParamKind::String,
                location: ParamLocation::Body,
                required: false,
                fallback: Fallback::None,
                minimum: None,
                description: "Comma-separated list of fields to return",
            },
        ],
    },
    ToolSpec {
        name: "get_domains",
        description: "Get list of domains",
        category: ResourceCategory::Domains,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/domains",
        params: LIST_PARAMS,
    },
    ToolSpec {
        name: "get_domain",
        description: "Get details for a specific domain",
        category: ResourceCategory::Domains,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/domains/{domain_id}",
        params: &[GROUP_ID, path_id("domain_id", "Domain ID")],
    },
    ToolSpec {
        name: "get_ssl_certificates",
        description: "Get list of SSL certificates",
        category: ResourceCategory::SslCertificates,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/ssl-certificates",
        params: LIST_PARAMS,
    },
    ToolSpec {
        name: "get_contacts",
        description: "Get list of contacts",
        category: ResourceCategory::Contacts,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/contacts",
        params: LIST_PARAMS,
    },
    ToolSpec {
        name: "get_services",
        description: "Get available services",
        category: ResourceCategory::Services,
        verb: HttpVerb::Get,
        path: "/groups/{group_id}/accounts/services",
        params: &[GROUP_ID],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_path_placeholders_are_declared_path_params() {
        for spec in CATALOG {
            for segment in spec.path.split('/') {
                if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    let param = spec
                        .params
                        .iter()
                        .find(|p| p.name == name)
                        .unwrap_or_else(|| panic!("{}: undeclared placeholder {}", spec.name, name));
                    assert_eq!(param.location, ParamLocation::Path);
                    assert!(param.required, "{}: path param {} must be required", spec.name, name);
                }
            }
        }
    }

    #[test]
    fn test_every_tool_requires_group_id() {
        for spec in CATALOG {
            assert!(spec.required().any(|name| name == "group_id"), "{}", spec.name);
        }
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = find("get_accounts").unwrap().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["group_id"]));
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["limit"]["default"], 50);
        assert_eq!(schema["properties"]["page"]["minimum"], 1);
        assert!(schema["properties"]["sort"].get("default").is_none());
    }

    #[test]
    fn test_update_account_requires_updates() {
        let required: Vec<_> = find("update_account").unwrap().required().collect();
        assert_eq!(required, vec!["group_id", "account_id", "updates"]);
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("delete_everything").is_none());
    }
}
