//! Generic tool dispatch.
//!
//! One routine serves every catalog tool: check required arguments, coerce
//! types, build the [`ApiRequest`] from the tool's path template and
//! parameter locations, execute it and shape the response.

use rmcp::model::{CallToolResult, JsonObject};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::catalog::{self, ParamKind, ParamLocation, ParamSpec, ToolSpec};
use super::definitions::ConfigureApiTool;
use super::error::ToolError;
use super::handlers::{ToolOutput, into_call_result};
use crate::core::client::{ApiClient, ApiRequest};

/// Fail with `missing_parameter` for the first required argument that is
/// absent or null.
pub fn require_present(arguments: &JsonObject, required: &[&str]) -> Result<(), ToolError> {
    match required
        .iter()
        .find(|name| arguments.get(**name).is_none_or(Value::is_null))
    {
        Some(name) => Err(ToolError::missing(*name)),
        None => Ok(()),
    }
}

/// Dispatches tool calls to the API client.
pub struct ToolDispatcher {
    client: Arc<ApiClient>,
}

impl ToolDispatcher {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// The shared API client.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Run a tool and return an MCP result. Never fails at the protocol level.
    pub async fn call(&self, name: &str, arguments: &JsonObject) -> CallToolResult {
        into_call_result(self.dispatch(name, arguments).await)
    }

    /// Run a tool.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(&self, name: &str, arguments: &JsonObject) -> Result<ToolOutput, ToolError> {
        info!("Tool called: {}", name);

        if name == ConfigureApiTool::NAME {
            return ConfigureApiTool::execute(&self.client, arguments).await;
        }

        let spec = catalog::find(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::unknown_tool(name)
        })?;

        let request = build_request(spec, arguments).inspect_err(|e| {
            warn!("Rejected {} call: {}", name, e);
        })?;

        let response = self.client.execute(&request).await?;
        info!("{} completed with status {}", name, response.status);

        let text = serde_json::to_string_pretty(&response.body)
            .unwrap_or_else(|_| response.body.to_string());
        Ok(ToolOutput::new(
            text,
            serde_json::json!({
                "status": response.status,
                "data": response.body,
            }),
        ))
    }
}

/// Validate `arguments` against `spec` and build the request.
pub fn build_request(spec: &ToolSpec, arguments: &JsonObject) -> Result<ApiRequest, ToolError> {
    let required: Vec<_> = spec.required().collect();
    require_present(arguments, &required)?;

    for key in arguments.keys() {
        if !spec.params.iter().any(|p| p.name == key.as_str()) {
            debug!("Ignoring unknown argument '{}' for {}", key, spec.name);
        }
    }

    let mut path_values = Map::new();
    let mut query = Vec::new();
    let mut body_fields = Map::new();
    let mut whole_body = None;

    for param in spec.params {
        let value = match arguments.get(param.name).filter(|v| !v.is_null()) {
            Some(raw) => coerce(param, raw)?,
            None => match param.fallback.value() {
                Some(default) => default,
                None => continue,
            },
        };

        match param.location {
            ParamLocation::Path => {
                path_values.insert(param.name.to_string(), value);
            }
            ParamLocation::Query => query.push((param.name.to_string(), query_string(&value))),
            ParamLocation::Body => {
                body_fields.insert(param.name.to_string(), value);
            }
            ParamLocation::WholeBody => whole_body = Some(value),
        }
    }

    let segments = spec
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => path_values
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ToolError::missing(name)),
            None => Ok(segment.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut request = ApiRequest::new(spec.verb.method(), segments).with_query(query);
    if let Some(body) = whole_body {
        request = request.with_body(body);
    } else if !body_fields.is_empty() {
        request = request.with_body(Value::Object(body_fields));
    }
    Ok(request)
}

/// Check and normalise one argument value.
fn coerce(param: &ParamSpec, raw: &Value) -> Result<Value, ToolError> {
    match param.kind {
        ParamKind::String => {
            let text = match raw {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return Err(ToolError::invalid(param.name, "expected a string")),
            };
            if param.location == ParamLocation::Path && text.trim().is_empty() {
                return Err(ToolError::invalid(param.name, "must not be empty"));
            }
            Ok(Value::String(text))
        }
        ParamKind::Integer => {
            let number = match raw {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            }
            .ok_or_else(|| ToolError::invalid(param.name, "expected a non-negative integer"))?;

            if let Some(minimum) = param.minimum {
                if number < minimum {
                    return Err(ToolError::invalid(
                        param.name,
                        format!("must be at least {minimum}"),
                    ));
                }
            }
            Ok(Value::from(number))
        }
        ParamKind::Object => match raw {
            Value::Object(_) => Ok(raw.clone()),
            _ => Err(ToolError::invalid(param.name, "expected an object")),
        },
    }
}

fn query_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
