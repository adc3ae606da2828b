//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every tool gets a dynamic route that forwards its arguments to the shared
//! dispatcher, so the router and the registry always expose the same set.

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};

use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRegistry::get_all_tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            let dispatcher = registry.dispatcher().clone();
            let name = tool.name.clone();
            router.with_route(ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
                let args = ctx.arguments.clone().unwrap_or_default();
                let dispatcher = dispatcher.clone();
                let name = name.clone();
                async move { Ok(dispatcher.call(&name, &args).await) }.boxed()
            }))
        })
}
