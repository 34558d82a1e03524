//! The `web_search` tool offered to the research role.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use hc_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

use crate::search::{SearchProvider, SearchResult};

pub const WEB_SEARCH_TOOL: &str = "web_search";

pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Deserialize)]
struct WebSearchArgs {
    query: String,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the web with a Google-style query. Supports site: filters. Returns titles, URLs and snippets of the top results."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "query",
                PropertySchema::string("The search query, including any site: filters"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: WebSearchArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return Ok(ToolOutput::error(format!("Invalid arguments: {}", e))),
        };

        if args.query.trim().is_empty() {
            return Ok(ToolOutput::error("query must not be empty"));
        }

        let results = self
            .provider
            .search(&args.query)
            .await
            .map_err(|e| Error::tool(WEB_SEARCH_TOOL, e.to_string()))?;
        Ok(ToolOutput::success(format_results(&args.query, &results)))
    }
}

/// Render results as a numbered list the model can cite from.
fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for query: {}", query);
    }

    let mut output = format!("Search results for: {}\n", query);
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!("\n{}. {}\n   URL: {}\n", i + 1, result.title, result.url));
        if !result.snippet.is_empty() {
            output.push_str(&format!("   {}\n", result.snippet));
        }
    }
    output
}

/// Create the search tools backed by `provider`.
pub fn create_search_tools_arc(provider: Arc<dyn SearchProvider>) -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(WebSearchTool::new(provider))]
}
