//! The gene-variant lookup tool exposed via Model Context Protocol
//!
//! Provides the `get_variants_for_gene` descriptor and the shared tool-call
//! handler that every transport feeds into.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::indra_client::IndraError;
use crate::mcp::rpc::{json_rpc_error, json_rpc_result};
use crate::AppState;

pub const GET_VARIANTS_TOOL_NAME: &str = "get_variants_for_gene";

#[macros::mcp_tool(
    name = "get_variants_for_gene",
    description = "Get DBSNP variants associated with a gene using the Indra Discovery API."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetVariantsForGeneTool {
    /// Tuple [namespace, id], e.g. ["HGNC", "9896"]
    pub gene: Vec<String>,
}

/// Typed view of the tool arguments; `gene` stays optional so a missing
/// value is answered inline rather than as a protocol fault.
#[derive(Debug, Deserialize)]
pub struct GeneQueryParams {
    pub gene: Option<Vec<String>>,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![GetVariantsForGeneTool::tool()]
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    }
}

/// Runs the gene-variant lookup and renders the outcome as the single text
/// payload the tool contract promises. Every failure is folded into a
/// human-readable sentence; nothing propagates to the transport layer.
pub async fn run_get_variants(state: &AppState, params: GeneQueryParams) -> String {
    let Some(gene) = params.gene.filter(|gene| !gene.is_empty()) else {
        return "Error: gene parameter is required".to_string();
    };

    match state.variant_provider.variants_for_gene(&gene).await {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|err| IndraError::Transport(err.to_string()).to_string()),
        Err(err) => err.to_string(),
    }
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let result = match tool_call.name.as_str() {
        GET_VARIANTS_TOOL_NAME => {
            let query_params: GeneQueryParams =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            text_result(run_get_variants(state, query_params).await)
        }
        other => text_result(format!("Unknown tool: {other}")),
    };

    json_rpc_result(
        id,
        serde_json::to_value(result).expect("tool call result serialization"),
    )
}
