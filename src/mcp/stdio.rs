//! Newline-delimited JSON-RPC transport over stdin/stdout
//!
//! Reads one frame per line until the input stream closes. Responses are
//! written as single-line JSON; notifications produce no output.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

pub async fn run(state: AppState) -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(frame) {
            Ok(payload) => handle_json_rpc_value(&state, payload).await,
            Err(_) => Some(json_rpc_error(None, -32700, "Parse error")),
        };

        let Some(response) = response else {
            debug!("notification handled, no response frame");
            continue;
        };

        let mut serialized =
            serde_json::to_vec(&response).expect("jsonrpc response serialization");
        serialized.push(b'\n');
        stdout.write_all(&serialized).await?;
        stdout.flush().await?;
    }

    Ok(())
}
