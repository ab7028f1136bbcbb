//! Upstream access to the Indra Discovery API.
//!
//! The `VariantProvider` trait is the seam between the tool handler and the
//! network; the reqwest-backed `IndraClient` is the production implementation.

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

/// Upstream failure, worded exactly as it is relayed to tool callers.
#[derive(Debug, Error)]
pub enum IndraError {
    #[error("Indra API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Error calling Indra API: {0}")]
    Transport(String),
}

#[async_trait]
pub trait VariantProvider: Send + Sync {
    /// Resolves DBSNP variants for a `[namespace, id]` gene reference.
    async fn variants_for_gene(&self, gene: &[String]) -> Result<Value, IndraError>;
}

#[derive(Debug, Clone)]
pub struct IndraClient {
    client: reqwest::Client,
    api_url: String,
}

impl IndraClient {
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }
}

#[async_trait]
impl VariantProvider for IndraClient {
    async fn variants_for_gene(&self, gene: &[String]) -> Result<Value, IndraError> {
        debug!(url = %self.api_url, gene = ?gene, "querying indra api");

        let response = self
            .client
            .post(&self.api_url)
            .header(header::ACCEPT, "application/json")
            .json(&json!({ "gene": gene }))
            .send()
            .await
            .map_err(|err| IndraError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| IndraError::Transport(err.to_string()))?;

        if status != StatusCode::OK {
            return Err(IndraError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| IndraError::Transport(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn gene() -> Vec<String> {
        vec!["HGNC".to_string(), "9896".to_string()]
    }

    #[tokio::test]
    async fn posts_gene_pair_and_returns_upstream_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/get_variants_for_gene"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "gene": ["HGNC", "9896"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variants": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IndraClient::new(format!("{}/api/get_variants_for_gene", server.uri()));
        let result = client
            .variants_for_gene(&gene())
            .await
            .expect("upstream call should succeed");

        assert_eq!(result, json!({ "variants": [] }));
    }

    #[tokio::test]
    async fn non_200_status_surfaces_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/get_variants_for_gene"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = IndraClient::new(format!("{}/api/get_variants_for_gene", server.uri()));
        let err = client
            .variants_for_gene(&gene())
            .await
            .expect_err("expected status error");

        assert_eq!(err.to_string(), "Indra API returned 404: not found");
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/get_variants_for_gene"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
            .mount(&server)
            .await;

        let client = IndraClient::new(format!("{}/api/get_variants_for_gene", server.uri()));
        let err = client
            .variants_for_gene(&gene())
            .await
            .expect_err("expected parse error");

        assert!(err.to_string().starts_with("Error calling Indra API:"));
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        // Bind to grab a free port, then drop the listener so nothing answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        let addr = listener.local_addr().expect("probe port addr");
        drop(listener);

        let client = IndraClient::new(format!("http://{addr}/api/get_variants_for_gene"));
        let err = client
            .variants_for_gene(&gene())
            .await
            .expect_err("expected connection error");

        assert!(err.to_string().starts_with("Error calling Indra API:"));
    }
}
