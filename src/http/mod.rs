//! HTTP transport layer for the Model Context Protocol
//!
//! Provides the external API routing: the `/mcp` listener, the SSE session
//! endpoints, the REST lookup, and metadata endpoints.

pub mod handlers;
pub mod sse;
