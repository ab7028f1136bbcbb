//! Domain logic for the gene-variant lookup
//!
//! Provides the single tool this server exposes over the MCP protocol.

pub mod tools;
