//! Client for the KnowledgePulse knowledge registry.
//!
//! Agent frameworks use [`client::KpClient`] to search and contribute
//! knowledge units over two caller-chosen transports (REST and MCP
//! JSON-RPC), with every failure normalized into [`result::KpResult`]
//! instead of propagating into the calling agent's workflow.

pub mod client;
pub mod commands;
pub mod config;
pub mod query;
pub mod result;
pub mod transport;
pub mod unit;
