//! HTTP Inbound Adapter
//!
//! Axum-based read-only HTTP server over the rate resolver.

mod handlers;
mod server;

pub use server::HttpServer;
