//! HTTP API Layer
//!
//! Exposes the diagnostic executor over HTTP:
//! - `POST /api/test`: run one diagnostic
//! - `GET /api/health`: liveness probe
//! - everything else: static frontend files

pub mod error;
pub mod handler;
pub mod middleware;
pub mod server;
pub mod types;

pub use handler::AppState;
pub use server::{HttpServer, HttpServerConfig, ServerHandle};
