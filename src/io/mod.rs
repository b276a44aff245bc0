//! IO modules - external system interfaces
//!
//! This module contains all network-facing code:
//! - `server` - HTTP server exposing the mock router and metrics

pub mod server;

// Re-export commonly used types
pub use server::{bind, run_server, ServerState};
