//! Mock procedure backend for local development
//!
//! This module answers a fixed catalog of procedure calls without a live server:
//! - `router` - dispatch table keyed by procedure path
//! - `procedures` - the per-procedure handlers
//! - `fixtures` - canned experiences and bookings
//! - `envelope` - request input decoding and response envelopes
//! - `service` - process-wide start/stop switch used by clients
//! - `error` - procedure error codes

pub mod envelope;
pub mod error;
pub mod fixtures;
pub mod procedures;
pub mod router;
pub mod service;

// Re-export commonly used types
pub use error::{ErrorCode, ProcedureError};
pub use fixtures::Fixtures;
pub use router::{MockRouter, Procedure, ProcedureKind, CATALOG};
pub use service::{Environment, MockService, StartOutcome};
