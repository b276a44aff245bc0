//! Experience booking library
//!
//! Exposes modules for integration testing and binary reuse.

pub mod client;
pub mod domain;
pub mod infra;
pub mod io;
pub mod mock;
pub mod services;
