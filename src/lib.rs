// ABOUTME: Library root for docker-tidy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod output;
pub mod runtime;
pub mod types;
