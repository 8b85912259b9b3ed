//! Integration tests for es_http
//!
//! These tests drive the public API against real temporary directories.
//! Run with: cargo test --test integration

mod helpers;

mod request_cycle;
mod upload_pipeline;
mod uri_round_trip;
