//! Integration tests for the FleetGlass telemetry client
//!
//! This test suite validates:
//! - The ingestion pipeline against mixed producer schemas
//! - Session lifecycle with a scripted transport on a paused clock
//! - The WebSocket transport against a local telemetry server


#[cfg(test)]
mod pipeline_tests;

#[cfg(test)]
mod session_lifecycle_tests;
