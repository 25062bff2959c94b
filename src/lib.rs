//! Mirrorcast - content-addressed encrypted HLS across independent mirrors
//!
//! This library crate exposes the producer and resolver pipelines for the
//! binary and for integration testing.

pub mod mirror;
pub mod playlist;
pub mod producer;
pub mod resolve;
