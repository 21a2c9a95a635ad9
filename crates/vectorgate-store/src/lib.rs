//! vectorgate store - storage port and adapters
//!
//! This crate defines the `DocumentIndex` port and provides two adapters:
//! an in-memory index for development and testing, and the Qdrant-backed
//! index that delegates every operation to the external client library.

pub mod memory;
pub mod ports;
pub mod qdrant;
