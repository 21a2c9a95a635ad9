//! vectorgate core - domain models, filter expressions, and configuration
//!
//! This crate contains the types shared by the storage port and the HTTP
//! layer. It performs no I/O of its own.

pub mod config;
pub mod error;
pub mod filter;
pub mod models;

pub use error::{Result, VectorgateError};
