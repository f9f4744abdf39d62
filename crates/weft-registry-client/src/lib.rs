//! Registry client for the weft supergraph registry.
//!
//! This crate provides:
//! - the `RegistryClient` capability trait consumed by the reconciler
//! - a typed error with an explicit operational/transient marker
//! - an HTTP implementation over JSON
//! - an in-memory implementation for tests and local development
//!
//! Composition and validation happen server-side; this crate only carries
//! requests and interprets responses.

pub mod client;
pub mod error;
pub mod http;
pub mod memory;

pub use crate::client::RegistryClient;
pub use crate::error::{RegistryError, RegistryResult};
pub use crate::http::HttpRegistryClient;
pub use crate::memory::{CallKind, CallRecord, InMemoryRegistryClient};
