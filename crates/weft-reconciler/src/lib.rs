//! Reconciliation and validation engine for weft subgraph schemas.
//!
//! Given a desired subgraph spec and the (possibly absent) observed remote
//! state, the engine computes and executes the minimal sequence of registry
//! calls:
//!
//! - **classify**: partitions registry failures into operational
//!   (surfaced, never retried) and transient (retried under budget)
//! - **retry**: bounded elapsed-time retry driver with backoff
//! - **reconciler**: the Create/Read/Update/Delete/Import state machine,
//!   including replacement when the derived identity changes
//! - **validator**: dry-run composition check of a candidate schema
//!
//! The engine holds no state across operations: the registry is the sole
//! authority, and every operation re-reads remote state. Operations on the
//! same descriptor are expected to be serialized by the caller.

pub mod classify;
pub mod error;
pub mod reconciler;
pub mod retry;
pub mod validator;

pub use crate::classify::{classify, ErrorClass};
pub use crate::error::{Error, Result};
pub use crate::reconciler::{Reconciled, Reconciler, ReconcilerConfig};
pub use crate::retry::{clamp_budget, with_retry};
pub use crate::validator::Validator;
