//! Runtime integration layer.
//!
//! Owns the scheduler thread so that turn ordering and threading behavior stay
//! localized and predictable for the rest of the crate.

pub(crate) mod scheduler;
pub(crate) mod worker_runtime;
