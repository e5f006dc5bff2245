//! Structured logging vocabulary.
//!
//! Library code emits `tracing` events tagged with `event = events::*` and
//! `component = ...` fields. It never installs a global subscriber.

pub mod events;
pub mod fields;
