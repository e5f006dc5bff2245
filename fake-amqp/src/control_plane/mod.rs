//! Control-plane layer.
//!
//! Owns the entity registry and the lifecycle transitions of exchanges, queues
//! and connections. Declaration checks, destroy conditions, auto-deletion and
//! reset all live here; routing and delivery are delegated to the routing and
//! data-plane layers.

pub(crate) mod broker_state;
pub(crate) mod entity;
pub(crate) mod entity_lifecycle;
pub(crate) mod entity_registry;
