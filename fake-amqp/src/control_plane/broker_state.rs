/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Broker-wide state shared between the caller threads and the scheduler.

use crate::connection::{ConnectionCore, ConnectionId};
use crate::control_plane::entity_registry::EntityRegistry;
use crate::data_plane::subscriber_registry::SubscriberRegistry;
use crate::routing::binding_table::BindingTable;
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) type SharedState = Arc<Mutex<BrokerState>>;

/// Locks the broker state. A panic while holding the lock leaves the state
/// consistent enough to keep serving, so poisoning is ignored.
pub(crate) fn lock_state(state: &SharedState) -> MutexGuard<'_, BrokerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) struct BrokerState {
    /// Bumped on every reset; operations from an older generation are refused.
    generation: u64,
    pub(crate) vhost: String,
    pub(crate) registry: EntityRegistry,
    pub(crate) bindings: BindingTable,
    pub(crate) subscribers: SubscriberRegistry,
    pub(crate) connections: Vec<Arc<ConnectionCore>>,
}

impl BrokerState {
    pub(crate) fn new(vhost: &str) -> Self {
        Self {
            generation: 0,
            vhost: vhost.to_string(),
            registry: EntityRegistry::default(),
            bindings: BindingTable::default(),
            subscribers: SubscriberRegistry::default(),
            connections: Vec::new(),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn connection_open(&self, id: ConnectionId) -> bool {
        self.connections
            .iter()
            .any(|connection| connection.id == id && connection.lifecycle.is_live())
    }
}
