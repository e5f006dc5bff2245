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

//! Shared state behind exchange and queue handles.

use crate::connection::ConnectionId;
use crate::error::BrokerError;
use crate::events::{EventSink, ExchangeEvent, QueueEvent};
use crate::options::{ExchangeOptions, QueueOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// Identity of one declared object. Two handles naming the same entity are
/// still distinct instances.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn next() -> Self {
        static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observable lifecycle of an exchange or queue handle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LifecycleState {
    Declaring,
    Open,
    Bound,
    Unbound,
    Destroying,
    Closed,
    Error,
}

type DeclareOutcome = Option<Result<(), BrokerError>>;

/// Lifecycle state plus the one-shot declaration outcome.
pub(crate) struct LifecycleCell {
    state: Mutex<LifecycleState>,
    declared: watch::Sender<DeclareOutcome>,
}

impl LifecycleCell {
    pub(crate) fn new() -> Self {
        let (declared, _) = watch::channel(None);
        Self {
            state: Mutex::new(LifecycleState::Declaring),
            declared,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn get(&self) -> LifecycleState {
        *self.lock()
    }

    pub(crate) fn set(&self, next: LifecycleState) {
        *self.lock() = next;
    }

    /// Closed and destroying entities no longer take part in routing or lookups.
    pub(crate) fn is_live(&self) -> bool {
        !matches!(
            self.get(),
            LifecycleState::Destroying | LifecycleState::Closed
        )
    }

    /// Marks an accepted destroy; the entity leaves routing and lookups.
    pub(crate) fn begin_destroy(&self) {
        let mut state = self.lock();
        if *state != LifecycleState::Closed {
            *state = LifecycleState::Destroying;
        }
    }

    /// Moves to `Closed`; returns `false` if the entity was already closed.
    pub(crate) fn close(&self) -> bool {
        let mut state = self.lock();
        let transitioned = *state != LifecycleState::Closed;
        *state = LifecycleState::Closed;
        transitioned
    }

    /// Bound after a successful bind unless a destroy is pending.
    pub(crate) fn mark_bound(&self) {
        let mut state = self.lock();
        if !matches!(
            *state,
            LifecycleState::Destroying | LifecycleState::Closed
        ) {
            *state = LifecycleState::Bound;
        }
    }

    /// Unbound once the last explicit binding is gone.
    pub(crate) fn mark_unbound(&self) {
        let mut state = self.lock();
        if matches!(*state, LifecycleState::Bound | LifecycleState::Error) {
            *state = LifecycleState::Unbound;
        }
    }

    /// A failed bind on a bound entity leaves it usable but in `Error`.
    pub(crate) fn mark_bind_failed(&self) {
        let mut state = self.lock();
        if *state == LifecycleState::Bound {
            *state = LifecycleState::Error;
        }
    }

    /// Records the declaration outcome. Only the first outcome is kept.
    pub(crate) fn resolve_declare(&self, outcome: Result<(), BrokerError>) {
        {
            let mut state = self.lock();
            if *state == LifecycleState::Declaring {
                *state = if outcome.is_ok() {
                    LifecycleState::Open
                } else {
                    LifecycleState::Error
                };
            }
        }
        self.declared.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(outcome);
            true
        });
    }

    pub(crate) fn declare_outcome(&self) -> Option<Result<(), BrokerError>> {
        self.declared.borrow().clone()
    }

    pub(crate) async fn wait_declared(&self) -> Result<(), BrokerError> {
        let mut receiver = self.declared.subscribe();
        let outcome = match receiver.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => Some(Err(BrokerError::internal("declaration outcome dropped"))),
        };
        outcome.unwrap_or_else(|| Err(BrokerError::internal("declaration outcome missing")))
    }
}

/// Shared state of one exchange handle.
pub(crate) struct ExchangeCore {
    pub(crate) id: InstanceId,
    pub(crate) name: String,
    pub(crate) options: ExchangeOptions,
    /// Seeded by the broker; cannot be destroyed or auto-deleted.
    pub(crate) built_in: bool,
    pub(crate) connection: Option<ConnectionId>,
    pub(crate) generation: u64,
    pub(crate) lifecycle: LifecycleCell,
    pub(crate) events: EventSink<ExchangeEvent>,
}

impl ExchangeCore {
    /// A declaration that the broker actually checked and may route through.
    pub(crate) fn is_real(&self) -> bool {
        !self.options.no_declare
    }

    /// A real declaration that defines the exchange's type and flags.
    pub(crate) fn is_authoritative(&self) -> bool {
        !self.options.no_declare && !self.options.passive
    }

    pub(crate) fn emit(&self, event: ExchangeEvent) {
        self.events.emit(event);
    }
}

/// Shared state of one queue handle.
pub(crate) struct QueueCore {
    pub(crate) id: InstanceId,
    pub(crate) name: String,
    pub(crate) options: QueueOptions,
    /// The name was generated by the broker.
    pub(crate) server_named: bool,
    pub(crate) connection: ConnectionId,
    pub(crate) generation: u64,
    pub(crate) lifecycle: LifecycleCell,
    pub(crate) events: EventSink<QueueEvent>,
}

impl QueueCore {
    pub(crate) fn is_real(&self) -> bool {
        !self.options.no_declare
    }

    pub(crate) fn is_authoritative(&self) -> bool {
        !self.options.no_declare && !self.options.passive
    }

    pub(crate) fn emit(&self, event: QueueEvent) {
        self.events.emit(event);
    }
}
