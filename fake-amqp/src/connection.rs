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

use crate::broker::BrokerContext;
use crate::completion::Completion;
use crate::config::{ConnectionOptions, ImplOptions};
use crate::control_plane::entity::{LifecycleCell, LifecycleState};
use crate::error::BrokerError;
use crate::events::{ConnectionEvent, EventSink, EventStream};
use crate::exchange::ExchangeHandle;
use crate::options::{ExchangeOptions, PublishOptions, QueueOptions};
use crate::queue::QueueHandle;
use crate::routing::publish_router::RoutedMessage;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Identity used to decide which connection owns an exclusive queue.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub(crate) fn next() -> Self {
        static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Connection state reachable from scheduled operations.
pub(crate) struct ConnectionCore {
    pub(crate) id: ConnectionId,
    pub(crate) generation: u64,
    pub(crate) options: ConnectionOptions,
    pub(crate) impl_options: ImplOptions,
    pub(crate) lifecycle: LifecycleCell,
    events: EventSink<ConnectionEvent>,
}

impl ConnectionCore {
    pub(crate) fn emit(&self, event: ConnectionEvent) {
        self.events.emit(event);
    }
}

#[derive(Default)]
struct CreatedEntities {
    exchanges: Vec<ExchangeHandle>,
    queues: Vec<QueueHandle>,
}

impl CreatedEntities {
    /// Closed handles never emit again; dropping them releases their events.
    fn prune(&mut self) -> &mut Self {
        self.exchanges.retain(|exchange| exchange.state() != LifecycleState::Closed);
        self.queues.retain(|queue| queue.state() != LifecycleState::Closed);
        self
    }
}

/// A client connection to the in-memory broker.
pub struct Connection {
    context: BrokerContext,
    core: Arc<ConnectionCore>,
    events: EventStream<ConnectionEvent>,
    created: Mutex<CreatedEntities>,
}

impl Connection {
    pub(crate) fn open(
        context: BrokerContext,
        options: ConnectionOptions,
        impl_options: ImplOptions,
    ) -> Self {
        let (sink, events) = EventStream::channel();
        let core = Arc::new(ConnectionCore {
            id: ConnectionId::next(),
            generation: context.generation(),
            options,
            impl_options,
            lifecycle: LifecycleCell::new(),
            events: sink,
        });

        let opening = core.clone();
        let _detached = context.schedule(move |lifecycle| lifecycle.open_connection(opening));

        Self {
            context,
            core,
            events,
            created: Mutex::new(CreatedEntities::default()),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.core.id
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.core.options
    }

    pub fn impl_options(&self) -> &ImplOptions {
        &self.core.impl_options
    }

    pub fn events(&self) -> &EventStream<ConnectionEvent> {
        &self.events
    }

    /// Waits until the connection has been opened, or refused.
    pub async fn ready(&self) -> Result<(), BrokerError> {
        self.core.lifecycle.wait_declared().await
    }

    pub fn is_open(&self) -> bool {
        self.core.lifecycle.declare_outcome() == Some(Ok(())) && self.core.lifecycle.is_live()
    }

    /// Declares an exchange. The handle is usable immediately; the
    /// declaration itself is checked in its turn.
    pub fn declare_exchange(&self, name: &str, options: ExchangeOptions) -> ExchangeHandle {
        let exchange =
            ExchangeHandle::declare(self.context.clone(), self.core.clone(), name, options);
        self.lock_created().prune().exchanges.push(exchange.clone());
        exchange
    }

    /// Declares a queue. An empty name asks the broker to generate one.
    pub fn declare_queue(&self, name: &str, options: QueueOptions) -> QueueHandle {
        let queue = QueueHandle::declare(self.context.clone(), self.core.clone(), name, options);
        self.lock_created().prune().queues.push(queue.clone());
        queue
    }

    /// Publishes through the configured default exchange.
    pub fn publish(
        &self,
        routing_key: &str,
        payload: impl Into<Vec<u8>>,
        options: PublishOptions,
    ) -> Completion<()> {
        let connection = self.core.clone();
        let message = RoutedMessage {
            exchange: connection.impl_options.default_exchange_name.clone(),
            routing_key: routing_key.to_string(),
            payload: payload.into(),
            headers: options.headers,
            content_type: options.content_type,
        };
        self.context
            .schedule(move |lifecycle| lifecycle.publish_on_connection(&connection, message))
    }

    /// Closes the connection and removes the exclusive queues it declared.
    /// Closing twice is harmless.
    pub fn disconnect(&self) -> Completion<()> {
        let connection = self.core.clone();
        self.context
            .schedule(move |lifecycle| lifecycle.close_connection(&connection))
    }

    /// Exchange handles declared through this connection that are not closed.
    pub fn created_exchanges(&self) -> Vec<ExchangeHandle> {
        self.lock_created().prune().exchanges.clone()
    }

    /// Queue handles declared through this connection that are not closed.
    pub fn created_queues(&self) -> Vec<QueueHandle> {
        self.lock_created().prune().queues.clone()
    }

    fn lock_created(&self) -> std::sync::MutexGuard<'_, CreatedEntities> {
        self.created
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
