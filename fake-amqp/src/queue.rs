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
use crate::connection::ConnectionCore;
use crate::control_plane::entity::{InstanceId, LifecycleCell, LifecycleState, QueueCore};
use crate::data_plane::delivery::Consumer;
use crate::error::BrokerError;
use crate::events::{EventStream, QueueEvent};
use crate::options::{CancelOk, ConsumeOk, DestroyOptions, QueueOptions, SubscribeOptions};
use std::sync::Arc;
use uuid::Uuid;

const SERVER_NAMED_QUEUE_PREFIX: &str = "amq.gen-";

/// Client-side handle of one queue declaration.
#[derive(Clone)]
pub struct QueueHandle {
    pub(crate) context: BrokerContext,
    pub(crate) core: Arc<QueueCore>,
    connection: Arc<ConnectionCore>,
    events: Arc<EventStream<QueueEvent>>,
}

impl QueueHandle {
    pub(crate) fn declare(
        context: BrokerContext,
        connection: Arc<ConnectionCore>,
        name: &str,
        options: QueueOptions,
    ) -> Self {
        let (name, server_named) = if name.is_empty() {
            (
                format!("{SERVER_NAMED_QUEUE_PREFIX}{}", Uuid::new_v4().simple()),
                true,
            )
        } else {
            (name.to_string(), false)
        };

        let (sink, events) = EventStream::channel();
        let core = Arc::new(QueueCore {
            id: InstanceId::next(),
            name,
            options,
            server_named,
            connection: connection.id,
            generation: connection.generation,
            lifecycle: LifecycleCell::new(),
            events: sink,
        });

        let declaring = core.clone();
        let owner = connection.clone();
        let _detached =
            context.schedule(move |lifecycle| lifecycle.declare_queue(declaring, &owner));

        Self {
            context,
            core,
            connection,
            events: Arc::new(events),
        }
    }

    /// The declared name, or the generated one for an unnamed declaration.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn options(&self) -> &QueueOptions {
        &self.core.options
    }

    pub fn state(&self) -> LifecycleState {
        self.core.lifecycle.get()
    }

    pub fn events(&self) -> &EventStream<QueueEvent> {
        &self.events
    }

    pub async fn opened(&self) -> Result<(), BrokerError> {
        self.core.lifecycle.wait_declared().await
    }

    /// Attaches `consumer` to this queue. Messages routed to the queue are
    /// handed to its consumers in round-robin order.
    pub fn subscribe(
        &self,
        options: SubscribeOptions,
        consumer: Arc<dyn Consumer>,
    ) -> Completion<ConsumeOk> {
        let queue = self.core.clone();
        let connection = self.connection.clone();
        self.context.schedule(move |lifecycle| {
            lifecycle.subscribe(&queue, &connection, options, consumer)
        })
    }

    pub fn unsubscribe(&self, consumer_tag: &str) -> Completion<CancelOk> {
        let queue = self.core.clone();
        let consumer_tag = consumer_tag.to_string();
        self.context
            .schedule(move |lifecycle| lifecycle.unsubscribe(&queue, &consumer_tag))
    }

    /// Deletes the queue, its bindings and its consumers.
    pub fn destroy(&self, options: DestroyOptions) -> Completion<()> {
        let queue = self.core.clone();
        self.context
            .schedule(move |lifecycle| lifecycle.destroy_queue(&queue, options))
    }
}
