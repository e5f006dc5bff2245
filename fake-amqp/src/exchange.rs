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
use crate::control_plane::entity::{ExchangeCore, InstanceId, LifecycleCell, LifecycleState};
use crate::error::BrokerError;
use crate::events::{EventStream, ExchangeEvent};
use crate::options::{Confirm, DestroyOptions, ExchangeOptions, PublishOptions};
use crate::routing::publish_router::RoutedMessage;
use std::sync::Arc;

/// Client-side handle of one exchange declaration.
///
/// Clones share the same declaration, state and event stream.
#[derive(Clone)]
pub struct ExchangeHandle {
    pub(crate) context: BrokerContext,
    pub(crate) core: Arc<ExchangeCore>,
    events: Arc<EventStream<ExchangeEvent>>,
}

impl ExchangeHandle {
    pub(crate) fn declare(
        context: BrokerContext,
        connection: Arc<ConnectionCore>,
        name: &str,
        options: ExchangeOptions,
    ) -> Self {
        let (sink, events) = EventStream::channel();
        let core = Arc::new(ExchangeCore {
            id: InstanceId::next(),
            name: name.to_string(),
            options,
            built_in: false,
            connection: Some(connection.id),
            generation: connection.generation,
            lifecycle: LifecycleCell::new(),
            events: sink,
        });

        let declaring = core.clone();
        let _detached = context
            .schedule(move |lifecycle| lifecycle.declare_exchange(declaring, &connection));

        Self {
            context,
            core,
            events: Arc::new(events),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn options(&self) -> &ExchangeOptions {
        &self.core.options
    }

    pub fn state(&self) -> LifecycleState {
        self.core.lifecycle.get()
    }

    pub fn events(&self) -> &EventStream<ExchangeEvent> {
        &self.events
    }

    /// Waits for the declaration outcome.
    pub async fn opened(&self) -> Result<(), BrokerError> {
        self.core.lifecycle.wait_declared().await
    }

    /// Publishes through this exchange. Resolves with [`Confirm::Ack`] when
    /// the exchange was declared with `confirm`.
    pub fn publish(
        &self,
        routing_key: &str,
        payload: impl Into<Vec<u8>>,
        options: PublishOptions,
    ) -> Completion<Confirm> {
        let exchange = self.core.clone();
        let message = RoutedMessage {
            exchange: exchange.name.clone(),
            routing_key: routing_key.to_string(),
            payload: payload.into(),
            headers: options.headers,
            content_type: options.content_type,
        };
        self.context
            .schedule(move |lifecycle| lifecycle.publish(&exchange, message))
    }

    /// Deletes the exchange and every binding it takes part in.
    ///
    /// Publishes issued earlier still route; a refused destroy leaves the
    /// handle untouched.
    pub fn destroy(&self, options: DestroyOptions) -> Completion<()> {
        let exchange = self.core.clone();
        self.context
            .schedule(move |lifecycle| lifecycle.destroy_exchange(&exchange, options))
    }
}
