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

use crate::completion::{completion_pair, Completion};
use crate::config::{BrokerConfig, ConfigError, ConnectionOptions, ImplOptions};
use crate::connection::Connection;
use crate::control_plane::broker_state::{lock_state, BrokerState, SharedState};
use crate::control_plane::entity_lifecycle::EntityLifecycle;
use crate::data_plane::delivery::dispatch;
use crate::error::BrokerError;
use crate::runtime::scheduler::Scheduler;
use futures::FutureExt;
use std::sync::{Arc, Mutex};

/// Shared state plus the scheduler that mutates it; cloned into every handle.
#[derive(Clone)]
pub(crate) struct BrokerContext {
    state: SharedState,
    scheduler: Scheduler,
}

impl BrokerContext {
    pub(crate) fn generation(&self) -> u64 {
        lock_state(&self.state).generation()
    }

    /// Queues `operation` for its turn. Deliveries it produces are dispatched
    /// before the returned completion resolves.
    pub(crate) fn schedule<T, F>(&self, operation: F) -> Completion<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut EntityLifecycle<'_>) -> Result<T, BrokerError> + Send + 'static,
    {
        let (completer, completion) = completion_pair();

        self.scheduler.submit(Box::new(move |state: &SharedState| {
            let (result, deliveries) = {
                let mut guard = lock_state(state);
                let mut lifecycle = EntityLifecycle::new(&mut guard);
                let result = operation(&mut lifecycle);
                (result, lifecycle.into_deliveries())
            };

            async move {
                dispatch(deliveries).await;
                completer.complete(result);
            }
            .boxed()
        }));

        completion
    }

    fn with_state<R>(&self, read: impl FnOnce(&BrokerState) -> R) -> R {
        read(&lock_state(&self.state))
    }
}

/// [`Broker`] is an in-memory AMQP 0-9-1 style broker.
///
/// It owns the registry of exchanges and queues, the binding table and the
/// consumer groups. Every operation issued through its handles is applied on
/// a single scheduler, in call order, during a later turn.
///
/// # Examples
///
/// ```
/// use fake_amqp::{
///     consumer_fn, Bindable, Broker, BrokerConfig, ConnectionOptions, Delivery, ExchangeOptions,
///     ExchangeType, ImplOptions, PublishOptions, QueueOptions, SubscribeOptions,
/// };
/// use std::sync::{Arc, Mutex};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let broker = Broker::new(BrokerConfig::default()).unwrap();
/// let connection = broker.connect(ConnectionOptions::default(), ImplOptions::default());
///
/// let exchange = connection.declare_exchange("orders", ExchangeOptions::of_type(ExchangeType::Direct));
/// let queue = connection.declare_queue("billing", QueueOptions::default());
/// queue.bind(&exchange, "order.created").await.unwrap();
///
/// let received = Arc::new(Mutex::new(Vec::new()));
/// let sink = received.clone();
/// queue
///     .subscribe(
///         SubscribeOptions::default(),
///         consumer_fn(move |delivery: Delivery| sink.lock().unwrap().push(delivery.payload)),
///     )
///     .await
///     .unwrap();
///
/// exchange
///     .publish("order.created", "42", PublishOptions::default())
///     .await
///     .unwrap();
/// assert_eq!(*received.lock().unwrap(), vec![b"42".to_vec()]);
/// # });
/// ```
pub struct Broker {
    context: BrokerContext,
    config: BrokerConfig,
}

impl Broker {
    /// Starts the scheduler and seeds the built-in exchanges.
    pub fn new(config: BrokerConfig) -> Result<Self, BrokerError> {
        let mut state = BrokerState::new(&config.vhost);
        EntityLifecycle::new(&mut state).seed_default_exchanges();

        let state: SharedState = Arc::new(Mutex::new(state));
        let scheduler =
            Scheduler::start(state.clone(), config.tick()).map_err(BrokerError::internal)?;

        Ok(Self {
            context: BrokerContext { state, scheduler },
            config,
        })
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Opens a connection; it becomes ready in its turn.
    pub fn connect(&self, options: ConnectionOptions, impl_options: ImplOptions) -> Connection {
        Connection::open(self.context.clone(), options, impl_options)
    }

    /// Resolves `url` over default options and opens a connection.
    pub fn connect_url(
        &self,
        url: &str,
        impl_options: ImplOptions,
    ) -> Result<Connection, ConfigError> {
        Ok(self.connect(ConnectionOptions::from_url(url)?, impl_options))
    }

    /// Closes every entity and connection and restores the built-in
    /// exchanges.
    ///
    /// The teardown is applied immediately; handles created before the reset
    /// fail their later operations with `CONNECTION_FORCED`. The returned
    /// completion resolves on the next scheduler turn.
    pub fn reset(&self) -> Completion<()> {
        {
            let mut guard = lock_state(&self.context.state);
            EntityLifecycle::new(&mut guard).reset();
        }
        self.context.schedule(|_| Ok(()))
    }

    /// Resolves once every operation issued so far has completed.
    pub fn settled(&self) -> Completion<()> {
        self.context.schedule(|_| Ok(()))
    }

    /// Whether a live, really declared exchange named `name` exists.
    pub fn exchange_exists(&self, name: &str) -> bool {
        self.context
            .with_state(|state| state.registry.exchange_exists(name))
    }

    /// Whether a live, really declared queue named `name` exists.
    pub fn queue_exists(&self, name: &str) -> bool {
        self.context
            .with_state(|state| state.registry.queue_exists(name))
    }

    /// Number of consumers attached to queues named `queue_name`.
    pub fn consumer_count(&self, queue_name: &str) -> usize {
        self.context
            .with_state(|state| state.subscribers.count(queue_name))
    }
}
