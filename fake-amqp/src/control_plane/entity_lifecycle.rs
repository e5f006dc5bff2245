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

//! Entity lifecycle orchestration across registry, bindings and subscribers.
//!
//! Every method runs inside one scheduler turn with the broker state locked.
//! Deliveries produced by a publish are collected and dispatched by the caller
//! once the lock has been released.

use crate::connection::ConnectionCore;
use crate::control_plane::broker_state::BrokerState;
use crate::control_plane::entity::{ExchangeCore, InstanceId, LifecycleCell, QueueCore};
use crate::data_plane::delivery::{Consumer, PendingDelivery};
use crate::data_plane::subscriber_registry::Subscriber;
use crate::error::BrokerError;
use crate::events::{ConnectionEvent, EventStream, ExchangeEvent, QueueEvent};
use crate::observability::{events, fields};
use crate::options::{
    CancelOk, Confirm, ConsumeOk, DestroyOptions, ExchangeOptions, ExchangeType, SubscribeOptions,
};
use crate::routing::binding_target::BindingTarget;
use crate::routing::publish_router::{PublishRouter, RoutedMessage};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMPONENT: &str = "entity_lifecycle";
const STALE_GENERATION_REASON: &str = "broker was reset";
const CONNECTION_CLOSED_REASON: &str = "connection closed";
const GENERATED_CONSUMER_TAG_PREFIX: &str = "amq.ctag-";

/// Exchanges present on every broker, and after every reset.
pub(crate) const DEFAULT_EXCHANGES: [(&str, ExchangeType); 8] = [
    ("", ExchangeType::Direct),
    ("amq.direct", ExchangeType::Direct),
    ("amq.fanout", ExchangeType::Fanout),
    ("amq.headers", ExchangeType::Headers),
    ("amq.match", ExchangeType::Headers),
    ("amq.rabbitmq.log", ExchangeType::Topic),
    ("amq.rabbitmq.trace", ExchangeType::Topic),
    ("amq.topic", ExchangeType::Topic),
];

/// Applies lifecycle transitions to one locked broker state.
pub(crate) struct EntityLifecycle<'a> {
    state: &'a mut BrokerState,
    deliveries: Vec<PendingDelivery>,
}

impl<'a> EntityLifecycle<'a> {
    pub(crate) fn new(state: &'a mut BrokerState) -> Self {
        Self {
            state,
            deliveries: Vec::new(),
        }
    }

    /// Deliveries produced during this turn, in routing order.
    pub(crate) fn into_deliveries(self) -> Vec<PendingDelivery> {
        self.deliveries
    }

    fn ensure_current(&self, generation: u64) -> Result<(), BrokerError> {
        if generation == self.state.generation() {
            return Ok(());
        }
        debug!(
            event = events::STALE_OPERATION_REJECTED,
            component = COMPONENT,
            reason = fields::REASON_GENERATION_CHANGED,
            operation_generation = generation,
            broker_generation = self.state.generation(),
            "operation issued before reset rejected"
        );
        Err(BrokerError::connection_forced(STALE_GENERATION_REASON))
    }

    fn ensure_connection_open(&self, connection: &ConnectionCore) -> Result<(), BrokerError> {
        if self.state.connection_open(connection.id) {
            Ok(())
        } else {
            Err(BrokerError::connection_forced(CONNECTION_CLOSED_REASON))
        }
    }

    /// Registers the built-in exchanges for the current generation.
    pub(crate) fn seed_default_exchanges(&mut self) {
        let generation = self.state.generation();
        for (name, exchange_type) in DEFAULT_EXCHANGES {
            let (events, _) = EventStream::channel();
            let lifecycle = LifecycleCell::new();
            lifecycle.resolve_declare(Ok(()));
            self.state.registry.seed_exchange(Arc::new(ExchangeCore {
                id: InstanceId::next(),
                name: name.to_string(),
                options: ExchangeOptions {
                    exchange_type,
                    durable: true,
                    auto_delete: false,
                    ..ExchangeOptions::default()
                },
                built_in: true,
                connection: None,
                generation,
                lifecycle,
                events,
            }));
        }
    }

    pub(crate) fn open_connection(
        &mut self,
        connection: Arc<ConnectionCore>,
    ) -> Result<(), BrokerError> {
        let result = self.ensure_current(connection.generation);
        connection.lifecycle.resolve_declare(result.clone());

        if result.is_ok() {
            self.state.connections.push(connection.clone());
            connection.emit(ConnectionEvent::Ready);
            info!(
                event = events::CONNECTION_READY,
                component = COMPONENT,
                connection_id = %connection.id,
                host = connection.options.host.as_str(),
                port = connection.options.port,
                "connection ready"
            );
        }
        result
    }

    /// Closes a connection and tears down the exclusive queues it owns.
    pub(crate) fn close_connection(&mut self, connection: &ConnectionCore) -> Result<(), BrokerError> {
        self.ensure_current(connection.generation)?;

        if !connection.lifecycle.close() {
            return Ok(());
        }
        self.state
            .connections
            .retain(|current| current.id != connection.id);
        connection.emit(ConnectionEvent::Close);

        let owned = self.state.registry.exclusive_queues_of(connection.id);
        for queue in &owned {
            info!(
                event = events::QUEUE_EXCLUSIVE_TEARDOWN,
                component = COMPONENT,
                queue = queue.name.as_str(),
                connection_id = %connection.id,
                reason = fields::REASON_CONNECTION_CLOSED,
                "exclusive queue removed with its connection"
            );
            self.remove_queue(queue, true);
        }

        info!(
            event = events::CONNECTION_CLOSED,
            component = COMPONENT,
            connection_id = %connection.id,
            exclusive_queues = owned.len(),
            "connection closed"
        );
        Ok(())
    }

    pub(crate) fn declare_exchange(
        &mut self,
        exchange: Arc<ExchangeCore>,
        connection: &ConnectionCore,
    ) -> Result<(), BrokerError> {
        let result = self.try_declare_exchange(&exchange, connection);
        exchange.lifecycle.resolve_declare(result.clone());

        match &result {
            Ok(()) => {
                exchange.emit(ExchangeEvent::Open);
                debug!(
                    event = events::EXCHANGE_DECLARE_OK,
                    component = COMPONENT,
                    exchange = fields::format_exchange_name(&exchange.name),
                    exchange_type = %exchange.options.exchange_type,
                    passive = exchange.options.passive,
                    no_declare = exchange.options.no_declare,
                    "exchange declared"
                );
            }
            Err(err) => {
                exchange.emit(ExchangeEvent::Error(err.clone()));
                warn!(
                    event = events::EXCHANGE_DECLARE_FAILED,
                    component = COMPONENT,
                    exchange = fields::format_exchange_name(&exchange.name),
                    code = err.code(),
                    err = %err,
                    "exchange declaration refused"
                );
            }
        }
        result
    }

    fn try_declare_exchange(
        &mut self,
        exchange: &Arc<ExchangeCore>,
        connection: &ConnectionCore,
    ) -> Result<(), BrokerError> {
        self.ensure_current(exchange.generation)?;
        self.ensure_connection_open(connection)?;
        self.state
            .registry
            .register_exchange(exchange.clone(), &self.state.vhost)
    }

    pub(crate) fn declare_queue(
        &mut self,
        queue: Arc<QueueCore>,
        connection: &ConnectionCore,
    ) -> Result<(), BrokerError> {
        let result = self.try_declare_queue(&queue, connection);
        queue.lifecycle.resolve_declare(result.clone());

        match &result {
            Ok(()) => {
                queue.emit(QueueEvent::Open);
                debug!(
                    event = events::QUEUE_DECLARE_OK,
                    component = COMPONENT,
                    queue = queue.name.as_str(),
                    connection_id = %queue.connection,
                    exclusive = queue.options.exclusive,
                    passive = queue.options.passive,
                    no_declare = queue.options.no_declare,
                    "queue declared"
                );
            }
            Err(err) => {
                queue.emit(QueueEvent::Error(err.clone()));
                warn!(
                    event = events::QUEUE_DECLARE_FAILED,
                    component = COMPONENT,
                    queue = queue.name.as_str(),
                    code = err.code(),
                    err = %err,
                    "queue declaration refused"
                );
            }
        }
        result
    }

    fn try_declare_queue(
        &mut self,
        queue: &Arc<QueueCore>,
        connection: &ConnectionCore,
    ) -> Result<(), BrokerError> {
        self.ensure_current(queue.generation)?;
        self.ensure_connection_open(connection)?;
        self.state
            .registry
            .register_queue(queue.clone(), &self.state.vhost)?;

        if queue.is_authoritative() && !self.has_default_route(&queue.name) {
            self.state
                .bindings
                .bind_implicit("", &queue.name, queue.clone())?;
        }
        Ok(())
    }

    /// Every queue is reachable through the default exchange by its name.
    fn has_default_route(&self, queue_name: &str) -> bool {
        self.state
            .bindings
            .for_exchange("")
            .any(|row| row.implicit && row.target.target_name() == queue_name)
    }

    pub(crate) fn bind(
        &mut self,
        target: Arc<dyn BindingTarget>,
        exchange_name: &str,
        routing_key: &str,
    ) -> Result<(), BrokerError> {
        let result = self.try_bind(&target, exchange_name, routing_key);

        match &result {
            Ok(()) => {
                target.lifecycle().mark_bound();
                target.notify_bound();
                debug!(
                    event = events::BIND_OK,
                    component = COMPONENT,
                    exchange = fields::format_exchange_name(exchange_name),
                    routing_key,
                    target = target.target_name(),
                    "binding added"
                );
            }
            Err(err) => {
                target.lifecycle().mark_bind_failed();
                target.notify_error(err.clone());
                warn!(
                    event = events::BIND_FAILED,
                    component = COMPONENT,
                    exchange = fields::format_exchange_name(exchange_name),
                    routing_key,
                    target = target.target_name(),
                    code = err.code(),
                    err = %err,
                    "binding refused"
                );
            }
        }
        result
    }

    fn try_bind(
        &mut self,
        target: &Arc<dyn BindingTarget>,
        exchange_name: &str,
        routing_key: &str,
    ) -> Result<(), BrokerError> {
        self.ensure_current(target.generation())?;

        if exchange_name.is_empty() && routing_key.is_empty() {
            return Err(BrokerError::default_exchange_refused());
        }
        if !self.state.registry.exchange_exists(exchange_name) {
            return Err(BrokerError::no_exchange(exchange_name, &self.state.vhost));
        }
        target.ensure_bindable(&self.state.registry, &self.state.vhost)?;

        self.state
            .bindings
            .bind(exchange_name, routing_key, target.clone())
    }

    /// Removes matching rows; succeeds even when nothing matched.
    pub(crate) fn unbind(
        &mut self,
        target: Arc<dyn BindingTarget>,
        exchange_name: &str,
        routing_key: Option<&str>,
    ) -> Result<(), BrokerError> {
        if let Err(err) = self.ensure_current(target.generation()) {
            target.notify_error(err.clone());
            warn!(
                event = events::UNBIND_FAILED,
                component = COMPONENT,
                exchange = fields::format_exchange_name(exchange_name),
                routing_key = fields::format_routing_key(routing_key),
                target = target.target_name(),
                err = %err,
                "unbind refused"
            );
            return Err(err);
        }

        let removed = self
            .state
            .bindings
            .unbind_one(target.instance_id(), exchange_name, routing_key);
        if !self.state.bindings.has_target(target.instance_id()) {
            target.lifecycle().mark_unbound();
        }
        target.notify_unbound();

        debug!(
            event = events::UNBIND_OK,
            component = COMPONENT,
            exchange = fields::format_exchange_name(exchange_name),
            routing_key = fields::format_routing_key(routing_key),
            target = target.target_name(),
            removed,
            "binding removed"
        );

        if removed > 0 {
            self.collect_auto_deletes(BTreeSet::from([exchange_name.to_string()]));
        }
        Ok(())
    }

    pub(crate) fn subscribe(
        &mut self,
        queue: &Arc<QueueCore>,
        connection: &ConnectionCore,
        options: SubscribeOptions,
        consumer: Arc<dyn Consumer>,
    ) -> Result<ConsumeOk, BrokerError> {
        let result = self.try_subscribe(queue, connection, options, consumer);

        match &result {
            Ok(consume_ok) => {
                queue.emit(QueueEvent::BasicConsumeOk {
                    consumer_tag: consume_ok.consumer_tag.clone(),
                });
                debug!(
                    event = events::CONSUME_OK,
                    component = COMPONENT,
                    queue = queue.name.as_str(),
                    consumer_tag = consume_ok.consumer_tag.as_str(),
                    consumers = self.state.subscribers.count(&queue.name),
                    "consumer attached"
                );
            }
            Err(err) => {
                queue.emit(QueueEvent::Error(err.clone()));
                warn!(
                    event = events::CONSUME_FAILED,
                    component = COMPONENT,
                    queue = queue.name.as_str(),
                    code = err.code(),
                    err = %err,
                    "consumer refused"
                );
            }
        }
        result
    }

    fn try_subscribe(
        &mut self,
        queue: &Arc<QueueCore>,
        connection: &ConnectionCore,
        options: SubscribeOptions,
        consumer: Arc<dyn Consumer>,
    ) -> Result<ConsumeOk, BrokerError> {
        self.ensure_current(queue.generation)?;
        self.ensure_connection_open(connection)?;

        let registered = self.state.registry.queue_by_id(queue.id).is_some();
        if !registered
            || !queue.lifecycle.is_live()
            || !self.state.registry.queue_exists(&queue.name)
        {
            return Err(BrokerError::no_queue(&queue.name, &self.state.vhost));
        }

        let consumer_tag = options
            .consumer_tag
            .unwrap_or_else(|| format!("{GENERATED_CONSUMER_TAG_PREFIX}{}", Uuid::new_v4().simple()));

        self.state.subscribers.add(
            &queue.name,
            Subscriber::new(consumer_tag.clone(), queue.id, consumer, options.exclusive),
            &self.state.vhost,
        )?;

        Ok(ConsumeOk { consumer_tag })
    }

    /// Detaches a consumer. Unknown tags are acknowledged without effect.
    pub(crate) fn unsubscribe(
        &mut self,
        queue: &Arc<QueueCore>,
        consumer_tag: &str,
    ) -> Result<CancelOk, BrokerError> {
        if let Err(err) = self.ensure_current(queue.generation) {
            queue.emit(QueueEvent::Error(err.clone()));
            return Err(err);
        }

        let removed = self.state.subscribers.remove(&queue.name, consumer_tag);
        queue.emit(QueueEvent::BasicCancelOk {
            consumer_tag: consumer_tag.to_string(),
        });
        debug!(
            event = events::CANCEL_OK,
            component = COMPONENT,
            queue = queue.name.as_str(),
            consumer_tag,
            found = removed.is_some(),
            "consumer cancelled"
        );

        if let Some(subscriber) = removed {
            let owner = self
                .state
                .registry
                .queue_by_id(subscriber.queue)
                .cloned()
                .unwrap_or_else(|| queue.clone());

            if owner.options.close_channel_on_unsubscribe {
                info!(
                    event = events::QUEUE_AUTO_DELETE,
                    component = COMPONENT,
                    queue = owner.name.as_str(),
                    reason = fields::REASON_CLOSE_ON_UNSUBSCRIBE,
                    "queue closed with its consumer"
                );
                self.remove_queue(&owner, true);
            } else if owner.options.auto_delete && self.state.subscribers.count(&owner.name) == 0 {
                // Auto-deletion on last cancel does not announce the close.
                info!(
                    event = events::QUEUE_AUTO_DELETE,
                    component = COMPONENT,
                    queue = owner.name.as_str(),
                    reason = fields::REASON_LAST_CONSUMER_GONE,
                    "auto-delete queue removed"
                );
                self.remove_queue(&owner, false);
            }
        }

        Ok(CancelOk {
            consumer_tag: consumer_tag.to_string(),
        })
    }

    /// Runs in the destroy's scheduled turn, so operations issued before it
    /// still see the exchange.
    pub(crate) fn destroy_exchange(
        &mut self,
        exchange: &Arc<ExchangeCore>,
        options: DestroyOptions,
    ) -> Result<(), BrokerError> {
        let result = self.check_exchange_destroy(exchange, options);

        match &result {
            Ok(()) => {
                exchange.lifecycle.begin_destroy();
                self.remove_exchange(exchange);
                info!(
                    event = events::EXCHANGE_DESTROY_OK,
                    component = COMPONENT,
                    exchange = fields::format_exchange_name(&exchange.name),
                    "exchange destroyed"
                );
            }
            Err(err) => {
                exchange.emit(ExchangeEvent::Error(err.clone()));
                warn!(
                    event = events::EXCHANGE_DESTROY_FAILED,
                    component = COMPONENT,
                    exchange = fields::format_exchange_name(&exchange.name),
                    code = err.code(),
                    err = %err,
                    "exchange destroy refused"
                );
            }
        }
        result
    }

    fn check_exchange_destroy(
        &self,
        exchange: &ExchangeCore,
        options: DestroyOptions,
    ) -> Result<(), BrokerError> {
        self.ensure_current(exchange.generation)?;

        let built_in = exchange.built_in
            || self
                .state
                .registry
                .exchanges_named(&exchange.name)
                .iter()
                .any(|current| current.built_in);
        if built_in {
            return Err(if exchange.name.is_empty() {
                BrokerError::default_exchange_refused()
            } else {
                BrokerError::built_in_exchange_refused(&exchange.name, &self.state.vhost)
            });
        }

        if options.if_unused && self.state.bindings.has_source(&exchange.name) {
            return Err(BrokerError::exchange_in_use(
                &exchange.name,
                &self.state.vhost,
            ));
        }
        Ok(())
    }

    pub(crate) fn destroy_queue(
        &mut self,
        queue: &Arc<QueueCore>,
        options: DestroyOptions,
    ) -> Result<(), BrokerError> {
        let result = self.check_queue_destroy(queue, options);

        match &result {
            Ok(()) => {
                queue.lifecycle.begin_destroy();
                self.remove_queue(queue, true);
                info!(
                    event = events::QUEUE_DESTROY_OK,
                    component = COMPONENT,
                    queue = queue.name.as_str(),
                    "queue destroyed"
                );
            }
            Err(err) => {
                queue.emit(QueueEvent::Error(err.clone()));
                warn!(
                    event = events::QUEUE_DESTROY_FAILED,
                    component = COMPONENT,
                    queue = queue.name.as_str(),
                    code = err.code(),
                    err = %err,
                    "queue destroy refused"
                );
            }
        }
        result
    }

    fn check_queue_destroy(
        &self,
        queue: &QueueCore,
        options: DestroyOptions,
    ) -> Result<(), BrokerError> {
        self.ensure_current(queue.generation)?;

        if options.if_unused && self.state.subscribers.count(&queue.name) > 0 {
            return Err(BrokerError::queue_in_use(&queue.name, &self.state.vhost));
        }
        // Messages are never retained, so `if_empty` always holds.
        Ok(())
    }

    fn remove_queue(&mut self, queue: &Arc<QueueCore>, announce_close: bool) {
        let held_default_route = self.state.bindings.has_implicit_target(queue.id);
        let sources = self.state.bindings.unbind_all(queue.id);
        self.state
            .subscribers
            .remove_queue_instance(&queue.name, queue.id);
        self.state.registry.remove_queue(queue.id);

        if queue.lifecycle.close() && announce_close {
            queue.emit(QueueEvent::Close);
        }

        if held_default_route {
            let successor = self
                .state
                .registry
                .authoritative_queues_named(&queue.name, queue.id)
                .into_iter()
                .next();
            if let Some(successor) = successor {
                if let Err(err) = self
                    .state
                    .bindings
                    .bind_implicit("", &successor.name, successor.clone())
                {
                    warn!(
                        event = events::BIND_FAILED,
                        component = COMPONENT,
                        queue = successor.name.as_str(),
                        err = %err,
                        "failed to move default exchange route"
                    );
                }
            }
        }

        self.collect_auto_deletes(sources);
    }

    fn remove_exchange(&mut self, exchange: &Arc<ExchangeCore>) {
        let sources = self.detach_exchange(exchange);
        self.collect_auto_deletes(sources);
    }

    /// Drops an exchange instance and its bindings; returns the source
    /// exchanges that lost a row because of it.
    fn detach_exchange(&mut self, exchange: &Arc<ExchangeCore>) -> BTreeSet<String> {
        let sources = self.state.bindings.unbind_all(exchange.id);
        self.state.registry.remove_exchange(exchange.id);

        if exchange.lifecycle.close() {
            exchange.emit(ExchangeEvent::Close);
        }

        if !self.state.registry.exchange_exists(&exchange.name) {
            for target in self.state.bindings.remove_source(&exchange.name) {
                if !self
                    .state
                    .bindings
                    .has_target(target.instance_id())
                {
                    target.lifecycle().mark_unbound();
                }
            }
        }
        sources
    }

    /// Removes auto-delete exchanges that have lost their last binding.
    fn collect_auto_deletes(&mut self, sources: BTreeSet<String>) {
        let mut pending: Vec<String> = sources.into_iter().collect();

        while let Some(name) = pending.pop() {
            if name.is_empty() || self.state.bindings.has_source(&name) {
                continue;
            }

            let instances = self.state.registry.exchanges_named(&name);
            let deletable = !instances.iter().any(|exchange| exchange.built_in)
                && instances
                    .iter()
                    .any(|exchange| exchange.is_authoritative() && exchange.options.auto_delete);
            if !deletable {
                continue;
            }

            info!(
                event = events::EXCHANGE_AUTO_DELETE,
                component = COMPONENT,
                exchange = name.as_str(),
                reason = fields::REASON_LAST_BINDING_GONE,
                "auto-delete exchange removed"
            );
            for exchange in &instances {
                pending.extend(self.detach_exchange(exchange));
            }
        }
    }

    /// Routes a publish made through an exchange handle.
    pub(crate) fn publish(
        &mut self,
        exchange: &ExchangeCore,
        message: RoutedMessage,
    ) -> Result<Confirm, BrokerError> {
        let result = self.try_publish(exchange, &message);

        if let Err(err) = &result {
            exchange.emit(ExchangeEvent::Error(err.clone()));
        }
        result.map(|()| {
            if exchange.options.confirm {
                Confirm::Ack
            } else {
                Confirm::NotRequested
            }
        })
    }

    fn try_publish(
        &mut self,
        exchange: &ExchangeCore,
        message: &RoutedMessage,
    ) -> Result<(), BrokerError> {
        self.ensure_current(exchange.generation)?;

        let registered = self.state.registry.exchange_by_id(exchange.id).is_some();
        if !registered || !exchange.lifecycle.is_live() {
            return Err(self.publish_failed(message, BrokerError::no_exchange(
                &exchange.name,
                &self.state.vhost,
            )));
        }
        self.route(message)
    }

    /// Routes a publish made directly on a connection.
    pub(crate) fn publish_on_connection(
        &mut self,
        connection: &ConnectionCore,
        message: RoutedMessage,
    ) -> Result<(), BrokerError> {
        self.ensure_current(connection.generation)?;
        self.ensure_connection_open(connection)?;
        self.route(&message)
    }

    fn route(&mut self, message: &RoutedMessage) -> Result<(), BrokerError> {
        let state = &mut *self.state;
        let Some(exchange_type) = state
            .registry
            .find_exchange(&message.exchange)
            .map(|exchange| exchange.options.exchange_type)
        else {
            let err = BrokerError::no_exchange(&message.exchange, &state.vhost);
            return Err(self.publish_failed(message, err));
        };

        let deliveries = PublishRouter::new(
            &state.registry,
            &state.bindings,
            &mut state.subscribers,
            message,
        )
        .route(exchange_type);
        self.deliveries.extend(deliveries);
        Ok(())
    }

    fn publish_failed(&self, message: &RoutedMessage, err: BrokerError) -> BrokerError {
        warn!(
            event = events::PUBLISH_FAILED,
            component = COMPONENT,
            exchange = fields::format_exchange_name(&message.exchange),
            routing_key = message.routing_key.as_str(),
            code = err.code(),
            err = %err,
            "publish refused"
        );
        err
    }

    /// Closes every entity and connection, empties all tables, starts a new
    /// generation and re-seeds the built-in exchanges.
    pub(crate) fn reset(&mut self) {
        let (exchanges, queues) = self.state.registry.drain();
        for exchange in &exchanges {
            if exchange.lifecycle.close() {
                exchange.emit(ExchangeEvent::Close);
            }
        }
        for queue in &queues {
            if queue.lifecycle.close() {
                queue.emit(QueueEvent::Close);
            }
        }
        let connections = std::mem::take(&mut self.state.connections);
        for connection in &connections {
            if connection.lifecycle.close() {
                connection.emit(ConnectionEvent::Close);
            }
        }

        let dropped_bindings = self.state.bindings.len();
        self.state.bindings.clear();
        self.state.subscribers.clear();
        let generation = self.state.advance_generation();
        self.seed_default_exchanges();

        info!(
            event = events::BROKER_RESET,
            component = COMPONENT,
            generation,
            exchanges = exchanges.len(),
            queues = queues.len(),
            connections = connections.len(),
            bindings = dropped_bindings,
            "broker reset"
        );
    }
}
