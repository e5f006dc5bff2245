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

//! Resolves a publish into deliveries.
//!
//! Each bound object receives a given message at most once per publish, even
//! when several bindings or exchange-to-exchange paths lead to it.

use crate::control_plane::entity_registry::EntityRegistry;
use crate::control_plane::entity::InstanceId;
use crate::data_plane::delivery::{Delivery, DeliveryInfo, PendingDelivery};
use crate::data_plane::subscriber_registry::SubscriberRegistry;
use crate::observability::{events, fields};
use crate::options::{ExchangeType, Headers};
use crate::routing::binding_table::{Binding, BindingTable};
use crate::routing::binding_target::BindingTarget;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const COMPONENT: &str = "publish_router";

/// A message as submitted by a publisher.
pub(crate) struct RoutedMessage {
    pub(crate) exchange: String,
    pub(crate) routing_key: String,
    pub(crate) payload: Vec<u8>,
    pub(crate) headers: Headers,
    pub(crate) content_type: Option<String>,
}

pub(crate) struct PublishRouter<'a> {
    registry: &'a EntityRegistry,
    bindings: &'a BindingTable,
    subscribers: &'a mut SubscriberRegistry,
    message: &'a RoutedMessage,
    reached: HashSet<InstanceId>,
    visited_exchanges: HashSet<String>,
    // Queues are one delivery target per name, however many handles bind them.
    reached_queues: HashSet<String>,
    deliveries: Vec<PendingDelivery>,
}

impl<'a> PublishRouter<'a> {
    pub(crate) fn new(
        registry: &'a EntityRegistry,
        bindings: &'a BindingTable,
        subscribers: &'a mut SubscriberRegistry,
        message: &'a RoutedMessage,
    ) -> Self {
        Self {
            registry,
            bindings,
            subscribers,
            message,
            reached: HashSet::new(),
            visited_exchanges: HashSet::new(),
            reached_queues: HashSet::new(),
            deliveries: Vec::new(),
        }
    }

    /// Routes the message through `exchange_type` rules starting at the
    /// message's exchange and returns the resulting deliveries in order.
    pub(crate) fn route(mut self, exchange_type: ExchangeType) -> Vec<PendingDelivery> {
        let origin = self.message;
        self.route_exchange(&origin.exchange, exchange_type);

        debug!(
            event = events::PUBLISH_ROUTED,
            component = COMPONENT,
            exchange = fields::format_exchange_name(&origin.exchange),
            routing_key = origin.routing_key.as_str(),
            targets = self.reached.len(),
            deliveries = self.deliveries.len(),
            payload = fields::format_payload_len(&origin.payload),
            "publish routed"
        );

        self.deliveries
    }

    fn route_exchange(&mut self, exchange_name: &str, exchange_type: ExchangeType) {
        if !self.visited_exchanges.insert(exchange_name.to_string()) {
            return;
        }

        if exchange_type == ExchangeType::Headers {
            debug!(
                event = events::PUBLISH_HEADERS_UNSUPPORTED,
                component = COMPONENT,
                exchange = fields::format_exchange_name(exchange_name),
                reason = fields::REASON_HEADERS_UNSUPPORTED,
                "headers exchanges do not route"
            );
            return;
        }

        let bindings = self.bindings;
        let routing_key = self.message.routing_key.as_str();
        let targets: Vec<Arc<dyn BindingTarget>> = bindings
            .for_exchange(exchange_name)
            .filter(|row| Self::is_candidate(exchange_type, row, routing_key))
            .map(|row| row.target.clone())
            .collect();

        for target in targets {
            if !target.lifecycle().is_live() || !self.reached.insert(target.instance_id()) {
                continue;
            }
            target.accept(self);
        }
    }

    fn is_candidate(exchange_type: ExchangeType, row: &Binding, routing_key: &str) -> bool {
        match exchange_type {
            ExchangeType::Direct => row.routing_key() == routing_key,
            ExchangeType::Fanout => true,
            ExchangeType::Topic => {
                row.routing_key() == routing_key || row.pattern.is_match(routing_key)
            }
            ExchangeType::Headers => false,
        }
    }

    /// Continues routing through a bound exchange, using the type its
    /// authoritative declaration gave it.
    pub(crate) fn forward_to_exchange(&mut self, exchange_name: &str) {
        let registry = self.registry;
        if let Some(exchange) = registry.find_exchange(exchange_name) {
            self.route_exchange(exchange_name, exchange.options.exchange_type);
        }
    }

    /// Hands the message to the next consumer of `queue_name`, if any.
    pub(crate) fn enqueue(&mut self, queue_name: &str) {
        if !self.reached_queues.insert(queue_name.to_string()) {
            return;
        }
        let Some(selection) = self.subscribers.select(queue_name) else {
            debug!(
                event = events::DELIVERY_DROPPED_NO_CONSUMER,
                component = COMPONENT,
                queue = queue_name,
                reason = fields::REASON_NO_CONSUMER,
                "no consumer attached; message dropped"
            );
            return;
        };

        let message = self.message;
        let info = DeliveryInfo {
            queue: queue_name.to_string(),
            delivery_tag: Uuid::new_v4().to_string(),
            redelivered: false,
            exchange: message.exchange.clone(),
            routing_key: message.routing_key.clone(),
            consumer_tag: selection.consumer_tag,
            content_type: message.content_type.clone(),
        };

        self.deliveries.push(PendingDelivery {
            consumer: selection.consumer,
            delivery: Delivery::new(message.payload.clone(), message.headers.clone(), info),
        });
    }
}
