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

//! Delivered messages and the consumer callback seam.

use crate::observability::{events, fields};
use crate::options::Headers;
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "delivery";

/// Metadata describing where a delivery came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeliveryInfo {
    pub queue: String,
    pub delivery_tag: String,
    /// Always `false`; nothing is ever redelivered.
    pub redelivered: bool,
    pub exchange: String,
    pub routing_key: String,
    pub consumer_tag: String,
    pub content_type: Option<String>,
}

/// Acknowledgement handle attached to each delivery. Acknowledging has no
/// effect on routing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Acknowledger {
    delivery_tag: String,
}

impl Acknowledger {
    pub fn acknowledge(&self, multiple: bool) {
        debug!(
            event = events::DELIVERY_ACKNOWLEDGED,
            component = COMPONENT,
            delivery_tag = self.delivery_tag.as_str(),
            multiple,
            "delivery acknowledged"
        );
    }
}

/// One message handed to one consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub payload: Vec<u8>,
    pub headers: Headers,
    pub info: DeliveryInfo,
    pub acknowledger: Acknowledger,
}

impl Delivery {
    pub(crate) fn new(payload: Vec<u8>, headers: Headers, info: DeliveryInfo) -> Self {
        let acknowledger = Acknowledger {
            delivery_tag: info.delivery_tag.clone(),
        };
        Self {
            payload,
            headers,
            info,
            acknowledger,
        }
    }

    /// Payload as UTF-8 text, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Receives deliveries for one subscription.
///
/// Deliveries are handed over one at a time on the broker's scheduler, in
/// routing order. A panicking consumer does not prevent other consumers from
/// receiving the same message.
#[async_trait]
pub trait Consumer: Send + Sync {
    async fn on_delivery(&self, delivery: Delivery);
}

struct FnConsumer<F> {
    callback: F,
}

#[async_trait]
impl<F> Consumer for FnConsumer<F>
where
    F: Fn(Delivery) + Send + Sync,
{
    async fn on_delivery(&self, delivery: Delivery) {
        (self.callback)(delivery);
    }
}

/// Wraps a synchronous closure as a [`Consumer`].
pub fn consumer_fn<F>(callback: F) -> Arc<dyn Consumer>
where
    F: Fn(Delivery) + Send + Sync + 'static,
{
    Arc::new(FnConsumer { callback })
}

/// A delivery bound to the consumer selected for it.
pub(crate) struct PendingDelivery {
    pub(crate) consumer: Arc<dyn Consumer>,
    pub(crate) delivery: Delivery,
}

/// Invokes consumers sequentially, isolating panics per delivery.
pub(crate) async fn dispatch(deliveries: Vec<PendingDelivery>) {
    for PendingDelivery { consumer, delivery } in deliveries {
        let queue = delivery.info.queue.clone();
        let consumer_tag = delivery.info.consumer_tag.clone();

        let outcome = AssertUnwindSafe(consumer.on_delivery(delivery))
            .catch_unwind()
            .await;

        if outcome.is_err() {
            warn!(
                event = events::DELIVERY_LISTENER_PANICKED,
                component = COMPONENT,
                queue = queue.as_str(),
                consumer_tag = consumer_tag.as_str(),
                reason = fields::REASON_LISTENER_PANICKED,
                "consumer panicked while handling delivery"
            );
        }
    }
}
