/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
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

use async_trait::async_trait;
use fake_amqp::{Consumer, Delivery};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone)]
pub struct RecordingConsumer {
    name: String,
    message_store: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingConsumer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            message_store: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn retrieve_message_store(&self) -> Arc<Mutex<Vec<Delivery>>> {
        self.message_store.clone()
    }

    pub async fn count(&self) -> usize {
        self.message_store.lock().await.len()
    }

    /// Payloads received so far, decoded as UTF-8.
    pub async fn payloads(&self) -> Vec<String> {
        self.message_store
            .lock()
            .await
            .iter()
            .map(|delivery| String::from_utf8_lossy(&delivery.payload).into_owned())
            .collect()
    }

    /// Queue names of the deliveries received so far, in order.
    pub async fn queues(&self) -> Vec<String> {
        self.message_store
            .lock()
            .await
            .iter()
            .map(|delivery| delivery.info.queue.clone())
            .collect()
    }
}

#[async_trait]
impl Consumer for RecordingConsumer {
    async fn on_delivery(&self, delivery: Delivery) {
        debug!(
            "within {}! queue: {}, routing_key: {}",
            self.name, delivery.info.queue, delivery.info.routing_key
        );
        self.message_store.lock().await.push(delivery);
    }
}

/// Panics on every delivery.
pub struct PanickingConsumer;

#[async_trait]
impl Consumer for PanickingConsumer {
    async fn on_delivery(&self, delivery: Delivery) {
        panic!("consumer refused delivery on queue {}", delivery.info.queue);
    }
}
