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

//! Per-handle notifications.
//!
//! Every handle owns an unbounded event stream created together with the
//! handle, so no notification can be emitted before the caller is able to
//! observe it.

use crate::error::BrokerError;
use tokio::sync::{mpsc, Mutex};

/// Notifications for an exchange handle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExchangeEvent {
    Open,
    Error(BrokerError),
    Close,
}

/// Notifications for a queue handle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueueEvent {
    Open,
    Error(BrokerError),
    Close,
    QueueBindOk,
    QueueUnbindOk,
    BasicConsumeOk { consumer_tag: String },
    BasicCancelOk { consumer_tag: String },
}

/// Notifications for a connection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConnectionEvent {
    Ready,
    Close,
}

/// Emitting side of an [`EventStream`].
pub(crate) struct EventSink<E> {
    sender: mpsc::UnboundedSender<E>,
}

impl<E> Clone for EventSink<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E> EventSink<E> {
    /// Emits one event; events for handles that have been dropped are discarded.
    pub(crate) fn emit(&self, event: E) {
        let _ = self.sender.send(event);
    }
}

/// Ordered stream of notifications for one handle.
pub struct EventStream<E> {
    receiver: Mutex<mpsc::UnboundedReceiver<E>>,
}

impl<E> EventStream<E> {
    pub(crate) fn channel() -> (EventSink<E>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            EventSink { sender },
            Self {
                receiver: Mutex::new(receiver),
            },
        )
    }

    /// Waits for the next event. Returns `None` once the broker can no longer
    /// emit events for this handle.
    pub async fn next(&self) -> Option<E> {
        self.receiver.lock().await.recv().await
    }

    /// Returns the next already-emitted event without waiting.
    pub fn try_next(&self) -> Option<E> {
        self.receiver.try_lock().ok()?.try_recv().ok()
    }

    /// Returns every already-emitted event, oldest first.
    pub fn drain(&self) -> Vec<E> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
