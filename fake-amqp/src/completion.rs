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

use crate::error::BrokerError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

const SCHEDULER_STOPPED_REASON: &str = "scheduler stopped";

///
/// [`Completion`] resolves once the broker has processed an operation during
/// its scheduled turn.
///
/// Operations are applied whether or not the completion is awaited. Dropping a
/// completion only detaches the caller from the result; it never cancels the
/// operation.
///
/// # Examples
///
/// ```
/// use fake_amqp::{Bindable, Broker, BrokerConfig, ConnectionOptions, ImplOptions, QueueOptions};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let broker = Broker::new(BrokerConfig::default()).unwrap();
/// let connection = broker.connect(ConnectionOptions::default(), ImplOptions::default());
/// let queue = connection.declare_queue("orders", QueueOptions::default());
///
/// // Not awaited: the bind still happens in its turn.
/// let _detached = queue.bind("amq.topic", "orders.#");
///
/// queue.opened().await.unwrap();
/// queue.bind("amq.direct", "orders").await.unwrap();
/// # });
/// ```
#[must_use = "dropping a completion detaches from the result; the operation still runs"]
pub struct Completion<T> {
    receiver: oneshot::Receiver<Result<T, BrokerError>>,
}

/// Producer side of a [`Completion`].
pub(crate) struct Completer<T> {
    sender: oneshot::Sender<Result<T, BrokerError>>,
}

pub(crate) fn completion_pair<T>() -> (Completer<T>, Completion<T>) {
    let (sender, receiver) = oneshot::channel();
    (Completer { sender }, Completion { receiver })
}

impl<T> Completer<T> {
    pub(crate) fn complete(self, result: Result<T, BrokerError>) {
        // The caller may have detached; the operation has already been applied.
        let _ = self.sender.send(result);
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, BrokerError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received
                .unwrap_or_else(|_| Err(BrokerError::connection_forced(SCHEDULER_STOPPED_REASON)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::completion_pair;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn completion_yields_completed_value() {
        let (completer, completion) = completion_pair::<u32>();
        completer.complete(Ok(7));

        assert_eq!(completion.await, Ok(7));
    }

    #[tokio::test]
    async fn dropped_completer_reports_forced_closure() {
        let (completer, completion) = completion_pair::<()>();
        drop(completer);

        let error = completion.await.expect_err("dropped completer should fail");
        assert_eq!(error.kind(), ErrorCode::ConnectionForced);
    }

    #[test]
    fn completing_a_detached_completion_is_harmless() {
        let (completer, completion) = completion_pair::<()>();
        drop(completion);

        completer.complete(Ok(()));
    }
}
