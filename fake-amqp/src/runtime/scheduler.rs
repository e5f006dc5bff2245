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

//! FIFO turn scheduler.
//!
//! Operations run one at a time in submission order on a dedicated thread.
//! The loop yields after every turn, so work submitted from inside a turn
//! always lands in a later one.

use crate::control_plane::broker_state::SharedState;
use crate::observability::{events, fields};
use crate::runtime::worker_runtime::{spawn_scheduler_loop, SCHEDULER_RUNTIME_THREAD_NAME};
use futures::future::BoxFuture;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const COMPONENT: &str = "scheduler";

/// One unit of deferred work, run against the broker state in its turn.
pub(crate) type Operation = Box<dyn FnOnce(&SharedState) -> BoxFuture<'static, ()> + Send>;

#[derive(Clone)]
pub(crate) struct Scheduler {
    sender: mpsc::UnboundedSender<Operation>,
}

impl Scheduler {
    /// Spawns the turn loop. `tick` is an extra pause between turns.
    pub(crate) fn start(state: SharedState, tick: Duration) -> io::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();

        if let Err(err) = spawn_scheduler_loop(SCHEDULER_RUNTIME_THREAD_NAME, move || {
            Self::run_loop(state, receiver, tick)
        }) {
            error!(
                event = events::RUNTIME_SPAWN_FAILED,
                component = COMPONENT,
                err = %err,
                "failed to spawn scheduler runtime"
            );
            return Err(err);
        }

        info!(
            event = events::RUNTIME_SPAWN_OK,
            component = COMPONENT,
            worker_thread = SCHEDULER_RUNTIME_THREAD_NAME,
            tick_ms = tick.as_millis() as u64,
            "scheduler runtime started"
        );

        Ok(Self { sender })
    }

    /// Queues `operation` behind everything submitted before it.
    pub(crate) fn submit(&self, operation: Operation) {
        if self.sender.send(operation).is_err() {
            warn!(
                event = events::RUNTIME_LOOP_STOPPED,
                component = COMPONENT,
                reason = fields::REASON_OPERATION_CHANNEL_CLOSED,
                "scheduler loop is gone; operation discarded"
            );
        }
    }

    async fn run_loop(
        state: SharedState,
        mut receiver: mpsc::UnboundedReceiver<Operation>,
        tick: Duration,
    ) {
        while let Some(operation) = receiver.recv().await {
            operation(&state).await;

            if tick.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(tick).await;
            }
        }

        info!(
            event = events::RUNTIME_LOOP_STOPPED,
            component = COMPONENT,
            reason = fields::REASON_OPERATION_CHANNEL_CLOSED,
            "all broker handles dropped; stopping scheduler loop"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use crate::control_plane::broker_state::{lock_state, BrokerState, SharedState};
    use futures::FutureExt;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn operations_run_in_submission_order() {
        let state: SharedState = Arc::new(Mutex::new(BrokerState::new("/")));
        let scheduler = Scheduler::start(state, Duration::ZERO).expect("scheduler should start");
        let order = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = oneshot::channel();

        for turn in 0..3 {
            let order = order.clone();
            scheduler.submit(Box::new(move |state: &SharedState| {
                assert_eq!(lock_state(state).generation(), 0);
                order.lock().expect("lock").push(turn);
                futures::future::ready(()).boxed()
            }));
        }
        scheduler.submit(Box::new(move |_: &SharedState| {
            let _ = done_tx.send(());
            futures::future::ready(()).boxed()
        }));

        done_rx.await.expect("final turn should run");
        assert_eq!(*order.lock().expect("lock"), vec![0, 1, 2]);
    }
}
