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

//! Runtime helper for spawning the broker's scheduler loop.

use std::future::Future;
use std::io;
use std::thread;
use tokio::runtime::Builder;

pub(crate) const SCHEDULER_RUNTIME_THREAD_NAME: &str = "fake-amqp-sched";

/// Runs `run_loop` to completion on a dedicated thread that owns a
/// current-thread Tokio runtime.
pub(crate) fn spawn_scheduler_loop<F, Fut>(
    thread_name: &str,
    run_loop: F,
) -> io::Result<thread::JoinHandle<()>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let runtime = Builder::new_current_thread().enable_time().build()?;

    thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || {
            runtime.block_on(run_loop());
        })
}
