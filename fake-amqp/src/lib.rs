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

//! # fake-amqp
//!
//! `fake-amqp` is an in-memory stand-in for an AMQP 0-9-1 broker. Client code
//! declares exchanges and queues, binds them, publishes and consumes exactly
//! as it would against a real broker, without a network or a server process.
//!
//! Typical usage is centered on [`Broker`], [`Connection`], [`ExchangeHandle`]
//! and [`QueueHandle`].
//!
//! ## Quick start
//!
//! ```
//! use fake_amqp::{
//!     consumer_fn, Bindable, Broker, BrokerConfig, ConnectionOptions, Delivery, ImplOptions,
//!     PublishOptions, QueueOptions, SubscribeOptions,
//! };
//! use std::sync::{Arc, Mutex};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let broker = Broker::new(BrokerConfig::default()).unwrap();
//! let connection = broker.connect(
//!     ConnectionOptions::default(),
//!     ImplOptions {
//!         default_exchange_name: "amq.topic".to_string(),
//!         ..ImplOptions::default()
//!     },
//! );
//! connection.ready().await.unwrap();
//!
//! let queue = connection.declare_queue("audit", QueueOptions::default());
//! queue.bind_default("audit.#").await.unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! queue
//!     .subscribe(
//!         SubscribeOptions::default(),
//!         consumer_fn(move |delivery: Delivery| {
//!             sink.lock().unwrap().push(delivery.info.routing_key.clone())
//!         }),
//!     )
//!     .await
//!     .unwrap();
//!
//! connection
//!     .publish("audit.login", "alice", PublishOptions::default())
//!     .await
//!     .unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec!["audit.login".to_string()]);
//! # });
//! ```
//!
//! ## Operation contract
//!
//! Every operation is accepted immediately and applied on a later scheduler
//! turn, in the order it was issued. Declarations that the broker refuses are
//! reported through the handle's events and its `opened()` future, using AMQP
//! reply codes such as `NOT_FOUND` (404) or `PRECONDITION_FAILED` (406).
//!
//! ```
//! use fake_amqp::{Broker, BrokerConfig, ConnectionOptions, ErrorCode, ExchangeOptions, ExchangeType, ImplOptions};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let broker = Broker::new(BrokerConfig::default()).unwrap();
//! let connection = broker.connect(ConnectionOptions::default(), ImplOptions::default());
//!
//! let first = connection.declare_exchange("jobs", ExchangeOptions::of_type(ExchangeType::Direct));
//! let conflicting = connection.declare_exchange("jobs", ExchangeOptions::of_type(ExchangeType::Fanout));
//!
//! assert!(first.opened().await.is_ok());
//! let refused = conflicting.opened().await.unwrap_err();
//! assert_eq!(refused.kind(), ErrorCode::PreconditionFailed);
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: [`Broker`], [`Connection`] and the exchange and queue handles
//! - Control plane: entity registry and lifecycle transitions
//! - Routing: binding table, topic patterns and per-publish resolution
//! - Data plane: consumer groups and delivery dispatch
//! - Runtime: the scheduler thread that orders every operation
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod bindable;
pub use bindable::{Bindable, ExchangeRef, DEFAULT_BIND_EXCHANGE};

mod broker;
pub use broker::Broker;

mod completion;
pub use completion::Completion;

pub mod config;
pub use config::{BrokerConfig, ConnectionOptions, ImplOptions};

mod connection;
pub use connection::{Connection, ConnectionId};

mod error;
pub use error::{BrokerError, ErrorCode};

mod events;
pub use events::{ConnectionEvent, EventStream, ExchangeEvent, QueueEvent};

mod exchange;
pub use exchange::ExchangeHandle;

mod options;
pub use options::{
    CancelOk, Confirm, ConsumeOk, DestroyOptions, ExchangeOptions, ExchangeType, Headers,
    PublishOptions, QueueOptions, SubscribeOptions,
};

mod queue;
pub use queue::QueueHandle;

mod control_plane;
pub use control_plane::entity::LifecycleState;

mod data_plane;
pub use data_plane::delivery::{consumer_fn, Acknowledger, Consumer, Delivery, DeliveryInfo};

#[doc(hidden)]
pub mod observability;
mod routing;
mod runtime;
