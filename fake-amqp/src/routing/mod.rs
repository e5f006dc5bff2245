//! Routing layer.
//!
//! Owns the binding table, topic pattern compilation and the per-publish
//! resolution that turns one message into deliveries. Exchange types decide
//! which rows match; each bound object is reached at most once per publish.
//!
//! ```
//! use fake_amqp::{
//!     consumer_fn, Bindable, Broker, BrokerConfig, ConnectionOptions, Delivery, ExchangeOptions,
//!     ExchangeType, ImplOptions, PublishOptions, QueueOptions, SubscribeOptions,
//! };
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let broker = Broker::new(BrokerConfig::default()).unwrap();
//! let connection = broker.connect(ConnectionOptions::default(), ImplOptions::default());
//!
//! let events = connection.declare_exchange("events", ExchangeOptions::of_type(ExchangeType::Topic));
//! let queue = connection.declare_queue("sensors", QueueOptions::default());
//!
//! // Two bindings reach the same queue; it still receives one copy.
//! queue.bind(&events, "sensor.*").await.unwrap();
//! queue.bind(&events, "sensor.#").await.unwrap();
//!
//! let count = Arc::new(AtomicUsize::new(0));
//! let counter = count.clone();
//! queue
//!     .subscribe(
//!         SubscribeOptions::default(),
//!         consumer_fn(move |_: Delivery| {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!         }),
//!     )
//!     .await
//!     .unwrap();
//!
//! events
//!     .publish("sensor.temperature", "21.5", PublishOptions::default())
//!     .await
//!     .unwrap();
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! # });
//! ```

pub(crate) mod binding_table;
pub(crate) mod binding_target;
pub(crate) mod publish_router;
pub(crate) mod topic_pattern;
