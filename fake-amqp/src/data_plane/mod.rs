//! Data-plane layer.
//!
//! Owns consumer groups and delivery dispatch. Messages routed to a queue go
//! to one consumer of that queue, picked round-robin; consumers are invoked
//! after the routing turn has released the broker state.
//!
//! ```
//! use fake_amqp::{
//!     consumer_fn, Broker, BrokerConfig, ConnectionOptions, Delivery, ImplOptions,
//!     PublishOptions, QueueOptions, SubscribeOptions,
//! };
//! use std::sync::{Arc, Mutex};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let broker = Broker::new(BrokerConfig::default()).unwrap();
//! let connection = broker.connect(ConnectionOptions::default(), ImplOptions::default());
//! let queue = connection.declare_queue("work", QueueOptions::default());
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! for _ in 0..2 {
//!     let seen = seen.clone();
//!     queue
//!         .subscribe(
//!             SubscribeOptions::default(),
//!             consumer_fn(move |delivery: Delivery| {
//!                 seen.lock().unwrap().push(delivery.info.consumer_tag.clone())
//!             }),
//!         )
//!         .await
//!         .unwrap();
//! }
//!
//! // The default exchange routes by queue name.
//! for _ in 0..4 {
//!     connection
//!         .publish("work", "job", PublishOptions::default())
//!         .await
//!         .unwrap();
//! }
//!
//! let seen = seen.lock().unwrap();
//! assert_eq!(seen.len(), 4);
//! assert_ne!(seen[0], seen[1]);
//! assert_eq!(seen[0], seen[2]);
//! # });
//! ```

pub(crate) mod delivery;
pub(crate) mod subscriber_registry;
