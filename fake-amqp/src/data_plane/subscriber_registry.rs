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

//! Consumers grouped by queue name with least-recently-dispatched selection.

use crate::control_plane::entity::InstanceId;
use crate::data_plane::delivery::Consumer;
use crate::error::BrokerError;
use std::collections::HashMap;
use std::sync::Arc;

/// One attached consumer.
pub(crate) struct Subscriber {
    pub(crate) consumer_tag: String,
    /// Queue handle that subscribed.
    pub(crate) queue: InstanceId,
    pub(crate) consumer: Arc<dyn Consumer>,
    pub(crate) exclusive: bool,
    last_dispatch: u64,
}

impl Subscriber {
    pub(crate) fn new(
        consumer_tag: String,
        queue: InstanceId,
        consumer: Arc<dyn Consumer>,
        exclusive: bool,
    ) -> Self {
        Self {
            consumer_tag,
            queue,
            consumer,
            exclusive,
            last_dispatch: 0,
        }
    }
}

/// A consumer chosen to receive one delivery.
pub(crate) struct Selection {
    pub(crate) consumer_tag: String,
    pub(crate) consumer: Arc<dyn Consumer>,
}

#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    groups: HashMap<String, Vec<Subscriber>>,
    dispatch_clock: u64,
}

impl SubscriberRegistry {
    pub(crate) fn tag_in_use(&self, consumer_tag: &str) -> bool {
        self.groups
            .values()
            .flatten()
            .any(|subscriber| subscriber.consumer_tag == consumer_tag)
    }

    /// Attaches a consumer to `queue_name`, enforcing tag uniqueness and
    /// consumer exclusivity.
    pub(crate) fn add(
        &mut self,
        queue_name: &str,
        subscriber: Subscriber,
        vhost: &str,
    ) -> Result<(), BrokerError> {
        if self.tag_in_use(&subscriber.consumer_tag) {
            return Err(BrokerError::consumer_tag_in_use(&subscriber.consumer_tag));
        }

        let group = self.groups.entry(queue_name.to_string()).or_default();
        let exclusive_held = group.iter().any(|current| current.exclusive);
        if exclusive_held || (subscriber.exclusive && !group.is_empty()) {
            return Err(BrokerError::queue_in_exclusive_use(queue_name, vhost));
        }

        group.push(subscriber);
        Ok(())
    }

    /// Detaches the consumer with `consumer_tag` from `queue_name`.
    pub(crate) fn remove(&mut self, queue_name: &str, consumer_tag: &str) -> Option<Subscriber> {
        let group = self.groups.get_mut(queue_name)?;
        let position = group
            .iter()
            .position(|subscriber| subscriber.consumer_tag == consumer_tag)?;
        let removed = group.remove(position);
        if group.is_empty() {
            self.groups.remove(queue_name);
        }
        Some(removed)
    }

    /// Detaches every consumer attached through the queue handle `queue`.
    pub(crate) fn remove_queue_instance(&mut self, queue_name: &str, queue: InstanceId) -> usize {
        let Some(group) = self.groups.get_mut(queue_name) else {
            return 0;
        };
        let before = group.len();
        group.retain(|subscriber| subscriber.queue != queue);
        let removed = before - group.len();
        if group.is_empty() {
            self.groups.remove(queue_name);
        }
        removed
    }

    pub(crate) fn count(&self, queue_name: &str) -> usize {
        self.groups.get(queue_name).map_or(0, Vec::len)
    }

    /// Picks the consumer that has waited longest, earliest-attached first on
    /// ties, and records the dispatch.
    pub(crate) fn select(&mut self, queue_name: &str) -> Option<Selection> {
        let group = self.groups.get_mut(queue_name)?;
        let chosen = group
            .iter_mut()
            .min_by_key(|subscriber| subscriber.last_dispatch)?;

        self.dispatch_clock += 1;
        chosen.last_dispatch = self.dispatch_clock;

        Some(Selection {
            consumer_tag: chosen.consumer_tag.clone(),
            consumer: chosen.consumer.clone(),
        })
    }

    pub(crate) fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Subscriber, SubscriberRegistry};
    use crate::control_plane::entity::InstanceId;
    use crate::data_plane::delivery::{consumer_fn, Delivery};
    use crate::error::ErrorCode;

    const VHOST: &str = "/";

    fn subscriber(tag: &str, exclusive: bool) -> Subscriber {
        Subscriber::new(
            tag.to_string(),
            InstanceId::next(),
            consumer_fn(|_: Delivery| {}),
            exclusive,
        )
    }

    fn select_tag(registry: &mut SubscriberRegistry, queue: &str) -> String {
        registry
            .select(queue)
            .map(|selection| selection.consumer_tag)
            .expect("a consumer should be selected")
    }

    #[test]
    fn selection_rotates_in_attachment_order() {
        let mut registry = SubscriberRegistry::default();
        for tag in ["c1", "c2", "c3"] {
            registry.add("q", subscriber(tag, false), VHOST).expect("add");
        }

        let picked: Vec<String> = (0..4).map(|_| select_tag(&mut registry, "q")).collect();
        assert_eq!(picked, vec!["c1", "c2", "c3", "c1"]);
    }

    #[test]
    fn newly_attached_consumer_is_served_next() {
        let mut registry = SubscriberRegistry::default();
        registry.add("q", subscriber("c1", false), VHOST).expect("add");
        assert_eq!(select_tag(&mut registry, "q"), "c1");

        registry.add("q", subscriber("c2", false), VHOST).expect("add");
        assert_eq!(select_tag(&mut registry, "q"), "c2");
        assert_eq!(select_tag(&mut registry, "q"), "c1");
    }

    #[test]
    fn groups_rotate_independently() {
        let mut registry = SubscriberRegistry::default();
        registry.add("a", subscriber("a1", false), VHOST).expect("add");
        registry.add("a", subscriber("a2", false), VHOST).expect("add");
        registry.add("b", subscriber("b1", false), VHOST).expect("add");

        assert_eq!(select_tag(&mut registry, "a"), "a1");
        assert_eq!(select_tag(&mut registry, "b"), "b1");
        assert_eq!(select_tag(&mut registry, "a"), "a2");
    }

    #[test]
    fn empty_group_selects_nothing() {
        let mut registry = SubscriberRegistry::default();

        assert!(registry.select("q").is_none());
    }

    #[test]
    fn reused_tag_is_rejected() {
        let mut registry = SubscriberRegistry::default();
        registry.add("a", subscriber("dup", false), VHOST).expect("add");

        let error = registry
            .add("b", subscriber("dup", false), VHOST)
            .expect_err("tag reuse should fail");
        assert_eq!(error.kind(), ErrorCode::NotAllowed);
    }

    #[test]
    fn exclusive_consumer_excludes_others() {
        let mut registry = SubscriberRegistry::default();
        registry.add("q", subscriber("solo", true), VHOST).expect("add");

        let error = registry
            .add("q", subscriber("other", false), VHOST)
            .expect_err("exclusive consumer should block others");
        assert_eq!(error.kind(), ErrorCode::AccessRefused);

        let mut shared = SubscriberRegistry::default();
        shared.add("q", subscriber("first", false), VHOST).expect("add");
        assert!(shared.add("q", subscriber("solo", true), VHOST).is_err());
    }

    #[test]
    fn removing_last_consumer_drops_group() {
        let mut registry = SubscriberRegistry::default();
        registry.add("q", subscriber("c1", false), VHOST).expect("add");

        assert!(registry.remove("q", "missing").is_none());
        assert!(registry.remove("q", "c1").is_some());
        assert_eq!(registry.count("q"), 0);
    }
}
