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

//! Objects that can sit on the receiving end of a binding.

use crate::control_plane::entity::{ExchangeCore, InstanceId, LifecycleCell, QueueCore};
use crate::control_plane::entity_registry::EntityRegistry;
use crate::error::BrokerError;
use crate::events::{ExchangeEvent, QueueEvent};
use crate::routing::publish_router::PublishRouter;

/// Receiving end of a binding: a queue, or an exchange that re-routes.
pub(crate) trait BindingTarget: Send + Sync {
    fn instance_id(&self) -> InstanceId;

    fn target_name(&self) -> &str;

    fn generation(&self) -> u64;

    fn lifecycle(&self) -> &LifecycleCell;

    /// Fails with not-found unless the object names a live, really declared entity.
    fn ensure_bindable(&self, registry: &EntityRegistry, vhost: &str) -> Result<(), BrokerError>;

    /// Hands a message that reached this object to the router.
    fn accept(&self, router: &mut PublishRouter<'_>);

    fn notify_bound(&self);

    fn notify_unbound(&self);

    fn notify_error(&self, error: BrokerError);
}

impl BindingTarget for ExchangeCore {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn target_name(&self) -> &str {
        &self.name
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn lifecycle(&self) -> &LifecycleCell {
        &self.lifecycle
    }

    fn ensure_bindable(&self, registry: &EntityRegistry, vhost: &str) -> Result<(), BrokerError> {
        let registered = registry.exchange_by_id(self.id).is_some();
        if registered && self.lifecycle.is_live() && registry.exchange_exists(&self.name) {
            Ok(())
        } else {
            Err(BrokerError::no_exchange(&self.name, vhost))
        }
    }

    fn accept(&self, router: &mut PublishRouter<'_>) {
        router.forward_to_exchange(&self.name);
    }

    // Exchanges have no bind acknowledgement.
    fn notify_bound(&self) {}

    fn notify_unbound(&self) {}

    fn notify_error(&self, error: BrokerError) {
        self.emit(ExchangeEvent::Error(error));
    }
}

impl BindingTarget for QueueCore {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn target_name(&self) -> &str {
        &self.name
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn lifecycle(&self) -> &LifecycleCell {
        &self.lifecycle
    }

    fn ensure_bindable(&self, registry: &EntityRegistry, vhost: &str) -> Result<(), BrokerError> {
        let registered = registry.queue_by_id(self.id).is_some();
        if registered && self.lifecycle.is_live() && registry.queue_exists(&self.name) {
            Ok(())
        } else {
            Err(BrokerError::no_queue(&self.name, vhost))
        }
    }

    fn accept(&self, router: &mut PublishRouter<'_>) {
        router.enqueue(&self.name);
    }

    fn notify_bound(&self) {
        self.emit(QueueEvent::QueueBindOk);
    }

    fn notify_unbound(&self) {
        self.emit(QueueEvent::QueueUnbindOk);
    }

    fn notify_error(&self, error: BrokerError) {
        self.emit(QueueEvent::Error(error));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::BindingTarget;
    use crate::control_plane::entity::{InstanceId, LifecycleCell};
    use crate::control_plane::entity_registry::EntityRegistry;
    use crate::error::BrokerError;
    use crate::routing::publish_router::PublishRouter;
    use std::sync::Arc;

    /// Queue-like target that records nothing and always accepts bindings.
    pub(crate) struct StubTarget {
        pub(crate) id: InstanceId,
        name: String,
        lifecycle: LifecycleCell,
    }

    impl StubTarget {
        pub(crate) fn new(name: &str) -> Arc<Self> {
            let lifecycle = LifecycleCell::new();
            lifecycle.resolve_declare(Ok(()));
            Arc::new(Self {
                id: InstanceId::next(),
                name: name.to_string(),
                lifecycle,
            })
        }
    }

    impl BindingTarget for StubTarget {
        fn instance_id(&self) -> InstanceId {
            self.id
        }

        fn target_name(&self) -> &str {
            &self.name
        }

        fn generation(&self) -> u64 {
            0
        }

        fn lifecycle(&self) -> &LifecycleCell {
            &self.lifecycle
        }

        fn ensure_bindable(&self, _: &EntityRegistry, _: &str) -> Result<(), BrokerError> {
            Ok(())
        }

        fn accept(&self, router: &mut PublishRouter<'_>) {
            router.enqueue(&self.name);
        }

        fn notify_bound(&self) {}

        fn notify_unbound(&self) {}

        fn notify_error(&self, _: BrokerError) {}
    }
}
