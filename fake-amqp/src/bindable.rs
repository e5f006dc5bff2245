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

use crate::completion::Completion;
use crate::exchange::ExchangeHandle;
use crate::queue::QueueHandle;

/// Exchange used by [`Bindable::bind_default`].
pub const DEFAULT_BIND_EXCHANGE: &str = "amq.topic";

/// Names the source exchange of a binding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExchangeRef<'a>(&'a str);

impl<'a> ExchangeRef<'a> {
    pub fn name(&self) -> &'a str {
        self.0
    }
}

impl<'a> From<&'a str> for ExchangeRef<'a> {
    fn from(name: &'a str) -> Self {
        Self(name)
    }
}

impl<'a> From<&'a String> for ExchangeRef<'a> {
    fn from(name: &'a String) -> Self {
        Self(name.as_str())
    }
}

impl<'a> From<&'a ExchangeHandle> for ExchangeRef<'a> {
    fn from(exchange: &'a ExchangeHandle) -> Self {
        Self(exchange.name())
    }
}

mod sealed {
    use crate::broker::BrokerContext;
    use crate::routing::binding_target::BindingTarget;
    use std::sync::Arc;

    pub struct BindingEndpoint {
        pub(crate) context: BrokerContext,
        pub(crate) target: Arc<dyn BindingTarget>,
    }

    pub trait Sealed {
        fn binding_endpoint(&self) -> BindingEndpoint;
    }
}

impl sealed::Sealed for ExchangeHandle {
    fn binding_endpoint(&self) -> sealed::BindingEndpoint {
        sealed::BindingEndpoint {
            context: self.context.clone(),
            target: self.core.clone(),
        }
    }
}

impl sealed::Sealed for QueueHandle {
    fn binding_endpoint(&self) -> sealed::BindingEndpoint {
        sealed::BindingEndpoint {
            context: self.context.clone(),
            target: self.core.clone(),
        }
    }
}

/// Objects that can be bound to an exchange: queues and other exchanges.
///
/// Bindings are stored as given; binding the same triple twice yields two
/// rows, yet each object still receives a message at most once per publish.
pub trait Bindable: sealed::Sealed {
    /// Binds to `exchange` with a routing key, which may be a topic pattern.
    fn bind<'a>(&self, exchange: impl Into<ExchangeRef<'a>>, routing_key: &str) -> Completion<()> {
        let sealed::BindingEndpoint { context, target } = self.binding_endpoint();
        let exchange: ExchangeRef<'a> = exchange.into();
        let exchange_name = exchange.name().to_string();
        let routing_key = routing_key.to_string();
        context.schedule(move |lifecycle| lifecycle.bind(target, &exchange_name, &routing_key))
    }

    /// Binds to [`DEFAULT_BIND_EXCHANGE`].
    fn bind_default(&self, routing_key: &str) -> Completion<()> {
        self.bind(DEFAULT_BIND_EXCHANGE, routing_key)
    }

    /// Removes bindings to `exchange`; all of them when `routing_key` is
    /// `None`. Succeeds even if nothing was bound.
    fn unbind<'a>(
        &self,
        exchange: impl Into<ExchangeRef<'a>>,
        routing_key: Option<&str>,
    ) -> Completion<()> {
        let sealed::BindingEndpoint { context, target } = self.binding_endpoint();
        let exchange: ExchangeRef<'a> = exchange.into();
        let exchange_name = exchange.name().to_string();
        let routing_key = routing_key.map(str::to_string);
        context.schedule(move |lifecycle| {
            lifecycle.unbind(target, &exchange_name, routing_key.as_deref())
        })
    }
}

impl Bindable for ExchangeHandle {}

impl Bindable for QueueHandle {}
