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

//! Registry of declared exchange and queue instances.
//!
//! Several instances may share a name. An entity "exists" when at least one
//! live, really declared instance with that name is registered.

use crate::connection::ConnectionId;
use crate::control_plane::entity::{ExchangeCore, InstanceId, QueueCore};
use crate::error::BrokerError;
use std::sync::Arc;

const RESERVED_NAME_PREFIX: &str = "amq.";

#[derive(Default)]
pub(crate) struct EntityRegistry {
    exchanges: Vec<Arc<ExchangeCore>>,
    queues: Vec<Arc<QueueCore>>,
}

impl EntityRegistry {
    // Items borrow the registry only; `name` just has to outlive the iteration.
    fn real_exchanges<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Arc<ExchangeCore>> + 'n
    where
        'a: 'n,
    {
        self.exchanges.iter().filter(move |exchange| {
            exchange.name == name && exchange.is_real() && exchange.lifecycle.is_live()
        })
    }

    fn real_queues<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Arc<QueueCore>> + 'n
    where
        'a: 'n,
    {
        self.queues
            .iter()
            .filter(move |queue| queue.name == name && queue.is_real() && queue.lifecycle.is_live())
    }

    pub(crate) fn exchange_exists(&self, name: &str) -> bool {
        self.real_exchanges(name).next().is_some()
    }

    pub(crate) fn queue_exists(&self, name: &str) -> bool {
        self.real_queues(name).next().is_some()
    }

    /// The instance whose declaration defines how `name` routes.
    pub(crate) fn find_exchange(&self, name: &str) -> Option<&Arc<ExchangeCore>> {
        let mut candidates = self.real_exchanges(name);
        let first = candidates.next()?;
        if first.is_authoritative() {
            return Some(first);
        }
        candidates
            .find(|exchange| exchange.is_authoritative())
            .or(Some(first))
    }

    pub(crate) fn find_queue(&self, name: &str) -> Option<&Arc<QueueCore>> {
        self.real_queues(name).next()
    }

    pub(crate) fn exchange_by_id(&self, id: InstanceId) -> Option<&Arc<ExchangeCore>> {
        self.exchanges.iter().find(|exchange| exchange.id == id)
    }

    pub(crate) fn queue_by_id(&self, id: InstanceId) -> Option<&Arc<QueueCore>> {
        self.queues.iter().find(|queue| queue.id == id)
    }

    /// Live instances sharing `name`, regardless of how they were declared.
    pub(crate) fn exchanges_named(&self, name: &str) -> Vec<Arc<ExchangeCore>> {
        self.exchanges
            .iter()
            .filter(|exchange| exchange.name == name && exchange.lifecycle.is_live())
            .cloned()
            .collect()
    }

    /// Real, non-passive queue instances sharing `name`, excluding `except`.
    pub(crate) fn authoritative_queues_named(
        &self,
        name: &str,
        except: InstanceId,
    ) -> Vec<Arc<QueueCore>> {
        self.real_queues(name)
            .filter(|queue| queue.id != except && queue.is_authoritative())
            .cloned()
            .collect()
    }

    pub(crate) fn exclusive_queues_of(&self, connection: ConnectionId) -> Vec<Arc<QueueCore>> {
        self.queues
            .iter()
            .filter(|queue| queue.options.exclusive && queue.connection == connection)
            .cloned()
            .collect()
    }

    /// Inserts a built-in exchange without validation.
    pub(crate) fn seed_exchange(&mut self, exchange: Arc<ExchangeCore>) {
        self.exchanges.push(exchange);
    }

    /// Validates an exchange declaration against existing instances and
    /// registers it on success.
    pub(crate) fn register_exchange(
        &mut self,
        exchange: Arc<ExchangeCore>,
        vhost: &str,
    ) -> Result<(), BrokerError> {
        if exchange.options.no_declare {
            self.exchanges.push(exchange);
            return Ok(());
        }

        let exists = self.exchange_exists(&exchange.name);

        if exchange.options.passive {
            if !exists {
                return Err(BrokerError::no_exchange(&exchange.name, vhost));
            }
            self.exchanges.push(exchange);
            return Ok(());
        }

        if exchange.name.is_empty() {
            return Err(BrokerError::default_exchange_refused());
        }

        if !exists && exchange.name.starts_with(RESERVED_NAME_PREFIX) {
            return Err(BrokerError::reserved_exchange_name(&exchange.name));
        }

        if let Some(current) = self
            .real_exchanges(&exchange.name)
            .find(|current| current.is_authoritative())
        {
            let equivalent = current.options.exchange_type == exchange.options.exchange_type
                && current.options.durable == exchange.options.durable
                && current.options.auto_delete == exchange.options.auto_delete;
            if !equivalent {
                return Err(BrokerError::exchange_not_equivalent(&exchange.name, vhost));
            }
        }

        self.exchanges.push(exchange);
        Ok(())
    }

    /// Validates a queue declaration against existing instances and registers
    /// it on success.
    pub(crate) fn register_queue(
        &mut self,
        queue: Arc<QueueCore>,
        vhost: &str,
    ) -> Result<(), BrokerError> {
        if queue.options.no_declare {
            self.queues.push(queue);
            return Ok(());
        }

        if !queue.server_named
            && !queue.options.passive
            && queue.name.starts_with(RESERVED_NAME_PREFIX)
        {
            return Err(BrokerError::reserved_queue_name(&queue.name));
        }

        let existing: Vec<&Arc<QueueCore>> = self.real_queues(&queue.name).collect();
        let owned_elsewhere = |current: &&Arc<QueueCore>| {
            current.options.exclusive && current.connection != queue.connection
        };

        if queue.options.passive {
            if existing.is_empty() {
                return Err(BrokerError::no_queue(&queue.name, vhost));
            }
            if existing.iter().any(owned_elsewhere) {
                return Err(BrokerError::queue_locked(&queue.name, vhost));
            }
            self.queues.push(queue);
            return Ok(());
        }

        if existing.iter().any(owned_elsewhere) {
            return Err(if queue.options.exclusive {
                BrokerError::queue_locked(&queue.name, vhost)
            } else {
                BrokerError::queue_in_exclusive_use(&queue.name, vhost)
            });
        }

        if let Some(current) = existing
            .iter()
            .find(|current| current.is_authoritative())
        {
            if queue.options.exclusive && !current.options.exclusive {
                return Err(BrokerError::queue_locked(&queue.name, vhost));
            }
            if !queue.options.exclusive && current.options.exclusive {
                return Err(BrokerError::queue_in_exclusive_use(&queue.name, vhost));
            }
            let equivalent = current.options.durable == queue.options.durable
                && current.options.auto_delete == queue.options.auto_delete;
            if !equivalent {
                return Err(BrokerError::queue_not_equivalent(&queue.name, vhost));
            }
        }

        self.queues.push(queue);
        Ok(())
    }

    pub(crate) fn remove_exchange(&mut self, id: InstanceId) -> bool {
        let before = self.exchanges.len();
        self.exchanges.retain(|exchange| exchange.id != id);
        self.exchanges.len() != before
    }

    pub(crate) fn remove_queue(&mut self, id: InstanceId) -> bool {
        let before = self.queues.len();
        self.queues.retain(|queue| queue.id != id);
        self.queues.len() != before
    }

    /// Empties the registry, handing back every instance it held.
    pub(crate) fn drain(&mut self) -> (Vec<Arc<ExchangeCore>>, Vec<Arc<QueueCore>>) {
        (
            std::mem::take(&mut self.exchanges),
            std::mem::take(&mut self.queues),
        )
    }
}
