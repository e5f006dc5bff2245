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

//! Binding rows linking a source exchange name to a bound object.

use crate::control_plane::entity::InstanceId;
use crate::error::BrokerError;
use crate::routing::binding_target::BindingTarget;
use crate::routing::topic_pattern::TopicPattern;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One `(exchange, routing key, object)` row, kept in insertion order.
pub(crate) struct Binding {
    pub(crate) exchange_name: String,
    pub(crate) pattern: TopicPattern,
    pub(crate) target: Arc<dyn BindingTarget>,
    /// Created by the broker when a queue is declared; not removable by unbind.
    pub(crate) implicit: bool,
}

impl Binding {
    pub(crate) fn routing_key(&self) -> &str {
        self.pattern.source()
    }
}

#[derive(Default)]
pub(crate) struct BindingTable {
    rows: Vec<Binding>,
}

impl BindingTable {
    /// Appends a row; binding the same triple twice keeps both rows.
    pub(crate) fn bind(
        &mut self,
        exchange_name: &str,
        routing_key: &str,
        target: Arc<dyn BindingTarget>,
    ) -> Result<(), BrokerError> {
        self.insert(exchange_name, routing_key, target, false)
    }

    pub(crate) fn bind_implicit(
        &mut self,
        exchange_name: &str,
        routing_key: &str,
        target: Arc<dyn BindingTarget>,
    ) -> Result<(), BrokerError> {
        self.insert(exchange_name, routing_key, target, true)
    }

    fn insert(
        &mut self,
        exchange_name: &str,
        routing_key: &str,
        target: Arc<dyn BindingTarget>,
        implicit: bool,
    ) -> Result<(), BrokerError> {
        let pattern = TopicPattern::compile(routing_key)?;
        self.rows.push(Binding {
            exchange_name: exchange_name.to_string(),
            pattern,
            target,
            implicit,
        });
        Ok(())
    }

    /// Removes explicit rows of `target` on `exchange_name`, optionally only
    /// those with a matching routing key. Returns how many were removed.
    pub(crate) fn unbind_one(
        &mut self,
        target: InstanceId,
        exchange_name: &str,
        routing_key: Option<&str>,
    ) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| {
            let selected = !row.implicit
                && row.target.instance_id() == target
                && row.exchange_name == exchange_name
                && routing_key.map_or(true, |key| row.routing_key() == key);
            !selected
        });
        before - self.rows.len()
    }

    /// Removes every row targeting `target`, implicit ones included, and
    /// returns the distinct source exchange names that lost a row.
    pub(crate) fn unbind_all(&mut self, target: InstanceId) -> BTreeSet<String> {
        let mut sources = BTreeSet::new();
        self.rows.retain(|row| {
            if row.target.instance_id() == target {
                sources.insert(row.exchange_name.clone());
                false
            } else {
                true
            }
        });
        sources
    }

    /// Removes every row sourced from `exchange_name` and returns their targets.
    pub(crate) fn remove_source(&mut self, exchange_name: &str) -> Vec<Arc<dyn BindingTarget>> {
        let mut targets = Vec::new();
        self.rows.retain(|row| {
            if row.exchange_name == exchange_name {
                targets.push(row.target.clone());
                false
            } else {
                true
            }
        });
        targets
    }

    pub(crate) fn for_exchange<'a>(
        &'a self,
        exchange_name: &'a str,
    ) -> impl Iterator<Item = &'a Binding> {
        self.rows
            .iter()
            .filter(move |row| row.exchange_name == exchange_name)
    }

    /// Whether any explicit row is sourced from `exchange_name`.
    pub(crate) fn has_source(&self, exchange_name: &str) -> bool {
        self.for_exchange(exchange_name).any(|row| !row.implicit)
    }

    pub(crate) fn has_target(&self, target: InstanceId) -> bool {
        self.rows
            .iter()
            .any(|row| !row.implicit && row.target.instance_id() == target)
    }

    pub(crate) fn has_implicit_target(&self, target: InstanceId) -> bool {
        self.rows
            .iter()
            .any(|row| row.implicit && row.target.instance_id() == target)
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}
