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

use fake_amqp::{
    BrokerConfig, ConnectionOptions, ExchangeOptions, Headers, ImplOptions, QueueOptions,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub(crate) broker: BrokerConfig,
    #[serde(default)]
    pub(crate) connection: ConnectionOptions,
    #[serde(default)]
    pub(crate) impl_options: ImplOptions,
    #[serde(default)]
    pub(crate) exchanges: Vec<ExchangeConfig>,
    #[serde(default)]
    pub(crate) queues: Vec<QueueConfig>,
    #[serde(default)]
    pub(crate) publishes: Vec<PublishConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) options: ExchangeOptions,
    #[serde(default)]
    pub(crate) bindings: Vec<BindingConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) options: QueueOptions,
    #[serde(default)]
    pub(crate) bindings: Vec<BindingConfig>,
    #[serde(default = "default_consumers")]
    pub(crate) consumers: usize,
}

fn default_consumers() -> usize {
    1
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    pub(crate) exchange: String,
    pub(crate) routing_key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    pub(crate) exchange: String,
    pub(crate) routing_key: String,
    pub(crate) payload: String,
    #[serde(default)]
    pub(crate) headers: Headers,
    #[serde(default)]
    pub(crate) content_type: Option<String>,
}
