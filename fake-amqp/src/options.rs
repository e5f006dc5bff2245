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

//! Declaration, consumption, destruction and publish options.

use crate::error::BrokerError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Message headers carried alongside a payload.
pub type Headers = serde_json::Map<String, serde_json::Value>;

/// Exchange routing strategy.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExchangeType {
    Direct,
    Fanout,
    #[default]
    Topic,
    Headers,
}

impl ExchangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeType::Direct => "direct",
            ExchangeType::Fanout => "fanout",
            ExchangeType::Topic => "topic",
            ExchangeType::Headers => "headers",
        }
    }
}

impl Display for ExchangeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeType {
    type Err = BrokerError;

    /// Type names are case-insensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "direct" => Ok(ExchangeType::Direct),
            "fanout" => Ok(ExchangeType::Fanout),
            "topic" => Ok(ExchangeType::Topic),
            "headers" => Ok(ExchangeType::Headers),
            _ => Err(BrokerError::unknown_exchange_type(value)),
        }
    }
}

impl TryFrom<String> for ExchangeType {
    type Error = BrokerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExchangeType> for String {
    fn from(value: ExchangeType) -> Self {
        value.as_str().to_string()
    }
}

/// Options for declaring an exchange.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeOptions {
    #[serde(rename = "type")]
    pub exchange_type: ExchangeType,
    pub durable: bool,
    pub auto_delete: bool,
    /// Only assert that the exchange already exists.
    pub passive: bool,
    /// Skip the declaration entirely; the handle is never checked.
    pub no_declare: bool,
    /// Publishes through this handle resolve with [`Confirm::Ack`].
    pub confirm: bool,
}

impl Default for ExchangeOptions {
    fn default() -> Self {
        Self {
            exchange_type: ExchangeType::Topic,
            durable: false,
            auto_delete: true,
            passive: false,
            no_declare: false,
            confirm: false,
        }
    }
}

impl ExchangeOptions {
    pub fn of_type(exchange_type: ExchangeType) -> Self {
        Self {
            exchange_type,
            ..Self::default()
        }
    }
}

/// Options for declaring a queue.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueOptions {
    pub durable: bool,
    pub exclusive: bool,
    pub auto_delete: bool,
    pub passive: bool,
    pub no_declare: bool,
    /// Tear the queue down as soon as any of its consumers unsubscribes.
    pub close_channel_on_unsubscribe: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            durable: false,
            exclusive: false,
            auto_delete: true,
            passive: false,
            no_declare: false,
            close_channel_on_unsubscribe: false,
        }
    }
}

/// Options for attaching a consumer to a queue.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubscribeOptions {
    /// Refuse any other consumer on the same queue while attached.
    pub exclusive: bool,
    /// Caller-chosen tag; generated when absent.
    pub consumer_tag: Option<String>,
}

/// Conditions checked before destroying an exchange or queue.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DestroyOptions {
    pub if_unused: bool,
    /// Always satisfied: messages are never retained.
    pub if_empty: bool,
}

/// Per-message publish options.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishOptions {
    pub headers: Headers,
    pub content_type: Option<String>,
}

/// Outcome of a publish once every delivery has been dispatched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Confirm {
    /// The exchange handle was declared with `confirm` enabled.
    Ack,
    NotRequested,
}

/// Acknowledgement of a new consumer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsumeOk {
    pub consumer_tag: String,
}

/// Acknowledgement of a cancelled consumer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CancelOk {
    pub consumer_tag: String,
}
