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

//! Canonical structured field keys and value-format helpers.

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const EXCHANGE: &str = "exchange";
pub const QUEUE: &str = "queue";
pub const ROUTING_KEY: &str = "routing_key";
pub const CONSUMER_TAG: &str = "consumer_tag";
pub const CONNECTION_ID: &str = "connection_id";
pub const TARGETS: &str = "targets";
pub const CODE: &str = "code";
pub const ERR: &str = "err";
pub const REASON: &str = "reason";

pub const NONE: &str = "none";
pub const DEFAULT_EXCHANGE_LABEL: &str = "(default)";

pub const REASON_LISTENER_PANICKED: &str = "listener_panicked";
pub const REASON_NO_CONSUMER: &str = "no_consumer";
pub const REASON_GENERATION_CHANGED: &str = "generation_changed";
pub const REASON_HEADERS_UNSUPPORTED: &str = "headers_exchange_unsupported";
pub const REASON_OPERATION_CHANNEL_CLOSED: &str = "operation_channel_closed";
pub const REASON_CLOSE_ON_UNSUBSCRIBE: &str = "close_channel_on_unsubscribe";
pub const REASON_LAST_CONSUMER_GONE: &str = "last_consumer_gone";
pub const REASON_LAST_BINDING_GONE: &str = "last_binding_gone";
pub const REASON_CONNECTION_CLOSED: &str = "connection_closed";

/// Renders an exchange name for logs; the nameless default exchange would
/// otherwise show up as an empty field.
pub fn format_exchange_name(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_EXCHANGE_LABEL
    } else {
        name
    }
}

pub fn format_routing_key(routing_key: Option<&str>) -> &str {
    routing_key.unwrap_or(NONE)
}

/// Compact rendering of a payload size for debug events.
pub fn format_payload_len(payload: &[u8]) -> String {
    format!("{}B", payload.len())
}
