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

//! Broker-style failures carrying an AMQP reply code and the wire text a real
//! broker would send.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// AMQP reply codes surfaced by the emulated broker.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    ConnectionForced,
    AccessRefused,
    NotFound,
    ResourceLocked,
    PreconditionFailed,
    CommandInvalid,
    NotAllowed,
    InternalError,
}

impl ErrorCode {
    /// Numeric reply code as it appears on the wire.
    pub fn code(self) -> u16 {
        match self {
            ErrorCode::ConnectionForced => 320,
            ErrorCode::AccessRefused => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::ResourceLocked => 405,
            ErrorCode::PreconditionFailed => 406,
            ErrorCode::CommandInvalid => 503,
            ErrorCode::NotAllowed => 530,
            ErrorCode::InternalError => 541,
        }
    }

    /// Reply-text prefix used by the broker for this code.
    pub fn reply_text(self) -> &'static str {
        match self {
            ErrorCode::ConnectionForced => "CONNECTION_FORCED",
            ErrorCode::AccessRefused => "ACCESS_REFUSED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ResourceLocked => "RESOURCE_LOCKED",
            ErrorCode::PreconditionFailed => "PRECONDITION_FAILED",
            ErrorCode::CommandInvalid => "COMMAND_INVALID",
            ErrorCode::NotAllowed => "NOT_ALLOWED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structured broker error: `{code, message}` mirroring broker wire strings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BrokerError {
    kind: ErrorCode,
    message: String,
}

impl BrokerError {
    fn with_detail(kind: ErrorCode, detail: impl Display) -> Self {
        Self {
            kind,
            message: format!("{} - {detail}", kind.reply_text()),
        }
    }

    pub fn kind(&self) -> ErrorCode {
        self.kind
    }

    /// Numeric reply code, e.g. `404`.
    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn no_exchange(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::NotFound,
            format_args!("no exchange '{name}' in vhost '{vhost}'"),
        )
    }

    pub(crate) fn no_queue(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::NotFound,
            format_args!("no queue '{name}' in vhost '{vhost}'"),
        )
    }

    pub(crate) fn default_exchange_refused() -> Self {
        Self::with_detail(
            ErrorCode::AccessRefused,
            "operation not permitted on the default exchange",
        )
    }

    pub(crate) fn built_in_exchange_refused(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::AccessRefused,
            format_args!("operation not permitted on exchange '{name}' in vhost '{vhost}'"),
        )
    }

    pub(crate) fn reserved_exchange_name(name: &str) -> Self {
        Self::with_detail(
            ErrorCode::AccessRefused,
            format_args!("exchange name '{name}' contains reserved prefix 'amq.*'"),
        )
    }

    pub(crate) fn reserved_queue_name(name: &str) -> Self {
        Self::with_detail(
            ErrorCode::AccessRefused,
            format_args!("queue name '{name}' contains reserved prefix 'amq.*'"),
        )
    }

    pub(crate) fn queue_in_exclusive_use(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::AccessRefused,
            format_args!("queue '{name}' in vhost '{vhost}' in exclusive use"),
        )
    }

    pub(crate) fn queue_locked(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::ResourceLocked,
            format_args!(
                "cannot obtain exclusive access to locked queue '{name}' in vhost '{vhost}'"
            ),
        )
    }

    pub(crate) fn queue_not_equivalent(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::PreconditionFailed,
            format_args!("parameters for queue '{name}' in vhost '{vhost}' not equivalent"),
        )
    }

    pub(crate) fn exchange_not_equivalent(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::PreconditionFailed,
            format_args!(
                "cannot redeclare exchange '{name}' in vhost '{vhost}' with different type, \
                 durable, internal or autodelete value"
            ),
        )
    }

    pub(crate) fn exchange_in_use(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::PreconditionFailed,
            format_args!("exchange '{name}' in vhost '{vhost}' in use"),
        )
    }

    pub(crate) fn queue_in_use(name: &str, vhost: &str) -> Self {
        Self::with_detail(
            ErrorCode::PreconditionFailed,
            format_args!("queue '{name}' in vhost '{vhost}' in use"),
        )
    }

    pub(crate) fn unknown_exchange_type(exchange_type: &str) -> Self {
        Self::with_detail(
            ErrorCode::CommandInvalid,
            format_args!("invalid exchange type '{exchange_type}'"),
        )
    }

    pub(crate) fn invalid_routing_pattern(pattern: &str) -> Self {
        Self::with_detail(
            ErrorCode::CommandInvalid,
            format_args!("invalid routing key pattern '{pattern}'"),
        )
    }

    pub(crate) fn consumer_tag_in_use(consumer_tag: &str) -> Self {
        Self::with_detail(
            ErrorCode::NotAllowed,
            format_args!("attempt to reuse consumer tag '{consumer_tag}'"),
        )
    }

    pub(crate) fn connection_forced(reason: &str) -> Self {
        Self::with_detail(
            ErrorCode::ConnectionForced,
            format_args!("broker forced connection closure with reason '{reason}'"),
        )
    }

    pub(crate) fn internal(detail: impl Display) -> Self {
        Self::with_detail(ErrorCode::InternalError, detail)
    }
}

impl Display for BrokerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code())
    }
}

impl Error for BrokerError {}
