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

//! Broker, connection and client-implementation settings.
//!
//! Every struct deserializes from JSON5 with defaults for omitted fields and
//! rejects unknown fields.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_VHOST: &str = "/";
const AMQP_SCHEME: &str = "amqp";
const AMQPS_SCHEME: &str = "amqps";
pub const DEFAULT_AMQP_PORT: u16 = 5672;
pub const DEFAULT_AMQPS_PORT: u16 = 5671;

/// Failures while loading or resolving configuration.
#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(json5::Error),
    InvalidUrl(url::ParseError),
    UnsupportedScheme(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(err) => write!(f, "unable to read config file: {err}"),
            ConfigError::Parse(err) => write!(f, "unable to parse config: {err}"),
            ConfigError::InvalidUrl(err) => write!(f, "invalid connection url: {err}"),
            ConfigError::UnsupportedScheme(scheme) => {
                write!(f, "unsupported connection url scheme '{scheme}'")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Read(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::InvalidUrl(err) => Some(err),
            ConfigError::UnsupportedScheme(_) => None,
        }
    }
}

/// Reads and parses a JSON5 document from `path`.
pub fn load_json5<T>(path: impl AsRef<Path>) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
    json5::from_str(&contents).map_err(ConfigError::Parse)
}

/// Settings of one in-memory broker.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrokerConfig {
    /// Virtual host named in error messages.
    pub vhost: String,
    /// Extra pause between scheduler turns, in milliseconds.
    pub tick_millis: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            vhost: DEFAULT_VHOST.to_string(),
            tick_millis: 0,
        }
    }
}

impl BrokerConfig {
    pub fn from_json5(contents: &str) -> Result<Self, ConfigError> {
        json5::from_str(contents).map_err(ConfigError::Parse)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SslOptions {
    pub enabled: bool,
    pub reject_unauthorized: bool,
}

impl Default for SslOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            reject_unauthorized: true,
        }
    }
}

/// Properties a client announces when it connects.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientProperties {
    pub version: String,
    pub platform: String,
    pub product: String,
}

impl Default for ClientProperties {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: format!("rust-{}", std::env::consts::OS),
            product: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Connection settings. Nothing is dialed; they are kept for inspection.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionOptions {
    /// `amqp://` or `amqps://` URL. Values it carries override the fields below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub login: String,
    pub password: String,
    pub auth_mechanism: String,
    pub vhost: String,
    pub connection_timeout_ms: u64,
    pub ssl: SslOptions,
    pub client_properties: ClientProperties,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: DEFAULT_AMQP_PORT,
            login: "guest".to_string(),
            password: "guest".to_string(),
            auth_mechanism: "AMQPLAIN".to_string(),
            vhost: DEFAULT_VHOST.to_string(),
            connection_timeout_ms: 10_000,
            ssl: SslOptions::default(),
            client_properties: ClientProperties::default(),
        }
    }
}

impl ConnectionOptions {
    /// Options for `url` with every other field defaulted.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
        .resolve()
    }

    /// Applies the TLS default port and the URL, if any.
    pub fn resolve(mut self) -> Result<Self, ConfigError> {
        if self.ssl.enabled && self.port == DEFAULT_AMQP_PORT {
            self.port = DEFAULT_AMQPS_PORT;
        }

        let Some(raw) = self.url.clone() else {
            return Ok(self);
        };
        let parsed = Url::parse(&raw).map_err(ConfigError::InvalidUrl)?;

        let default_port = match parsed.scheme() {
            AMQP_SCHEME => DEFAULT_AMQP_PORT,
            AMQPS_SCHEME => {
                self.ssl.enabled = true;
                DEFAULT_AMQPS_PORT
            }
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };

        if let Some(host) = parsed.host_str().filter(|host| !host.is_empty()) {
            self.host = host.to_string();
        }
        self.port = parsed.port().unwrap_or(default_port);
        if !parsed.username().is_empty() {
            self.login = percent_decode(parsed.username());
        }
        if let Some(password) = parsed.password() {
            self.password = percent_decode(password);
        }

        let path = parsed.path().trim_start_matches('/');
        if !path.is_empty() {
            self.vhost = percent_decode(path);
        }
        Ok(self)
    }
}

fn percent_decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    #[default]
    Linear,
    Exponential,
}

/// Client-implementation settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImplOptions {
    /// Exchange used by [`crate::Connection::publish`].
    pub default_exchange_name: String,
    pub reconnect: bool,
    pub reconnect_backoff_strategy: BackoffStrategy,
    pub reconnect_exponential_limit_ms: u64,
    pub reconnect_backoff_time_ms: u64,
}

impl Default for ImplOptions {
    fn default() -> Self {
        Self {
            default_exchange_name: String::new(),
            reconnect: true,
            reconnect_backoff_strategy: BackoffStrategy::Linear,
            reconnect_exponential_limit_ms: 120_000,
            reconnect_backoff_time_ms: 1_000,
        }
    }
}
