/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
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

mod config;

use crate::config::{BindingConfig, Config};
use clap::Parser;
use fake_amqp::config::load_json5;
use fake_amqp::{
    consumer_fn, Bindable, Broker, Connection, Delivery, ExchangeHandle, ExchangeOptions,
    PublishOptions, SubscribeOptions,
};
use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command()]
struct BrokerArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started configurable-broker");

    let args = BrokerArgs::parse();
    let config: Config = load_json5(&args.config)?;

    let broker = Broker::new(config.broker.clone())?;
    let connection = broker.connect(
        config.connection.clone().resolve()?,
        config.impl_options.clone(),
    );
    connection.ready().await?;

    let mut exchanges: HashMap<String, ExchangeHandle> = HashMap::new();
    for exchange_config in &config.exchanges {
        let exchange =
            connection.declare_exchange(&exchange_config.name, exchange_config.options.clone());
        exchange.opened().await?;
        if exchanges
            .insert(exchange_config.name.clone(), exchange)
            .is_some()
        {
            return Err(format!("Duplicate exchange name found: {}", exchange_config.name).into());
        }
    }

    // exchange-to-exchange bindings go after every exchange exists
    for exchange_config in &config.exchanges {
        if let Some(exchange) = exchanges.get(&exchange_config.name) {
            bind_all(exchange, &exchange_config.bindings).await?;
        }
    }

    let delivered = Arc::new(AtomicUsize::new(0));
    for queue_config in &config.queues {
        let queue = connection.declare_queue(&queue_config.name, queue_config.options.clone());
        queue.opened().await?;
        bind_all(&queue, &queue_config.bindings).await?;

        for _ in 0..queue_config.consumers {
            let delivered = delivered.clone();
            let consume_ok = queue
                .subscribe(
                    SubscribeOptions::default(),
                    consumer_fn(move |delivery: Delivery| {
                        delivered.fetch_add(1, Ordering::Relaxed);
                        info!(
                            queue = delivery.info.queue.as_str(),
                            consumer_tag = delivery.info.consumer_tag.as_str(),
                            exchange = delivery.info.exchange.as_str(),
                            routing_key = delivery.info.routing_key.as_str(),
                            payload = delivery.payload_str().unwrap_or("<binary>"),
                            "delivery received"
                        );
                    }),
                )
                .await?;
            info!(
                queue = queue.name(),
                consumer_tag = consume_ok.consumer_tag.as_str(),
                "consumer attached"
            );
        }
    }

    for publish in &config.publishes {
        let exchange = exchange_for(&connection, &mut exchanges, &publish.exchange).await?;
        let options = PublishOptions {
            headers: publish.headers.clone(),
            content_type: publish.content_type.clone(),
        };
        if let Err(err) = exchange
            .publish(&publish.routing_key, publish.payload.as_str(), options)
            .await
        {
            warn!(
                exchange = publish.exchange.as_str(),
                routing_key = publish.routing_key.as_str(),
                err = %err,
                "publish failed"
            );
        }
    }

    broker.settled().await?;
    info!(
        publishes = config.publishes.len(),
        deliveries = delivered.load(Ordering::Relaxed),
        "topology replayed"
    );

    connection.disconnect().await?;
    Ok(())
}

async fn bind_all<B: Bindable>(target: &B, bindings: &[BindingConfig]) -> Result<(), Box<dyn Error>> {
    for binding in bindings {
        target
            .bind(binding.exchange.as_str(), &binding.routing_key)
            .await?;
    }
    Ok(())
}

/// Exchanges the topology did not declare are looked up passively.
async fn exchange_for(
    connection: &Connection,
    exchanges: &mut HashMap<String, ExchangeHandle>,
    name: &str,
) -> Result<ExchangeHandle, Box<dyn Error>> {
    if let Some(exchange) = exchanges.get(name) {
        return Ok(exchange.clone());
    }

    let exchange = connection.declare_exchange(
        name,
        ExchangeOptions {
            passive: true,
            ..ExchangeOptions::default()
        },
    );
    exchange.opened().await?;
    exchanges.insert(name.to_string(), exchange.clone());
    Ok(exchange)
}
