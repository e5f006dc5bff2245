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

mod support;

use fake_amqp::{
    Bindable, Confirm, ErrorCode, ExchangeEvent, ExchangeOptions, ExchangeType, PublishOptions,
    QueueOptions,
};

#[tokio::test]
async fn fanout_delivers_to_every_bound_queue() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let fanout = support::declare_exchange_ok(&connection, "broadcast", ExchangeType::Fanout).await;

    let mut recorders = Vec::new();
    for name in ["first", "second", "third"] {
        let queue = support::declare_queue_ok(&connection, name, QueueOptions::default()).await;
        queue
            .bind(&fanout, "ignored")
            .await
            .expect("bind should succeed");
        recorders.push(support::subscribe_recorder(&queue, name).await.0);
    }

    fanout
        .publish("any.key", "hello", PublishOptions::default())
        .await
        .expect("publish should succeed");

    for recorder in &recorders {
        assert_eq!(recorder.payloads().await, vec!["hello"]);
    }
}

#[tokio::test]
async fn direct_exchange_requires_exact_routing_key() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let direct = support::declare_exchange_ok(&connection, "tasks", ExchangeType::Direct).await;
    let queue = support::declare_queue_ok(&connection, "resize", QueueOptions::default()).await;
    queue
        .bind(&direct, "image.resize")
        .await
        .expect("bind should succeed");
    let (recorder, _) = support::subscribe_recorder(&queue, "resize").await;

    for key in ["image.resize", "image.crop", "image.*"] {
        direct
            .publish(key, key, PublishOptions::default())
            .await
            .expect("publish should succeed");
    }

    assert_eq!(recorder.payloads().await, vec!["image.resize"]);
}

#[tokio::test]
async fn topic_exchange_matches_single_and_multi_word_wildcards() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let topic = support::declare_exchange_ok(&connection, "telemetry", ExchangeType::Topic).await;

    let single = support::declare_queue_ok(&connection, "single", QueueOptions::default()).await;
    single
        .bind(&topic, "sensor.*")
        .await
        .expect("bind should succeed");
    let multi = support::declare_queue_ok(&connection, "multi", QueueOptions::default()).await;
    multi
        .bind(&topic, "sensor.#")
        .await
        .expect("bind should succeed");

    let (single_recorder, _) = support::subscribe_recorder(&single, "single").await;
    let (multi_recorder, _) = support::subscribe_recorder(&multi, "multi").await;

    for key in ["sensor.temp", "sensor.temp.kitchen", "sensor", "actuator.valve"] {
        topic
            .publish(key, key, PublishOptions::default())
            .await
            .expect("publish should succeed");
    }

    assert_eq!(single_recorder.payloads().await, vec!["sensor.temp"]);
    assert_eq!(
        multi_recorder.payloads().await,
        vec!["sensor.temp", "sensor.temp.kitchen", "sensor"]
    );
}

#[tokio::test]
async fn overlapping_bindings_deliver_once() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let topic = support::declare_exchange_ok(&connection, "events", ExchangeType::Topic).await;
    let queue = support::declare_queue_ok(&connection, "all", QueueOptions::default()).await;

    for key in ["order.created", "order.created", "order.*", "#"] {
        queue.bind(&topic, key).await.expect("bind should succeed");
    }
    let (recorder, _) = support::subscribe_recorder(&queue, "all").await;

    topic
        .publish("order.created", "once", PublishOptions::default())
        .await
        .expect("publish should succeed");

    assert_eq!(recorder.count().await, 1);
}

#[tokio::test]
async fn queue_bound_through_two_handles_receives_one_copy() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let fanout = support::declare_exchange_ok(&connection, "fx", ExchangeType::Fanout).await;
    let first = support::declare_queue_ok(&connection, "same", QueueOptions::default()).await;
    let second = support::declare_queue_ok(&connection, "same", QueueOptions::default()).await;
    first.bind(&fanout, "k").await.expect("bind should succeed");
    second.bind(&fanout, "k").await.expect("bind should succeed");
    let (recorder, _) = support::subscribe_recorder(&first, "same").await;

    fanout
        .publish("k", "once", PublishOptions::default())
        .await
        .expect("publish should succeed");

    assert_eq!(recorder.payloads().await, vec!["once"]);
}

#[tokio::test]
async fn bound_exchange_forwards_with_its_own_type() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let upstream = support::declare_exchange_ok(&connection, "upstream", ExchangeType::Topic).await;
    let downstream =
        support::declare_exchange_ok(&connection, "downstream", ExchangeType::Fanout).await;
    downstream
        .bind(&upstream, "metrics.#")
        .await
        .expect("exchange bind should succeed");

    let queue = support::declare_queue_ok(&connection, "collector", QueueOptions::default()).await;
    queue
        .bind(&downstream, "unused")
        .await
        .expect("bind should succeed");
    let (recorder, _) = support::subscribe_recorder(&queue, "collector").await;

    upstream
        .publish("metrics.cpu", "42", PublishOptions::default())
        .await
        .expect("publish should succeed");
    upstream
        .publish("logs.app", "ignored", PublishOptions::default())
        .await
        .expect("publish should succeed");

    let deliveries = recorder.retrieve_message_store();
    let deliveries = deliveries.lock().await;
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].info.exchange, "upstream");
    assert_eq!(deliveries[0].info.routing_key, "metrics.cpu");
    assert_eq!(deliveries[0].info.queue, "collector");
}

#[tokio::test]
async fn exchange_cycles_terminate() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let left = support::declare_exchange_ok(&connection, "left", ExchangeType::Fanout).await;
    let right = support::declare_exchange_ok(&connection, "right", ExchangeType::Fanout).await;
    right.bind(&left, "").await.expect("bind should succeed");
    left.bind(&right, "").await.expect("bind should succeed");

    let queue = support::declare_queue_ok(&connection, "looped", QueueOptions::default()).await;
    queue.bind(&right, "").await.expect("bind should succeed");
    let (recorder, _) = support::subscribe_recorder(&queue, "looped").await;

    left.publish("k", "round", PublishOptions::default())
        .await
        .expect("publish should succeed");

    assert_eq!(recorder.count().await, 1);
}

#[tokio::test]
async fn passive_handle_routes_with_the_declared_type() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    support::declare_exchange_ok(&connection, "typed", ExchangeType::Direct).await;

    let passive = connection.declare_exchange(
        "typed",
        ExchangeOptions {
            passive: true,
            ..ExchangeOptions::of_type(ExchangeType::Topic)
        },
    );
    passive.opened().await.expect("passive declare should succeed");

    let queue = support::declare_queue_ok(&connection, "literal", QueueOptions::default()).await;
    queue.bind("typed", "a.*").await.expect("bind should succeed");
    let (recorder, _) = support::subscribe_recorder(&queue, "literal").await;

    passive
        .publish("a.b", "pattern", PublishOptions::default())
        .await
        .expect("publish should succeed");
    passive
        .publish("a.*", "exact", PublishOptions::default())
        .await
        .expect("publish should succeed");

    assert_eq!(recorder.payloads().await, vec!["exact"]);
}

#[tokio::test]
async fn publishing_through_undeclared_exchange_is_not_found() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let ghost = connection.declare_exchange(
        "ghost",
        ExchangeOptions {
            no_declare: true,
            ..ExchangeOptions::default()
        },
    );
    ghost.opened().await.expect("no-declare handle opens");

    let result = ghost
        .publish("any", "lost", PublishOptions::default())
        .await;

    support::assert_code(result, ErrorCode::NotFound);
    assert!(!broker.exchange_exists("ghost"));
    let events = ghost.events().drain();
    assert!(matches!(events.as_slice(), [ExchangeEvent::Open, ExchangeEvent::Error(err)] if err.code() == 404));
}

#[tokio::test]
async fn confirm_mode_acknowledges_publishes() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let confirming = connection.declare_exchange(
        "confirmed",
        ExchangeOptions {
            confirm: true,
            ..ExchangeOptions::of_type(ExchangeType::Direct)
        },
    );
    let plain = support::declare_exchange_ok(&connection, "plain", ExchangeType::Direct).await;

    let confirm = confirming
        .publish("k", "x", PublishOptions::default())
        .await
        .expect("publish should succeed");
    assert_eq!(confirm, Confirm::Ack);

    let confirm = plain
        .publish("k", "x", PublishOptions::default())
        .await
        .expect("publish should succeed");
    assert_eq!(confirm, Confirm::NotRequested);
}

#[tokio::test]
async fn headers_exchange_routes_nothing() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let headers = support::declare_exchange_ok(&connection, "by-headers", ExchangeType::Headers).await;
    let queue = support::declare_queue_ok(&connection, "unreached", QueueOptions::default()).await;
    queue.bind(&headers, "").await.expect("bind should succeed");
    let (recorder, _) = support::subscribe_recorder(&queue, "unreached").await;

    headers
        .publish("", "x", PublishOptions::default())
        .await
        .expect("publish is accepted");

    assert_eq!(recorder.count().await, 0);
}

#[tokio::test]
async fn default_exchange_routes_by_queue_name() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "mailbox", QueueOptions::default()).await;
    let (recorder, _) = support::subscribe_recorder(&queue, "mailbox").await;

    connection
        .publish("mailbox", "direct", PublishOptions::default())
        .await
        .expect("publish should succeed");
    connection
        .publish("elsewhere", "dropped", PublishOptions::default())
        .await
        .expect("publish should succeed");

    assert_eq!(recorder.payloads().await, vec!["direct"]);
}
