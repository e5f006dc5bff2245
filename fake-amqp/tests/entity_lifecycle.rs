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
    consumer_fn, Bindable, Confirm, ConnectionEvent, Delivery, DestroyOptions, ErrorCode,
    ExchangeEvent, ExchangeType, LifecycleState, PublishOptions, QueueEvent, QueueOptions,
    SubscribeOptions,
};

const IF_UNUSED: DestroyOptions = DestroyOptions {
    if_unused: true,
    if_empty: false,
};

#[tokio::test]
async fn auto_delete_queue_goes_silently_with_its_last_consumer() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "ephemeral", QueueOptions::default()).await;
    let (_, tag) = support::subscribe_recorder(&queue, "only").await;

    let cancel_ok = queue.unsubscribe(&tag).await.expect("unsubscribe");
    assert_eq!(cancel_ok.consumer_tag, tag);

    assert!(!broker.queue_exists("ephemeral"));
    assert_eq!(queue.state(), LifecycleState::Closed);
    let events = queue.events().drain();
    assert!(!events.contains(&QueueEvent::Close));
    assert_eq!(
        events.last(),
        Some(&QueueEvent::BasicCancelOk { consumer_tag: tag })
    );
}

#[tokio::test]
async fn close_on_unsubscribe_announces_the_close() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(
        &connection,
        "one-shot",
        QueueOptions {
            auto_delete: false,
            close_channel_on_unsubscribe: true,
            ..QueueOptions::default()
        },
    )
    .await;
    let (_, first) = support::subscribe_recorder(&queue, "first").await;
    support::subscribe_recorder(&queue, "second").await;

    queue.unsubscribe(&first).await.expect("unsubscribe");

    assert!(!broker.queue_exists("one-shot"));
    assert_eq!(broker.consumer_count("one-shot"), 0);
    assert_eq!(queue.events().drain().last(), Some(&QueueEvent::Close));
}

#[tokio::test]
async fn auto_delete_exchange_goes_with_its_last_binding() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let exchange = support::declare_exchange_ok(&connection, "transient", ExchangeType::Direct).await;
    let queue = support::declare_queue_ok(
        &connection,
        "listener",
        QueueOptions {
            auto_delete: false,
            ..QueueOptions::default()
        },
    )
    .await;

    queue.bind(&exchange, "a").await.expect("bind");
    queue.bind(&exchange, "b").await.expect("bind");
    queue.unbind(&exchange, Some("a")).await.expect("unbind");
    assert!(broker.exchange_exists("transient"));

    queue.unbind(&exchange, Some("b")).await.expect("unbind");
    assert!(!broker.exchange_exists("transient"));
    assert_eq!(exchange.state(), LifecycleState::Closed);
    assert_eq!(exchange.events().drain().last(), Some(&ExchangeEvent::Close));
    assert!(broker.queue_exists("listener"));
}

#[tokio::test]
async fn destroying_a_queue_removes_it_from_routing() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let fanout = support::declare_exchange_ok(&connection, "spread", ExchangeType::Fanout).await;
    let kept = support::declare_queue_ok(&connection, "kept", QueueOptions::default()).await;
    let dropped = support::declare_queue_ok(&connection, "dropped", QueueOptions::default()).await;
    kept.bind(&fanout, "").await.expect("bind");
    dropped.bind(&fanout, "").await.expect("bind");
    let (kept_recorder, _) = support::subscribe_recorder(&kept, "kept").await;
    let (dropped_recorder, _) = support::subscribe_recorder(&dropped, "dropped").await;

    dropped
        .destroy(DestroyOptions::default())
        .await
        .expect("destroy should succeed");
    fanout
        .publish("", "after", PublishOptions::default())
        .await
        .expect("publish");

    assert_eq!(kept_recorder.count().await, 1);
    assert_eq!(dropped_recorder.count().await, 0);
    assert!(!broker.queue_exists("dropped"));
    assert_eq!(dropped.events().drain().last(), Some(&QueueEvent::Close));
}

#[tokio::test]
async fn publish_issued_before_exchange_destroy_still_routes() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let exchange = support::declare_exchange_ok(&connection, "closing", ExchangeType::Fanout).await;
    let queue = support::declare_queue_ok(&connection, "drain", QueueOptions::default()).await;
    queue.bind(&exchange, "").await.expect("bind");
    let (recorder, _) = support::subscribe_recorder(&queue, "drain").await;

    let publish = exchange.publish("k", "last", PublishOptions::default());
    let destroy = exchange.destroy(DestroyOptions::default());
    assert_eq!(exchange.state(), LifecycleState::Open);

    let confirm = publish.await.expect("publish runs before the destroy");
    assert_eq!(confirm, Confirm::NotRequested);
    destroy.await.expect("destroy");

    assert_eq!(recorder.payloads().await, vec!["last"]);
    assert!(!broker.exchange_exists("closing"));
    assert_eq!(exchange.state(), LifecycleState::Closed);
}

#[tokio::test]
async fn operations_issued_before_queue_destroy_still_apply() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "q2", QueueOptions::default()).await;
    let (recorder, _) = support::subscribe_recorder(&queue, "first").await;

    let publish = connection.publish("q2", "before", PublishOptions::default());
    let subscribe = queue.subscribe(SubscribeOptions::default(), consumer_fn(|_: Delivery| {}));
    let destroy = queue.destroy(DestroyOptions::default());

    publish.await.expect("publish");
    subscribe.await.expect("subscribe runs before the destroy");
    destroy.await.expect("destroy");

    assert_eq!(recorder.payloads().await, vec!["before"]);
    assert!(!broker.queue_exists("q2"));
    assert_eq!(broker.consumer_count("q2"), 0);
}

#[tokio::test]
async fn destroy_if_unused_refuses_busy_entities() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let exchange = support::declare_exchange_ok(&connection, "busy", ExchangeType::Topic).await;
    let queue = support::declare_queue_ok(&connection, "busy-queue", QueueOptions::default()).await;
    queue.bind(&exchange, "#").await.expect("bind");
    support::subscribe_recorder(&queue, "worker").await;

    let result = exchange.destroy(IF_UNUSED).await;
    support::assert_code(result, ErrorCode::PreconditionFailed);
    assert_eq!(exchange.state(), LifecycleState::Open);
    assert!(broker.exchange_exists("busy"));

    let result = queue.destroy(IF_UNUSED).await;
    support::assert_code(result, ErrorCode::PreconditionFailed);
    assert_eq!(queue.state(), LifecycleState::Bound);

    queue
        .destroy(DestroyOptions::default())
        .await
        .expect("unconditional destroy succeeds");
    assert_eq!(broker.consumer_count("busy-queue"), 0);
}

#[tokio::test]
async fn built_in_exchanges_cannot_be_destroyed() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let topic = connection.declare_exchange(
        "amq.topic",
        fake_amqp::ExchangeOptions {
            passive: true,
            ..fake_amqp::ExchangeOptions::default()
        },
    );

    let result = topic.destroy(DestroyOptions::default()).await;
    support::assert_code(result, ErrorCode::AccessRefused);
    assert!(broker.exchange_exists("amq.topic"));
}

#[tokio::test]
async fn disconnect_tears_down_exclusive_queues() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let private = support::declare_queue_ok(
        &connection,
        "private",
        QueueOptions {
            exclusive: true,
            ..QueueOptions::default()
        },
    )
    .await;
    let shared = support::declare_queue_ok(&connection, "shared", QueueOptions::default()).await;

    connection.disconnect().await.expect("disconnect");
    connection
        .disconnect()
        .await
        .expect("second disconnect is harmless");

    assert!(!broker.queue_exists("private"));
    assert!(broker.queue_exists("shared"));
    assert_eq!(private.events().drain().last(), Some(&QueueEvent::Close));
    assert_eq!(shared.state(), LifecycleState::Open);
    assert_eq!(
        connection.events().drain(),
        vec![ConnectionEvent::Ready, ConnectionEvent::Close]
    );
    assert!(!connection.is_open());

    let late = connection.declare_queue("late", QueueOptions::default());
    let err = late.opened().await.expect_err("connection is closed");
    assert_eq!(err.kind(), ErrorCode::ConnectionForced);
}

#[tokio::test]
async fn created_handles_are_tracked_per_connection() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let other = support::connect(&broker).await;

    connection.declare_exchange("x1", Default::default());
    connection.declare_queue("q1", QueueOptions::default());
    connection.declare_queue("q2", QueueOptions::default());
    other.declare_queue("q3", QueueOptions::default());

    let queues: Vec<String> = connection
        .created_queues()
        .iter()
        .map(|queue| queue.name().to_string())
        .collect();
    assert_eq!(queues, vec!["q1", "q2"]);
    assert_eq!(connection.created_exchanges().len(), 1);
    assert_eq!(other.created_queues().len(), 1);
    assert_ne!(connection.id(), other.id());
}

#[tokio::test]
async fn closed_handles_leave_the_created_list() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let kept = support::declare_queue_ok(&connection, "kept", QueueOptions::default()).await;
    let gone = support::declare_queue_ok(&connection, "gone", QueueOptions::default()).await;

    gone.destroy(DestroyOptions::default())
        .await
        .expect("destroy should succeed");

    let queues: Vec<String> = connection
        .created_queues()
        .iter()
        .map(|queue| queue.name().to_string())
        .collect();
    assert_eq!(queues, vec![kept.name().to_string()]);
}
