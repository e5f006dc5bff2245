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
    consumer_fn, Consumer, Delivery, ErrorCode, PublishOptions, QueueEvent, QueueOptions,
    SubscribeOptions,
};
use integration_test_utils::{PanickingConsumer, RecordingConsumer};
use std::sync::Arc;

#[tokio::test]
async fn consumers_share_a_queue_in_turn() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "shared", QueueOptions::default()).await;

    let mut recorders = Vec::new();
    for name in ["c1", "c2", "c3"] {
        recorders.push(support::subscribe_recorder(&queue, name).await.0);
    }

    for index in 0..7 {
        connection
            .publish("shared", format!("m{index}"), PublishOptions::default())
            .await
            .expect("publish should succeed");
    }

    assert_eq!(recorders[0].payloads().await, vec!["m0", "m3", "m6"]);
    assert_eq!(recorders[1].payloads().await, vec!["m1", "m4"]);
    assert_eq!(recorders[2].payloads().await, vec!["m2", "m5"]);
}

#[tokio::test]
async fn rotation_continues_after_a_consumer_leaves() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(
        &connection,
        "shrinking",
        QueueOptions {
            auto_delete: false,
            ..QueueOptions::default()
        },
    )
    .await;

    let (first, _) = support::subscribe_recorder(&queue, "first").await;
    let (second, second_tag) = support::subscribe_recorder(&queue, "second").await;

    connection
        .publish("shrinking", "a", PublishOptions::default())
        .await
        .expect("publish");
    queue
        .unsubscribe(&second_tag)
        .await
        .expect("unsubscribe should succeed");
    connection
        .publish("shrinking", "b", PublishOptions::default())
        .await
        .expect("publish");

    assert_eq!(first.payloads().await, vec!["a", "b"]);
    assert_eq!(second.count().await, 0);
    assert_eq!(broker.consumer_count("shrinking"), 1);
}

#[tokio::test]
async fn consumer_tags_are_unique_and_echoed() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "tagged", QueueOptions::default()).await;
    let tagged = SubscribeOptions {
        consumer_tag: Some("worker-1".to_string()),
        ..SubscribeOptions::default()
    };

    let consumer: Arc<dyn Consumer> = Arc::new(RecordingConsumer::new("first"));
    let consume_ok = queue
        .subscribe(tagged.clone(), consumer)
        .await
        .expect("first use of the tag");
    assert_eq!(consume_ok.consumer_tag, "worker-1");

    let duplicate = queue
        .subscribe(tagged, consumer_fn(|_: Delivery| {}))
        .await;
    support::assert_code(duplicate, ErrorCode::NotAllowed);

    let generated = queue
        .subscribe(SubscribeOptions::default(), consumer_fn(|_: Delivery| {}))
        .await
        .expect("generated tag");
    assert!(generated.consumer_tag.starts_with("amq.ctag-"));

    let events = queue.events().drain();
    assert!(events.contains(&QueueEvent::BasicConsumeOk {
        consumer_tag: "worker-1".to_string()
    }));
}

#[tokio::test]
async fn exclusive_consumer_blocks_others() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "solo", QueueOptions::default()).await;

    queue
        .subscribe(
            SubscribeOptions {
                exclusive: true,
                ..SubscribeOptions::default()
            },
            consumer_fn(|_: Delivery| {}),
        )
        .await
        .expect("first consumer may be exclusive");

    let second = queue
        .subscribe(SubscribeOptions::default(), consumer_fn(|_: Delivery| {}))
        .await;
    support::assert_code(second, ErrorCode::AccessRefused);
}

#[tokio::test]
async fn subscribing_to_a_missing_queue_fails() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = connection.declare_queue(
        "phantom",
        QueueOptions {
            no_declare: true,
            ..QueueOptions::default()
        },
    );

    let result = queue
        .subscribe(SubscribeOptions::default(), consumer_fn(|_: Delivery| {}))
        .await;
    support::assert_code(result, ErrorCode::NotFound);
}

#[tokio::test]
async fn panicking_consumer_does_not_break_delivery() {
    let broker = support::start_broker();
    let connection = support::connect(&broker).await;
    let queue = support::declare_queue_ok(&connection, "fragile", QueueOptions::default()).await;

    queue
        .subscribe(SubscribeOptions::default(), Arc::new(PanickingConsumer))
        .await
        .expect("subscribe");
    let (recorder, _) = support::subscribe_recorder(&queue, "steady").await;

    for payload in ["boom", "kept", "boom again", "kept again"] {
        connection
            .publish("fragile", payload, PublishOptions::default())
            .await
            .expect("publish still completes");
    }

    assert_eq!(recorder.payloads().await, vec!["kept", "kept again"]);
}
