use fake_amqp::{
    Broker, BrokerConfig, BrokerError, Connection, ConnectionOptions, Consumer, ErrorCode,
    ExchangeHandle, ExchangeOptions, ExchangeType, ImplOptions, QueueHandle, QueueOptions,
    SubscribeOptions,
};
use integration_test_utils::RecordingConsumer;
use std::sync::Arc;

#[allow(dead_code)]
pub(crate) fn start_broker() -> Broker {
    integration_test_utils::init_logging();
    Broker::new(BrokerConfig::default()).expect("broker should start")
}

#[allow(dead_code)]
pub(crate) async fn connect(broker: &Broker) -> Connection {
    let connection = broker.connect(ConnectionOptions::default(), ImplOptions::default());
    connection
        .ready()
        .await
        .expect("connection should become ready");
    connection
}

#[allow(dead_code)]
pub(crate) async fn declare_exchange_ok(
    connection: &Connection,
    name: &str,
    exchange_type: ExchangeType,
) -> ExchangeHandle {
    let exchange = connection.declare_exchange(name, ExchangeOptions::of_type(exchange_type));
    exchange
        .opened()
        .await
        .expect("exchange declaration should succeed");
    exchange
}

#[allow(dead_code)]
pub(crate) async fn declare_queue_ok(
    connection: &Connection,
    name: &str,
    options: QueueOptions,
) -> QueueHandle {
    let queue = connection.declare_queue(name, options);
    queue
        .opened()
        .await
        .expect("queue declaration should succeed");
    queue
}

#[allow(dead_code)]
/// Subscribes a fresh recording consumer and returns it with its tag.
pub(crate) async fn subscribe_recorder(queue: &QueueHandle, name: &str) -> (RecordingConsumer, String) {
    let recorder = RecordingConsumer::new(name);
    let consumer: Arc<dyn Consumer> = Arc::new(recorder.clone());
    let consume_ok = queue
        .subscribe(SubscribeOptions::default(), consumer)
        .await
        .expect("subscribe should succeed");
    (recorder, consume_ok.consumer_tag)
}

#[allow(dead_code)]
pub(crate) fn assert_code(result: Result<impl std::fmt::Debug, BrokerError>, expected: ErrorCode) {
    match result {
        Ok(value) => panic!("expected {expected:?}, got Ok({value:?})"),
        Err(err) => assert_eq!(err.kind(), expected, "unexpected error: {err}"),
    }
}
