//! Canonical structured event names used across `fake-amqp`.

// Entity lifecycle events.
pub const EXCHANGE_DECLARE_OK: &str = "exchange_declare_ok";
pub const EXCHANGE_DECLARE_FAILED: &str = "exchange_declare_failed";
pub const EXCHANGE_DESTROY_OK: &str = "exchange_destroy_ok";
pub const EXCHANGE_DESTROY_FAILED: &str = "exchange_destroy_failed";
pub const EXCHANGE_AUTO_DELETE: &str = "exchange_auto_delete";
pub const QUEUE_DECLARE_OK: &str = "queue_declare_ok";
pub const QUEUE_DECLARE_FAILED: &str = "queue_declare_failed";
pub const QUEUE_DESTROY_OK: &str = "queue_destroy_ok";
pub const QUEUE_DESTROY_FAILED: &str = "queue_destroy_failed";
pub const QUEUE_AUTO_DELETE: &str = "queue_auto_delete";
pub const QUEUE_EXCLUSIVE_TEARDOWN: &str = "queue_exclusive_teardown";

// Binding events.
pub const BIND_OK: &str = "bind_ok";
pub const BIND_FAILED: &str = "bind_failed";
pub const UNBIND_OK: &str = "unbind_ok";
pub const UNBIND_FAILED: &str = "unbind_failed";

// Consumer events.
pub const CONSUME_OK: &str = "consume_ok";
pub const CONSUME_FAILED: &str = "consume_failed";
pub const CANCEL_OK: &str = "cancel_ok";

// Publish and dispatch events.
pub const PUBLISH_ROUTED: &str = "publish_routed";
pub const PUBLISH_FAILED: &str = "publish_failed";
pub const PUBLISH_HEADERS_UNSUPPORTED: &str = "publish_headers_unsupported";
pub const DELIVERY_DROPPED_NO_CONSUMER: &str = "delivery_dropped_no_consumer";
pub const DELIVERY_LISTENER_PANICKED: &str = "delivery_listener_panicked";
pub const DELIVERY_ACKNOWLEDGED: &str = "delivery_acknowledged";

// Connection and broker-wide events.
pub const CONNECTION_READY: &str = "connection_ready";
pub const CONNECTION_CLOSED: &str = "connection_closed";
pub const BROKER_RESET: &str = "broker_reset";
pub const STALE_OPERATION_REJECTED: &str = "stale_operation_rejected";

// Runtime events.
pub const RUNTIME_SPAWN_OK: &str = "runtime_spawn_ok";
pub const RUNTIME_SPAWN_FAILED: &str = "runtime_spawn_failed";
pub const RUNTIME_LOOP_STOPPED: &str = "runtime_loop_stopped";
