//! Shared fixtures for integration scenarios.

use hub_telemetry::{init_logging, LoggingConfig};
use samp_hub::{ChannelReceiver, Delivery, HubConfig, HubEngine, HubError};
use shared_types::{ErrorInfo, Map, Message, Response, Subscriptions, Value};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Install a quiet subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let _ = init_logging(&LoggingConfig::from_env().with_level("warn"));
}

/// A started hub with the given pending-call capacity.
pub fn start_hub(max_pending_calls: usize) -> HubEngine {
    init_test_logging();
    let hub = HubEngine::new(HubConfig {
        max_pending_calls,
        ..HubConfig::default()
    })
    .expect("valid config");
    hub.start().expect("hub starts");
    hub
}

/// A registered client with a channel receiver installed.
pub struct TestClient {
    pub id: String,
    pub key: String,
    pub inbox: UnboundedReceiver<Delivery>,
}

impl TestClient {
    pub async fn connect(hub: &HubEngine, patterns: &[&str]) -> Self {
        let reg = hub.register().await.expect("register");
        let (receiver, inbox) = ChannelReceiver::pair();
        hub.set_receiver(&reg.private_key, Some(receiver))
            .expect("set receiver");
        if !patterns.is_empty() {
            let subs: Subscriptions = patterns
                .iter()
                .map(|p| (p.to_string(), Map::new()))
                .collect();
            hub.declare_subscriptions(&reg.private_key, subs)
                .await
                .expect("declare subscriptions");
        }
        Self {
            id: reg.self_id,
            key: reg.private_key,
            inbox,
        }
    }

    /// Next delivery, failing the test after 5 seconds.
    pub async fn next(&mut self) -> Delivery {
        tokio::time::timeout(Duration::from_secs(5), self.inbox.recv())
            .await
            .expect("delivery within 5s")
            .expect("inbox open")
    }

    /// Next delivery that is not a hub event.
    pub async fn next_message(&mut self) -> Delivery {
        loop {
            let delivery = self.next().await;
            if !delivery.mtype().is_some_and(|t| t.starts_with("samp.hub.")) {
                return delivery;
            }
        }
    }
}

pub fn add_request(a: i64, b: i64) -> Message {
    Message::new("calc.int.add")
        .with_param("a", a.to_string())
        .with_param("b", b.to_string())
}

pub fn add_response(message: &Message) -> Response {
    let operand = |name| message.param_str(name).and_then(|s| s.parse::<i64>().ok());
    match (operand("a"), operand("b")) {
        (Some(a), Some(b)) => {
            let mut result = Map::new();
            result.insert("x".to_string(), Value::from((a + b).to_string()));
            Response::ok(result)
        }
        _ => Response::error(ErrorInfo::new("operands must be integers")),
    }
}

pub fn result_x(response: &Response) -> Option<i64> {
    response
        .result
        .as_ref()
        .and_then(|r| r.get("x"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// Answer every `calc.int.add` call after `delay`, reporting each reply's
/// outcome on the returned handle's channel.
pub fn spawn_calculator(
    hub: &HubEngine,
    mut client: TestClient,
    delay: Duration,
) -> (JoinHandle<()>, UnboundedReceiver<Result<(), HubError>>) {
    let hub = hub.clone();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        while let Some(delivery) = client.inbox.recv().await {
            let Delivery::Call {
                msg_id, message, ..
            } = delivery
            else {
                continue;
            };
            let hub = hub.clone();
            let key = client.key.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let outcome = hub.reply(&key, &msg_id, add_response(&message)).await;
                let _ = tx.send(outcome);
            });
        }
    });
    (handle, rx)
}
