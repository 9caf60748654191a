//! # Synchronous Calls
//!
//! `call_and_wait` under normal, slow and overloaded recipients.
//!
//! ## Scenarios Tested:
//!
//! 1. **End to end**: `calc.int.add` with a=3, b=4 answers x=7
//! 2. **Timeout**: a 10s responder against a 1s wait
//! 3. **Load**: capacity + 5 calls evict exactly the 5 oldest
//! 4. **Interleaving**: replies in reverse order reach the right callers

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use futures::future::join_all;
    use samp_hub::{Delivery, HubError};
    use shared_types::{Message, Status};
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_end_to_end_addition() {
        let hub = start_hub(100);
        let a = TestClient::connect(&hub, &["calc.int.add"]).await;
        let a_id = a.id.clone();
        let (_responder, _outcomes) = spawn_calculator(&hub, a, Duration::ZERO);
        let b = TestClient::connect(&hub, &[]).await;

        let response = hub
            .call_and_wait(&b.key, &a_id, add_request(3, 4), 5)
            .await
            .unwrap();

        assert_eq!(response.status, Status::Ok);
        assert_eq!(result_x(&response), Some(7));
        assert_eq!(hub.status().pending_calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_recipient_times_out() {
        let hub = start_hub(100);
        let slow = TestClient::connect(&hub, &["calc.int.add"]).await;
        let slow_id = slow.id.clone();
        let (_responder, mut outcomes) = spawn_calculator(&hub, slow, Duration::from_secs(10));
        let caller = TestClient::connect(&hub, &[]).await;

        let started = Instant::now();
        let err = hub
            .call_and_wait(&caller.key, &slow_id, add_request(1, 2), 1)
            .await
            .unwrap_err();
        let waited = started.elapsed();

        assert!(matches!(err, HubError::Timeout(_)));
        assert!(waited >= Duration::from_secs(1));
        assert!(waited < Duration::from_secs(2));

        // The late reply finds nobody waiting.
        let late = outcomes.recv().await.unwrap();
        assert!(matches!(late, Err(HubError::DuplicateReply(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overload_aborts_oldest_calls() {
        const CAPACITY: usize = 10;
        const EXTRA: usize = 5;

        let hub = start_hub(CAPACITY);
        let mut silent = TestClient::connect(&hub, &["slow.op"]).await;
        let caller = TestClient::connect(&hub, &[]).await;

        let mut waiters = Vec::new();
        for _ in 0..CAPACITY + EXTRA {
            let hub = hub.clone();
            let (key, target) = (caller.key.clone(), silent.id.clone());
            waiters.push(tokio::spawn(async move {
                hub.call_and_wait(&key, &target, Message::new("slow.op"), 1)
                    .await
            }));
            // Issue calls strictly one after another.
            assert!(matches!(silent.next().await, Delivery::Call { .. }));
        }

        let results: Vec<_> = join_all(waiters)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        for (i, result) in results.iter().enumerate() {
            if i < EXTRA {
                assert!(matches!(result, Err(HubError::LoadExceeded)), "call {i}");
            } else {
                assert!(matches!(result, Err(HubError::Timeout(_))), "call {i}");
            }
        }
        assert_eq!(hub.status().pending_calls, 0);
    }

    #[tokio::test]
    async fn test_reverse_order_replies_are_not_crossed() {
        let hub = start_hub(100);
        let mut worker = TestClient::connect(&hub, &["calc.int.add"]).await;
        let caller = TestClient::connect(&hub, &[]).await;

        let waiters: Vec<_> = (0..8i64)
            .map(|i| {
                let hub = hub.clone();
                let (key, target) = (caller.key.clone(), worker.id.clone());
                tokio::spawn(async move {
                    let response = hub
                        .call_and_wait(&key, &target, add_request(i, 100), 5)
                        .await;
                    (i, response)
                })
            })
            .collect();

        let mut calls = Vec::new();
        while calls.len() < 8 {
            if let Delivery::Call { msg_id, message, .. } = worker.next_message().await {
                calls.push((msg_id, message));
            }
        }
        for (msg_id, message) in calls.into_iter().rev() {
            hub.reply(&worker.key, &msg_id, add_response(&message))
                .await
                .unwrap();
        }

        for joined in join_all(waiters).await {
            let (i, response) = joined.unwrap();
            assert_eq!(result_x(&response.unwrap()), Some(i + 100));
        }
    }

    #[tokio::test]
    async fn test_ping_through_hub_client() {
        let hub = start_hub(100);
        let caller = TestClient::connect(&hub, &[]).await;

        let response = hub
            .call_and_wait(&caller.key, hub.hub_id(), Message::new("samp.app.ping"), 0)
            .await
            .unwrap();
        assert!(response.is_ok());
    }
}
