//! # Hub Flows
//!
//! Registration, notification and asynchronous call flows between several
//! clients connected to one hub.
//!
//! ## Flows Tested:
//!
//! 1. **Registration lifecycle**: ids, event broadcasts, retired ids
//! 2. **Notifications**: targeted and broadcast delivery
//! 3. **Asynchronous calls**: reply routing by message id and tag

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use samp_hub::{mtypes, Delivery, HubError};
    use shared_types::{Message, Metadata, Response, Value};
    use std::collections::HashSet;
    use std::time::Duration;

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    #[tokio::test]
    async fn test_registrations_yield_distinct_ids_and_keys() {
        let hub = start_hub(100);
        let mut clients = Vec::new();
        for _ in 0..50 {
            clients.push(TestClient::connect(&hub, &[]).await);
        }

        let ids: HashSet<_> = clients.iter().map(|c| c.id.clone()).collect();
        let keys: HashSet<_> = clients.iter().map(|c| c.key.clone()).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(keys.len(), 50);

        let others = hub.get_registered_clients(&clients[0].key).unwrap();
        assert_eq!(others.len(), 50);
        assert!(!others.contains(&clients[0].id));
        assert!(others.iter().any(|id| id == hub.hub_id()));
    }

    #[tokio::test]
    async fn test_unregistered_client_is_reported_as_retired() {
        let hub = start_hub(100);
        let observer = TestClient::connect(&hub, &[]).await;
        let leaving = TestClient::connect(&hub, &[]).await;

        hub.unregister(&leaving.key).await.unwrap();

        let retired = hub.get_metadata(&observer.key, &leaving.id).unwrap_err();
        let unknown = hub.get_metadata(&observer.key, "c1000").unwrap_err();
        assert!(matches!(retired, HubError::NoLongerRegistered(_)));
        assert!(matches!(unknown, HubError::NoSuchClient(_)));
        assert_ne!(retired.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_lifecycle_events_reach_subscribers() {
        let hub = start_hub(100);
        let mut monitor = TestClient::connect(&hub, &["samp.hub.event.*"]).await;
        assert_eq!(monitor.next().await.mtype(), Some(mtypes::EVENT_SUBSCRIPTIONS));

        let app = TestClient::connect(&hub, &["table.load.*"]).await;
        let mut metadata = Metadata::new();
        metadata.insert("samp.name".to_string(), Value::from("TableViewer"));
        hub.declare_metadata(&app.key, metadata).await.unwrap();
        hub.unregister(&app.key).await.unwrap();

        let mut seen = Vec::new();
        for _ in 0..4 {
            match monitor.next().await {
                Delivery::Notification { sender_id, message } => {
                    assert_eq!(sender_id, hub.hub_id());
                    assert_eq!(message.param_str("id"), Some(app.id.as_str()));
                    seen.push(message.mtype);
                }
                other => panic!("unexpected delivery {other:?}"),
            }
        }
        assert_eq!(
            seen,
            [
                mtypes::EVENT_REGISTER,
                mtypes::EVENT_SUBSCRIPTIONS,
                mtypes::EVENT_METADATA,
                mtypes::EVENT_UNREGISTER,
            ]
        );

        hub.shutdown().await;
        assert_eq!(monitor.next().await.mtype(), Some(mtypes::EVENT_SHUTDOWN));
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    #[tokio::test]
    async fn test_notify_reaches_only_the_target() {
        let hub = start_hub(100);
        let mut target = TestClient::connect(&hub, &["image.load.fits"]).await;
        let mut bystander = TestClient::connect(&hub, &["image.load.fits"]).await;
        let sender = TestClient::connect(&hub, &[]).await;

        let message = Message::new("image.load.fits").with_param("url", "file:///tmp/m31.fits");
        hub.notify(&sender.key, &target.id, message.clone())
            .await
            .unwrap();

        assert_eq!(
            target.next_message().await,
            Delivery::Notification {
                sender_id: sender.id.clone(),
                message,
            }
        );
        assert!(bystander.inbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_notify_all_fans_out_by_subscription() {
        let hub = start_hub(100);
        let mut exact = TestClient::connect(&hub, &["table.load.votable"]).await;
        let mut prefix = TestClient::connect(&hub, &["table.*"]).await;
        let mut other = TestClient::connect(&hub, &["image.*"]).await;
        let sender = TestClient::connect(&hub, &["table.load.votable"]).await;

        let delivered = hub
            .notify_all(&sender.key, Message::new("table.load.votable"))
            .await
            .unwrap();

        assert_eq!(delivered, [exact.id.clone(), prefix.id.clone()]);
        assert_eq!(exact.next_message().await.mtype(), Some("table.load.votable"));
        assert_eq!(prefix.next_message().await.mtype(), Some("table.load.votable"));
        assert!(other.inbox.try_recv().is_err());
    }

    // =========================================================================
    // ASYNCHRONOUS CALLS
    // =========================================================================

    #[tokio::test]
    async fn test_async_replies_are_matched_by_tag() {
        let hub = start_hub(100);
        let calculator = TestClient::connect(&hub, &["calc.int.add"]).await;
        let calculator_id = calculator.id.clone();
        let (_responder, _outcomes) = spawn_calculator(&hub, calculator, Duration::ZERO);
        let mut caller = TestClient::connect(&hub, &[]).await;

        for i in 0..10 {
            hub.call(&caller.key, &calculator_id, &format!("sum-{i}"), add_request(i, i))
                .await
                .unwrap();
        }

        let mut answered = 0;
        while answered < 10 {
            if let Delivery::Response {
                responder_id,
                msg_tag,
                response,
            } = caller.next_message().await
            {
                assert_eq!(responder_id, calculator_id);
                let i: i64 = msg_tag.trim_start_matches("sum-").parse().unwrap();
                assert_eq!(result_x(&response), Some(2 * i));
                answered += 1;
            }
        }
    }

    #[tokio::test]
    async fn test_call_all_collects_replies_from_each_peer() {
        let hub = start_hub(100);
        let mut peer_ids = Vec::new();
        for _ in 0..3 {
            let peer = TestClient::connect(&hub, &["calc.*"]).await;
            peer_ids.push(peer.id.clone());
            let _ = spawn_calculator(&hub, peer, Duration::ZERO);
        }
        let mut caller = TestClient::connect(&hub, &[]).await;

        hub.call_all(&caller.key, "everyone", add_request(20, 22))
            .await
            .unwrap();

        let mut responders = HashSet::new();
        while responders.len() < peer_ids.len() {
            if let Delivery::Response {
                responder_id,
                msg_tag,
                response,
            } = caller.next_message().await
            {
                assert_eq!(msg_tag, "everyone");
                assert_eq!(result_x(&response), Some(42));
                responders.insert(responder_id);
            }
        }
        assert_eq!(responders, peer_ids.into_iter().collect::<HashSet<_>>());
    }

    #[tokio::test]
    async fn test_reply_to_departed_caller_fails() {
        let hub = start_hub(100);
        let mut worker = TestClient::connect(&hub, &["calc.int.add"]).await;
        let caller = TestClient::connect(&hub, &[]).await;

        hub.call(&caller.key, &worker.id, "t", add_request(1, 1))
            .await
            .unwrap();
        let Delivery::Call { msg_id, .. } = worker.next_message().await else {
            panic!("expected a call");
        };
        hub.unregister(&caller.key).await.unwrap();

        let err = hub
            .reply(&worker.key, &msg_id, Response::ok(Default::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::NoLongerRegistered(_)));
    }
}
