//! # Stress
//!
//! Many clients, each both caller and responder, issuing synchronous calls to
//! randomly chosen peers concurrently. Every request must get exactly its own
//! answer back.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use futures::future::join_all;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use samp_hub::HubEngine;
    use std::time::Duration;

    const CLIENTS: usize = 8;
    const CALLS_PER_CLIENT: usize = 25;

    /// For each caller, the (peer index, a, b) of every request, decided up front.
    fn plan(seed: u64) -> Vec<Vec<(usize, i64, i64)>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..CLIENTS)
            .map(|me| {
                (0..CALLS_PER_CLIENT)
                    .map(|_| {
                        let mut peer = rng.gen_range(0..CLIENTS - 1);
                        if peer >= me {
                            peer += 1;
                        }
                        (peer, rng.gen_range(-1000..1000), rng.gen_range(-1000..1000))
                    })
                    .collect()
            })
            .collect()
    }

    async fn run(hub: HubEngine, seed: u64) {
        let mut ids = Vec::new();
        let mut keys = Vec::new();
        for _ in 0..CLIENTS {
            let client = TestClient::connect(&hub, &["calc.int.add"]).await;
            ids.push(client.id.clone());
            keys.push(client.key.clone());
            let _ = spawn_calculator(&hub, client, Duration::ZERO);
        }

        let callers = plan(seed).into_iter().enumerate().map(|(me, requests)| {
            let hub = hub.clone();
            let key = keys[me].clone();
            let ids = ids.clone();
            tokio::spawn(async move {
                let mut answered = 0;
                for (peer, a, b) in requests {
                    let response = hub
                        .call_and_wait(&key, &ids[peer], add_request(a, b), 10)
                        .await
                        .unwrap();
                    assert_eq!(result_x(&response), Some(a + b));
                    answered += 1;
                }
                answered
            })
        });

        let total: usize = join_all(callers)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .sum();
        assert_eq!(total, CLIENTS * CALLS_PER_CLIENT);
        assert_eq!(hub.status().pending_calls, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_random_peer_calls_are_never_crossed() {
        run(start_hub(CLIENTS * CALLS_PER_CLIENT), 0x5eed).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_random_peer_calls_under_tight_capacity() {
        // Each caller has at most one call in flight, so CLIENTS slots suffice.
        run(start_hub(CLIENTS), 0xbeef).await;
    }

    #[test]
    fn test_plan_never_targets_self() {
        for (me, requests) in plan(7).into_iter().enumerate() {
            assert_eq!(requests.len(), CALLS_PER_CLIENT);
            assert!(requests.iter().all(|(peer, _, _)| *peer != me && *peer < CLIENTS));
        }
    }
}
