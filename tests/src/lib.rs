//! # Message Hub Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Multi-client scenarios against a live hub
//! │   ├── fixtures.rs    # Connected test clients, responders, logging
//! │   ├── flows.rs       # Registration, notification and async call flows
//! │   ├── sync_calls.rs  # call_and_wait: timeouts, load, ordering
//! │   └── stress.rs      # Many clients calling random peers
//! │
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hub-tests
//! cargo test -p hub-tests integration::sync_calls
//! cargo bench -p hub-tests
//! ```

pub mod integration;
