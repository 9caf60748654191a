//! Integration scenarios.

#[cfg(test)]
mod fixtures;
mod flows;
mod stress;
mod sync_calls;
