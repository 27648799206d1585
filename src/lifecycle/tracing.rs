//! # Observability & Tracing
//!
//! The [`setup_tracing`] function installs the structured logger used by the
//! demo binary. Library code only emits events; installing a subscriber is the
//! application's decision.
//!
//! ## Configuration
//!
//! Log levels come from the `RUST_LOG` environment variable. The compact format
//! hides module paths (`with_target(false)`); events carry `type_name`,
//! `attribute`, `operation` and `object_name` fields instead.
//!
//! ```bash
//! # Directory builds, registrations and failed dispatches
//! RUST_LOG=info cargo run
//!
//! # Every read, write and invoke
//! RUST_LOG=debug cargo run
//!
//! # Only the dispatcher
//! RUST_LOG=managed_recipe::framework::dispatcher=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! | Level | Event |
//! |-------|-------|
//! | `info` | Directory built, object registered/unregistered |
//! | `debug` | Attribute/operation resolved, each dispatch request |
//! | `warn` | Rejected Directory build, failed dispatch, duplicate registration |
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! INFO Directory built type_name="Counter" attributes=1 operations=2
//! INFO register: Registered object_name=demo:type=Counter,name=orders type_name=Counter size=1
//! DEBUG Invoke type_name="Counter" operation="increment" args=1
//! WARN Dispatch failed type_name="Counter" member="value" error=Type mismatch for value argument 1: expected int, found text
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths are noise; events carry type_name instead
        .compact()
        .init();
}
