//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `discovery.rs` — list-dsp/list-control/list-params/list-param-types/schema.
//! - `lifecycle.rs` — validate/generate-bin/deploy/clean/history.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Map failed workflow steps to a non-zero exit code; keep output schema stable.

pub mod discovery;
pub mod lifecycle;

pub use discovery::handle_discovery_commands;
pub use lifecycle::handle_lifecycle_commands;
