//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `catalog.rs` — sorted DSP/control block name listings.
//! - `inspector.rs` — parameter schema registry and type resolution.
//! - `lifecycle.rs` — validate/generate/deploy/clean workflow steps.
//! - `settings.rs` — config file loading and CLI override merging.
//! - `history.rs` — deploy/clean history log.
//! - `output.rs` — JSON/text output helpers and status lines.
//!
//! ## Conventions
//! - Services take the library as `&dyn DspLibrary`; they never print.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod catalog;
pub mod history;
pub mod inspector;
pub mod lifecycle;
pub mod output;
pub mod settings;
