//! Drupal Agent Core
//!
//! Foundational types shared by every crate in the Drupal Agent workspace.
//! This crate has no dependency on LLM providers or the application crate.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `intent` - The closed intent vocabulary (`Intent`), the parameter
//!   mapping (`Params`) and the parser output (`ParsedCommand`)

pub mod error;
pub mod intent;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Intent Vocabulary ──────────────────────────────────────────────────
pub use intent::{Intent, ParseSource, ParsedCommand, Params};
