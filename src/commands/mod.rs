//! CLI Commands
//!
//! Handlers behind the `drupal-agent` subcommands. Each prints a JSON
//! `CommandResponse` and reports whether it succeeded.

pub mod check;
pub mod config;
pub mod parse;

pub use check::CheckArgs;
pub use parse::ParseArgs;
