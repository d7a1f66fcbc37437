//! Data Models
//!
//! Configuration and CLI response structures.

pub mod response;
pub mod settings;

pub use response::{CommandResponse, ConfigResponse, HealthResponse, ParseResponse};
pub use settings::AgentConfig;
