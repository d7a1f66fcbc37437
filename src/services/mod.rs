//! Services
//!
//! Business logic of the agent.

pub mod intent;
