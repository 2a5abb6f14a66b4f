//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to drive positions through their lifecycle.

pub mod batch;
pub mod orchestration;
pub mod risk;
