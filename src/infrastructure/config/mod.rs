//! Infrastructure configuration modules.

pub mod deployment;
pub mod logging;
pub mod settings;
pub mod transaction;
pub mod wallet;
