//! Cycle orchestration: per-market lifecycle, fleet pass and the keeper facade.

pub mod fleet;
pub mod keeper;
pub mod lifecycle;
pub mod report;

pub use fleet::Fleet;
pub use keeper::{Keeper, KeeperPorts, MarketStatus};
pub use lifecycle::MarketLifecycle;
pub use report::{CycleReport, MarketFailure, MarketReport};
