//! Handlers 模块

pub mod energy;
pub mod fans;
pub mod health;
pub mod metrics;
pub mod schedules;

pub use energy::*;
pub use fans::*;
pub use health::*;
pub use metrics::*;
pub use schedules::*;
