//! 内存存储实现模块
//!
//! 用于测试、演示和单进程部署。
//!
//! 包含以下实现：
//! - FanRegistry: InMemoryFanRegistry
//! - ScheduleStore: InMemoryScheduleStore

pub mod fan;
pub mod schedule;

pub use fan::*;
pub use schedule::*;
