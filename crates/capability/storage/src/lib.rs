//! # Fan Storage 模块
//!
//! 风扇注册表与排程存储的统一抽象层。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`FanRegistry`、`ScheduleStore`
//! 2. **数据模型层** (`models.rs`)：控制写回与遥测上报的更新结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **实现层** (`in_memory/`)：`RwLock` 保护的内存实现，附带演示数据
//!
//! ## 设计约束
//!
//! - 接口均为同步调用，单次调用内持锁，调用之间不保证原子性；
//!   控制写回的"离线检查-计算-写入"由 `update_online_fan` 在一把写锁内完成，
//!   遥测上报无法插入其间。
//! - 排程只按 `fan_id` 弱引用风扇，存储层不校验风扇是否存在，也不级联删除。
//! - 排程 id 由单调计数器分配，整个存储生命周期内唯一。
//! - 持久化不在本模块范围内；接入持久化后端时实现同一组 trait 即可。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use fan_storage::{FanRegistry, InMemoryFanRegistry, InMemoryScheduleStore, ScheduleStore};
//!
//! let fans = InMemoryFanRegistry::with_demo_fans();
//! let total = fans.total_power()?;
//!
//! let schedules = InMemoryScheduleStore::new();
//! let created = schedules.create(draft)?;
//! schedules.toggle_enabled(&created.schedule_id)?;
//! ```

pub mod error;
pub mod in_memory;
pub mod models;
pub mod traits;

pub use error::*;
pub use models::*;
pub use traits::*;

pub use in_memory::{InMemoryFanRegistry, InMemoryScheduleStore};
