//! 风扇领域模型：风扇记录、控制请求、排程与能耗估算。
//!
//! 本 crate 不做任何 I/O，只定义数据结构与其自身的校验规则；
//! 存储、控制、排程评估分别由 capability 层的 crate 实现。

pub mod energy;
pub mod fan;
pub mod schedule;

pub use energy::{DEFAULT_TARIFF_PER_KWH, EnergyReport, FanEnergy};
pub use fan::{Fan, FanControl, FanError, FanFilter, FanStatus, MAX_SPEED, PowerState};
pub use schedule::{
    ActionKind, DaySet, Schedule, ScheduleAction, ScheduleDraft, ScheduleError, ScheduleFields,
    SchedulePatch, TimeOfDay,
};
