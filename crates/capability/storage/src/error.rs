//! 存储层错误类型
//!
//! - NotFound：引用的 id 不存在
//! - InvalidSchedule / InvalidFan：写入内容违反领域不变量
//! - Conflict：重复 id
//! - Lock：锁中毒

use domain::{FanError, ScheduleError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),
    #[error(transparent)]
    InvalidFan(#[from] FanError),
    #[error("{0}")]
    Conflict(String),
    #[error("lock failed")]
    Lock,
}

impl StorageError {
    pub fn schedule_not_found(schedule_id: &str) -> Self {
        Self::NotFound {
            kind: "schedule",
            id: schedule_id.to_string(),
        }
    }

    pub fn fan_not_found(fan_id: &str) -> Self {
        Self::NotFound {
            kind: "fan",
            id: fan_id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
