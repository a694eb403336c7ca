//! 排程内存存储实现
//!
//! 功能：
//! - 排程 CRUD 与启用切换
//! - 写入前按领域规则校验，失败不修改已有记录
//! - 单调计数器分配 id（`schedule-001`、`schedule-002` …），不依赖墙钟
//! - 内置演示排程（`with_demo_schedules`）

use crate::error::StorageError;
use crate::traits::ScheduleStore;
use domain::{ActionKind, Schedule, ScheduleDraft, SchedulePatch};
use std::sync::RwLock;
use tracing::info;

struct ScheduleTable {
    schedules: Vec<Schedule>,
    next_seq: u64,
}

impl ScheduleTable {
    fn next_id(&mut self) -> String {
        self.next_seq += 1;
        format!("schedule-{:03}", self.next_seq)
    }

    fn position(&self, schedule_id: &str) -> Result<usize, StorageError> {
        self.schedules
            .iter()
            .position(|item| item.schedule_id == schedule_id)
            .ok_or_else(|| StorageError::schedule_not_found(schedule_id))
    }
}

/// 排程内存存储
pub struct InMemoryScheduleStore {
    table: RwLock<ScheduleTable>,
}

impl InMemoryScheduleStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ScheduleTable {
                schedules: Vec::new(),
                next_seq: 0,
            }),
        }
    }

    /// 内置演示排程（引用 `with_demo_fans` 中的风扇）
    pub fn with_demo_schedules() -> Result<Self, StorageError> {
        let store = Self::new();
        for draft in demo_drafts() {
            store.create(draft)?;
        }
        Ok(store)
    }
}

impl Default for InMemoryScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn list(&self) -> Result<Vec<Schedule>, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Lock)?;
        Ok(table.schedules.clone())
    }

    fn find(&self, schedule_id: &str) -> Result<Option<Schedule>, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Lock)?;
        Ok(table
            .schedules
            .iter()
            .find(|item| item.schedule_id == schedule_id)
            .cloned())
    }

    fn by_fan_id(&self, fan_id: &str) -> Result<Vec<Schedule>, StorageError> {
        let table = self.table.read().map_err(|_| StorageError::Lock)?;
        Ok(table
            .schedules
            .iter()
            .filter(|item| item.fan_id == fan_id)
            .cloned()
            .collect())
    }

    fn create(&self, draft: ScheduleDraft) -> Result<Schedule, StorageError> {
        let fields = draft.validate()?;
        let mut table = self.table.write().map_err(|_| StorageError::Lock)?;
        let schedule = fields.into_schedule(table.next_id());
        table.schedules.push(schedule.clone());
        info!(
            target: "fan.storage",
            schedule_id = %schedule.schedule_id,
            fan_id = %schedule.fan_id,
            time = %schedule.time,
            days = %schedule.days,
            action = %schedule.action,
            enabled = schedule.enabled,
            "schedule_created"
        );
        Ok(schedule)
    }

    fn update(&self, schedule_id: &str, patch: SchedulePatch) -> Result<Schedule, StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Lock)?;
        let index = table.position(schedule_id)?;
        let fields = table.schedules[index].merge(patch).validate()?;
        let schedule = &mut table.schedules[index];
        schedule.apply(fields);
        info!(
            target: "fan.storage",
            schedule_id = %schedule.schedule_id,
            fan_id = %schedule.fan_id,
            time = %schedule.time,
            days = %schedule.days,
            action = %schedule.action,
            enabled = schedule.enabled,
            "schedule_updated"
        );
        Ok(schedule.clone())
    }

    fn delete(&self, schedule_id: &str) -> Result<(), StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Lock)?;
        let index = table.position(schedule_id)?;
        table.schedules.remove(index);
        info!(target: "fan.storage", schedule_id = %schedule_id, "schedule_deleted");
        Ok(())
    }

    fn toggle_enabled(&self, schedule_id: &str) -> Result<Schedule, StorageError> {
        let mut table = self.table.write().map_err(|_| StorageError::Lock)?;
        let index = table.position(schedule_id)?;
        let schedule = &mut table.schedules[index];
        schedule.enabled = !schedule.enabled;
        info!(
            target: "fan.storage",
            schedule_id = %schedule.schedule_id,
            enabled = schedule.enabled,
            "schedule_toggled"
        );
        Ok(schedule.clone())
    }
}

fn demo_draft(
    fan_id: &str,
    time: &str,
    days_of_week: &[i32],
    enabled: bool,
    action: ActionKind,
    speed_value: Option<i32>,
) -> ScheduleDraft {
    ScheduleDraft {
        fan_id: fan_id.to_string(),
        time: time.to_string(),
        days_of_week: days_of_week.to_vec(),
        enabled,
        action,
        speed_value,
    }
}

fn demo_drafts() -> Vec<ScheduleDraft> {
    vec![
        demo_draft("fan-001", "07:00", &[1, 2, 3, 4, 5], true, ActionKind::PowerOn, None),
        demo_draft("fan-001", "22:00", &[1, 2, 3, 4, 5], true, ActionKind::PowerOff, None),
        demo_draft("fan-002", "23:00", &[0, 1, 2, 3, 4, 5, 6], true, ActionKind::SetSpeed, Some(50)),
        demo_draft("fan-003", "06:30", &[0, 6], false, ActionKind::PowerOn, None),
        demo_draft("fan-004", "18:00", &[1, 3, 5], true, ActionKind::SetSpeed, Some(75)),
    ]
}
