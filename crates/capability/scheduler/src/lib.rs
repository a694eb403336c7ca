//! 排程评估
//!
//! 给定排程、风扇与一个本地墙钟时刻，找出到期排程并转换为控制意图。
//!
//! - 只看启用的排程；星期与时分（忽略秒）同时匹配才算到期
//! - 引用的风扇不存在时静默跳过：排程可以比风扇活得更久，这里不报错也不级联删除
//! - 无内部状态，同一分钟内重复评估得到相同结果；同一分钟去重属于外部触发循环
//! - 每条意图独立执行，某条 NotFound/Rejected 不影响其他

use chrono::NaiveDateTime;
use domain::{Fan, FanControl, Schedule, ScheduleAction};
use fan_control::{ControlError, FanControlService};
use fan_storage::{ScheduleStore, StorageError};
use fan_telemetry::{
    record_schedule_action_skipped, record_schedule_actions_emitted, record_schedule_evaluation,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 到期排程产生的控制意图。
#[derive(Debug, Clone, PartialEq)]
pub struct DueAction {
    pub schedule_id: String,
    pub fan_id: String,
    pub action: ScheduleAction,
    pub control: FanControl,
}

/// 意图执行结果。
#[derive(Debug)]
pub struct ActionOutcome {
    pub action: DueAction,
    pub result: Result<Fan, ControlError>,
}

/// 计算 `now` 时刻的控制意图，保持排程顺序。不记录计数器，也不写日志。
pub fn due_actions(schedules: &[Schedule], fans: &[Fan], now: &NaiveDateTime) -> Vec<DueAction> {
    resolve_due(schedules, fans, now).0
}

/// 到期意图，以及因风扇不存在而跳过的到期排程。
fn resolve_due<'a>(
    schedules: &'a [Schedule],
    fans: &[Fan],
    now: &NaiveDateTime,
) -> (Vec<DueAction>, Vec<&'a Schedule>) {
    let mut actions = Vec::new();
    let mut dangling = Vec::new();
    for schedule in schedules.iter().filter(|schedule| schedule.is_due_at(now)) {
        if !fans.iter().any(|fan| fan.fan_id == schedule.fan_id) {
            dangling.push(schedule);
            continue;
        }
        actions.push(DueAction {
            schedule_id: schedule.schedule_id.clone(),
            fan_id: schedule.fan_id.clone(),
            action: schedule.action,
            control: schedule.action.to_control(),
        });
    }
    (actions, dangling)
}

/// 排程评估器：读取排程存储与风扇注册表，按需经控制服务执行意图。
#[derive(Clone)]
pub struct ScheduleEvaluator {
    schedule_store: Arc<dyn ScheduleStore>,
    control: FanControlService,
}

impl ScheduleEvaluator {
    pub fn new(schedule_store: Arc<dyn ScheduleStore>, control: FanControlService) -> Self {
        Self {
            schedule_store,
            control,
        }
    }

    /// 只计算意图，不修改风扇。
    pub fn evaluate(&self, now: &NaiveDateTime) -> Result<Vec<DueAction>, StorageError> {
        let schedules = self.schedule_store.list()?;
        let fans = self.control.fan_registry().list_fans()?;
        record_schedule_evaluation();
        let (actions, dangling) = resolve_due(&schedules, &fans, now);
        for schedule in dangling {
            record_schedule_action_skipped();
            debug!(
                target: "fan.scheduler",
                schedule_id = %schedule.schedule_id,
                fan_id = %schedule.fan_id,
                now = %now,
                "schedule_fan_unresolved"
            );
        }
        record_schedule_actions_emitted(actions.len() as u64);
        info!(
            target: "fan.scheduler",
            now = %now,
            schedules = schedules.len(),
            due = actions.len(),
            "schedule_evaluated"
        );
        Ok(actions)
    }

    /// 计算并逐条执行意图。
    pub fn run(&self, now: &NaiveDateTime) -> Result<Vec<ActionOutcome>, StorageError> {
        let actions = self.evaluate(now)?;
        let outcomes = actions
            .into_iter()
            .map(|action| {
                let result = self.control.apply_control(&action.fan_id, action.control);
                if let Err(err) = &result {
                    warn!(
                        target: "fan.scheduler",
                        schedule_id = %action.schedule_id,
                        fan_id = %action.fan_id,
                        error = %err,
                        "schedule_action_failed"
                    );
                }
                ActionOutcome { action, result }
            })
            .collect();
        Ok(outcomes)
    }
}
