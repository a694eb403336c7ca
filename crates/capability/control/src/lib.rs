use domain::{Fan, FanControl, FanFilter, MAX_SPEED};
use fan_storage::{ControlWrite, FanRegistry, FanUpdate, StorageError};
use fan_telemetry::{record_control_applied, record_control_failed, record_control_rejected};
use std::sync::Arc;
use tracing::{info, warn};

/// 控制链路错误。
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("fan not found: {0}")]
    NotFound(String),
    #[error("fan offline, control rejected: {0}")]
    Rejected(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// 批量控制中单台风扇的结果。
#[derive(Debug)]
pub struct ControlOutcome {
    pub fan_id: String,
    pub result: Result<Fan, ControlError>,
}

/// 风扇控制服务（开关/转速联动 + 离线拒绝）。
///
/// 每次控制的"离线检查-计算-写回"交给 `FanRegistry::update_online_fan`，
/// 在注册表的同一把写锁内完成，与遥测上报互斥。
#[derive(Clone)]
pub struct FanControlService {
    fan_registry: Arc<dyn FanRegistry>,
}

impl FanControlService {
    pub fn new(fan_registry: Arc<dyn FanRegistry>) -> Self {
        Self { fan_registry }
    }

    pub fn fan_registry(&self) -> &Arc<dyn FanRegistry> {
        &self.fan_registry
    }

    /// 对单台风扇应用控制，返回更新后的快照。
    pub fn apply_control(&self, fan_id: &str, control: FanControl) -> Result<Fan, ControlError> {
        let result = self.write_control(fan_id, control);
        match &result {
            Ok(_) => record_control_applied(),
            Err(ControlError::Rejected(_)) => record_control_rejected(),
            Err(_) => record_control_failed(),
        }
        result
    }

    /// 对筛选出的每台风扇独立应用同一控制；单台失败不影响其他风扇。
    pub fn apply_bulk(
        &self,
        filter: &FanFilter,
        control: FanControl,
    ) -> Result<Vec<ControlOutcome>, ControlError> {
        let fans = self.fan_registry.filter_fans(filter)?;
        info!(
            target: "fan.control",
            matched = fans.len(),
            is_on = ?control.is_on,
            speed = ?control.speed,
            "bulk_control_requested"
        );
        Ok(fans
            .into_iter()
            .map(|fan| ControlOutcome {
                result: self.apply_control(&fan.fan_id, control),
                fan_id: fan.fan_id,
            })
            .collect())
    }

    fn write_control(&self, fan_id: &str, control: FanControl) -> Result<Fan, ControlError> {
        let plan = |fan: &Fan| plan_update(fan, &control);
        let write = self
            .fan_registry
            .update_online_fan(fan_id, &plan)?
            .ok_or_else(|| ControlError::NotFound(fan_id.to_string()))?;
        match write {
            ControlWrite::Offline(_) => {
                warn!(
                    target: "fan.control",
                    fan_id = %fan_id,
                    is_on = ?control.is_on,
                    speed = ?control.speed,
                    "control_rejected_offline"
                );
                Err(ControlError::Rejected(fan_id.to_string()))
            }
            ControlWrite::Applied { previous, current } => {
                info!(
                    target: "fan.control",
                    fan_id = %fan_id,
                    was_on = previous.is_on,
                    is_on = current.is_on,
                    speed = current.speed,
                    power_consumption = current.power_consumption,
                    "control_applied"
                );
                Ok(current)
            }
        }
    }
}

/// 计算控制写回字段。
///
/// - 最终为关机：转速与功率归零，忽略同时给出的转速
/// - 最终为开机：给出转速则钳制到 [0,100]，否则保留原转速；功率留给遥测上报
pub fn plan_update(fan: &Fan, control: &FanControl) -> FanUpdate {
    let is_on = control.is_on.unwrap_or(fan.is_on);
    if !is_on {
        return FanUpdate {
            is_on: Some(false),
            speed: Some(0),
            power_consumption: Some(0.0),
        };
    }
    FanUpdate {
        is_on: Some(true),
        speed: control.speed.map(clamp_speed),
        power_consumption: None,
    }
}

pub fn clamp_speed(speed: i32) -> u8 {
    speed.clamp(0, i32::from(MAX_SPEED)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::FanStatus;

    fn fan(is_on: bool, speed: u8) -> Fan {
        Fan {
            fan_id: "F1".to_string(),
            name: "Ceiling Fan".to_string(),
            room: "Living Room".to_string(),
            is_on,
            speed,
            status: FanStatus::Online,
            power_consumption: if is_on { 45.0 } else { 0.0 },
            temperature: None,
            runtime: None,
        }
    }

    #[test]
    fn power_off_overrides_requested_speed() {
        let update = plan_update(
            &fan(true, 75),
            &FanControl {
                is_on: Some(false),
                speed: Some(60),
            },
        );
        assert_eq!(update.is_on, Some(false));
        assert_eq!(update.speed, Some(0));
        assert_eq!(update.power_consumption, Some(0.0));
    }

    #[test]
    fn speed_only_on_an_off_fan_keeps_it_off() {
        let update = plan_update(
            &fan(false, 0),
            &FanControl {
                is_on: None,
                speed: Some(40),
            },
        );
        assert_eq!(update.is_on, Some(false));
        assert_eq!(update.speed, Some(0));
    }

    #[test]
    fn power_on_without_speed_keeps_prior_speed() {
        let update = plan_update(&fan(true, 30), &FanControl::power_on());
        assert_eq!(update.speed, None);
        assert_eq!(update.power_consumption, None);
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(clamp_speed(-5), 0);
        assert_eq!(clamp_speed(55), 55);
        assert_eq!(clamp_speed(250), 100);
    }
}
