//! 风扇注册表内存实现
//!
//! 功能：
//! - 按接入顺序保存风扇记录
//! - 聚合查询（总功率、运行数量、在线数量、房间）
//! - 控制写回与遥测上报，写入前校验不变量
//! - 内置演示数据（`with_demo_fans`）

use crate::error::StorageError;
use crate::models::{ControlWrite, FanTelemetry, FanUpdate};
use crate::traits::FanRegistry;
use domain::fan::ensure_non_negative;
use domain::{Fan, FanFilter, FanStatus};
use std::sync::RwLock;
use tracing::debug;

/// 风扇内存注册表
///
/// 使用 RwLock + Vec 保持注册顺序。
pub struct InMemoryFanRegistry {
    fans: RwLock<Vec<Fan>>,
}

impl InMemoryFanRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            fans: RwLock::new(Vec::new()),
        }
    }

    /// 由已校验的风扇列表创建注册表
    pub fn with_fans(fans: Vec<Fan>) -> Result<Self, StorageError> {
        let registry = Self::new();
        for fan in fans {
            registry.provision_fan(fan)?;
        }
        Ok(registry)
    }

    /// 内置演示风扇（六台，覆盖开/关、在线/离线）
    pub fn with_demo_fans() -> Self {
        Self {
            fans: RwLock::new(demo_fans()),
        }
    }

    fn read_all(&self) -> Result<Vec<Fan>, StorageError> {
        self.fans
            .read()
            .map(|fans| fans.clone())
            .map_err(|_| StorageError::Lock)
    }

    fn modify<F>(&self, fan_id: &str, apply: F) -> Result<Option<Fan>, StorageError>
    where
        F: FnOnce(&mut Fan) -> Result<(), StorageError>,
    {
        let mut fans = self.fans.write().map_err(|_| StorageError::Lock)?;
        let fan = match fans.iter_mut().find(|fan| fan.fan_id == fan_id) {
            Some(fan) => fan,
            None => return Ok(None),
        };
        // 在副本上修改并校验，失败时原记录不变
        let mut next = fan.clone();
        apply(&mut next)?;
        next.validate()?;
        *fan = next;
        Ok(Some(fan.clone()))
    }
}

impl Default for InMemoryFanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FanRegistry for InMemoryFanRegistry {
    fn list_fans(&self) -> Result<Vec<Fan>, StorageError> {
        self.read_all()
    }

    fn find_fan(&self, fan_id: &str) -> Result<Option<Fan>, StorageError> {
        let fans = self.fans.read().map_err(|_| StorageError::Lock)?;
        Ok(fans.iter().find(|fan| fan.fan_id == fan_id).cloned())
    }

    fn total_power(&self) -> Result<f64, StorageError> {
        let fans = self.fans.read().map_err(|_| StorageError::Lock)?;
        Ok(fans.iter().map(|fan| fan.power_consumption).sum())
    }

    fn active_count(&self) -> Result<usize, StorageError> {
        let fans = self.fans.read().map_err(|_| StorageError::Lock)?;
        Ok(fans.iter().filter(|fan| fan.is_on).count())
    }

    fn online_count(&self) -> Result<usize, StorageError> {
        let fans = self.fans.read().map_err(|_| StorageError::Lock)?;
        Ok(fans.iter().filter(|fan| fan.is_online()).count())
    }

    fn fans_by_room(&self, room: &str) -> Result<Vec<Fan>, StorageError> {
        self.filter_fans(&FanFilter {
            room: Some(room.to_string()),
            ..FanFilter::default()
        })
    }

    fn unique_rooms(&self) -> Result<Vec<String>, StorageError> {
        let fans = self.fans.read().map_err(|_| StorageError::Lock)?;
        let mut rooms: Vec<String> = Vec::new();
        for fan in fans.iter() {
            if !rooms.contains(&fan.room) {
                rooms.push(fan.room.clone());
            }
        }
        Ok(rooms)
    }

    fn filter_fans(&self, filter: &FanFilter) -> Result<Vec<Fan>, StorageError> {
        let fans = self.fans.read().map_err(|_| StorageError::Lock)?;
        Ok(fans
            .iter()
            .filter(|fan| filter.matches(fan))
            .cloned()
            .collect())
    }

    fn provision_fan(&self, fan: Fan) -> Result<Fan, StorageError> {
        fan.validate()?;
        let mut fans = self.fans.write().map_err(|_| StorageError::Lock)?;
        if fans.iter().any(|item| item.fan_id == fan.fan_id) {
            return Err(StorageError::Conflict(format!("fan exists: {}", fan.fan_id)));
        }
        debug!(target: "fan.storage", fan_id = %fan.fan_id, room = %fan.room, "fan_provisioned");
        fans.push(fan.clone());
        Ok(fan)
    }

    fn update_online_fan(
        &self,
        fan_id: &str,
        plan: &dyn Fn(&Fan) -> FanUpdate,
    ) -> Result<Option<ControlWrite>, StorageError> {
        let mut fans = self.fans.write().map_err(|_| StorageError::Lock)?;
        let fan = match fans.iter_mut().find(|fan| fan.fan_id == fan_id) {
            Some(fan) => fan,
            None => return Ok(None),
        };
        if fan.status == FanStatus::Offline {
            return Ok(Some(ControlWrite::Offline(fan.clone())));
        }
        let previous = fan.clone();
        let update = plan(&previous);
        let mut next = previous.clone();
        if let Some(is_on) = update.is_on {
            next.is_on = is_on;
        }
        if let Some(speed) = update.speed {
            next.speed = speed;
        }
        if let Some(power) = update.power_consumption {
            next.power_consumption = power;
        }
        next.validate()?;
        *fan = next.clone();
        Ok(Some(ControlWrite::Applied {
            previous,
            current: next,
        }))
    }

    fn report_telemetry(
        &self,
        fan_id: &str,
        telemetry: FanTelemetry,
    ) -> Result<Option<Fan>, StorageError> {
        self.modify(fan_id, |fan| {
            if let Some(status) = telemetry.status {
                fan.status = status;
            }
            if let Some(power) = telemetry.power_consumption {
                ensure_non_negative("powerConsumption", power)?;
                // 关机状态下功率恒为 0
                fan.power_consumption = if fan.is_on { power } else { 0.0 };
            }
            if let Some(temperature) = telemetry.temperature {
                fan.temperature = Some(temperature);
            }
            if let Some(runtime) = telemetry.runtime {
                fan.runtime = Some(runtime);
            }
            Ok(())
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_fan(
    fan_id: &str,
    name: &str,
    room: &str,
    speed: u8,
    status: FanStatus,
    power_consumption: f64,
    temperature: f64,
    runtime: f64,
) -> Fan {
    Fan {
        fan_id: fan_id.to_string(),
        name: name.to_string(),
        room: room.to_string(),
        is_on: speed > 0,
        speed,
        status,
        power_consumption,
        temperature: Some(temperature),
        runtime: Some(runtime),
    }
}

fn demo_fans() -> Vec<Fan> {
    vec![
        demo_fan("fan-001", "Ceiling Fan 1", "Living Room", 75, FanStatus::Online, 45.0, 42.0, 1247.0),
        demo_fan("fan-002", "Ceiling Fan 2", "Bedroom", 0, FanStatus::Online, 0.0, 28.0, 892.0),
        demo_fan("fan-003", "Wall Fan", "Kitchen", 50, FanStatus::Online, 32.0, 38.0, 654.0),
        demo_fan("fan-004", "Exhaust Fan", "Bathroom", 100, FanStatus::Online, 28.0, 45.0, 2103.0),
        demo_fan("fan-005", "Ceiling Fan 3", "Office", 0, FanStatus::Offline, 0.0, 25.0, 445.0),
        demo_fan("fan-006", "Pedestal Fan", "Garage", 60, FanStatus::Online, 38.0, 40.0, 321.0),
    ]
}
