//! 能耗估算：按当前瞬时功率外推日/月用电量与电费。

use crate::fan::Fan;

/// 默认电价（每 kWh）。
pub const DEFAULT_TARIFF_PER_KWH: f64 = 0.12;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;

/// 单台风扇的能耗明细。
#[derive(Debug, Clone, PartialEq)]
pub struct FanEnergy {
    pub fan_id: String,
    pub name: String,
    pub room: String,
    pub is_on: bool,
    pub power_w: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    /// 小时
    pub runtime: Option<f64>,
}

impl FanEnergy {
    pub fn of(fan: &Fan) -> Self {
        let daily_kwh = kwh_per_day(fan.power_consumption);
        Self {
            fan_id: fan.fan_id.clone(),
            name: fan.name.clone(),
            room: fan.room.clone(),
            is_on: fan.is_on,
            power_w: fan.power_consumption,
            daily_kwh,
            monthly_kwh: daily_kwh * DAYS_PER_MONTH,
            runtime: fan.runtime,
        }
    }
}

/// 能耗汇总，附按注册顺序排列的逐台明细。
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub total_power_w: f64,
    pub active_fans: usize,
    /// 无运行中的风扇时为 0
    pub average_power_per_active_fan_w: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub estimated_monthly_cost: f64,
    pub fans: Vec<FanEnergy>,
}

impl EnergyReport {
    pub fn from_fans(fans: &[Fan], tariff_per_kwh: f64) -> Self {
        let total_power_w: f64 = fans.iter().map(|fan| fan.power_consumption).sum();
        let active_fans = fans.iter().filter(|fan| fan.is_on).count();
        let average_power_per_active_fan_w = if active_fans > 0 {
            total_power_w / active_fans as f64
        } else {
            0.0
        };
        let daily_kwh = kwh_per_day(total_power_w);
        let monthly_kwh = daily_kwh * DAYS_PER_MONTH;
        Self {
            total_power_w,
            active_fans,
            average_power_per_active_fan_w,
            daily_kwh,
            monthly_kwh,
            estimated_monthly_cost: monthly_kwh * tariff_per_kwh,
            fans: fans.iter().map(FanEnergy::of).collect(),
        }
    }
}

fn kwh_per_day(power_w: f64) -> f64 {
    power_w * HOURS_PER_DAY / WATTS_PER_KILOWATT
}
