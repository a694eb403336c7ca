//! 数据模型
//!
//! - FanUpdate：控制服务计算出的写回字段
//! - FanTelemetry：设备侧上报的状态与遥测
//! - ControlWrite：条件写回的结果

use domain::{Fan, FanStatus};

/// 风扇控制写回（由控制服务保证开关/转速联动后再写入）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanUpdate {
    pub is_on: Option<bool>,
    pub speed: Option<u8>,
    pub power_consumption: Option<f64>,
}

/// 设备遥测上报。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanTelemetry {
    pub status: Option<FanStatus>,
    pub power_consumption: Option<f64>,
    pub temperature: Option<f64>,
    pub runtime: Option<f64>,
}

/// 控制写回结果：检查与写入在同一把写锁内完成。
#[derive(Debug, Clone, PartialEq)]
pub enum ControlWrite {
    /// 已写入（写入前/后快照）
    Applied { previous: Fan, current: Fan },
    /// 风扇离线，记录未改动
    Offline(Fan),
}
