//! 风扇记录与控制请求。

use std::fmt;
use std::str::FromStr;

/// 转速上限（百分比）。
pub const MAX_SPEED: u8 = 100;

/// 风扇记录校验错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FanError {
    #[error("invalid fan: {0}")]
    Invalid(String),
    #[error("unknown fan status: {0}")]
    UnknownStatus(String),
    #[error("unknown power state: {0}")]
    UnknownPowerState(String),
}

/// 连接/健康状态，与开关状态相互独立。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanStatus {
    Online,
    Offline,
    Error,
}

impl FanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FanStatus::Online => "online",
            FanStatus::Offline => "offline",
            FanStatus::Error => "error",
        }
    }
}

impl fmt::Display for FanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanStatus {
    type Err = FanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(FanStatus::Online),
            "offline" => Ok(FanStatus::Offline),
            "error" => Ok(FanStatus::Error),
            _ => Err(FanError::UnknownStatus(value.to_string())),
        }
    }
}

/// 风扇记录。
///
/// 不变量：`is_on == false` 时 `speed` 与 `power_consumption` 必须为 0。
#[derive(Debug, Clone, PartialEq)]
pub struct Fan {
    pub fan_id: String,
    pub name: String,
    pub room: String,
    pub is_on: bool,
    /// 0-100
    pub speed: u8,
    pub status: FanStatus,
    /// 瓦
    pub power_consumption: f64,
    /// 摄氏度
    pub temperature: Option<f64>,
    /// 小时
    pub runtime: Option<f64>,
}

impl Fan {
    /// 校验记录是否满足全部不变量（用于设备接入/初始化时）。
    pub fn validate(&self) -> Result<(), FanError> {
        if self.fan_id.trim().is_empty() {
            return Err(FanError::Invalid("fanId required".to_string()));
        }
        if self.speed > MAX_SPEED {
            return Err(FanError::Invalid(format!("speed out of range: {}", self.speed)));
        }
        ensure_non_negative("powerConsumption", self.power_consumption)?;
        if let Some(temperature) = self.temperature {
            ensure_non_negative("temperature", temperature)?;
        }
        if let Some(runtime) = self.runtime {
            ensure_non_negative("runtime", runtime)?;
        }
        if !self.is_on && (self.speed != 0 || self.power_consumption != 0.0) {
            return Err(FanError::Invalid(
                "powered-off fan must report zero speed and power".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        self.status == FanStatus::Online
    }
}

/// 校验遥测数值：有限且非负。
pub fn ensure_non_negative(field: &str, value: f64) -> Result<(), FanError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FanError::Invalid(format!("{field} must be a non-negative number")));
    }
    Ok(())
}

/// 控制请求：开关与转速均可选。
///
/// `speed` 使用有符号整数，超出 [0,100] 的值由控制服务钳制。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanControl {
    pub is_on: Option<bool>,
    pub speed: Option<i32>,
}

impl FanControl {
    pub fn power_on() -> Self {
        Self {
            is_on: Some(true),
            speed: None,
        }
    }

    pub fn power_off() -> Self {
        Self {
            is_on: Some(false),
            speed: None,
        }
    }

    /// 设定转速隐含开机。
    pub fn set_speed(speed: i32) -> Self {
        Self {
            is_on: Some(true),
            speed: Some(speed),
        }
    }
}

/// 开关状态筛选条件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl FromStr for PowerState {
    type Err = FanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(PowerState::On),
            "off" => Ok(PowerState::Off),
            _ => Err(FanError::UnknownPowerState(value.to_string())),
        }
    }
}

/// 风扇筛选条件，所有给定条件同时满足才算匹配。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanFilter {
    /// 精确匹配（区分大小写）
    pub room: Option<String>,
    pub status: Option<FanStatus>,
    pub power: Option<PowerState>,
}

impl FanFilter {
    pub fn matches(&self, fan: &Fan) -> bool {
        if let Some(room) = self.room.as_deref() {
            if fan.room != room {
                return false;
            }
        }
        if let Some(status) = self.status {
            if fan.status != status {
                return false;
            }
        }
        match self.power {
            Some(PowerState::On) => fan.is_on,
            Some(PowerState::Off) => !fan.is_on,
            None => true,
        }
    }
}
