//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError::new(code, message)),
        }
    }
}

/// 风扇返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FanDto {
    pub id: String,
    pub name: String,
    pub room: String,
    pub is_on: bool,
    pub speed: u8,
    pub status: String,
    pub power_consumption: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<f64>,
}

/// 风扇列表筛选参数（status: online/offline/error，power: on/off）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanQuery {
    pub room: Option<String>,
    pub status: Option<String>,
    pub power: Option<String>,
}

/// 单台风扇控制请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanControlRequest {
    #[serde(alias = "is_on")]
    pub is_on: Option<bool>,
    pub speed: Option<i32>,
}

/// 批量控制请求体：筛选条件 + 控制内容。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkControlRequest {
    pub room: Option<String>,
    pub status: Option<String>,
    pub power: Option<String>,
    #[serde(alias = "is_on")]
    pub is_on: Option<bool>,
    pub speed: Option<i32>,
}

/// 单台风扇的控制结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlOutcomeDto {
    pub fan_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<FanDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// 设备遥测上报请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanTelemetryRequest {
    pub status: Option<String>,
    #[serde(alias = "power_consumption")]
    pub power_consumption: Option<f64>,
    pub temperature: Option<f64>,
    pub runtime: Option<f64>,
}

/// 单台风扇能耗明细。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FanEnergyDto {
    pub fan_id: String,
    pub name: String,
    pub room: String,
    pub is_on: bool,
    pub power_w: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<f64>,
}

/// 能耗汇总返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReportDto {
    pub total_fans: usize,
    pub online_fans: usize,
    pub active_fans: usize,
    pub total_power_w: f64,
    pub average_power_per_active_fan_w: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub tariff_per_kwh: f64,
    pub estimated_monthly_cost: f64,
    pub fans: Vec<FanEnergyDto>,
}

/// 排程返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub id: String,
    pub fan_id: String,
    pub time: String,
    pub days_of_week: Vec<u8>,
    pub enabled: bool,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_value: Option<u8>,
    pub days_label: String,
    pub action_label: String,
}

/// 排程列表查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    #[serde(alias = "fan_id")]
    pub fan_id: Option<String>,
}

fn default_enabled() -> bool {
    true
}

/// 排程创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub fan_id: String,
    pub time: String,
    pub days_of_week: Vec<i32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub action: String,
    pub speed_value: Option<i32>,
}

/// 排程更新请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub fan_id: Option<String>,
    pub time: Option<String>,
    pub days_of_week: Option<Vec<i32>>,
    pub enabled: Option<bool>,
    pub action: Option<String>,
    pub speed_value: Option<i32>,
}

/// 排程评估请求体。
///
/// `at` 为本地时间 `YYYY-MM-DDTHH:MM[:SS]`，缺省取服务器当前时间；
/// `apply` 为 true 时执行控制，否则只返回意图。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub at: Option<String>,
    #[serde(default)]
    pub apply: bool,
}

/// 到期排程的控制意图（及执行结果）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueActionDto {
    pub schedule_id: String,
    pub fan_id: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_value: Option<u8>,
    pub action_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ControlOutcomeDto>,
}

/// 排程评估返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDto {
    pub at: String,
    pub applied: bool,
    pub actions: Vec<DueActionDto>,
}

/// 进程内计数器快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub controls_applied: u64,
    pub controls_rejected: u64,
    pub controls_failed: u64,
    pub schedules_created: u64,
    pub schedules_updated: u64,
    pub schedules_deleted: u64,
    pub schedule_evaluations: u64,
    pub schedule_actions_emitted: u64,
    pub schedule_actions_skipped: u64,
    pub telemetry_reports: u64,
}
