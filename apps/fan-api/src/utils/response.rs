//! HTTP 响应辅助函数和 DTO 转换
//!
//! 错误映射：
//! - NotFound → 404 RESOURCE.NOT_FOUND
//! - 校验失败 / 非法输入 → 400 INVALID.REQUEST
//! - 离线拒绝 → 409 CONTROL.REJECTED
//! - 重复 id → 409 RESOURCE.CONFLICT
//! - 锁失败 → 500 INTERNAL.ERROR

use api_contract::{
    ApiError, ApiResponse, ControlOutcomeDto, FanDto, FanEnergyDto, ScheduleDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{Fan, FanEnergy, Schedule};
use fan_control::{ControlError, ControlOutcome};
use fan_storage::StorageError;
use serde::Serialize;

/// 成功响应
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(code, message.into()))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "INVALID.REQUEST", message)
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND", message)
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let (status, code) = storage_status(&err);
    error_response(status, code, err.to_string())
}

/// 控制错误响应
pub fn control_error(err: ControlError) -> Response {
    let (status, code) = control_status(&err);
    error_response(status, code, err.to_string())
}

fn storage_status(err: &StorageError) -> (StatusCode, &'static str) {
    match err {
        StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND"),
        StorageError::InvalidSchedule(_) | StorageError::InvalidFan(_) => {
            (StatusCode::BAD_REQUEST, "INVALID.REQUEST")
        }
        StorageError::Conflict(_) => (StatusCode::CONFLICT, "RESOURCE.CONFLICT"),
        StorageError::Lock => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR"),
    }
}

fn control_status(err: &ControlError) -> (StatusCode, &'static str) {
    match err {
        ControlError::NotFound(_) => (StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND"),
        ControlError::Rejected(_) => (StatusCode::CONFLICT, "CONTROL.REJECTED"),
        ControlError::Storage(err) => storage_status(err),
    }
}

/// Fan 转 FanDto
pub fn fan_to_dto(fan: Fan) -> FanDto {
    FanDto {
        id: fan.fan_id,
        name: fan.name,
        room: fan.room,
        is_on: fan.is_on,
        speed: fan.speed,
        status: fan.status.as_str().to_string(),
        power_consumption: fan.power_consumption,
        temperature: fan.temperature,
        runtime: fan.runtime,
    }
}

/// FanEnergy 转 FanEnergyDto
pub fn fan_energy_to_dto(line: FanEnergy) -> FanEnergyDto {
    FanEnergyDto {
        fan_id: line.fan_id,
        name: line.name,
        room: line.room,
        is_on: line.is_on,
        power_w: line.power_w,
        daily_kwh: line.daily_kwh,
        monthly_kwh: line.monthly_kwh,
        runtime: line.runtime,
    }
}

/// Schedule 转 ScheduleDto
pub fn schedule_to_dto(schedule: Schedule) -> ScheduleDto {
    ScheduleDto {
        id: schedule.schedule_id,
        fan_id: schedule.fan_id,
        time: schedule.time.to_string(),
        days_of_week: schedule.days.days(),
        enabled: schedule.enabled,
        action: schedule.action.kind().as_str().to_string(),
        speed_value: schedule.action.speed_value(),
        days_label: schedule.days.label(),
        action_label: schedule.action.to_string(),
    }
}

/// 单台控制结果转 ControlOutcomeDto
pub fn outcome_to_dto(fan_id: String, result: Result<Fan, ControlError>) -> ControlOutcomeDto {
    match result {
        Ok(fan) => ControlOutcomeDto {
            fan_id,
            success: true,
            fan: Some(fan_to_dto(fan)),
            error: None,
        },
        Err(err) => {
            let (_, code) = control_status(&err);
            ControlOutcomeDto {
                fan_id,
                success: false,
                fan: None,
                error: Some(ApiError::new(code, err.to_string())),
            }
        }
    }
}

/// 批量控制结果转换
pub fn control_outcome_to_dto(outcome: ControlOutcome) -> ControlOutcomeDto {
    outcome_to_dto(outcome.fan_id, outcome.result)
}
