//! 风扇 handlers
//!
//! - GET /fans - 按房间/状态/开关筛选
//! - GET /fans/{id} - 风扇详情
//! - POST /fans/{id}/control - 单台控制
//! - POST /fans/control - 按筛选条件批量控制
//! - POST /fans/{id}/telemetry - 设备状态与遥测上报
//! - GET /rooms - 房间列表

use crate::AppState;
use crate::utils::response::{
    bad_request_error, control_error, control_outcome_to_dto, fan_to_dto, not_found_error, ok,
    storage_error,
};
use crate::utils::validation::{json_body, parse_fan_filter};
use api_contract::{
    BulkControlRequest, ControlOutcomeDto, FanControlRequest, FanDto, FanQuery,
    FanTelemetryRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::Response,
};
use domain::{FanControl, FanStatus};
use fan_storage::FanTelemetry;
use fan_telemetry::record_telemetry_report;

#[derive(serde::Deserialize)]
pub struct FanPath {
    fan_id: String,
}

/// 列出风扇
///
/// 所有给定条件同时满足才返回；未给条件时返回全部风扇（保持接入顺序）。
pub async fn list_fans(State(state): State<AppState>, Query(query): Query<FanQuery>) -> Response {
    let filter = match parse_fan_filter(query.room, query.status, query.power) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    match state.fan_registry.filter_fans(&filter) {
        Ok(items) => {
            let data: Vec<FanDto> = items.into_iter().map(fan_to_dto).collect();
            ok(data)
        }
        Err(err) => storage_error(err),
    }
}

/// 获取风扇详情
pub async fn get_fan(State(state): State<AppState>, Path(path): Path<FanPath>) -> Response {
    match state.fan_registry.find_fan(&path.fan_id) {
        Ok(Some(fan)) => ok(fan_to_dto(fan)),
        Ok(None) => not_found_error(format!("fan not found: {}", path.fan_id)),
        Err(err) => storage_error(err),
    }
}

/// 单台风扇控制
///
/// 开关与转速联动由控制服务保证；离线风扇返回 409。
pub async fn control_fan(
    State(state): State<AppState>,
    Path(path): Path<FanPath>,
    payload: Result<Json<FanControlRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let control = FanControl {
        is_on: req.is_on,
        speed: req.speed,
    };
    match state.control.apply_control(&path.fan_id, control) {
        Ok(fan) => ok(fan_to_dto(fan)),
        Err(err) => control_error(err),
    }
}

/// 批量控制
///
/// 每台风扇独立执行，单台失败体现在对应结果中，整体仍返回 200。
pub async fn control_fans(
    State(state): State<AppState>,
    payload: Result<Json<BulkControlRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let filter = match parse_fan_filter(req.room, req.status, req.power) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    let control = FanControl {
        is_on: req.is_on,
        speed: req.speed,
    };
    match state.control.apply_bulk(&filter, control) {
        Ok(outcomes) => {
            let data: Vec<ControlOutcomeDto> =
                outcomes.into_iter().map(control_outcome_to_dto).collect();
            ok(data)
        }
        Err(err) => control_error(err),
    }
}

/// 设备状态与遥测上报
pub async fn report_telemetry(
    State(state): State<AppState>,
    Path(path): Path<FanPath>,
    payload: Result<Json<FanTelemetryRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let status = match req.status.as_deref().map(str::parse::<FanStatus>).transpose() {
        Ok(status) => status,
        Err(err) => return bad_request_error(err.to_string()),
    };
    let telemetry = FanTelemetry {
        status,
        power_consumption: req.power_consumption,
        temperature: req.temperature,
        runtime: req.runtime,
    };
    match state.fan_registry.report_telemetry(&path.fan_id, telemetry) {
        Ok(Some(fan)) => {
            record_telemetry_report();
            ok(fan_to_dto(fan))
        }
        Ok(None) => not_found_error(format!("fan not found: {}", path.fan_id)),
        Err(err) => storage_error(err),
    }
}

/// 房间列表（去重）
pub async fn list_rooms(State(state): State<AppState>) -> Response {
    match state.fan_registry.unique_rooms() {
        Ok(rooms) => ok(rooms),
        Err(err) => storage_error(err),
    }
}
