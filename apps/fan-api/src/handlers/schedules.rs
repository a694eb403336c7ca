//! 排程 handlers
//!
//! - GET /schedules?fanId= - 列出排程（可按风扇过滤）
//! - POST /schedules - 创建排程
//! - GET /schedules/{id} - 排程详情
//! - PUT /schedules/{id} - 合并更新
//! - DELETE /schedules/{id} - 删除排程
//! - POST /schedules/{id}/toggle - 切换启用状态
//! - POST /schedules/evaluate - 评估到期排程（可选执行）
//!
//! 排程只按 fanId 弱引用风扇：创建时不校验风扇存在，评估时跳过悬空引用。

use crate::AppState;
use crate::utils::response::{
    not_found_error, ok, outcome_to_dto, schedule_to_dto, storage_error,
};
use crate::utils::validation::{
    json_body, normalize_optional, optional_json_body, parse_action, parse_instant,
};
use api_contract::{
    CreateScheduleRequest, DueActionDto, EvaluateRequest, EvaluationDto, ScheduleDto,
    ScheduleQuery, UpdateScheduleRequest,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::Response,
};
use domain::{ScheduleDraft, SchedulePatch};
use fan_scheduler::DueAction;
use fan_telemetry::{record_schedule_created, record_schedule_deleted, record_schedule_updated};

#[derive(serde::Deserialize)]
pub struct SchedulePath {
    schedule_id: String,
}

/// 列出排程
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Response {
    let result = match normalize_optional(query.fan_id) {
        Some(fan_id) => state.schedule_store.by_fan_id(&fan_id),
        None => state.schedule_store.list(),
    };
    match result {
        Ok(items) => {
            let data: Vec<ScheduleDto> = items.into_iter().map(schedule_to_dto).collect();
            ok(data)
        }
        Err(err) => storage_error(err),
    }
}

/// 创建排程
///
/// 校验失败（空星期、set-speed 缺转速等）返回 400，不分配 id。
pub async fn create_schedule(
    State(state): State<AppState>,
    payload: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let action = match parse_action(&req.action) {
        Ok(action) => action,
        Err(response) => return response,
    };
    let draft = ScheduleDraft {
        fan_id: req.fan_id,
        time: req.time,
        days_of_week: req.days_of_week,
        enabled: req.enabled,
        action,
        speed_value: req.speed_value,
    };
    match state.schedule_store.create(draft) {
        Ok(schedule) => {
            record_schedule_created();
            ok(schedule_to_dto(schedule))
        }
        Err(err) => storage_error(err),
    }
}

/// 获取排程详情
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(path): Path<SchedulePath>,
) -> Response {
    match state.schedule_store.find(&path.schedule_id) {
        Ok(Some(schedule)) => ok(schedule_to_dto(schedule)),
        Ok(None) => not_found_error(format!("schedule not found: {}", path.schedule_id)),
        Err(err) => storage_error(err),
    }
}

/// 合并更新排程
///
/// 未给出的字段沿用原值；合并结果校验失败时原记录保持不变。
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(path): Path<SchedulePath>,
    payload: Result<Json<UpdateScheduleRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let action = match req.action.as_deref().map(parse_action).transpose() {
        Ok(action) => action,
        Err(response) => return response,
    };
    let patch = SchedulePatch {
        fan_id: req.fan_id,
        time: req.time,
        days_of_week: req.days_of_week,
        enabled: req.enabled,
        action,
        speed_value: req.speed_value,
    };
    match state.schedule_store.update(&path.schedule_id, patch) {
        Ok(schedule) => {
            record_schedule_updated();
            ok(schedule_to_dto(schedule))
        }
        Err(err) => storage_error(err),
    }
}

/// 删除排程
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(path): Path<SchedulePath>,
) -> Response {
    match state.schedule_store.delete(&path.schedule_id) {
        Ok(()) => {
            record_schedule_deleted();
            ok(serde_json::json!({ "deleted": path.schedule_id }))
        }
        Err(err) => storage_error(err),
    }
}

/// 切换启用状态
pub async fn toggle_schedule(
    State(state): State<AppState>,
    Path(path): Path<SchedulePath>,
) -> Response {
    match state.schedule_store.toggle_enabled(&path.schedule_id) {
        Ok(schedule) => {
            record_schedule_updated();
            ok(schedule_to_dto(schedule))
        }
        Err(err) => storage_error(err),
    }
}

/// 评估到期排程
///
/// `apply=false` 时只返回意图；`apply=true` 时逐条经控制服务执行并附带结果。
/// 请求体可省略，等同于 `{}`（当前时刻、只评估）。
pub async fn evaluate_schedules(State(state): State<AppState>, body: Bytes) -> Response {
    let req: EvaluateRequest = match optional_json_body(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let at = match parse_instant(req.at) {
        Ok(at) => at,
        Err(response) => return response,
    };
    let actions = if req.apply {
        match state.evaluator.run(&at) {
            Ok(outcomes) => outcomes
                .into_iter()
                .map(|outcome| {
                    let fan_id = outcome.action.fan_id.clone();
                    let mut dto = due_action_to_dto(outcome.action);
                    dto.outcome = Some(outcome_to_dto(fan_id, outcome.result));
                    dto
                })
                .collect(),
            Err(err) => return storage_error(err),
        }
    } else {
        match state.evaluator.evaluate(&at) {
            Ok(actions) => actions.into_iter().map(due_action_to_dto).collect(),
            Err(err) => return storage_error(err),
        }
    };
    ok(EvaluationDto {
        at: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        applied: req.apply,
        actions,
    })
}

fn due_action_to_dto(action: DueAction) -> DueActionDto {
    DueActionDto {
        schedule_id: action.schedule_id,
        fan_id: action.fan_id,
        action: action.action.kind().as_str().to_string(),
        speed_value: action.action.speed_value(),
        action_label: action.action.to_string(),
        outcome: None,
    }
}
