//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 风扇：/fans, /fans/{id}, /fans/{id}/control, /fans/control, /fans/{id}/telemetry
//! - 房间与能耗：/rooms, /energy
//! - 排程：/schedules/*，以及 /schedules/evaluate
//! - 计数器：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 返回不带前缀的 Router，由调用方同时挂载到 `/` 与 `/api`
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/fans", get(list_fans))
        .route("/fans/control", post(control_fans))
        .route("/fans/:fan_id", get(get_fan))
        .route("/fans/:fan_id/control", post(control_fan))
        .route("/fans/:fan_id/telemetry", post(report_telemetry))
        .route("/rooms", get(list_rooms))
        .route("/energy", get(get_energy))
        .route("/metrics", get(get_metrics))
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/evaluate", post(evaluate_schedules))
        .route(
            "/schedules/:schedule_id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
        .route("/schedules/:schedule_id/toggle", post(toggle_schedule))
}
