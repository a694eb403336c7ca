//! 进程内计数器快照。
//!
//! - GET /metrics

use crate::utils::response::ok;
use api_contract::MetricsDto;
use axum::response::Response;
use fan_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    ok(MetricsDto {
        controls_applied: snapshot.controls_applied,
        controls_rejected: snapshot.controls_rejected,
        controls_failed: snapshot.controls_failed,
        schedules_created: snapshot.schedules_created,
        schedules_updated: snapshot.schedules_updated,
        schedules_deleted: snapshot.schedules_deleted,
        schedule_evaluations: snapshot.schedule_evaluations,
        schedule_actions_emitted: snapshot.schedule_actions_emitted,
        schedule_actions_skipped: snapshot.schedule_actions_skipped,
        telemetry_reports: snapshot.telemetry_reports,
    })
}
