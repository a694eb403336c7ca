//! 追踪、请求 ID 与进程内计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
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

/// 进程内计数器。
pub struct TelemetryMetrics {
    controls_applied: AtomicU64,
    controls_rejected: AtomicU64,
    controls_failed: AtomicU64,
    schedules_created: AtomicU64,
    schedules_updated: AtomicU64,
    schedules_deleted: AtomicU64,
    schedule_evaluations: AtomicU64,
    schedule_actions_emitted: AtomicU64,
    schedule_actions_skipped: AtomicU64,
    telemetry_reports: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            controls_applied: AtomicU64::new(0),
            controls_rejected: AtomicU64::new(0),
            controls_failed: AtomicU64::new(0),
            schedules_created: AtomicU64::new(0),
            schedules_updated: AtomicU64::new(0),
            schedules_deleted: AtomicU64::new(0),
            schedule_evaluations: AtomicU64::new(0),
            schedule_actions_emitted: AtomicU64::new(0),
            schedule_actions_skipped: AtomicU64::new(0),
            telemetry_reports: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            controls_applied: self.controls_applied.load(Ordering::Relaxed),
            controls_rejected: self.controls_rejected.load(Ordering::Relaxed),
            controls_failed: self.controls_failed.load(Ordering::Relaxed),
            schedules_created: self.schedules_created.load(Ordering::Relaxed),
            schedules_updated: self.schedules_updated.load(Ordering::Relaxed),
            schedules_deleted: self.schedules_deleted.load(Ordering::Relaxed),
            schedule_evaluations: self.schedule_evaluations.load(Ordering::Relaxed),
            schedule_actions_emitted: self.schedule_actions_emitted.load(Ordering::Relaxed),
            schedule_actions_skipped: self.schedule_actions_skipped.load(Ordering::Relaxed),
            telemetry_reports: self.telemetry_reports.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录控制成功写回次数。
pub fn record_control_applied() {
    metrics().controls_applied.fetch_add(1, Ordering::Relaxed);
}

/// 记录因离线被拒绝的控制次数。
pub fn record_control_rejected() {
    metrics().controls_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录其他失败（风扇不存在、存储错误）。
pub fn record_control_failed() {
    metrics().controls_failed.fetch_add(1, Ordering::Relaxed);
}

pub fn record_schedule_created() {
    metrics().schedules_created.fetch_add(1, Ordering::Relaxed);
}

pub fn record_schedule_updated() {
    metrics().schedules_updated.fetch_add(1, Ordering::Relaxed);
}

pub fn record_schedule_deleted() {
    metrics().schedules_deleted.fetch_add(1, Ordering::Relaxed);
}

/// 记录排程评估次数。
pub fn record_schedule_evaluation() {
    metrics()
        .schedule_evaluations
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录到期排程产生的控制意图数量。
pub fn record_schedule_actions_emitted(count: u64) {
    metrics()
        .schedule_actions_emitted
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录因风扇不存在而跳过的到期排程。
pub fn record_schedule_action_skipped() {
    metrics()
        .schedule_actions_skipped
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录设备遥测上报次数。
pub fn record_telemetry_report() {
    metrics().telemetry_reports.fetch_add(1, Ordering::Relaxed);
}
