//! 风扇控制 HTTP API 与请求追踪 ID。

mod handlers;
mod routes;
mod utils;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use fan_config::AppConfig;
use fan_control::FanControlService;
use fan_scheduler::ScheduleEvaluator;
use fan_storage::{FanRegistry, InMemoryFanRegistry, InMemoryScheduleStore, ScheduleStore};
use fan_telemetry::{init_tracing, new_request_ids};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

#[derive(Clone)]
pub struct AppState {
    pub fan_registry: Arc<dyn FanRegistry>,
    pub schedule_store: Arc<dyn ScheduleStore>,
    pub control: FanControlService,
    pub evaluator: ScheduleEvaluator,
    /// 每 kWh 电价
    pub tariff_per_kwh: f64,
}

impl AppState {
    pub fn new(
        fan_registry: Arc<dyn FanRegistry>,
        schedule_store: Arc<dyn ScheduleStore>,
        tariff_per_kwh: f64,
    ) -> Self {
        let control = FanControlService::new(fan_registry.clone());
        let evaluator = ScheduleEvaluator::new(schedule_store.clone(), control.clone());
        Self {
            fan_registry,
            schedule_store,
            control,
            evaluator,
            tariff_per_kwh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let (fan_registry, schedule_store): (Arc<dyn FanRegistry>, Arc<dyn ScheduleStore>) =
        if config.seed_demo {
            (
                Arc::new(InMemoryFanRegistry::with_demo_fans()),
                Arc::new(InMemoryScheduleStore::with_demo_schedules()?),
            )
        } else {
            (
                Arc::new(InMemoryFanRegistry::new()),
                Arc::new(InMemoryScheduleStore::new()),
            )
        };
    let state = AppState::new(fan_registry, schedule_store, config.energy_tariff_per_kwh);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(
        target: "fan.api",
        addr = %config.http_addr,
        seed_demo = config.seed_demo,
        "server_started"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// 组装路由：同一组接口同时挂在 `/` 与 `/api` 下。
fn build_app(state: AppState) -> Router {
    let api = routes::create_api_router();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
