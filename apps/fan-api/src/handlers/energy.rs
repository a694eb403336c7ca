//! 能耗汇总（GET /energy），附逐台明细。

use crate::AppState;
use crate::utils::response::{fan_energy_to_dto, ok, storage_error};
use api_contract::EnergyReportDto;
use axum::{extract::State, response::Response};
use domain::EnergyReport;

pub async fn get_energy(State(state): State<AppState>) -> Response {
    let fans = match state.fan_registry.list_fans() {
        Ok(fans) => fans,
        Err(err) => return storage_error(err),
    };
    let online_fans = match state.fan_registry.online_count() {
        Ok(count) => count,
        Err(err) => return storage_error(err),
    };
    let report = EnergyReport::from_fans(&fans, state.tariff_per_kwh);
    ok(EnergyReportDto {
        total_fans: fans.len(),
        online_fans,
        active_fans: report.active_fans,
        total_power_w: report.total_power_w,
        average_power_per_active_fan_w: report.average_power_per_active_fan_w,
        daily_kwh: report.daily_kwh,
        monthly_kwh: report.monthly_kwh,
        tariff_per_kwh: state.tariff_per_kwh,
        estimated_monthly_cost: report.estimated_monthly_cost,
        fans: report.fans.into_iter().map(fan_energy_to_dto).collect(),
    })
}
