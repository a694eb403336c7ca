//! 应用运行配置加载。

use domain::DEFAULT_TARIFF_PER_KWH;
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 启动时载入演示风扇与排程
    pub seed_demo: bool,
    pub energy_tariff_per_kwh: f64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("FAN_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let seed_demo = read_bool_with_default("FAN_SEED_DEMO", true);
        let energy_tariff_per_kwh =
            read_f64_with_default("FAN_ENERGY_TARIFF_PER_KWH", DEFAULT_TARIFF_PER_KWH)?;
        if !energy_tariff_per_kwh.is_finite() || energy_tariff_per_kwh < 0.0 {
            return Err(ConfigError::Invalid(
                "FAN_ENERGY_TARIFF_PER_KWH".to_string(),
                energy_tariff_per_kwh.to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            seed_demo,
            energy_tariff_per_kwh,
        })
    }
}

fn read_f64_with_default(key: &str, default: f64) -> Result<f64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(default),
    };
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
