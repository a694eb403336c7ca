//! 输入验证辅助函数
//!
//! - normalize_optional：可选字段去空格，空串视为未提供
//! - parse_fan_filter：查询/请求体中的筛选条件
//! - parse_action：排程动作字符串
//! - parse_instant：评估时刻（本地墙钟）
//! - json_body / optional_json_body：请求体解析，失败同样走统一错误信封
//!
//! 失败统一返回 bad_request_error 响应

use crate::utils::response::bad_request_error;
use axum::{Json, extract::rejection::JsonRejection, response::Response};
use chrono::NaiveDateTime;
use domain::{ActionKind, FanFilter, FanStatus, PowerState};
use serde::de::DeserializeOwned;

const INSTANT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// 可选字段去空格；空串视为未提供
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 组装风扇筛选条件
pub fn parse_fan_filter(
    room: Option<String>,
    status: Option<String>,
    power: Option<String>,
) -> Result<FanFilter, Response> {
    let status = match normalize_optional(status) {
        Some(value) => Some(
            value
                .parse::<FanStatus>()
                .map_err(|err| bad_request_error(err.to_string()))?,
        ),
        None => None,
    };
    let power = match normalize_optional(power) {
        Some(value) => Some(
            value
                .parse::<PowerState>()
                .map_err(|err| bad_request_error(err.to_string()))?,
        ),
        None => None,
    };
    Ok(FanFilter {
        room: normalize_optional(room),
        status,
        power,
    })
}

/// 解析排程动作
pub fn parse_action(value: &str) -> Result<ActionKind, Response> {
    value
        .parse::<ActionKind>()
        .map_err(|err| bad_request_error(err.to_string()))
}

/// 解析评估时刻，缺省取服务器本地当前时间
pub fn parse_instant(value: Option<String>) -> Result<NaiveDateTime, Response> {
    let value = match normalize_optional(value) {
        Some(value) => value,
        None => return Ok(chrono::Local::now().naive_local()),
    };
    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .ok_or_else(|| bad_request_error(format!("invalid instant: {value}")))
}

/// 解析 JSON 请求体；缺字段、类型不符、缺少 Content-Type 等均返回 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| bad_request_error(rejection.body_text()))
}

/// 解析可省略的 JSON 请求体；空体视为全部字段取默认值
pub fn optional_json_body<T>(body: &[u8]) -> Result<T, Response>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| bad_request_error(format!("invalid JSON body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    #[test]
    fn instant_accepts_minutes_and_seconds() {
        let Ok(at) = parse_instant(Some("2024-01-08T07:00".to_string())) else {
            panic!("minute precision should parse");
        };
        assert_eq!(at.weekday(), Weekday::Mon);
        assert_eq!((at.hour(), at.minute()), (7, 0));

        let Ok(at) = parse_instant(Some("2024-01-13T18:30:59".to_string())) else {
            panic!("second precision should parse");
        };
        assert_eq!(at.second(), 59);

        assert!(parse_instant(Some("07:00".to_string())).is_err());
    }

    #[test]
    fn blank_filters_are_ignored() {
        let Ok(filter) = parse_fan_filter(Some("  ".to_string()), None, Some("on".to_string()))
        else {
            panic!("filter should parse");
        };
        assert_eq!(filter.room, None);
        assert_eq!(filter.power, Some(PowerState::On));
        assert!(parse_fan_filter(None, Some("asleep".to_string()), None).is_err());
    }

    #[test]
    fn empty_optional_body_uses_defaults() {
        let Ok(req) = optional_json_body::<api_contract::EvaluateRequest>(b"  ") else {
            panic!("empty body should default");
        };
        assert!(req.at.is_none());
        assert!(!req.apply);
        assert!(optional_json_body::<api_contract::EvaluateRequest>(b"{\"apply\":1}").is_err());
    }
}
