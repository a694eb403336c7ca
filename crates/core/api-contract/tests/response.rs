use api_contract::{ApiError, ApiResponse, ControlOutcomeDto};

#[test]
fn api_response_success() {
    let response = ApiResponse::success("ok");
    assert!(response.success);
    assert!(response.data.is_some());
    assert!(response.error.is_none());
}

#[test]
fn api_response_error() {
    let response = ApiResponse::<()>::error("CONTROL.REJECTED", "fan offline");
    assert!(!response.success);
    assert!(response.data.is_none());
    let value = serde_json::to_value(&response).expect("serialize");
    assert_eq!(value["error"]["code"], "CONTROL.REJECTED");
    assert_eq!(value["data"], serde_json::Value::Null);
}

#[test]
fn failed_outcome_carries_error_only() {
    let outcome = ControlOutcomeDto {
        fan_id: "fan-005".to_string(),
        success: false,
        fan: None,
        error: Some(ApiError::new("CONTROL.REJECTED", "fan offline")),
    };
    let value = serde_json::to_value(outcome).expect("serialize");
    assert_eq!(value["fanId"], "fan-005");
    assert!(value.get("fan").is_none());
    assert_eq!(value["error"]["message"], "fan offline");
}
