use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://www.deepl.com/en/translator"})),
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Page.navigate"));
    assert!(json.contains("deepl.com"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_request_with_session() {
    let req = CdpRequest {
        id: 7,
        method: "Runtime.evaluate".to_string(),
        params: None,
        session_id: Some("S1".to_string()),
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["sessionId"], "S1");
    assert!(json.get("params").is_none());
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert!(resp.result.is_some());
    assert!(resp.method.is_none());
}

#[test]
fn test_browser_version_deserialize() {
    let json = r#"{
        "Browser": "HeadlessChrome/120.0.6099.109",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "V8-Version": "12.0.267.10",
        "WebKit-Version": "537.36",
        "webSocketDebuggerUrl": "ws://127.0.0.1:40123/devtools/browser/abc"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert!(version.browser.starts_with("HeadlessChrome"));
    assert_eq!(
        version.web_socket_debugger_url,
        "ws://127.0.0.1:40123/devtools/browser/abc"
    );
}

#[test]
fn test_request_paused_deserialize() {
    let json = r#"{
        "requestId": "interception-job-1.0",
        "request": {"url": "https://static.deepl.com/img/logo.svg", "method": "GET", "headers": {}},
        "frameId": "F1",
        "resourceType": "Image"
    }"#;
    let event: RequestPausedEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.request_id, "interception-job-1.0");
    assert_eq!(event.resource_type, ResourceType::Image);
    assert_eq!(event.request.method, "GET");
}

#[test]
fn test_unknown_resource_type() {
    let rt: ResourceType = serde_json::from_str("\"SomethingNew\"").unwrap();
    assert_eq!(rt, ResourceType::Unknown);
    let rt: ResourceType = serde_json::from_str("\"XHR\"").unwrap();
    assert_eq!(rt, ResourceType::XHR);
}

#[test]
fn test_exception_message_prefers_description() {
    let json = r#"{
        "exceptionId": 1,
        "text": "Uncaught",
        "lineNumber": 0,
        "columnNumber": 10,
        "exception": {"type": "object", "description": "TypeError: x is null"}
    }"#;
    let details: ExceptionDetails = serde_json::from_str(json).unwrap();
    assert_eq!(details.message(), "TypeError: x is null");
}

#[test]
fn test_error_reason_serialize() {
    let json = serde_json::to_string(&ErrorReason::BlockedByClient).unwrap();
    assert_eq!(json, "\"BlockedByClient\"");
}
