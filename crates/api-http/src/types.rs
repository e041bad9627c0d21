//! HTTP Request/Response Types
//!
//! Wire shapes of `/api/test` and `/api/health`.

use netprobe_core::domain::{DiagnosticRequest, DiagnosticResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// POST /api/test body
///
/// Absent fields decode as empty strings; only an undecodable body is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestRequest {
    /// `curl`, `ping`, `tracert` or `custom`
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub url: String,
    /// `{url}` template, required for `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

impl From<TestRequest> for DiagnosticRequest {
    fn from(req: TestRequest) -> Self {
        let request = DiagnosticRequest::new(req.command, req.url);
        match req.custom {
            Some(template) => request.with_template(template),
            None => request,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfoDto {
    pub target: String,
    /// RFC3339
    pub timestamp: String,
    pub os: String,
}

/// POST /api/test response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResponse {
    pub success: bool,
    pub command: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration: String,
    pub connection: ConnectionInfoDto,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<DiagnosticResult> for TestResponse {
    fn from(result: DiagnosticResult) -> Self {
        let duration = result.duration_display();
        let timestamp = result.connection.timestamp();

        Self {
            success: result.succeeded,
            command: result.command,
            output: result.raw_output,
            error: result.error_message,
            duration,
            connection: ConnectionInfoDto {
                target: result.connection.target,
                timestamp,
                os: result.connection.host_os,
            },
            metadata: result.metadata,
        }
    }
}

/// GET /api/health response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC3339
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use netprobe_core::domain::ConnectionInfo;
    use std::time::Duration;

    fn sample_result(error: Option<&str>) -> DiagnosticResult {
        let mut metadata = BTreeMap::new();
        metadata.insert("command_type".to_string(), "ping".to_string());
        metadata.insert("execution_time".to_string(), "1.5s".to_string());

        DiagnosticResult {
            succeeded: error.is_none(),
            command: "ping".to_string(),
            kind: None,
            raw_output: "PING example.com".to_string(),
            error_message: error.map(String::from),
            duration: Duration::from_millis(1500),
            connection: ConnectionInfo {
                target: "https://example.com".to_string(),
                started_at: Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap(),
                host_os: "linux".to_string(),
            },
            metadata,
        }
    }

    #[test]
    fn test_request_defaults() {
        let req: TestRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.command, "");
        assert_eq!(req.url, "");
        assert_eq!(req.custom, None);

        let req: DiagnosticRequest = serde_json::from_str::<TestRequest>(
            r#"{"command":"custom","url":"h","custom":"echo {url}"}"#,
        )
        .unwrap()
        .into();
        assert_eq!(req.custom_template(), Some("echo {url}"));
    }

    #[test]
    fn test_response_shape() {
        let response = TestResponse::from(sample_result(None));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["command"], "ping");
        assert_eq!(json["duration"], "1.5s");
        assert_eq!(json["connection"]["target"], "https://example.com");
        assert_eq!(json["connection"]["timestamp"], "2024-03-04T05:06:07Z");
        assert_eq!(json["connection"]["os"], "linux");
        assert_eq!(json["metadata"]["command_type"], "ping");
        // error omitted entirely on success
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_response_error_present_on_failure() {
        let response = TestResponse::from(sample_result(Some("ping error: exit status 2")));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "ping error: exit status 2");
        assert_eq!(json["output"], "PING example.com");
    }
}
