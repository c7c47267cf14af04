//! Response vocabulary shared by every branch of the write pipeline

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::transport::DispatchOutcome;

/// Error codes, serialized as the numeric `type` of the REST error object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnauthorizedUser,
    InvalidJson,
    NotFound,
    InvalidValue,
}

impl ErrorCode {
    /// Numeric code on the wire
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::UnauthorizedUser => 1,
            Self::InvalidJson => 2,
            Self::NotFound => 3,
            Self::InvalidValue => 7,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// A structured API error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub code: ErrorCode,
    /// Normalized resource path the error refers to
    #[serde(rename = "address")]
    pub pointer: String,
    pub description: String,
}

impl ApiError {
    /// Body is not a JSON object
    #[must_use]
    pub fn invalid_json(id: &str) -> Self {
        Self {
            code: ErrorCode::InvalidJson,
            pointer: resource_path(id),
            description: "body contains invalid JSON".to_string(),
        }
    }

    /// A parameter is missing or out of range
    #[must_use]
    pub fn invalid_value(id: &str, description: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidValue,
            pointer: resource_path(id),
            description: description.into(),
        }
    }

    /// No device matches the path id
    #[must_use]
    pub fn not_found(id: &str) -> Self {
        let pointer = resource_path(id);
        Self {
            code: ErrorCode::NotFound,
            description: format!("resource, {pointer}, not available"),
            pointer,
        }
    }

    /// Unknown API key
    #[must_use]
    pub fn unauthorized(path: &str) -> Self {
        Self {
            code: ErrorCode::UnauthorizedUser,
            pointer: path.to_string(),
            description: "unauthorized user".to_string(),
        }
    }
}

fn resource_path(id: &str) -> String {
    format!("/attributes/{id}")
}

/// Status reported when the pipeline ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    /// The transport accepted the command for asynchronous transmission
    Success,
    /// The transport refused the command
    Failure,
}

/// One entry of a response list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseItem {
    Error { error: ApiError },
    Status(WriteStatus),
}

/// HTTP status used for `InvalidValue` errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidValueStatus {
    /// 404, matching existing REST clients
    #[default]
    NotFound,
    /// 400
    BadRequest,
}

impl InvalidValueStatus {
    /// Parse the configuration spelling (`not_found` / `404`, `bad_request` / `400`)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_found" | "404" => Some(Self::NotFound),
            "bad_request" | "400" => Some(Self::BadRequest),
            _ => None,
        }
    }

    const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
        }
    }
}

impl<'de> Deserialize<'de> for InvalidValueStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u16),
            Name(String),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Code(code) => code.to_string(),
            Raw::Name(name) => name,
        };
        Self::parse(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "unknown invalid_value_status `{raw}`, expected not_found, bad_request, 404 or 400"
            ))
        })
    }
}

/// Formatting choices for pipeline responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsePolicy {
    pub invalid_value_status: InvalidValueStatus,
}

impl ResponsePolicy {
    /// HTTP status for an error code
    #[must_use]
    pub const fn status_for(&self, code: ErrorCode) -> StatusCode {
        match code {
            ErrorCode::UnauthorizedUser => StatusCode::FORBIDDEN,
            ErrorCode::InvalidJson => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidValue => self.invalid_value_status.status(),
        }
    }
}

/// Final response of a write request: a status plus a result list
///
/// A completed pipeline is always 200. Whether the transport accepted the
/// command is carried in the body (`"success"` / `"failure"`), and even
/// `"success"` only means the command was queued locally, not that the
/// device applied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResponse {
    pub status: StatusCode,
    pub items: Vec<ResponseItem>,
}

impl WriteResponse {
    /// Map the terminal pipeline result to a response
    #[must_use]
    pub fn format(result: Result<DispatchOutcome, ApiError>, policy: &ResponsePolicy) -> Self {
        match result {
            Ok(outcome) => Self::completed(outcome),
            Err(error) => Self::error(error, policy),
        }
    }

    /// Pipeline ran to the transport
    #[must_use]
    pub fn completed(outcome: DispatchOutcome) -> Self {
        let status = if outcome.is_accepted() {
            WriteStatus::Success
        } else {
            WriteStatus::Failure
        };
        Self {
            status: StatusCode::OK,
            items: vec![ResponseItem::Status(status)],
        }
    }

    /// Pipeline stopped at `error`
    #[must_use]
    pub fn error(error: ApiError, policy: &ResponsePolicy) -> Self {
        Self {
            status: policy.status_for(error.code),
            items: vec![ResponseItem::Error { error }],
        }
    }

    /// The error carried by this response, if any
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        self.items.iter().find_map(|item| match item {
            ResponseItem::Error { error } => Some(error),
            ResponseItem::Status(_) => None,
        })
    }

    /// The completion status carried by this response, if any
    #[must_use]
    pub fn write_status(&self) -> Option<WriteStatus> {
        self.items.iter().find_map(|item| match item {
            ResponseItem::Status(status) => Some(*status),
            ResponseItem::Error { .. } => None,
        })
    }
}

impl IntoResponse for WriteResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.items)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::RejectReason;

    #[test]
    fn completed_outcomes_are_http_ok() {
        let policy = ResponsePolicy::default();

        let ok = WriteResponse::format(Ok(DispatchOutcome::Accepted), &policy);
        assert_eq!(ok.status, StatusCode::OK);
        assert_eq!(ok.write_status(), Some(WriteStatus::Success));

        let rejected = WriteResponse::format(
            Ok(DispatchOutcome::Rejected(RejectReason::QueueFull)),
            &policy,
        );
        assert_eq!(rejected.status, StatusCode::OK);
        assert_eq!(rejected.write_status(), Some(WriteStatus::Failure));
        assert!(rejected.api_error().is_none());
    }

    #[test]
    fn error_statuses() {
        let policy = ResponsePolicy::default();
        let status = |e: ApiError| WriteResponse::format(Err(e), &policy).status;

        assert_eq!(status(ApiError::invalid_json("1")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ApiError::invalid_value("1", "key is required")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(ApiError::not_found("1")), StatusCode::NOT_FOUND);
        assert_eq!(status(ApiError::unauthorized("/api/x")), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_value_status_is_configurable() {
        let policy = ResponsePolicy {
            invalid_value_status: InvalidValueStatus::BadRequest,
        };
        let rsp = WriteResponse::format(
            Err(ApiError::invalid_value("1", "value is required")),
            &policy,
        );
        assert_eq!(rsp.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_value_status_parse() {
        assert_eq!(
            InvalidValueStatus::parse("bad_request"),
            Some(InvalidValueStatus::BadRequest)
        );
        assert_eq!(InvalidValueStatus::parse(" 404 "), Some(InvalidValueStatus::NotFound));
        assert_eq!(InvalidValueStatus::parse("teapot"), None);
    }

    #[test]
    fn wire_shape() {
        let items =
            WriteResponse::format(Err(ApiError::not_found("9")), &ResponsePolicy::default()).items;
        assert_eq!(
            serde_json::to_value(items).unwrap(),
            json!([{
                "error": {
                    "type": 3,
                    "address": "/attributes/9",
                    "description": "resource, /attributes/9, not available"
                }
            }])
        );

        let items = WriteResponse::completed(DispatchOutcome::Accepted).items;
        assert_eq!(serde_json::to_value(items).unwrap(), json!(["success"]));

        let items =
            WriteResponse::completed(DispatchOutcome::Rejected(RejectReason::LinkDown)).items;
        assert_eq!(serde_json::to_value(items).unwrap(), json!(["failure"]));
    }
}
