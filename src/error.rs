use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    /// Prefixes the message with the operation that failed, keeping the code.
    pub fn context(self, operation: &str) -> Self {
        Self {
            code: self.code,
            message: format!("{}: {}", operation, self.message),
        }
    }

    pub fn is_invalid_transition_error(&self) -> bool {
        self.code == 100
    }

    pub fn is_unknown_action_error(&self) -> bool {
        self.code == 102
    }

    pub fn is_deadline_exceeded_error(&self) -> bool {
        self.code == 103
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 104
    }

    pub fn is_upstream_error(&self) -> bool {
        self.code == 4
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if (1..=99).contains(&self.code) {
            tracing::error!("internal error: {}", self);
        }

        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            103 => (StatusCode::GATEWAY_TIMEOUT, self.message.as_str()),
            104 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_transition_error() -> Error {
    Error {
        code: 100,
        message: "invalid trip state transition".into(),
    }
}

pub fn unknown_action_error(action: &str) -> Error {
    Error {
        code: 102,
        message: format!("unknown action {:?}", action),
    }
}

pub fn deadline_exceeded_error() -> Error {
    Error {
        code: 103,
        message: "bid evaluation timeout".into(),
    }
}

pub fn evaluation_canceled_error() -> Error {
    Error {
        code: 103,
        message: "bid evaluation canceled".into(),
    }
}

pub fn not_found_error(what: &str) -> Error {
    Error {
        code: 104,
        message: format!("{} not found", what),
    }
}

pub fn config_error<T: Display>(key: &str, err: T) -> Error {
    Error {
        code: 1,
        message: format!("parse {}: {}", key, err),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!("database error: {:?}", err);

    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn upstream_error<T: Display>(err: T) -> Error {
    Error {
        code: 4,
        message: err.to_string(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

#[test]
fn context_keeps_code() {
    let err = upstream_error("connection reset").context("save accepted bid");

    assert!(err.is_upstream_error());
    assert_eq!(err.message, "save accepted bid: connection reset");
}

#[tokio::test]
async fn internal_errors_hide_their_message() {
    let response = upstream_error("connection refused to 10.0.0.7").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    use axum::body::HttpBody;

    let body = response.into_body().data().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], 4);
    assert_eq!(body["error"], "Internal Server Error");

    let response = not_found_error("trip").into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn cancellation_reports_as_deadline() {
    assert!(evaluation_canceled_error().is_deadline_exceeded_error());
    assert!(!unknown_action_error("fly").is_invalid_transition_error());
}
