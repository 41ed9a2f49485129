use std::any::Any;
use std::panic::Location;

use axum::http::StatusCode;
use tracing::error;

use crate::schema::ValidationError;

pub const DEFAULT_MESSAGE: &str = "Custom handled error";
pub const UNKNOWN_MESSAGE: &str = "An unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ErrorModel {
    status: StatusCode,
    message: String,
}

impl ErrorModel {
    #[track_caller]
    pub fn new(status: StatusCode, message: Option<&str>) -> Self {
        let model = Self {
            status,
            message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
        };
        model.log(Location::caller());
        model
    }

    fn log(&self, caller: &Location<'_>) {
        error!(
            status_code = self.status.as_u16(),
            message = %self.message,
            caller_line = %caller,
            "ErrorModel catched error"
        );
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Reason phrase sent as `statusMessage`.
    pub fn status_message(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    #[track_caller]
    pub fn bad_request(message: Option<&str>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[track_caller]
    pub fn unauthorized(message: Option<&str>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    #[track_caller]
    pub fn forbidden(message: Option<&str>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    #[track_caller]
    pub fn not_found(message: Option<&str>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[track_caller]
    pub fn conflict(message: Option<&str>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    #[track_caller]
    pub fn unprocessable_entity(message: Option<&str>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    #[track_caller]
    pub fn locked(message: Option<&str>) -> Self {
        Self::new(StatusCode::LOCKED, message)
    }

    #[track_caller]
    pub fn server(message: Option<&str>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Classify any error. Existing models pass through untouched.
    #[track_caller]
    pub fn from_error(error: anyhow::Error) -> Self {
        let error = match error.downcast::<ErrorModel>() {
            Ok(model) => return model,
            Err(error) => error,
        };
        match error.downcast::<ValidationError>() {
            Ok(validation) => Self::from_validation(&validation),
            Err(other) => Self::server(Some(&format!("{other:#}"))),
        }
    }

    #[track_caller]
    pub fn from_validation(error: &ValidationError) -> Self {
        error!(issues = ?error.issues, "Validation failed");
        Self::bad_request(Some(&format!("Validation failed: {error}")))
    }

    /// A panic payload carries no error value, only whatever was passed to `panic!`.
    #[track_caller]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        error!(%detail, "panic caught while handling request");
        Self::server(Some(UNKNOWN_MESSAGE))
    }
}
