pub mod strategy;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ErrorModel;
pub use strategy::ResponseStrategy;

use crate::schema::ObjectSchema;

/// Final status code and body for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseModel {
    pub status: StatusCode,
    pub body: Value,
}

impl ResponseModel {
    /// Failure envelope built without schema validation.
    pub fn from_error(error: &ErrorModel) -> Self {
        Self {
            status: error.status(),
            body: failure_body(error),
        }
    }
}

impl IntoResponse for ResponseModel {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NO_CONTENT {
            return self.status.into_response();
        }
        (self.status, Json(self.body)).into_response()
    }
}

fn failure_body(error: &ErrorModel) -> Value {
    json!({
        "success": false,
        "statusCode": error.status().as_u16(),
        "statusMessage": error.status_message(),
        "message": error.message(),
    })
}

#[derive(Debug, Clone)]
pub struct ResponseManager {
    strategy: ResponseStrategy,
}

impl ResponseManager {
    pub fn new(strategy: ResponseStrategy) -> Self {
        Self { strategy }
    }

    pub fn data(schema: ObjectSchema) -> Self {
        Self::new(ResponseStrategy::Data(schema))
    }

    pub fn empty() -> Self {
        Self::new(ResponseStrategy::Empty)
    }

    pub fn strategy(&self) -> &ResponseStrategy {
        &self.strategy
    }

    /// `Ok(None)` stands for a success without a model.
    pub fn validate_response<M: Serialize>(
        &self,
        outcome: Result<Option<M>, ErrorModel>,
    ) -> ResponseModel {
        let (status, candidate) = match self.candidate(outcome) {
            Ok(candidate) => candidate,
            Err(error) => return ResponseModel::from_error(&error),
        };

        match self.strategy.schema().parse(&candidate) {
            Ok(body) => ResponseModel { status, body },
            Err(validation) => {
                let error = ErrorModel::server(Some(&format!("Validation failed: {validation}")));
                ResponseModel::from_error(&error)
            }
        }
    }

    fn candidate<M: Serialize>(
        &self,
        outcome: Result<Option<M>, ErrorModel>,
    ) -> Result<(StatusCode, Value), ErrorModel> {
        let model = match outcome {
            Ok(model) => model,
            Err(error) => return Ok((error.status(), failure_body(&error))),
        };

        let status = self.strategy.success_status();
        let mut body = json!({
            "success": true,
            "statusCode": status.as_u16(),
        });

        if let (ResponseStrategy::Data(_), Some(model)) = (&self.strategy, model) {
            let data = serde_json::to_value(model)
                .map_err(|e| ErrorModel::server(Some(&e.to_string())))?;
            body["data"] = data;
        }

        Ok((status, body))
    }
}
