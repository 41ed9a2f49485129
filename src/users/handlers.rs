use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRef, State},
    routing::post,
    Router,
};
use tracing::instrument;

use crate::{
    error::ErrorModel,
    response::{ResponseManager, ResponseModel},
    schema::ValidationError,
    state::AppState,
    users::{
        dto::{Credentials, LoginUserBody, LoginUserOutput},
        use_case::LoginUserUseCase,
    },
};

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/v1/users/login", post(login_user_v1))
}

/// Parses the body, runs the login and answers with a validated envelope.
pub struct LoginUserController {
    use_case: Arc<dyn LoginUserUseCase>,
    manager: ResponseManager,
}

impl LoginUserController {
    pub fn new(use_case: Arc<dyn LoginUserUseCase>) -> Self {
        Self {
            use_case,
            manager: ResponseManager::data(LoginUserOutput::schema()),
        }
    }

    pub async fn handle(&self, raw: &[u8]) -> ResponseModel {
        let outcome = match parse_body(raw) {
            Ok(body) => self.use_case.login(body).await.map(Some),
            Err(error) => Err(error),
        };
        self.manager.validate_response(outcome)
    }
}

impl FromRef<AppState> for Arc<LoginUserController> {
    fn from_ref(state: &AppState) -> Self {
        state.login_user.clone()
    }
}

fn parse_body(raw: &[u8]) -> Result<Credentials, ErrorModel> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(ErrorModel::from_validation(&ValidationError::at_root("Required")));
    }
    let body: LoginUserBody = serde_json::from_slice(raw).map_err(|e| {
        let message = if e.is_data() {
            e.to_string()
        } else {
            format!("Invalid JSON: {e}")
        };
        ErrorModel::from_validation(&ValidationError::at_root(message))
    })?;
    Credentials::try_from(body).map_err(|e| ErrorModel::from_validation(&e))
}

/// Login a user
#[utoipa::path(
    post,
    path = "/v1/users/login",
    tag = "users",
    request_body = LoginUserBody,
    responses(
        (status = 200, description = "Credentials match", body = crate::users::dto::LoginUserOkResponse),
        (status = 400, description = "Body failed validation", body = crate::docs::ErrorResponse),
        (status = 404, description = "Unknown username or wrong password", body = crate::docs::ErrorResponse),
        (status = 500, description = "Unexpected failure", body = crate::docs::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn login_user_v1(
    State(controller): State<Arc<LoginUserController>>,
    body: Bytes,
) -> ResponseModel {
    controller.handle(&body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{dto::LoginUserOkResponse, repo::FindUserRepositoryMock, use_case::LoginUser};
    use axum::http::StatusCode;
    use serde_json::json;

    fn controller() -> LoginUserController {
        LoginUserController::new(Arc::new(LoginUser::new(Arc::new(FindUserRepositoryMock))))
    }

    #[tokio::test]
    async fn correct_credentials_answer_200_with_projected_data() {
        let response = controller()
            .handle(br#"{"username":"renarux","password":"test123"}"#)
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            json!({
                "success": true,
                "statusCode": 200,
                "data": {
                    "id": 1,
                    "fullName": "Renato Berrocal",
                    "createdAt": "2025-01-01T00:00:00Z",
                },
            })
        );
        let typed: LoginUserOkResponse = serde_json::from_value(response.body).unwrap();
        assert_eq!(typed.data.full_name, "Renato Berrocal");
    }

    #[tokio::test]
    async fn wrong_password_answers_404() {
        let response = controller()
            .handle(br#"{"username":"renarux","password":"nope"}"#)
            .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(
            response.body,
            json!({
                "success": false,
                "statusCode": 404,
                "statusMessage": "Not Found",
                "message": "Incorrect password",
            })
        );
    }

    #[tokio::test]
    async fn missing_password_answers_400_naming_the_field() {
        let response = controller().handle(br#"{"username":"renarux"}"#).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["statusMessage"], "Bad Request");
        assert_eq!(
            response.body["message"],
            "Validation failed: (password: Required)"
        );
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected() {
        let response = controller()
            .handle(br#"{"username":"renarux","password":"test123","role":"admin"}"#)
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let message = response.body["message"].as_str().unwrap();
        assert!(message.starts_with("Validation failed: (root: unknown field `role`"), "{message}");
    }

    #[tokio::test]
    async fn null_fields_count_as_missing() {
        let response = controller()
            .handle(br#"{"username":null,"password":null}"#)
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body["message"],
            "Validation failed: (password: Required), (username: Required)"
        );
    }

    #[tokio::test]
    async fn wrong_shapes_answer_400() {
        let response = controller()
            .handle(br#"{"username":7,"password":"test123"}"#)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["message"]
            .as_str()
            .unwrap()
            .contains("invalid type: integer `7`, expected a string"));

        let response = controller().handle(b"null").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("Validation failed: (root: invalid type: null"));
    }

    #[tokio::test]
    async fn malformed_and_empty_bodies_answer_400() {
        let response = controller().handle(b"{not json").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("Validation failed: (root: Invalid JSON"));

        let response = controller().handle(b"").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["message"], "Validation failed: (root: Required)");
    }
}
