use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::schema::{Kind, ObjectSchema, ValidationError};

/// Request body for `POST /v1/users/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginUserBody {
    /// Username of the user
    #[validate(required(message = "Required"))]
    #[schema(value_type = String, required = true, example = "renarux")]
    pub username: Option<String>,
    /// Password of the user
    #[validate(required(message = "Required"))]
    #[schema(value_type = String, required = true, example = "test123")]
    pub password: Option<String>,
}

/// A validated login body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginUserBody> for Credentials {
    type Error = ValidationError;

    fn try_from(body: LoginUserBody) -> Result<Self, Self::Error> {
        body.validate()?;
        match (body.username, body.password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(ValidationError::at_root("Required")),
        }
    }
}

/// Public view of a logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserOutput {
    /// Unique ID of the user
    #[schema(example = 1)]
    pub id: i64,
    /// Full name of the user
    #[schema(example = "Renato Berrocal")]
    pub full_name: String,
    /// Creation date of the user, RFC 3339 in UTC
    #[schema(example = "2025-01-01T00:00:00Z")]
    pub created_at: String,
}

impl LoginUserOutput {
    pub fn schema() -> ObjectSchema {
        ObjectSchema::strict()
            .field("id", Kind::PositiveInt)
            .field("fullName", Kind::String)
            .field("createdAt", Kind::String)
    }
}

/// Success envelope of the login route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserOkResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 200)]
    pub status_code: u16,
    pub data: LoginUserOutput,
}
