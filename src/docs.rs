use axum::{response::Html, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::state::AppState;
use crate::users::dto::{LoginUserBody, LoginUserOkResponse, LoginUserOutput};

pub const SPEC_PATH: &str = "/docs/spec.json";

/// Failure envelope shared by every route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Indicates the request failed.
    #[schema(example = false)]
    pub success: bool,
    /// HTTP status code for the error.
    #[schema(example = 404)]
    pub status_code: u16,
    /// Textual description of the status.
    #[schema(example = "Not Found")]
    pub status_message: String,
    /// Raw error message intended for the developer.
    #[schema(example = "User not found")]
    pub message: String,
}

struct BearerAddon;

impl Modify for BearerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme("bearer", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAddon),
    info(
        title = "User login service - OpenAPI Spec",
        version = "0.0.1",
        description = "Login endpoint behind a controller, use case, repository and data client stack."
    ),
    paths(crate::users::handlers::login_user_v1),
    components(schemas(LoginUserBody, LoginUserOutput, LoginUserOkResponse, ErrorResponse)),
    tags((name = "users", description = "Operations related to users"))
)]
pub struct ApiDoc;

const VIEWER: &str = r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>User login service - Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
    <script>
      window.onload = () => {
        window.ui = SwaggerUIBundle({ url: "/docs/spec.json", dom_id: "#swagger-ui" });
      };
    </script>
  </body>
</html>
"##;

pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/docs", get(|| async { Html(VIEWER) }))
        .route(SPEC_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
