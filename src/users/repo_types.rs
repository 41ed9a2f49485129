use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `Users` table as returned by a query. Columns the query does not
/// select stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct UserRecord {
    #[sqlx(default)]
    pub id: Option<i64>,
    #[sqlx(default)]
    pub username: Option<String>,
    #[sqlx(default)]
    pub first_name: Option<String>,
    #[sqlx(default)]
    pub last_name: Option<String>,
    #[sqlx(default)]
    pub password: Option<String>, // plaintext, compared as-is
    #[sqlx(default)]
    pub created_at: Option<String>,
    #[sqlx(default)]
    pub updated_at: Option<String>,
}
