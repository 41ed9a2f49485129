use serde::{Serialize, Serializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use crate::error::ErrorModel;
use crate::users::repo_types::UserRecord;

/// A user as the login flow sees it. Any field may be missing, including the
/// whole user when the lookup found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserModel {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Option<UserRecord>> for UserModel {
    fn from(record: Option<UserRecord>) -> Self {
        let record = record.unwrap_or_default();
        Self {
            id: record.id,
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            password: record.password,
            created_at: record.created_at.map(|raw| normalize_timestamp(&raw)),
            updated_at: record.updated_at.map(|raw| normalize_timestamp(&raw)),
        }
    }
}

impl UserModel {
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                Some(format!("{first} {last}"))
            }
            _ => None,
        }
    }

    pub fn is_valid_user(&self) -> Result<&Self, ErrorModel> {
        if self.id.is_none() {
            return Err(ErrorModel::not_found(Some("User not found")));
        }
        Ok(self)
    }

    // Same not-found kind as an unknown username.
    pub fn has_valid_password(&self, password: &str) -> Result<&Self, ErrorModel> {
        if self.password.as_deref() != Some(password) {
            return Err(ErrorModel::not_found(Some("Incorrect password")));
        }
        Ok(self)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
}

impl Serialize for UserModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        UserView {
            id: self.id,
            username: self.username.as_deref(),
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            password: self.password.as_deref(),
            created_at: self.created_at.as_deref(),
            updated_at: self.updated_at.as_deref(),
            full_name: self.full_name(),
        }
        .serialize(serializer)
    }
}

/// Stored timestamps become RFC 3339 in UTC. SQL `DATETIME` text carries no
/// offset and is read as UTC. Unparseable values are kept verbatim.
fn normalize_timestamp(raw: &str) -> String {
    let sql_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let parsed = PrimitiveDateTime::parse(raw, sql_format)
        .map(PrimitiveDateTime::assume_utc)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339));

    parsed
        .ok()
        .and_then(|at| at.to_offset(UtcOffset::UTC).format(&Rfc3339).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn renato() -> UserModel {
        UserModel::from(Some(UserRecord {
            id: Some(1),
            first_name: Some("Renato".into()),
            last_name: Some("Berrocal".into()),
            password: Some("test123".into()),
            created_at: Some("2025-01-01 00:00:00".into()),
            ..UserRecord::default()
        }))
    }

    #[test]
    fn full_name_needs_both_parts() {
        assert_eq!(renato().full_name().as_deref(), Some("Renato Berrocal"));

        let mut partial = renato();
        partial.last_name = None;
        assert_eq!(partial.full_name(), None);
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        assert_eq!(renato().created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(normalize_timestamp("2025-01-01T05:00:00+05:00"), "2025-01-01T00:00:00Z");
        assert_eq!(normalize_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn missing_user_is_not_found() {
        let err = UserModel::from(None).is_valid_user().unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "User not found");
    }

    #[test]
    fn wrong_password_is_not_found_too() {
        let err = renato().has_valid_password("nope").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Incorrect password");
        assert!(renato().has_valid_password("test123").is_ok());
    }

    #[test]
    fn serializes_camel_case_with_full_name() {
        let value = serde_json::to_value(renato()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "firstName": "Renato",
                "lastName": "Berrocal",
                "password": "test123",
                "createdAt": "2025-01-01T00:00:00Z",
                "fullName": "Renato Berrocal",
            })
        );
    }
}
