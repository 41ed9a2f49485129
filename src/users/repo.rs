use async_trait::async_trait;

use crate::db::DataClient;
use crate::users::repo_types::UserRecord;

#[async_trait]
pub trait FindUserRepository: Send + Sync {
    /// Look a user up by username.
    async fn execute(&self, username: &str) -> anyhow::Result<Option<UserRecord>>;
}

#[derive(Clone)]
pub struct SqlFindUserRepository {
    client: DataClient,
}

impl SqlFindUserRepository {
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FindUserRepository for SqlFindUserRepository {
    async fn execute(&self, username: &str) -> anyhow::Result<Option<UserRecord>> {
        let mut query = self.client.select_users(&[
            "id",
            "firstName",
            "lastName",
            "password",
            // Text on both backends; the Any driver cannot decode DATETIME.
            "CAST(createdAt AS CHAR) AS createdAt",
        ]);
        query.push(" WHERE username = ").push_bind(username.to_string());
        query.push(" LIMIT 1");

        self.client.fetch_optional(query).await
    }
}

/// Always answers with the seeded user, whatever the username.
#[cfg(test)]
pub struct FindUserRepositoryMock;

#[cfg(test)]
#[async_trait]
impl FindUserRepository for FindUserRepositoryMock {
    async fn execute(&self, _username: &str) -> anyhow::Result<Option<UserRecord>> {
        Ok(Some(UserRecord {
            id: Some(1),
            first_name: Some("Renato".into()),
            last_name: Some("Berrocal".into()),
            password: Some("test123".into()),
            created_at: Some("2025-01-01 00:00:00".into()),
            ..UserRecord::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::sqlite_memory;

    #[tokio::test]
    async fn finds_seeded_user_by_username() {
        let repo = SqlFindUserRepository::new(sqlite_memory().await);
        let user = repo.execute("renarux").await.unwrap().expect("seeded user");

        assert_eq!(user.id, Some(1));
        assert_eq!(user.first_name.as_deref(), Some("Renato"));
        assert_eq!(user.last_name.as_deref(), Some("Berrocal"));
        assert_eq!(user.password.as_deref(), Some("test123"));
        assert!(user.created_at.is_some());
        // not selected
        assert_eq!(user.username, None);
        assert_eq!(user.updated_at, None);
    }

    #[tokio::test]
    async fn unknown_username_yields_none() {
        let repo = SqlFindUserRepository::new(sqlite_memory().await);
        assert_eq!(repo.execute("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn username_is_bound_not_interpolated() {
        let repo = SqlFindUserRepository::new(sqlite_memory().await);
        assert_eq!(repo.execute("' OR '1'='1").await.unwrap(), None);
    }
}
