use anyhow::Context;
use sqlx::{
    any::{AnyPoolOptions, AnyRow},
    Any, AnyPool, Execute, FromRow, QueryBuilder,
};
use tracing::{error, info};

use crate::config::DatabaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Mysql,
}

impl Backend {
    /// Run on every new connection. Stored timestamps carry no offset and are
    /// read back as UTC, so MySQL must write them in UTC too.
    pub fn session_setup(self) -> Option<&'static str> {
        match self {
            Backend::Sqlite => None,
            Backend::Mysql => Some("SET time_zone = '+00:00'"),
        }
    }
}

impl From<&DatabaseConfig> for Backend {
    fn from(config: &DatabaseConfig) -> Self {
        match config {
            DatabaseConfig::Sqlite { .. } => Backend::Sqlite,
            DatabaseConfig::Mysql { .. } => Backend::Mysql,
        }
    }
}

/// Connection pool for the `Users` store plus the dialect it speaks.
#[derive(Clone)]
pub struct DataClient {
    pool: AnyPool,
    backend: Backend,
}

impl DataClient {
    pub async fn connect(config: &DatabaseConfig, max_connections: u32) -> anyhow::Result<Self> {
        sqlx::any::install_default_drivers();
        let backend = Backend::from(config);
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    if let Some(statement) = backend.session_setup() {
                        sqlx::query(statement).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .connect(&config.url())
            .await
            .context("connect to database")?;
        info!(database = ?config, "database pool ready");
        Ok(Self::from_pool(pool, backend))
    }

    pub fn from_pool(pool: AnyPool, backend: Backend) -> Self {
        Self { pool, backend }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Apply the embedded migrations for this backend.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        match self.backend {
            Backend::Sqlite => sqlx::migrate!("./migrations/sqlite").run(&self.pool).await?,
            Backend::Mysql => sqlx::migrate!("./migrations/mysql").run(&self.pool).await?,
        }
        Ok(())
    }

    /// `SELECT <columns> FROM Users`, ready for a `WHERE` clause.
    pub fn select_users<'args>(&self, columns: &[&str]) -> QueryBuilder<'args, Any> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(columns.join(", "));
        builder.push(" FROM Users");
        builder
    }

    /// Run a built query and take the first row, logging the statement either way.
    pub async fn fetch_optional<'args, T>(
        &self,
        mut builder: QueryBuilder<'args, Any>,
    ) -> anyhow::Result<Option<T>>
    where
        T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
    {
        let query = builder.build_query_as::<T>();
        let sql = query.sql().to_owned();

        match query.fetch_optional(&self.pool).await {
            Ok(row) => {
                info!(query = %sql, "SQL Query Executed");
                Ok(row)
            }
            Err(e) => {
                error!(query = %sql, error = %e, "SQL Query Failed");
                Err(e).context("SQL query failed")
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, FromRow)]
    struct Count {
        total: i64,
    }

    #[tokio::test]
    async fn migrations_create_and_seed_users() {
        let client = test_support::sqlite_memory().await;
        let count: Option<Count> = client
            .fetch_optional(client.select_users(&["COUNT(*) AS total"]))
            .await
            .unwrap();
        assert_eq!(count.unwrap().total, 1);
    }

    #[tokio::test]
    async fn query_errors_are_reported() {
        let client = test_support::sqlite_memory().await;
        let result: anyhow::Result<Option<Count>> = client
            .fetch_optional(client.select_users(&["missingColumn AS total"]))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn backend_follows_config() {
        let sqlite = DatabaseConfig::Sqlite {
            path: "x".into(),
        };
        assert_eq!(Backend::from(&sqlite), Backend::Sqlite);
    }

    #[test]
    fn mysql_sessions_are_pinned_to_utc() {
        let mysql = DatabaseConfig::Mysql {
            host: "localhost".into(),
            user: "root".into(),
            password: "secret".into(),
            name: "users".into(),
            port: 3306,
        };
        assert_eq!(
            Backend::from(&mysql).session_setup(),
            Some("SET time_zone = '+00:00'")
        );
        assert_eq!(Backend::Sqlite.session_setup(), None);
    }
}
