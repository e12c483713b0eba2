//! `SQLite` implementation of [`IdentityRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use assethub_app::ports::IdentityRepository;
use assethub_domain::error::HubError;
use assethub_domain::id::IdentityId;
use assethub_domain::identity::Identity;

use crate::error::StorageError;

struct Wrapper(Identity);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Identity {
            id: IdentityId::from_raw(row.try_get("id")?),
            kind: row.try_get("kind")?,
            name: row.try_get("name")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO identities (kind, name) VALUES (?, ?)";
const SELECT_BY_ID: &str = "SELECT id, kind, name FROM identities WHERE id = ?";

/// `SQLite`-backed identity repository.
pub struct SqliteIdentityRepository {
    pool: SqlitePool,
}

impl SqliteIdentityRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl IdentityRepository for SqliteIdentityRepository {
    async fn create(&self, kind: String, name: String) -> Result<Identity, HubError> {
        let result = sqlx::query(INSERT)
            .bind(&kind)
            .bind(&name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Identity {
            id: IdentityId::from_raw(result.last_insert_rowid()),
            kind,
            name,
        })
    }

    async fn get_by_id(&self, id: IdentityId) -> Result<Option<Identity>, HubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_raw())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteIdentityRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteIdentityRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_create_and_retrieve_identity() {
        let repo = setup().await;
        let created = repo
            .create("source".to_string(), "git-creds".to_string())
            .await
            .unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_return_none_when_identity_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(IdentityId::from_raw(5)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_reject_duplicate_names() {
        let repo = setup().await;
        repo.create("proxy".to_string(), "dup".to_string())
            .await
            .unwrap();
        let result = repo.create("proxy".to_string(), "dup".to_string()).await;
        assert!(matches!(result, Err(HubError::Storage(_))));
    }
}
