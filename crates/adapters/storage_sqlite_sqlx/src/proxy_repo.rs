//! `SQLite` implementation of [`ProxyRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use assethub_app::ports::ProxyRepository;
use assethub_domain::error::HubError;
use assethub_domain::id::{IdentityId, ProxyId};
use assethub_domain::identity::Identity;
use assethub_domain::page::Page;
use assethub_domain::proxy::{ExcludedBlob, Proxy, ProxyFilter, ProxyKind};
use assethub_domain::time::{Timestamp, now};

use crate::error::StorageError;

/// Wrapper for converting joined database rows into domain [`Proxy`].
struct Wrapper(Proxy);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Proxy> {
        value.map(|w| w.0)
    }
}

fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(decode_err)
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let enabled: bool = row.try_get("enabled")?;
        let kind: String = row.try_get("kind")?;
        let host: String = row.try_get("host")?;
        let port: i64 = row.try_get("port")?;
        let excluded: Option<Vec<u8>> = row.try_get("excluded")?;
        let identity_id: Option<i64> = row.try_get("identity_id")?;
        let identity_kind: Option<String> = row.try_get("identity_kind")?;
        let identity_name: Option<String> = row.try_get("identity_name")?;
        let create_user: String = row.try_get("create_user")?;
        let update_user: String = row.try_get("update_user")?;
        let create_time: String = row.try_get("create_time")?;
        let update_time: String = row.try_get("update_time")?;

        let kind = ProxyKind::from_str(&kind).map_err(decode_err)?;
        let port = u16::try_from(port).map_err(decode_err)?;
        let identity_id = identity_id.map(IdentityId::from_raw);
        let identity = match (identity_id, identity_kind, identity_name) {
            (Some(id), Some(kind), Some(name)) => Some(Identity { id, kind, name }),
            _ => None,
        };

        Ok(Self(Proxy {
            id: Some(ProxyId::from_raw(id)),
            enabled,
            kind,
            host,
            port,
            excluded: excluded.map(ExcludedBlob::from_bytes),
            identity_id,
            identity,
            create_user,
            update_user,
            create_time: Some(parse_timestamp(&create_time)?),
            update_time: Some(parse_timestamp(&update_time)?),
        }))
    }
}

const SELECT: &str = "SELECT p.id, p.enabled, p.kind, p.host, p.port, p.excluded, p.identity_id, \
     p.create_user, p.update_user, p.create_time, p.update_time, \
     i.kind AS identity_kind, i.name AS identity_name \
     FROM proxies p LEFT JOIN identities i ON i.id = p.identity_id";
const INSERT: &str = "INSERT INTO proxies (enabled, kind, host, port, excluded, identity_id, create_user, update_user, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE proxies SET enabled = ?, kind = ?, host = ?, port = ?, excluded = COALESCE(?, excluded), update_user = ?, update_time = ? WHERE id = ?";
const UPDATE_IDENTITY: &str =
    "UPDATE proxies SET identity_id = ?, update_user = ?, update_time = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM proxies WHERE id = ?";

/// `SQLite`-backed proxy repository.
pub struct SqliteProxyRepository {
    pool: SqlitePool,
}

impl SqliteProxyRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<Option<Proxy>, StorageError> {
        let row: Option<Wrapper> = sqlx::query_as(&format!("{SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(Wrapper::maybe(row))
    }
}

impl ProxyRepository for SqliteProxyRepository {
    async fn create(&self, proxy: Proxy) -> Result<Proxy, HubError> {
        let create_time = proxy.create_time.unwrap_or_else(now);
        let update_time = proxy.update_time.unwrap_or(create_time);

        let result = sqlx::query(INSERT)
            .bind(proxy.enabled)
            .bind(proxy.kind.as_str())
            .bind(&proxy.host)
            .bind(i64::from(proxy.port))
            .bind(proxy.excluded.as_ref().map(ExcludedBlob::as_bytes))
            .bind(proxy.identity_id.map(IdentityId::as_raw))
            .bind(&proxy.create_user)
            .bind(&proxy.update_user)
            .bind(create_time.to_rfc3339())
            .bind(update_time.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let created = self
            .fetch(result.last_insert_rowid())
            .await?
            .ok_or(StorageError::Database(sqlx::Error::RowNotFound))?;
        Ok(created)
    }

    async fn get_by_id(&self, id: ProxyId) -> Result<Option<Proxy>, HubError> {
        Ok(self.fetch(id.as_raw()).await?)
    }

    async fn list(&self, filter: ProxyFilter, page: Page) -> Result<Vec<Proxy>, HubError> {
        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT);
        if let Some(kind) = filter.kind {
            query.push(" WHERE p.kind = ").push_bind(kind);
        }
        // SQLite reads a negative LIMIT as "no limit".
        query
            .push(" ORDER BY p.id LIMIT ")
            .push_bind(page.limit.map_or(-1, i64::from))
            .push(" OFFSET ")
            .push_bind(i64::from(page.offset));

        let rows: Vec<Wrapper> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, id: ProxyId, proxy: Proxy) -> Result<bool, HubError> {
        let update_time = proxy.update_time.unwrap_or_else(now);

        let result = sqlx::query(UPDATE)
            .bind(proxy.enabled)
            .bind(proxy.kind.as_str())
            .bind(&proxy.host)
            .bind(i64::from(proxy.port))
            .bind(proxy.excluded.as_ref().map(ExcludedBlob::as_bytes))
            .bind(&proxy.update_user)
            .bind(update_time.to_rfc3339())
            .bind(id.as_raw())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_identity(
        &self,
        id: ProxyId,
        identity_id: Option<IdentityId>,
        update_user: String,
        update_time: Timestamp,
    ) -> Result<bool, HubError> {
        let result = sqlx::query(UPDATE_IDENTITY)
            .bind(identity_id.map(IdentityId::as_raw))
            .bind(update_user)
            .bind(update_time.to_rfc3339())
            .bind(id.as_raw())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ProxyId) -> Result<(), HubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.as_raw())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
