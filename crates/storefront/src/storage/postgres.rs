//! `PostgreSQL` snapshot storage.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use super::{SnapshotStorage, StorageError, validate_name};

/// Stores records in `storefront.snapshot`, scoped to one shopper namespace.
///
/// The namespace is typically a session or user identifier; each namespace
/// has its own independent cart and history records.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
    namespace: String,
}

impl PgStorage {
    #[must_use]
    pub fn new(pool: PgPool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl SnapshotStorage for PgStorage {
    async fn load(&self, name: &str) -> Result<Option<serde_json::Value>, StorageError> {
        validate_name(name)?;
        let body = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r"
            SELECT body
            FROM storefront.snapshot
            WHERE namespace = $1 AND name = $2
            ",
        )
        .bind(&self.namespace)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(body.map(|Json(value)| value))
    }

    async fn save(&self, name: &str, record: &serde_json::Value) -> Result<(), StorageError> {
        validate_name(name)?;
        sqlx::query(
            r"
            INSERT INTO storefront.snapshot (namespace, name, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (namespace, name)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            ",
        )
        .bind(&self.namespace)
        .bind(name)
        .bind(Json(record))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        sqlx::query(
            r"
            DELETE FROM storefront.snapshot
            WHERE namespace = $1 AND name = $2
            ",
        )
        .bind(&self.namespace)
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
