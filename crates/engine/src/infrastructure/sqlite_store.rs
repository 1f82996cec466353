//! SQLite-backed document store.
//!
//! Both collections live in one `documents` table keyed by
//! `(collection, id)`; bodies are JSON text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use eragenetica_domain::{
    AdminSettings, AdminSettingsPatch, Character, CharacterPatch, Identity, UserId,
};

use crate::infrastructure::documents::{
    authorize_admin_settings, authorize_character, authorize_collection, decode_admin_settings,
    decode_character, decode_collection, merge_document, ADMIN_SETTINGS, CHARACTERS,
};
use crate::infrastructure::ports::{
    AdminSettingsRepo, CharacterRecord, CharacterRepo, CharacterSubscription, ClockPort,
    RepoError, SnapshotPublisher,
};

/// SQLite implementation of both document collections.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
    publisher: SnapshotPublisher,
    /// Serializes merges and the snapshot publish that follows each one.
    writes: Mutex<()>,
}

impl SqliteDocumentStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        let initial = load_collection(&pool).await?;
        tracing::info!(db_path = %db_path, characters = initial.len(), "Document store opened");

        Ok(Self {
            pool,
            clock,
            publisher: SnapshotPublisher::new(initial),
            writes: Mutex::new(()),
        })
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Option<Value>, RepoError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("read", e))?;

        row.map(|row| {
            let body: String = row.get("body");
            serde_json::from_str(&body).map_err(RepoError::serialization)
        })
        .transpose()
    }

    /// Read-modify-write inside one transaction.
    ///
    /// Callers hold `writes`: two deferred transactions upgrading to a write
    /// lock at once fail with SQLITE_BUSY without waiting.
    async fn merge_fields<P: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        patch: &P,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("merge", e))?;

        let existing: Option<String> =
            sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepoError::database("merge", e))?
                .map(|row| row.get("body"));

        // An unreadable body is overwritten by the patch fields.
        let existing = existing.and_then(|body| serde_json::from_str::<Value>(&body).ok());
        let merged = merge_document(existing, patch)?;
        let body = serde_json::to_string(&merged).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(body)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("merge", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("merge", e))?;
        Ok(())
    }

    /// Raw document body, bypassing access rules.
    #[cfg(test)]
    pub async fn put_document(&self, collection: &str, id: &str, body: Value) {
        sqlx::query(
            "INSERT OR REPLACE INTO documents (collection, id, body, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(id)
        .bind(body.to_string())
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .unwrap();
    }
}

async fn load_collection(pool: &SqlitePool) -> Result<Vec<CharacterRecord>, RepoError> {
    let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ? ORDER BY id")
        .bind(CHARACTERS)
        .fetch_all(pool)
        .await
        .map_err(|e| RepoError::database("list", e))?;

    let documents = rows.into_iter().filter_map(|row| {
        let id: String = row.get("id");
        let body: String = row.get("body");
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Some((id, value)),
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, "Skipping unreadable character document");
                None
            }
        }
    });
    Ok(decode_collection(documents))
}

#[async_trait]
impl CharacterRepo for SqliteDocumentStore {
    async fn get(&self, caller: &Identity, id: &UserId) -> Result<Option<Character>, RepoError> {
        authorize_character(caller, id)?;
        self.read(CHARACTERS, id.as_str())
            .await?
            .map(|body| decode_character(id.as_str(), body))
            .transpose()
    }

    async fn merge(
        &self,
        caller: &Identity,
        id: &UserId,
        patch: &CharacterPatch,
    ) -> Result<(), RepoError> {
        authorize_character(caller, id)?;
        let _guard = self.writes.lock().await;
        self.merge_fields(CHARACTERS, id.as_str(), patch).await?;
        tracing::debug!(character_id = %id, "Character document merged");

        // Reloaded under the guard so snapshots go out in write order.
        match load_collection(&self.pool).await {
            Ok(snapshot) => self.publisher.publish(snapshot),
            Err(e) => tracing::warn!(error = %e, "Failed to refresh character snapshot"),
        }
        Ok(())
    }

    async fn list_all(&self, caller: &Identity) -> Result<Vec<CharacterRecord>, RepoError> {
        authorize_collection(caller)?;
        load_collection(&self.pool).await
    }

    async fn subscribe(&self, caller: &Identity) -> Result<CharacterSubscription, RepoError> {
        authorize_collection(caller)?;
        Ok(self.publisher.subscribe())
    }
}

#[async_trait]
impl AdminSettingsRepo for SqliteDocumentStore {
    async fn get(
        &self,
        caller: &Identity,
        id: &UserId,
    ) -> Result<Option<AdminSettings>, RepoError> {
        authorize_admin_settings(caller, id)?;
        let body = match self.read(ADMIN_SETTINGS, id.as_str()).await {
            Ok(body) => body,
            Err(e) if e.is_malformed() => {
                tracing::warn!(admin_id = %id, error = %e, "Ignoring unreadable admin settings document");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(body.and_then(|body| decode_admin_settings(id.as_str(), body)))
    }

    async fn merge(
        &self,
        caller: &Identity,
        id: &UserId,
        patch: &AdminSettingsPatch,
    ) -> Result<(), RepoError> {
        authorize_admin_settings(caller, id)?;
        let _guard = self.writes.lock().await;
        self.merge_fields(ADMIN_SETTINGS, id.as_str(), patch).await?;
        tracing::debug!(admin_id = %id, "Admin settings merged");
        Ok(())
    }
}
