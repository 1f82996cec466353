//! In-memory document store.
//!
//! Holds both collections as raw JSON documents so stored shapes (legacy
//! fields, missing fields) behave exactly as they do in the SQLite store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use eragenetica_domain::{
    AdminSettings, AdminSettingsPatch, Character, CharacterPatch, Identity, UserId,
};

use crate::infrastructure::documents::{
    authorize_admin_settings, authorize_character, authorize_collection, decode_admin_settings,
    decode_character, decode_collection, merge_document,
};
use crate::infrastructure::ports::{
    AdminSettingsRepo, CharacterRecord, CharacterRepo, CharacterSubscription, RepoError,
    SnapshotPublisher,
};

pub struct InMemoryDocumentStore {
    characters: RwLock<BTreeMap<String, Value>>,
    admin_settings: RwLock<BTreeMap<String, Value>>,
    publisher: SnapshotPublisher,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            characters: RwLock::new(BTreeMap::new()),
            admin_settings: RwLock::new(BTreeMap::new()),
            publisher: SnapshotPublisher::new(Vec::new()),
        }
    }

    /// Store a raw character document, bypassing access rules.
    #[cfg(test)]
    pub async fn put_character_document(&self, id: &str, body: Value) {
        let mut characters = self.characters.write().await;
        characters.insert(id.to_string(), body);
        self.publisher.publish(decode_collection(characters.clone()));
    }

    /// Raw character document, bypassing access rules.
    #[cfg(test)]
    pub async fn character_document(&self, id: &str) -> Option<Value> {
        self.characters.read().await.get(id).cloned()
    }

    /// Raw admin settings document, bypassing access rules.
    #[cfg(test)]
    pub async fn admin_settings_document(&self, id: &str) -> Option<Value> {
        self.admin_settings.read().await.get(id).cloned()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryDocumentStore {
    async fn get(&self, caller: &Identity, id: &UserId) -> Result<Option<Character>, RepoError> {
        authorize_character(caller, id)?;
        let body = self.characters.read().await.get(id.as_str()).cloned();
        body.map(|body| decode_character(id.as_str(), body))
            .transpose()
    }

    async fn merge(
        &self,
        caller: &Identity,
        id: &UserId,
        patch: &CharacterPatch,
    ) -> Result<(), RepoError> {
        authorize_character(caller, id)?;
        let mut characters = self.characters.write().await;
        let merged = merge_document(characters.get(id.as_str()).cloned(), patch)?;
        characters.insert(id.to_string(), merged);
        // Published under the write guard so snapshots go out in write order.
        self.publisher.publish(decode_collection(characters.clone()));
        tracing::debug!(character_id = %id, "Character document merged");
        Ok(())
    }

    async fn list_all(&self, caller: &Identity) -> Result<Vec<CharacterRecord>, RepoError> {
        authorize_collection(caller)?;
        let characters = self.characters.read().await;
        Ok(decode_collection(characters.clone()))
    }

    async fn subscribe(&self, caller: &Identity) -> Result<CharacterSubscription, RepoError> {
        authorize_collection(caller)?;
        Ok(self.publisher.subscribe())
    }
}

#[async_trait]
impl AdminSettingsRepo for InMemoryDocumentStore {
    async fn get(
        &self,
        caller: &Identity,
        id: &UserId,
    ) -> Result<Option<AdminSettings>, RepoError> {
        authorize_admin_settings(caller, id)?;
        let body = self.admin_settings.read().await.get(id.as_str()).cloned();
        Ok(body.and_then(|body| decode_admin_settings(id.as_str(), body)))
    }

    async fn merge(
        &self,
        caller: &Identity,
        id: &UserId,
        patch: &AdminSettingsPatch,
    ) -> Result<(), RepoError> {
        authorize_admin_settings(caller, id)?;
        let mut settings = self.admin_settings.write().await;
        let merged = merge_document(settings.get(id.as_str()).cloned(), patch)?;
        settings.insert(id.to_string(), merged);
        tracing::debug!(admin_id = %id, "Admin settings merged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use serde_json::json;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[tokio::test]
    async fn missing_character_reads_as_none() {
        let store = InMemoryDocumentStore::new();
        let player = Identity::player(uid("p1"));
        let result = CharacterRepo::get(&store, &player, &uid("p1")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn merge_keeps_untouched_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .put_character_document("p1", json!({ "name": "Hinata", "currentHealth": 90 }))
            .await;
        let player = Identity::player(uid("p1"));

        CharacterRepo::merge(&store, &player, &uid("p1"), &CharacterPatch::current_chakra(12))
            .await
            .unwrap();

        let raw = store.character_document("p1").await.unwrap();
        assert_eq!(raw, json!({ "name": "Hinata", "currentHealth": 90, "currentChakra": 12 }));
    }

    #[tokio::test]
    async fn player_cannot_touch_someone_else() {
        let store = InMemoryDocumentStore::new();
        let player = Identity::player(uid("p1"));

        let err = CharacterRepo::get(&store, &player, &uid("p2")).await.unwrap_err();
        assert!(err.is_permission_denied());
        let err = CharacterRepo::merge(&store, &player, &uid("p2"), &CharacterPatch::notes("x"))
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
        assert!(store.character_document("p2").await.is_none());
    }

    #[tokio::test]
    async fn only_admins_list_and_subscribe() {
        let store = InMemoryDocumentStore::new();
        let player = Identity::player(uid("p1"));
        assert!(store.list_all(&player).await.unwrap_err().is_permission_denied());
        assert!(store.subscribe(&player).await.is_err());

        let admin = Identity::admin(uid("gm"));
        assert!(store.list_all(&admin).await.unwrap().is_empty());
        assert!(store.subscribe(&admin).await.is_ok());
    }

    #[tokio::test]
    async fn malformed_character_is_a_serialization_error() {
        let store = InMemoryDocumentStore::new();
        store
            .put_character_document("p1", json!({ "jutsus": "not a list" }))
            .await;
        let player = Identity::player(uid("p1"));
        let err = CharacterRepo::get(&store, &player, &uid("p1")).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn writes_reach_subscribers() {
        let store = InMemoryDocumentStore::new();
        let admin = Identity::admin(uid("gm"));
        let mut sub = store.subscribe(&admin).await.unwrap();
        assert!(sub.next().await.unwrap().is_empty());

        let player = Identity::player(uid("p1"));
        CharacterRepo::merge(&store, &player, &uid("p1"), &CharacterPatch::current_health(40))
            .await
            .unwrap();

        let snapshot = sub.next().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].character.current_health(), 40);
        // Fields never written take fresh-sheet values.
        assert_eq!(snapshot[0].character.max_health(), 100);
    }

    #[tokio::test]
    async fn admin_settings_lists_merge_independently() {
        let store = InMemoryDocumentStore::new();
        let admin = Identity::admin(uid("gm"));

        AdminSettingsRepo::merge(
            &store,
            &admin,
            &uid("gm"),
            &AdminSettingsPatch::default_character_order(vec![uid("a"), uid("b")]),
        )
        .await
        .unwrap();
        AdminSettingsRepo::merge(
            &store,
            &admin,
            &uid("gm"),
            &AdminSettingsPatch::character_order(vec![uid("b"), uid("a")]),
        )
        .await
        .unwrap();

        let settings = AdminSettingsRepo::get(&store, &admin, &uid("gm"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settings.character_order, vec![uid("b"), uid("a")]);
        assert_eq!(settings.default_character_order, vec![uid("a"), uid("b")]);
        assert!(store.admin_settings_document("gm").await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn latest_snapshot_matches_store_after_concurrent_merges() {
        for _ in 0..20 {
            let store = Arc::new(InMemoryDocumentStore::new());
            let writers: Vec<_> = (0..16)
                .map(|n| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        let id = uid(&format!("p{n}"));
                        let player = Identity::player(id.clone());
                        CharacterRepo::merge(&*store, &player, &id, &CharacterPatch::notes("x"))
                            .await
                    })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }

            let admin = Identity::admin(uid("gm"));
            let mut sub = store.subscribe(&admin).await.unwrap();
            let snapshot = sub.next().await.unwrap();
            assert_eq!(snapshot.len(), 16);
            assert_eq!(snapshot, store.list_all(&admin).await.unwrap());
        }
    }

    #[tokio::test]
    async fn concurrent_field_merges_on_one_document_both_land() {
        let store = InMemoryDocumentStore::new();
        let player = Identity::player(uid("p1"));
        let chakra = CharacterPatch::current_chakra(20);
        let health = CharacterPatch::current_health(70);

        let id = uid("p1");
        let (a, b) = tokio::join!(
            CharacterRepo::merge(&store, &player, &id, &chakra),
            CharacterRepo::merge(&store, &player, &id, &health),
        );
        a.unwrap();
        b.unwrap();

        let raw = store.character_document("p1").await.unwrap();
        assert_eq!(raw, json!({ "currentChakra": 20, "currentHealth": 70 }));
    }
}
