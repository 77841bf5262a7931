use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::fields::{Flags, SettingsGroup};
use super::model::{ScalarField, Settings};
use super::repo::SettingsRepo;
use super::repo_types::GroupMerge;

/// Settings keyed by user id. Every operation runs under a single lock acquisition.
#[derive(Default)]
pub struct MemorySettingsRepo {
    docs: RwLock<HashMap<Uuid, Settings>>,
}

impl MemorySettingsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }
}

#[async_trait]
impl SettingsRepo for MemorySettingsRepo {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Settings>> {
        Ok(self.docs.read().await.get(&user_id).cloned())
    }

    async fn insert_if_absent(&self, doc: Settings) -> anyhow::Result<Settings> {
        let mut docs = self.docs.write().await;
        Ok(docs.entry(doc.user_id).or_insert(doc).clone())
    }

    async fn upsert_scalar(&self, doc: Settings, field: ScalarField) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        match docs.entry(doc.user_id) {
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(true)
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                let value = doc.scalar(field);
                if current.scalar(field) == value {
                    return Ok(false);
                }
                current.set_scalar(field, value)?;
                current.updated_at = doc.updated_at;
                Ok(true)
            }
        }
    }

    async fn merge_group(
        &self,
        user_id: Uuid,
        group: SettingsGroup,
        patch: &Flags,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<GroupMerge>> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.get_mut(&user_id) else {
            return Ok(None);
        };
        let changed = doc.merge_group(group, patch);
        if changed {
            doc.updated_at = now;
        }
        Ok(Some(GroupMerge {
            flags: doc.group(group).clone(),
            changed,
        }))
    }
}
