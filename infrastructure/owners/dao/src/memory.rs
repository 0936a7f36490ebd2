use std::collections::BTreeMap;

use async_trait::async_trait;
use database_traits::dao::Repository;
use owner_errors::OwnerError;
use owner_models::Owner;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Owner>,
    last_id: i32,
}

/// Process-local owner store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryOwnerDao {
    table: RwLock<Table>,
}

impl InMemoryOwnerDao {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize { self.table.read().await.rows.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl Repository for InMemoryOwnerDao {
    type Error = OwnerError;
    type ID = i32;
    type Model = Owner;

    #[instrument(skip_all, fields(owner.id = ?owner.id))]
    async fn save(&self, mut owner: Owner) -> Result<Owner, OwnerError> {
        let mut table = self.table.write().await;

        let id = match owner.id {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(id) => return Err(OwnerError::NotFound { owner_id: id }),
            None => {
                let next = table.last_id.checked_add(1).ok_or_else(|| {
                    OwnerError::InternalError(
                        "owner id sequence exhausted".to_string(),
                    )
                })?;
                table.last_id = next;
                next
            }
        };

        owner.id = Some(id);
        table.rows.insert(id, owner.clone());
        debug!(owner.id = id, "Owner stored");

        Ok(owner)
    }

    async fn find_one(&self, id: i32) -> Result<Option<Owner>, OwnerError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Owner>, OwnerError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}
