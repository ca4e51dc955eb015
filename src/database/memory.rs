use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::TodoItem;
use crate::database::repository::TodoRepository;
use crate::database::StoreError;

/// In-memory repository implementing the same contract as the Postgres one.
/// Used as the injected substitute in tests; never produces a storage fault.
#[derive(Default)]
pub struct MemoryTodoRepository {
    items: RwLock<HashMap<String, TodoItem>>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &str, owner: &str) -> Result<Option<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .get(id)
            .filter(|item| item.owner == owner)
            .cloned())
    }

    async fn insert(&self, description: &str, owner: &str) -> Result<TodoItem, StoreError> {
        let todo = TodoItem {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            owner: owner.to_string(),
            status: false,
        };

        let mut items = self.items.write().await;
        items.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn replace(&self, id: &str, owner: &str, item: &TodoItem) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        match items.get_mut(id).filter(|existing| existing.owner == owner) {
            Some(existing) => {
                existing.description = item.description.clone();
                existing.status = item.status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str, owner: &str) -> Result<u64, StoreError> {
        let mut items = self.items.write().await;
        let matches = items
            .get(id)
            .map(|item| item.owner == owner)
            .unwrap_or(false);
        if matches {
            items.remove(id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
