use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::TodoItem;
use crate::database::StoreError;

/// Ownership-scoped CRUD contract for the todo collection. Every mutating or
/// single-record read filters by `id AND owner`; only `list_all` (the admin
/// read path) bypasses the owner filter. Zero matches are ordinary Ok
/// outcomes (`None`, `false`, `0`), distinct from storage faults.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<TodoItem>, StoreError>;

    async fn list_all(&self) -> Result<Vec<TodoItem>, StoreError>;

    async fn get_by_id(&self, id: &str, owner: &str) -> Result<Option<TodoItem>, StoreError>;

    /// Create a record with a fresh server-side id and `status = false`.
    async fn insert(&self, description: &str, owner: &str) -> Result<TodoItem, StoreError>;

    /// Overwrite the mutable fields of the matching record. Returns whether a
    /// record matched; `owner` and `id` are never rewritten in place.
    async fn replace(&self, id: &str, owner: &str, item: &TodoItem) -> Result<bool, StoreError>;

    /// Returns the number of deleted records (0 or 1).
    async fn delete_by_id(&self, id: &str, owner: &str) -> Result<u64, StoreError>;
}

/// Postgres-backed repository over a configured collection (table).
pub struct PgTodoRepository {
    pool: PgPool,
    collection: String,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool, collection: impl Into<String>) -> Result<Self, StoreError> {
        let collection = collection.into();
        if !Self::is_valid_collection_name(&collection) {
            return Err(StoreError::InvalidCollectionName(collection));
        }
        Ok(Self { pool, collection })
    }

    /// Validate collection names before interpolation into SQL. Names come
    /// from configuration, not callers, but are constrained anyway:
    /// lowercase alphanumeric plus underscore, not starting with a digit.
    fn is_valid_collection_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    fn quoted(&self) -> String {
        format!("\"{}\"", self.collection)
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<TodoItem>, StoreError> {
        let sql = format!(
            "SELECT id, description, \"owner\", status FROM {} WHERE \"owner\" = $1",
            self.quoted()
        );
        let items = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_all(&self) -> Result<Vec<TodoItem>, StoreError> {
        let sql = format!(
            "SELECT id, description, \"owner\", status FROM {}",
            self.quoted()
        );
        let items = sqlx::query_as::<_, TodoItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn get_by_id(&self, id: &str, owner: &str) -> Result<Option<TodoItem>, StoreError> {
        let sql = format!(
            "SELECT id, description, \"owner\", status FROM {} WHERE id = $1 AND \"owner\" = $2",
            self.quoted()
        );
        let item = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn insert(&self, description: &str, owner: &str) -> Result<TodoItem, StoreError> {
        let todo = TodoItem {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            owner: owner.to_string(),
            status: false,
        };

        let sql = format!(
            "INSERT INTO {} (id, description, \"owner\", status) VALUES ($1, $2, $3, $4)",
            self.quoted()
        );
        sqlx::query(&sql)
            .bind(&todo.id)
            .bind(&todo.description)
            .bind(&todo.owner)
            .bind(todo.status)
            .execute(&self.pool)
            .await?;

        Ok(todo)
    }

    async fn replace(&self, id: &str, owner: &str, item: &TodoItem) -> Result<bool, StoreError> {
        let sql = format!(
            "UPDATE {} SET description = $3, status = $4 WHERE id = $1 AND \"owner\" = $2",
            self.quoted()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .bind(&item.description)
            .bind(item.status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: &str, owner: &str) -> Result<u64, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND \"owner\" = $2",
            self.quoted()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
