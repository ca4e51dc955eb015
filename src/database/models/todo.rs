use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single todo record. `id` is assigned exactly once at creation; `owner`
/// is the creating caller's identity and is never reassigned through the
/// ownership-scoped API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TodoItem {
    pub id: String,
    pub description: String,
    pub owner: String,
    pub status: bool,
}
