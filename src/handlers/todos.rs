use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::policy::{authorize, AccessPolicy};
use crate::database::models::TodoItem;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub description: String,
}

/// GET /todos - list the caller's own items. HEAD on the same path is the
/// health probe: always 200, no auth, no storage access.
pub async fn todo_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    method: Method,
) -> Result<Response, ApiError> {
    if method == Method::HEAD {
        return Ok(StatusCode::OK.into_response());
    }

    authorize(AccessPolicy::Standard, &user.roles)?;

    let items = state.todos.list_by_owner(&user.name).await.map_err(|e| {
        tracing::error!("Could not list items for {}", user.name);
        ApiError::from(e)
    })?;

    if items.is_empty() {
        tracing::info!("There are no items in the collection");
        return Err(ApiError::not_found("There are no items in the collection"));
    }

    Ok(Json(items).into_response())
}

/// GET /todos/all - cross-owner list, admin policy only.
pub async fn todo_list_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    authorize(AccessPolicy::Admin, &user.roles)?;

    let items = state.todos.list_all().await.map_err(|e| {
        tracing::error!("Could not list all items");
        ApiError::from(e)
    })?;

    if items.is_empty() {
        tracing::info!("There are no items in the collection");
        return Err(ApiError::not_found("There are no items in the collection"));
    }

    Ok(Json(items))
}

/// GET/POST /todos/:id - fetch one of the caller's items.
pub async fn todo_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TodoItem>, ApiError> {
    authorize(AccessPolicy::Standard, &user.roles)?;

    let item = state.todos.get_by_id(&id, &user.name).await.map_err(|e| {
        tracing::error!("Could not fetch item with id: {}", id);
        ApiError::from(e)
    })?;

    match item {
        Some(item) => Ok(Json(item)),
        None => {
            tracing::warn!("That item doesn't exist!");
            Err(ApiError::not_found("That item doesn't exist!"))
        }
    }
}

/// POST /todos - create an item owned by the caller, fresh id, status false.
pub async fn todo_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<Json<TodoItem>, ApiError> {
    authorize(AccessPolicy::Standard, &user.roles)?;

    let Json(input) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    let todo = state
        .todos
        .insert(&input.description, &user.name)
        .await
        .map_err(|e| {
            tracing::error!("Could not insert item");
            ApiError::from(e)
        })?;

    tracing::info!("Todo item inserted");
    Ok(Json(todo))
}

/// PUT /todos/:id - replace the mutable fields of the caller's item. The body
/// is parsed unconditionally and pinned to the path id; a malformed body is
/// its own client error, surfaced before the guard outcome.
pub async fn todo_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<TodoItem>, JsonRejection>,
) -> Result<Json<TodoItem>, ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    // Candidate record: id comes from the path, owner stays the caller. The
    // response reflects this caller-supplied data, not a re-read of storage.
    let updated = TodoItem {
        id: id.clone(),
        description: input.description,
        owner: user.name.clone(),
        status: input.status,
    };

    authorize(AccessPolicy::Standard, &user.roles)?;

    let replaced = state
        .todos
        .replace(&id, &user.name, &updated)
        .await
        .map_err(|e| {
            tracing::error!("Could not update item with id: {}", id);
            ApiError::from(e)
        })?;

    if !replaced {
        tracing::info!("Todo item with id: {} does not exist. Update failed", id);
        return Err(ApiError::not_found(format!(
            "Todo item with id: {} does not exist. Update failed",
            id
        )));
    }

    Ok(Json(updated))
}

/// DELETE /todos/:id - delete the caller's item; 200 with no body.
pub async fn todo_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    authorize(AccessPolicy::Standard, &user.roles)?;

    let deleted = state
        .todos
        .delete_by_id(&id, &user.name)
        .await
        .map_err(|e| {
            tracing::error!("Could not delete item with id: {}", id);
            ApiError::from(e)
        })?;

    if deleted == 0 {
        tracing::info!("Todo item with id: {} does not exist. Delete failed", id);
        return Err(ApiError::not_found(format!(
            "Todo item with id: {} does not exist. Delete failed",
            id
        )));
    }

    Ok(StatusCode::OK)
}
