use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::database::repository::TodoRepository;

pub mod todos;

/// Store handle is constructed once at startup and injected, so tests can
/// substitute the in-memory repository behind the same contract.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // HEAD /todos doubles as the unauthenticated health probe; axum
        // routes it through the GET handler, which short-circuits on HEAD.
        .route("/todos", get(todos::todo_list).post(todos::todo_post))
        .route("/todos/all", get(todos::todo_list_all))
        .route(
            "/todos/:id",
            get(todos::todo_get)
                .post(todos::todo_get)
                .put(todos::todo_put)
                .delete(todos::todo_delete),
        )
        .layer(middleware::from_fn(crate::middleware::jwt_auth_middleware))
        .with_state(state)
}
