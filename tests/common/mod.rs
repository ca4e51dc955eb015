#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use todo_api::auth::{generate_jwt, Claims};
use todo_api::database::memory::MemoryTodoRepository;
use todo_api::database::models::TodoItem;
use todo_api::database::repository::TodoRepository;
use todo_api::database::StoreError;
use todo_api::handlers::{router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

fn ensure_env() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        // Must run before the config singleton is first touched
        std::env::set_var("JWT_SECRET", JWT_SECRET);
    });
}

/// Fresh router over an empty in-memory repository. Each test gets its own
/// store; the app is cloneable so one test can issue several requests.
pub fn test_app() -> Router {
    ensure_env();
    router(AppState {
        todos: Arc::new(MemoryTodoRepository::new()),
    })
}

/// Repository whose every operation fails with a storage fault, for
/// exercising the fault-to-500 mapping at the endpoints.
pub struct FaultyTodoRepository;

fn storage_fault() -> StoreError {
    StoreError::ConfigMissing("DATABASE_URL")
}

#[async_trait]
impl TodoRepository for FaultyTodoRepository {
    async fn list_by_owner(&self, _owner: &str) -> Result<Vec<TodoItem>, StoreError> {
        Err(storage_fault())
    }

    async fn list_all(&self) -> Result<Vec<TodoItem>, StoreError> {
        Err(storage_fault())
    }

    async fn get_by_id(&self, _id: &str, _owner: &str) -> Result<Option<TodoItem>, StoreError> {
        Err(storage_fault())
    }

    async fn insert(&self, _description: &str, _owner: &str) -> Result<TodoItem, StoreError> {
        Err(storage_fault())
    }

    async fn replace(
        &self,
        _id: &str,
        _owner: &str,
        _item: &TodoItem,
    ) -> Result<bool, StoreError> {
        Err(storage_fault())
    }

    async fn delete_by_id(&self, _id: &str, _owner: &str) -> Result<u64, StoreError> {
        Err(storage_fault())
    }
}

/// Router whose repository faults on every operation.
pub fn faulty_app() -> Router {
    ensure_env();
    router(AppState {
        todos: Arc::new(FaultyTodoRepository),
    })
}

/// Repository wrapper counting how many operations reach storage. Used to
/// observe that guard rejections never touch the repository.
pub struct CountingTodoRepository {
    inner: MemoryTodoRepository,
    calls: AtomicUsize,
}

impl CountingTodoRepository {
    pub fn new() -> Self {
        Self {
            inner: MemoryTodoRepository::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TodoRepository for CountingTodoRepository {
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<TodoItem>, StoreError> {
        self.record();
        self.inner.list_by_owner(owner).await
    }

    async fn list_all(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.record();
        self.inner.list_all().await
    }

    async fn get_by_id(&self, id: &str, owner: &str) -> Result<Option<TodoItem>, StoreError> {
        self.record();
        self.inner.get_by_id(id, owner).await
    }

    async fn insert(&self, description: &str, owner: &str) -> Result<TodoItem, StoreError> {
        self.record();
        self.inner.insert(description, owner).await
    }

    async fn replace(&self, id: &str, owner: &str, item: &TodoItem) -> Result<bool, StoreError> {
        self.record();
        self.inner.replace(id, owner, item).await
    }

    async fn delete_by_id(&self, id: &str, owner: &str) -> Result<u64, StoreError> {
        self.record();
        self.inner.delete_by_id(id, owner).await
    }
}

/// Router over a counting repository, returned alongside its handle.
pub fn counting_app() -> (Router, Arc<CountingTodoRepository>) {
    ensure_env();
    let todos = Arc::new(CountingTodoRepository::new());
    let app = router(AppState {
        todos: todos.clone(),
    });
    (app, todos)
}

/// Mint a bearer credential for a caller with the given role claims.
pub fn bearer_for(name: &str, roles: &[&str]) -> String {
    ensure_env();
    let claims = Claims::new(name, roles.iter().map(|s| s.to_string()).collect());
    format!("Bearer {}", generate_jwt(claims).expect("token generation"))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Result<Response<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(app.clone().oneshot(request).await?)
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_bytes(response: Response<Body>) -> Result<Vec<u8>> {
    Ok(to_bytes(response.into_body(), usize::MAX).await?.to_vec())
}

/// Create an item for the caller and return its JSON representation.
pub async fn create_item(app: &Router, auth: &str, description: &str) -> Result<Value> {
    let response = send(
        app,
        "POST",
        "/todos",
        Some(auth),
        Some(serde_json::json!({ "description": description })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
