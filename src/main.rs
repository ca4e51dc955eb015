use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use todo_api::database::repository::PgTodoRepository;
use todo_api::handlers::{self, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = todo_api::config::config();
    tracing::info!("Starting todo API in {:?} mode", config.environment);

    let pool = todo_api::database::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let todos = PgTodoRepository::new(pool, config.database.collection_name.clone())
        .unwrap_or_else(|e| panic!("invalid collection configuration: {}", e));

    let mut app = handlers::router(AppState {
        todos: Arc::new(todos),
    })
    .layer(TraceLayer::new_for_http());

    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    // Allow tests or deployments to override port via env
    let port = std::env::var("TODO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
