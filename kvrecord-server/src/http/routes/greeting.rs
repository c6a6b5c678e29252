//! Plain-text greeting endpoints

use axum::{routing::get, Router};

/// GET /
async fn root() -> &'static str {
    "Hello, World!"
}

/// GET /hello
async fn hello() -> &'static str {
    "Hello, World! This is 2.0"
}

/// Greeting routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/hello", get(hello))
}
