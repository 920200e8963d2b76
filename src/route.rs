//! Route definitions for the link API
//!
//! This module maps HTTP verbs and paths to their handlers and attaches
//! the shared application state.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handler::{
    create_link, delete_link, get_link, health, list_links, redirect_link, AppState,
};

/// Creates and configures the application router
///
/// # Route Definitions
///
/// - `POST /api/links` - Creates a short link
/// - `GET /api/links?q=&sort=` - Lists links
/// - `GET /api/links/{code}` - Shows one link's stats
/// - `DELETE /api/links/{code}` - Deletes a link
/// - `GET /healthz` - Liveness probe
/// - `GET /{code}` - Redirects to the target and counts the click
///
/// # Example Usage
///
/// ```no_run
/// # use quicklink::database::JsonFile;
/// # use quicklink::handler::AppState;
/// # use quicklink::route::create_app;
/// # use quicklink::service::LinkService;
/// # use quicklink::store::LinkStore;
/// let backend = JsonFile::open("data/links.json").unwrap();
/// let store = LinkStore::open(Box::new(backend)).unwrap();
/// let app = create_app(AppState::new(LinkService::new(store)));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/links", get(list_links).post(create_link))
        .route("/links/{code}", get(get_link).delete(delete_link));

    Router::new()
        .route("/healthz", get(health))
        .route("/{code}", get(redirect_link))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
