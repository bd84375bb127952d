// HTTP routes: every GET path renders the current monitor snapshot

mod page;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::publisher::SnapshotReader;

pub use page::render;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshots: SnapshotReader,
}

pub fn app(snapshots: SnapshotReader) -> Router {
    let state = AppState { snapshots };
    Router::new()
        .route("/", get(page::index_handler)) // GET /
        .route("/{*path}", get(page::index_handler)) // GET /* (catch-all)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
