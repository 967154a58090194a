//! Étudiant route table.
//!
//! `/search` and `/filiere/:filiere` are literal segments, which axum
//! matches ahead of the `/:id` capture, so a search is never read as an
//! identifier lookup.

use crate::handlers::etudiant::{by_filiere, create, delete as delete_handler, list, read, search, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn etudiant_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/filiere/:filiere", get(by_filiere))
        .route("/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}
