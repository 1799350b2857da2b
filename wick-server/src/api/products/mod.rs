//! Product API Module
//!
//! Catalog reads are public; mutations require admin. Review routes are for
//! any logged-in customer.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/categories", get(handler::list_categories))
        .route("/history", get(handler::history))
        .route(
            "/{id}/reviews",
            post(handler::add_review)
                .put(handler::update_review)
                .delete(handler::delete_review),
        )
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::soft_delete),
        )
}
