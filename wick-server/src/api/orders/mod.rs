//! Order API Module
//!
//! Placement, payment and status routes. Everything here requires a logged
//! in user; the admin-only routes gate themselves with [`crate::auth::AdminUser`].

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place).get(handler::list_all))
        .route("/myorders", get(handler::list_mine))
        .route("/pay/verify", post(handler::verify_payment))
        .route("/pay/{id}", post(handler::initiate_payment))
        .route("/{id}/deliver", put(handler::update_status))
        .route("/{id}", get(handler::get_by_id))
}
