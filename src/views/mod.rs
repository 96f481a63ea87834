pub mod landing;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(landing::index))
        .route("/waitlist", post(landing::join))
}
