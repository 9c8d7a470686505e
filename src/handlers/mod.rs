pub mod emergency;
pub mod error;

pub use error::ApiError;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::db::Database;

pub fn router(db: Arc<Database>) -> Router {
    Router::new()
        .route("/api/emergency/verify-qr", post(emergency::verify_qr))
        .with_state(db)
}
