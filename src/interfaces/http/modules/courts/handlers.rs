//! Court HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::domain::{Court, RepositoryProvider};

#[derive(Clone)]
pub struct CourtAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    get,
    path = "/api/v1/courts",
    tag = "Courts",
    responses(
        (status = 200, description = "All courts, active or not", body = Vec<Court>)
    )
)]
pub async fn list_courts(State(state): State<CourtAppState>) -> Json<Vec<Court>> {
    Json(state.repos.courts().find_all().await)
}
