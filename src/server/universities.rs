use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};

use crate::server::AppState;
use crate::server::dto::UniversityQuery;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::optional_text;

pub fn university_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_universities))
        .route("/prodi", get(list_programs))
}

async fn list_universities(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let names = state
        .store
        .list_universities()
        .api_err("Failed to list universities")?;
    Ok(Json(ApiResponse::success(names)))
}

async fn list_programs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UniversityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let university = optional_text(query.universitas);
    let programs = state
        .store
        .list_programs(university.as_deref())
        .api_err("Failed to list programs")?;
    Ok(Json(ApiResponse::success(programs)))
}
