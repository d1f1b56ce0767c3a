use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};

use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{SimulationRequest, SimulationResponse};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::scope::{Access, resolve_student};
use crate::types::Capability;
use crate::workflow::scoring::{Chance, simulation_score};

pub fn simulation_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(simulate))
}

/// Pre-registration self-check. Advisory only.
async fn simulate(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SimulationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = resolve_student(
        state.store.as_ref(),
        &auth,
        req.email.as_deref(),
        Access::Read(Capability::RUN_SIMULATION),
    )?;

    let profile = state
        .store
        .get_profile_by_user(user.id)
        .api_err("Failed to get student profile")?;

    let skor = match profile {
        Some(profile) => {
            let grades = state
                .store
                .list_grades(profile.id)
                .api_err("Failed to list grades")?;
            let achievements = state
                .store
                .list_achievements(profile.id)
                .api_err("Failed to list achievements")?;
            simulation_score(&grades, achievements.len())
        }
        None => 0.0,
    };

    Ok(Json(SimulationResponse {
        skor,
        kategori: Chance::from_score(skor),
        prodi1: req.prodi1.unwrap_or_default(),
        prodi2: req.prodi2.unwrap_or_default(),
    }))
}
