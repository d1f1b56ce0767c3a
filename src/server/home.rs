use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};

use crate::auth::AuthUser;
use crate::server::AppState;
use crate::server::dto::{HomeContentDto, HomeContentRequest, HomeQuery};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{optional_text, required};
use crate::types::{Capability, HomeContent, HomeRole};

pub fn home_router() -> Router<Arc<AppState>> {
    Router::new().route("/content", get(get_content).post(save_content))
}

/// Built-in landing text used until an admin stores one.
#[must_use]
pub fn default_content(role: HomeRole) -> (&'static str, &'static str) {
    match role {
        HomeRole::Public => (
            "Simulasi & Pendaftaran SNBP Sekolah",
            "Portal internal sekolah untuk mengelola nilai rapor, verifikasi Guru BK & Kepala Sekolah, hingga pemilihan universitas dan pengecekan hasil seleksi SNBP.",
        ),
        HomeRole::Siswa => (
            "Beranda Siswa SNBP",
            "Pantau kelengkapan profil, nilai rapor, dan status pendaftaran SNBP Anda di sini.",
        ),
        HomeRole::GuruBk => (
            "Beranda Guru BK",
            "Kelola verifikasi nilai rapor dan kelayakan siswa untuk mengikuti SNBP.",
        ),
        HomeRole::KepalaSekolah => (
            "Beranda Kepala Sekolah",
            "Tinjau dan sahkan kelayakan siswa serta pendaftaran universitas untuk SNBP.",
        ),
        HomeRole::Admin => (
            "Beranda Admin SNBP Sekolah",
            "Monitor data pendaftaran, proses seleksi, dan atur tampilan informasi portal.",
        ),
    }
}

fn to_dto(content: HomeContent) -> HomeContentDto {
    HomeContentDto {
        role: content.role.to_string(),
        title: content.title,
        subtitle: content.subtitle.unwrap_or_default(),
    }
}

async fn get_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown roles fall back to the public text.
    let role = query
        .role
        .as_deref()
        .and_then(HomeRole::parse)
        .unwrap_or(HomeRole::Public);

    let stored = state
        .store
        .get_home_content(role)
        .api_err("Failed to get home content")?;

    let dto = match stored {
        Some(content) => to_dto(content),
        None => {
            let (title, subtitle) = default_content(role);
            HomeContentDto {
                role: role.to_string(),
                title: title.to_string(),
                subtitle: subtitle.to_string(),
            }
        }
    };
    Ok(Json(ApiResponse::success(dto)))
}

async fn save_content(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<HomeContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::MANAGE_HOME_CONTENT)?;

    let raw_role = required(req.role, "role")?;
    let role = HomeRole::parse(&raw_role).ok_or_else(|| {
        let names: Vec<&str> = HomeRole::ALL.iter().map(|r| r.as_str()).collect();
        ApiError::bad_request(format!("role must be one of {}", names.join(", ")))
    })?;
    let title = required(req.title, "title")?;

    let content = HomeContent {
        role,
        title,
        subtitle: optional_text(req.subtitle),
    };
    state
        .store
        .upsert_home_content(&content)
        .api_err("Failed to save home content")?;

    Ok(Json(ApiResponse::with_message(
        to_dto(content),
        "Home content saved",
    )))
}
