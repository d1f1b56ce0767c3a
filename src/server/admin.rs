use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::auth::AuthUser;
use crate::error::{Error, Result as StoreResult};
use crate::notify::{SelectionEmail, dispatch};
use crate::server::AppState;
use crate::server::dto::{RegistrationDto, SelectionDto, SelectionRequest};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::scope::{registration_owner, registration_view};
use crate::server::validation::parse_status;
use crate::store::{RegistrationFilter, Store};
use crate::types::{Capability, Registration, RegistrationStatus};
use crate::workflow::registration_number;
use crate::workflow::review::finalize;
use crate::workflow::scoring::{average, matching_score, round_to};

const CSV_FILE_NAME: &str = "hasil-seleksi-snbp.csv";
const CSV_HEADER: [&str; 6] = [
    "Nomor Pendaftaran",
    "Nama",
    "Email",
    "Sekolah",
    "Prodi Diterima",
    "Status Admin",
];

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seleksi", get(list_selection))
        .route("/seleksi/download", get(download_results))
        .route("/seleksi/{id}", post(decide_selection))
}

fn selection_view(store: &dyn Store, reg: &Registration) -> Result<SelectionDto, ApiError> {
    let (profile, email) = registration_owner(store, reg)?;
    let grades = store
        .list_grades(profile.id)
        .api_err("Failed to list grades")?;
    let avg = average(&grades).unwrap_or(0.0);

    let score2 = reg
        .choice2_program
        .as_deref()
        .map_or(0.0, |program| matching_score(avg, program));

    Ok(SelectionDto {
        registration: RegistrationDto::new(reg, &profile, &email),
        rata_rata: round_to(avg, 2),
        persentase1: round_to(matching_score(avg, &reg.choice1_program), 1),
        persentase2: round_to(score2, 1),
    })
}

/// Registrations approved by the principal, newest first.
async fn list_selection(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::FINALIZE_SELECTION)?;

    let regs = state
        .store
        .list_registrations(RegistrationFilter::PrincipalApproved)
        .api_err("Failed to list registrations")?;
    let data = regs
        .iter()
        .map(|reg| selection_view(state.store.as_ref(), reg))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::success(data)))
}

async fn decide_selection(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<SelectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::FINALIZE_SELECTION)?;
    let decision = parse_status(
        req.status.as_deref(),
        "status",
        &[RegistrationStatus::Diterima, RegistrationStatus::Ditolak],
        RegistrationStatus::parse,
    )?;

    let mut reg = state
        .store
        .get_registration(id)
        .api_err("Failed to get registration")?
        .or_not_found("Registration not found")?;

    let result = finalize(&mut reg, decision, req.pilihan_diterima)?;
    state
        .store
        .update_registration(&reg)
        .api_err("Failed to update registration")?;

    let (profile, email) = registration_owner(state.store.as_ref(), &reg)?;

    if email.is_empty() {
        tracing::info!(registration = reg.id, "Skip selection email: student has no email");
    } else {
        let program = result
            .accepted_program
            .unwrap_or_else(|| reg.choice1_program.clone());
        dispatch(
            state.notifier.clone(),
            SelectionEmail {
                to: email.clone(),
                name: Some(profile.nama.clone()),
                status: result.status,
                registration_number: registration_number(reg.id, &reg.created_at),
                program,
                public_url: state.public_url.clone(),
            },
        );
    }

    Ok(Json(ApiResponse::with_message(
        RegistrationDto::new(&reg, &profile, &email),
        "Selection status saved",
    )))
}

/// CSV of every finalized registration, oldest first.
async fn download_results(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::FINALIZE_SELECTION)?;

    let regs = state
        .store
        .list_registrations(RegistrationFilter::Finalized)
        .api_err("Failed to list registrations")?;

    let mut rows = Vec::with_capacity(regs.len());
    for reg in &regs {
        let dto = registration_view(state.store.as_ref(), reg)?;
        rows.push([
            dto.nomor_pendaftaran,
            dto.nama,
            dto.email,
            dto.sekolah.unwrap_or_default(),
            admitted_program(reg).unwrap_or_default(),
            dto.status.to_string(),
        ]);
    }

    let body = results_csv(&rows).api_err("Failed to build CSV")?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

/// Program shown in the results export. A counselor-only acceptance falls back to the first choice.
fn admitted_program(reg: &Registration) -> Option<String> {
    match (&reg.accepted_program, reg.status) {
        (Some(program), _) => Some(program.clone()),
        (None, RegistrationStatus::Diterima) => Some(reg.choice1_program.clone()),
        (None, _) => None,
    }
}

/// Every field is quoted; embedded quotes are doubled.
fn results_csv(rows: &[[String; 6]]) -> StoreResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))
}
