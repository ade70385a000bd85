use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::records::{ContactRole, ContactRow, CourtInfoRow, NoteRow};
use crate::records::contacts::{self, ContactInput};
use crate::records::court_info::{self, CourtInfoInput};
use crate::records::notes::{self, NoteInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NoteSearch {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactFilter {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub db_value: ContactRole,
}

// ──────────────────────────────────────────────
// Notes
// ──────────────────────────────────────────────

/// GET /api/v1/notes
pub async fn handle_list_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(search): Query<NoteSearch>,
) -> Result<Json<Vec<NoteRow>>, AppError> {
    let rows = notes::list_notes(&state.db, user.user_id).await?;
    Ok(Json(notes::search_notes(rows, search.q.as_deref())))
}

/// POST /api/v1/notes
pub async fn handle_create_note(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NoteInput>,
) -> Result<(StatusCode, Json<NoteRow>), AppError> {
    let input = input.normalized()?;
    let note = notes::insert_note(&state.db, user.user_id, &input).await?;
    info!(user_id = %user.user_id, note_id = %note.id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/v1/notes/:id
pub async fn handle_update_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NoteInput>,
) -> Result<Json<NoteRow>, AppError> {
    let input = input.normalized()?;
    let note = notes::update_note(&state.db, user.user_id, id, &input).await?;
    Ok(Json(note))
}

/// POST /api/v1/notes/:id/pin
pub async fn handle_toggle_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteRow>, AppError> {
    let note = notes::toggle_pin(&state.db, user.user_id, id).await?;
    Ok(Json(note))
}

/// DELETE /api/v1/notes/:id
pub async fn handle_delete_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    notes::delete_note(&state.db, user.user_id, id).await?;
    info!(user_id = %user.user_id, note_id = %id, "Note deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ──────────────────────────────────────────────
// Contacts
// ──────────────────────────────────────────────

/// GET /api/v1/contacts/roles
pub async fn handle_list_contact_roles() -> Json<Vec<RoleOption>> {
    Json(
        ContactRole::ALL
            .iter()
            .map(|&role| RoleOption {
                value: role.key(),
                label: role.label(),
                db_value: role,
            })
            .collect(),
    )
}

/// GET /api/v1/contacts
pub async fn handle_list_contacts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<ContactRow>>, AppError> {
    let role = contacts::parse_role_filter(filter.role.as_deref())?;
    let rows = contacts::list_contacts(&state.db, user.user_id, role).await?;
    Ok(Json(rows))
}

/// POST /api/v1/contacts
pub async fn handle_create_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<ContactRow>), AppError> {
    let input = input.normalized()?;
    let contact = contacts::insert_contact(&state.db, user.user_id, &input).await?;
    info!(user_id = %user.user_id, contact_id = %contact.id, role = %contact.role, "Contact created");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /api/v1/contacts/:id
pub async fn handle_update_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ContactInput>,
) -> Result<Json<ContactRow>, AppError> {
    let input = input.normalized()?;
    let contact = contacts::update_contact(&state.db, user.user_id, id, &input).await?;
    Ok(Json(contact))
}

/// DELETE /api/v1/contacts/:id
pub async fn handle_delete_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    contacts::delete_contact(&state.db, user.user_id, id).await?;
    info!(user_id = %user.user_id, contact_id = %id, "Contact deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ──────────────────────────────────────────────
// Court info
// ──────────────────────────────────────────────

/// GET /api/v1/court-info
pub async fn handle_get_court_info(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Option<CourtInfoRow>>, AppError> {
    let info = court_info::get_court_info(&state.db, user.user_id).await?;
    Ok(Json(info))
}

/// PUT /api/v1/court-info
pub async fn handle_upsert_court_info(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CourtInfoInput>,
) -> Result<Json<CourtInfoRow>, AppError> {
    let input = input.normalized()?;
    let info = court_info::upsert_court_info(&state.db, user.user_id, &input).await?;
    Ok(Json(info))
}

/// GET /api/v1/court-info/counties
pub async fn handle_list_counties() -> Json<&'static [&'static str]> {
    Json(court_info::CALIFORNIA_COUNTIES.as_slice())
}
