use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::account::profiles::fetch_profile;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::llm_client::MODEL;
use crate::models::preparation::PreparationNoteRow;
use crate::models::profile::Role;
use crate::models::records::{NoteCategory, NoteRow};
use crate::preparation::context::{GuideRequest, PrepRequest};
use crate::preparation::export::{export_text, note_content, note_title};
use crate::preparation::generator::GuideGenerator;
use crate::preparation::prompts::{guide_prompt, hearing_type_for, person_for, GUIDE_SYSTEM};
use crate::records::notes::{insert_note, NoteInput};
use crate::state::AppState;
use crate::timeline::template::stage_by_key;

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub title: &'static str,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveNoteParams {
    /// The user's local date for the note title; defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateGuideRequest {
    pub prep_type: Option<String>,
    pub concerns: Option<String>,
    pub current_stage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateGuideResponse {
    pub content: String,
    pub model: String,
}

/// Generates a guide and keeps an audit record of it. Nothing is stored on failure.
pub async fn prepare_guide(
    pool: &PgPool,
    guides: &dyn GuideGenerator,
    user_id: Uuid,
    request: &GuideRequest,
) -> Result<PreparationNoteRow, AppError> {
    let guide = guides.generate(request).await?;

    let row = sqlx::query_as::<_, PreparationNoteRow>(
        "INSERT INTO preparation_notes
            (id, user_id, prep_type, meeting_role, concerns, generated_guide)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(request.prep_type)
    .bind(request.meeting_role)
    .bind(&request.concerns)
    .bind(SqlJson(&guide))
    .fetch_one(pool)
    .await?;

    info!(
        %user_id,
        prep_id = %row.id,
        prep_type = %request.prep_type,
        backend = guides.backend(),
        "Preparation guide generated"
    );
    Ok(row)
}

async fn fetch_preparation(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<PreparationNoteRow, AppError> {
    sqlx::query_as::<_, PreparationNoteRow>(
        "SELECT * FROM preparation_notes WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Preparation guide {id} not found")))
}

/// POST /api/v1/preparation
pub async fn handle_create_preparation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PrepRequest>,
) -> Result<(StatusCode, Json<PreparationNoteRow>), AppError> {
    let profile = fetch_profile(&state.db, user.user_id).await?;
    let current_stage = profile
        .current_stage
        .and_then(stage_by_key)
        .map(|s| s.title.to_string());
    let request = req.validate(profile.role, current_stage)?;

    let row = prepare_guide(&state.db, state.guides.as_ref(), user.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/preparation
pub async fn handle_list_preparations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PreparationNoteRow>>, AppError> {
    let rows = sqlx::query_as::<_, PreparationNoteRow>(
        "SELECT * FROM preparation_notes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/preparation/:id/export
pub async fn handle_export_preparation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let prep = fetch_preparation(&state.db, user.user_id, id).await?;
    Ok(Json(ExportResponse {
        title: prep.prep_type.title(),
        text: export_text(&prep),
    }))
}

/// POST /api/v1/preparation/:id/save-note
/// Copies the guide into the user's notes and flags the record exported.
pub async fn handle_save_as_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<SaveNoteParams>,
) -> Result<(StatusCode, Json<NoteRow>), AppError> {
    let prep = fetch_preparation(&state.db, user.user_id, id).await?;
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let input = NoteInput {
        title: note_title(prep.prep_type, prep.meeting_role, date),
        content: note_content(&prep),
        category: NoteCategory::Other,
    };

    let mut tx = state.db.begin().await?;
    let note = insert_note(&mut *tx, user.user_id, &input).await?;
    sqlx::query("UPDATE preparation_notes SET exported = TRUE WHERE id = $1")
        .bind(prep.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(user_id = %user.user_id, prep_id = %prep.id, note_id = %note.id, "Guide saved as note");
    Ok((StatusCode::CREATED, Json(note)))
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// POST /api/v1/functions/generate-preparation-guide
/// Direct LLM call without an audit record; 500 when no API key is configured.
pub async fn handle_generate_preparation_guide(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<GenerateGuideRequest>,
) -> Result<Json<GenerateGuideResponse>, AppError> {
    let (Some(prep_type), Some(concerns)) = (required(req.prep_type), required(req.concerns))
    else {
        return Err(AppError::Validation(
            "Missing required fields: prepType and concerns".to_string(),
        ));
    };
    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::Llm("Anthropic API key not configured".to_string()))?;

    let prompt = guide_prompt(
        person_for(Role::Parent),
        hearing_type_for(&prep_type),
        required(req.current_stage).as_deref(),
        &concerns,
    );
    let content = llm
        .complete(&prompt, GUIDE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(GenerateGuideResponse {
        content,
        model: MODEL.to_string(),
    }))
}
