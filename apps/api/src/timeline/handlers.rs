use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::timeline::{StageKey, TimelineStageRow};
use crate::state::AppState;
use crate::timeline::progress::{self, StageProgress};
use crate::timeline::store;
use crate::timeline::template::{stage_by_key, StageTemplate};

#[derive(Debug, Serialize)]
pub struct StageView {
    #[serde(flatten)]
    pub stage: TimelineStageRow,
    pub details: Option<&'static StageTemplate>,
    pub progress: StageProgress,
}

#[derive(Debug, Serialize)]
pub struct TimelineView {
    pub current_stage: Option<StageKey>,
    pub stages: Vec<StageView>,
}

impl TimelineView {
    pub fn new(stages: Vec<TimelineStageRow>) -> Self {
        let current_stage = progress::current_stage(&stages).map(|s| s.stage_key);
        let stages = stages
            .into_iter()
            .map(|stage| StageView {
                details: stage_by_key(stage.stage_key),
                progress: progress::progress(&stage.tasks),
                stage,
            })
            .collect();
        Self {
            current_stage,
            stages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CourtDateRequest {
    pub court_date: Option<NaiveDate>,
}

fn stage_not_found(stage_id: Uuid) -> AppError {
    AppError::NotFound(format!("Stage {stage_id} not found"))
}

/// GET /api/v1/timeline
/// First visit seeds the seven stages.
pub async fn handle_get_timeline(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TimelineView>, AppError> {
    let stages = store::load_or_initialize(&state.db, user.user_id).await?;
    Ok(Json(TimelineView::new(stages)))
}

/// PATCH /api/v1/timeline/stages/:id/tasks/:index
pub async fn handle_toggle_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path((stage_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<TimelineView>, AppError> {
    let mut tx = state.db.begin().await?;
    let mut stages = store::lock_stages(&mut tx, user.user_id).await?;

    let stage = stages
        .iter_mut()
        .find(|s| s.id == stage_id)
        .ok_or_else(|| stage_not_found(stage_id))?;
    let completed = progress::toggle_task(stage, index)
        .ok_or_else(|| AppError::NotFound(format!("Task {index} not found in stage {stage_id}")))?;
    store::save_tasks(&mut tx, stage).await?;

    let changed = progress::auto_progress(&mut stages, stage_id);
    store::save_statuses(&mut tx, &stages, &changed).await?;
    tx.commit().await?;

    info!(user_id = %user.user_id, %stage_id, index, completed, "Timeline task toggled");
    if !changed.is_empty() {
        info!(user_id = %user.user_id, %stage_id, "Stage auto-completed");
    }
    Ok(Json(TimelineView::new(stages)))
}

/// PUT /api/v1/timeline/stages/:id/court-date
pub async fn handle_set_court_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stage_id): Path<Uuid>,
    Json(req): Json<CourtDateRequest>,
) -> Result<Json<TimelineStageRow>, AppError> {
    let stage = store::set_court_date(&state.db, user.user_id, stage_id, req.court_date).await?;
    Ok(Json(stage))
}

/// POST /api/v1/timeline/stages/:id/complete
pub async fn handle_mark_complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(stage_id): Path<Uuid>,
) -> Result<Json<TimelineView>, AppError> {
    let mut tx = state.db.begin().await?;
    let mut stages = store::lock_stages(&mut tx, user.user_id).await?;
    let order = stages
        .iter()
        .find(|s| s.id == stage_id)
        .map(|s| s.stage_order)
        .ok_or_else(|| stage_not_found(stage_id))?;

    let changed = progress::mark_complete(&mut stages, order);
    store::save_statuses(&mut tx, &stages, &changed).await?;
    tx.commit().await?;

    info!(user_id = %user.user_id, %stage_id, order, "Stage marked complete");
    Ok(Json(TimelineView::new(stages)))
}
