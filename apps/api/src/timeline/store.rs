use anyhow::anyhow;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::timeline::{StageStatus, StageTask, TimelineStageRow};
use crate::timeline::template::STAGES;

const SELECT_STAGES: &str = "SELECT id, user_id, stage_key, stage_name, stage_order, status,
        court_date, tasks, created_at, updated_at
     FROM timeline_stages
     WHERE user_id = $1
     ORDER BY stage_order";

pub async fn list_stages(pool: &PgPool, user_id: Uuid) -> Result<Vec<TimelineStageRow>, AppError> {
    let rows = sqlx::query_as::<_, TimelineStageRow>(SELECT_STAGES)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Loads the user's stages inside a transaction, locking them for update.
pub async fn lock_stages(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Vec<TimelineStageRow>, AppError> {
    let sql = format!("{SELECT_STAGES} FOR UPDATE");
    let rows = sqlx::query_as::<_, TimelineStageRow>(&sql)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Seeds all seven stages on first visit. Stage 1 starts in progress.
/// Concurrent first visits are absorbed by the (user_id, stage_order) key.
pub async fn initialize(pool: &PgPool, user_id: Uuid) -> Result<Vec<TimelineStageRow>, AppError> {
    let mut tx = pool.begin().await?;
    for stage in STAGES.iter() {
        let status = if stage.order == 1 {
            StageStatus::InProgress
        } else {
            StageStatus::NotStarted
        };
        let tasks: Vec<StageTask> = stage
            .tasks
            .iter()
            .map(|task| StageTask {
                task: task.to_string(),
                completed: false,
            })
            .collect();

        sqlx::query(
            "INSERT INTO timeline_stages
                (id, user_id, stage_key, stage_name, stage_order, status, tasks)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id, stage_order) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(stage.key)
        .bind(stage.title)
        .bind(stage.order)
        .bind(status)
        .bind(Json(tasks))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    info!(%user_id, "Timeline initialized");

    list_stages(pool, user_id).await
}

pub async fn load_or_initialize(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TimelineStageRow>, AppError> {
    let stages = list_stages(pool, user_id).await?;
    if !stages.is_empty() {
        return Ok(stages);
    }
    let stages = initialize(pool, user_id).await?;
    if stages.len() != STAGES.len() {
        return Err(anyhow!("timeline for {user_id} has {} stages after initialization", stages.len()).into());
    }
    Ok(stages)
}

pub async fn save_tasks(conn: &mut PgConnection, stage: &TimelineStageRow) -> Result<(), AppError> {
    sqlx::query("UPDATE timeline_stages SET tasks = $1, updated_at = now() WHERE id = $2")
        .bind(&stage.tasks)
        .bind(stage.id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Persists the status of every stage listed in `changed`.
pub async fn save_statuses(
    conn: &mut PgConnection,
    stages: &[TimelineStageRow],
    changed: &[Uuid],
) -> Result<(), AppError> {
    for stage in stages.iter().filter(|s| changed.contains(&s.id)) {
        sqlx::query("UPDATE timeline_stages SET status = $1, updated_at = now() WHERE id = $2")
            .bind(stage.status)
            .bind(stage.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn set_court_date(
    pool: &PgPool,
    user_id: Uuid,
    stage_id: Uuid,
    court_date: Option<NaiveDate>,
) -> Result<TimelineStageRow, AppError> {
    sqlx::query_as::<_, TimelineStageRow>(
        "UPDATE timeline_stages SET court_date = $1, updated_at = now()
         WHERE id = $2 AND user_id = $3
         RETURNING *",
    )
    .bind(court_date)
    .bind(stage_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Stage {stage_id} not found")))
}
