//! Read-only access to the global reference tables, plus the two counters.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::reference::{GlossaryTermRow, LegalContentRow, ResourceRow, RightDutyRow};

pub async fn list_glossary(pool: &PgPool) -> Result<Vec<GlossaryTermRow>, AppError> {
    let rows = sqlx::query_as::<_, GlossaryTermRow>("SELECT * FROM glossary_terms ORDER BY term")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_legal(pool: &PgPool) -> Result<Vec<LegalContentRow>, AppError> {
    let rows = sqlx::query_as::<_, LegalContentRow>("SELECT * FROM legal_content ORDER BY title")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_rights(pool: &PgPool) -> Result<Vec<RightDutyRow>, AppError> {
    let rows =
        sqlx::query_as::<_, RightDutyRow>("SELECT * FROM rights_duties ORDER BY sort_order, title")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn list_resources(pool: &PgPool) -> Result<Vec<ResourceRow>, AppError> {
    let rows = sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Atomic `+1`; returns the new count.
pub async fn record_resource_click(pool: &PgPool, id: Uuid) -> Result<i32, AppError> {
    sqlx::query_scalar(
        "UPDATE resources SET click_count = click_count + 1 WHERE id = $1 RETURNING click_count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resource {id} not found")))
}

pub async fn record_legal_view(pool: &PgPool, id: Uuid) -> Result<i32, AppError> {
    sqlx::query_scalar(
        "UPDATE legal_content SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Legal topic {id} not found")))
}
