use serde::Deserialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::records::{NoteCategory, NoteRow};

#[derive(Debug, Clone, Deserialize)]
pub struct NoteInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: NoteCategory,
}

impl NoteInput {
    /// Trims fields; a blank title is rejected.
    pub fn normalized(self) -> Result<NoteInput, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation(
                "Please enter a title for your note.".to_string(),
            ));
        }
        Ok(NoteInput {
            title,
            content: self.content.trim().to_string(),
            category: self.category,
        })
    }
}

/// Case-insensitive match over title, content, and category. Blank matches all.
pub fn search_notes(notes: Vec<NoteRow>, query: Option<&str>) -> Vec<NoteRow> {
    let Some(needle) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return notes;
    };
    let needle = needle.to_lowercase();
    notes
        .into_iter()
        .filter(|n| {
            n.title.to_lowercase().contains(&needle)
                || n.content.to_lowercase().contains(&needle)
                || n.category.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Pinned first, then newest.
pub async fn list_notes(pool: &PgPool, user_id: Uuid) -> Result<Vec<NoteRow>, AppError> {
    let rows = sqlx::query_as::<_, NoteRow>(
        "SELECT * FROM notes WHERE user_id = $1 ORDER BY is_pinned DESC, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Expects an already-normalized input.
pub async fn insert_note(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    input: &NoteInput,
) -> Result<NoteRow, AppError> {
    let row = sqlx::query_as::<_, NoteRow>(
        "INSERT INTO notes (id, user_id, title, content, category)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.category)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

fn note_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Note {id} not found"))
}

pub async fn update_note(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    input: &NoteInput,
) -> Result<NoteRow, AppError> {
    sqlx::query_as::<_, NoteRow>(
        "UPDATE notes SET title = $1, content = $2, category = $3, updated_at = now()
         WHERE id = $4 AND user_id = $5
         RETURNING *",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.category)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| note_not_found(id))
}

pub async fn toggle_pin(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<NoteRow, AppError> {
    sqlx::query_as::<_, NoteRow>(
        "UPDATE notes SET is_pinned = NOT is_pinned, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| note_not_found(id))
}

pub async fn delete_note(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(note_not_found(id));
    }
    Ok(())
}
