use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;

text_enum! {
    /// The seven fixed phases of a dependency case, in order.
    pub enum StageKey {
        CaseOpening => "case_opening",
        Detention => "detention",
        Jurisdiction => "jurisdiction",
        Disposition => "disposition",
        Review => "review",
        Permanency => "permanency",
        Reunification => "reunification",
    }
}

text_enum! {
    pub enum StageStatus {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Completed => "completed",
    }
}

/// One checklist item inside a stage's `tasks` JSONB list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTask {
    pub task: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimelineStageRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stage_key: StageKey,
    pub stage_name: String,
    pub stage_order: i32,
    pub status: StageStatus,
    pub court_date: Option<NaiveDate>,
    pub tasks: Json<Vec<StageTask>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
