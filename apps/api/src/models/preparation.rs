use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;

text_enum! {
    pub enum PrepType {
        Hearing => "hearing",
        Meeting => "meeting",
        AfterHearing => "after_hearing",
    }
}

impl PrepType {
    /// Heading used for exports and saved notes.
    pub fn title(&self) -> &'static str {
        match self {
            PrepType::Hearing => "Before a Hearing",
            PrepType::Meeting => "Before a Meeting",
            PrepType::AfterHearing => "After a Hearing",
        }
    }
}

text_enum! {
    /// Who the user is meeting with when preparing for a meeting.
    pub enum MeetingRole {
        Attorney => "attorney",
        SocialWorker => "social_worker",
        Casa => "casa",
        Therapist => "therapist",
        Other => "other",
    }
}

impl MeetingRole {
    pub fn label(&self) -> &'static str {
        match self {
            MeetingRole::Attorney => "Attorney / Lawyer",
            MeetingRole::SocialWorker => "Social Worker / Caseworker",
            MeetingRole::Casa => "CASA Volunteer",
            MeetingRole::Therapist => "Therapist / Counselor",
            MeetingRole::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedGuide {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Audit record of one guide generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PreparationNoteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prep_type: PrepType,
    pub meeting_role: Option<MeetingRole>,
    pub concerns: String,
    pub generated_guide: Json<GeneratedGuide>,
    pub exported: bool,
    pub created_at: DateTime<Utc>,
}
