use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;

text_enum! {
    pub enum NoteCategory {
        Personal => "Personal",
        Court => "Court",
        Visit => "Visit",
        Meeting => "Meeting",
        Other => "Other",
    }
}

impl Default for NoteCategory {
    fn default() -> Self {
        NoteCategory::Personal
    }
}

text_enum! {
    /// Court-related roles a saved contact can hold.
    pub enum ContactRole {
        Attorney => "Attorney",
        SocialWorker => "Social Worker",
        CaseManager => "Case Manager",
        Casa => "CASA",
        Therapist => "Therapist",
        Supervisor => "Supervisor",
        Judge => "Judge",
        Other => "Other",
    }
}

impl ContactRole {
    /// Lowercase key the web client uses in URLs and selects.
    pub fn key(&self) -> &'static str {
        match self {
            ContactRole::Attorney => "attorney",
            ContactRole::SocialWorker => "social_worker",
            ContactRole::CaseManager => "case_manager",
            ContactRole::Casa => "casa",
            ContactRole::Therapist => "therapist",
            ContactRole::Supervisor => "supervisor",
            ContactRole::Judge => "judge",
            ContactRole::Other => "other",
        }
    }

    /// Accepts either the client key (`social_worker`) or the stored value (`Social Worker`).
    pub fn from_value(value: &str) -> Option<Self> {
        ContactRole::ALL
            .iter()
            .copied()
            .find(|r| r.key() == value || r.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactRole::Attorney => "Attorney",
            ContactRole::SocialWorker => "Social Worker",
            ContactRole::CaseManager => "Case Manager",
            ContactRole::Casa => "CASA (Court Advocate)",
            ContactRole::Therapist => "Therapist",
            ContactRole::Supervisor => "Visitation Supervisor",
            ContactRole::Judge => "Judge/Referee",
            ContactRole::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: NoteCategory,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub role: ContactRole,
    pub phone: String,
    pub email: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourtInfoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub county: String,
    pub presiding_judge: String,
    pub next_court_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
