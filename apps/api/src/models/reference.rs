use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;

text_enum! {
    pub enum GlossaryCategory {
        LegalTerms => "Legal Terms",
        Acronyms => "Acronyms",
        Roles => "Roles",
        Process => "Process",
        General => "General",
    }
}

text_enum! {
    pub enum LegalCategory {
        Statutes => "statutes",
        Rights => "rights",
        Procedures => "procedures",
        Forms => "forms",
    }
}

impl LegalCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            LegalCategory::Statutes => "Statutes & Laws",
            LegalCategory::Rights => "Your Rights",
            LegalCategory::Procedures => "Court Procedures",
            LegalCategory::Forms => "Forms & Templates",
        }
    }

    /// Accepts either the stored key or the display name shown on filter chips.
    pub fn from_label(label: &str) -> Option<Self> {
        LegalCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == label || c.display_name() == label)
    }
}

text_enum! {
    /// Tab a right or duty is listed under.
    pub enum RightsRole {
        Parents => "Parents",
        Youth => "Youth",
        Duties => "Duties",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GlossaryTermRow {
    pub id: Uuid,
    pub term: String,
    pub category: GlossaryCategory,
    pub definition: String,
    pub spanish_term: String,
    pub spanish_definition: String,
    pub related_terms: Vec<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsection {
    pub section: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LegalContentRow {
    pub id: Uuid,
    pub title: String,
    pub category: LegalCategory,
    pub description: String,
    pub full_content: String,
    pub plain_language: String,
    pub legal_reference: String,
    pub related_topics: Vec<String>,
    pub external_link: String,
    pub subsections: Json<Vec<Subsection>>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RightDutyRow {
    pub id: Uuid,
    pub title: String,
    pub role: RightsRole,
    pub state: String,
    pub description: String,
    pub full_content: String,
    pub legal_reference: String,
    pub plain_language: String,
    pub practical_tips: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Local service listing. Category, type, and county are open-ended text
/// maintained by the content team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResourceRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub resource_type: String,
    pub county: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub website: String,
    pub languages: Vec<String>,
    pub cost: String,
    pub availability_note: String,
    pub is_example: bool,
    pub click_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
