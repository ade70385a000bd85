use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, ReminderSettings};

pub async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}

/// UPDATE for every intake answer plus the saved step. Each column is pushed
/// next to its bind so the two cannot drift apart.
fn intake_update(profile: &ProfileRow) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE profiles SET ");
    let mut set = qb.separated(", ");
    set.push("first_name = ").push_bind_unseparated(&profile.first_name);
    set.push("full_name = ").push_bind_unseparated(&profile.full_name);
    set.push("children_status = ").push_bind_unseparated(profile.children_status);
    set.push("has_lawyer = ").push_bind_unseparated(profile.has_lawyer);
    set.push("lawyer_name = ").push_bind_unseparated(&profile.lawyer_name);
    set.push("lawyer_phone = ").push_bind_unseparated(&profile.lawyer_phone);
    set.push("has_case_manager = ").push_bind_unseparated(profile.has_case_manager);
    set.push("case_manager_name = ").push_bind_unseparated(&profile.case_manager_name);
    set.push("case_manager_phone = ").push_bind_unseparated(&profile.case_manager_phone);
    set.push("court_history = ").push_bind_unseparated(profile.court_history);
    set.push("current_stage = ").push_bind_unseparated(profile.current_stage);
    set.push("next_court_date = ").push_bind_unseparated(profile.next_court_date);
    set.push("primary_concerns = ").push_bind_unseparated(&profile.primary_concerns);
    set.push("text_reminders_enabled = ").push_bind_unseparated(profile.text_reminders_enabled);
    set.push("phone_number = ").push_bind_unseparated(&profile.phone_number);
    set.push("reminder_settings = ").push_bind_unseparated(&profile.reminder_settings);
    set.push("intake_step = ").push_bind_unseparated(profile.intake_step);
    set.push("intake_completed = ").push_bind_unseparated(profile.intake_completed);
    set.push("updated_at = now()");
    qb.push(" WHERE id = ").push_bind(profile.id).push(" RETURNING *");
    qb
}

/// Writes every intake answer plus the saved step in one statement.
pub async fn save_intake(pool: &PgPool, profile: &ProfileRow) -> Result<ProfileRow, AppError> {
    intake_update(profile)
        .build_query_as::<ProfileRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", profile.id)))
}

/// Fields a user may edit from settings. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub next_court_date: Option<NaiveDate>,
    pub primary_concerns: Option<String>,
    pub reminder_settings: Option<ReminderSettings>,
}

impl ProfileUpdate {
    pub fn normalized(self) -> Result<ProfileUpdate, AppError> {
        let first_name = self.first_name.map(|n| n.trim().to_string());
        if first_name.as_deref() == Some("") {
            return Err(AppError::Validation(
                "Please enter your first name.".to_string(),
            ));
        }
        Ok(ProfileUpdate {
            first_name,
            full_name: self.full_name.map(|n| n.trim().to_string()),
            phone_number: self.phone_number.map(|p| p.trim().to_string()),
            primary_concerns: self.primary_concerns.map(|c| c.trim().to_string()),
            ..self
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.full_name.is_none()
            && self.phone_number.is_none()
            && self.next_court_date.is_none()
            && self.primary_concerns.is_none()
            && self.reminder_settings.is_none()
    }
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>(
        "UPDATE profiles SET
            first_name = COALESCE($2, first_name),
            full_name = COALESCE($3, full_name),
            phone_number = COALESCE($4, phone_number),
            next_court_date = COALESCE($5, next_court_date),
            primary_concerns = COALESCE($6, primary_concerns),
            reminder_settings = COALESCE($7, reminder_settings),
            updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(&update.first_name)
    .bind(&update.full_name)
    .bind(&update.phone_number)
    .bind(update.next_court_date)
    .bind(&update.primary_concerns)
    .bind(update.reminder_settings.map(Json))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}

pub async fn set_text_reminders(
    pool: &PgPool,
    user_id: Uuid,
    enabled: bool,
) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>(
        "UPDATE profiles SET text_reminders_enabled = $2, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(enabled)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{sample_profile, Role};
    use crate::onboarding::answers::StepAnswer;

    #[test]
    fn test_update_trims_and_rejects_blank_name() {
        let update = ProfileUpdate {
            first_name: Some("  Ana ".to_string()),
            phone_number: Some(" 555-123-4567 ".to_string()),
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(update.first_name.as_deref(), Some("Ana"));
        assert_eq!(update.phone_number.as_deref(), Some("555-123-4567"));

        let blank = ProfileUpdate {
            first_name: Some("   ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_update_detected() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            reminder_settings: Some(ReminderSettings::default()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_intake_update_persists_every_answered_column() {
        let mut profile = sample_profile(Role::Parent);
        let answer: StepAnswer =
            serde_json::from_value(serde_json::json!({"step": "name", "first_name": "Maria"}))
                .unwrap();
        answer.apply(&mut profile);
        assert_eq!(profile.full_name.as_deref(), Some("Maria"));

        let qb = intake_update(&profile);
        let sql = qb.sql();
        for column in [
            "first_name",
            "full_name",
            "children_status",
            "has_lawyer",
            "lawyer_name",
            "lawyer_phone",
            "has_case_manager",
            "case_manager_name",
            "case_manager_phone",
            "court_history",
            "current_stage",
            "next_court_date",
            "primary_concerns",
            "text_reminders_enabled",
            "phone_number",
            "reminder_settings",
            "intake_step",
            "intake_completed",
        ] {
            assert!(sql.contains(&format!(" {column} = $")), "{column} not written: {sql}");
        }
        assert!(sql.contains("WHERE id = $19"), "{sql}");
        assert!(sql.ends_with(" RETURNING *"));
    }
}
