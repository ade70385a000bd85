use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::account::masking::{mask_email, mask_phone};
use crate::account::profiles::{fetch_profile, set_text_reminders, update_profile, ProfileUpdate};
use crate::auth::handlers::fetch_account;
use crate::auth::password::verify_password;
use crate::auth::{AuthError, AuthUser};
use crate::errors::AppError;
use crate::models::profile::{ProfileRow, ReminderSettings, Representation, Role};
use crate::models::records::{ContactRow, CourtInfoRow, NoteRow};
use crate::models::timeline::{StageKey, TimelineStageRow};
use crate::records::contacts::list_contacts;
use crate::records::court_info::get_court_info;
use crate::state::AppState;
use crate::timeline::store::list_stages;
use crate::timeline::template::stage_by_key;

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub display_name: String,
    pub initial: char,
    pub role: Role,
    pub masked_email: String,
    pub masked_phone: String,
    pub text_reminders_enabled: bool,
    pub reminder_settings: ReminderSettings,
}

impl SettingsView {
    fn new(profile: &ProfileRow, email: &str) -> Self {
        Self {
            display_name: profile.display_name().to_string(),
            initial: profile.initial(),
            role: profile.role,
            masked_email: mask_email(email),
            masked_phone: mask_phone(profile.phone_number.as_deref()),
            text_reminders_enabled: profile.text_reminders_enabled,
            reminder_settings: profile.reminder_settings(),
        }
    }
}

/// GET /api/v1/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SettingsView>, AppError> {
    let account = fetch_account(&state, user.user_id).await?;
    let profile = fetch_profile(&state.db, user.user_id).await?;
    Ok(Json(SettingsView::new(&profile, &account.email)))
}

/// PATCH /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileRow>, AppError> {
    let update = update.normalized()?;
    if update.is_empty() {
        return Ok(Json(fetch_profile(&state.db, user.user_id).await?));
    }
    let profile = update_profile(&state.db, user.user_id, &update).await?;
    info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(profile))
}

/// POST /api/v1/settings/notifications/toggle
pub async fn handle_toggle_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SettingsView>, AppError> {
    let account = fetch_account(&state, user.user_id).await?;
    let current = fetch_profile(&state.db, user.user_id).await?;
    let profile =
        set_text_reminders(&state.db, user.user_id, !current.text_reminders_enabled).await?;
    info!(
        user_id = %user.user_id,
        enabled = profile.text_reminders_enabled,
        "Text reminders toggled"
    );
    Ok(Json(SettingsView::new(&profile, &account.email)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub profile: ProfileRow,
    pub export_date: DateTime<Utc>,
    pub notes: Vec<NoteRow>,
    pub timeline: Vec<TimelineStageRow>,
    pub contacts: Vec<ContactRow>,
}

pub fn export_file_name(exported_at: DateTime<Utc>) -> String {
    format!("anchor-data-{}.json", exported_at.format("%Y-%m-%d"))
}

/// GET /api/v1/settings/export
/// Everything the user owns, served as a downloadable JSON file.
pub async fn handle_export_data(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = fetch_profile(&state.db, user.user_id).await?;
    let notes = sqlx::query_as::<_, NoteRow>(
        "SELECT * FROM notes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;
    let timeline = list_stages(&state.db, user.user_id).await?;
    let contacts = list_contacts(&state.db, user.user_id, None).await?;

    let export = DataExport {
        profile,
        export_date: Utc::now(),
        notes,
        timeline,
        contacts,
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(export.export_date)
    );

    info!(
        user_id = %user.user_id,
        notes = export.notes.len(),
        contacts = export.contacts.len(),
        "Data exported"
    );
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(export)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /api/v1/account/delete
/// Re-checks the password, then removes every user-owned row and the account together.
pub async fn handle_delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<DeleteAccountRequest>,
) -> Result<StatusCode, AppError> {
    if req.password.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter your password to confirm".to_string(),
        ));
    }
    let account = fetch_account(&state, user.user_id).await?;
    if !verify_password(&req.password, &account.password_hash)? {
        warn!(user_id = %user.user_id, "Account deletion rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let mut tx = state.db.begin().await?;
    for table in [
        "notes",
        "timeline_stages",
        "contacts",
        "court_info",
        "preparation_notes",
        "password_resets",
        "sessions",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
            .bind(user.user_id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(user.user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(user.user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(user_id = %user.user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StageSummary {
    pub key: StageKey,
    pub title: &'static str,
    pub order: i32,
    pub description: &'static str,
    pub what_happens: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct TeamMember {
    pub name: String,
    pub role: &'static str,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub greeting_name: String,
    pub role: Role,
    pub next_court_date: Option<NaiveDate>,
    pub days_until_hearing: Option<String>,
    pub court_info: Option<CourtInfoRow>,
    pub current_stage: Option<StageSummary>,
    pub team: Vec<TeamMember>,
}

/// "Today", "Tomorrow", "3 days away", "2 days ago".
pub fn days_until(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n if n < 0 => format!("{} days ago", -n),
        n => format!("{n} days away"),
    }
}

fn team_for(profile: &ProfileRow) -> Vec<TeamMember> {
    let mut team = Vec::new();
    if profile.has_lawyer == Some(Representation::Yes) {
        if let Some(name) = profile.lawyer_name.clone().filter(|n| !n.is_empty()) {
            team.push(TeamMember {
                name,
                role: "YOUR ATTORNEY",
                phone: profile.lawyer_phone.clone(),
            });
        }
    }
    if profile.has_case_manager == Some(Representation::Yes) {
        if let Some(name) = profile.case_manager_name.clone().filter(|n| !n.is_empty()) {
            team.push(TeamMember {
                name,
                role: "CASE MANAGER",
                phone: profile.case_manager_phone.clone(),
            });
        }
    }
    team
}

impl DashboardView {
    pub fn new(profile: &ProfileRow, court_info: Option<CourtInfoRow>, today: NaiveDate) -> Self {
        let greeting_name = if profile.first_name.trim().is_empty() {
            "there".to_string()
        } else {
            profile.first_name.clone()
        };
        let next_court_date = court_info
            .as_ref()
            .and_then(|c| c.next_court_date)
            .or(profile.next_court_date);
        let current_stage = profile.current_stage.and_then(stage_by_key).map(|s| StageSummary {
            key: s.key,
            title: s.title,
            order: s.order,
            description: s.description,
            what_happens: s.what_happens,
        });

        Self {
            greeting_name,
            role: profile.role,
            next_court_date,
            days_until_hearing: next_court_date.map(|d| days_until(d, today)),
            court_info,
            current_stage,
            team: team_for(profile),
        }
    }
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardView>, AppError> {
    let profile = fetch_profile(&state.db, user.user_id).await?;
    let court_info = get_court_info(&state.db, user.user_id).await?;
    Ok(Json(DashboardView::new(
        &profile,
        court_info,
        Utc::now().date_naive(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::sample_profile;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_until_labels() {
        let today = date(2026, 10, 16);
        assert_eq!(days_until(today, today), "Today");
        assert_eq!(days_until(date(2026, 10, 17), today), "Tomorrow");
        assert_eq!(days_until(date(2026, 10, 23), today), "7 days away");
        assert_eq!(days_until(date(2026, 10, 14), today), "2 days ago");
    }

    #[test]
    fn test_export_file_name_uses_utc_date() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(export_file_name(at), "anchor-data-2026-03-07.json");
    }

    #[test]
    fn test_settings_view_masks_contact_details() {
        let mut profile = sample_profile(Role::Parent);
        profile.first_name = "Ana".to_string();
        profile.phone_number = Some("555-123-4567".to_string());
        let view = SettingsView::new(&profile, "ana.r@example.com");
        assert_eq!(view.display_name, "Ana");
        assert_eq!(view.initial, 'A');
        assert_eq!(view.masked_email, "a***@example.com");
        assert_eq!(view.masked_phone, "(***) ***-4567");
    }

    #[test]
    fn test_dashboard_team_only_lists_confirmed_members() {
        let mut profile = sample_profile(Role::Parent);
        profile.has_lawyer = Some(Representation::Yes);
        profile.lawyer_name = Some("J. Ortiz".to_string());
        profile.has_case_manager = Some(Representation::Unsure);
        profile.case_manager_name = Some("Leftover".to_string());
        profile.current_stage = Some(StageKey::Detention);
        profile.next_court_date = Some(date(2026, 10, 17));

        let view = DashboardView::new(&profile, None, date(2026, 10, 16));
        assert_eq!(view.greeting_name, "there");
        assert_eq!(view.team.len(), 1);
        assert_eq!(view.team[0].role, "YOUR ATTORNEY");
        assert_eq!(view.days_until_hearing.as_deref(), Some("Tomorrow"));
        assert_eq!(view.current_stage.map(|s| s.order), Some(2));
    }
}
