use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;
use crate::models::timeline::StageKey;

text_enum! {
    /// Who the account holder is in the case.
    pub enum Role {
        Parent => "parent",
        Youth => "youth",
        Supporter => "supporter",
    }
}

impl Role {
    pub fn setup_label(&self) -> &'static str {
        match self {
            Role::Parent => "Parent Setup",
            Role::Youth => "Youth Setup",
            Role::Supporter => "Supporter Setup",
        }
    }
}

text_enum! {
    pub enum ChildrenStatus {
        AtHome => "at_home",
        Removed => "removed",
        WithFamily => "with_family",
    }
}

text_enum! {
    /// Answer to "do you have a lawyer / case manager?".
    pub enum Representation {
        Yes => "yes",
        No => "no",
        Unsure => "unsure",
    }
}

text_enum! {
    pub enum CourtHistory {
        NotYet => "not_yet",
        BeenToCourt => "been_to_court",
        Scheduled => "scheduled",
    }
}

text_enum! {
    pub enum ReminderTiming {
        TwoHours => "2_hours",
        OneDay => "1_day",
        ThreeDays => "3_days",
        OneWeek => "1_week",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSetting {
    pub enabled: bool,
    pub timing: ReminderTiming,
}

/// Per-category text reminder preferences, stored as JSONB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub court_hearings: ReminderSetting,
    pub appointments: ReminderSetting,
    pub tasks: ReminderSetting,
    pub visits: ReminderSetting,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        let day = ReminderSetting {
            enabled: true,
            timing: ReminderTiming::OneDay,
        };
        Self {
            court_hearings: day,
            appointments: day,
            tasks: day,
            visits: ReminderSetting {
                enabled: true,
                timing: ReminderTiming::TwoHours,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub children_status: Option<ChildrenStatus>,
    pub has_lawyer: Option<Representation>,
    pub lawyer_name: Option<String>,
    pub lawyer_phone: Option<String>,
    pub has_case_manager: Option<Representation>,
    pub case_manager_name: Option<String>,
    pub case_manager_phone: Option<String>,
    pub court_history: Option<CourtHistory>,
    pub current_stage: Option<StageKey>,
    pub next_court_date: Option<NaiveDate>,
    pub primary_concerns: Option<String>,
    pub text_reminders_enabled: bool,
    pub phone_number: Option<String>,
    pub reminder_settings: Option<Json<ReminderSettings>>,
    pub intake_step: i32,
    pub intake_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// First name when set, then username, for greetings and avatars.
    pub fn display_name(&self) -> &str {
        if self.first_name.trim().is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }

    pub fn initial(&self) -> char {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }

    pub fn reminder_settings(&self) -> ReminderSettings {
        self.reminder_settings
            .as_ref()
            .map(|Json(s)| *s)
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) fn sample_profile(role: Role) -> ProfileRow {
    let now = Utc::now();
    ProfileRow {
        id: Uuid::new_v4(),
        username: "maria_r".to_string(),
        first_name: String::new(),
        full_name: None,
        role,
        children_status: None,
        has_lawyer: None,
        lawyer_name: None,
        lawyer_phone: None,
        has_case_manager: None,
        case_manager_name: None,
        case_manager_phone: None,
        court_history: None,
        current_stage: None,
        next_court_date: None,
        primary_concerns: None,
        text_reminders_enabled: false,
        phone_number: None,
        reminder_settings: None,
        intake_step: 1,
        intake_completed: false,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut profile = sample_profile(Role::Youth);
        assert_eq!(profile.display_name(), "maria_r");
        assert_eq!(profile.initial(), 'M');

        profile.first_name = "ana".to_string();
        assert_eq!(profile.display_name(), "ana");
        assert_eq!(profile.initial(), 'A');
    }

    #[test]
    fn test_default_reminder_settings() {
        let settings = ReminderSettings::default();
        assert_eq!(settings.court_hearings.timing, ReminderTiming::OneDay);
        assert_eq!(settings.visits.timing, ReminderTiming::TwoHours);
        assert!(settings.tasks.enabled);
    }

    #[test]
    fn test_reminder_settings_use_camel_case_keys() {
        let json = serde_json::to_value(ReminderSettings::default()).unwrap();
        assert_eq!(json["courtHearings"]["timing"], "1_day");
    }
}
