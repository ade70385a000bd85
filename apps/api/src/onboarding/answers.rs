//! One answer per question screen: validation and how it lands on the profile.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::types::Json;

use crate::errors::AppError;
use crate::models::profile::{
    ChildrenStatus, CourtHistory, ProfileRow, ReminderSettings, Representation, Role,
};
use crate::models::timeline::StageKey;
use crate::onboarding::steps::Step;

const MIN_PHONE_LEN: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepAnswer {
    Name {
        first_name: String,
    },
    ChildrenStatus {
        children_status: Option<ChildrenStatus>,
    },
    Lawyer {
        has_lawyer: Option<Representation>,
        #[serde(default)]
        lawyer_name: String,
        #[serde(default)]
        lawyer_phone: String,
    },
    CaseManager {
        has_case_manager: Option<Representation>,
        #[serde(default)]
        case_manager_name: String,
        #[serde(default)]
        case_manager_phone: String,
    },
    CourtHistory {
        court_history: Option<CourtHistory>,
    },
    StageSelection {
        #[serde(default)]
        stages: Vec<StageKey>,
    },
    NextCourtDate {
        next_court_date: Option<NaiveDate>,
    },
    Concerns {
        #[serde(default)]
        primary_concerns: String,
    },
    TextReminders {
        enabled: bool,
        #[serde(default)]
        phone_number: String,
    },
    ReminderTiming {
        #[serde(default)]
        settings: ReminderSettings,
    },
}

fn invalid(msg: &str) -> AppError {
    AppError::Validation(msg.to_string())
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// A "yes" answer needs both a name and a phone number.
fn validate_representative(
    answer: Option<Representation>,
    name: &str,
    phone: &str,
    missing_choice: &str,
    who: &str,
) -> Result<Representation, AppError> {
    let answer = answer.ok_or_else(|| invalid(missing_choice))?;
    if answer == Representation::Yes && (name.trim().is_empty() || phone.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "Please enter your {who}'s name and phone number."
        )));
    }
    Ok(answer)
}

impl StepAnswer {
    pub fn step(&self) -> Step {
        match self {
            StepAnswer::Name { .. } => Step::Name,
            StepAnswer::ChildrenStatus { .. } => Step::ChildrenStatus,
            StepAnswer::Lawyer { .. } => Step::Lawyer,
            StepAnswer::CaseManager { .. } => Step::CaseManager,
            StepAnswer::CourtHistory { .. } => Step::CourtHistory,
            StepAnswer::StageSelection { .. } => Step::StageSelection,
            StepAnswer::NextCourtDate { .. } => Step::NextCourtDate,
            StepAnswer::Concerns { .. } => Step::Concerns,
            StepAnswer::TextReminders { .. } => Step::TextReminders,
            StepAnswer::ReminderTiming { .. } => Step::ReminderTiming,
        }
    }

    /// Same gate the "Next" button applies on each screen.
    pub fn validate(&self, role: Role) -> Result<(), AppError> {
        if !self.step().applies_to(role) {
            return Err(invalid("This question doesn't apply to your role."));
        }
        match self {
            StepAnswer::Name { first_name } => {
                if first_name.trim().is_empty() {
                    return Err(invalid("Please enter your first name."));
                }
            }
            StepAnswer::ChildrenStatus { children_status } => {
                if children_status.is_none() {
                    return Err(invalid("Please choose where your children are living."));
                }
            }
            StepAnswer::Lawyer {
                has_lawyer,
                lawyer_name,
                lawyer_phone,
            } => {
                validate_representative(
                    *has_lawyer,
                    lawyer_name,
                    lawyer_phone,
                    "Please let us know if you have a lawyer.",
                    "lawyer",
                )?;
            }
            StepAnswer::CaseManager {
                has_case_manager,
                case_manager_name,
                case_manager_phone,
            } => {
                validate_representative(
                    *has_case_manager,
                    case_manager_name,
                    case_manager_phone,
                    "Please let us know if you have a case manager.",
                    "case manager",
                )?;
            }
            StepAnswer::CourtHistory { court_history } => {
                if court_history.is_none() {
                    return Err(invalid("Please tell us whether you've been to court."));
                }
            }
            StepAnswer::StageSelection { stages } => {
                if stages.is_empty() {
                    return Err(invalid("Please select at least one stage."));
                }
            }
            StepAnswer::TextReminders {
                enabled: true,
                phone_number,
            } => {
                if phone_number.trim().chars().count() < MIN_PHONE_LEN {
                    return Err(invalid("Please enter a valid phone number."));
                }
            }
            StepAnswer::NextCourtDate { .. }
            | StepAnswer::Concerns { .. }
            | StepAnswer::TextReminders { .. }
            | StepAnswer::ReminderTiming { .. } => {}
        }
        Ok(())
    }

    /// Writes the answer's fields onto the profile. Call after [`validate`](Self::validate).
    pub fn apply(self, profile: &mut ProfileRow) {
        match self {
            StepAnswer::Name { first_name } => {
                let first_name = first_name.trim().to_string();
                profile.full_name = Some(first_name.clone());
                profile.first_name = first_name;
            }
            StepAnswer::ChildrenStatus { children_status } => {
                profile.children_status = children_status;
            }
            StepAnswer::Lawyer {
                has_lawyer,
                lawyer_name,
                lawyer_phone,
            } => {
                let yes = has_lawyer == Some(Representation::Yes);
                profile.has_lawyer = has_lawyer;
                profile.lawyer_name = if yes { non_blank(&lawyer_name) } else { None };
                profile.lawyer_phone = if yes { non_blank(&lawyer_phone) } else { None };
            }
            StepAnswer::CaseManager {
                has_case_manager,
                case_manager_name,
                case_manager_phone,
            } => {
                let yes = has_case_manager == Some(Representation::Yes);
                profile.has_case_manager = has_case_manager;
                profile.case_manager_name = if yes { non_blank(&case_manager_name) } else { None };
                profile.case_manager_phone = if yes {
                    non_blank(&case_manager_phone)
                } else {
                    None
                };
            }
            StepAnswer::CourtHistory { court_history } => {
                profile.court_history = court_history;
            }
            StepAnswer::StageSelection { stages } => {
                profile.current_stage = stages.last().copied();
            }
            StepAnswer::NextCourtDate { next_court_date } => {
                profile.next_court_date = next_court_date;
            }
            StepAnswer::Concerns { primary_concerns } => {
                profile.primary_concerns = non_blank(&primary_concerns);
            }
            StepAnswer::TextReminders {
                enabled,
                phone_number,
            } => {
                profile.text_reminders_enabled = enabled;
                profile.phone_number = if enabled { non_blank(&phone_number) } else { None };
            }
            StepAnswer::ReminderTiming { settings } => {
                profile.reminder_settings = Some(Json(settings));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{sample_profile, ReminderTiming};

    fn parse(value: serde_json::Value) -> StepAnswer {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_name_sets_first_and_full_name() {
        let answer = parse(serde_json::json!({"step": "name", "first_name": "  Maria "}));
        assert!(answer.validate(Role::Parent).is_ok());
        let mut profile = sample_profile(Role::Parent);
        answer.apply(&mut profile);
        assert_eq!(profile.first_name, "Maria");
        assert_eq!(profile.full_name.as_deref(), Some("Maria"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let answer = parse(serde_json::json!({"step": "name", "first_name": "   "}));
        assert!(answer.validate(Role::Youth).is_err());
    }

    #[test]
    fn test_children_status_is_parent_only() {
        let answer = parse(serde_json::json!({"step": "children_status", "children_status": "removed"}));
        assert!(answer.validate(Role::Parent).is_ok());
        assert!(answer.validate(Role::Supporter).is_err());

        let missing = parse(serde_json::json!({"step": "children_status", "children_status": null}));
        assert!(missing.validate(Role::Parent).is_err());
    }

    #[test]
    fn test_lawyer_yes_requires_contact_details() {
        let bare = parse(serde_json::json!({"step": "lawyer", "has_lawyer": "yes"}));
        assert!(bare.validate(Role::Parent).is_err());

        let full = parse(serde_json::json!({
            "step": "lawyer", "has_lawyer": "yes",
            "lawyer_name": "J. Ortiz", "lawyer_phone": "5551234567"
        }));
        assert!(full.validate(Role::Parent).is_ok());

        let unsure = parse(serde_json::json!({"step": "lawyer", "has_lawyer": "unsure"}));
        assert!(unsure.validate(Role::Parent).is_ok());

        let none = parse(serde_json::json!({"step": "lawyer", "has_lawyer": null}));
        assert!(none.validate(Role::Parent).is_err());
    }

    #[test]
    fn test_lawyer_no_clears_details() {
        let mut profile = sample_profile(Role::Parent);
        profile.lawyer_name = Some("Old".into());
        parse(serde_json::json!({"step": "lawyer", "has_lawyer": "no", "lawyer_name": "X"}))
            .apply(&mut profile);
        assert_eq!(profile.has_lawyer, Some(Representation::No));
        assert_eq!(profile.lawyer_name, None);
    }

    #[test]
    fn test_stage_selection_takes_last_stage() {
        let empty = parse(serde_json::json!({"step": "stage_selection", "stages": []}));
        assert!(empty.validate(Role::Parent).is_err());

        let answer = parse(serde_json::json!({
            "step": "stage_selection", "stages": ["case_opening", "detention", "jurisdiction"]
        }));
        let mut profile = sample_profile(Role::Parent);
        answer.apply(&mut profile);
        assert_eq!(profile.current_stage, Some(StageKey::Jurisdiction));
    }

    #[test]
    fn test_text_reminders_phone_rules() {
        let short = parse(serde_json::json!({"step": "text_reminders", "enabled": true, "phone_number": " 555-1234 "}));
        assert!(short.validate(Role::Parent).is_err());

        let ok = parse(serde_json::json!({"step": "text_reminders", "enabled": true, "phone_number": "(555) 123-4567"}));
        assert!(ok.validate(Role::Parent).is_ok());

        let off = parse(serde_json::json!({"step": "text_reminders", "enabled": false, "phone_number": "1"}));
        assert!(off.validate(Role::Parent).is_ok());
        let mut profile = sample_profile(Role::Parent);
        profile.phone_number = Some("5551234567".into());
        off.apply(&mut profile);
        assert!(!profile.text_reminders_enabled);
        assert_eq!(profile.phone_number, None);
    }

    #[test]
    fn test_reminder_timing_defaults_when_omitted() {
        let answer = parse(serde_json::json!({"step": "reminder_timing"}));
        let mut profile = sample_profile(Role::Parent);
        answer.apply(&mut profile);
        assert_eq!(profile.reminder_settings(), ReminderSettings::default());

        let custom = parse(serde_json::json!({"step": "reminder_timing", "settings": {
            "courtHearings": {"enabled": true, "timing": "1_week"},
            "appointments": {"enabled": false, "timing": "1_day"},
            "tasks": {"enabled": true, "timing": "3_days"},
            "visits": {"enabled": true, "timing": "2_hours"}
        }}));
        custom.apply(&mut profile);
        assert_eq!(
            profile.reminder_settings().court_hearings.timing,
            ReminderTiming::OneWeek
        );
        assert!(!profile.reminder_settings().appointments.enabled);
    }
}
