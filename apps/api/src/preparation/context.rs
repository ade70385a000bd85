//! Turns a preparation request into the prompt and context the generators use.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::preparation::{MeetingRole, PrepType};
use crate::models::profile::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct PrepRequest {
    pub prep_type: PrepType,
    pub meeting_role: Option<MeetingRole>,
    pub concerns: String,
}

/// A validated request, enriched with who is asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideRequest {
    pub prep_type: PrepType,
    pub meeting_role: Option<MeetingRole>,
    pub concerns: String,
    pub role: Role,
    /// Title of the user's current timeline stage, when known.
    pub current_stage: Option<String>,
}

impl PrepRequest {
    /// Concerns must be non-blank; a meeting needs to say who it is with.
    /// A meeting role sent with any other type is dropped.
    pub fn validate(
        self,
        role: Role,
        current_stage: Option<String>,
    ) -> Result<GuideRequest, AppError> {
        let concerns = self.concerns.trim().to_string();
        if concerns.is_empty() {
            return Err(AppError::Validation(
                "Please share what's on your mind so we can help you prepare.".to_string(),
            ));
        }
        let meeting_role = match self.prep_type {
            PrepType::Meeting => Some(self.meeting_role.ok_or_else(|| {
                AppError::Validation("Please choose who you're meeting with.".to_string())
            })?),
            PrepType::Hearing | PrepType::AfterHearing => None,
        };
        Ok(GuideRequest {
            prep_type: self.prep_type,
            meeting_role,
            concerns,
            role,
            current_stage,
        })
    }
}

impl GuideRequest {
    /// What the guide is for, phrased for the remote `/prepare` endpoint.
    pub fn context(&self) -> String {
        match (self.prep_type, self.meeting_role) {
            (PrepType::Hearing, _) => {
                "preparing for a court hearing in California dependency court".to_string()
            }
            (PrepType::Meeting, Some(with)) => format!(
                "preparing for a meeting with {} in California dependency court",
                with.label()
            ),
            (PrepType::Meeting, None) => "preparing for a meeting with caseworker, attorney, CASA, or social worker in California dependency court".to_string(),
            (PrepType::AfterHearing, _) => {
                "reflecting after a court hearing in California dependency court".to_string()
            }
        }
    }

    /// The user's concerns, plus who the meeting is with.
    pub fn prompt(&self) -> String {
        match (self.prep_type, self.meeting_role) {
            (PrepType::Meeting, Some(with)) => format!(
                "{} I am preparing for a meeting with my {}.",
                self.concerns,
                with.label()
            ),
            _ => self.concerns.clone(),
        }
    }
}
