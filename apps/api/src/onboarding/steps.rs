//! Pure step sequencing for the intake questionnaire.

use serde::{Deserialize, Serialize};

use crate::models::profile::{CourtHistory, ProfileRow, Role};

/// Number of question screens; `Complete` is the virtual step after them.
pub const QUESTION_COUNT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Name,
    ChildrenStatus,
    Lawyer,
    CaseManager,
    CourtHistory,
    StageSelection,
    NextCourtDate,
    Concerns,
    TextReminders,
    ReminderTiming,
    Complete,
}

const ORDER: [Step; 11] = [
    Step::Name,
    Step::ChildrenStatus,
    Step::Lawyer,
    Step::CaseManager,
    Step::CourtHistory,
    Step::StageSelection,
    Step::NextCourtDate,
    Step::Concerns,
    Step::TextReminders,
    Step::ReminderTiming,
    Step::Complete,
];

impl Step {
    /// 1-based position as stored in `profiles.intake_step`.
    pub fn number(self) -> i32 {
        ORDER.iter().position(|s| *s == self).unwrap_or(0) as i32 + 1
    }

    pub fn from_number(n: i32) -> Option<Step> {
        usize::try_from(n - 1).ok().and_then(|i| ORDER.get(i).copied())
    }

    fn successor(self) -> Step {
        Step::from_number(self.number() + 1).unwrap_or(Step::Complete)
    }

    fn predecessor(self) -> Option<Step> {
        Step::from_number(self.number() - 1)
    }

    /// Questions only asked of parents.
    pub fn applies_to(self, role: Role) -> bool {
        self != Step::ChildrenStatus || role == Role::Parent
    }
}

/// The answers that decide which screens get skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowContext {
    pub role: Role,
    pub court_history: Option<CourtHistory>,
    pub text_reminders_enabled: bool,
}

impl FlowContext {
    pub fn from_profile(profile: &ProfileRow) -> Self {
        Self {
            role: profile.role,
            court_history: profile.court_history,
            text_reminders_enabled: profile.text_reminders_enabled,
        }
    }

    fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }

    fn has_been_to_court(&self) -> bool {
        self.court_history == Some(CourtHistory::BeenToCourt)
    }
}

/// Step that follows `step` once it has been answered.
pub fn advance(step: Step, ctx: &FlowContext) -> Step {
    match step {
        Step::Name | Step::ChildrenStatus if !ctx.is_parent() => Step::Lawyer,
        Step::CourtHistory if !ctx.has_been_to_court() => Step::NextCourtDate,
        Step::TextReminders if !ctx.text_reminders_enabled => Step::Complete,
        Step::ReminderTiming | Step::Complete => Step::Complete,
        other => other.successor(),
    }
}

/// Step shown by "Back", mirroring the skips in [`advance`]. `None` on the first step.
pub fn back(step: Step, ctx: &FlowContext) -> Option<Step> {
    match step {
        Step::Lawyer if !ctx.is_parent() => Some(Step::Name),
        Step::NextCourtDate if !ctx.has_been_to_court() => Some(Step::CourtHistory),
        Step::Complete if !ctx.text_reminders_enabled => Some(Step::TextReminders),
        other => other.predecessor(),
    }
}

/// Where a returning user picks up.
pub fn resume(profile: &ProfileRow) -> Step {
    if profile.intake_completed {
        return Step::Complete;
    }
    Step::from_number(profile.intake_step.clamp(1, QUESTION_COUNT)).unwrap_or(Step::Name)
}
