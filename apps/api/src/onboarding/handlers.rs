use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::account::profiles::{fetch_profile, save_intake};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::onboarding::answers::StepAnswer;
use crate::onboarding::steps::{self, FlowContext, Step, QUESTION_COUNT};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OnboardingView {
    pub step: Step,
    pub step_number: i32,
    pub total_steps: i32,
    pub setup_label: &'static str,
    pub can_go_back: bool,
    pub completed: bool,
    /// Answers stored so far, for prefilling the current screen.
    pub profile: ProfileRow,
}

impl OnboardingView {
    pub fn for_profile(profile: ProfileRow) -> Self {
        let step = steps::resume(&profile);
        let ctx = FlowContext::from_profile(&profile);
        Self {
            step,
            step_number: step.number(),
            total_steps: QUESTION_COUNT,
            setup_label: profile.role.setup_label(),
            can_go_back: !profile.intake_completed && steps::back(step, &ctx).is_some(),
            completed: profile.intake_completed,
            profile,
        }
    }
}

fn ensure_in_progress(profile: &ProfileRow) -> Result<(), AppError> {
    if profile.intake_completed {
        return Err(AppError::Validation(
            "Your setup is already complete.".to_string(),
        ));
    }
    Ok(())
}

/// Applies an answer and moves the profile to the following step.
/// Answers for screens the user has not reached yet are rejected.
pub fn record_answer(profile: &mut ProfileRow, answer: StepAnswer) -> Result<Step, AppError> {
    ensure_in_progress(profile)?;
    let current = steps::resume(profile);
    let answered = answer.step();
    if answered > current {
        return Err(AppError::Validation(
            "Please answer the earlier questions first.".to_string(),
        ));
    }
    answer.validate(profile.role)?;
    answer.apply(profile);

    let next = steps::advance(answered, &FlowContext::from_profile(profile));
    profile.intake_step = next.number();
    profile.intake_completed = next == Step::Complete;
    Ok(next)
}

/// Moves the saved position one screen back, honoring the same skips.
pub fn step_back(profile: &mut ProfileRow) -> Result<Step, AppError> {
    ensure_in_progress(profile)?;
    let current = steps::resume(profile);
    let previous = steps::back(current, &FlowContext::from_profile(profile))
        .ok_or_else(|| AppError::Validation("You're already on the first question.".to_string()))?;
    profile.intake_step = previous.number();
    Ok(previous)
}

/// GET /api/v1/onboarding
pub async fn handle_get_onboarding(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<OnboardingView>, AppError> {
    let profile = fetch_profile(&state.db, user.user_id).await?;
    Ok(Json(OnboardingView::for_profile(profile)))
}

/// POST /api/v1/onboarding/advance
/// The new step is persisted before it is reported back.
pub async fn handle_advance(
    State(state): State<AppState>,
    user: AuthUser,
    Json(answer): Json<StepAnswer>,
) -> Result<Json<OnboardingView>, AppError> {
    let mut profile = fetch_profile(&state.db, user.user_id).await?;
    let answered = answer.step();
    let next = record_answer(&mut profile, answer)?;
    let saved = save_intake(&state.db, &profile).await?;

    info!(user_id = %user.user_id, ?answered, ?next, "Onboarding advanced");
    if saved.intake_completed {
        info!(user_id = %user.user_id, "Onboarding completed");
    }
    Ok(Json(OnboardingView::for_profile(saved)))
}

/// POST /api/v1/onboarding/back
pub async fn handle_back(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<OnboardingView>, AppError> {
    let mut profile = fetch_profile(&state.db, user.user_id).await?;
    step_back(&mut profile)?;
    let saved = save_intake(&state.db, &profile).await?;
    Ok(Json(OnboardingView::for_profile(saved)))
}
