//! Intake questionnaire shown after sign-up until `intake_completed` is set.

pub mod answers;
pub mod handlers;
pub mod steps;
