//! Accounts, bearer sessions, and password recovery.
//!
//! The [`session::AuthUser`] extractor is how every other module learns who is
//! calling; handlers never read the `Authorization` header themselves.

use axum::http::StatusCode;
use thiserror::Error;

pub mod handlers;
pub mod notifier;
pub mod password;
pub mod session;
pub mod tokens;
pub mod validation;

pub use session::{AnySession, AuthUser};

/// Authentication failures, each with copy suitable for showing to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no account for this email")]
    UnknownEmail,

    #[error("username already taken")]
    DuplicateUsername,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("password too weak")]
    WeakPassword,

    #[error("too many reset requests")]
    RateLimited,

    #[error("reset link expired or already used")]
    ResetLinkExpired,

    #[error("session expired")]
    SessionExpired,

    #[error("recovery session used outside password reset")]
    RecoveryOnly,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::UnknownEmail => StatusCode::NOT_FOUND,
            AuthError::DuplicateUsername | AuthError::EmailAlreadyRegistered => {
                StatusCode::CONFLICT
            }
            AuthError::WeakPassword | AuthError::ResetLinkExpired => StatusCode::BAD_REQUEST,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::RecoveryOnly => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UnknownEmail => "UNKNOWN_EMAIL",
            AuthError::DuplicateUsername => "DUPLICATE_USERNAME",
            AuthError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            AuthError::WeakPassword => "WEAK_PASSWORD",
            AuthError::RateLimited => "RATE_LIMITED",
            AuthError::ResetLinkExpired => "RESET_LINK_EXPIRED",
            AuthError::SessionExpired => "SESSION_EXPIRED",
            AuthError::RecoveryOnly => "RECOVERY_SESSION",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => {
                "That password doesn't match our records. Please try again."
            }
            AuthError::UnknownEmail => {
                "We couldn't find an account with that email. Would you like to create one?"
            }
            AuthError::DuplicateUsername => {
                "This username is already taken. Please choose another one."
            }
            AuthError::EmailAlreadyRegistered => {
                "An account with this email already exists. Try signing in instead."
            }
            AuthError::WeakPassword => {
                "Please choose a stronger password (at least 6 characters)."
            }
            AuthError::RateLimited => "Too many attempts. Please try again in a few minutes.",
            AuthError::ResetLinkExpired => "This reset link has expired. Please request a new one.",
            AuthError::SessionExpired => "Your session has ended. Please sign in again.",
            AuthError::RecoveryOnly => "Please finish resetting your password first.",
        }
    }
}
