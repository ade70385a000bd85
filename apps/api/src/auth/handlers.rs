use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::account::profiles::fetch_profile;
use crate::auth::notifier::reset_link;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{create_session, revoke_all_sessions, revoke_session, IssuedSession};
use crate::auth::tokens::{generate_token, hash_token};
use crate::auth::validation::{
    normalize_email, resolve_reset_redirect, validate_first_name, validate_new_password,
    validate_username,
};
use crate::auth::{AnySession, AuthError, AuthUser};
use crate::errors::{unique_violation, AppError};
use crate::models::profile::{ProfileRow, Role};
use crate::models::user::{AccountInfo, AccountRow, SessionKind};
use crate::state::AppState;

/// Minimum spacing between two reset emails for one account.
const RESET_REQUEST_COOLDOWN_SECS: i64 = 60;

/// Where the client should send a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Landing {
    Onboarding,
    Dashboard,
}

impl Landing {
    pub fn for_profile(profile: &ProfileRow) -> Self {
        if profile.intake_completed {
            Landing::Dashboard
        } else {
            Landing::Onboarding
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpMetadata {
    pub username: String,
    pub first_name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
    pub metadata: SignUpMetadata,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AccountInfo,
    pub profile: ProfileRow,
    pub landing: Landing,
}

#[derive(Debug, Serialize)]
pub struct CurrentSessionResponse {
    pub user: AccountInfo,
    pub profile: ProfileRow,
    pub landing: Landing,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetResponse {
    pub sent_to: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoverRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RecoveryResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub confirm_password: Option<String>,
}

fn map_sign_up_conflict(err: sqlx::Error) -> AppError {
    match unique_violation(&err).as_deref() {
        Some("profiles_username_key") => AuthError::DuplicateUsername.into(),
        Some("accounts_email_key") => AuthError::EmailAlreadyRegistered.into(),
        _ => AppError::Database(err),
    }
}

async fn fetch_account_by_email(
    state: &AppState,
    email: &str,
) -> Result<Option<AccountRow>, AppError> {
    let row = sqlx::query_as::<_, AccountRow>(
        "SELECT id, email, password_hash, created_at FROM accounts WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&state.db)
    .await?;
    Ok(row)
}

pub(crate) async fn fetch_account(state: &AppState, user_id: Uuid) -> Result<AccountRow, AppError> {
    sqlx::query_as::<_, AccountRow>(
        "SELECT id, email, password_hash, created_at FROM accounts WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Auth(AuthError::SessionExpired))
}

fn session_response(
    issued: IssuedSession,
    account: &AccountRow,
    profile: ProfileRow,
) -> SessionResponse {
    SessionResponse {
        access_token: issued.token,
        expires_at: issued.expires_at,
        user: account.to_info(),
        landing: Landing::for_profile(&profile),
        profile,
    }
}

/// POST /api/v1/auth/sign-up
/// Account, profile, and first session are written in one transaction.
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let first_name = req.metadata.first_name.trim().to_string();
    let username = req.metadata.username.trim().to_string();
    validate_first_name(&first_name)?;
    validate_username(&username)?;
    let email = normalize_email(&req.email)?;
    validate_new_password(&req.password, req.confirm_password.as_deref())?;

    let password_hash = hash_password(&req.password)?;
    let account_id = Uuid::new_v4();

    let mut tx = state.db.begin().await?;

    let account = sqlx::query_as::<_, AccountRow>(
        "INSERT INTO accounts (id, email, password_hash) VALUES ($1, $2, $3)
         RETURNING id, email, password_hash, created_at",
    )
    .bind(account_id)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_sign_up_conflict)?;

    let profile = sqlx::query_as::<_, ProfileRow>(
        "INSERT INTO profiles (id, username, first_name, full_name, role)
         VALUES ($1, $2, $3, $3, $4)
         RETURNING *",
    )
    .bind(account_id)
    .bind(&username)
    .bind(&first_name)
    .bind(req.metadata.role)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_sign_up_conflict)?;

    let issued = create_session(
        &mut *tx,
        account_id,
        SessionKind::Standard,
        Duration::hours(state.config.session_ttl_hours),
    )
    .await?;

    tx.commit().await?;

    info!(user_id = %account_id, role = %profile.role, "Account created");
    Ok((
        StatusCode::CREATED,
        Json(session_response(issued, &account, profile)),
    ))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    let account = fetch_account_by_email(&state, &email)
        .await?
        .ok_or(AuthError::UnknownEmail)?;

    if !verify_password(&req.password, &account.password_hash)? {
        warn!(user_id = %account.id, "Sign-in rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let profile = fetch_profile(&state.db, account.id).await?;
    let issued = create_session(
        &state.db,
        account.id,
        SessionKind::Standard,
        Duration::hours(state.config.session_ttl_hours),
    )
    .await?;

    Ok(Json(session_response(issued, &account, profile)))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    session: AnySession,
) -> Result<StatusCode, AppError> {
    revoke_session(&state.db, &session.token_hash).await?;
    info!(user_id = %session.user_id, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CurrentSessionResponse>, AppError> {
    let account = fetch_account(&state, user.user_id).await?;
    let profile = fetch_profile(&state.db, user.user_id).await?;
    Ok(Json(CurrentSessionResponse {
        user: account.to_info(),
        landing: Landing::for_profile(&profile),
        profile,
    }))
}

fn within_reset_cooldown(last_request: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    last_request.map_or(false, |last| now - last < Duration::seconds(RESET_REQUEST_COOLDOWN_SECS))
}

/// POST /api/v1/auth/password-reset
pub async fn handle_send_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<(StatusCode, Json<PasswordResetResponse>), AppError> {
    let email = normalize_email(&req.email)?;
    let redirect = resolve_reset_redirect(
        req.redirect_url.as_deref(),
        &state.config.password_reset_redirect_url,
    )?;
    let account = fetch_account_by_email(&state, &email)
        .await?
        .ok_or(AuthError::UnknownEmail)?;

    let mut tx = state.db.begin().await?;
    // Row lock serializes concurrent reset requests for one account.
    sqlx::query("SELECT id FROM accounts WHERE id = $1 FOR UPDATE")
        .bind(account.id)
        .execute(&mut *tx)
        .await?;

    let last_request: Option<DateTime<Utc>> = sqlx::query_scalar(
        "SELECT max(created_at) FROM password_resets WHERE user_id = $1",
    )
    .bind(account.id)
    .fetch_one(&mut *tx)
    .await?;

    if within_reset_cooldown(last_request, Utc::now()) {
        warn!(user_id = %account.id, "Password reset throttled");
        return Err(AuthError::RateLimited.into());
    }

    let token = generate_token();
    let expires_at = Utc::now() + Duration::minutes(state.config.password_reset_ttl_minutes);
    sqlx::query(
        "INSERT INTO password_resets (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
    )
    .bind(hash_token(&token))
    .bind(account.id)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    state
        .reset_notifier
        .send_reset_link(&account.email, &reset_link(&redirect, &token))
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PasswordResetResponse {
            sent_to: account.email,
        }),
    ))
}

/// POST /api/v1/auth/recover
/// Consumes a reset token and issues a recovery-only session.
pub async fn handle_recover(
    State(state): State<AppState>,
    Json(req): Json<RecoverRequest>,
) -> Result<Json<RecoveryResponse>, AppError> {
    let user_id: Option<Uuid> = sqlx::query_scalar(
        "UPDATE password_resets SET used_at = now()
         WHERE token_hash = $1 AND used_at IS NULL AND expires_at > now()
         RETURNING user_id",
    )
    .bind(hash_token(req.token.trim()))
    .fetch_optional(&state.db)
    .await?;

    let user_id = user_id.ok_or(AuthError::ResetLinkExpired)?;
    let issued = create_session(
        &state.db,
        user_id,
        SessionKind::Recovery,
        Duration::minutes(state.config.password_reset_ttl_minutes),
    )
    .await?;

    Ok(Json(RecoveryResponse {
        access_token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// PUT /api/v1/auth/password
/// Every session of the user is revoked; the client returns to sign-in.
pub async fn handle_update_password(
    State(state): State<AppState>,
    session: AnySession,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, AppError> {
    validate_new_password(&req.password, req.confirm_password.as_deref())?;
    let password_hash = hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;
    sqlx::query("UPDATE accounts SET password_hash = $1 WHERE id = $2")
        .bind(&password_hash)
        .bind(session.user_id)
        .execute(&mut *tx)
        .await?;
    let revoked = revoke_all_sessions(&mut *tx, session.user_id).await?;
    tx.commit().await?;

    info!(
        user_id = %session.user_id,
        via = %session.kind,
        revoked,
        "Password updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::sample_profile;

    #[test]
    fn test_landing_follows_intake_completion() {
        let mut profile = sample_profile(Role::Parent);
        assert_eq!(Landing::for_profile(&profile), Landing::Onboarding);
        profile.intake_completed = true;
        assert_eq!(Landing::for_profile(&profile), Landing::Dashboard);
    }

    #[test]
    fn test_non_unique_errors_pass_through() {
        assert!(matches!(
            map_sign_up_conflict(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_sign_up_request_shape() {
        let req: SignUpRequest = serde_json::from_value(serde_json::json!({
            "email": "maria@example.org",
            "password": "secret1",
            "metadata": { "username": "maria_r", "first_name": "Maria", "role": "youth" }
        }))
        .unwrap();
        assert_eq!(req.metadata.role, Role::Youth);
        assert!(req.confirm_password.is_none());
    }

    #[test]
    fn test_reset_cooldown_window() {
        let now = Utc::now();
        assert!(!within_reset_cooldown(None, now));
        assert!(within_reset_cooldown(Some(now - Duration::seconds(5)), now));
        assert!(!within_reset_cooldown(
            Some(now - Duration::seconds(RESET_REQUEST_COOLDOWN_SECS)),
            now
        ));
    }
}
