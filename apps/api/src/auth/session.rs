//! Bearer sessions: storage plus the request extractors built on them.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::auth::tokens::{generate_token, hash_token};
use crate::auth::AuthError;
use crate::errors::AppError;
use crate::models::user::{SessionKind, SessionRow};
use crate::state::AppState;

/// A freshly issued session. `token` is returned to the client exactly once.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn create_session(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    kind: SessionKind,
    ttl: Duration,
) -> Result<IssuedSession, AppError> {
    let token = generate_token();
    let expires_at = Utc::now() + ttl;

    sqlx::query(
        "INSERT INTO sessions (token_hash, user_id, kind, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(hash_token(&token))
    .bind(user_id)
    .bind(kind)
    .bind(expires_at)
    .execute(executor)
    .await?;

    info!(%user_id, kind = %kind, "Session created");
    Ok(IssuedSession { token, expires_at })
}

/// Live (unexpired) session for a token hash.
pub async fn find_session(pool: &PgPool, token_hash: &str) -> Result<Option<SessionRow>, AppError> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT token_hash, user_id, kind, expires_at, created_at
         FROM sessions
         WHERE token_hash = $1 AND expires_at > now()",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn revoke_session(pool: &PgPool, token_hash: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn revoke_all_sessions(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<SessionRow, AppError> {
    let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
    find_session(&state.db, &hash_token(token))
        .await?
        .ok_or_else(|| AuthError::SessionExpired.into())
}

/// The signed-in user behind a standard session.
/// Recovery sessions are rejected with `RECOVERY_SESSION`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = resolve(parts, state).await?;
        if session.kind == SessionKind::Recovery {
            return Err(AuthError::RecoveryOnly.into());
        }
        Ok(AuthUser {
            user_id: session.user_id,
        })
    }
}

/// Any live session, including one issued from a reset link.
/// Only sign-out and password change accept this.
#[derive(Debug, Clone)]
pub struct AnySession {
    pub user_id: Uuid,
    pub token_hash: String,
    pub kind: SessionKind,
}

#[async_trait]
impl FromRequestParts<AppState> for AnySession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = resolve(parts, state).await?;
        Ok(AnySession {
            user_id: session.user_id,
            token_hash: session.token_hash,
            kind: session.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
