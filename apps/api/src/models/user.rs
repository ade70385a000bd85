use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;

/// Login identity. Never serialized: the hash stays on the server.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AccountRow {
    pub fn to_info(&self) -> AccountInfo {
        AccountInfo {
            id: self.id,
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Client-safe projection of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountInfo {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

text_enum! {
    pub enum SessionKind {
        Standard => "standard",
        /// Issued from a password-reset link; only good for setting a new password.
        Recovery => "recovery",
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub token_hash: String,
    pub user_id: Uuid,
    pub kind: SessionKind,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
