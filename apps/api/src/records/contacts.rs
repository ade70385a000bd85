use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::records::{ContactRole, ContactRow};

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub role: ContactRole,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
}

impl ContactInput {
    pub fn normalized(self) -> Result<ContactInput, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Please enter a name.".to_string()));
        }
        Ok(ContactInput {
            name,
            role: self.role,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Newest first.
pub async fn list_contacts(
    pool: &PgPool,
    user_id: Uuid,
    role: Option<ContactRole>,
) -> Result<Vec<ContactRow>, AppError> {
    let rows = sqlx::query_as::<_, ContactRow>(
        "SELECT * FROM contacts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(filter_by_role(rows, role))
}

/// Exact match on the stored role; `None` keeps every row.
pub fn filter_by_role(rows: Vec<ContactRow>, role: Option<ContactRole>) -> Vec<ContactRow> {
    match role {
        Some(role) => rows.into_iter().filter(|c| c.role == role).collect(),
        None => rows,
    }
}

/// Resolves a `?role=` value. Blank and `all` mean no filter.
pub fn parse_role_filter(value: Option<&str>) -> Result<Option<ContactRole>, AppError> {
    match value.map(str::trim) {
        None | Some("") | Some("all") | Some("All") => Ok(None),
        Some(v) => ContactRole::from_value(v)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown contact role '{v}'"))),
    }
}

pub async fn insert_contact(
    pool: &PgPool,
    user_id: Uuid,
    input: &ContactInput,
) -> Result<ContactRow, AppError> {
    let row = sqlx::query_as::<_, ContactRow>(
        "INSERT INTO contacts (id, user_id, name, role, phone, email, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&input.name)
    .bind(input.role)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.notes)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

fn contact_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Contact {id} not found"))
}

pub async fn update_contact(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    input: &ContactInput,
) -> Result<ContactRow, AppError> {
    sqlx::query_as::<_, ContactRow>(
        "UPDATE contacts
         SET name = $1, role = $2, phone = $3, email = $4, notes = $5, updated_at = now()
         WHERE id = $6 AND user_id = $7
         RETURNING *",
    )
    .bind(&input.name)
    .bind(input.role)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.notes)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| contact_not_found(id))
}

pub async fn delete_contact(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(contact_not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contact(name: &str, role: ContactRole) -> ContactRow {
        let now = Utc::now();
        ContactRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            role,
            phone: String::new(),
            email: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_input_trims_every_field() {
        let input: ContactInput = serde_json::from_value(serde_json::json!({
            "name": " Dana Lee ",
            "role": "Social Worker",
            "phone": " 555-0100 ",
            "email": " dana@county.gov "
        }))
        .unwrap();
        let input = input.normalized().unwrap();
        assert_eq!(input.name, "Dana Lee");
        assert_eq!(input.role, ContactRole::SocialWorker);
        assert_eq!(input.phone, "555-0100");
        assert_eq!(input.email, "dana@county.gov");
        assert_eq!(input.notes, "");
    }

    #[test]
    fn test_name_required() {
        let input = ContactInput {
            name: " ".into(),
            role: ContactRole::Attorney,
            phone: String::new(),
            email: String::new(),
            notes: String::new(),
        };
        assert!(input.normalized().is_err());
    }

    #[test]
    fn test_unknown_role_rejected_at_parse() {
        let parsed: Result<ContactInput, _> =
            serde_json::from_value(serde_json::json!({"name": "X", "role": "Attorney "}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_role_filter_accepts_key_or_stored_value() {
        for value in ["attorney", "Attorney"] {
            assert_eq!(parse_role_filter(Some(value)).unwrap(), Some(ContactRole::Attorney));
        }
        assert_eq!(
            parse_role_filter(Some("social_worker")).unwrap(),
            Some(ContactRole::SocialWorker)
        );
        assert_eq!(parse_role_filter(Some("all")).unwrap(), None);
        assert_eq!(parse_role_filter(None).unwrap(), None);
        assert!(matches!(
            parse_role_filter(Some("lawyer")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_attorney_filter_excludes_case_manager() {
        let rows = vec![
            contact("Ana Ruiz", ContactRole::Attorney),
            contact("Ben Cho", ContactRole::CaseManager),
        ];
        let role = parse_role_filter(Some("attorney")).unwrap();
        let hits = filter_by_role(rows.clone(), role);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ana Ruiz");

        assert_eq!(filter_by_role(rows, None).len(), 2);
    }
}
