use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::records::CourtInfoRow;

pub static CALIFORNIA_COUNTIES: [&str; 58] = [
    "Alameda",
    "Alpine",
    "Amador",
    "Butte",
    "Calaveras",
    "Colusa",
    "Contra Costa",
    "Del Norte",
    "El Dorado",
    "Fresno",
    "Glenn",
    "Humboldt",
    "Imperial",
    "Inyo",
    "Kern",
    "Kings",
    "Lake",
    "Lassen",
    "Los Angeles",
    "Madera",
    "Marin",
    "Mariposa",
    "Mendocino",
    "Merced",
    "Modoc",
    "Mono",
    "Monterey",
    "Napa",
    "Nevada",
    "Orange",
    "Placer",
    "Plumas",
    "Riverside",
    "Sacramento",
    "San Benito",
    "San Bernardino",
    "San Diego",
    "San Francisco",
    "San Joaquin",
    "San Luis Obispo",
    "San Mateo",
    "Santa Barbara",
    "Santa Clara",
    "Santa Cruz",
    "Shasta",
    "Sierra",
    "Siskiyou",
    "Solano",
    "Sonoma",
    "Stanislaus",
    "Sutter",
    "Tehama",
    "Trinity",
    "Tulare",
    "Tuolumne",
    "Ventura",
    "Yolo",
    "Yuba",
];

#[derive(Debug, Clone, Deserialize)]
pub struct CourtInfoInput {
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub presiding_judge: String,
    pub next_court_date: Option<NaiveDate>,
}

impl CourtInfoInput {
    /// County must be blank or one of the 58 California counties.
    pub fn normalized(self) -> Result<CourtInfoInput, AppError> {
        let county = self.county.trim().to_string();
        if !county.is_empty() && !CALIFORNIA_COUNTIES.contains(&county.as_str()) {
            return Err(AppError::Validation(format!(
                "'{county}' is not a California county."
            )));
        }
        Ok(CourtInfoInput {
            county,
            presiding_judge: self.presiding_judge.trim().to_string(),
            next_court_date: self.next_court_date,
        })
    }
}

pub async fn get_court_info(pool: &PgPool, user_id: Uuid) -> Result<Option<CourtInfoRow>, AppError> {
    let row = sqlx::query_as::<_, CourtInfoRow>("SELECT * FROM court_info WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn upsert_court_info(
    pool: &PgPool,
    user_id: Uuid,
    input: &CourtInfoInput,
) -> Result<CourtInfoRow, AppError> {
    let row = sqlx::query_as::<_, CourtInfoRow>(
        "INSERT INTO court_info (id, user_id, county, presiding_judge, next_court_date)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id) DO UPDATE
         SET county = EXCLUDED.county,
             presiding_judge = EXCLUDED.presiding_judge,
             next_court_date = EXCLUDED.next_court_date,
             updated_at = now()
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&input.county)
    .bind(&input.presiding_judge)
    .bind(input.next_court_date)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(county: &str) -> CourtInfoInput {
        CourtInfoInput {
            county: county.to_string(),
            presiding_judge: " Hon. R. Alvarez ".to_string(),
            next_court_date: None,
        }
    }

    #[test]
    fn test_county_list_is_complete_and_sorted() {
        assert_eq!(CALIFORNIA_COUNTIES.len(), 58);
        let mut sorted = CALIFORNIA_COUNTIES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, CALIFORNIA_COUNTIES.to_vec());
    }

    #[test]
    fn test_county_validation() {
        assert!(input("").normalized().is_ok());
        assert!(input(" San Luis Obispo ").normalized().is_ok());
        assert!(input("Cook").normalized().is_err());
        assert!(input("los angeles").normalized().is_err());
    }

    #[test]
    fn test_judge_is_trimmed() {
        let normalized = input("Yolo").normalized().unwrap();
        assert_eq!(normalized.presiding_judge, "Hon. R. Alvarez");
    }
}
