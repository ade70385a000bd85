//! In-memory filtering for the reference library. Every filter only ever
//! removes rows, so a result is always a subset of the full list.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::reference::{
    GlossaryCategory, GlossaryTermRow, LegalCategory, LegalContentRow, ResourceRow, RightDutyRow,
    RightsRole,
};

/// Chip/dropdown values that mean "no filter".
const ALL_SENTINELS: &[&str] = &["All", "All Counties", "All Types"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub role: Option<String>,
    pub county: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// A related-term chip: replaces the search and clears every other filter.
    pub related: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !ALL_SENTINELS.contains(v))
}

impl LibraryQuery {
    /// Applies a `related` chip, if present.
    pub fn reseed(self) -> Self {
        match active(&self.related) {
            Some(term) => LibraryQuery {
                q: Some(term.to_string()),
                ..Default::default()
            },
            None => self,
        }
    }

    /// Lowercased search text, `None` when blank. Not trimmed: a leading
    /// space is part of the substring being matched.
    fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(str::to_lowercase)
    }
}

fn contains_any(needle: &str, haystacks: &[&str]) -> bool {
    haystacks.iter().any(|h| h.to_lowercase().contains(needle))
}

fn parse_filter<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown {what} '{value}'")))
}

pub fn filter_glossary(
    rows: Vec<GlossaryTermRow>,
    query: &LibraryQuery,
) -> Result<Vec<GlossaryTermRow>, AppError> {
    let category = active(&query.category)
        .map(|c| parse_filter::<GlossaryCategory>(c, "glossary category"))
        .transpose()?;
    let needle = query.needle();

    Ok(rows
        .into_iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
        .filter(|t| {
            needle.as_deref().map_or(true, |n| {
                contains_any(
                    n,
                    &[&t.term, &t.definition, &t.spanish_term, t.category.as_str()],
                )
            })
        })
        .collect())
}

pub fn filter_legal(
    rows: Vec<LegalContentRow>,
    query: &LibraryQuery,
) -> Result<Vec<LegalContentRow>, AppError> {
    let category = active(&query.category)
        .map(|c| {
            LegalCategory::from_label(c)
                .ok_or_else(|| AppError::Validation(format!("Unknown legal category '{c}'")))
        })
        .transpose()?;
    let needle = query.needle();

    Ok(rows
        .into_iter()
        .filter(|c| category.map_or(true, |cat| c.category == cat))
        .filter(|c| {
            needle.as_deref().map_or(true, |n| {
                contains_any(
                    n,
                    &[&c.title, &c.description, &c.full_content, &c.plain_language],
                )
            })
        })
        .collect())
}

pub fn filter_rights(
    rows: Vec<RightDutyRow>,
    query: &LibraryQuery,
) -> Result<Vec<RightDutyRow>, AppError> {
    let role = active(&query.role)
        .map(|r| parse_filter::<RightsRole>(r, "rights tab"))
        .transpose()?;
    Ok(rows
        .into_iter()
        .filter(|r| role.map_or(true, |role| r.role == role))
        .collect())
}

pub fn filter_resources(rows: Vec<ResourceRow>, query: &LibraryQuery) -> Vec<ResourceRow> {
    let category = active(&query.category);
    let county = active(&query.county);
    let resource_type = active(&query.resource_type);
    let needle = query.needle();

    rows.into_iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .filter(|r| county.map_or(true, |c| r.county == c))
        .filter(|r| resource_type.map_or(true, |t| r.resource_type == t))
        .filter(|r| {
            needle.as_deref().map_or(true, |n| {
                contains_any(
                    n,
                    &[&r.name, &r.description, &r.resource_type, &r.category],
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn term(term: &str, category: GlossaryCategory, definition: &str, spanish: &str) -> GlossaryTermRow {
        let now = Utc::now();
        GlossaryTermRow {
            id: Uuid::new_v4(),
            term: term.to_string(),
            category,
            definition: definition.to_string(),
            spanish_term: spanish.to_string(),
            spanish_definition: String::new(),
            related_terms: vec![],
            source: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn glossary() -> Vec<GlossaryTermRow> {
        vec![
            term("CASA", GlossaryCategory::Acronyms, "Court Appointed Special Advocate", "Defensor"),
            term("Petition", GlossaryCategory::LegalTerms, "The document that starts a case", "Petición"),
            term("Social Worker", GlossaryCategory::Roles, "County employee assigned to the case", "Trabajador social"),
        ]
    }

    fn legal(title: &str, category: LegalCategory, plain: &str) -> LegalContentRow {
        let now = Utc::now();
        LegalContentRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category,
            description: String::new(),
            full_content: String::new(),
            plain_language: plain.to_string(),
            legal_reference: String::new(),
            related_topics: vec![],
            external_link: String::new(),
            subsections: Json(vec![]),
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn resource(name: &str, category: &str, county: &str, kind: &str) -> ResourceRow {
        let now = Utc::now();
        ResourceRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            resource_type: kind.to_string(),
            county: county.to_string(),
            address: String::new(),
            phone: String::new(),
            hours: String::new(),
            website: String::new(),
            languages: vec![],
            cost: String::new(),
            availability_note: String::new(),
            is_example: false,
            click_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn query(q: &str) -> LibraryQuery {
        LibraryQuery {
            q: Some(q.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let all = filter_glossary(glossary(), &query("   ")).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_glossary_search_covers_spanish_and_category() {
        let hits = filter_glossary(glossary(), &query("petición")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Petition");

        let hits = filter_glossary(glossary(), &query("acronym")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "CASA");
    }

    #[test]
    fn test_glossary_filters_are_anded() {
        let q = LibraryQuery {
            q: Some("case".into()),
            category: Some("Roles".into()),
            ..Default::default()
        };
        let hits = filter_glossary(glossary(), &q).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Social Worker");
    }

    #[test]
    fn test_all_chip_and_unknown_category() {
        let q = LibraryQuery {
            category: Some("All".into()),
            ..Default::default()
        };
        assert_eq!(filter_glossary(glossary(), &q).unwrap().len(), 3);

        let q = LibraryQuery {
            category: Some("Slang".into()),
            ..Default::default()
        };
        assert!(filter_glossary(glossary(), &q).is_err());
    }

    #[test]
    fn test_related_chip_resets_other_filters() {
        let q = LibraryQuery {
            q: Some("zzz".into()),
            category: Some("Roles".into()),
            related: Some("Petition".into()),
            ..Default::default()
        }
        .reseed();
        assert_eq!(q.q.as_deref(), Some("Petition"));
        assert!(q.category.is_none());
        let hits = filter_glossary(glossary(), &q).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_legal_category_accepts_key_or_label() {
        let rows = vec![
            legal("WIC 300", LegalCategory::Statutes, "Why a child can be removed"),
            legal("Right to counsel", LegalCategory::Rights, "You get a lawyer"),
        ];
        for label in ["statutes", "Statutes & Laws"] {
            let q = LibraryQuery {
                category: Some(label.into()),
                ..Default::default()
            };
            let hits = filter_legal(rows.clone(), &q).unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].title, "WIC 300");
        }
        assert_eq!(filter_legal(rows, &query("LAWYER")).unwrap().len(), 1);
    }

    #[test]
    fn test_rights_tab() {
        let now = Utc::now();
        let row = |role| RightDutyRow {
            id: Uuid::new_v4(),
            title: "x".into(),
            role,
            state: "CA".into(),
            description: String::new(),
            full_content: String::new(),
            legal_reference: String::new(),
            plain_language: String::new(),
            practical_tips: String::new(),
            sort_order: 0,
            created_at: now,
            updated_at: now,
        };
        let rows = vec![row(RightsRole::Parents), row(RightsRole::Youth), row(RightsRole::Duties)];
        let q = LibraryQuery {
            role: Some("Youth".into()),
            ..Default::default()
        };
        let hits = filter_rights(rows, &q).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].role, RightsRole::Youth);
    }

    #[test]
    fn test_resource_filters() {
        let rows = vec![
            resource("Parenting Circle", "Parenting Programs", "Los Angeles", "Class"),
            resource("Family Law Clinic", "Legal Services", "Los Angeles", "Clinic"),
            resource("Safe Housing Now", "Housing Assistance", "Alameda", "Program"),
        ];

        let q = LibraryQuery {
            county: Some("Los Angeles".into()),
            resource_type: Some("All Types".into()),
            ..Default::default()
        };
        assert_eq!(filter_resources(rows.clone(), &q).len(), 2);

        let q = LibraryQuery {
            county: Some("Los Angeles".into()),
            q: Some("clinic".into()),
            ..Default::default()
        };
        let hits = filter_resources(rows.clone(), &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Family Law Clinic");

        let q = LibraryQuery {
            category: Some("Housing Assistance".into()),
            county: Some("Los Angeles".into()),
            ..Default::default()
        };
        assert!(filter_resources(rows, &q).is_empty());
    }

    #[test]
    fn test_search_text_keeps_surrounding_spaces() {
        let rows = vec![
            term("Courtroom", GlossaryCategory::General, "Where hearings happen", ""),
            term("Juvenile Court", GlossaryCategory::LegalTerms, "Handles dependency cases", ""),
        ];
        let hits = filter_glossary(rows.clone(), &query(" court")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Juvenile Court");
        assert_eq!(filter_glossary(rows, &query("court")).unwrap().len(), 2);
    }
}
