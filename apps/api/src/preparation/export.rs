use chrono::NaiveDate;

use crate::models::preparation::{MeetingRole, PrepType, PreparationNoteRow};

pub const AI_DISCLAIMER: &str = "This guidance is generated by AI based on general dependency court information. Always consult your attorney for advice specific to your case.";

fn meeting_label(prep_type: PrepType, meeting_role: Option<MeetingRole>) -> Option<&'static str> {
    match (prep_type, meeting_role) {
        (PrepType::Meeting, Some(with)) => Some(with.label()),
        _ => None,
    }
}

/// Text for the clipboard and print views.
pub fn export_text(prep: &PreparationNoteRow) -> String {
    let mut text = format!("{}\n\n", prep.prep_type.title());
    if let Some(label) = meeting_label(prep.prep_type, prep.meeting_role) {
        text.push_str(&format!("Meeting with: {label}\n"));
    }
    text.push_str(&format!("Your Concerns: {}\n\n", prep.concerns));
    text.push_str(&format!("{}\n\n", prep.generated_guide.content));
    text.push_str(&format!("---\n{AI_DISCLAIMER}"));
    text
}

/// "Before a Meeting - CASA Volunteer - 10/16/2026"
pub fn note_title(prep_type: PrepType, meeting_role: Option<MeetingRole>, date: NaiveDate) -> String {
    let mut title = prep_type.title().to_string();
    if let Some(label) = meeting_label(prep_type, meeting_role) {
        title.push_str(" - ");
        title.push_str(label);
    }
    title.push_str(&format!(" - {}", date.format("%-m/%-d/%Y")));
    title
}

pub fn note_content(prep: &PreparationNoteRow) -> String {
    let mut content = String::new();
    if let Some(label) = meeting_label(prep.prep_type, prep.meeting_role) {
        content.push_str(&format!("Meeting with: {label}\n"));
    }
    content.push_str(&format!(
        "Concerns: {}\n\n{}",
        prep.concerns, prep.generated_guide.content
    ));
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preparation::GeneratedGuide;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn record(prep_type: PrepType, meeting_role: Option<MeetingRole>) -> PreparationNoteRow {
        PreparationNoteRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            prep_type,
            meeting_role,
            concerns: "More visits".to_string(),
            generated_guide: Json(GeneratedGuide {
                content: "## Key points".to_string(),
                model: None,
            }),
            exported: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_export_text_for_meeting() {
        let text = export_text(&record(PrepType::Meeting, Some(MeetingRole::Therapist)));
        assert_eq!(
            text,
            format!(
                "Before a Meeting\n\nMeeting with: Therapist / Counselor\nYour Concerns: More visits\n\n## Key points\n\n---\n{AI_DISCLAIMER}"
            )
        );
    }

    #[test]
    fn test_export_text_for_hearing_has_no_meeting_line() {
        let text = export_text(&record(PrepType::Hearing, None));
        assert!(text.starts_with("Before a Hearing\n\nYour Concerns:"));
        assert!(!text.contains("Meeting with"));
    }

    #[test]
    fn test_note_title_and_content() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            note_title(PrepType::Meeting, Some(MeetingRole::Casa), date),
            "Before a Meeting - CASA Volunteer - 3/7/2026"
        );
        assert_eq!(
            note_title(PrepType::AfterHearing, None, date),
            "After a Hearing - 3/7/2026"
        );

        let content = note_content(&record(PrepType::Meeting, Some(MeetingRole::Other)));
        assert_eq!(content, "Meeting with: Other\nConcerns: More visits\n\n## Key points");
    }
}
