//! Prompts for generating preparation guides directly through the LLM client.

use crate::models::preparation::{MeetingRole, PrepType};
use crate::models::profile::Role;

pub const GUIDE_SYSTEM: &str = "You are a compassionate, knowledgeable assistant helping parents navigate California dependency court. Your role is to provide trauma-informed, practical guidance that empowers parents while being clear this is educational information, not legal advice.

Key principles:
- Use supportive, respectful language that acknowledges the difficulty of their situation
- Be specific and actionable - provide concrete steps they can take
- Focus on what they CAN control and influence
- Acknowledge their concerns without dismissing them
- Keep language clear and accessible (avoid legal jargon when possible)
- Be realistic but encouraging

Always remind them to consult their attorney for advice specific to their case.";

const GUIDE_INSTRUCTIONS: &str = "Provide practical, trauma-informed preparation guidance including:
- Key points to make to the judge (or person they're meeting with)
- What documents or evidence to bring
- Questions to ask their attorney
- How to present themselves professionally and authentically
- What to expect at this hearing/meeting
- A sample opening statement or talking points they can adapt

Format your response in clear sections with headers. Use bullet points for lists. Keep the tone supportive but professional. This is educational information to help them prepare and advocate for themselves.

End with a reminder to consult their attorney for advice specific to their case.";

/// Event phrase for a raw prep type string; unknown values read as "court event".
pub fn hearing_type_for(prep_type: &str) -> &'static str {
    match prep_type.parse::<PrepType>() {
        Ok(PrepType::Hearing) => "court hearing",
        Ok(PrepType::Meeting) => "meeting with their attorney or social worker",
        Ok(PrepType::AfterHearing) => "reflecting after a court hearing",
        Err(_) => "court event",
    }
}

/// Event phrase naming the person being met, when known.
pub fn hearing_type(prep_type: PrepType, meeting_role: Option<MeetingRole>) -> String {
    match (prep_type, meeting_role) {
        (PrepType::Meeting, Some(with)) => format!("meeting with their {}", with.label()),
        _ => hearing_type_for(prep_type.as_str()).to_string(),
    }
}

pub fn person_for(role: Role) -> &'static str {
    match role {
        Role::Parent => "A parent",
        Role::Youth => "A young person",
        Role::Supporter => "A family supporter",
    }
}

pub fn guide_prompt(
    person: &str,
    hearing_type: &str,
    current_stage: Option<&str>,
    concerns: &str,
) -> String {
    let stage_info = current_stage
        .map(|stage| format!(" They are currently at the \"{stage}\" stage."))
        .unwrap_or_default();
    format!(
        "{person} in California dependency court is preparing for a {hearing_type}.{stage_info} Their specific concern is: \"{concerns}\"\n\n{GUIDE_INSTRUCTIONS}"
    )
}
