//! The fixed seven-stage walkthrough of a California dependency case.

use serde::Serialize;

use crate::models::timeline::StageKey;

#[derive(Debug, Clone, Serialize)]
pub struct StageTemplate {
    pub key: StageKey,
    pub title: &'static str,
    pub order: i32,
    pub description: &'static str,
    pub timeline: &'static str,
    pub what_happens: &'static [&'static str],
    pub rights: &'static [&'static str],
    pub tasks: &'static [&'static str],
}

pub static STAGES: [StageTemplate; 7] = [
    StageTemplate {
        key: StageKey::CaseOpening,
        title: "Case Opening",
        order: 1,
        description: "Your case has been filed with the court.",
        timeline: "When CPS files a petition",
        what_happens: &[
            "CPS files a petition with the court",
            "The petition explains why they believe your child needs protection",
            "You will receive notice of the court hearing",
            "The court assigns you an attorney if you cannot afford one",
        ],
        rights: &[
            "Right to an Attorney",
            "Right to Read the Petition",
            "Right to Present Evidence",
            "Right to Cross-Examine Witnesses",
        ],
        tasks: &[
            "Get a copy of the petition and read it carefully",
            "Make sure you have an attorney assigned",
            "Start gathering important documents (birth certificates, medical records, etc.)",
            "Create a list of witnesses who can support your case",
        ],
    },
    StageTemplate {
        key: StageKey::Detention,
        title: "Detention Hearing",
        order: 2,
        description: "First hearing within 48-72 hours of removal.",
        timeline: "Within 48-72 hours of child being removed",
        what_happens: &[
            "Judge decides if your child should remain in custody or return home",
            "This is your first opportunity to speak to the judge",
            "CPS presents evidence about why removal was necessary",
            "You can present evidence for why your child should return home",
            "Judge may order services you need to complete",
        ],
        rights: &[
            "Right to a Lawyer",
            "Right to Be Present",
            "Right to Present Evidence",
            "Right to Question CPS Workers",
            "Right to Be Heard by the Judge",
        ],
        tasks: &[
            "Attend the detention hearing - do not miss it",
            "Talk to your attorney before the hearing",
            "Prepare what you want to say to the judge",
            "Bring support people or character witnesses if possible",
            "Review the allegations with your attorney",
        ],
    },
    StageTemplate {
        key: StageKey::Jurisdiction,
        title: "Jurisdiction Hearing",
        order: 3,
        description: "Judge determines if allegations are true.",
        timeline: "Within 30 days of detention hearing",
        what_happens: &[
            "Judge decides if the allegations in the petition are true",
            "CPS presents evidence and witnesses",
            "You and your attorney can present your side of the story",
            "You can accept or deny the allegations",
            "If allegations are found true, the case moves to disposition",
        ],
        rights: &[
            "Right to a Trial",
            "Right to Present Evidence",
            "Right to Call Witnesses",
            "Right to Cross-Examine Witnesses",
            "Right to Deny Allegations",
            "Right to Appeal",
        ],
        tasks: &[
            "Meet with your attorney to prepare your defense",
            "Gather evidence that supports your case",
            "Prepare your witnesses to testify",
            "Make sure you understand each allegation",
            "Attend the jurisdiction hearing",
        ],
    },
    StageTemplate {
        key: StageKey::Disposition,
        title: "Disposition Hearing",
        order: 4,
        description: "Judge creates your case plan with services.",
        timeline: "Within 60 days of initial hearing",
        what_happens: &[
            "Judge creates a case plan with specific services you must complete",
            "Services may include parenting classes, therapy, drug testing, housing assistance",
            "Judge sets visitation schedule with your child",
            "Goals and timeline for reunification are established",
            "Progress reviews are scheduled",
        ],
        rights: &[
            "Right to Participate in Case Plan",
            "Right to Visitation",
            "Right to Request Services",
            "Right to Object to Case Plan Requirements",
            "Right to Regular Updates",
        ],
        tasks: &[
            "Review the proposed case plan with your attorney",
            "Begin services immediately - do not wait",
            "Keep records of all services you complete",
            "Attend all scheduled visits with your child",
            "Maintain regular communication with your social worker",
        ],
    },
    StageTemplate {
        key: StageKey::Review,
        title: "Review Hearings",
        order: 5,
        description: "Regular check-ins on your progress.",
        timeline: "Every 6 months",
        what_happens: &[
            "Judge reviews your progress on the case plan",
            "Social worker reports on your compliance with services",
            "Judge evaluates if services should continue or change",
            "Visitation schedule may be modified based on progress",
            "Judge determines if reunification is still the goal",
        ],
        rights: &[
            "Right to Be Present",
            "Right to Report Your Progress",
            "Right to Dispute False Reports",
            "Right to Request Additional Services",
            "Right to Increased Visitation",
        ],
        tasks: &[
            "Continue completing all required services",
            "Document all services completed since last hearing",
            "Bring completion certificates and attendance records",
            "Maintain consistent contact with your child",
            "Address any concerns raised by CPS",
        ],
    },
    StageTemplate {
        key: StageKey::Permanency,
        title: "Permanency Hearing",
        order: 6,
        description: "Judge decides permanent plan for your child.",
        timeline: "Within 12 months of removal",
        what_happens: &[
            "Judge makes a decision about permanent placement for your child",
            "Options include reunification, guardianship, or adoption",
            "Your progress on the case plan is heavily considered",
            "If you have completed services, reunification may be ordered",
            "If insufficient progress, termination of rights may be considered",
        ],
        rights: &[
            "Right to Show You Are Ready for Reunification",
            "Right to Present Evidence of Progress",
            "Right to Object to Termination",
            "Right to Appeal the Decision",
            "Right to Legal Representation",
        ],
        tasks: &[
            "Ensure all case plan services are completed",
            "Demonstrate stable housing and income",
            "Prepare your home for your child's return",
            "Have character witnesses ready to testify",
            "Document all positive changes you have made",
        ],
    },
    StageTemplate {
        key: StageKey::Reunification,
        title: "Reunification/Case Closure",
        order: 7,
        description: "Your child returns home or case ends.",
        timeline: "When services are completed",
        what_happens: &[
            "If successful, your child returns to your care",
            "Court may order continued monitoring for 6 months",
            "Case is eventually closed if family remains stable",
            "You may be connected with ongoing support services",
            "If unsuccessful, other permanency options are pursued",
        ],
        rights: &[
            "Right to Aftercare Services",
            "Right to Support During Transition",
            "Right to Request Extended Services",
            "Right to Appeal Case Closure Conditions",
        ],
        tasks: &[
            "Work with social worker on transition plan",
            "Continue services even after reunification",
            "Establish ongoing support network",
            "Attend all follow-up appointments and check-ins",
            "Communicate any needs or concerns immediately",
        ],
    },
];

pub fn stage_by_key(key: StageKey) -> Option<&'static StageTemplate> {
    STAGES.iter().find(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_are_contiguous_and_keys_unique() {
        for (i, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.order, i as i32 + 1);
            assert_eq!(stage_by_key(stage.key).map(|s| s.order), Some(stage.order));
            assert!(!stage.tasks.is_empty());
        }
        assert_eq!(StageKey::ALL.len(), STAGES.len());
    }
}
