//! Deterministic repair guidance: follow-up questions and timelines.
//!
//! Issue types are the snake_case labels `water_damage`, `structural_damage`,
//! `mold_growth`, `electrical_issues`, `plumbing_issues` and
//! `cosmetic_damage`. Severities are `minor`, `moderate` and `severe`.

/// Maximum number of follow-up questions returned.
pub const MAX_FOLLOW_UPS: usize = 5;

pub const UNKNOWN_TIMELINE: &str = "Timeline varies - consult professional";

const GENERIC_QUESTIONS: [&str; 3] = [
    "Can you describe the issue in more detail?",
    "When did you first notice this problem?",
    "Has the issue changed or worsened recently?",
];

const SEVERE_QUESTIONS: [&str; 3] = [
    "Do you need emergency professional assistance?",
    "Is the issue affecting other areas of the property?",
    "Are there any safety concerns for occupants?",
];

fn questions_for(issue_type: &str) -> &'static [&'static str] {
    match issue_type {
        "water_damage" => &[
            "Is the water damage still actively spreading?",
            "Can you locate the source of the water?",
            "Is there a musty odor in the area?",
            "How long has this damage been present?",
        ],
        "structural_damage" => &[
            "Are the cracks getting larger over time?",
            "Do doors or windows stick in this area?",
            "Is the crack wider than a coin?",
            "Are there multiple cracks in the same area?",
        ],
        "mold_growth" => &[
            "What color is the growth you're seeing?",
            "Is there a musty smell in the room?",
            "Is the area frequently damp or humid?",
            "How large is the affected area?",
        ],
        "electrical_issues" => &[
            "Are circuit breakers tripping frequently?",
            "Do you smell burning or see sparks?",
            "Are outlets warm to the touch?",
            "Do lights flicker when appliances turn on?",
        ],
        "plumbing_issues" => &[
            "Is water pressure affected throughout the house?",
            "Can you hear water running when all taps are off?",
            "Is the issue getting worse over time?",
            "Are multiple fixtures affected?",
        ],
        "cosmetic_damage" => &[
            "Is the damage affecting the underlying material?",
            "How large is the affected area?",
            "Is the damage spreading or stable?",
            "Do you know what caused the damage?",
        ],
        _ => &GENERIC_QUESTIONS,
    }
}

/// Follow-up questions for an issue type, at most [`MAX_FOLLOW_UPS`].
///
/// Severity `severe` appends safety questions before truncation.
pub fn follow_up_questions(issue_type: &str, severity: &str) -> Vec<String> {
    let base = questions_for(issue_type).iter();
    let extra = if severity == "severe" {
        &SEVERE_QUESTIONS[..]
    } else {
        &[][..]
    };
    base.chain(extra.iter())
        .take(MAX_FOLLOW_UPS)
        .map(|q| q.to_string())
        .collect()
}

/// Rough repair duration for an issue type and severity.
pub fn estimate_repair_timeline(issue_type: &str, severity: &str) -> &'static str {
    let row: [&'static str; 3] = match issue_type {
        "water_damage" => ["1-2 days", "3-7 days", "1-3 weeks"],
        "structural_damage" => ["1 day", "1-2 weeks", "2-8 weeks"],
        "mold_growth" => ["1-3 days", "1-2 weeks", "2-4 weeks"],
        "electrical_issues" => ["2-4 hours", "1-2 days", "3-7 days"],
        "plumbing_issues" => ["1-4 hours", "1-2 days", "2-5 days"],
        "cosmetic_damage" => ["2-6 hours", "1-3 days", "1-2 weeks"],
        _ => return UNKNOWN_TIMELINE,
    };
    match severity {
        "minor" => row[0],
        "moderate" => row[1],
        "severe" => row[2],
        _ => UNKNOWN_TIMELINE,
    }
}
