// Career advice LLM prompt templates.
// Marker lines are spliced in from advice::sections so the prompt and the
// splitter always agree.

use crate::advice::checklist::CHECKLIST_MARKER;
use crate::advice::sections::{
    CAREER_MARKER, JOB_PLATFORMS_MARKER, LEARNING_MARKER, PRACTICE_WEBSITES_MARKER,
    ROADMAP_MARKER, SKILL_GAP_MARKER,
};
use crate::models::profile::ProfileInput;

pub const ADVICE_SYSTEM: &str = "\
You are an experienced career advisor. \
Give concrete, personalised advice grounded in the user's profile. \
Follow the requested output format exactly: section marker lines must appear \
alone on their own line, in the given order, with no markdown decoration.";

pub const ADVICE_PROMPT_TEMPLATE: &str = r#"Based on the following user profile, provide personalised career advice.

USER PROFILE:
Age: {age}
Location: {location}
Education: {education}
Experience: {experience} years
Current Role: {current_role}
Skills: {skills}
Interests: {interests}
Target Role: {target_role}

OUTPUT FORMAT (use exactly these six marker lines, in this order):
{career_marker}
Career suggestions with details.
{roadmap_marker}
A JSON array ONLY, no prose, of objects with keys
"step_number" (integer), "title" (string), "description" (string), "expected_duration_weeks" (integer).
{skill_gap_marker}
Skill gap analysis, then a line reading exactly
{checklist_marker}
followed by one practice task per line, each starting with "- ".
{learning_marker}
Learning resources.
{practice_marker}
Practice websites.
{job_marker}
Job search platforms."#;

pub fn build_advice_prompt(profile: &ProfileInput) -> String {
    let current_role = profile
        .current_role
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("none");
    let interests = match profile.interests.trim() {
        "" => "not specified",
        s => s,
    };

    ADVICE_PROMPT_TEMPLATE
        .replace("{age}", &profile.age.to_string())
        .replace("{location}", profile.location.trim())
        .replace("{education}", profile.education.trim())
        .replace("{experience}", &profile.experience_years.to_string())
        .replace("{current_role}", current_role)
        .replace("{skills}", &profile.skills_summary())
        .replace("{interests}", interests)
        .replace("{target_role}", profile.target_role.trim())
        .replace("{career_marker}", CAREER_MARKER)
        .replace("{roadmap_marker}", ROADMAP_MARKER)
        .replace("{skill_gap_marker}", SKILL_GAP_MARKER)
        .replace("{checklist_marker}", CHECKLIST_MARKER)
        .replace("{learning_marker}", LEARNING_MARKER)
        .replace("{practice_marker}", PRACTICE_WEBSITES_MARKER)
        .replace("{job_marker}", JOB_PLATFORMS_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::sections::MarkerSet;
    use crate::models::profile::sample_profile;

    #[test]
    fn test_prompt_lists_markers_as_own_lines_in_order() {
        let prompt = build_advice_prompt(&sample_profile());
        let markers = MarkerSet::default();
        let mut last = 0;
        for (_, marker) in markers.iter() {
            let pos = prompt
                .lines()
                .position(|l| l == marker)
                .unwrap_or_else(|| panic!("marker {marker} missing"));
            assert!(pos >= last, "marker {marker} out of order");
            last = pos;
        }
        assert!(prompt.lines().any(|l| l == CHECKLIST_MARKER));
    }

    #[test]
    fn test_prompt_includes_profile_fields() {
        let prompt = build_advice_prompt(&sample_profile());
        assert!(prompt.contains("Age: 27"));
        assert!(prompt.contains("Skills: Python (intermediate), SQL (beginner)"));
        assert!(prompt.contains("Target Role: Backend Engineer"));
        assert!(prompt.contains("Current Role: Support Engineer"));
        assert!(!prompt.contains('{'), "unreplaced placeholder in prompt");
    }

    #[test]
    fn test_blank_optional_fields_get_defaults() {
        let mut profile = sample_profile();
        profile.current_role = None;
        profile.interests = String::new();
        let prompt = build_advice_prompt(&profile);
        assert!(prompt.contains("Current Role: none"));
        assert!(prompt.contains("Interests: not specified"));
    }
}
