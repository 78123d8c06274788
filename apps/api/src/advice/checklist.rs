//! Checklist projector — derives practice-plan items from the skill-gap section.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

pub const CHECKLIST_MARKER: &str = "Practice Plan Checklist:";
const ITEM_PREFIX: &str = "- ";

/// Result of projecting the skill-gap section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChecklistProjection {
    /// The marker phrase was found.
    Checklist {
        /// Skill-gap text before the marker phrase.
        narrative: String,
        /// Unique item labels in source order.
        items: Vec<String>,
        /// Non-item lines after the marker, kept for display.
        extra: Vec<String>,
    },
    /// No marker phrase: the whole section renders as free text, no checkboxes.
    Narrative { text: String },
}

impl ChecklistProjection {
    pub fn items(&self) -> &[String] {
        match self {
            ChecklistProjection::Checklist { items, .. } => items,
            ChecklistProjection::Narrative { .. } => &[],
        }
    }
}

pub fn project_checklist(skill_gap: &str) -> ChecklistProjection {
    let Some(pos) = skill_gap.find(CHECKLIST_MARKER) else {
        return ChecklistProjection::Narrative {
            text: skill_gap.trim().to_string(),
        };
    };

    let narrative = skill_gap[..pos].trim().to_string();
    let tail = &skill_gap[pos + CHECKLIST_MARKER.len()..];

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut extra = Vec::new();

    for line in tail.lines() {
        match line.trim_start().strip_prefix(ITEM_PREFIX) {
            Some(label) => {
                let label = label.trim();
                if !label.is_empty() && seen.insert(label.to_string()) {
                    items.push(label.to_string());
                }
            }
            None => {
                let line = line.trim();
                if !line.is_empty() {
                    extra.push(line.to_string());
                }
            }
        }
    }

    ChecklistProjection::Checklist {
        narrative,
        items,
        extra,
    }
}

/// One rendered checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub completed: bool,
}

/// Pairs each label with its completion flag. Absent labels are not completed.
pub fn attach_completion(labels: &[String], states: &BTreeMap<String, bool>) -> Vec<ChecklistItem> {
    labels
        .iter()
        .map(|label| ChecklistItem {
            label: label.clone(),
            completed: states.get(label.trim()).copied().unwrap_or(false),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_lines_become_items_and_notes_are_excluded() {
        let projection = project_checklist("Practice Plan Checklist:\n- Task A\n- Task B\nnotes");
        assert_eq!(projection.items(), &["Task A".to_string(), "Task B".to_string()]);
        match projection {
            ChecklistProjection::Checklist { extra, narrative, .. } => {
                assert_eq!(extra, vec!["notes".to_string()]);
                assert!(narrative.is_empty());
            }
            other => panic!("expected checklist, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_marker_falls_back_to_narrative() {
        let text = "You need more SQL.\n- Solve 50 problems";
        let projection = project_checklist(text);
        assert!(projection.items().is_empty());
        assert_eq!(
            projection,
            ChecklistProjection::Narrative {
                text: text.to_string()
            }
        );
    }

    #[test]
    fn test_text_before_marker_is_narrative() {
        let projection =
            project_checklist("Gap: cloud skills.\n\nPractice Plan Checklist:\n- Deploy an app");
        match projection {
            ChecklistProjection::Checklist { narrative, items, .. } => {
                assert_eq!(narrative, "Gap: cloud skills.");
                assert_eq!(items, vec!["Deploy an app".to_string()]);
            }
            other => panic!("expected checklist, got {other:?}"),
        }
    }

    #[test]
    fn test_only_dash_space_prefix_counts() {
        let projection = project_checklist(
            "Practice Plan Checklist:\n* star bullet\n-no space\n   - Indented item  \n• dot",
        );
        assert_eq!(projection.items(), &["Indented item".to_string()]);
    }

    #[test]
    fn test_duplicate_and_blank_labels_are_dropped() {
        let projection =
            project_checklist("Practice Plan Checklist:\n- Same\n-  \n- Same\n- Other");
        assert_eq!(projection.items(), &["Same".to_string(), "Other".to_string()]);
    }

    #[test]
    fn test_marker_inline_with_items_on_following_lines() {
        let projection = project_checklist("Here is your Practice Plan Checklist:\n- One");
        assert_eq!(projection.items(), &["One".to_string()]);
    }

    #[test]
    fn test_attach_completion_defaults_to_false() {
        let labels = vec!["Task A".to_string(), "Task B".to_string()];
        let mut states = BTreeMap::new();
        states.insert("Task A".to_string(), true);
        states.insert("Unrelated".to_string(), true);
        let items = attach_completion(&labels, &states);
        assert_eq!(
            items,
            vec![
                ChecklistItem {
                    label: "Task A".to_string(),
                    completed: true
                },
                ChecklistItem {
                    label: "Task B".to_string(),
                    completed: false
                },
            ]
        );
    }
}
