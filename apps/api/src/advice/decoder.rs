//! Advice decoder — turns one raw AI reply into the render-ready model.
//!
//! Flow: split_sections → extract_roadmap → build_roadmap_graph,
//!       project_checklist, split_list_items.
//!
//! Decoding never fails. Malformed or missing parts surface as fallback
//! variants and placeholder messages in the `AdviceView`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::advice::checklist::{attach_completion, project_checklist, ChecklistItem, ChecklistProjection};
use crate::advice::graph::{build_roadmap_graph, RoadmapGraph};
use crate::advice::listing::split_list_items;
use crate::advice::roadmap::{extract_roadmap, RoadmapExtraction, RoadmapStep};
use crate::advice::sections::{split_sections, MarkerSet, SectionKey, SectionedAdvice};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLists {
    pub learning: Vec<String>,
    pub practice_websites: Vec<String>,
    pub job_platforms: Vec<String>,
}

/// Everything derived from one submission's reply. Read-only after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAdvice {
    pub sections: SectionedAdvice,
    pub roadmap: RoadmapExtraction,
    pub graph: RoadmapGraph,
    pub checklist: ChecklistProjection,
    pub resources: ResourceLists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionPlaceholder {
    pub section: SectionKey,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistMode {
    Checklist,
    Narrative,
}

/// A roadmap step with its completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadmapStepView {
    #[serde(flatten)]
    pub step: RoadmapStep,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistView {
    pub mode: ChecklistMode,
    pub narrative: String,
    pub items: Vec<ChecklistItem>,
    pub extra: Vec<String>,
}

/// What the rendering layer receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceView {
    pub sections: SectionedAdvice,
    pub roadmap_steps: Vec<RoadmapStepView>,
    /// Raw roadmap text, present only when the JSON array could not be recovered.
    pub roadmap_raw: Option<String>,
    pub graph: RoadmapGraph,
    pub checklist: ChecklistView,
    pub resources: ResourceLists,
    pub placeholders: Vec<SectionPlaceholder>,
    pub notices: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub fn decode_advice(raw: &str, markers: &MarkerSet) -> DecodedAdvice {
    let sections = split_sections(raw, markers);
    let roadmap = extract_roadmap(&sections.roadmap);
    let graph = build_roadmap_graph(roadmap.steps());
    let checklist = project_checklist(&sections.skill_gap);
    let resources = ResourceLists {
        learning: split_list_items(&sections.learning),
        practice_websites: split_list_items(&sections.practice_websites),
        job_platforms: split_list_items(&sections.job_platforms),
    };

    let missing = sections.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|key| key.as_str()).collect();
        debug!("Reply is missing sections: {}", names.join(", "));
    }
    info!(
        "Decoded advice: {} missing sections, {} roadmap steps, {} checklist items",
        missing.len(),
        roadmap.steps().len(),
        checklist.items().len()
    );

    DecodedAdvice {
        sections,
        roadmap,
        graph,
        checklist,
        resources,
    }
}

impl DecodedAdvice {
    /// Checklist labels for this submission, in display order.
    pub fn checklist_labels(&self) -> &[String] {
        self.checklist.items()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.checklist_labels().iter().any(|l| l == label)
    }

    /// Roadmap step titles in array order. Repeated titles appear once.
    pub fn step_titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = Vec::new();
        for step in self.roadmap.steps() {
            if !titles.contains(&step.title.as_str()) {
                titles.push(&step.title);
            }
        }
        titles
    }

    pub fn has_step(&self, title: &str) -> bool {
        self.roadmap.steps().iter().any(|s| s.title == title)
    }

    /// Builds the rendering hand-off. `checklist_states` is keyed by checklist
    /// label, `roadmap_states` by step title.
    pub fn view(
        &self,
        checklist_states: &BTreeMap<String, bool>,
        roadmap_states: &BTreeMap<String, bool>,
    ) -> AdviceView {
        let placeholders = self
            .sections
            .missing()
            .into_iter()
            .map(|section| SectionPlaceholder {
                section,
                message: section.empty_placeholder(),
            })
            .collect();

        let mut notices = Vec::new();
        let roadmap_raw = self
            .roadmap
            .raw_fallback()
            .filter(|raw| !raw.trim().is_empty())
            .map(str::to_string);
        if roadmap_raw.is_some() {
            notices.push("Could not parse the roadmap; showing the raw text.".to_string());
        }

        let roadmap_steps: Vec<RoadmapStepView> = self
            .roadmap
            .steps()
            .iter()
            .map(|step| RoadmapStepView {
                completed: roadmap_states.get(&step.title).copied().unwrap_or(false),
                step: step.clone(),
            })
            .collect();
        let done: Vec<bool> = roadmap_steps.iter().map(|s| s.completed).collect();

        let checklist = match &self.checklist {
            ChecklistProjection::Checklist {
                narrative,
                items,
                extra,
            } => ChecklistView {
                mode: ChecklistMode::Checklist,
                narrative: narrative.clone(),
                items: attach_completion(items, checklist_states),
                extra: extra.clone(),
            },
            ChecklistProjection::Narrative { text } => ChecklistView {
                mode: ChecklistMode::Narrative,
                narrative: text.clone(),
                items: Vec::new(),
                extra: Vec::new(),
            },
        };

        AdviceView {
            sections: self.sections.clone(),
            roadmap_steps,
            roadmap_raw,
            graph: self.graph.with_completion(&done),
            checklist,
            resources: self.resources.clone(),
            placeholders,
            notices,
        }
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_REPLY: &str = r#"===Career Suggestions===
Backend Engineer: build APIs and services.
===Roadmap===
json
[
  {"step_number": 1, "title": "Deepen Python", "description": "Async and typing", "expected_duration_weeks": 4},
  {"step_number": 2, "title": "Learn SQL", "description": "Joins and indexes", "expected_duration_weeks": 3},
  {"step_number": 3, "title": "Build a service", "description": "Deploy a REST API", "expected_duration_weeks": 6}
]
Hope this helps!
===Skill Gap Analysis===
You are missing cloud deployment experience.
Practice Plan Checklist:
- Solve 50 SQL problems
- Deploy a cloud app
Review weekly.
===Learning Resources===
Designing Data-Intensive Applications, The Rust Book
===Practice Websites===
- leetcode.com
- exercism.org
===Job Search Platforms===
LinkedIn, Wellfound, Indeed"#;
