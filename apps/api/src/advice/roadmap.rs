//! Roadmap extractor — recovers the JSON step array embedded in the roadmap section.
//!
//! The model is asked for a bare JSON array, but replies routinely carry a
//! leading `json` fence token, prose before the array, or commentary after it.
//! Extraction takes the text between the first `[` and the last `]` and parses
//! that. Any failure is reported as `RoadmapExtraction::Fallback` carrying the
//! raw text for display; nothing here returns an error.
//!
//! Array elements may be step objects or bare step titles. Elements of any
//! other shape are skipped, and an array that yields no step at all falls back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Placeholder for any field the model omitted.
pub const PLACEHOLDER: &str = "?";

/// Namespace for roadmap-step flags in the shared completion document.
pub const COMPLETION_PREFIX: &str = "roadmap:";

/// Completion-store label for the step titled `title`.
pub fn completion_label(title: &str) -> String {
    format!("{COMPLETION_PREFIX}{}", title.trim())
}

/// One ordered entry of the career roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    /// Display label only. Order comes from the array position.
    pub step_number: Option<u32>,
    pub title: String,
    pub description: String,
    pub expected_duration_weeks: Option<u32>,
}

impl RoadmapStep {
    pub fn duration_label(&self) -> String {
        match self.expected_duration_weeks {
            Some(1) => "1 week".to_string(),
            Some(weeks) => format!("{weeks} weeks"),
            None => format!("{PLACEHOLDER} weeks"),
        }
    }

    fn from_element(element: &Value) -> Option<Self> {
        match element {
            Value::Object(obj) => Some(Self::from_object(obj)),
            Value::String(title) if !title.trim().is_empty() => Some(RoadmapStep {
                step_number: None,
                title: title.trim().to_string(),
                description: PLACEHOLDER.to_string(),
                expected_duration_weeks: None,
            }),
            _ => None,
        }
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        RoadmapStep {
            step_number: count_field(obj, "step_number").filter(|n| *n > 0),
            title: text_field(obj, "title"),
            description: text_field(obj, "description"),
            expected_duration_weeks: count_field(obj, "expected_duration_weeks"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The roadmap section was empty or missing.
    Empty,
    /// No `[` ... `]` span was found.
    NoArray,
    /// The bracketed span was not valid JSON.
    InvalidJson(String),
    /// The array had elements, but none of them describes a step.
    NoSteps,
}

/// Outcome of roadmap extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoadmapExtraction {
    Parsed { steps: Vec<RoadmapStep> },
    Fallback { raw: String, reason: FallbackReason },
}

impl RoadmapExtraction {
    /// Steps in array order; empty on fallback.
    pub fn steps(&self) -> &[RoadmapStep] {
        match self {
            RoadmapExtraction::Parsed { steps } => steps,
            RoadmapExtraction::Fallback { .. } => &[],
        }
    }

    /// Raw section text kept for diagnostic display when parsing failed.
    pub fn raw_fallback(&self) -> Option<&str> {
        match self {
            RoadmapExtraction::Parsed { .. } => None,
            RoadmapExtraction::Fallback { raw, .. } => Some(raw),
        }
    }
}

pub fn extract_roadmap(text: &str) -> RoadmapExtraction {
    if text.trim().is_empty() {
        return RoadmapExtraction::Fallback {
            raw: text.to_string(),
            reason: FallbackReason::Empty,
        };
    }

    let span = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            debug!("Roadmap section has no bracketed array");
            return RoadmapExtraction::Fallback {
                raw: text.to_string(),
                reason: FallbackReason::NoArray,
            };
        }
    };

    let elements = match serde_json::from_str::<Vec<Value>>(span) {
        Ok(elements) => elements,
        Err(e) => {
            warn!("Roadmap JSON could not be parsed: {e}");
            return RoadmapExtraction::Fallback {
                raw: text.to_string(),
                reason: FallbackReason::InvalidJson(e.to_string()),
            };
        }
    };

    let total = elements.len();
    let steps: Vec<RoadmapStep> = elements.iter().filter_map(RoadmapStep::from_element).collect();
    if steps.len() < total {
        warn!("Skipped {} unusable roadmap elements", total - steps.len());
    }
    if steps.is_empty() && total > 0 {
        return RoadmapExtraction::Fallback {
            raw: text.to_string(),
            reason: FallbackReason::NoSteps,
        };
    }

    RoadmapExtraction::Parsed { steps }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

// Models sometimes quote numbers ("4") or emit floats (4.0).
fn count_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    match obj.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
