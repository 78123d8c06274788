//! Section splitter — segments a raw AI reply into the six fixed advice sections.
//!
//! A section starts at an exact marker line (compared after trimming) and runs
//! until the next recognised marker. Text before the first marker belongs to the
//! default section, which is the key of the first marker in the `MarkerSet`.

use serde::{Deserialize, Serialize};

pub const CAREER_MARKER: &str = "===Career Suggestions===";
pub const ROADMAP_MARKER: &str = "===Roadmap===";
pub const SKILL_GAP_MARKER: &str = "===Skill Gap Analysis===";
pub const LEARNING_MARKER: &str = "===Learning Resources===";
pub const PRACTICE_WEBSITES_MARKER: &str = "===Practice Websites===";
pub const JOB_PLATFORMS_MARKER: &str = "===Job Search Platforms===";

/// The closed set of advice sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Career,
    Roadmap,
    SkillGap,
    Learning,
    PracticeWebsites,
    JobPlatforms,
}

impl SectionKey {
    pub const ALL: [SectionKey; 6] = [
        SectionKey::Career,
        SectionKey::Roadmap,
        SectionKey::SkillGap,
        SectionKey::Learning,
        SectionKey::PracticeWebsites,
        SectionKey::JobPlatforms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Career => "career",
            SectionKey::Roadmap => "roadmap",
            SectionKey::SkillGap => "skill_gap",
            SectionKey::Learning => "learning",
            SectionKey::PracticeWebsites => "practice_websites",
            SectionKey::JobPlatforms => "job_platforms",
        }
    }

    /// Informational text shown in place of a section the model never emitted.
    pub fn empty_placeholder(&self) -> &'static str {
        match self {
            SectionKey::Career => "No career suggestions available.",
            SectionKey::Roadmap => "No roadmap data available.",
            SectionKey::SkillGap => "No skill gap analysis available.",
            SectionKey::Learning => "No learning resources provided.",
            SectionKey::PracticeWebsites => "No practice websites listed.",
            SectionKey::JobPlatforms => "No job search platforms listed.",
        }
    }
}

/// Ordered marker lines recognised by the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<(SectionKey, String)>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new(vec![
            (SectionKey::Career, CAREER_MARKER.to_string()),
            (SectionKey::Roadmap, ROADMAP_MARKER.to_string()),
            (SectionKey::SkillGap, SKILL_GAP_MARKER.to_string()),
            (SectionKey::Learning, LEARNING_MARKER.to_string()),
            (SectionKey::PracticeWebsites, PRACTICE_WEBSITES_MARKER.to_string()),
            (SectionKey::JobPlatforms, JOB_PLATFORMS_MARKER.to_string()),
        ])
    }
}

impl MarkerSet {
    /// Marker text is stored trimmed so it compares against trimmed lines.
    pub fn new(markers: Vec<(SectionKey, String)>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|(key, marker)| (key, marker.trim().to_string()))
                .collect(),
        }
    }

    /// Section that receives text appearing before any marker.
    pub fn default_key(&self) -> SectionKey {
        self.markers
            .first()
            .map(|(key, _)| *key)
            .unwrap_or(SectionKey::Career)
    }

    pub fn key_for_line(&self, line: &str) -> Option<SectionKey> {
        let trimmed = line.trim();
        self.markers
            .iter()
            .find(|(_, marker)| marker == trimmed)
            .map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> {
        self.markers.iter().map(|(key, marker)| (*key, marker.as_str()))
    }
}

/// Total mapping from every `SectionKey` to its body text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionedAdvice {
    pub career: String,
    pub roadmap: String,
    pub skill_gap: String,
    pub learning: String,
    pub practice_websites: String,
    pub job_platforms: String,
}

impl SectionedAdvice {
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Career => &self.career,
            SectionKey::Roadmap => &self.roadmap,
            SectionKey::SkillGap => &self.skill_gap,
            SectionKey::Learning => &self.learning,
            SectionKey::PracticeWebsites => &self.practice_websites,
            SectionKey::JobPlatforms => &self.job_platforms,
        }
    }

    fn get_mut(&mut self, key: SectionKey) -> &mut String {
        match key {
            SectionKey::Career => &mut self.career,
            SectionKey::Roadmap => &mut self.roadmap,
            SectionKey::SkillGap => &mut self.skill_gap,
            SectionKey::Learning => &mut self.learning,
            SectionKey::PracticeWebsites => &mut self.practice_websites,
            SectionKey::JobPlatforms => &mut self.job_platforms,
        }
    }

    /// Keys whose body is empty after splitting.
    pub fn missing(&self) -> Vec<SectionKey> {
        SectionKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).is_empty())
            .collect()
    }

    /// Rebuilds marker-delimited text. Splitting the result yields `self` again.
    pub fn rejoin(&self, markers: &MarkerSet) -> String {
        let mut out = String::new();
        for (key, marker) in markers.iter() {
            out.push_str(marker);
            out.push('\n');
            let body = self.get(key);
            if !body.is_empty() {
                out.push_str(body);
                out.push('\n');
            }
        }
        out
    }
}

/// Splits `raw` into sections. Never fails: absent sections stay empty.
pub fn split_sections(raw: &str, markers: &MarkerSet) -> SectionedAdvice {
    let mut buckets: Vec<(SectionKey, Vec<&str>)> =
        SectionKey::ALL.iter().map(|key| (*key, Vec::new())).collect();
    let mut current = markers.default_key();

    for line in raw.lines() {
        if let Some(key) = markers.key_for_line(line) {
            current = key;
            continue;
        }
        if let Some((_, lines)) = buckets.iter_mut().find(|(key, _)| *key == current) {
            lines.push(line);
        }
    }

    let mut advice = SectionedAdvice::default();
    for (key, lines) in buckets {
        *advice.get_mut(key) = lines.join("\n").trim().to_string();
    }
    advice
}
