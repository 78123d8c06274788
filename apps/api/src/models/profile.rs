use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Advanced => "advanced",
            Proficiency::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub name: String,
    pub proficiency: Proficiency,
}

/// The submitted profile. Immutable for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub age: u32,
    pub location: String,
    pub education: String,
    pub experience_years: u32,
    #[serde(default)]
    pub current_role: Option<String>,
    pub skills: Vec<SkillLevel>,
    #[serde(default)]
    pub interests: String,
    pub target_role: String,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(AppError::Validation(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}"
            )));
        }
        if self.skills.is_empty() {
            return Err(AppError::Validation(
                "at least one skill is required".to_string(),
            ));
        }
        if self.skills.iter().any(|s| s.name.trim().is_empty()) {
            return Err(AppError::Validation(
                "skill names cannot be empty".to_string(),
            ));
        }
        for (field, value) in [
            ("target_role", &self.target_role),
            ("education", &self.education),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    /// "Rust (advanced), SQL (beginner)"
    pub fn skills_summary(&self) -> String {
        self.skills
            .iter()
            .map(|s| format!("{} ({})", s.name.trim(), s.proficiency.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> ProfileInput {
    ProfileInput {
        age: 27,
        location: "Berlin".to_string(),
        education: "BSc Computer Science".to_string(),
        experience_years: 3,
        current_role: Some("Support Engineer".to_string()),
        skills: vec![
            SkillLevel {
                name: "Python".to_string(),
                proficiency: Proficiency::Intermediate,
            },
            SkillLevel {
                name: "SQL".to_string(),
                proficiency: Proficiency::Beginner,
            },
        ],
        interests: "distributed systems".to_string(),
        target_role: "Backend Engineer".to_string(),
    }
}
