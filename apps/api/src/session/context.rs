//! Session context — everything one user's session owns.
//!
//! Lifecycle: `start` on login, `apply_submission` after each decoded reply,
//! `toggle_item` / `toggle_step` on checkbox clicks, dropped on logout or
//! when the registry evicts it as idle.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::advice::decoder::{AdviceView, DecodedAdvice};
use crate::advice::roadmap::completion_label;
use crate::errors::AppError;
use crate::models::profile::ProfileInput;

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    /// Partition key for persisted completion state.
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub started_at: DateTime<Utc>,
    profile: Option<ProfileInput>,
    advice: Option<DecodedAdvice>,
    /// Completion flags for the current checklist only.
    checklist: BTreeMap<String, bool>,
    /// Completion flags for the current roadmap, keyed by step title.
    roadmap: BTreeMap<String, bool>,
    /// Non-fatal messages from the latest submission.
    notices: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub user_id: String,
    pub username: String,
    pub submitted: bool,
    pub profile: Option<ProfileInput>,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Both fields must be non-blank. The user id is the trimmed username.
    pub fn start(username: &str, email: &str) -> Result<Self, AppError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(AppError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }
        Ok(Self {
            session_id: Uuid::new_v4(),
            user_id: username.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            started_at: Utc::now(),
            profile: None,
            advice: None,
            checklist: BTreeMap::new(),
            roadmap: BTreeMap::new(),
            notices: Vec::new(),
        })
    }

    pub fn is_submitted(&self) -> bool {
        self.advice.is_some()
    }

    #[cfg(test)]
    pub fn checklist_state(&self) -> &BTreeMap<String, bool> {
        &self.checklist
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id,
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            submitted: self.is_submitted(),
            profile: self.profile.clone(),
            started_at: self.started_at,
        }
    }

    /// Replaces the previous submission. `persisted` is the bulk-loaded state;
    /// only labels present in the new checklist or roadmap are kept in the session.
    pub fn apply_submission(
        &mut self,
        profile: ProfileInput,
        advice: DecodedAdvice,
        persisted: &BTreeMap<String, bool>,
        notices: Vec<String>,
    ) {
        self.checklist = advice
            .checklist_labels()
            .iter()
            .map(|label| {
                let done = persisted.get(label).copied().unwrap_or(false);
                (label.clone(), done)
            })
            .collect();
        self.roadmap = advice
            .step_titles()
            .into_iter()
            .map(|title| {
                let done = persisted
                    .get(&completion_label(title))
                    .copied()
                    .unwrap_or(false);
                (title.to_string(), done)
            })
            .collect();
        self.profile = Some(profile);
        self.advice = Some(advice);
        self.notices = notices;
    }

    /// Fails with `NotFound` before any submission or for a label that is not
    /// on the current checklist.
    pub fn ensure_label(&self, label: &str) -> Result<(), AppError> {
        let advice = self
            .advice
            .as_ref()
            .ok_or_else(|| AppError::NotFound("No advice has been generated yet".to_string()))?;
        if !advice.has_label(label) {
            return Err(AppError::NotFound(format!(
                "Checklist item '{label}' not found"
            )));
        }
        Ok(())
    }

    pub fn toggle_item(&mut self, label: &str, completed: bool) -> Result<(), AppError> {
        let label = label.trim();
        self.ensure_label(label)?;
        self.checklist.insert(label.to_string(), completed);
        Ok(())
    }

    /// Same contract as `ensure_label`, for roadmap step titles.
    pub fn ensure_step(&self, title: &str) -> Result<(), AppError> {
        let advice = self
            .advice
            .as_ref()
            .ok_or_else(|| AppError::NotFound("No advice has been generated yet".to_string()))?;
        if !advice.has_step(title) {
            return Err(AppError::NotFound(format!(
                "Roadmap step '{title}' not found"
            )));
        }
        Ok(())
    }

    /// Steps sharing a title share one flag.
    pub fn toggle_step(&mut self, title: &str, completed: bool) -> Result<(), AppError> {
        let title = title.trim();
        self.ensure_step(title)?;
        self.roadmap.insert(title.to_string(), completed);
        Ok(())
    }

    pub fn view(&self) -> Option<AdviceView> {
        self.advice.as_ref().map(|advice| {
            let mut view = advice.view(&self.checklist, &self.roadmap);
            view.notices.extend(self.notices.iter().cloned());
            view
        })
    }
}
