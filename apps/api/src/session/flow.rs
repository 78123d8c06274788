//! Submission and completion flows.
//!
//! Submit: validate → build prompt → AI call → decode → load completion state →
//!         apply to session → view.
//! Toggle: check label → merge-save `{label: completed}` → update session → view.
//!         Roadmap steps follow the same path under `roadmap:<title>` labels.
//!
//! The registry lock is never held across the AI call or a store round-trip.
//! A resubmission can therefore replace the advice between a toggle's save and
//! its session update. The saved flag is kept (it applies again whenever a later
//! submission lists the same label) and the toggle reports `NotFound`.

use std::collections::BTreeMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::advice::decoder::{decode_advice, AdviceView};
use crate::advice::prompts::{build_advice_prompt, ADVICE_SYSTEM};
use crate::advice::roadmap::completion_label;
use crate::errors::AppError;
use crate::llm_client::prompts::system_prompt;
use crate::models::profile::ProfileInput;
use crate::state::AppState;

const LOAD_FAILED_NOTICE: &str = "Saved checklist progress could not be loaded.";

pub async fn submit_profile(
    state: &AppState,
    session_id: Uuid,
    profile: ProfileInput,
) -> Result<AdviceView, AppError> {
    profile.validate()?;
    let user_id = state
        .sessions
        .read(session_id, |s| s.user_id.clone())
        .await?;

    info!("Requesting career advice for user {user_id}");
    let prompt = build_advice_prompt(&profile);
    // Upstream failure returns here: the previous advice in the session is kept.
    let reply = state
        .llm
        .generate(&prompt, &system_prompt(ADVICE_SYSTEM))
        .await?;

    let advice = decode_advice(&reply, &state.markers);

    let mut notices = Vec::new();
    let persisted = match state.completion.load(&user_id).await {
        Ok(states) => states,
        Err(e) => {
            warn!("Completion state load failed for user {user_id}: {e}");
            notices.push(LOAD_FAILED_NOTICE.to_string());
            BTreeMap::new()
        }
    };

    state
        .sessions
        .update(session_id, |session| {
            session.apply_submission(profile, advice, &persisted, notices);
            session
                .view()
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("submission was not applied")))
        })
        .await
}

pub async fn toggle_checklist_item(
    state: &AppState,
    session_id: Uuid,
    label: &str,
    completed: bool,
) -> Result<AdviceView, AppError> {
    let label = label.trim();
    let user_id = state
        .sessions
        .read(session_id, |s| s.ensure_label(label).map(|_| s.user_id.clone()))
        .await??;

    let mut change = BTreeMap::new();
    change.insert(label.to_string(), completed);
    state.completion.save(&user_id, &change).await?;
    info!(
        "User {user_id} marked '{label}' as {}",
        if completed { "done" } else { "not done" }
    );

    state
        .sessions
        .update(session_id, |session| {
            session.toggle_item(label, completed).map_err(|e| {
                warn!("Saved '{label}' for user {user_id}, but the checklist was replaced first");
                e
            })?;
            session
                .view()
                .ok_or_else(|| AppError::NotFound("No advice has been generated yet".to_string()))
        })
        .await
}

pub async fn toggle_roadmap_step(
    state: &AppState,
    session_id: Uuid,
    title: &str,
    completed: bool,
) -> Result<AdviceView, AppError> {
    let title = title.trim();
    let user_id = state
        .sessions
        .read(session_id, |s| s.ensure_step(title).map(|_| s.user_id.clone()))
        .await??;

    let mut change = BTreeMap::new();
    change.insert(completion_label(title), completed);
    state.completion.save(&user_id, &change).await?;
    info!(
        "User {user_id} marked roadmap step '{title}' as {}",
        if completed { "done" } else { "not done" }
    );

    state
        .sessions
        .update(session_id, |session| {
            session.toggle_step(title, completed).map_err(|e| {
                warn!("Saved step '{title}' for user {user_id}, but the roadmap was replaced first");
                e
            })?;
            session
                .view()
                .ok_or_else(|| AppError::NotFound("No advice has been generated yet".to_string()))
        })
        .await
}

pub async fn current_view(state: &AppState, session_id: Uuid) -> Result<AdviceView, AppError> {
    state
        .sessions
        .read(session_id, |s| s.view())
        .await?
        .ok_or_else(|| AppError::NotFound("No advice has been generated yet".to_string()))
}

/// Graphviz DOT for the current roadmap, completed steps filled.
pub async fn roadmap_dot(state: &AppState, session_id: Uuid) -> Result<String, AppError> {
    state
        .sessions
        .read(session_id, |s| s.view().map(|v| v.graph.to_dot()))
        .await?
        .ok_or_else(|| AppError::NotFound("No advice has been generated yet".to_string()))
}
