// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every system prompt: the decoder depends on exact marker lines.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond in plain text. Do NOT wrap the reply in markdown code fences. \
    Do NOT add headings other than the requested marker lines.";

/// Joins a service-specific system prompt with the shared fragments.
pub fn system_prompt(base: &str) -> String {
    format!("{base} {PLAIN_TEXT_INSTRUCTION}")
}
