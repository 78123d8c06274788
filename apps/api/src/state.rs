use std::sync::Arc;

use crate::advice::sections::MarkerSet;
use crate::completion::CompletionStateStore;
use crate::llm_client::TextGenerator;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable AI collaborator. Default: `LlmClient`. Tests swap in a stub.
    pub llm: Arc<dyn TextGenerator>,
    /// Completion persistence, backend chosen by `COMPLETION_STORE`.
    pub completion: CompletionStateStore,
    pub sessions: Arc<SessionRegistry>,
    /// Marker lines shared by the prompt builder and the splitter.
    pub markers: Arc<MarkerSet>,
}
