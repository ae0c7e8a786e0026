use std::sync::Arc;

use crate::storage::PlayerStore;
use crate::sync::SyncOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlayerStore>,
    pub orchestrator: Arc<SyncOrchestrator>,
    /// `*` or a single allowed origin
    pub cors_origin: String,
}
