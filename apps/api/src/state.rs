use std::sync::Arc;

use crate::audit::gateway::{ChatGateway, ExtractionGateway};
use crate::audit::scoring::ScoringConfig;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-analysis or per-conversation data.
#[derive(Clone)]
pub struct AppState {
    /// Document → raw extractor text. Default: `LlmClient`.
    pub extractor: Arc<dyn ExtractionGateway>,
    pub chat: Arc<dyn ChatGateway>,
    pub scoring: Arc<ScoringConfig>,
}
