use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::cache::ScreeningCache;
use crate::config::Config;
use crate::llm_client::ModelInvoker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Production wires `LlmClient`; tests stub it.
    pub llm: Arc<dyn ModelInvoker>,
    pub cache: ScreeningCache,
    pub config: Config,
}

impl AppState {
    /// Anchor date for open-ended experience periods: the configured fixed
    /// date when set, otherwise today.
    pub fn reference_date(&self) -> NaiveDate {
        self.config
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}
