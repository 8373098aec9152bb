//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use readflow_core::ports::{InsightGenerationService, PassageGenerationService};
use readflow_core::practice::SpeedTest;
use readflow_core::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The tracker mutex serializes every mutation, which reproduces the
/// original single-threaded event-queue model: handlers interleave as
/// discrete events and no torn reads are possible.
pub struct AppState {
    pub tracker: Mutex<Tracker>,
    /// The speed-test attempt in flight, if any. One at a time.
    pub practice: Mutex<Option<SpeedTest>>,
    pub config: Arc<Config>,
    /// Content generation is optional: without an API key both adapters are
    /// absent and the handlers serve the deterministic fallbacks.
    pub passage_adapter: Option<Arc<dyn PassageGenerationService>>,
    pub insight_adapter: Option<Arc<dyn InsightGenerationService>>,
}
