//! crates/readflow_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the on-disk
//! store or the passage/insight generator.

use crate::domain::{ReadingInsight, ReadingPassage, ReadingSession};
use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Slots
//=========================================================================================

/// The named slots of the persistent store. Each slot holds one JSON
/// document; writes are last-write-wins per slot and there are no
/// transactions across slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreSlot {
    Stats,
    Goals,
    Sessions,
    Activities,
    Syllabus,
}

impl StoreSlot {
    pub const ALL: [StoreSlot; 5] = [
        StoreSlot::Stats,
        StoreSlot::Goals,
        StoreSlot::Sessions,
        StoreSlot::Activities,
        StoreSlot::Syllabus,
    ];

    /// The stable storage key for this slot.
    pub fn key(&self) -> &'static str {
        match self {
            StoreSlot::Stats => "readflow_stats",
            StoreSlot::Goals => "readflow_tasks",
            StoreSlot::Sessions => "readflow_sessions",
            StoreSlot::Activities => "readflow_activities",
            StoreSlot::Syllabus => "readflow_syllabus_state",
        }
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the JSON document stored in `slot`, or `None` if the slot has
    /// never been written.
    async fn read(&self, slot: StoreSlot) -> PortResult<Option<Value>>;

    /// Replaces the JSON document stored in `slot`.
    async fn write(&self, slot: StoreSlot, value: &Value) -> PortResult<()>;
}

#[async_trait]
pub trait PassageGenerationService: Send + Sync {
    /// Generates a short passage about `topic` for a speed-reading test.
    async fn generate_passage(&self, topic: &str) -> PortResult<ReadingPassage>;
}

#[async_trait]
pub trait InsightGenerationService: Send + Sync {
    /// Generates a handful of insights from the given recent sessions.
    async fn generate_insights(
        &self,
        sessions: &[ReadingSession],
    ) -> PortResult<Vec<ReadingInsight>>;
}
