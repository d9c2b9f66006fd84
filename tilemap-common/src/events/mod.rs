//! Event system for tilemap
//!
//! Provides the import event definitions and the EventBus that acts as the
//! process-wide observer of every import outcome.

use crate::map::{ImportStatus, MapDescriptor, ParseError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Import event types
///
/// Exactly one event is emitted per started import: either `MapImported` or
/// `MapImportFailed`. Events are serializable so a caller can forward them
/// (log files, UI bridges) without further mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportEvent {
    /// A descriptor was produced for the imported directory
    MapImported {
        /// Identifier of the import call
        import_id: Uuid,
        /// Directory given to the import call
        directory: PathBuf,
        /// Resulting descriptor
        descriptor: Box<MapDescriptor>,
        /// NEW_MAP or EXISTING_MAP
        status: ImportStatus,
        /// When the import finished
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The import failed with a terminal parse error
    MapImportFailed {
        /// Identifier of the import call
        import_id: Uuid,
        /// Directory given to the import call
        directory: PathBuf,
        /// Failure kind
        error: ParseError,
        /// When the import finished
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ImportEvent {
    /// Identifier of the import call this event terminates
    pub fn import_id(&self) -> Uuid {
        match self {
            ImportEvent::MapImported { import_id, .. }
            | ImportEvent::MapImportFailed { import_id, .. } => *import_id,
        }
    }

    /// Event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            ImportEvent::MapImported { .. } => "MapImported",
            ImportEvent::MapImportFailed { .. } => "MapImportFailed",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central distribution bus for import events
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block the importer)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// The importer is handed an EventBus at wiring time and emits every terminal
/// outcome on it, whether or not a per-call listener was supplied.
///
/// # Examples
///
/// ```
/// use tilemap_common::events::EventBus;
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// // In async context:
/// // while let Ok(event) = rx.recv().await {
/// //     println!("{}: {}", event.event_type(), event.import_id());
/// // }
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ImportEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    ///
    /// `capacity` is the number of events buffered per subscriber before the
    /// oldest ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ImportEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ImportEvent,
    ) -> Result<usize, broadcast::error::SendError<ImportEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ImportEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Import event dropped: no subscribers");
        }
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
