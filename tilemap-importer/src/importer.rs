//! Map import orchestration
//!
//! [`MapImporter::import`] selects a parser by provider, runs it on Tokio's
//! blocking pool and delivers exactly one terminal outcome per call:
//! - always to the [`EventBus`] the importer was wired with
//! - to the per-call [`MapImportListener`], when one was supplied
//!
//! There are no retries: a parse is a deterministic function of the on-disk
//! state, so a failure is reported once and that is it. Imports of the same
//! directory are not serialized; callers needing that must do it themselves.

use crate::loader::DescriptorLoader;
use crate::parser::{ParserContext, ParserRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilemap_common::config::ImportSettings;
use tilemap_common::events::{EventBus, ImportEvent};
use tilemap_common::{ImportStatus, MapDescriptor, MapOrigin, ParseError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Terminal result of one import call
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported {
        descriptor: MapDescriptor,
        status: ImportStatus,
    },
    Failed(ParseError),
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }

    /// Final status: `NoMap` for a failure
    pub fn status(&self) -> ImportStatus {
        match self {
            ImportOutcome::Imported { status, .. } => *status,
            ImportOutcome::Failed(_) => ImportStatus::NoMap,
        }
    }

    pub fn into_result(self) -> Result<(MapDescriptor, ImportStatus), ParseError> {
        match self {
            ImportOutcome::Imported { descriptor, status } => Ok((descriptor, status)),
            ImportOutcome::Failed(e) => Err(e),
        }
    }
}

/// Per-call receiver of an import outcome
///
/// Both methods consume the listener: at most one of them is ever called,
/// and only once.
pub trait MapImportListener: Send + 'static {
    fn on_map_imported(self: Box<Self>, descriptor: MapDescriptor, status: ImportStatus);

    fn on_map_import_error(self: Box<Self>, error: ParseError);
}

impl MapImportListener for oneshot::Sender<ImportOutcome> {
    fn on_map_imported(self: Box<Self>, descriptor: MapDescriptor, status: ImportStatus) {
        if self.send(ImportOutcome::Imported { descriptor, status }).is_err() {
            tracing::debug!("Import listener dropped before delivery");
        }
    }

    fn on_map_import_error(self: Box<Self>, error: ParseError) {
        if self.send(ImportOutcome::Failed(error)).is_err() {
            tracing::debug!("Import listener dropped before delivery");
        }
    }
}

/// Handle on a running import
///
/// Dropping it does not stop the import; delivery still happens.
pub struct ImportHandle {
    import_id: Uuid,
    task: JoinHandle<ImportOutcome>,
}

impl ImportHandle {
    /// Identifier carried by the terminal [`ImportEvent`]
    pub fn import_id(&self) -> Uuid {
        self.import_id
    }

    /// Wait for delivery to complete and return the outcome
    ///
    /// `None` only if the delivery task itself was aborted, e.g. by a
    /// panicking listener.
    pub async fn outcome(self) -> Option<ImportOutcome> {
        match self.task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(import_id = %self.import_id, "Import delivery task failed: {}", e);
                None
            }
        }
    }
}

/// Entry point of the importer
#[derive(Clone)]
pub struct MapImporter {
    registry: Arc<ParserRegistry>,
    context: ParserContext,
    event_bus: EventBus,
}

impl MapImporter {
    /// Importer with the standard parsers, reporting to `event_bus`
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            registry: ParserRegistry::standard(),
            context: ParserContext::default(),
            event_bus,
        }
    }

    pub fn with_registry(mut self, registry: Arc<ParserRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn DescriptorLoader>) -> Self {
        self.context.loader = loader;
        self
    }

    pub fn with_settings(mut self, settings: ImportSettings) -> Self {
        self.context.settings = settings;
        self
    }

    /// Import `directory` with the parser registered for `origin`
    ///
    /// Returns `None`, and delivers nothing, when no parser is registered.
    /// Must be called from within a Tokio runtime.
    pub fn import(
        &self,
        directory: impl AsRef<Path>,
        origin: MapOrigin,
        listener: Option<Box<dyn MapImportListener>>,
    ) -> Option<ImportHandle> {
        self.import_with_cancel(directory, origin, listener, CancellationToken::new())
    }

    /// Same as [`import`](Self::import), with cooperative cancellation
    ///
    /// Cancelling still produces exactly one delivery: `ParseError::Cancelled`,
    /// unless the parse had already finished.
    pub fn import_with_cancel(
        &self,
        directory: impl AsRef<Path>,
        origin: MapOrigin,
        listener: Option<Box<dyn MapImportListener>>,
        cancel: CancellationToken,
    ) -> Option<ImportHandle> {
        let directory = directory.as_ref().to_path_buf();

        let Some(mut parser) = self.registry.create(origin, &self.context) else {
            tracing::warn!(%origin, directory = %directory.display(), "No parser registered, ignoring import");
            return None;
        };

        let import_id = Uuid::new_v4();
        let event_bus = self.event_bus.clone();

        tracing::info!(
            %import_id,
            %origin,
            directory = %directory.display(),
            "Starting map import"
        );

        let task = tokio::spawn(async move {
            let parse_dir = directory.clone();
            let joined = tokio::task::spawn_blocking(move || {
                let result = parser.parse(&parse_dir, &cancel);
                (result, parser.status())
            })
            .await;

            let outcome = match joined {
                Ok((Ok(descriptor), status)) => ImportOutcome::Imported { descriptor, status },
                Ok((Err(error), _)) => ImportOutcome::Failed(error),
                Err(e) => ImportOutcome::Failed(ParseError::WorkerFailed(e.to_string())),
            };

            deliver(&event_bus, import_id, directory, &outcome, listener);
            outcome
        });

        Some(ImportHandle { import_id, task })
    }
}

/// Fan the outcome out to the observer and the optional listener
fn deliver(
    event_bus: &EventBus,
    import_id: Uuid,
    directory: PathBuf,
    outcome: &ImportOutcome,
    listener: Option<Box<dyn MapImportListener>>,
) {
    let timestamp = chrono::Utc::now();

    match outcome {
        ImportOutcome::Imported { descriptor, status } => {
            tracing::info!(
                %import_id,
                name = %descriptor.name,
                %status,
                levels = descriptor.levels.len(),
                width = descriptor.size.width,
                height = descriptor.size.height,
                "Map imported"
            );
            event_bus.emit_lossy(ImportEvent::MapImported {
                import_id,
                directory,
                descriptor: Box::new(descriptor.clone()),
                status: *status,
                timestamp,
            });
            if let Some(listener) = listener {
                listener.on_map_imported(descriptor.clone(), *status);
            }
        }
        ImportOutcome::Failed(error) => {
            tracing::warn!(%import_id, directory = %directory.display(), "Map import failed: {}", error);
            event_bus.emit_lossy(ImportEvent::MapImportFailed {
                import_id,
                directory,
                error: error.clone(),
                timestamp,
            });
            if let Some(listener) = listener {
                listener.on_map_import_error(error.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let failed = ImportOutcome::Failed(ParseError::NoLevelFound);
        assert!(!failed.is_success());
        assert_eq!(failed.status(), ImportStatus::NoMap);
        assert_eq!(failed.into_result().unwrap_err(), ParseError::NoLevelFound);
    }

    #[tokio::test]
    async fn test_unregistered_origin_is_noop() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        let importer =
            MapImporter::new(bus).with_registry(Arc::new(ParserRegistry::empty()));

        let (tx, rx_listener) = oneshot::channel();
        let handle = importer.import("/tmp", MapOrigin::Vips, Some(Box::new(tx)));

        assert!(handle.is_none());
        // Listener was dropped without being called
        assert!(rx_listener.await.is_err());
        assert!(rx.try_recv().is_err());
    }
}
