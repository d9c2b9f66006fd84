//! Map parsers and the provider registry
//!
//! A parser turns a directory into a [`MapDescriptor`]. The registry maps each
//! [`MapOrigin`] to a factory building a fresh parser per import call, so a
//! parser's status never leaks between concurrent imports. New providers are
//! supported by registering another factory.

mod vips;

pub use vips::VipsMapParser;

use crate::loader::{DescriptorLoader, JsonDescriptorLoader};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tilemap_common::config::ImportSettings;
use tilemap_common::{ImportStatus, MapDescriptor, MapOrigin, ParseError};
use tokio_util::sync::CancellationToken;

/// Produces a [`MapDescriptor`] from a directory
pub trait MapParser: Send {
    /// Parse `directory`, checking `cancel` between pipeline steps
    fn parse(
        &mut self,
        directory: &Path,
        cancel: &CancellationToken,
    ) -> Result<MapDescriptor, ParseError>;

    /// Status of the last parse; `NoMap` until one succeeded
    fn status(&self) -> ImportStatus;
}

/// Collaborators and settings handed to every parser factory
#[derive(Clone)]
pub struct ParserContext {
    pub loader: Arc<dyn DescriptorLoader>,
    pub settings: ImportSettings,
}

impl Default for ParserContext {
    fn default() -> Self {
        Self {
            loader: Arc::new(JsonDescriptorLoader::new()),
            settings: ImportSettings::default(),
        }
    }
}

/// Builds a parser for one import call
pub type ParserFactory = fn(&ParserContext) -> Box<dyn MapParser>;

static STANDARD_REGISTRY: Lazy<Arc<ParserRegistry>> = Lazy::new(|| {
    Arc::new(
        ParserRegistry::builder()
            .register(MapOrigin::Vips, VipsMapParser::boxed)
            .build(),
    )
});

/// Immutable provider → parser mapping
#[derive(Clone, Default)]
pub struct ParserRegistry {
    factories: HashMap<MapOrigin, ParserFactory>,
}

impl ParserRegistry {
    /// Process-wide registry with every built-in parser
    pub fn standard() -> Arc<ParserRegistry> {
        Arc::clone(&STANDARD_REGISTRY)
    }

    /// Registry without any parser
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> ParserRegistryBuilder {
        ParserRegistryBuilder::default()
    }

    /// Build a parser for `origin`, if one is registered
    pub fn create(&self, origin: MapOrigin, context: &ParserContext) -> Option<Box<dyn MapParser>> {
        self.factories.get(&origin).map(|factory| factory(context))
    }

    pub fn supports(&self, origin: MapOrigin) -> bool {
        self.factories.contains_key(&origin)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Collects factories before freezing them into a [`ParserRegistry`]
#[derive(Default)]
pub struct ParserRegistryBuilder {
    factories: HashMap<MapOrigin, ParserFactory>,
}

impl ParserRegistryBuilder {
    /// Register (or replace) the factory for `origin`
    pub fn register(mut self, origin: MapOrigin, factory: ParserFactory) -> Self {
        self.factories.insert(origin, factory);
        self
    }

    pub fn build(self) -> ParserRegistry {
        ParserRegistry {
            factories: self.factories,
        }
    }
}
