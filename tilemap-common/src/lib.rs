//! # Tilemap Common Library
//!
//! Shared code for the tile-pyramid importer and its callers:
//! - Map descriptor model (levels, tile size, provider, calibration)
//! - Import status and parse error taxonomy
//! - Event types (ImportEvent enum) and the EventBus observer
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod map;

pub use error::{Error, Result};
pub use map::{ImportStatus, MapDescriptor, MapOrigin, ParseError};
