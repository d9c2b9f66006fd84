//! tilemap-importer library interface
//!
//! Discovers the implicit layout of a tile pyramid directory
//! (`root/<level>/<row>/<column>.<ext>`) and synthesizes a map descriptor
//! from it, or loads the descriptor already present at the pyramid root.
//!
//! ```no_run
//! use tilemap_common::events::EventBus;
//! use tilemap_common::MapOrigin;
//! use tilemap_importer::MapImporter;
//!
//! # async fn run() {
//! let importer = MapImporter::new(EventBus::new(100));
//! if let Some(handle) = importer.import("/data/maps/alps", MapOrigin::Vips, None) {
//!     let outcome = handle.outcome().await;
//!     println!("{:?}", outcome.map(|o| o.status()));
//! }
//! # }
//! ```

pub mod importer;
pub mod loader;
pub mod parser;
pub mod services;

pub use crate::importer::{ImportHandle, ImportOutcome, MapImportListener, MapImporter};
pub use crate::loader::{DescriptorLoader, JsonDescriptorLoader};
pub use crate::parser::{MapParser, ParserContext, ParserRegistry};
