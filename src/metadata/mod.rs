//! Image metadata: the flat snapshot the caption engine reads, and the
//! external extractor that produces it.
//!
//! - [`MetadataSnapshot`] — immutable `GROUP:Field` → value map with typed getters
//! - [`MetadataSource`] — trait for anything that can produce a snapshot from a file
//! - [`ExifTool`] — the default source, backed by the `exiftool` binary
//!
//! Binary EXIF/IPTC/XMP parsing is never done in-process; `exiftool` does it and
//! hands back JSON.

mod exiftool;
mod snapshot;

pub use exiftool::{ExifTool, parse_exiftool_json};
pub use snapshot::{MetadataSnapshot, MetadataValue, Namespace};

use std::path::Path;

use crate::error::Result;

/// Trait for metadata extractors.
///
/// The library ships with [`ExifTool`]. Tests and embedders can provide their own
/// implementation to feed a prepared snapshot into the pipeline.
pub trait MetadataSource {
    /// The display name of this source (e.g. `"exiftool"`).
    fn name(&self) -> &str;
    /// Read all metadata groups from the image at `path`.
    fn read(&self, path: &Path) -> Result<MetadataSnapshot>;
}
