use std::path::{Path, PathBuf};

use crate::caption::{self, Caption, CaptionOptions};
use crate::clock::Clock;
use crate::error::{CaptionError, Result};
use crate::metadata::{MetadataSnapshot, MetadataSource, Namespace};
use crate::tables::LookupTables;

/// Extensions exiftool is known to read metadata from.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "tif", "tiff", "heic", "heif", "avif",
    // RAW formats
    "cr3", "cr2", "dng", "nef", "arw", "raf", "orf", "rw2", "pef", "srw",
];

/// The result of processing a single image.
#[derive(Debug)]
pub struct PostResult {
    pub path: PathBuf,
    /// Everything the extractor reported, for `--dump`.
    pub metadata: MetadataSnapshot,
    pub caption: Caption,
}

/// Check if a file has an extension exiftool is expected to handle.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Run `source` once over `path`.
pub fn read_metadata(path: &Path, source: &dyn MetadataSource) -> Result<MetadataSnapshot> {
    if !is_supported_image(path) {
        log::warn!("Unrecognised image extension: {}", path.display());
    }
    log::debug!("Reading metadata with {}", source.name());
    source.read(path)
}

/// Compose the caption for metadata already read from `path`.
///
/// Fails with [`CaptionError::MetadataUnavailable`] if the image has no EXIF data.
pub fn caption_for(
    path: &Path,
    metadata: &MetadataSnapshot,
    tables: &LookupTables,
    options: &CaptionOptions,
    clock: &dyn Clock,
) -> Result<Caption> {
    if !metadata.has_namespace(Namespace::Exif) {
        return Err(CaptionError::MetadataUnavailable {
            path: path.to_path_buf(),
        });
    }
    caption::compose_caption(metadata, tables, options, clock.today())
}

/// Read metadata from `path` and compose its caption.
///
/// 1. **Read** — one call to `source`
/// 2. **Check** — the image must carry EXIF data
/// 3. **Compose** — [`caption::compose_caption`] with `clock.today()`
///
/// # Example
///
/// ```rust,no_run
/// use photo_post_data::caption::CaptionOptions;
/// use photo_post_data::clock::SystemClock;
/// use photo_post_data::metadata::ExifTool;
/// use photo_post_data::pipeline::process_image;
/// use photo_post_data::tables::LookupTables;
/// use std::path::Path;
///
/// # fn example() -> photo_post_data::error::Result<()> {
/// let options = CaptionOptions { hashtags: true, ..Default::default() };
/// let result = process_image(
///     Path::new("photo.jpg"),
///     &ExifTool::default(),
///     &LookupTables::default(),
///     &options,
///     &SystemClock,
/// )?;
/// println!("{}", result.caption);
/// # Ok(())
/// # }
/// ```
pub fn process_image(
    path: &Path,
    source: &dyn MetadataSource,
    tables: &LookupTables,
    options: &CaptionOptions,
    clock: &dyn Clock,
) -> Result<PostResult> {
    let metadata = read_metadata(path, source)?;
    let caption = caption_for(path, &metadata, tables, options, clock)?;

    Ok(PostResult {
        path: path.to_path_buf(),
        metadata,
        caption,
    })
}

/// Write the caption text to `path`.
pub fn write_caption(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| CaptionError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Caption written to {}", path.display());
    Ok(())
}
