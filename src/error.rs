//! Error types shared by the library.
//!
//! Every variant is terminal for a run: the CLI prints the message and exits
//! non-zero. Missing *optional* metadata never produces an error; the block that
//! needed it is simply left out of the caption.

use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::Namespace;

/// Errors raised while loading configuration, reading metadata, or composing a caption.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// A required command-line argument was not supplied.
    #[error("{0}")]
    UserInput(String),

    /// The image carries no EXIF data the caption can be built from.
    #[error("{} has no exif data", path.display())]
    MetadataUnavailable { path: PathBuf },

    /// A field needed by a requested caption block is absent.
    #[error("missing {namespace}:{field} (required for the {block} block)")]
    MissingField {
        namespace: Namespace,
        field: &'static str,
        block: &'static str,
    },

    /// The capture timestamp does not match `YYYY:MM:DD HH:MM:SS`.
    #[error("malformed capture timestamp '{value}': expected YYYY:MM:DD HH:MM:SS")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The config file exists but could not be read or parsed.
    #[error("failed to load config {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    /// The external metadata extractor could not be run or returned garbage.
    #[error("metadata extractor '{program}' failed: {reason}")]
    Extractor { program: String, reason: String },

    /// The caption could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CaptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_block() {
        let err = CaptionError::MissingField {
            namespace: Namespace::Exif,
            field: "ExposureTime",
            block: "exposure",
        };
        assert_eq!(
            err.to_string(),
            "missing EXIF:ExposureTime (required for the exposure block)"
        );
    }

    #[test]
    fn metadata_unavailable_mentions_path() {
        let err = CaptionError::MetadataUnavailable {
            path: PathBuf::from("photo.jpg"),
        };
        assert_eq!(err.to_string(), "photo.jpg has no exif data");
    }
}
