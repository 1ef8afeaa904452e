use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use super::{MetadataSnapshot, MetadataSource, MetadataValue};
use crate::error::{CaptionError, Result};

const DEFAULT_PROGRAM: &str = "exiftool";

/// Reads metadata by running the `exiftool` binary.
///
/// Each [`read`](MetadataSource::read) spawns one process, waits for it, and parses
/// its JSON output. Nothing is kept alive between reads.
///
/// Flags used:
/// - `-json` — machine-readable output
/// - `-G` — prefix every tag with its group (`EXIF:`, `IPTC:`, `XMP:`, …)
/// - `-n` — numeric values (`0.008` instead of `1/125`, `N` instead of `North`)
/// - `-charset iptc=UTF8` — decode IPTC strings as UTF-8
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

impl ExifTool {
    /// Use a specific exiftool binary instead of the one on `PATH`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn error(&self, reason: impl Into<String>) -> CaptionError {
        CaptionError::Extractor {
            program: self.program.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl MetadataSource for ExifTool {
    fn name(&self) -> &str {
        DEFAULT_PROGRAM
    }

    fn read(&self, path: &Path) -> Result<MetadataSnapshot> {
        log::debug!(
            "Running {} -json -G -n on {}",
            self.program.display(),
            path.display()
        );

        let output = Command::new(&self.program)
            .args(["-json", "-G", "-n", "-charset", "iptc=UTF8"])
            .arg(path)
            .output()
            .map_err(|e| self.error(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.error(format!("{} ({})", stderr.trim(), output.status)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let snapshot = parse_exiftool_json(&stdout).map_err(|e| self.error(e))?;
        log::debug!("Read {} metadata fields from {}", snapshot.len(), path.display());
        Ok(snapshot)
    }
}

/// Parse the output of `exiftool -json -G` for a single file into a snapshot.
///
/// Strings and numbers map to scalar values, arrays to lists. Nested objects
/// (only produced with `-struct`) and the `SourceFile` entry are skipped.
pub fn parse_exiftool_json(json: &str) -> std::result::Result<MetadataSnapshot, String> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON output: {e}"))?;

    let object = match value {
        Value::Array(mut files) if !files.is_empty() => files.swap_remove(0),
        Value::Object(_) => value,
        _ => return Err("no file entries in output".to_string()),
    };

    let Value::Object(entries) = object else {
        return Err("file entry is not a JSON object".to_string());
    };

    let mut fields = BTreeMap::new();
    for (key, value) in entries {
        if key == "SourceFile" {
            continue;
        }
        if let Some(v) = json_to_value(value) {
            fields.insert(key, v);
        }
    }

    Ok(MetadataSnapshot::new(fields))
}

fn json_to_value(value: Value) -> Option<MetadataValue> {
    match value {
        Value::String(s) => Some(MetadataValue::Text(s)),
        Value::Number(n) => n.as_f64().map(MetadataValue::Number),
        Value::Bool(b) => Some(MetadataValue::Text(b.to_string())),
        Value::Array(items) => Some(MetadataValue::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
        )),
        Value::Null | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Namespace;

    const SAMPLE: &str = r#"[{
        "SourceFile": "photo.jpg",
        "ExifTool:ExifToolVersion": 12.76,
        "File:FileName": "photo.jpg",
        "EXIF:Make": "SONY",
        "EXIF:Model": "ILCE-6000",
        "EXIF:ExposureTime": 0.008,
        "EXIF:FNumber": 8,
        "EXIF:DateTimeOriginal": "2023:07:04 19:30:00",
        "EXIF:GPSLatitude": 41.5,
        "EXIF:GPSLatitudeRef": "N",
        "IPTC:ObjectName": "Sunset Beach",
        "IPTC:Keywords": ["sunset", "beach"],
        "XMP:Flash": {"Fired": false}
    }]"#;

    #[test]
    fn parses_grouped_tags() {
        let snapshot = parse_exiftool_json(SAMPLE).unwrap();
        assert_eq!(snapshot.text(Namespace::Exif, "Model").as_deref(), Some("ILCE-6000"));
        assert_eq!(snapshot.number(Namespace::Exif, "ExposureTime"), Some(0.008));
        assert_eq!(
            snapshot.list(Namespace::Iptc, "Keywords"),
            vec!["sunset".to_string(), "beach".to_string()]
        );
    }

    #[test]
    fn skips_source_file_and_structs() {
        let snapshot = parse_exiftool_json(SAMPLE).unwrap();
        assert!(snapshot.get(Namespace::Xmp, "Flash").is_none());
        assert!(!snapshot.groups().contains_key("SourceFile"));
        assert!(!snapshot.groups().contains_key("Other"));
    }

    #[test]
    fn accepts_bare_object() {
        let snapshot = parse_exiftool_json(r#"{"EXIF:Model": "X-T4"}"#).unwrap();
        assert_eq!(snapshot.text(Namespace::Exif, "Model").as_deref(), Some("X-T4"));
    }

    #[test]
    fn numeric_list_items_become_text() {
        let snapshot = parse_exiftool_json(r#"[{"EXIF:GPSLatitude": [40, 30, 0]}]"#).unwrap();
        assert_eq!(
            snapshot.get(Namespace::Exif, "GPSLatitude"),
            Some(&MetadataValue::List(vec!["40".into(), "30".into(), "0".into()]))
        );
    }

    #[test]
    fn empty_array_fails() {
        assert!(parse_exiftool_json("[]").is_err());
    }

    #[test]
    fn garbage_fails() {
        assert!(parse_exiftool_json("Error: File not found").is_err());
    }

    // ── running the binary ───────────────────────────────────────────

    #[test]
    fn default_program_is_on_path() {
        assert_eq!(ExifTool::default().program(), Path::new("exiftool"));
        assert_eq!(ExifTool::default().name(), "exiftool");
    }

    #[test]
    fn missing_binary_is_extractor_error() {
        let tool = ExifTool::new("/nonexistent/exiftool");
        assert_eq!(tool.program(), Path::new("/nonexistent/exiftool"));
        let err = tool.read(Path::new("photo.jpg")).unwrap_err();
        assert!(matches!(err, CaptionError::Extractor { .. }));
    }

    /// Write an executable shell script standing in for exiftool.
    #[cfg(unix)]
    fn fake_exiftool(dir: &tempfile::TempDir, body: &str) -> ExifTool {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("exiftool");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        ExifTool::new(path)
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_extractor_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let tool = fake_exiftool(&dir, "echo 'File not found: photo.jpg' >&2\nexit 1");
        let err = tool.read(Path::new("photo.jpg")).unwrap_err();
        match err {
            CaptionError::Extractor { program, reason } => {
                assert!(program.ends_with("exiftool"));
                assert!(reason.contains("File not found: photo.jpg"), "reason: {reason}");
            }
            other => panic!("expected Extractor error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn reads_json_from_the_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        // Arguments: -json -G -n -charset iptc=UTF8 <file>
        let body = r#"[ "$1" = "-json" ] && [ "$2" = "-G" ] && [ "$3" = "-n" ] || exit 2
echo "[{\"SourceFile\": \"$6\", \"EXIF:Model\": \"ILCE-6000\", \"EXIF:ISO\": 100, \"IPTC:Keywords\": [\"sunset\"]}]""#;
        let tool = fake_exiftool(&dir, body);
        let snapshot = tool.read(Path::new("photo.jpg")).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.text(Namespace::Exif, "Model").as_deref(), Some("ILCE-6000"));
        assert_eq!(snapshot.number(Namespace::Exif, "ISO"), Some(100.0));
        assert_eq!(snapshot.list(Namespace::Iptc, "Keywords"), vec!["sunset".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn unparsable_output_is_extractor_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let tool = fake_exiftool(&dir, "echo 'not json'");
        let err = tool.read(Path::new("photo.jpg")).unwrap_err();
        assert!(matches!(err, CaptionError::Extractor { .. }));
    }
}
