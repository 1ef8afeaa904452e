use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CaptionError, Result};

/// Metadata group a field belongs to.
///
/// Keys in a [`MetadataSnapshot`] are written `GROUP:Field`, e.g. `EXIF:Model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Camera-embedded technical capture data.
    Exif,
    /// Descriptive/editorial data: title, location, keywords, copyright.
    Iptc,
    /// Extensible metadata, used here for accessibility text.
    Xmp,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exif => "EXIF",
            Self::Iptc => "IPTC",
            Self::Xmp => "XMP",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single metadata value as reported by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<&str>> for MetadataValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Immutable view of every metadata field read from one image.
///
/// Built once per run by a [`MetadataSource`](super::MetadataSource) and only
/// ever read afterwards.
///
/// # Example
///
/// ```rust
/// use photo_post_data::metadata::{MetadataSnapshot, MetadataValue, Namespace};
///
/// let snapshot: MetadataSnapshot = [
///     ("EXIF:Model", MetadataValue::from("ILCE-6000")),
///     ("EXIF:FNumber", MetadataValue::from(2.8)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(snapshot.text(Namespace::Exif, "Model").as_deref(), Some("ILCE-6000"));
/// assert_eq!(snapshot.number(Namespace::Exif, "FNumber"), Some(2.8));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSnapshot {
    fields: BTreeMap<String, MetadataValue>,
}

impl MetadataSnapshot {
    pub fn new(fields: BTreeMap<String, MetadataValue>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Raw value for `namespace:field`, if present.
    pub fn get(&self, namespace: Namespace, field: &str) -> Option<&MetadataValue> {
        self.fields.get(&format!("{namespace}:{field}"))
    }

    /// True if at least one field of the group was read.
    pub fn has_namespace(&self, namespace: Namespace) -> bool {
        let prefix = format!("{namespace}:");
        self.fields.keys().any(|k| k.starts_with(&prefix))
    }

    /// Field as trimmed text. Empty strings count as absent.
    pub fn text(&self, namespace: Namespace, field: &str) -> Option<String> {
        let s = self.get(namespace, field)?.to_string();
        let s = s.trim();
        if s.is_empty() { None } else { Some(s.to_string()) }
    }

    /// Field as a number. Text values are parsed as a decimal or an `a/b` fraction.
    pub fn number(&self, namespace: Namespace, field: &str) -> Option<f64> {
        match self.get(namespace, field)? {
            MetadataValue::Number(n) => Some(*n),
            MetadataValue::Text(s) => parse_number(s),
            MetadataValue::List(_) => None,
        }
    }

    /// Field as a list of strings. A single text value becomes a one-item list.
    pub fn list(&self, namespace: Namespace, field: &str) -> Vec<String> {
        match self.get(namespace, field) {
            Some(MetadataValue::List(items)) => items.clone(),
            Some(MetadataValue::Text(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            Some(MetadataValue::Number(n)) => vec![n.to_string()],
            _ => Vec::new(),
        }
    }

    /// Like [`text`](Self::text), but a missing field is an error naming `block`.
    pub fn require_text(
        &self,
        namespace: Namespace,
        field: &'static str,
        block: &'static str,
    ) -> Result<String> {
        self.text(namespace, field)
            .ok_or(CaptionError::MissingField { namespace, field, block })
    }

    /// Like [`number`](Self::number), but a missing field is an error naming `block`.
    pub fn require_number(
        &self,
        namespace: Namespace,
        field: &'static str,
        block: &'static str,
    ) -> Result<f64> {
        self.number(namespace, field)
            .ok_or(CaptionError::MissingField { namespace, field, block })
    }

    /// All fields grouped by their `GROUP:` prefix, in key order.
    pub fn groups(&self) -> BTreeMap<&str, Vec<(&str, &MetadataValue)>> {
        let mut groups: BTreeMap<&str, Vec<(&str, &MetadataValue)>> = BTreeMap::new();
        for (key, value) in &self.fields {
            let (group, field) = key.split_once(':').unwrap_or(("Other", key.as_str()));
            groups.entry(group).or_default().push((field, value));
        }
        groups
    }
}

impl<K: Into<String>> FromIterator<(K, MetadataValue)> for MetadataSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, MetadataValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Parse `"0.008"` or `"1/125"` into a float.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    s.parse().ok()
}
