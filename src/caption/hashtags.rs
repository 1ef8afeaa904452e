use chrono::Weekday;

use super::location::Location;
use crate::metadata::{MetadataSnapshot, Namespace};
use crate::tables::LookupTables;

/// Hashtag added when critiques are requested.
pub const CRITIQUE_HASH_TAG: &str = "#photocritique";

/// Build the hashtag line.
///
/// Order: base tags, per-keyword tags (mapped, then weekday-gated), camera make,
/// location (sub-location before city, at most one), state, country, weekday,
/// critique. Duplicates are kept.
pub(crate) fn accumulate(
    snapshot: &MetadataSnapshot,
    tables: &LookupTables,
    location: &Location,
    today: Weekday,
    critique: bool,
) -> String {
    let mut tags: Vec<&str> = Vec::new();

    if !tables.base_hash_tags().is_empty() {
        tags.push(tables.base_hash_tags());
    }

    let mut keywords = snapshot.list(Namespace::Iptc, "Keywords");
    if keywords.is_empty() {
        keywords = snapshot.list(Namespace::Xmp, "Subject");
    }
    for keyword in &keywords {
        match tables.keyword_tag(keyword) {
            Some(tag) => tags.push(tag),
            None => log::debug!("No hashtag for keyword '{keyword}'"),
        }
        tags.extend(tables.conditional_tags(keyword, today));
    }

    let make = snapshot.text(Namespace::Exif, "Make");
    if let Some(tag) = make.as_deref().and_then(|m| tables.camera_make_tag(m)) {
        tags.push(tag);
    }

    let location_tag = location
        .sub_location
        .as_deref()
        .and_then(|place| tables.location_tag(place))
        .or_else(|| tables.location_tag(&location.city));
    if let Some(tag) = location_tag {
        tags.push(tag);
    }

    if let Some(tag) = tables.state_tag(&location.state) {
        tags.push(tag);
    }

    if let Some(tag) = location
        .country_code
        .as_deref()
        .and_then(|code| tables.country_tag(code))
    {
        tags.push(tag);
    }

    if let Some(tag) = tables.weekday_tag(today) {
        tags.push(tag);
    }

    if critique {
        tags.push(CRITIQUE_HASH_TAG);
    }

    tags.join(" ")
}
