use crate::error::Result;
use crate::metadata::{MetadataSnapshot, MetadataValue, Namespace};
use crate::tables::LookupTables;

const BLOCK: &str = "location";

/// The location line plus the raw parts the hashtag block needs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Location {
    /// `Sub-location, City, State, Country` with private places removed.
    pub text: String,
    /// Sub-location as published; `None` if absent or private.
    pub sub_location: Option<String>,
    pub city: String,
    pub state: String,
    pub country_code: Option<String>,
    /// The sub-location is a private place: no GPS link may be emitted.
    pub private: bool,
}

pub(crate) fn compose_location(
    snapshot: &MetadataSnapshot,
    tables: &LookupTables,
) -> Result<Location> {
    let sub_location = snapshot.text(Namespace::Iptc, "Sub-location");
    let city = snapshot.require_text(Namespace::Iptc, "City", BLOCK)?;
    let state = snapshot.require_text(Namespace::Iptc, "Province-State", BLOCK)?;
    let country = snapshot.require_text(Namespace::Iptc, "Country-PrimaryLocationName", BLOCK)?;
    let country_code = snapshot.text(Namespace::Iptc, "Country-PrimaryLocationCode");

    let private = sub_location
        .as_deref()
        .is_some_and(|place| tables.is_private(place));
    let sub_location = if private {
        log::debug!("Sub-location is a private place; redacting it and any GPS link");
        None
    } else {
        sub_location
    };

    let text = sub_location
        .iter()
        .chain([&city, &state, &country])
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Ok(Location {
        text,
        sub_location,
        city,
        state,
        country_code,
        private,
    })
}

/// Convert degrees/minutes/seconds to signed decimal degrees.
///
/// `S` and `W` references give negative values.
///
/// ```rust
/// use photo_post_data::caption::dms_to_decimal;
///
/// assert_eq!(dms_to_decimal(40.0, 30.0, 0.0, 'N'), 40.5);
/// assert_eq!(dms_to_decimal(40.0, 30.0, 0.0, 'S'), -40.5);
/// ```
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: char) -> f64 {
    apply_reference(degrees + minutes / 60.0 + seconds / 3600.0, Some(reference))
}

fn apply_reference(decimal: f64, reference: Option<char>) -> f64 {
    match reference.map(|c| c.to_ascii_uppercase()) {
        Some('S') | Some('W') => -decimal.abs(),
        Some(_) => decimal.abs(),
        None => decimal,
    }
}

/// Signed decimal coordinate from an extractor value.
///
/// Accepts a decimal number, a `[d, m, s]` list, or text holding one or three
/// numbers (`"40 deg 30' 0.00\" N"`). The reference is taken from `reference`,
/// or from a trailing `N`/`S`/`E`/`W` in the text.
pub fn coordinate_to_decimal(value: &MetadataValue, reference: Option<&str>) -> Option<f64> {
    let mut reference = reference.and_then(|r| r.trim().chars().next());

    let parts: Vec<f64> = match value {
        MetadataValue::Number(n) => vec![*n],
        MetadataValue::List(items) => items
            .iter()
            .map(|s| s.trim().parse().ok())
            .collect::<Option<Vec<_>>>()?,
        MetadataValue::Text(s) => {
            if reference.is_none() {
                reference = s
                    .trim()
                    .chars()
                    .last()
                    .filter(|c| matches!(c.to_ascii_uppercase(), 'N' | 'S' | 'E' | 'W'));
            }
            s.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
                .filter(|t| !t.is_empty())
                .map(|t| t.parse().ok())
                .collect::<Option<Vec<_>>>()?
        }
    };

    match parts.as_slice() {
        [decimal] => Some(apply_reference(*decimal, reference)),
        [d, m, s] => Some(apply_reference(d + m / 60.0 + s / 3600.0, reference)),
        _ => None,
    }
}

/// OpenStreetMap link for the image's GPS position, if it has one.
pub(crate) fn gps_link(snapshot: &MetadataSnapshot, zoom: u8) -> Option<String> {
    let lat = coordinate_to_decimal(
        snapshot.get(Namespace::Exif, "GPSLatitude")?,
        snapshot.text(Namespace::Exif, "GPSLatitudeRef").as_deref(),
    )?;
    let long = coordinate_to_decimal(
        snapshot.get(Namespace::Exif, "GPSLongitude")?,
        snapshot.text(Namespace::Exif, "GPSLongitudeRef").as_deref(),
    )?;
    Some(format!(
        "Photo location: https://www.openstreetmap.org/#map={zoom}/{lat}/{long}"
    ))
}
