//! Caption derivation: metadata snapshot + lookup tables + options → posting text.
//!
//! [`compose_caption`] is a pure function of its inputs. "Today" is passed in
//! rather than read from the clock, so the same snapshot, options, and date
//! always give byte-identical output.
//!
//! ## Layout
//!
//! Long form, blocks separated by a blank line:
//!
//! ```text
//! Title - Caption
//! Sub-location, City, State, Country
//!
//! [accessibility description]
//!
//! [Photo location: https://www.openstreetmap.org/#map=17/lat/long]
//!
//! [Taken on … ISO]
//!
//! [Critiques welcome. …]
//!
//! [#hashtags]
//!
//! [alt text
//! copyright
//! no-AI-training notice]
//! ```
//!
//! Short form puts every block on its own line: header, alt text, hashtags,
//! copyright. Description, GPS, exposure, and the critique sentence are dropped.

mod exposure;
mod hashtags;
mod location;

pub use exposure::{Fraction, MAX_SHUTTER_DENOMINATOR, limit_denominator, parse_capture_time};
pub use hashtags::CRITIQUE_HASH_TAG;
pub use location::{coordinate_to_decimal, dms_to_decimal};

use chrono::{Datelike, NaiveDate};

use crate::error::{CaptionError, Result};
use crate::metadata::{MetadataSnapshot, Namespace};
use crate::tables::LookupTables;

/// Default OpenStreetMap zoom level for the GPS link.
pub const DEFAULT_MAP_ZOOM: u8 = 17;

pub const CRITIQUE_TEXT: &str = "Critiques welcome. Thanks for taking the time to look at my photo.";

pub const RIGHTS_RESERVED: &str = "All rights reserved.";

pub const NO_AI_TRAINING_TEXT: &str = "No AI training: use of this image to train artificial intelligence or machine learning models is prohibited.";

/// Which optional blocks to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionOptions {
    /// OpenStreetMap link to the GPS position.
    pub gps: bool,
    /// "Taken on … with … ISO" sentence.
    pub exposure: bool,
    pub hashtags: bool,
    /// Critique request sentence and `#photocritique`.
    pub critique: bool,
    pub alt_text: bool,
    pub copyright: bool,
    /// Append the AI-training prohibition, with or without a copyright notice.
    pub no_ai_training: bool,
    pub short_form: bool,
    pub map_zoom: u8,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            gps: false,
            exposure: false,
            hashtags: false,
            critique: false,
            alt_text: false,
            copyright: false,
            no_ai_training: false,
            short_form: false,
            map_zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

/// The kind of a caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Title and location lines.
    Header,
    Description,
    Gps,
    Exposure,
    Critique,
    Hashtags,
    AltText,
    Copyright,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// A composed caption: ordered blocks plus the layout used to join them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    blocks: Vec<CaptionBlock>,
    short_form: bool,
}

impl Caption {
    pub fn blocks(&self) -> &[CaptionBlock] {
        &self.blocks
    }

    pub fn block(&self, kind: BlockKind) -> Option<&str> {
        self.blocks
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| b.text.as_str())
    }

    /// Render the caption.
    ///
    /// Long form separates blocks with a blank line, except that alt text and
    /// copyright share one block. Short form uses a single newline throughout.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut previous: Option<BlockKind> = None;
        for block in &self.blocks {
            if let Some(prev) = previous {
                let tight = self.short_form
                    || (prev == BlockKind::AltText && block.kind == BlockKind::Copyright);
                out.push_str(if tight { "\n" } else { "\n\n" });
            }
            out.push_str(&block.text);
            previous = Some(block.kind);
        }
        out
    }
}

impl std::fmt::Display for Caption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

/// Compose the posting caption for one image.
///
/// Title and location are always required; exposure fields are required only
/// when the exposure block is requested. Missing GPS, alt text, copyright, or
/// description fields drop just their own block.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use photo_post_data::caption::{CaptionOptions, compose_caption};
/// use photo_post_data::metadata::{MetadataSnapshot, MetadataValue};
/// use photo_post_data::tables::LookupTables;
///
/// let snapshot: MetadataSnapshot = [
///     ("IPTC:ObjectName", MetadataValue::from("Sunset Beach")),
///     ("IPTC:City", MetadataValue::from("Westport")),
///     ("IPTC:Province-State", MetadataValue::from("MA")),
///     ("IPTC:Country-PrimaryLocationName", MetadataValue::from("United States")),
///     ("IPTC:Keywords", MetadataValue::from(vec!["sunset"])),
/// ]
/// .into_iter()
/// .collect();
///
/// let options = CaptionOptions { hashtags: true, ..Default::default() };
/// let today = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
/// let caption = compose_caption(&snapshot, &LookupTables::default(), &options, today).unwrap();
///
/// assert_eq!(
///     caption.text(),
///     "Sunset Beach\nWestport, MA, United States\n\n#photography #sunset #BuzzardsBay #Massachusetts"
/// );
/// ```
pub fn compose_caption(
    snapshot: &MetadataSnapshot,
    tables: &LookupTables,
    options: &CaptionOptions,
    today: NaiveDate,
) -> Result<Caption> {
    let title = compose_title(snapshot)?;
    let location = location::compose_location(snapshot, tables)?;

    let mut blocks = vec![CaptionBlock {
        kind: BlockKind::Header,
        text: format!("{title}\n{}", location.text),
    }];
    let mut push = |kind: BlockKind, text: String| blocks.push(CaptionBlock { kind, text });

    let alt_text = if options.alt_text {
        snapshot.text(Namespace::Xmp, "AltTextAccessibility")
    } else {
        None
    };
    let hash_tags = options.hashtags.then(|| {
        hashtags::accumulate(snapshot, tables, &location, today.weekday(), options.critique)
    });
    let copyright = copyright_block(snapshot, options);

    if options.short_form {
        if let Some(text) = alt_text {
            push(BlockKind::AltText, text);
        }
        if let Some(text) = hash_tags {
            push(BlockKind::Hashtags, text);
        }
        if let Some(text) = copyright {
            push(BlockKind::Copyright, text);
        }
    } else {
        if let Some(text) = snapshot.text(Namespace::Xmp, "ExtDescrAccessibility") {
            push(BlockKind::Description, text);
        }
        if options.gps {
            if location.private {
                log::debug!("GPS link suppressed for a private place");
            } else if let Some(link) = location::gps_link(snapshot, options.map_zoom) {
                push(BlockKind::Gps, link);
            } else {
                log::debug!("GPS link requested but the image has no GPS position");
            }
        }
        if options.exposure {
            push(BlockKind::Exposure, exposure::exposure_sentence(snapshot, tables)?);
        }
        if options.critique {
            push(BlockKind::Critique, CRITIQUE_TEXT.to_string());
        }
        if let Some(text) = hash_tags {
            push(BlockKind::Hashtags, text);
        }
        if let Some(text) = alt_text {
            push(BlockKind::AltText, text);
        }
        if let Some(text) = copyright {
            push(BlockKind::Copyright, text);
        }
    }

    Ok(Caption {
        blocks,
        short_form: options.short_form,
    })
}

/// `ObjectName`, followed by ` - Caption-Abstract` when there is one.
fn compose_title(snapshot: &MetadataSnapshot) -> Result<String> {
    let title = snapshot
        .text(Namespace::Iptc, "ObjectName")
        .or_else(|| snapshot.text(Namespace::Xmp, "Title"))
        .ok_or(CaptionError::MissingField {
            namespace: Namespace::Iptc,
            field: "ObjectName",
            block: "title",
        })?;

    Ok(match snapshot.text(Namespace::Iptc, "Caption-Abstract") {
        Some(caption) => format!("{title} - {caption}"),
        None => title,
    })
}

fn copyright_block(snapshot: &MetadataSnapshot, options: &CaptionOptions) -> Option<String> {
    let mut lines = Vec::new();

    if options.copyright {
        let notice = snapshot
            .text(Namespace::Iptc, "CopyrightNotice")
            .or_else(|| snapshot.text(Namespace::Exif, "Copyright"));
        if let Some(notice) = notice {
            if notice.to_lowercase().contains("all rights reserved") {
                lines.push(notice);
            } else {
                lines.push(format!("{}. {RIGHTS_RESERVED}", notice.trim_end_matches('.')));
            }
        }
    }

    if options.no_ai_training {
        lines.push(NO_AI_TRAINING_TEXT.to_string());
    }

    if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataValue;

    // 2024-07-03 is a Wednesday, 2024-07-05 a Friday.
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 3).unwrap()
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 5).unwrap()
    }

    fn full_snapshot() -> MetadataSnapshot {
        [
            ("IPTC:ObjectName", MetadataValue::from("Sunset Beach")),
            ("IPTC:Caption-Abstract", MetadataValue::from("Last light over the bay")),
            ("IPTC:Sub-location", MetadataValue::from("Horseneck Beach State Reservation")),
            ("IPTC:City", MetadataValue::from("Westport")),
            ("IPTC:Province-State", MetadataValue::from("MA")),
            ("IPTC:Country-PrimaryLocationName", MetadataValue::from("United States")),
            ("IPTC:Country-PrimaryLocationCode", MetadataValue::from("US")),
            ("IPTC:Keywords", MetadataValue::from(vec!["Sunset", "beach", "selfie"])),
            ("IPTC:CopyrightNotice", MetadataValue::from("© 2023 Tom Goetz")),
            ("EXIF:Make", MetadataValue::from("SONY")),
            ("EXIF:Model", MetadataValue::from("ILCE-6000")),
            ("EXIF:LensModel", MetadataValue::from("E 16-70mm F4 ZA OSS")),
            ("EXIF:DateTimeOriginal", MetadataValue::from("2023:07:04 19:30:00")),
            ("EXIF:ExposureTime", MetadataValue::from(0.008)),
            ("EXIF:FNumber", MetadataValue::from(8.0)),
            ("EXIF:FocalLength", MetadataValue::from(16.0)),
            ("EXIF:ISO", MetadataValue::from(100.0)),
            ("EXIF:GPSLatitude", MetadataValue::from(41.5)),
            ("EXIF:GPSLatitudeRef", MetadataValue::from("N")),
            ("EXIF:GPSLongitude", MetadataValue::from(71.05)),
            ("EXIF:GPSLongitudeRef", MetadataValue::from("W")),
            ("XMP:ExtDescrAccessibility", MetadataValue::from("Waves roll onto an empty beach as the sun sets.")),
            ("XMP:AltTextAccessibility", MetadataValue::from("Orange sunset over a sandy beach")),
        ]
        .into_iter()
        .collect()
    }

    fn everything() -> CaptionOptions {
        CaptionOptions {
            gps: true,
            exposure: true,
            hashtags: true,
            critique: true,
            alt_text: true,
            copyright: true,
            no_ai_training: true,
            short_form: false,
            map_zoom: DEFAULT_MAP_ZOOM,
        }
    }

    fn compose(snapshot: &MetadataSnapshot, options: &CaptionOptions) -> Caption {
        compose_caption(snapshot, &LookupTables::default(), options, wednesday()).unwrap()
    }

    // ── golden output ────────────────────────────────────────────────

    #[test]
    fn long_form_with_every_block() {
        let caption = compose(&full_snapshot(), &everything());
        let expected = "\
Sunset Beach - Last light over the bay
Horseneck Beach State Reservation, Westport, MA, United States

Waves roll onto an empty beach as the sun sets.

Photo location: https://www.openstreetmap.org/#map=17/41.5/-71.05

Taken on 2023-07-04 19:30:00 with Sony 16-70mm F4 on Sony a6000 with exposure 1/125s @ f/8 @ 16mm @ 100 ISO

Critiques welcome. Thanks for taking the time to look at my photo.

#photography #sunset #BeachPhotography #SonyAlpha #BuzzardsBay #Massachusetts #photocritique

Orange sunset over a sandy beach
© 2023 Tom Goetz. All rights reserved.
No AI training: use of this image to train artificial intelligence or machine learning models is prohibited.";
        assert_eq!(caption.text(), expected);
    }

    #[test]
    fn short_form_is_condensed() {
        let options = CaptionOptions {
            short_form: true,
            ..everything()
        };
        let caption = compose(&full_snapshot(), &options);
        let expected = "\
Sunset Beach - Last light over the bay
Horseneck Beach State Reservation, Westport, MA, United States
Orange sunset over a sandy beach
#photography #sunset #BeachPhotography #SonyAlpha #BuzzardsBay #Massachusetts #photocritique
© 2023 Tom Goetz. All rights reserved.
No AI training: use of this image to train artificial intelligence or machine learning models is prohibited.";
        assert_eq!(caption.text(), expected);
        let kinds: Vec<_> = caption.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Header, BlockKind::AltText, BlockKind::Hashtags, BlockKind::Copyright]
        );
        assert!(caption.block(BlockKind::Exposure).is_none());
        assert!(caption.block(BlockKind::Critique).is_none());
    }

    #[test]
    fn minimal_caption_is_header_and_description() {
        let caption = compose(&full_snapshot(), &CaptionOptions::default());
        assert_eq!(
            caption.text(),
            "Sunset Beach - Last light over the bay\n\
             Horseneck Beach State Reservation, Westport, MA, United States\n\n\
             Waves roll onto an empty beach as the sun sets."
        );
    }

    // ── end to end ───────────────────────────────────────────────────

    #[test]
    fn sunset_beach_end_to_end() {
        let snapshot: MetadataSnapshot = [
            ("IPTC:ObjectName", MetadataValue::from("Sunset Beach")),
            ("IPTC:City", MetadataValue::from("Westport")),
            ("IPTC:Province-State", MetadataValue::from("MA")),
            ("IPTC:Country-PrimaryLocationName", MetadataValue::from("United States")),
            ("IPTC:Keywords", MetadataValue::from(vec!["sunset", "beach"])),
            ("EXIF:Model", MetadataValue::from("ILCE-6000")),
            ("EXIF:DateTimeOriginal", MetadataValue::from("2023:07:04 19:30:00")),
            ("EXIF:ExposureTime", MetadataValue::from(0.008)),
            ("EXIF:FNumber", MetadataValue::from(5.6)),
            ("EXIF:FocalLength", MetadataValue::from(50.0)),
            ("EXIF:ISO", MetadataValue::from(100.0)),
            ("EXIF:GPSLatitude", MetadataValue::from(41.5)),
            ("EXIF:GPSLatitudeRef", MetadataValue::from("N")),
            ("EXIF:GPSLongitude", MetadataValue::from(71.05)),
            ("EXIF:GPSLongitudeRef", MetadataValue::from("W")),
        ]
        .into_iter()
        .collect();
        let options = CaptionOptions {
            exposure: true,
            hashtags: true,
            ..Default::default()
        };
        let text = compose(&snapshot, &options).text();
        assert!(text.contains("Sony a6000"));
        assert!(text.contains("#sunset"));
        assert!(text.contains("#BeachPhotography"));
        assert!(!text.contains("openstreetmap.org"));
    }

    #[test]
    fn same_inputs_same_bytes() {
        let a = compose(&full_snapshot(), &everything()).text();
        let b = compose(&full_snapshot(), &everything()).text();
        assert_eq!(a, b);
    }

    // ── privacy ──────────────────────────────────────────────────────

    #[test]
    fn private_place_redacts_location_and_gps() {
        let mut tables = LookupTables::default();
        tables.add_private_place("Horseneck Beach State Reservation");
        let caption =
            compose_caption(&full_snapshot(), &tables, &everything(), wednesday()).unwrap();
        let text = caption.text();
        assert!(!text.contains("Horseneck"));
        assert!(!text.contains("openstreetmap.org"));
        assert!(caption.block(BlockKind::Gps).is_none());
        assert!(text.starts_with("Sunset Beach - Last light over the bay\nWestport, MA, United States\n\n"));
    }

    // ── weekday gating ───────────────────────────────────────────────

    #[test]
    fn weekday_tag_depends_on_injected_date() {
        let options = CaptionOptions {
            hashtags: true,
            ..Default::default()
        };
        let tables = LookupTables::default();
        let wed = compose_caption(&full_snapshot(), &tables, &options, wednesday()).unwrap();
        let fri = compose_caption(&full_snapshot(), &tables, &options, friday()).unwrap();
        assert!(!wed.block(BlockKind::Hashtags).unwrap().contains("#FotoFriday"));
        assert!(fri.block(BlockKind::Hashtags).unwrap().ends_with("#FotoFriday"));
    }

    // ── optional and mandatory fields ────────────────────────────────

    fn header_only() -> MetadataSnapshot {
        [
            ("IPTC:ObjectName", MetadataValue::from("Fog")),
            ("IPTC:City", MetadataValue::from("Lincoln")),
            ("IPTC:Province-State", MetadataValue::from("NH")),
            ("IPTC:Country-PrimaryLocationName", MetadataValue::from("United States")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn missing_optional_fields_drop_their_blocks() {
        let options = CaptionOptions {
            gps: true,
            alt_text: true,
            copyright: true,
            ..Default::default()
        };
        let caption = compose(&header_only(), &options);
        assert_eq!(caption.text(), "Fog\nLincoln, NH, United States");
    }

    #[test]
    fn no_ai_sentence_without_copyright_notice() {
        let options = CaptionOptions {
            copyright: true,
            no_ai_training: true,
            ..Default::default()
        };
        let caption = compose(&header_only(), &options);
        assert_eq!(caption.block(BlockKind::Copyright), Some(NO_AI_TRAINING_TEXT));
    }

    #[test]
    fn copyright_notice_not_doubled() {
        let mut fields: Vec<(&str, MetadataValue)> = vec![
            ("IPTC:ObjectName", MetadataValue::from("Fog")),
            ("IPTC:City", MetadataValue::from("Lincoln")),
            ("IPTC:Province-State", MetadataValue::from("NH")),
            ("IPTC:Country-PrimaryLocationName", MetadataValue::from("United States")),
        ];
        fields.push(("EXIF:Copyright", MetadataValue::from("Tom Goetz. All rights reserved.")));
        let snapshot: MetadataSnapshot = fields.into_iter().collect();
        let options = CaptionOptions {
            copyright: true,
            ..Default::default()
        };
        let caption = compose(&snapshot, &options);
        assert_eq!(
            caption.block(BlockKind::Copyright),
            Some("Tom Goetz. All rights reserved.")
        );
    }

    #[test]
    fn missing_title_is_error() {
        let snapshot: MetadataSnapshot = [("IPTC:City", MetadataValue::from("Lincoln"))]
            .into_iter()
            .collect();
        let err = compose_caption(&snapshot, &LookupTables::default(), &CaptionOptions::default(), wednesday())
            .unwrap_err();
        assert!(matches!(
            err,
            CaptionError::MissingField { field: "ObjectName", block: "title", .. }
        ));
    }

    #[test]
    fn exposure_requested_without_fields_is_error() {
        let options = CaptionOptions {
            exposure: true,
            ..Default::default()
        };
        let err = compose_caption(&header_only(), &LookupTables::default(), &options, wednesday())
            .unwrap_err();
        assert!(matches!(err, CaptionError::MissingField { block: "exposure", .. }));
    }

    #[test]
    fn xmp_title_fallback() {
        let snapshot: MetadataSnapshot = [
            ("XMP:Title", MetadataValue::from("Fog")),
            ("IPTC:City", MetadataValue::from("Lincoln")),
            ("IPTC:Province-State", MetadataValue::from("NH")),
            ("IPTC:Country-PrimaryLocationName", MetadataValue::from("United States")),
        ]
        .into_iter()
        .collect();
        let caption = compose(&snapshot, &CaptionOptions::default());
        assert_eq!(caption.block(BlockKind::Header), Some("Fog\nLincoln, NH, United States"));
    }
}
