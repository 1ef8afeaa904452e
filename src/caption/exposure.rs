use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{CaptionError, Result};
use crate::metadata::{MetadataSnapshot, Namespace};
use crate::tables::LookupTables;

/// Upper bound on the shutter-speed denominator.
pub const MAX_SHUTTER_DENOMINATOR: u64 = 1_000_000;

/// Format of EXIF `DateTimeOriginal`.
const CAPTURE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

// Remainders below this are float noise from an exact fraction.
const EXACT_EPSILON: f64 = 1e-9;

const BLOCK: &str = "exposure";

/// A non-negative fraction in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Closest fraction to `value` whose denominator does not exceed `max_denominator`.
///
/// Walks the continued-fraction expansion of `value` until the next convergent's
/// denominator would pass the bound, then picks whichever of the last convergent
/// and the best semiconvergent is nearer.
///
/// ```rust
/// use photo_post_data::caption::limit_denominator;
///
/// assert_eq!(limit_denominator(0.008, 1_000_000).to_string(), "1/125");
/// assert_eq!(limit_denominator(2.5, 1_000_000).to_string(), "5/2");
/// ```
pub fn limit_denominator(value: f64, max_denominator: u64) -> Fraction {
    let max_denominator = max_denominator.max(1);
    if !value.is_finite() || value <= 0.0 {
        return Fraction { numerator: 0, denominator: 1 };
    }
    if value >= u64::MAX as f64 {
        return Fraction { numerator: u64::MAX, denominator: 1 };
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
    let mut x = value;
    loop {
        let a = x.floor() as u64;
        let Some(q2) = a.checked_mul(q1).and_then(|v| v.checked_add(q0)) else {
            break;
        };
        if q2 > max_denominator {
            break;
        }
        let Some(p2) = a.checked_mul(p1).and_then(|v| v.checked_add(p0)) else {
            break;
        };
        (p0, q0, p1, q1) = (p1, q1, p2, q2);

        let rem = x - a as f64;
        if rem < EXACT_EPSILON {
            return Fraction { numerator: p1, denominator: q1 };
        }
        x = 1.0 / rem;
    }

    // The first term always has denominator 1, so q1 >= 1 here.
    let k = (max_denominator - q0) / q1;
    let semi = Fraction {
        numerator: p0.saturating_add(k.saturating_mul(p1)),
        denominator: q0 + k * q1,
    };
    let last = Fraction { numerator: p1, denominator: q1 };

    let error = |f: &Fraction| (f.numerator as f64 / f.denominator as f64 - value).abs();
    if error(&last) <= error(&semi) { last } else { semi }
}

/// Parse an EXIF capture timestamp (`YYYY:MM:DD HH:MM:SS`).
pub fn parse_capture_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), CAPTURE_TIME_FORMAT).map_err(|source| {
        CaptionError::MalformedTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// The "Taken on … ISO" sentence.
pub(crate) fn exposure_sentence(
    snapshot: &MetadataSnapshot,
    tables: &LookupTables,
) -> Result<String> {
    let raw_time = snapshot.require_text(Namespace::Exif, "DateTimeOriginal", BLOCK)?;
    let when_taken = parse_capture_time(&raw_time)?;

    let model = snapshot.require_text(Namespace::Exif, "Model", BLOCK)?;
    let camera = tables.camera_name(&model);
    let exposure_time = snapshot.require_number(Namespace::Exif, "ExposureTime", BLOCK)?;
    let f_number = snapshot.require_number(Namespace::Exif, "FNumber", BLOCK)?;
    let focal_length = snapshot.require_number(Namespace::Exif, "FocalLength", BLOCK)?;
    let iso = snapshot.require_text(Namespace::Exif, "ISO", BLOCK)?;

    let shutter_speed = limit_denominator(exposure_time, MAX_SHUTTER_DENOMINATOR);
    let when = when_taken.format("%Y-%m-%d %H:%M:%S");

    // Fixed-lens cameras often leave LensModel empty.
    let gear = match snapshot.text(Namespace::Exif, "LensModel") {
        Some(lens) => format!("{} on {camera}", tables.lens_name(&lens)),
        None => camera.to_string(),
    };

    Ok(format!(
        "Taken on {when} with {gear} with exposure {shutter_speed}s @ f/{f_number} @ {focal_length}mm @ {iso} ISO"
    ))
}
