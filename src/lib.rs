//! # photo-post-data
//!
//! Build a photo-posting caption from an image's embedded metadata: title,
//! location, exposure data, hashtags, alt text, and copyright.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_post_data::caption::CaptionOptions;
//! use photo_post_data::clock::SystemClock;
//! use photo_post_data::config::Config;
//! use photo_post_data::metadata::ExifTool;
//! use photo_post_data::pipeline::process_image;
//! use photo_post_data::tables::LookupTables;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Built-in tables, extended by the user's config file
//!     let tables = Config::load(Some("photo_post_data.json".as_ref()))?
//!         .apply(LookupTables::default())?;
//!
//!     let options = CaptionOptions {
//!         exposure: true,
//!         hashtags: true,
//!         ..Default::default()
//!     };
//!
//!     let result = process_image(
//!         Path::new("photo.jpg"),
//!         &ExifTool::default(),
//!         &tables,
//!         &options,
//!         &SystemClock,
//!     )?;
//!     println!("{}", result.caption);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`caption`] — caption derivation engine (title, location, exposure, hashtags, assembly)
//! - [`clock`] — injectable source of today's date
//! - [`config`] — JSON config that extends the lookup tables
//! - [`error`] — error taxonomy
//! - [`metadata`] — metadata snapshot and the `exiftool` extractor
//! - [`pipeline`] — read → compose → write for one image
//! - [`tables`] — camera, lens, keyword, location, state, and country lookup tables

pub mod caption;
pub mod clock;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod tables;
