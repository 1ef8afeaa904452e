use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use photo_post_data::caption::{CaptionOptions, DEFAULT_MAP_ZOOM};
use photo_post_data::clock::SystemClock;
use photo_post_data::config::Config;
use photo_post_data::error::CaptionError;
use photo_post_data::metadata::{ExifTool, MetadataSnapshot};
use photo_post_data::pipeline;
use photo_post_data::tables::LookupTables;

#[derive(Parser, Debug)]
#[command(
    name = "photo-post-data",
    version,
    about = "Format an image's EXIF/IPTC/XMP metadata into text for a photo posting"
)]
struct Cli {
    /// Path and name of the image file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path and name of the output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to the exiftool binary (default: exiftool on PATH)
    #[arg(short, long, value_name = "PATH")]
    exiftool: Option<PathBuf>,

    /// Zoom level for the OpenStreetMap link
    #[arg(short = 'z', long, default_value_t = DEFAULT_MAP_ZOOM)]
    mapzoom: u8,

    /// Dump the image's metadata groups
    #[arg(short, long)]
    dump: bool,

    /// Add an OpenStreetMap link with the GPS position
    #[arg(short, long)]
    gps: bool,

    /// Add the exposure data sentence
    #[arg(short = 'x', long)]
    exposure: bool,

    /// Add hashtags
    #[arg(short = 't', long)]
    hashtags: bool,

    /// Request critiques
    #[arg(short, long)]
    critique: bool,

    /// Add the image's alt text
    #[arg(short, long)]
    alt_text: bool,

    /// Add the copyright notice
    #[arg(short = 'r', long)]
    copyright: bool,

    /// Add a notice prohibiting AI training on the image
    #[arg(short, long = "no-ai")]
    no_ai: bool,

    /// Short form: header, alt text, hashtags, and copyright only
    #[arg(short, long)]
    short: bool,

    /// Echo output to the screen
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: photo_post_data.json next to binary)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the built-in tables to a config file and exit
    #[arg(long)]
    init: bool,
}

impl Cli {
    fn caption_options(&self) -> CaptionOptions {
        CaptionOptions {
            gps: self.gps,
            exposure: self.exposure,
            hashtags: self.hashtags,
            critique: self.critique,
            alt_text: self.alt_text,
            copyright: self.copyright,
            no_ai_training: self.no_ai,
            short_form: self.short,
            map_zoom: self.mapzoom,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = Config::from(&LookupTables::default());
        let path = config.save(cli.config.as_deref())?;
        println!("Default config written to {}", path.display());
        return Ok(());
    }

    let Some(ref file) = cli.file else {
        return Err(CaptionError::UserInput("--file required. Use --help for usage.".to_string()).into());
    };

    // Load config over the built-in tables
    let tables = Config::load(cli.config.as_deref())?.apply(LookupTables::default())?;

    let extractor = match cli.exiftool {
        Some(ref program) => ExifTool::new(program),
        None => ExifTool::default(),
    };

    let metadata = pipeline::read_metadata(file, &extractor)?;
    if cli.dump {
        print_metadata(file, &metadata);
    }

    let caption = pipeline::caption_for(
        file,
        &metadata,
        &tables,
        &cli.caption_options(),
        &SystemClock,
    )?;

    let text = caption.text();

    if let Some(ref output) = cli.output {
        pipeline::write_caption(output, &text)?;
    }
    if cli.verbose {
        println!("{text}");
    }
    if cli.output.is_none() && !cli.verbose {
        log::warn!("No --output file or --verbose given; the caption was not written anywhere");
    }

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Total width of the `--dump` table, rules included.
const TABLE_WIDTH: usize = 72;
/// Field names longer than this push their value onto the next line.
const MAX_FIELD_WIDTH: usize = 28;
/// Narrowest value column before wrapping stops being useful.
const MIN_VALUE_WIDTH: usize = 20;

/// Print every metadata field, organized by group.
fn print_metadata(path: &std::path::Path, metadata: &MetadataSnapshot) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(TABLE_WIDTH));

    if metadata.is_empty() {
        println!("  {DIM}(no metadata found){RESET}");
        println!();
        return;
    }

    for (group, fields) in metadata.groups() {
        // Size the name column to this group's longest field name
        let field_width = fields
            .iter()
            .map(|(field, _)| field.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_FIELD_WIDTH);

        println!("  {BOLD}{group}{RESET} {DIM}({} fields){RESET}", fields.len());
        println!("  {DIM}{}{RESET}", "─".repeat(TABLE_WIDTH - 2));
        for (field, value) in fields {
            print_field(field, &value.to_string(), field_width);
        }
        println!();
    }
}

/// Print one `field : value` row, wrapping the value under its own column.
fn print_field(field: &str, value: &str, field_width: usize) {
    // "  " + name + " : "
    let value_col = 2 + field_width + 3;
    let value_width = TABLE_WIDTH.saturating_sub(value_col).max(MIN_VALUE_WIDTH);

    let mut lines = wrap_text(value, value_width).into_iter();
    let first = lines.next().unwrap_or_default();
    if field.chars().count() > field_width {
        println!("  {field}");
        println!("  {:field_width$} : {first}", "");
    } else {
        println!("  {field:<field_width$} : {first}");
    }
    for line in lines {
        println!("{:value_col$}{line}", "");
    }
}

/// Split `s` into lines of at most `width` characters at word boundaries.
///
/// A single word longer than `width` gets a line of its own.
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in s.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }
    if lines.is_empty() {
        lines.push(s.trim().to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_words_whole() {
        assert_eq!(
            wrap_text("Orange sunset over a sandy beach", 14),
            vec!["Orange sunset", "over a sandy", "beach"]
        );
    }

    #[test]
    fn wrap_long_word_gets_own_line() {
        assert_eq!(
            wrap_text("see https://www.openstreetmap.org/#map=17/41.5/-71.05 now", 20),
            vec!["see", "https://www.openstreetmap.org/#map=17/41.5/-71.05", "now"]
        );
    }

    #[test]
    fn wrap_blank_value() {
        assert_eq!(wrap_text("   ", 10), vec![""]);
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::try_parse_from(["photo-post-data", "-f", "a.jpg", "-gxtcarns", "-z", "12"]).unwrap();
        let options = cli.caption_options();
        assert!(options.gps && options.exposure && options.hashtags && options.critique);
        assert!(options.alt_text && options.copyright && options.no_ai_training && options.short_form);
        assert_eq!(options.map_zoom, 12);
    }

    #[test]
    fn map_zoom_defaults() {
        let cli = Cli::try_parse_from(["photo-post-data", "--file", "a.jpg"]).unwrap();
        assert_eq!(cli.caption_options(), CaptionOptions::default());
    }
}
