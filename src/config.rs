use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{CaptionError, Result};
use crate::tables::LookupTables;

const CONFIG_FILE_NAME: &str = "photo_post_data.json";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// User configuration that extends the built-in lookup tables.
///
/// Every key is optional. Maps add entries or replace the built-in value for the
/// same key; `private_places` and `conditional_keywords` add to the built-ins;
/// `base_hash_tags` replaces the default.
///
/// # Example
///
/// ```rust
/// use photo_post_data::config::Config;
/// use photo_post_data::tables::LookupTables;
///
/// let config: Config = serde_json::from_str(r##"{
///     "base_hash_tags": "#photography #NewEngland",
///     "camera_map": { "ILCE-7M4": "Sony a7 IV" },
///     "private_places": ["Our Backyard"]
/// }"##).unwrap();
///
/// let tables = config.apply(LookupTables::default()).unwrap();
/// assert_eq!(tables.camera_name("ILCE-7M4"), "Sony a7 IV");
/// assert!(tables.is_private("Our Backyard"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_hash_tags: Option<String>,
    pub camera_map: BTreeMap<String, String>,
    pub lens_map: BTreeMap<String, String>,
    pub keyword_map: BTreeMap<String, String>,
    pub conditional_keywords: Vec<ConditionalKeyword>,
    pub location_map: BTreeMap<String, String>,
    pub state_map: BTreeMap<String, String>,
    pub country_code_map: BTreeMap<String, String>,
    pub camera_make_map: BTreeMap<String, String>,
    /// Day name (`"Friday"`, `"fri"`) → hashtag.
    pub weekday_hash_tags: BTreeMap<String, String>,
    pub private_places: Vec<String>,
}

/// A keyword hashtag that is only emitted on one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalKeyword {
    pub keyword: String,
    /// Day name as accepted by chrono (`"Wednesday"`, `"wed"`).
    pub day: String,
    pub hash_tag: String,
}

impl Config {
    /// Resolve the config file path: same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().map_err(|e| CaptionError::ConfigLoad {
            path: PathBuf::from(CONFIG_FILE_NAME),
            reason: format!("failed to get executable path: {e}"),
        })?;
        let exe_dir = exe_path.parent().unwrap_or_else(|| Path::new("."));
        Ok(exe_dir.join(CONFIG_FILE_NAME))
    }

    /// Load config from the given path, or from the default location.
    ///
    /// A missing file is not an error: the built-in tables are used unchanged.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using built-in tables.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| CaptionError::ConfigLoad {
                path: config_path.clone(),
                reason: e.to_string(),
            })?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|e| CaptionError::ConfigLoad {
                path: config_path.clone(),
                reason: e.to_string(),
            })?;
        log::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).map_err(|e| CaptionError::ConfigLoad {
            path: config_path.clone(),
            reason: format!("failed to serialize config: {e}"),
        })?;
        std::fs::write(&config_path, contents).map_err(|source| CaptionError::Output {
            path: config_path.clone(),
            source,
        })?;
        log::info!("Config saved to {}", config_path.display());
        Ok(config_path)
    }

    /// Merge this config over `tables`.
    ///
    /// Fails with [`CaptionError::ConfigLoad`] if a day name cannot be parsed.
    pub fn apply(&self, mut tables: LookupTables) -> Result<LookupTables> {
        if let Some(ref tags) = self.base_hash_tags {
            tables.set_base_hash_tags(tags);
        }
        for (raw, name) in &self.camera_map {
            tables.insert_camera(raw, name);
        }
        for (raw, name) in &self.lens_map {
            tables.insert_lens(raw, name);
        }
        for (keyword, tag) in &self.keyword_map {
            tables.insert_keyword(keyword, tag);
        }
        for rule in &self.conditional_keywords {
            tables.add_conditional(&rule.keyword, parse_day(&rule.day)?, &rule.hash_tag);
        }
        for (place, tag) in &self.location_map {
            tables.insert_location(place, tag);
        }
        for (state, tag) in &self.state_map {
            tables.insert_state(state, tag);
        }
        for (code, tag) in &self.country_code_map {
            tables.insert_country_code(code, tag);
        }
        for (make, tag) in &self.camera_make_map {
            tables.insert_camera_make(make, tag);
        }
        for (day, tag) in &self.weekday_hash_tags {
            tables.set_weekday_tag(parse_day(day)?, tag);
        }
        for place in &self.private_places {
            tables.add_private_place(place);
        }

        log::debug!(
            "Config merged: {} cameras, {} lenses, {} keywords, {} locations, {} private places",
            self.camera_map.len(),
            self.lens_map.len(),
            self.keyword_map.len(),
            self.location_map.len(),
            self.private_places.len()
        );
        Ok(tables)
    }
}

impl From<&LookupTables> for Config {
    /// A config holding every entry of `tables`, used to seed a new config file.
    fn from(tables: &LookupTables) -> Self {
        Self {
            base_hash_tags: Some(tables.base_hash_tags.clone()),
            camera_map: tables.camera_map.clone(),
            lens_map: tables.lens_map.clone(),
            keyword_map: tables.keyword_map.clone(),
            conditional_keywords: tables
                .conditional_keywords
                .iter()
                .map(|rule| ConditionalKeyword {
                    keyword: rule.keyword.clone(),
                    day: day_name(rule.weekday).to_string(),
                    hash_tag: rule.hash_tag.clone(),
                })
                .collect(),
            location_map: tables.location_map.clone(),
            state_map: tables.state_map.clone(),
            country_code_map: tables.country_code_map.clone(),
            camera_make_map: tables.camera_make_map.clone(),
            weekday_hash_tags: WEEK
                .iter()
                .filter_map(|day| {
                    tables
                        .weekday_tag(*day)
                        .map(|tag| (day_name(*day).to_string(), tag.to_string()))
                })
                .collect(),
            private_places: tables.private_places.iter().cloned().collect(),
        }
    }
}

fn parse_day(name: &str) -> Result<Weekday> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| CaptionError::ConfigLoad {
            path: PathBuf::from(CONFIG_FILE_NAME),
            reason: format!("'{name}' is not a day of the week"),
        })
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
