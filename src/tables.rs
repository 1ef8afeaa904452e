//! Lookup tables that turn raw metadata strings into display names and hashtags.
//!
//! Each table has its own fallback rule:
//!
//! | Table | Key match | On miss |
//! |-------|-----------|---------|
//! | camera, lens | exact | raw value is used |
//! | keyword, conditional keyword, camera make | case-insensitive | nothing emitted |
//! | state | case-insensitive, code or full name | nothing emitted |
//! | country code | case-insensitive | nothing emitted |
//! | location | exact | nothing emitted |
//!
//! [`LookupTables::default`] carries the built-in tables; a config file can extend
//! them (see [`Config::apply`](crate::config::Config::apply)).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Weekday;

const BASE_HASH_TAGS: &str = "#photography";

const CAMERAS: &[(&str, &str)] = &[
    ("Canon EOS 5D", "Canon 5D"),
    ("Canon EOS 5D Mark II", "Canon 5Dm2"),
    ("Canon EOS 7D", "Canon 7D"),
    ("Canon EOS 10D", "Canon 10D"),
    ("Canon EOS 30D", "Canon 30D"),
    ("Canon PowerShot G7 X", "Canon G7X"),
    ("Canon PowerShot G9", "Canon G9"),
    ("Canon PowerShot G12", "Canon G12"),
    ("Canon PowerShot G15", "Canon G15"),
    ("DC-LX100M2", "Panasonic LX100M2"),
    ("ILCE-6000", "Sony a6000"),
    ("ILCE-6500", "Sony a6500"),
    ("X-E3", "Fuji X-E3"),
    ("X-T3", "Fuji X-T3"),
    ("X-T4", "Fuji X-T4"),
    ("X-T30", "Fuji X-T30"),
    ("X-H2", "Fuji X-H2"),
];

const LENSES: &[(&str, &str)] = &[
    // Canon 50 1.4
    ("50.0mm", "Canon 50mm F1.4"),
    ("EF50mm/1.4 USM", "Canon 50mm F1.4"),
    ("EF50mm f/1.4 USM", "Canon 50mm F1.4"),
    ("Canon EF 50mm f/1.4 USM", "Canon 50mm F1.4"),
    // Canon 85 1.8
    ("85.0mm", "Canon 85mm F1.8"),
    ("EF85/1.8 USM", "Canon 85mm F1.8"),
    ("EF85 f/1.8 USM", "Canon 85mm F1.8"),
    ("Canon EF 85mm f/1.8 USM", "Canon 85mm F1.8"),
    ("Canon EF 100mm f/2.8 L Macro IS USM", "Canon 100mm F2.8 Macro"),
    // Canon 180 macro
    ("180.0mm", "Canon 180mm F3.5 Macro"),
    ("EF180mm f/3.5 L Macro USM", "Canon 180mm F3.5 Macro"),
    ("Canon EF 180mm f/3.5 L USM", "Canon 180mm F3.5 Macro"),
    ("EF180mm f/3.5 L Macro USM +1.4x", "Canon 180mm F3.5 Macro with 1.4x TC"),
    ("EF180mm f/3.5 L Macro USM +2.0x", "Canon 180mm F3.5 Macro with 2.0x TC"),
    // Canon 300 2.8
    ("300.0mm", "Canon 300mm F2.8"),
    ("EF300mm f/2.8L IS USM", "Canon 300mm F2.8"),
    ("EF300mm f/2.8L IS USM +1.4x", "Canon 300mm F2.8 with 1.4x TC"),
    ("EF300mm f/2.8L IS USM +2.0x", "Canon 300mm F2.8 with 2.0x TC"),
    // Canon 300 f4
    ("EF300mm f/4L USM", "Canon 300mm F4"),
    ("EF300mm f/4L USM +1.4x", "Canon 300mm F4 with 1.4x TC"),
    ("17.0-40.0mm", "Canon 17-40mm F4"),
    ("EF17-40mm F/4L USM", "Canon 17-40mm F4"),
    ("EF24-105mm f/4L IS USM", "Canon 24-105mm F4"),
    ("20.0-35.0mm", "Canon 20-35mm F3.5-4.5"),
    ("70.0-200.0mm", "Canon 70-200mm F4"),
    ("EF70.0-200.0mm f/4L USM", "Canon 70-200mm F4"),
    // Sony
    ("EF 50mm F1.8", "Sony 50mm F1.8"),
    ("EF 70-200mm F4 G OSS", "Sony 70-200mm F4"),
    ("EF 90mm F2.8 Macro G OSS", "Sony 90mm F2.8 Macro"),
    ("E PZ 16-50mm F3.5-5.6 OSS", "Sony 16-50mm F3.5-5.6"),
    ("E 10-18mm F4 OSS", "Sony 10-18mm F4"),
    ("E 16-70mm F4 ZA OSS", "Sony 16-70mm F4"),
    ("16mm F1.4 DC DN | Contemporary 016", "Sigma 16mm F1.4"),
    ("16mm F1.4 DC DN | Contemporary 017", "Sigma 16mm F1.4"),
    // Fuji
    ("XF16mmF1.4 R WR", "Fuji 16mm F1.4"),
    ("XF35mmF1.4 R", "Fuji 35mm F1.4"),
    ("XF10-24mmF4 R OIS", "Fuji 10-24mm F4"),
    ("XF16-55mmF2.8 R LM WR", "Fuji 16-55mm F2.8"),
    ("XF18-55mmF2.8-4 R LM OIS", "Fuji 18-55mm F2.8-4"),
    ("XF55-200mmF3.5-4.8 R LM OIS", "Fuji 55-200mm F3.5-4.8"),
];

// Keywords not listed here are never published.
const KEYWORDS: &[(&str, &str)] = &[
    ("adapted lens", "#AdaptedLens"),
    ("beach", "#BeachPhotography"),
    ("bird", "#bird"),
    ("blackandwhite", "#BlackAndWhitePhotography"),
    ("canoe", "#paddling"),
    ("capecod", "#CapeCod"),
    ("cat", "#cat #CatsOfPixelfed"),
    ("closeup", "#CloseupPhotography"),
    ("clouds", "#clouds"),
    ("fall", "#fall"),
    ("fog", "#fog"),
    ("foliage", "#foliage"),
    ("flower", "#flower"),
    ("garden", "#garden"),
    ("golden hour", "#GoldenHour"),
    ("hdr", "#hdr"),
    ("hiking", "#hiking"),
    ("kayak", "#paddling"),
    ("lake", "#lake"),
    ("landscape", "#LandscapePhotography"),
    ("macro", "#MacroPhotography"),
    ("mountain", "#mountains"),
    ("mountains", "#mountains"),
    ("nationalforest", "#NationalForest"),
    ("nationalpark", "#NationalPark"),
    ("ocean", "#ocean"),
    ("panoramic", "#panoramic"),
    ("reflection", "#reflection"),
    ("saltmarsh", "#saltmarsh"),
    ("seascape", "#SeascapePhotography"),
    ("shorebird", "#ShoreBird"),
    ("sky", "#sky"),
    ("statepark", "#StatePark"),
    ("summer", "#summer"),
    ("sunrise", "#sunrise"),
    ("sunset", "#sunset"),
    ("tree", "#trees"),
    ("waterfall", "#waterfall"),
    ("weather", "#weather"),
    ("wildlife", "#wildlife"),
    ("winter", "#winter"),
    ("wmnf", "#wmnf"),
];

const CONDITIONAL_KEYWORDS: &[(&str, Weekday, &str)] = &[
    ("blackandwhite", Weekday::Mon, "#MonochromeMonday"),
    ("tree", Weekday::Tue, "#TreeTuesday"),
    ("waterfall", Weekday::Wed, "#WaterfallWednesday"),
    ("wildlife", Weekday::Wed, "#WildlifeWednesday"),
    ("flower", Weekday::Fri, "#FlowerFriday"),
    ("cat", Weekday::Sat, "#caturday"),
    ("sky", Weekday::Sun, "#SkySunday"),
];

const LOCATIONS: &[(&str, &str)] = &[
    ("Acadia National Park", "#AcadiaNationalPark"),
    ("Ashland State Park", "#AshlandStatePark"),
    ("Crawford Notch State Park", "#CrawfordNotchStatePark"),
    ("Franconia Notch State Park", "#FranconiaNotchStatePark"),
    ("Wareham", "#BuzzardsBay"),
    ("Westport", "#BuzzardsBay"),
    ("White Mountain National Forest", "#WhiteMountainNationalForest"),
    ("Whitehall State Park", "#WhitehallStatePark"),
    ("Yellowstone National Park", "#YellowstoneNationalPark"),
    ("Zion National Park", "#ZionNationalPark"),
];

// (postal code, full name, hashtag); both the code and the name are keys.
const STATES: &[(&str, &str, &str)] = &[
    ("AK", "Alaska", "#alaska"),
    ("AL", "Alabama", "#alabama"),
    ("AR", "Arkansas", "#arkansas"),
    ("AS", "American Samoa", "#AmericanSamoa"),
    ("AZ", "Arizona", "#arizona"),
    ("CA", "California", "#california"),
    ("CO", "Colorado", "#colorado"),
    ("CT", "Connecticut", "#connecticut"),
    ("DC", "District of Columbia", "#DistrictOfColumbia"),
    ("DE", "Delaware", "#delaware"),
    ("FL", "Florida", "#florida"),
    ("GA", "Georgia", "#georgia"),
    ("GU", "Guam", "#guam"),
    ("HI", "Hawaii", "#hawaii"),
    ("IA", "Iowa", "#iowa"),
    ("ID", "Idaho", "#idaho"),
    ("IL", "Illinois", "#illinois"),
    ("IN", "Indiana", "#indiana"),
    ("KS", "Kansas", "#kansas"),
    ("KY", "Kentucky", "#kentucky"),
    ("LA", "Louisiana", "#louisiana"),
    ("MA", "Massachusetts", "#Massachusetts"),
    ("MD", "Maryland", "#maryland"),
    ("ME", "Maine", "#maine"),
    ("MI", "Michigan", "#michigan"),
    ("MN", "Minnesota", "#minnesota"),
    ("MO", "Missouri", "#missouri"),
    ("MP", "Northern Mariana Islands", "#NorthernMarianaIslands"),
    ("MS", "Mississippi", "#mississippi"),
    ("MT", "Montana", "#montana"),
    ("NC", "North Carolina", "#NorthCarolina"),
    ("ND", "North Dakota", "#NorthDakota"),
    ("NE", "Nebraska", "#Nebraska"),
    ("NH", "New Hampshire", "#NewHampshire"),
    ("NJ", "New Jersey", "#NewJersey"),
    ("NM", "New Mexico", "#NewMexico"),
    ("NV", "Nevada", "#nevada"),
    ("NY", "New York", "#NewYork"),
    ("OH", "Ohio", "#ohio"),
    ("OK", "Oklahoma", "#oklahoma"),
    ("OR", "Oregon", "#oregon"),
    ("PA", "Pennsylvania", "#pennsylvania"),
    ("PR", "Puerto Rico", "#PuertoRico"),
    ("RI", "Rhode Island", "#RhodeIsland"),
    ("SC", "South Carolina", "#SouthCarolina"),
    ("SD", "South Dakota", "#SouthDakota"),
    ("TN", "Tennessee", "#tennessee"),
    ("TX", "Texas", "#texas"),
    ("UT", "Utah", "#utah"),
    ("VA", "Virginia", "#virginia"),
    ("VI", "Virgin Islands", "#VirginIslands"),
    ("VT", "Vermont", "#vermont"),
    ("WA", "Washington", "#washington"),
    ("WI", "Wisconsin", "#wisconsin"),
    ("WV", "West Virginia", "#WestVirginia"),
    ("WY", "Wyoming", "#wyoming"),
];

const COUNTRY_CODES: &[(&str, &str)] = &[
    ("AT", "#Austria"),
    ("CA", "#Canada"),
    ("IS", "#Iceland"),
];

const CAMERA_MAKES: &[(&str, &str)] = &[
    ("canon", "#CanonPhotography"),
    ("fujifilm", "#FujifilmPhotography"),
    ("panasonic", "#Lumix"),
    ("sony", "#SonyAlpha"),
];

const WEEKDAY_HASH_TAGS: &[(Weekday, &str)] = &[
    (Weekday::Fri, "#FotoFriday"),
    (Weekday::Sun, "#SundayPhotography"),
];

/// A hashtag that is only emitted on one day of the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRule {
    /// Lowercased keyword that triggers the rule.
    pub keyword: String,
    pub weekday: Weekday,
    pub hash_tag: String,
}

/// All lookup tables used by the caption engine.
///
/// Loaded once at startup and only read afterwards. Keys of case-insensitive
/// tables are normalised on insert, so always go through the `insert_*` methods.
#[derive(Debug, Clone)]
pub struct LookupTables {
    pub(crate) base_hash_tags: String,
    pub(crate) camera_map: BTreeMap<String, String>,
    pub(crate) lens_map: BTreeMap<String, String>,
    pub(crate) keyword_map: BTreeMap<String, String>,
    pub(crate) conditional_keywords: Vec<ConditionalRule>,
    pub(crate) location_map: BTreeMap<String, String>,
    pub(crate) state_map: BTreeMap<String, String>,
    pub(crate) country_code_map: BTreeMap<String, String>,
    pub(crate) camera_make_map: BTreeMap<String, String>,
    pub(crate) weekday_hash_tags: HashMap<Weekday, String>,
    pub(crate) private_places: BTreeSet<String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        let mut tables = Self::empty();
        tables.base_hash_tags = BASE_HASH_TAGS.to_string();
        for (raw, name) in CAMERAS {
            tables.insert_camera(raw, name);
        }
        for (raw, name) in LENSES {
            tables.insert_lens(raw, name);
        }
        for (keyword, tag) in KEYWORDS {
            tables.insert_keyword(keyword, tag);
        }
        for (keyword, day, tag) in CONDITIONAL_KEYWORDS {
            tables.add_conditional(keyword, *day, tag);
        }
        for (place, tag) in LOCATIONS {
            tables.insert_location(place, tag);
        }
        for (code, name, tag) in STATES {
            tables.insert_state(code, tag);
            tables.insert_state(name, tag);
        }
        for (code, tag) in COUNTRY_CODES {
            tables.insert_country_code(code, tag);
        }
        for (make, tag) in CAMERA_MAKES {
            tables.insert_camera_make(make, tag);
        }
        for (day, tag) in WEEKDAY_HASH_TAGS {
            tables.set_weekday_tag(*day, tag);
        }
        tables
    }
}

impl LookupTables {
    /// Tables with no entries and no base hashtags.
    pub fn empty() -> Self {
        Self {
            base_hash_tags: String::new(),
            camera_map: BTreeMap::new(),
            lens_map: BTreeMap::new(),
            keyword_map: BTreeMap::new(),
            conditional_keywords: Vec::new(),
            location_map: BTreeMap::new(),
            state_map: BTreeMap::new(),
            country_code_map: BTreeMap::new(),
            camera_make_map: BTreeMap::new(),
            weekday_hash_tags: HashMap::new(),
            private_places: BTreeSet::new(),
        }
    }

    // ── lookups ──────────────────────────────────────────────────────

    pub fn base_hash_tags(&self) -> &str {
        &self.base_hash_tags
    }

    /// Friendly camera name, or `raw` if the model is not in the table.
    pub fn camera_name<'a>(&'a self, raw: &'a str) -> &'a str {
        self.camera_map.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Friendly lens name, or `raw` if the lens is not in the table.
    pub fn lens_name<'a>(&'a self, raw: &'a str) -> &'a str {
        self.lens_map.get(raw).map(String::as_str).unwrap_or(raw)
    }

    pub fn keyword_tag(&self, keyword: &str) -> Option<&str> {
        self.keyword_map
            .get(&keyword.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Tags of every rule for `keyword` whose weekday is `today`.
    pub fn conditional_tags<'a>(
        &'a self,
        keyword: &str,
        today: Weekday,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let keyword = keyword.trim().to_lowercase();
        self.conditional_keywords
            .iter()
            .filter(move |rule| rule.keyword == keyword && rule.weekday == today)
            .map(|rule| rule.hash_tag.as_str())
    }

    pub fn location_tag(&self, place: &str) -> Option<&str> {
        self.location_map.get(place).map(String::as_str)
    }

    /// Matches both postal codes (`MA`) and full names (`Massachusetts`).
    pub fn state_tag(&self, state: &str) -> Option<&str> {
        self.state_map
            .get(&state.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn country_tag(&self, code: &str) -> Option<&str> {
        self.country_code_map
            .get(&code.trim().to_uppercase())
            .map(String::as_str)
    }

    pub fn camera_make_tag(&self, make: &str) -> Option<&str> {
        self.camera_make_map
            .get(&make.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn weekday_tag(&self, day: Weekday) -> Option<&str> {
        self.weekday_hash_tags.get(&day).map(String::as_str)
    }

    pub fn is_private(&self, place: &str) -> bool {
        self.private_places.contains(place)
    }

    // ── construction ─────────────────────────────────────────────────

    pub fn set_base_hash_tags(&mut self, tags: &str) {
        self.base_hash_tags = tags.trim().to_string();
    }

    pub fn insert_camera(&mut self, raw: &str, name: &str) {
        self.camera_map.insert(raw.to_string(), name.to_string());
    }

    pub fn insert_lens(&mut self, raw: &str, name: &str) {
        self.lens_map.insert(raw.to_string(), name.to_string());
    }

    pub fn insert_keyword(&mut self, keyword: &str, tag: &str) {
        self.keyword_map
            .insert(keyword.trim().to_lowercase(), tag.to_string());
    }

    /// Add a weekday-gated rule. A rule identical to an existing one is ignored.
    pub fn add_conditional(&mut self, keyword: &str, weekday: Weekday, tag: &str) {
        let rule = ConditionalRule {
            keyword: keyword.trim().to_lowercase(),
            weekday,
            hash_tag: tag.to_string(),
        };
        if !self.conditional_keywords.contains(&rule) {
            self.conditional_keywords.push(rule);
        }
    }

    pub fn insert_location(&mut self, place: &str, tag: &str) {
        self.location_map.insert(place.to_string(), tag.to_string());
    }

    pub fn insert_state(&mut self, state: &str, tag: &str) {
        self.state_map
            .insert(state.trim().to_lowercase(), tag.to_string());
    }

    pub fn insert_country_code(&mut self, code: &str, tag: &str) {
        self.country_code_map
            .insert(code.trim().to_uppercase(), tag.to_string());
    }

    pub fn insert_camera_make(&mut self, make: &str, tag: &str) {
        self.camera_make_map
            .insert(make.trim().to_lowercase(), tag.to_string());
    }

    pub fn set_weekday_tag(&mut self, day: Weekday, tag: &str) {
        self.weekday_hash_tags.insert(day, tag.to_string());
    }

    pub fn add_private_place(&mut self, place: &str) {
        self.private_places.insert(place.to_string());
    }
}
