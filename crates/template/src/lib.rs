//! User-editable mission templates.
//!
//! A template is the partially randomized request the generator expands. It
//! is owned by the editing surface, persisted as TOML, and handed to the
//! generator by shared reference. Editing goes through the explicit field
//! schema in [`schema`] rather than through reflection.

use std::fs;
use std::path::{Path, PathBuf};

use forge_core::{BoundedRange, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod schema;

pub use schema::{TemplateField, TemplateValue};

/// Closed set of named options with a stable text form.
pub trait Choice: Sized + Copy + 'static {
    const OPTIONS: &'static [&'static str];

    fn as_str(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl Choice for $name {
            const OPTIONS: &'static [&'static str] = &[$($text),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                let name = name.trim();
                $(if name.eq_ignore_ascii_case($text) {
                    return Some($name::$variant);
                })+
                None
            }
        }
    };
}

choice_enum!(
    /// Calendar month, or a random one.
    MonthChoice {
        Random => "random",
        January => "january",
        February => "february",
        March => "march",
        April => "april",
        May => "may",
        June => "june",
        July => "july",
        August => "august",
        September => "september",
        October => "october",
        November => "november",
        December => "december",
    }
);

impl MonthChoice {
    /// Month number 1-12, `None` for [`MonthChoice::Random`].
    pub fn number(&self) -> Option<u32> {
        Self::OPTIONS
            .iter()
            .position(|name| *name == self.as_str())
            .filter(|idx| *idx > 0)
            .map(|idx| idx as u32)
    }
}

choice_enum!(
    TimeOfDay {
        Random => "random",
        Dawn => "dawn",
        Day => "day",
        Dusk => "dusk",
        Night => "night",
    }
);

choice_enum!(
    WeatherPreset {
        Random => "random",
        Clear => "clear",
        LightClouds => "light_clouds",
        Overcast => "overcast",
        Precipitation => "precipitation",
        Storm => "storm",
    }
);

choice_enum!(
    /// What the player flights are sent to attack.
    ObjectiveKind {
        Strike => "strike",
        Cas => "cas",
        Sead => "sead",
    }
);

choice_enum!(
    /// Skill of AI-controlled pilots and ground crews.
    SkillLevel {
        Random => "random",
        Average => "average",
        Good => "good",
        High => "high",
        Excellent => "excellent",
    }
);

choice_enum!(
    StartLocation {
        Runway => "runway",
        ParkingHot => "parking_hot",
        ParkingCold => "parking_cold",
    }
);

choice_enum!(
    SideChoice {
        Blue => "blue",
        Red => "red",
    }
);

impl From<SideChoice> for Side {
    fn from(value: SideChoice) -> Self {
        match value {
            SideChoice::Blue => Side::Blue,
            SideChoice::Red => Side::Red,
        }
    }
}

impl From<Side> for SideChoice {
    fn from(value: Side) -> Self {
        match value {
            Side::Blue => SideChoice::Blue,
            Side::Red => SideChoice::Red,
        }
    }
}

/// One player flight: an aircraft type, a size, and the named seats in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerFlightGroupTemplate {
    pub aircraft: String,
    pub count: u32,
    #[serde(default)]
    pub carrier: bool,
    #[serde(default)]
    pub players: Vec<String>,
}

impl PlayerFlightGroupTemplate {
    pub fn new(aircraft: impl Into<String>, count: u32) -> Self {
        Self {
            aircraft: aircraft.into(),
            count,
            carrier: false,
            players: Vec::new(),
        }
    }

    /// Named seats; blank names are ignored.
    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.players
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn player_count(&self) -> usize {
        self.player_names().count()
    }
}

impl Default for PlayerFlightGroupTemplate {
    fn default() -> Self {
        Self {
            aircraft: "FA-18C_hornet".to_string(),
            count: 2,
            carrier: false,
            players: vec!["Player".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionTemplate {
    pub theater: String,
    pub player_coalition: SideChoice,
    pub coalition_blue: String,
    pub coalition_red: String,
    pub date_year: i32,
    pub date_month: MonthChoice,
    pub time_of_day: TimeOfDay,
    pub weather: WeatherPreset,
    pub wind_speed_kts: BoundedRange,
    pub objective_kind: ObjectiveKind,
    pub objective_count: BoundedRange,
    pub objective_distance_nm: BoundedRange,
    pub target_count: BoundedRange,
    pub enemy_air_defense: BoundedRange,
    pub ai_skill: SkillLevel,
    pub player_start: StartLocation,
    /// Empty means the generator invents an operation name.
    pub briefing_name: String,
    pub player_flight_groups: Vec<PlayerFlightGroupTemplate>,
}

impl Default for MissionTemplate {
    fn default() -> Self {
        Self {
            theater: "caucasus".to_string(),
            player_coalition: SideChoice::Blue,
            coalition_blue: "usa".to_string(),
            coalition_red: "russia".to_string(),
            date_year: 2011,
            date_month: MonthChoice::Random,
            time_of_day: TimeOfDay::Day,
            weather: WeatherPreset::Random,
            wind_speed_kts: BoundedRange::new(0, 15),
            objective_kind: ObjectiveKind::Strike,
            objective_count: BoundedRange::new(1, 2),
            objective_distance_nm: BoundedRange::new(20, 60),
            target_count: BoundedRange::new(2, 4),
            enemy_air_defense: BoundedRange::new(0, 1),
            ai_skill: SkillLevel::High,
            player_start: StartLocation::ParkingHot,
            briefing_name: String::new(),
            player_flight_groups: vec![PlayerFlightGroupTemplate::default()],
        }
    }
}

/// Errors surfaced while editing, loading, or saving templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to access template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse template: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize template: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown template field `{0}`")]
    UnknownField(String),
    #[error("invalid value `{value}` for `{field}`: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl MissionTemplate {
    /// A fresh template set in the given theater.
    pub fn for_theater(theater: impl Into<String>) -> Self {
        Self {
            theater: theater.into(),
            ..Self::default()
        }
    }

    /// Reset every field to its default, the editor's "new template".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn player_side(&self) -> Side {
        self.player_coalition.into()
    }

    pub fn total_aircraft(&self) -> u32 {
        self.player_flight_groups.iter().map(|fg| fg.count).sum()
    }

    pub fn total_players(&self) -> usize {
        self.player_flight_groups
            .iter()
            .map(PlayerFlightGroupTemplate::player_count)
            .sum()
    }

    /// One-line description of the player flights, as shown next to the flight list.
    pub fn player_summary(&self) -> String {
        format!(
            "{} player(s) in {} aircraft in {} flight group(s)",
            self.total_players(),
            self.total_aircraft(),
            self.player_flight_groups.len()
        )
    }

    pub fn to_toml_string(&self) -> Result<String, TemplateError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, TemplateError> {
        let template: MissionTemplate = toml::from_str(input)?;
        template.warn_degenerate_ranges();
        Ok(template)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TemplateError> {
        let path = path.as_ref();
        let contents = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| TemplateError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, contents).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("template saved to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn warn_degenerate_ranges(&self) {
        for field in self.schema() {
            if let TemplateValue::Range(range) = field.value {
                if range.is_degenerate() {
                    log::warn!("template field `{}` is 0,0 (missing or malformed)", field.name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edited_template() -> MissionTemplate {
        let mut template = MissionTemplate::for_theater("nevada");
        template.player_coalition = SideChoice::Red;
        template.coalition_blue = "georgia".to_string();
        template.date_month = MonthChoice::October;
        template.weather = WeatherPreset::Storm;
        template.objective_kind = ObjectiveKind::Sead;
        template.objective_count = BoundedRange::new(3, 2);
        template.briefing_name = "Operation \"Quiet\" Dawn".to_string();
        template.player_flight_groups = vec![
            PlayerFlightGroupTemplate {
                aircraft: "Su-25T".to_string(),
                count: 4,
                carrier: false,
                players: vec!["Ivan".to_string(), " ".to_string(), "Olga".to_string()],
            },
            PlayerFlightGroupTemplate::new("Su-33", 2),
        ];
        template
    }

    #[test]
    fn toml_round_trip_is_field_for_field_equal() {
        let template = edited_template();
        let text = template.to_toml_string().expect("serialize");
        let reloaded = MissionTemplate::from_toml_str(&text).expect("parse");
        assert_eq!(reloaded, template);
    }

    #[test]
    fn file_round_trip_is_field_for_field_equal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("templates/strike.toml");
        let template = edited_template();
        template.save(&path).expect("save");
        assert_eq!(MissionTemplate::load(&path).expect("load"), template);
    }

    #[test]
    fn ranges_persist_as_text() {
        let text = MissionTemplate::default().to_toml_string().unwrap();
        assert!(text.contains("objective_count = \"1,2\""), "{text}");
        assert!(text.contains("[[player_flight_groups]]"), "{text}");
    }

    #[test]
    fn missing_fields_take_defaults_and_bad_ranges_soft_fail() {
        let template =
            MissionTemplate::from_toml_str("theater = \"nevada\"\ntarget_count = \"lots\"\n")
                .expect("parse");
        assert_eq!(template.theater, "nevada");
        assert_eq!(template.target_count, BoundedRange::new(0, 0));
        assert_eq!(template.coalition_red, "russia");
    }

    #[test]
    fn unknown_choice_is_a_parse_error() {
        let err = MissionTemplate::from_toml_str("weather = \"sandstorm\"\n").unwrap_err();
        assert!(matches!(err, TemplateError::Parse(_)));
    }

    #[test]
    fn summary_counts_named_seats_only() {
        let template = edited_template();
        assert_eq!(
            template.player_summary(),
            "2 player(s) in 6 aircraft in 2 flight group(s)"
        );
    }

    #[test]
    fn clear_restores_defaults() {
        let mut template = edited_template();
        template.clear();
        assert_eq!(template, MissionTemplate::default());
    }

    #[test]
    fn month_numbers_follow_calendar() {
        assert_eq!(MonthChoice::Random.number(), None);
        assert_eq!(MonthChoice::January.number(), Some(1));
        assert_eq!(MonthChoice::December.number(), Some(12));
        assert_eq!(MonthChoice::from_name("AUGUST"), Some(MonthChoice::August));
    }
}
