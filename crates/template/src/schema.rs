//! Explicit field schema over [`MissionTemplate`].
//!
//! The presentation layer lists [`MissionTemplate::schema`] and writes back
//! through [`MissionTemplate::set_field`]. Flight group fields are addressed
//! as `flight.<n>.<field>` with `n` starting at 1.

use forge_core::BoundedRange;

use crate::{
    Choice, MissionTemplate, MonthChoice, ObjectiveKind, PlayerFlightGroupTemplate, SideChoice,
    SkillLevel, StartLocation, TemplateError, TimeOfDay, WeatherPreset,
};

/// Tagged value of a single template field.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Text(String),
    Integer(i64),
    Flag(bool),
    Choice {
        selected: &'static str,
        options: &'static [&'static str],
    },
    Range(BoundedRange),
    List(Vec<String>),
}

impl TemplateValue {
    fn choice<C: Choice>(value: C) -> Self {
        TemplateValue::Choice {
            selected: value.as_str(),
            options: C::OPTIONS,
        }
    }

    /// Text form as typed into an editor cell.
    pub fn display(&self) -> String {
        match self {
            TemplateValue::Text(text) => text.clone(),
            TemplateValue::Integer(value) => value.to_string(),
            TemplateValue::Flag(value) => value.to_string(),
            TemplateValue::Choice { selected, .. } => selected.to_string(),
            TemplateValue::Range(range) => range.to_string(),
            TemplateValue::List(items) => items.join(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateField {
    pub name: String,
    pub value: TemplateValue,
}

impl TemplateField {
    fn new(name: impl Into<String>, value: TemplateValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl MissionTemplate {
    /// Every editable field in display order.
    pub fn schema(&self) -> Vec<TemplateField> {
        let mut fields = vec![
            TemplateField::new("theater", TemplateValue::Text(self.theater.clone())),
            TemplateField::new(
                "player_coalition",
                TemplateValue::choice(self.player_coalition),
            ),
            TemplateField::new(
                "coalition_blue",
                TemplateValue::Text(self.coalition_blue.clone()),
            ),
            TemplateField::new(
                "coalition_red",
                TemplateValue::Text(self.coalition_red.clone()),
            ),
            TemplateField::new("date_year", TemplateValue::Integer(self.date_year.into())),
            TemplateField::new("date_month", TemplateValue::choice(self.date_month)),
            TemplateField::new("time_of_day", TemplateValue::choice(self.time_of_day)),
            TemplateField::new("weather", TemplateValue::choice(self.weather)),
            TemplateField::new("wind_speed_kts", TemplateValue::Range(self.wind_speed_kts)),
            TemplateField::new("objective_kind", TemplateValue::choice(self.objective_kind)),
            TemplateField::new(
                "objective_count",
                TemplateValue::Range(self.objective_count),
            ),
            TemplateField::new(
                "objective_distance_nm",
                TemplateValue::Range(self.objective_distance_nm),
            ),
            TemplateField::new("target_count", TemplateValue::Range(self.target_count)),
            TemplateField::new(
                "enemy_air_defense",
                TemplateValue::Range(self.enemy_air_defense),
            ),
            TemplateField::new("ai_skill", TemplateValue::choice(self.ai_skill)),
            TemplateField::new("player_start", TemplateValue::choice(self.player_start)),
            TemplateField::new(
                "briefing_name",
                TemplateValue::Text(self.briefing_name.clone()),
            ),
        ];
        for (idx, fg) in self.player_flight_groups.iter().enumerate() {
            let prefix = format!("flight.{}", idx + 1);
            fields.push(TemplateField::new(
                format!("{prefix}.aircraft"),
                TemplateValue::Text(fg.aircraft.clone()),
            ));
            fields.push(TemplateField::new(
                format!("{prefix}.count"),
                TemplateValue::Integer(fg.count.into()),
            ));
            fields.push(TemplateField::new(
                format!("{prefix}.carrier"),
                TemplateValue::Flag(fg.carrier),
            ));
            fields.push(TemplateField::new(
                format!("{prefix}.players"),
                TemplateValue::List(fg.players.clone()),
            ));
        }
        fields
    }

    /// Parse `value` according to the field's tag and assign it.
    ///
    /// Range fields follow the soft-fail rule of [`BoundedRange::parse`].
    /// `flight.<n>` one past the last group appends a new default group.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), TemplateError> {
        match name {
            "theater" => self.theater = value.trim().to_string(),
            "player_coalition" => self.player_coalition = parse_choice::<SideChoice>(name, value)?,
            "coalition_blue" => self.coalition_blue = value.trim().to_string(),
            "coalition_red" => self.coalition_red = value.trim().to_string(),
            "date_year" => self.date_year = parse_integer(name, value)?,
            "date_month" => self.date_month = parse_choice::<MonthChoice>(name, value)?,
            "time_of_day" => self.time_of_day = parse_choice::<TimeOfDay>(name, value)?,
            "weather" => self.weather = parse_choice::<WeatherPreset>(name, value)?,
            "wind_speed_kts" => self.wind_speed_kts = BoundedRange::parse(value),
            "objective_kind" => self.objective_kind = parse_choice::<ObjectiveKind>(name, value)?,
            "objective_count" => self.objective_count = BoundedRange::parse(value),
            "objective_distance_nm" => self.objective_distance_nm = BoundedRange::parse(value),
            "target_count" => self.target_count = BoundedRange::parse(value),
            "enemy_air_defense" => self.enemy_air_defense = BoundedRange::parse(value),
            "ai_skill" => self.ai_skill = parse_choice::<SkillLevel>(name, value)?,
            "player_start" => self.player_start = parse_choice::<StartLocation>(name, value)?,
            "briefing_name" => self.briefing_name = value.trim().to_string(),
            other => return self.set_flight_field(other, value),
        }
        Ok(())
    }

    fn set_flight_field(&mut self, name: &str, value: &str) -> Result<(), TemplateError> {
        let unknown = || TemplateError::UnknownField(name.to_string());
        let rest = name.strip_prefix("flight.").ok_or_else(unknown)?;
        let (index, field) = rest.split_once('.').ok_or_else(unknown)?;
        let index: usize = index.parse().map_err(|_| unknown())?;
        if index == 0 || index > self.player_flight_groups.len() + 1 {
            return Err(unknown());
        }
        if !matches!(field, "aircraft" | "count" | "carrier" | "players") {
            return Err(unknown());
        }
        // a new group is only appended once its first field parses
        let mut fg = self
            .player_flight_groups
            .get(index - 1)
            .cloned()
            .unwrap_or_else(|| PlayerFlightGroupTemplate::new("", 1));
        match field {
            "aircraft" => fg.aircraft = value.trim().to_string(),
            "count" => fg.count = parse_integer(name, value)?,
            "carrier" => fg.carrier = parse_flag(name, value)?,
            _ => {
                fg.players = value
                    .split(',')
                    .map(|player| player.trim().to_string())
                    .filter(|player| !player.is_empty())
                    .collect()
            }
        }
        match self.player_flight_groups.get_mut(index - 1) {
            Some(slot) => *slot = fg,
            None => self.player_flight_groups.push(fg),
        }
        Ok(())
    }

    /// Remove flight group `n` (1-based); returns it when present.
    pub fn remove_flight_group(&mut self, n: usize) -> Option<PlayerFlightGroupTemplate> {
        if n == 0 || n > self.player_flight_groups.len() {
            return None;
        }
        Some(self.player_flight_groups.remove(n - 1))
    }
}

fn parse_choice<C: Choice>(field: &str, value: &str) -> Result<C, TemplateError> {
    C::from_name(value).ok_or_else(|| TemplateError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: format!("one of {}", C::OPTIONS.join(", ")),
    })
}

fn parse_integer<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, TemplateError> {
    value.trim().parse().map_err(|_| TemplateError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: "an integer".to_string(),
    })
}

fn parse_flag(field: &str, value: &str) -> Result<bool, TemplateError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(TemplateError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}
