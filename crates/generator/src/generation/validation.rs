//! Template checks that run before any random draw.

use forge_core::BoundedRange;
use forge_core::constants::MAX_FLIGHT_SIZE;
use forge_template::MissionTemplate;

/// Oldest and newest years a mission date may use.
pub const YEAR_LIMITS: (i32, i32) = (1900, 2100);

/// A reason the template cannot be expanded at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateIssue {
    #[error("no theater selected")]
    EmptyTheater,
    #[error("no player flight group defined")]
    NoFlightGroups,
    #[error("blue and red coalitions are both `{0}`")]
    SameCoalition(String),
    #[error("flight group {index} has no aircraft type")]
    MissingAircraft { index: usize },
    #[error("flight group {index} has {count} aircraft, expected 1 to {max}")]
    InvalidFlightSize { index: usize, count: u32, max: u32 },
    #[error("flight group {index} names {players} player(s) for {count} aircraft")]
    TooManyPlayers {
        index: usize,
        players: usize,
        count: u32,
    },
    #[error("no player seat is named in any flight group")]
    NoPlayers,
    #[error("objective count `{0}` must start at 1 or more")]
    NoObjectives(BoundedRange),
    #[error("year {0} is outside {min}..={max}", min = YEAR_LIMITS.0, max = YEAR_LIMITS.1)]
    InvalidYear(i32),
}

/// Check the structural rules of `template`; flight group indices in errors are 1-based.
pub fn validate(template: &MissionTemplate) -> Result<(), TemplateIssue> {
    if template.theater.trim().is_empty() {
        return Err(TemplateIssue::EmptyTheater);
    }
    if template.player_flight_groups.is_empty() {
        return Err(TemplateIssue::NoFlightGroups);
    }
    if template
        .coalition_blue
        .trim()
        .eq_ignore_ascii_case(template.coalition_red.trim())
    {
        return Err(TemplateIssue::SameCoalition(template.coalition_blue.clone()));
    }
    for (idx, fg) in template.player_flight_groups.iter().enumerate() {
        let index = idx + 1;
        if fg.aircraft.trim().is_empty() {
            return Err(TemplateIssue::MissingAircraft { index });
        }
        if fg.count == 0 || fg.count > MAX_FLIGHT_SIZE {
            return Err(TemplateIssue::InvalidFlightSize {
                index,
                count: fg.count,
                max: MAX_FLIGHT_SIZE,
            });
        }
        let players = fg.player_count();
        if players > fg.count as usize {
            return Err(TemplateIssue::TooManyPlayers {
                index,
                players,
                count: fg.count,
            });
        }
    }
    if template.total_players() == 0 {
        return Err(TemplateIssue::NoPlayers);
    }
    if template.objective_count.min() < 1 {
        return Err(TemplateIssue::NoObjectives(template.objective_count));
    }
    if !(YEAR_LIMITS.0..=YEAR_LIMITS.1).contains(&template.date_year) {
        return Err(TemplateIssue::InvalidYear(template.date_year));
    }
    Ok(())
}
