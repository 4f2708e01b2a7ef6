//! Resolved mission object graph.
//!
//! A [`Mission`] is produced once per generation call and never mutated
//! afterwards: every randomized template field has been replaced by a
//! concrete value. The exporter borrows it read-only.

use chrono::NaiveDate;
use forge_core::Side;
use forge_core::coords::Coordinates;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub theater: TheaterInfo,
    pub date: NaiveDate,
    /// Seconds after midnight.
    pub start_time_seconds: u32,
    pub weather: Weather,
    pub player_side: Side,
    pub blue: CoalitionRoster,
    pub red: CoalitionRoster,
    pub zones: Vec<TriggerZone>,
    pub triggers: Vec<Trigger>,
    pub airbases: Vec<AirbaseState>,
    pub briefing: Briefing,
}

impl Mission {
    pub fn coalition(&self, side: Side) -> &CoalitionRoster {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    pub fn coalitions(&self) -> [&CoalitionRoster; 2] {
        [&self.blue, &self.red]
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.blue.groups.iter().chain(self.red.groups.iter())
    }

    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    pub fn unit_count(&self) -> usize {
        self.groups().map(|group| group.units.len()).sum()
    }

    /// Units flown by a human, whether single-player or client slots.
    pub fn player_unit_count(&self) -> usize {
        self.groups()
            .flat_map(|group| group.units.iter())
            .filter(|unit| unit.skill.is_human())
            .count()
    }

    pub fn group(&self, id: u32) -> Option<&Group> {
        self.groups().find(|group| group.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheaterInfo {
    pub id: String,
    pub name: String,
    pub dcs_name: String,
    pub center: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    None,
    Rain,
    Thunderstorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wind {
    pub speed_mps: f64,
    /// Direction the wind blows from, degrees.
    pub direction_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub temperature_c: f64,
    pub qnh_mmhg: f64,
    pub cloud_base_m: f64,
    pub cloud_thickness_m: f64,
    /// Cloud density on the simulator's 0-10 scale.
    pub cloud_density: u8,
    pub precipitation: Precipitation,
    pub visibility_m: f64,
    pub turbulence_mps: f64,
    pub wind_ground: Wind,
    pub wind_2000: Wind,
    pub wind_8000: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirbaseState {
    pub id: u32,
    pub name: String,
    /// Owning coalition; `None` for neutral fields.
    pub side: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoalitionRoster {
    pub side: Side,
    pub name: String,
    pub country: Country,
    pub bullseye: Coordinates,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupCategory {
    Plane,
    Helicopter,
    Vehicle,
    Ship,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: u32,
    pub name: String,
    pub category: GroupCategory,
    pub task: String,
    pub units: Vec<Unit>,
    pub route: Vec<Waypoint>,
    pub frequency_mhz: Option<f64>,
    pub uncontrolled: bool,
}

impl Group {
    pub fn has_players(&self) -> bool {
        self.units.iter().any(|unit| unit.skill.is_human())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Skill {
    Average,
    Good,
    High,
    Excellent,
    Random,
    Client,
    Player,
}

impl Skill {
    pub fn is_human(&self) -> bool {
        matches!(self, Skill::Client | Skill::Player)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Average => "Average",
            Skill::Good => "Good",
            Skill::High => "High",
            Skill::Excellent => "Excellent",
            Skill::Random => "Random",
            Skill::Client => "Client",
            Skill::Player => "Player",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Callsign {
    /// Western style, e.g. `Enfield 1-2`; `family` is the 1-based index in the aircraft's list.
    Named {
        name: String,
        family: u32,
        flight: u32,
        element: u32,
    },
    /// Eastern style three-digit callsign.
    Numeric { value: u32 },
}

impl Callsign {
    pub fn label(&self) -> String {
        match self {
            Callsign::Named {
                name,
                flight,
                element,
                ..
            } => format!("{name} {flight}-{element}"),
            Callsign::Numeric { value } => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub id: u32,
    pub name: String,
    pub unit_type: String,
    pub skill: Skill,
    pub position: Coordinates,
    pub altitude_m: f64,
    pub heading_rad: f64,
    pub callsign: Option<Callsign>,
    pub onboard_number: Option<String>,
    pub player_name: Option<String>,
    pub livery: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    TakeOffRunway,
    TakeOffParkingHot,
    TakeOffParking,
    TurningPoint,
    Land,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub kind: WaypointKind,
    pub name: String,
    pub position: Coordinates,
    pub altitude_m: f64,
    pub speed_mps: f64,
    pub airbase_id: Option<u32>,
    /// Unit id of the ship a takeoff or landing point is attached to.
    pub linked_unit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerZone {
    pub id: u32,
    pub name: String,
    pub position: Coordinates,
    pub radius_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    TimeMoreThan { seconds: u32 },
    /// Every listed group has been destroyed.
    GroupsDead { groups: Vec<u32> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
    Message { text: String, seconds: u32 },
    EndMission { winner: Side },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub name: String,
    pub condition: TriggerCondition,
    pub actions: Vec<TriggerAction>,
}

/// Briefing text plus its rendered markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Briefing {
    pub name: String,
    pub description: String,
    pub objectives: Vec<String>,
    pub flights: Vec<String>,
    pub remarks: Vec<String>,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: u32, skill: Skill) -> Unit {
        Unit {
            id,
            name: format!("Unit {id}"),
            unit_type: "T-72B".to_string(),
            skill,
            position: Coordinates::default(),
            altitude_m: 0.0,
            heading_rad: 0.0,
            callsign: None,
            onboard_number: None,
            player_name: None,
            livery: None,
        }
    }

    fn roster(side: Side, groups: Vec<Group>) -> CoalitionRoster {
        CoalitionRoster {
            side,
            name: side.as_str().to_string(),
            country: Country {
                id: 0,
                name: "Test".to_string(),
            },
            bullseye: Coordinates::default(),
            groups,
        }
    }

    fn group(id: u32, units: Vec<Unit>) -> Group {
        Group {
            id,
            name: format!("Group {id}"),
            category: GroupCategory::Plane,
            task: "CAS".to_string(),
            units,
            route: Vec::new(),
            frequency_mhz: None,
            uncontrolled: false,
        }
    }

    fn mission() -> Mission {
        let wind = Wind {
            speed_mps: 0.0,
            direction_deg: 0.0,
        };
        Mission {
            theater: TheaterInfo {
                id: "caucasus".to_string(),
                name: "Caucasus".to_string(),
                dcs_name: "Caucasus".to_string(),
                center: Coordinates::default(),
            },
            date: NaiveDate::from_ymd_opt(2011, 6, 1).unwrap(),
            start_time_seconds: 28_800,
            weather: Weather {
                temperature_c: 20.0,
                qnh_mmhg: 760.0,
                cloud_base_m: 2_000.0,
                cloud_thickness_m: 200.0,
                cloud_density: 0,
                precipitation: Precipitation::None,
                visibility_m: 80_000.0,
                turbulence_mps: 0.0,
                wind_ground: wind,
                wind_2000: wind,
                wind_8000: wind,
            },
            player_side: Side::Blue,
            blue: roster(
                Side::Blue,
                vec![group(1, vec![unit(1, Skill::Player), unit(2, Skill::High)])],
            ),
            red: roster(Side::Red, vec![group(2, vec![unit(3, Skill::Good)])]),
            zones: Vec::new(),
            triggers: Vec::new(),
            airbases: Vec::new(),
            briefing: Briefing {
                name: "Operation Test".to_string(),
                description: String::new(),
                objectives: Vec::new(),
                flights: Vec::new(),
                remarks: Vec::new(),
                html: String::new(),
            },
        }
    }

    #[test]
    fn counts_span_both_coalitions() {
        let mission = mission();
        assert_eq!(mission.group_count(), 2);
        assert_eq!(mission.unit_count(), 3);
        assert_eq!(mission.player_unit_count(), 1);
        assert!(mission.group(1).unwrap().has_players());
        assert!(!mission.group(2).unwrap().has_players());
        assert!(mission.group(9).is_none());
    }

    #[test]
    fn callsign_labels() {
        let named = Callsign::Named {
            name: "Enfield".to_string(),
            family: 1,
            flight: 1,
            element: 2,
        };
        assert_eq!(named.label(), "Enfield 1-2");
        assert_eq!(Callsign::Numeric { value: 101 }.label(), "101");
    }

    #[test]
    fn summary_serializes_with_iso_date() {
        let json = serde_json::to_value(mission()).expect("serialize");
        assert_eq!(json["date"], "2011-06-01");
        assert_eq!(json["player_side"], "blue");
        assert_eq!(json["blue"]["groups"][0]["units"][0]["skill"], "Player");
    }
}
