//! Staged mission generation.
//!
//! Stages run in a fixed order and consume the random source in that order,
//! so one seed always yields one mission: validation, parameter resolution,
//! asset lookup, ground placement, flights, weather, briefing, triggers.

pub mod briefing;
pub mod resolve;
pub mod validation;

mod assets;
mod flights;
mod placement;
mod triggers;
mod weather;

use forge_config::{Library, LibraryError};
use forge_core::Side;
use forge_core::coords::Coordinates;
use forge_mission::{AirbaseState, CoalitionRoster, Country, Mission, TheaterInfo};
use forge_template::{Choice, MissionTemplate};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use self::assets::Assets;
use self::validation::TemplateIssue;

/// Failures surfaced to the caller; `Display` is the user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] TemplateIssue),
    #[error("{kind} `{id}` not found in library")]
    MissingAsset { kind: &'static str, id: String },
    #[error("could not place {what} after {attempts} attempt(s)")]
    PlacementExhausted { what: String, attempts: u32 },
    #[error("internal generator error: {0}")]
    Internal(String),
}

impl GenerationError {
    pub(crate) fn missing(kind: &'static str, id: impl Into<String>) -> Self {
        GenerationError::MissingAsset {
            kind,
            id: id.into(),
        }
    }
}

impl From<LibraryError> for GenerationError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Missing { kind, id } => GenerationError::MissingAsset { kind, id },
            other => GenerationError::Internal(other.to_string()),
        }
    }
}

/// Sequential identifiers for groups, units and trigger zones within one mission.
#[derive(Debug, Default)]
pub(crate) struct Ids {
    group: u32,
    unit: u32,
    zone: u32,
}

impl Ids {
    pub(crate) fn group(&mut self) -> u32 {
        self.group += 1;
        self.group
    }

    pub(crate) fn unit(&mut self) -> u32 {
        self.unit += 1;
        self.unit
    }

    pub(crate) fn zone(&mut self) -> u32 {
        self.zone += 1;
        self.zone
    }
}

/// Borrows the library for the duration of generation calls; holds no other state.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    library: &'a Library,
}

impl<'a> Generator<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &'a Library {
        self.library
    }

    /// Expand `template` into a fully resolved mission.
    ///
    /// All randomness comes from `rng`; the template and library are only read.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        template: &MissionTemplate,
        rng: &mut R,
    ) -> Result<Mission, GenerationError> {
        info!(
            "generating {} mission in `{}` for {} flight group(s)",
            template.objective_kind.as_str(),
            template.theater,
            template.player_flight_groups.len()
        );
        validation::validate(template)?;

        let params = resolve::resolve(template, rng)?;
        debug!("resolved parameters: {params:?}");

        let settings = &self.library.settings;
        let assets = assets::select(template, self.library, rng)?;
        debug!(
            "home base {} at ({:.0}, {:.0})",
            assets.home_name(),
            assets.home_position().x,
            assets.home_position().y
        );

        let mut ids = Ids::default();
        let forces = placement::place_ground_forces(
            template.objective_kind,
            &params,
            &assets,
            settings,
            &mut ids,
            rng,
        )?;
        let carrier = assets
            .carrier
            .as_ref()
            .map(|carrier| flights::carrier_group(carrier, &params, &mut ids));
        let player_flights = flights::player_flights(
            template,
            &params,
            &assets,
            &forces.sites,
            carrier.as_ref(),
            settings,
            &mut ids,
        );
        let weather = weather::build(
            params.weather,
            params.wind_speed_kts,
            params.month(),
            assets.theater.base_temperature_c,
            rng,
        );
        let briefing = briefing::build(
            template,
            &params,
            &assets,
            &forces.sites,
            &player_flights,
            &weather,
            rng,
        );
        let (zones, triggers) =
            triggers::build(&forces.sites, &briefing, template.player_side(), settings, &mut ids);

        let player_side = template.player_side();
        let bullseye = bullseye(&assets, &forces.sites);
        let mut player_groups = Vec::new();
        if let Some(carrier) = carrier {
            player_groups.push(carrier.group);
        }
        player_groups.extend(player_flights);
        player_groups.extend(forces.friendly_groups);
        let player_roster = roster(player_side, assets.player, bullseye, player_groups);
        let enemy_roster = roster(player_side.opposite(), assets.enemy, bullseye, forces.enemy_groups);
        let (blue, red) = match player_side {
            Side::Blue => (player_roster, enemy_roster),
            Side::Red => (enemy_roster, player_roster),
        };

        let airbases = assets
            .theater
            .airbases
            .iter()
            .map(|airbase| AirbaseState {
                id: airbase.id,
                name: airbase.name.clone(),
                side: assets
                    .airbase
                    .filter(|home| home.id == airbase.id)
                    .map(|_| player_side),
            })
            .collect();

        let mission = Mission {
            theater: TheaterInfo {
                id: assets.theater.id.clone(),
                name: assets.theater.name.clone(),
                dcs_name: assets.theater.dcs_name.clone(),
                center: assets.theater.center,
            },
            date: params.date,
            start_time_seconds: params.start_time_seconds,
            weather,
            player_side,
            blue,
            red,
            zones,
            triggers,
            airbases,
            briefing,
        };
        info!(
            "generated `{}`: {} group(s), {} unit(s), {} player seat(s)",
            mission.briefing.name,
            mission.group_count(),
            mission.unit_count(),
            mission.player_unit_count()
        );
        Ok(mission)
    }
}

/// Expand `template` with the caller's random source.
pub fn generate<R: Rng + ?Sized>(
    template: &MissionTemplate,
    library: &Library,
    rng: &mut R,
) -> Result<Mission, GenerationError> {
    Generator::new(library).generate(template, rng)
}

/// Expand `template` with a fresh `ChaCha20Rng` seeded from `seed`.
pub fn generate_seeded(
    template: &MissionTemplate,
    library: &Library,
    seed: u64,
) -> Result<Mission, GenerationError> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    generate(template, library, &mut rng)
}

/// Midpoint between the home base and the centroid of the objectives.
fn bullseye(assets: &Assets<'_>, sites: &[placement::ObjectiveSite]) -> Coordinates {
    let home = assets.home_position();
    if sites.is_empty() {
        return home;
    }
    let n = sites.len() as f64;
    let centroid = Coordinates::new(
        sites.iter().map(|site| site.position.x).sum::<f64>() / n,
        sites.iter().map(|site| site.position.y).sum::<f64>() / n,
    );
    home.lerp(&centroid, 0.5)
}

fn roster(
    side: Side,
    coalition: &forge_config::CoalitionConfig,
    bullseye: Coordinates,
    groups: Vec<forge_mission::Group>,
) -> CoalitionRoster {
    CoalitionRoster {
        side,
        name: coalition.name.clone(),
        country: Country {
            id: coalition.country_id,
            name: coalition.country.clone(),
        },
        bullseye,
        groups,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use forge_config::{
        AircraftConfig, AirbaseConfig, CarrierStationConfig, CoalitionConfig, GeneratorSettings,
        Library, TheaterConfig, UnitFamily, ZoneConfig,
    };
    use forge_core::coords::Coordinates;
    use std::collections::BTreeMap;

    pub fn nm(v: f64) -> f64 {
        forge_core::units::nm_to_m(v)
    }

    fn aircraft(id: &str, carrier: bool, runway: f64, callsigns: &[&str]) -> AircraftConfig {
        AircraftConfig {
            id: id.to_string(),
            name: id.to_string(),
            carrier_capable: carrier,
            min_runway_ft: runway,
            cruise_speed_kts: 420.0,
            cruise_altitude_ft: 20_000.0,
            callsigns: callsigns.iter().map(|c| c.to_string()).collect(),
            radio_mhz: 251.0,
            task: "Ground Attack".to_string(),
            livery: None,
        }
    }

    fn coalition(id: &str, country_id: u32, carrier: Option<&str>, sam: bool) -> CoalitionConfig {
        let mut units = BTreeMap::new();
        units.insert(UnitFamily::Logistics, vec![format!("{id}-truck")]);
        units.insert(UnitFamily::Armor, vec![format!("{id}-tank"), format!("{id}-ifv")]);
        units.insert(UnitFamily::AirDefense, vec![format!("{id}-aaa")]);
        if sam {
            units.insert(UnitFamily::Sam, vec![format!("{id}-sam")]);
        }
        CoalitionConfig {
            id: id.to_string(),
            name: id.to_uppercase(),
            country: id.to_uppercase(),
            country_id,
            units,
            carrier: carrier.map(str::to_string),
        }
    }

    /// One airbase at the origin, a ring of zones 20-60 nm north, one carrier station.
    pub fn library() -> Library {
        let zones = (0..24)
            .map(|i| {
                let ring = 20.0 + (i % 5) as f64 * 10.0;
                let angle = (i as f64) * std::f64::consts::TAU / 24.0;
                ZoneConfig {
                    name: format!("Zone {i}"),
                    position: Coordinates::new(nm(ring) * angle.cos(), nm(ring) * angle.sin()),
                    radius_m: 1_500.0,
                }
            })
            .collect();
        let theater = TheaterConfig {
            id: "testland".to_string(),
            name: "Testland".to_string(),
            dcs_name: "Caucasus".to_string(),
            center: Coordinates::default(),
            base_temperature_c: 15.0,
            airbases: vec![
                AirbaseConfig {
                    id: 7,
                    name: "Home Field".to_string(),
                    position: Coordinates::default(),
                    elevation_m: 50.0,
                    runway_heading_deg: 90.0,
                    runway_length_ft: 9_000.0,
                },
                AirbaseConfig {
                    id: 8,
                    name: "Short Strip".to_string(),
                    position: Coordinates::new(nm(-30.0), 0.0),
                    elevation_m: 10.0,
                    runway_heading_deg: 0.0,
                    runway_length_ft: 3_000.0,
                },
            ],
            zones,
            carrier_stations: vec![CarrierStationConfig {
                name: "Station".to_string(),
                position: Coordinates::new(nm(-10.0), nm(-10.0)),
                heading_deg: 270.0,
            }],
        };
        Library::from_parts(
            vec![theater],
            vec![
                aircraft("FA-18C_hornet", true, 5_000.0, &["Enfield", "Springfield"]),
                aircraft("A-10C_2", false, 4_000.0, &["Hawg"]),
                aircraft("Su-25T", false, 4_000.0, &[]),
            ],
            vec![
                coalition("usa", 2, Some("CVN_71"), true),
                coalition("russia", 0, Some("KUZNECOW"), true),
                coalition("militia", 17, None, false),
            ],
            GeneratorSettings::default(),
        )
        .expect("test library")
    }

    pub fn template() -> forge_template::MissionTemplate {
        forge_template::MissionTemplate {
            theater: "testland".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{library, nm, template};
    use super::*;
    use forge_mission::{GroupCategory, Skill, TriggerAction, TriggerCondition, WaypointKind};
    use forge_template::{ObjectiveKind, PlayerFlightGroupTemplate, StartLocation};

    #[test]
    fn same_seed_yields_identical_missions() {
        let library = library();
        let template = template();
        let a = generate_seeded(&template, &library, 42).expect("mission");
        let b = generate_seeded(&template, &library, 42).expect("mission");
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_vary_the_mission() {
        let library = library();
        let template = template();
        let missions: Vec<_> = (0..8)
            .map(|seed| generate_seeded(&template, &library, seed).expect("mission"))
            .collect();
        assert!(missions.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn zero_flight_groups_fail_before_sampling() {
        struct PanickingRng;
        impl rand::RngCore for PanickingRng {
            fn next_u32(&mut self) -> u32 {
                panic!("random source consumed")
            }
            fn next_u64(&mut self) -> u64 {
                panic!("random source consumed")
            }
            fn fill_bytes(&mut self, _: &mut [u8]) {
                panic!("random source consumed")
            }
            fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), rand::Error> {
                panic!("random source consumed")
            }
        }

        let library = library();
        let mut template = template();
        template.player_flight_groups.clear();
        let err = generate(&template, &library, &mut PanickingRng).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidTemplate(TemplateIssue::NoFlightGroups)
        ));
    }

    #[test]
    fn missing_theater_is_named_in_the_error() {
        let library = library();
        let mut template = template();
        template.theater = "atlantis".to_string();
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(matches!(err, GenerationError::MissingAsset { kind: "theater", .. }));
        assert_eq!(err.to_string(), "theater `atlantis` not found in library");
    }

    #[test]
    fn missing_coalition_and_aircraft_are_reported() {
        let library = library();
        let mut template = template();
        template.coalition_red = "martians".to_string();
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(err.to_string().contains("martians"));

        let mut template = super::test_support::template();
        template.player_flight_groups[0].aircraft = "X-Wing".to_string();
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(matches!(err, GenerationError::MissingAsset { kind: "aircraft", .. }));
    }

    #[test]
    fn resolved_counts_stay_inside_template_ranges() {
        let library = library();
        let template = template();
        for seed in 0..16 {
            let mission = generate_seeded(&template, &library, seed).expect("mission");
            let objectives = mission.briefing.objectives.len() as i32;
            assert!(template.objective_count.contains(objectives), "seed {seed}");
            for group in &mission.red.groups {
                if group.name.ends_with("Targets") {
                    let units = group.units.len() as i32;
                    assert!(template.target_count.contains(units), "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn objectives_respect_distance_and_separation() {
        let library = library();
        let mut template = template();
        template.objective_count = forge_core::BoundedRange::fixed(2);
        let settings = &library.settings;
        for seed in 0..16 {
            let mission = generate_seeded(&template, &library, seed).expect("mission");
            let home = Coordinates::default();
            for zone in &mission.zones {
                let d = zone.position.distance_to(&home);
                assert!(d >= nm(20.0) - 1.0 && d <= nm(60.0) + 1.0, "seed {seed}: {d}");
            }
            let [a, b] = [&mission.zones[0], &mission.zones[1]];
            assert!(
                a.position.distance_to(&b.position) >= nm(settings.min_objective_separation_nm)
            );
            for group in &mission.red.groups {
                let d = group.route[0].position.distance_to(&home);
                assert!(d >= nm(settings.min_enemy_distance_nm), "seed {seed}");
            }
        }
    }

    #[test]
    fn single_named_seat_is_the_player() {
        let library = library();
        let mission = generate_seeded(&template(), &library, 3).expect("mission");
        let flight = &mission.blue.groups[0];
        assert_eq!(flight.category, GroupCategory::Plane);
        assert_eq!(flight.units[0].skill, Skill::Player);
        assert_eq!(flight.units[0].player_name.as_deref(), Some("Player"));
        assert_eq!(flight.units[1].skill, Skill::High);
        assert_eq!(mission.player_unit_count(), 1);
    }

    #[test]
    fn multiple_named_seats_become_clients() {
        let library = library();
        let mut template = template();
        template.player_flight_groups = vec![PlayerFlightGroupTemplate {
            aircraft: "A-10C_2".to_string(),
            count: 4,
            carrier: false,
            players: vec!["Hawg".to_string(), "Boar".to_string()],
        }];
        let mission = generate_seeded(&template, &library, 5).expect("mission");
        let skills: Vec<_> = mission.blue.groups[0].units.iter().map(|u| u.skill).collect();
        assert_eq!(skills, [Skill::Client, Skill::Client, Skill::High, Skill::High]);
    }

    #[test]
    fn flight_route_runs_from_takeoff_to_landing() {
        let library = library();
        let mut template = template();
        template.player_start = StartLocation::Runway;
        let mission = generate_seeded(&template, &library, 9).expect("mission");
        let route = &mission.blue.groups[0].route;
        let objectives = mission.briefing.objectives.len();
        assert_eq!(route.len(), objectives + 4);
        assert_eq!(route[0].kind, WaypointKind::TakeOffRunway);
        assert_eq!(route[0].airbase_id, Some(7));
        assert_eq!(route.last().unwrap().kind, WaypointKind::Land);
        assert!(route[1..route.len() - 1]
            .iter()
            .all(|wp| wp.kind == WaypointKind::TurningPoint));
    }

    #[test]
    fn carrier_flights_launch_from_the_carrier() {
        let library = library();
        let mut template = template();
        template.player_flight_groups[0].carrier = true;
        let mission = generate_seeded(&template, &library, 11).expect("mission");
        let ship = mission
            .blue
            .groups
            .iter()
            .find(|g| g.category == GroupCategory::Ship)
            .expect("carrier group");
        assert_eq!(ship.units[0].unit_type, "CVN_71");
        let flight = mission
            .blue
            .groups
            .iter()
            .find(|g| g.category == GroupCategory::Plane)
            .unwrap();
        assert_eq!(flight.route[0].linked_unit, Some(ship.units[0].id));
        assert_eq!(flight.route.last().unwrap().linked_unit, Some(ship.units[0].id));
    }

    #[test]
    fn carrier_flight_needs_capable_aircraft_and_coalition_carrier() {
        let library = library();
        let mut template = template();
        template.player_flight_groups[0].aircraft = "A-10C_2".to_string();
        template.player_flight_groups[0].carrier = true;
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(matches!(err, GenerationError::MissingAsset { .. }), "{err}");

        let mut template = super::test_support::template();
        template.coalition_blue = "militia".to_string();
        template.player_flight_groups[0].carrier = true;
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(err.to_string().contains("militia"), "{err}");
    }

    #[test]
    fn impossible_distance_band_exhausts_placement() {
        let library = library();
        let mut template = template();
        template.objective_distance_nm = forge_core::BoundedRange::new(200, 300);
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(matches!(err, GenerationError::PlacementExhausted { .. }));
        assert!(err.to_string().contains("objective 1"), "{err}");
    }

    #[test]
    fn cas_places_friendly_armor_away_from_enemies() {
        let library = library();
        let mut template = template();
        template.objective_kind = ObjectiveKind::Cas;
        let mission = generate_seeded(&template, &library, 21).expect("mission");
        let friendly: Vec<_> = mission
            .blue
            .groups
            .iter()
            .filter(|g| g.category == GroupCategory::Vehicle)
            .collect();
        assert_eq!(friendly.len(), mission.zones.len());
        for group in friendly {
            for enemy in &mission.red.groups {
                let d = group.route[0].position.distance_to(&enemy.route[0].position);
                assert!(d >= nm(1.0));
            }
        }
    }

    #[test]
    fn sead_targets_need_a_sam_roster() {
        let library = library();
        let mut template = template();
        template.objective_kind = ObjectiveKind::Sead;
        template.coalition_red = "militia".to_string();
        let err = generate_seeded(&template, &library, 1).unwrap_err();
        assert!(err.to_string().contains("militia/sam"), "{err}");
    }

    #[test]
    fn completion_trigger_watches_every_target_group() {
        let library = library();
        let mission = generate_seeded(&template(), &library, 13).expect("mission");
        let complete = mission
            .triggers
            .iter()
            .find(|t| matches!(t.condition, TriggerCondition::GroupsDead { .. }))
            .expect("completion trigger");
        let TriggerCondition::GroupsDead { groups } = &complete.condition else {
            unreachable!()
        };
        assert_eq!(groups.len(), mission.zones.len());
        for id in groups {
            assert!(mission.red.groups.iter().any(|g| g.id == *id));
        }
        assert!(complete
            .actions
            .iter()
            .any(|a| matches!(a, TriggerAction::EndMission { winner: Side::Blue })));
    }

    #[test]
    fn ids_are_unique_across_the_mission() {
        let library = library();
        let mut template = template();
        template.objective_count = forge_core::BoundedRange::fixed(3);
        template.enemy_air_defense = forge_core::BoundedRange::fixed(2);
        let mission = generate_seeded(&template, &library, 17).expect("mission");
        let mut group_ids: Vec<_> = mission.groups().map(|g| g.id).collect();
        let mut unit_ids: Vec<_> = mission
            .groups()
            .flat_map(|g| g.units.iter().map(|u| u.id))
            .collect();
        let groups = group_ids.len();
        let units = unit_ids.len();
        group_ids.sort_unstable();
        group_ids.dedup();
        unit_ids.sort_unstable();
        unit_ids.dedup();
        assert_eq!(group_ids.len(), groups);
        assert_eq!(unit_ids.len(), units);
    }

    #[test]
    fn red_player_side_swaps_rosters() {
        let library = library();
        let mut template = template();
        template.player_coalition = forge_template::SideChoice::Red;
        template.player_flight_groups = vec![PlayerFlightGroupTemplate {
            aircraft: "Su-25T".to_string(),
            count: 2,
            carrier: false,
            players: vec!["Ivan".to_string()],
        }];
        let mission = generate_seeded(&template, &library, 2).expect("mission");
        assert_eq!(mission.player_side, Side::Red);
        assert_eq!(mission.red.name, "RUSSIA");
        assert!(mission.red.groups[0].has_players());
        assert_eq!(
            mission.red.groups[0].units[0].callsign,
            Some(forge_mission::Callsign::Numeric { value: 101 })
        );
    }
}
