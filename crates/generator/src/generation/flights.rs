//! Player flight groups and the carrier they may launch from.

use forge_config::GeneratorSettings;
use forge_core::coords::Coordinates;
use forge_core::units::{ft_to_m, kts_to_mps, nm_to_m};
use forge_mission::{Callsign, Group, GroupCategory, Skill, Unit, Waypoint, WaypointKind};
use forge_template::{MissionTemplate, StartLocation};

use super::Ids;
use super::assets::{Assets, CarrierAssets};
use super::placement::ObjectiveSite;
use super::resolve::ResolvedParameters;

const SHIP_SPEED_MPS: f64 = 13.0;
const SHIP_LEG_NM: f64 = 20.0;
/// Lateral gap between aircraft parked in one flight.
const PARKING_SPACING_M: f64 = 30.0;
/// Gap between consecutive flights on the ramp.
const FLIGHT_SPACING_M: f64 = 150.0;
const FIRST_ONBOARD_NUMBER: u32 = 10;
/// Frequency step between consecutive player flights.
const FREQUENCY_STEP_MHZ: f64 = 1.0;

/// The carrier group and the unit id flights attach their takeoff and landing to.
#[derive(Debug, Clone)]
pub struct CarrierGroup {
    pub group: Group,
    pub unit_id: u32,
}

pub fn carrier_group(
    carrier: &CarrierAssets<'_>,
    params: &ResolvedParameters,
    ids: &mut Ids,
) -> CarrierGroup {
    let id = ids.group();
    let unit_id = ids.unit();
    let heading = carrier.station.heading_deg.to_radians();
    let start = carrier.station.position;
    let name = format!("{} Group", carrier.station.name);
    let unit = Unit {
        id: unit_id,
        name: format!("{name} 1"),
        unit_type: carrier.unit_type.to_string(),
        skill: params.ai_skill,
        position: start,
        altitude_m: 0.0,
        heading_rad: heading,
        callsign: None,
        onboard_number: None,
        player_name: None,
        livery: None,
    };
    let waypoint = |position: Coordinates| Waypoint {
        kind: WaypointKind::TurningPoint,
        name: String::new(),
        position,
        altitude_m: 0.0,
        speed_mps: SHIP_SPEED_MPS,
        airbase_id: None,
        linked_unit: None,
    };
    let group = Group {
        id,
        name,
        category: GroupCategory::Ship,
        task: "Ground Nothing".to_string(),
        units: vec![unit],
        route: vec![
            waypoint(start),
            waypoint(start.offset(heading, nm_to_m(SHIP_LEG_NM))),
        ],
        frequency_mhz: None,
        uncontrolled: false,
    };
    CarrierGroup { group, unit_id }
}

/// Where a flight starts and lands.
struct Base {
    position: Coordinates,
    elevation_m: f64,
    heading_rad: f64,
    airbase_id: Option<u32>,
    linked_unit: Option<u32>,
}

pub fn player_flights(
    template: &MissionTemplate,
    params: &ResolvedParameters,
    assets: &Assets<'_>,
    sites: &[ObjectiveSite],
    carrier: Option<&CarrierGroup>,
    settings: &GeneratorSettings,
    ids: &mut Ids,
) -> Vec<Group> {
    let single_player = template.total_players() == 1;
    let mut onboard = FIRST_ONBOARD_NUMBER;
    let mut groups = Vec::with_capacity(template.player_flight_groups.len());

    for (idx, (fg, aircraft)) in template
        .player_flight_groups
        .iter()
        .zip(&assets.aircraft)
        .enumerate()
    {
        let base = match (fg.carrier, carrier, assets.airbase) {
            (true, Some(carrier), _) => Base {
                position: carrier.group.units[0].position,
                elevation_m: 0.0,
                heading_rad: carrier.group.units[0].heading_rad,
                airbase_id: None,
                linked_unit: Some(carrier.unit_id),
            },
            (_, _, Some(airbase)) => Base {
                position: airbase.position,
                elevation_m: airbase.elevation_m,
                heading_rad: airbase.runway_heading_deg.to_radians(),
                airbase_id: Some(airbase.id),
                linked_unit: None,
            },
            _ => Base {
                position: assets.home_position(),
                elevation_m: 0.0,
                heading_rad: 0.0,
                airbase_id: None,
                linked_unit: None,
            },
        };

        let group_id = ids.group();
        let group_name = flight_name(&aircraft.callsigns, idx);
        let named: Vec<&str> = fg.player_names().collect();
        let ramp_origin = base
            .position
            .offset(base.heading_rad + std::f64::consts::FRAC_PI_2, idx as f64 * FLIGHT_SPACING_M);

        let units = (0..fg.count as usize)
            .map(|seat| {
                let (skill, player_name) = match named.get(seat) {
                    Some(name) if single_player => (Skill::Player, Some(name.to_string())),
                    Some(name) => (Skill::Client, Some(name.to_string())),
                    None => (params.ai_skill, None),
                };
                let callsign = unit_callsign(&aircraft.callsigns, idx, seat);
                let unit = Unit {
                    id: ids.unit(),
                    name: format!("{group_name}-{}", seat + 1),
                    unit_type: aircraft.id.clone(),
                    skill,
                    position: ramp_origin.offset(base.heading_rad, -(seat as f64) * PARKING_SPACING_M),
                    altitude_m: base.elevation_m,
                    heading_rad: base.heading_rad,
                    callsign: Some(callsign),
                    onboard_number: Some(format!("{onboard:03}")),
                    player_name,
                    livery: aircraft.livery.clone(),
                };
                onboard += 1;
                unit
            })
            .collect();

        let route = flight_route(
            template.player_start,
            &base,
            sites,
            ft_to_m(aircraft.cruise_altitude_ft),
            kts_to_mps(aircraft.cruise_speed_kts),
            settings,
        );

        groups.push(Group {
            id: group_id,
            name: group_name,
            category: GroupCategory::Plane,
            task: aircraft.task.clone(),
            units,
            route,
            frequency_mhz: Some(aircraft.radio_mhz + idx as f64 * FREQUENCY_STEP_MHZ),
            uncontrolled: false,
        });
    }
    groups
}

/// Group label: `Enfield 1` for named families, `Flight 100` for numeric ones.
fn flight_name(callsigns: &[String], idx: usize) -> String {
    if callsigns.is_empty() {
        format!("Flight {}", (idx + 1) * 100)
    } else {
        let flight = idx / callsigns.len() + 1;
        format!("{} {flight}", callsigns[idx % callsigns.len()])
    }
}

fn unit_callsign(callsigns: &[String], idx: usize, seat: usize) -> Callsign {
    if callsigns.is_empty() {
        Callsign::Numeric {
            value: ((idx + 1) * 100 + seat + 1) as u32,
        }
    } else {
        Callsign::Named {
            name: callsigns[idx % callsigns.len()].clone(),
            family: (idx % callsigns.len() + 1) as u32,
            flight: (idx / callsigns.len() + 1) as u32,
            element: (seat + 1) as u32,
        }
    }
}

/// Takeoff, ingress, each objective, egress, landing.
fn flight_route(
    start: StartLocation,
    base: &Base,
    sites: &[ObjectiveSite],
    cruise_altitude_m: f64,
    cruise_speed_mps: f64,
    settings: &GeneratorSettings,
) -> Vec<Waypoint> {
    let turn = |name: String, position: Coordinates| Waypoint {
        kind: WaypointKind::TurningPoint,
        name,
        position,
        altitude_m: cruise_altitude_m,
        speed_mps: cruise_speed_mps,
        airbase_id: None,
        linked_unit: None,
    };
    let takeoff_kind = match start {
        StartLocation::Runway => WaypointKind::TakeOffRunway,
        StartLocation::ParkingHot => WaypointKind::TakeOffParkingHot,
        StartLocation::ParkingCold => WaypointKind::TakeOffParking,
    };

    let mut route = vec![Waypoint {
        kind: takeoff_kind,
        name: "Takeoff".to_string(),
        position: base.position,
        altitude_m: base.elevation_m,
        speed_mps: 0.0,
        airbase_id: base.airbase_id,
        linked_unit: base.linked_unit,
    }];

    let first = sites.first().map_or(base.position, |site| site.position);
    route.push(turn(
        "Ingress".to_string(),
        base.position.lerp(&first, settings.ingress_fraction),
    ));
    for site in sites {
        route.push(turn(site.name.clone(), site.position));
    }
    let last = sites.last().map_or(base.position, |site| site.position);
    // swing off the target line so the return leg does not retrace the ingress
    let egress_heading = last.heading_to(&base.position) + 0.5;
    route.push(turn(
        "Egress".to_string(),
        last.offset(egress_heading, nm_to_m(settings.egress_distance_nm)),
    ));
    route.push(Waypoint {
        kind: WaypointKind::Land,
        name: "Landing".to_string(),
        position: base.position,
        altitude_m: base.elevation_m,
        speed_mps: 0.0,
        airbase_id: base.airbase_id,
        linked_unit: base.linked_unit,
    });
    route
}
