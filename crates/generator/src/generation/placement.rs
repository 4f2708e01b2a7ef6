//! Objective zones and the ground groups placed around them.
//!
//! Every random pick spends one attempt from `placement_attempts`. A zone is
//! claimed by a single coalition; enemy groups keep `min_enemy_distance_nm`
//! from the player home base and friendly groups keep a nautical mile from
//! every enemy group.

use std::f64::consts::TAU;

use forge_config::{CoalitionConfig, GeneratorSettings, UnitFamily, ZoneConfig};
use forge_core::coords::Coordinates;
use forge_core::units::nm_to_m;
use forge_mission::{Group, GroupCategory, Skill, Unit, Waypoint, WaypointKind};
use forge_template::ObjectiveKind;
use log::debug;
use rand::Rng;

use super::assets::Assets;
use super::resolve::ResolvedParameters;
use super::{GenerationError, Ids};

const GROUND_TASK: &str = "Ground Nothing";
/// Vehicles per row in a ground formation.
const FORMATION_WIDTH: usize = 4;

/// A claimed objective zone and the enemy group that must be destroyed there.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveSite {
    pub name: String,
    pub position: Coordinates,
    pub radius_m: f64,
    pub target_group: u32,
    pub target_units: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GroundForces {
    pub sites: Vec<ObjectiveSite>,
    pub enemy_groups: Vec<Group>,
    pub friendly_groups: Vec<Group>,
}

/// Unit family an objective kind is built from.
pub fn target_family(kind: ObjectiveKind) -> UnitFamily {
    match kind {
        ObjectiveKind::Strike => UnitFamily::Logistics,
        ObjectiveKind::Cas => UnitFamily::Armor,
        ObjectiveKind::Sead => UnitFamily::Sam,
    }
}

fn roster<'a>(
    coalition: &'a CoalitionConfig,
    family: UnitFamily,
) -> Result<&'a [String], GenerationError> {
    let units = coalition.units(family);
    if units.is_empty() {
        return Err(GenerationError::missing(
            "unit family",
            format!("{}/{}", coalition.id, family.label()),
        ));
    }
    Ok(units)
}

pub fn place_ground_forces<R: Rng + ?Sized>(
    kind: ObjectiveKind,
    params: &ResolvedParameters,
    assets: &Assets<'_>,
    settings: &GeneratorSettings,
    ids: &mut Ids,
    rng: &mut R,
) -> Result<GroundForces, GenerationError> {
    let home = assets.home_position();
    let target_types = roster(assets.enemy, target_family(kind))?;
    let air_defense_types: &[String] = if params.air_defense_groups > 0 {
        roster(assets.enemy, UnitFamily::AirDefense)?
    } else {
        &[]
    };
    let friendly_types: &[String] = if kind == ObjectiveKind::Cas {
        roster(assets.player, UnitFamily::Armor)?
    } else {
        &[]
    };

    let zones = pick_objective_zones(params, assets, settings, rng)?;
    let mut forces = GroundForces::default();
    for zone in &zones {
        let heading = rng.gen_range(0.0..TAU);
        let group = ground_group(
            ids,
            format!("{} Targets", zone.name),
            target_types,
            params.target_count as usize,
            zone.position,
            heading,
            settings.unit_spacing_m,
            params.ai_skill,
            rng,
        );
        forces.sites.push(ObjectiveSite {
            name: zone.name.clone(),
            position: zone.position,
            radius_m: settings.objective_zone_radius_m,
            target_group: group.id,
            target_units: group.units.len(),
        });
        forces.enemy_groups.push(group);
    }

    let min_enemy_distance = nm_to_m(settings.min_enemy_distance_nm);
    for site in &forces.sites {
        for n in 1..=params.air_defense_groups {
            let what = format!("air defense group {n} for {}", site.name);
            let position = with_attempts(&what, settings.placement_attempts, rng, |rng| {
                let heading = rng.gen_range(0.0..TAU);
                let distance = nm_to_m(settings.air_defense_offset_nm.sample(rng).max(0) as f64);
                let candidate = site.position.offset(heading, distance);
                (candidate.distance_to(&home) >= min_enemy_distance).then_some(candidate)
            })?;
            let count = rng.gen_range(1..=2);
            let heading = rng.gen_range(0.0..TAU);
            let group = ground_group(
                ids,
                format!("{} Air Defense {n}", site.name),
                air_defense_types,
                count,
                position,
                heading,
                settings.unit_spacing_m,
                params.ai_skill,
                rng,
            );
            forces.enemy_groups.push(group);
        }
    }

    if kind == ObjectiveKind::Cas {
        let enemy_positions: Vec<Coordinates> = forces
            .enemy_groups
            .iter()
            .filter_map(|group| group.route.first().map(|wp| wp.position))
            .collect();
        let clearance = nm_to_m(1.0);
        for site in &forces.sites {
            let what = format!("friendly ground group near {}", site.name);
            let toward_home = site.position.heading_to(&home);
            let position = with_attempts(&what, settings.placement_attempts, rng, |rng| {
                let heading = toward_home + rng.gen_range(-0.6..=0.6);
                let distance = nm_to_m(settings.friendly_offset_nm.sample(rng).max(0) as f64);
                let candidate = site.position.offset(heading, distance);
                enemy_positions
                    .iter()
                    .all(|enemy| enemy.distance_to(&candidate) >= clearance)
                    .then_some(candidate)
            })?;
            let group = ground_group(
                ids,
                format!("{} Friendly Armor", site.name),
                friendly_types,
                params.target_count as usize,
                position,
                position.heading_to(&site.position),
                settings.unit_spacing_m,
                params.ai_skill,
                rng,
            );
            forces.friendly_groups.push(group);
        }
    }

    debug!(
        "placed {} objective(s), {} enemy and {} friendly ground group(s)",
        forces.sites.len(),
        forces.enemy_groups.len(),
        forces.friendly_groups.len()
    );
    Ok(forces)
}

/// Claim `objective_count` distinct land zones inside the distance band.
fn pick_objective_zones<'a, R: Rng + ?Sized>(
    params: &ResolvedParameters,
    assets: &Assets<'a>,
    settings: &GeneratorSettings,
    rng: &mut R,
) -> Result<Vec<&'a ZoneConfig>, GenerationError> {
    let home = assets.home_position();
    let (near, far) = params.objective_distance_m;
    let min_enemy_distance = nm_to_m(settings.min_enemy_distance_nm);
    let separation = nm_to_m(settings.min_objective_separation_nm);

    let mut candidates: Vec<&ZoneConfig> = assets
        .theater
        .zones
        .iter()
        .filter(|zone| {
            let distance = zone.position.distance_to(&home);
            distance >= near && distance <= far && distance >= min_enemy_distance
        })
        .collect();
    debug!(
        "{} candidate objective zone(s) between {:.0} and {:.0} m of {}",
        candidates.len(),
        near,
        far,
        assets.home_name()
    );

    let mut claimed: Vec<&ZoneConfig> = Vec::new();
    for n in 1..=params.objective_count {
        let what = format!("objective {n}");
        let idx = with_attempts(&what, settings.placement_attempts, rng, |rng| {
            if candidates.is_empty() {
                return None;
            }
            let idx = rng.gen_range(0..candidates.len());
            let zone = candidates[idx];
            claimed
                .iter()
                .all(|other| other.position.distance_to(&zone.position) >= separation)
                .then_some(idx)
        })?;
        claimed.push(candidates.swap_remove(idx));
    }
    Ok(claimed)
}

/// Run `pick` until it yields a value or the attempt budget is spent.
fn with_attempts<T, R, F>(
    what: &str,
    attempts: u32,
    rng: &mut R,
    mut pick: F,
) -> Result<T, GenerationError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Option<T>,
{
    for attempt in 1..=attempts {
        if let Some(value) = pick(rng) {
            debug!("placed {what} on attempt {attempt}");
            return Ok(value);
        }
    }
    Err(GenerationError::PlacementExhausted {
        what: what.to_string(),
        attempts,
    })
}

/// A stationary vehicle group laid out in rows around `center`.
#[allow(clippy::too_many_arguments)]
fn ground_group<R: Rng + ?Sized>(
    ids: &mut Ids,
    name: String,
    unit_types: &[String],
    count: usize,
    center: Coordinates,
    heading: f64,
    spacing_m: f64,
    skill: Skill,
    rng: &mut R,
) -> Group {
    let id = ids.group();
    let rows = count.div_ceil(FORMATION_WIDTH);
    let units = (0..count)
        .map(|k| {
            let row = (k / FORMATION_WIDTH) as f64 - (rows as f64 - 1.0) / 2.0;
            let col = (k % FORMATION_WIDTH) as f64 - (FORMATION_WIDTH as f64 - 1.0) / 2.0;
            let position = center
                .offset(heading, -row * spacing_m)
                .offset(heading + TAU / 4.0, col * spacing_m);
            Unit {
                id: ids.unit(),
                name: format!("{name} {}", k + 1),
                unit_type: unit_types[rng.gen_range(0..unit_types.len())].clone(),
                skill,
                position,
                altitude_m: 0.0,
                heading_rad: heading,
                callsign: None,
                onboard_number: None,
                player_name: None,
                livery: None,
            }
        })
        .collect();
    Group {
        id,
        route: vec![Waypoint {
            kind: WaypointKind::TurningPoint,
            name: String::new(),
            position: center,
            altitude_m: 0.0,
            speed_mps: 0.0,
            airbase_id: None,
            linked_unit: None,
        }],
        name,
        category: GroupCategory::Vehicle,
        task: GROUND_TASK.to_string(),
        units,
        frequency_mhz: None,
        uncontrolled: false,
    }
}
