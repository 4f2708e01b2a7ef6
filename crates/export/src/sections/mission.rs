//! The `mission` section: coalitions, groups, routes, weather and triggers.

use chrono::Datelike;
use forge_core::Side;
use forge_mission::{
    Callsign, CoalitionRoster, Group, GroupCategory, Mission, Precipitation, Trigger,
    TriggerAction, TriggerCondition, Unit, Waypoint, WaypointKind, Weather, Wind,
};

use crate::dictionary::DictionaryBuilder;
use crate::lua::LuaTable;

/// Mission file format version written by the current editor.
const FORMAT_VERSION: i64 = 21;
const MAP_ZOOM: f64 = 1_000_000.0;

/// Build the mission table; display text is stored in `dict` and referenced by key.
pub fn mission_table(
    mission: &Mission,
    dict: &mut DictionaryBuilder,
    briefing_images: &[String],
) -> LuaTable {
    let briefing = &mission.briefing;
    let mut situation = briefing.description.clone();
    if !briefing.remarks.is_empty() {
        situation.push_str("\n\n");
        situation.push_str(&briefing.remarks.join("\n"));
    }
    let mut task = briefing.objectives.join("\n");
    if !briefing.flights.is_empty() {
        task.push_str("\n\n");
        task.push_str(&briefing.flights.join("\n"));
    }

    let sortie = dict.add("sortie", briefing.name.as_str());
    let description = dict.add("descriptionText", situation);
    let (blue_text, red_text) = match mission.player_side {
        Side::Blue => (task, String::new()),
        Side::Red => (String::new(), task),
    };
    let blue_task = dict.add("descriptionBlueTask", blue_text);
    let red_task = dict.add("descriptionRedTask", red_text);
    let neutral_task = dict.add("descriptionNeutralsTask", "");

    let images = LuaTable::sequence(briefing_images.iter().map(String::as_str));
    let (images_blue, images_red) = match mission.player_side {
        Side::Blue => (images, LuaTable::new()),
        Side::Red => (LuaTable::new(), images),
    };

    let coalition = LuaTable::new()
        .with("blue", coalition_table(&mission.blue, dict))
        .with("red", coalition_table(&mission.red, dict))
        .with("neutrals", neutral_coalition());

    let (trig, trigrules) = triggers_tables(&mission.triggers, dict);

    let mut table = LuaTable::new()
        .with("requiredModules", LuaTable::new())
        .with(
            "date",
            LuaTable::new()
                .with("Day", mission.date.day())
                .with("Year", i64::from(mission.date.year()))
                .with("Month", mission.date.month()),
        )
        .with("trig", trig)
        .with("result", result_table())
        .with("goals", LuaTable::new())
        .with("weather", weather_table(&mission.weather))
        .with("theatre", mission.theater.dcs_name.as_str())
        .with("triggers", LuaTable::new().with("zones", zones_table(mission)))
        .with(
            "map",
            LuaTable::new()
                .with("centerY", mission.theater.center.y)
                .with("centerX", mission.theater.center.x)
                .with("zoom", MAP_ZOOM),
        )
        .with(
            "coalitions",
            LuaTable::new()
                .with("blue", LuaTable::sequence([mission.blue.country.id]))
                .with("red", LuaTable::sequence([mission.red.country.id]))
                .with("neutrals", LuaTable::new()),
        )
        .with("descriptionText", description)
        .with("descriptionBlueTask", blue_task)
        .with("descriptionRedTask", red_task)
        .with("descriptionNeutralsTask", neutral_task)
        .with("pictureFileNameB", images_blue)
        .with("pictureFileNameR", images_red)
        .with("pictureFileNameN", LuaTable::new())
        .with("trigrules", trigrules)
        .with("coalition", coalition)
        .with("sortie", sortie)
        .with("version", FORMAT_VERSION)
        .with("currentKey", 0)
        .with("start_time", mission.start_time_seconds)
        .with("forcedOptions", LuaTable::new())
        .with("failures", LuaTable::new());
    // every key is allocated by now
    table.set("maxDictId", dict.max_id());
    table
}

fn coalition_table(roster: &CoalitionRoster, dict: &mut DictionaryBuilder) -> LuaTable {
    let mut country = LuaTable::new()
        .with("id", roster.country.id)
        .with("name", roster.country.name.as_str());
    for (category, key) in [
        (GroupCategory::Plane, "plane"),
        (GroupCategory::Helicopter, "helicopter"),
        (GroupCategory::Vehicle, "vehicle"),
        (GroupCategory::Ship, "ship"),
    ] {
        let groups: Vec<&Group> = roster
            .groups
            .iter()
            .filter(|group| group.category == category)
            .collect();
        if groups.is_empty() {
            continue;
        }
        let mut list = LuaTable::new();
        for group in groups {
            list.push(group_table(group, dict));
        }
        country.set(key, LuaTable::new().with("group", list));
    }

    LuaTable::new()
        .with(
            "bullseye",
            LuaTable::new()
                .with("y", roster.bullseye.y)
                .with("x", roster.bullseye.x),
        )
        .with("nav_points", LuaTable::new())
        .with("name", roster.side.as_str())
        .with("country", LuaTable::sequence([country]))
}

fn neutral_coalition() -> LuaTable {
    LuaTable::new()
        .with("bullseye", LuaTable::new().with("y", 0.0).with("x", 0.0))
        .with("nav_points", LuaTable::new())
        .with("name", "neutrals")
        .with("country", LuaTable::new())
}

fn is_aircraft(category: GroupCategory) -> bool {
    matches!(category, GroupCategory::Plane | GroupCategory::Helicopter)
}

fn group_table(group: &Group, dict: &mut DictionaryBuilder) -> LuaTable {
    let aircraft = is_aircraft(group.category);
    let name = dict.add("GroupName", group.name.as_str());
    let mut units = LuaTable::new();
    for unit in &group.units {
        units.push(unit_table(unit, group.category, dict));
    }
    let mut points = LuaTable::new();
    for (idx, waypoint) in group.route.iter().enumerate() {
        points.push(waypoint_table(waypoint, idx == 0, aircraft, dict));
    }
    let anchor = group
        .units
        .first()
        .map(|unit| unit.position)
        .or_else(|| group.route.first().map(|wp| wp.position))
        .unwrap_or_default();

    let mut table = LuaTable::new()
        .with("groupId", group.id)
        .with("name", name)
        .with("task", group.task.as_str())
        .with("tasks", LuaTable::new())
        .with("hidden", false)
        .with("start_time", 0)
        .with("x", anchor.x)
        .with("y", anchor.y)
        .with("units", units)
        .with("route", LuaTable::new().with("points", points));
    if aircraft {
        table
            .set("uncontrolled", group.uncontrolled)
            .set("communication", true)
            .set("modulation", 0)
            .set("frequency", group.frequency_mhz.unwrap_or(251.0));
    } else {
        table.set("visible", false);
    }
    table
}

fn unit_table(unit: &Unit, category: GroupCategory, dict: &mut DictionaryBuilder) -> LuaTable {
    let name = dict.add("UnitName", unit.name.as_str());
    let mut table = LuaTable::new()
        .with("type", unit.unit_type.as_str())
        .with("unitId", unit.id)
        .with("skill", unit.skill.as_str())
        .with("x", unit.position.x)
        .with("y", unit.position.y)
        .with("name", name)
        .with("heading", unit.heading_rad);
    match category {
        GroupCategory::Plane | GroupCategory::Helicopter => {
            table
                .set("alt", unit.altitude_m)
                .set("alt_type", "BARO")
                .set("speed", 0.0)
                .set("psi", -unit.heading_rad)
                .set("payload", LuaTable::new().with("pylons", LuaTable::new()));
            if let Some(callsign) = &unit.callsign {
                table.set("callsign", callsign_value(callsign));
            }
            if let Some(number) = &unit.onboard_number {
                table.set("onboard_num", number.as_str());
            }
            if let Some(livery) = &unit.livery {
                table.set("livery_id", livery.as_str());
            }
        }
        GroupCategory::Vehicle => {
            table.set("playerCanDrive", false);
        }
        GroupCategory::Ship => {
            table.set(
                "transportable",
                LuaTable::new().with("randomTransportable", false),
            );
        }
    }
    table
}

fn callsign_value(callsign: &Callsign) -> crate::lua::LuaValue {
    match callsign {
        Callsign::Named {
            name,
            family,
            flight,
            element,
        } => {
            let mut table = LuaTable::new();
            table
                .push(*family)
                .push(*flight)
                .push(*element)
                .set("name", format!("{name}{flight}{element}"));
            table.into()
        }
        Callsign::Numeric { value } => (*value).into(),
    }
}

/// Editor `type` and `action` strings for a waypoint kind.
fn waypoint_kind(kind: WaypointKind, aircraft: bool) -> (&'static str, &'static str) {
    match kind {
        WaypointKind::TakeOffRunway => ("TakeOff", "From Runway"),
        WaypointKind::TakeOffParkingHot => ("TakeOffParkingHot", "From Parking Area Hot"),
        WaypointKind::TakeOffParking => ("TakeOffParking", "From Parking Area"),
        WaypointKind::TurningPoint if aircraft => ("Turning Point", "Turning Point"),
        WaypointKind::TurningPoint => ("Turning Point", "Off Road"),
        WaypointKind::Land => ("Land", "Landing"),
    }
}

fn waypoint_table(
    waypoint: &Waypoint,
    first: bool,
    aircraft: bool,
    dict: &mut DictionaryBuilder,
) -> LuaTable {
    let (kind, action) = waypoint_kind(waypoint.kind, aircraft);
    let name = if waypoint.name.is_empty() {
        String::new()
    } else {
        dict.add("WptName", waypoint.name.as_str())
    };
    let mut table = LuaTable::new()
        .with("alt", waypoint.altitude_m)
        .with("type", kind)
        .with("action", action)
        .with("alt_type", "BARO")
        .with("formation_template", "")
        .with("ETA", 0.0)
        .with("ETA_locked", first)
        .with("y", waypoint.position.y)
        .with("x", waypoint.position.x)
        .with("name", name)
        .with("speed", waypoint.speed_mps)
        .with("speed_locked", true)
        .with(
            "task",
            LuaTable::new().with("id", "ComboTask").with(
                "params",
                LuaTable::new().with("tasks", LuaTable::new()),
            ),
        );
    if let Some(id) = waypoint.airbase_id {
        table.set("airdromeId", id);
    }
    if let Some(unit) = waypoint.linked_unit {
        table.set("linkUnit", unit).set("helipadId", unit);
    }
    table
}

fn wind_table(wind: &Wind) -> LuaTable {
    LuaTable::new()
        .with("speed", wind.speed_mps)
        .with("dir", wind.direction_deg)
}

fn weather_table(weather: &Weather) -> LuaTable {
    let precipitation = match weather.precipitation {
        Precipitation::None => 0,
        Precipitation::Rain => 1,
        Precipitation::Thunderstorm => 2,
    };
    LuaTable::new()
        .with("atmosphere_type", 0)
        .with(
            "wind",
            LuaTable::new()
                .with("at8000", wind_table(&weather.wind_8000))
                .with("at2000", wind_table(&weather.wind_2000))
                .with("atGround", wind_table(&weather.wind_ground)),
        )
        .with("enable_fog", false)
        .with("season", LuaTable::new().with("temperature", weather.temperature_c))
        .with("type_weather", 0)
        .with("qnh", weather.qnh_mmhg)
        .with("cyclones", LuaTable::new())
        .with("name", "Generated")
        .with(
            "fog",
            LuaTable::new().with("thickness", 0).with("visibility", 0),
        )
        .with("groundTurbulence", weather.turbulence_mps)
        .with("dust_density", 0)
        .with("enable_dust", false)
        .with(
            "visibility",
            LuaTable::new().with("distance", weather.visibility_m),
        )
        .with(
            "clouds",
            LuaTable::new()
                .with("thickness", weather.cloud_thickness_m)
                .with("density", weather.cloud_density)
                .with("base", weather.cloud_base_m)
                .with("iprecptns", precipitation),
        )
}

fn zones_table(mission: &Mission) -> LuaTable {
    let mut zones = LuaTable::new();
    for zone in &mission.zones {
        zones.push(
            LuaTable::new()
                .with("x", zone.position.x)
                .with("y", zone.position.y)
                .with("radius", zone.radius_m)
                .with("zoneId", zone.id)
                .with("name", zone.name.as_str())
                .with("hidden", false)
                .with("type", 0)
                .with("properties", LuaTable::new())
                .with("color", LuaTable::sequence([1.0, 1.0, 1.0, 0.15])),
        );
    }
    zones
}

fn result_table() -> LuaTable {
    let empty = || {
        LuaTable::new()
            .with("conditions", LuaTable::new())
            .with("actions", LuaTable::new())
            .with("func", LuaTable::new())
    };
    LuaTable::new()
        .with("offline", empty())
        .with("total", 0)
        .with("blue", empty())
        .with("red", empty())
}

/// Runtime `trig` table and the editor's `trigrules` for the same triggers.
fn triggers_tables(triggers: &[Trigger], dict: &mut DictionaryBuilder) -> (LuaTable, LuaTable) {
    let mut conditions = LuaTable::new();
    let mut actions = LuaTable::new();
    let mut funcs = LuaTable::new();
    let mut flags = LuaTable::new();
    let mut rules = LuaTable::new();

    for (idx, trigger) in triggers.iter().enumerate() {
        let n = idx + 1;
        let (condition_code, condition_rules) = condition(&trigger.condition);
        let mut action_code = String::new();
        let mut action_rules = LuaTable::new();
        for action in &trigger.actions {
            match action {
                TriggerAction::Message { text, seconds } => {
                    let key = dict.add("ActionText", text.as_str());
                    action_code.push_str(&format!(
                        "a_out_text_delay(getValueDictByKey(\"{key}\"), {seconds}, false, 0);"
                    ));
                    action_rules.push(
                        LuaTable::new()
                            .with("predicate", "a_out_text_delay")
                            .with("text", key)
                            .with("seconds", *seconds)
                            .with("clearview", false)
                            .with("delay", 0),
                    );
                }
                TriggerAction::EndMission { winner } => {
                    action_code.push_str(&format!(
                        "a_end_mission(\"{}\", \"\", 0);",
                        winner.as_str()
                    ));
                    action_rules.push(
                        LuaTable::new()
                            .with("predicate", "a_end_mission")
                            .with("winner", winner.as_str())
                            .with("text", "")
                            .with("delay", 0),
                    );
                }
            }
        }
        action_code.push_str(&format!(" mission.trig.func[{n}]=nil;"));

        conditions.push(condition_code);
        actions.push(action_code);
        funcs.push(format!(
            "if mission.trig.conditions[{n}]() then mission.trig.actions[{n}]() end"
        ));
        flags.push(true);
        rules.push(
            LuaTable::new()
                .with("rules", condition_rules)
                .with("comment", trigger.name.as_str())
                .with("eventlist", "")
                .with("actions", action_rules)
                .with("predicate", "triggerOnce"),
        );
    }

    let trig = LuaTable::new()
        .with("actions", actions)
        .with("events", LuaTable::new())
        .with("custom", LuaTable::new())
        .with("func", funcs)
        .with("flag", flags)
        .with("conditions", conditions)
        .with("customStartup", LuaTable::new())
        .with("funcStartup", LuaTable::new());
    (trig, rules)
}

fn condition(condition: &TriggerCondition) -> (String, LuaTable) {
    match condition {
        TriggerCondition::TimeMoreThan { seconds } => (
            format!("return(c_time_after({seconds}) )"),
            LuaTable::sequence([LuaTable::new()
                .with("predicate", "c_time_after")
                .with("seconds", *seconds)]),
        ),
        TriggerCondition::GroupsDead { groups } if groups.is_empty() => {
            ("return(false)".to_string(), LuaTable::new())
        }
        TriggerCondition::GroupsDead { groups } => {
            let code = groups
                .iter()
                .map(|id| format!("c_group_dead({id})"))
                .collect::<Vec<_>>()
                .join(" and ");
            let rules = LuaTable::sequence(groups.iter().map(|id| {
                LuaTable::new()
                    .with("predicate", "c_group_dead")
                    .with("group", *id)
            }));
            (format!("return({code} )"), rules)
        }
    }
}
