//! Briefing text and its standalone HTML page.

use std::fmt::Write as _;

use forge_core::time::format_clock;
use forge_core::units::{m_to_nm, mps_to_kts};
use forge_mission::{Briefing, Group, Precipitation, Weather};
use forge_template::{Choice, MissionTemplate, ObjectiveKind};
use rand::Rng;

use super::assets::Assets;
use super::placement::ObjectiveSite;
use super::resolve::ResolvedParameters;

const ADJECTIVES: &[&str] = &[
    "Amber", "Black", "Broken", "Burning", "Crimson", "Distant", "Fallen", "Frozen", "Golden",
    "Hidden", "Iron", "Lonely", "Northern", "Quiet", "Restless", "Rolling", "Silent", "Silver",
    "Steel", "Swift",
];

const NOUNS: &[&str] = &[
    "Anvil", "Arrow", "Badger", "Citadel", "Falcon", "Hammer", "Harvest", "Horizon", "Lance",
    "Mantis", "Meadow", "Rampart", "Sabre", "Sentinel", "Spear", "Tempest", "Thunder", "Trident",
    "Viper", "Warden",
];

pub(crate) fn build<R: Rng + ?Sized>(
    template: &MissionTemplate,
    params: &ResolvedParameters,
    assets: &Assets<'_>,
    sites: &[ObjectiveSite],
    flights: &[Group],
    weather: &Weather,
    rng: &mut R,
) -> Briefing {
    let name = match template.briefing_name.trim() {
        "" => operation_name(rng),
        custom => custom.to_string(),
    };
    let home = assets.home_position();
    let home_name = assets.home_name();

    let description = format!(
        "{} aircraft operating from {home_name} are tasked with {} at {} location(s) held by {} forces in {}.",
        assets.player.name,
        task_phrase(template.objective_kind),
        sites.len(),
        assets.enemy.name,
        assets.theater.name,
    );

    let objectives = sites
        .iter()
        .map(|site| {
            let bearing = home.heading_to(&site.position).to_degrees().round() as u32 % 360;
            let range = m_to_nm(home.distance_to(&site.position)).round();
            format!(
                "{} at {} ({bearing:03}° / {range} nm from {home_name}), {} target(s)",
                objective_verb(template.objective_kind),
                site.name,
                site.target_units
            )
        })
        .collect();

    let flight_lines = flights
        .iter()
        .zip(&assets.aircraft)
        .map(|(group, aircraft)| {
            let frequency = group
                .frequency_mhz
                .map(|f| format!(", {f:.3} MHz"))
                .unwrap_or_default();
            format!(
                "{}: {}x {}{frequency}",
                group.name,
                group.units.len(),
                aircraft.name
            )
        })
        .collect();

    let remarks = vec![
        format!("Date: {}", params.date.format("%-d %B %Y")),
        format!(
            "Start time: {} ({})",
            format_clock(params.start_time_seconds),
            params.time_of_day.as_str()
        ),
        format!(
            "Weather: {}, {:.0} °C, QNH {:.0} mmHg, visibility {:.0} km",
            describe_sky(weather),
            weather.temperature_c,
            weather.qnh_mmhg,
            weather.visibility_m / 1_000.0
        ),
        format!(
            "Wind: {:.0} kts from {:03.0}°",
            mps_to_kts(weather.wind_ground.speed_mps),
            weather.wind_ground.direction_deg
        ),
        format!("Player flights: {}", template.player_summary()),
    ];

    let mut briefing = Briefing {
        name,
        description,
        objectives,
        flights: flight_lines,
        remarks,
        html: String::new(),
    };
    briefing.html = render_html(&briefing);
    briefing
}

fn operation_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    format!("Operation {adjective} {noun}")
}

fn task_phrase(kind: ObjectiveKind) -> &'static str {
    match kind {
        ObjectiveKind::Strike => "striking supply and logistics targets",
        ObjectiveKind::Cas => "providing close air support to friendly ground forces",
        ObjectiveKind::Sead => "suppressing enemy air defenses",
    }
}

fn objective_verb(kind: ObjectiveKind) -> &'static str {
    match kind {
        ObjectiveKind::Strike => "Destroy the supply convoy",
        ObjectiveKind::Cas => "Destroy enemy armor engaging friendly troops",
        ObjectiveKind::Sead => "Suppress the SAM site",
    }
}

fn describe_sky(weather: &Weather) -> &'static str {
    match (weather.precipitation, weather.cloud_density) {
        (Precipitation::Thunderstorm, _) => "thunderstorms",
        (Precipitation::Rain, _) => "rain",
        (Precipitation::None, 0) => "clear skies",
        (Precipitation::None, 1..=5) => "scattered clouds",
        (Precipitation::None, _) => "overcast",
    }
}

/// Escape text for use inside HTML elements and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;background:#f4f1ea;color:#222;margin:2em}\
h1{border-bottom:2px solid #444}h2{margin-top:1.4em}li{margin:.2em 0}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn render_html(briefing: &Briefing) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&briefing.name));
    let _ = writeln!(body, "<p>{}</p>", escape_html(&briefing.description));
    for (heading, items, tag) in [
        ("Objectives", &briefing.objectives, "ol"),
        ("Flights", &briefing.flights, "ul"),
        ("Remarks", &briefing.remarks, "ul"),
    ] {
        let _ = writeln!(body, "<h2>{heading}</h2>\n<{tag}>");
        for item in items {
            let _ = writeln!(body, "<li>{}</li>", escape_html(item));
        }
        let _ = writeln!(body, "</{tag}>");
    }
    page(&briefing.name, &body)
}

/// Page shown in place of a briefing when generation fails.
pub fn failure_html(message: &str) -> String {
    let body = format!(
        "<h1>Failed to generate mission</h1>\n<p>{}</p>\n",
        escape_html(message)
    );
    page("Failed to generate mission", &body)
}
