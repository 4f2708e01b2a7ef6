//! The `options` section: difficulty and view settings forced for the mission.

use forge_mission::Mission;

use crate::lua::LuaTable;

/// Name the first human seat flies under, `Player` when none is named.
pub fn player_name(mission: &Mission) -> &str {
    mission
        .groups()
        .flat_map(|group| group.units.iter())
        .find_map(|unit| unit.player_name.as_deref())
        .unwrap_or("Player")
}

pub fn options_table(mission: &Mission) -> LuaTable {
    let difficulty = LuaTable::new()
        .with("fuel", false)
        .with("labels", 0)
        .with("easyRadar", false)
        .with("miniHUD", false)
        .with("optionsView", "optview_all")
        .with("setGlobal", true)
        .with("avionicsLanguage", "native")
        .with("cockpitVisualRM", false)
        .with("map", true)
        .with("spectatorExternalViews", true)
        .with("userSnapView", true)
        .with("iconsTheme", "nato")
        .with("weapons", false)
        .with("padlock", true)
        .with("birds", 0)
        .with("permitCrash", true)
        .with("immortal", false)
        .with("easyCommunication", true)
        .with("cockpitStatusBarAllowed", false)
        .with("wakeTurbulence", false)
        .with("easyFlight", false)
        .with("hideStick", false)
        .with("radio", false)
        .with("geffect", "realistic")
        .with("externalViews", true)
        .with("unrestrictedSATNAV", true)
        .with("userMarks", true)
        .with("civTraffic", "");
    let miscellaneous = LuaTable::new()
        .with("allow_server_screenshots", false)
        .with("headmove", false)
        .with("f5_nearest_ac", true)
        .with("f11_free_camera", true)
        .with("F2_view_effects", 1)
        .with("f10_awacs", true)
        .with("Coordinate_Display", "Lat Long")
        .with("accidental_failures", false)
        .with("force_feedback_enabled", false)
        .with("chat_window_at_start", true)
        .with("show_pilot_body", true)
        .with("synchronize_controls", false)
        .with("TrackIR_external_views", true);
    LuaTable::new()
        .with("playerName", player_name(mission))
        .with("difficulty", difficulty)
        .with("miscellaneous", miscellaneous)
        .with("plugins", LuaTable::new())
}
