//! The `warehouses` section: airbase ownership and supply settings.

use forge_mission::Mission;

use crate::lua::LuaTable;

pub fn warehouses_table(mission: &Mission) -> LuaTable {
    let mut airports = LuaTable::new();
    for airbase in &mission.airbases {
        let coalition = match airbase.side {
            Some(side) => side.as_str().to_ascii_uppercase(),
            None => "NEUTRAL".to_string(),
        };
        airports.set_index(
            i64::from(airbase.id),
            LuaTable::new()
                .with("coalition", coalition)
                .with("unlimitedMunitions", true)
                .with("unlimitedAircrafts", true)
                .with("unlimitedFuel", true)
                .with("dynamicSpawn", false)
                .with("allowHotStart", false)
                .with("speed", 16.666666)
                .with("size", 100)
                .with("periodicity", 30)
                .with("OperatingLevel_Air", 10)
                .with("OperatingLevel_Eqp", 10)
                .with("OperatingLevel_Fuel", 10)
                .with("suppliers", LuaTable::new()),
        );
    }
    LuaTable::new()
        .with("airports", airports)
        .with("warehouses", LuaTable::new())
}
