//! Library lookups for one template: theater, coalitions, aircraft, home base.

use forge_config::{
    AircraftConfig, AirbaseConfig, CarrierStationConfig, CoalitionConfig, Library, TheaterConfig,
};
use forge_core::Side;
use forge_core::coords::Coordinates;
use forge_template::MissionTemplate;
use rand::Rng;

use super::GenerationError;

/// Carrier placement for flight groups that launch from a ship.
#[derive(Debug, Clone, Copy)]
pub struct CarrierAssets<'a> {
    pub station: &'a CarrierStationConfig,
    /// Ship unit type from the player coalition.
    pub unit_type: &'a str,
}

/// Everything the later stages read from the library.
#[derive(Debug, Clone)]
pub struct Assets<'a> {
    pub theater: &'a TheaterConfig,
    pub player: &'a CoalitionConfig,
    pub enemy: &'a CoalitionConfig,
    /// Aircraft per flight group, in template order.
    pub aircraft: Vec<&'a AircraftConfig>,
    /// Set when at least one flight group starts from land.
    pub airbase: Option<&'a AirbaseConfig>,
    /// Set when at least one flight group starts from the carrier.
    pub carrier: Option<CarrierAssets<'a>>,
}

impl Assets<'_> {
    /// Reference point for objective distances: the airbase, else the carrier.
    pub fn home_position(&self) -> Coordinates {
        match (self.airbase, &self.carrier) {
            (Some(airbase), _) => airbase.position,
            (None, Some(carrier)) => carrier.station.position,
            (None, None) => self.theater.center,
        }
    }

    pub fn home_name(&self) -> &str {
        match (self.airbase, &self.carrier) {
            (Some(airbase), _) => &airbase.name,
            (None, Some(carrier)) => &carrier.station.name,
            (None, None) => &self.theater.name,
        }
    }
}

pub fn select<'a, R: Rng + ?Sized>(
    template: &MissionTemplate,
    library: &'a Library,
    rng: &mut R,
) -> Result<Assets<'a>, GenerationError> {
    let theater = library.theaters.require(&template.theater)?;
    let blue = library.coalitions.require(&template.coalition_blue)?;
    let red = library.coalitions.require(&template.coalition_red)?;
    let (player, enemy) = match template.player_side() {
        Side::Blue => (blue, red),
        Side::Red => (red, blue),
    };

    let aircraft = template
        .player_flight_groups
        .iter()
        .map(|fg| library.aircraft.require(&fg.aircraft))
        .collect::<Result<Vec<_>, _>>()?;

    let mut required_runway_ft: Option<f64> = None;
    let mut needs_carrier = false;
    for (fg, aircraft) in template.player_flight_groups.iter().zip(&aircraft) {
        if fg.carrier {
            if !aircraft.carrier_capable {
                return Err(GenerationError::missing(
                    "carrier-capable aircraft",
                    aircraft.id.clone(),
                ));
            }
            needs_carrier = true;
        } else {
            let current = required_runway_ft.unwrap_or(0.0);
            required_runway_ft = Some(current.max(aircraft.min_runway_ft));
        }
    }

    let airbase = match required_runway_ft {
        Some(required) => Some(pick_airbase(theater, required, rng)?),
        None => None,
    };

    let carrier = if needs_carrier {
        let unit_type = player
            .carrier
            .as_deref()
            .ok_or_else(|| GenerationError::missing("carrier", player.id.clone()))?;
        if theater.carrier_stations.is_empty() {
            return Err(GenerationError::missing("carrier station", theater.id.clone()));
        }
        let station = &theater.carrier_stations[rng.gen_range(0..theater.carrier_stations.len())];
        Some(CarrierAssets { station, unit_type })
    } else {
        None
    };

    Ok(Assets {
        theater,
        player,
        enemy,
        aircraft,
        airbase,
        carrier,
    })
}

fn pick_airbase<'a, R: Rng + ?Sized>(
    theater: &'a TheaterConfig,
    required_ft: f64,
    rng: &mut R,
) -> Result<&'a AirbaseConfig, GenerationError> {
    let candidates: Vec<&AirbaseConfig> = theater
        .airbases
        .iter()
        .filter(|airbase| airbase.runway_length_ft >= required_ft)
        .collect();
    if candidates.is_empty() {
        return Err(GenerationError::missing(
            "airbase",
            format!("{} with a {required_ft:.0} ft runway", theater.id),
        ));
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{library, template};
    use super::*;
    use forge_template::PlayerFlightGroupTemplate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn runway_requirement_filters_airbases() {
        let library = library();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for _ in 0..16 {
            let assets = select(&template(), &library, &mut rng).expect("assets");
            assert_eq!(assets.airbase.map(|a| a.id), Some(7));
            assert!(assets.carrier.is_none());
            assert_eq!(assets.home_name(), "Home Field");
        }
    }

    #[test]
    fn carrier_only_flights_home_on_the_station() {
        let library = library();
        let mut template = template();
        template.player_flight_groups[0].carrier = true;
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let assets = select(&template, &library, &mut rng).expect("assets");
        assert!(assets.airbase.is_none());
        assert_eq!(assets.carrier.map(|c| c.unit_type), Some("CVN_71"));
        assert_eq!(assets.home_name(), "Station");
    }

    #[test]
    fn red_player_swaps_coalitions() {
        let library = library();
        let mut template = template();
        template.player_coalition = forge_template::SideChoice::Red;
        template.player_flight_groups = vec![PlayerFlightGroupTemplate::new("Su-25T", 1)];
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let assets = select(&template, &library, &mut rng).expect("assets");
        assert_eq!(assets.player.id, "russia");
        assert_eq!(assets.enemy.id, "usa");
    }

    #[test]
    fn oversized_runway_requirement_is_missing_asset() {
        let mut library = library();
        library.theaters = forge_config::Catalog::new(
            library
                .theaters
                .iter()
                .cloned()
                .map(|mut theater| {
                    theater.airbases.retain(|a| a.runway_length_ft < 4_000.0);
                    theater
                })
                .collect(),
        )
        .unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let err = select(&template(), &library, &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::MissingAsset { kind: "airbase", .. }));
    }
}
