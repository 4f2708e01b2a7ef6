//! Concrete weather from a preset, the season and the theater climate.

use std::f64::consts::TAU;

use forge_core::units::kts_to_mps;
use forge_mission::{Precipitation, Weather, Wind};
use forge_template::WeatherPreset;
use rand::Rng;

/// Temperature swing between the coldest and warmest month, half amplitude.
const SEASONAL_SWING_C: f64 = 10.0;

struct PresetProfile {
    density: (u8, u8),
    base_m: (f64, f64),
    thickness_m: (f64, f64),
    visibility_m: f64,
    precipitation: Precipitation,
    qnh_mmhg: (u32, u32),
    turbulence_mps: (f64, f64),
    temperature_offset_c: f64,
}

fn profile(preset: WeatherPreset) -> PresetProfile {
    match preset {
        WeatherPreset::Clear | WeatherPreset::Random => PresetProfile {
            density: (0, 0),
            base_m: (2_500.0, 4_000.0),
            thickness_m: (200.0, 200.0),
            visibility_m: 80_000.0,
            precipitation: Precipitation::None,
            qnh_mmhg: (758, 772),
            turbulence_mps: (0.0, 2.0),
            temperature_offset_c: 0.0,
        },
        WeatherPreset::LightClouds => PresetProfile {
            density: (2, 5),
            base_m: (1_500.0, 3_500.0),
            thickness_m: (300.0, 1_000.0),
            visibility_m: 80_000.0,
            precipitation: Precipitation::None,
            qnh_mmhg: (752, 768),
            turbulence_mps: (0.0, 3.0),
            temperature_offset_c: 0.0,
        },
        WeatherPreset::Overcast => PresetProfile {
            density: (7, 8),
            base_m: (800.0, 2_000.0),
            thickness_m: (800.0, 2_000.0),
            visibility_m: 50_000.0,
            precipitation: Precipitation::None,
            qnh_mmhg: (748, 762),
            turbulence_mps: (1.0, 4.0),
            temperature_offset_c: -1.0,
        },
        WeatherPreset::Precipitation => PresetProfile {
            density: (9, 9),
            base_m: (500.0, 1_500.0),
            thickness_m: (1_500.0, 3_000.0),
            visibility_m: 20_000.0,
            precipitation: Precipitation::Rain,
            qnh_mmhg: (745, 758),
            turbulence_mps: (2.0, 6.0),
            temperature_offset_c: -2.0,
        },
        WeatherPreset::Storm => PresetProfile {
            density: (10, 10),
            base_m: (400.0, 1_000.0),
            thickness_m: (2_500.0, 4_000.0),
            visibility_m: 10_000.0,
            precipitation: Precipitation::Thunderstorm,
            qnh_mmhg: (740, 752),
            turbulence_mps: (5.0, 10.0),
            temperature_offset_c: -4.0,
        },
    }
}

/// Build the mission weather; `preset` must already be resolved.
pub fn build<R: Rng + ?Sized>(
    preset: WeatherPreset,
    wind_speed_kts: u32,
    month: u32,
    base_temperature_c: f64,
    rng: &mut R,
) -> Weather {
    let profile = profile(preset);
    let seasonal = SEASONAL_SWING_C * (TAU * (month as f64 - 7.0) / 12.0).cos();
    let temperature_c =
        (base_temperature_c + seasonal + profile.temperature_offset_c + rng.gen_range(-3.0..=3.0))
            .round();

    let ground_speed = kts_to_mps(wind_speed_kts as f64);
    let ground_direction = rng.gen_range(0..360) as f64;
    let wind_ground = Wind {
        speed_mps: ground_speed,
        direction_deg: ground_direction,
    };
    let wind_2000 = veer(wind_ground, (1.5, 2.0), rng);
    let wind_8000 = veer(wind_ground, (2.5, 3.5), rng);

    Weather {
        temperature_c,
        qnh_mmhg: rng.gen_range(profile.qnh_mmhg.0..=profile.qnh_mmhg.1) as f64,
        cloud_base_m: sample(profile.base_m, rng).round(),
        cloud_thickness_m: sample(profile.thickness_m, rng).round(),
        cloud_density: rng.gen_range(profile.density.0..=profile.density.1),
        precipitation: profile.precipitation,
        visibility_m: profile.visibility_m,
        turbulence_mps: sample(profile.turbulence_mps, rng),
        wind_ground,
        wind_2000,
        wind_8000,
    }
}

/// Stronger wind aloft, backing or veering up to 30 degrees.
fn veer<R: Rng + ?Sized>(ground: Wind, factor: (f64, f64), rng: &mut R) -> Wind {
    let shift = rng.gen_range(-30..=30) as f64;
    Wind {
        speed_mps: ground.speed_mps * sample(factor, rng),
        direction_deg: (ground.direction_deg + shift).rem_euclid(360.0),
    }
}

fn sample<R: Rng + ?Sized>((low, high): (f64, f64), rng: &mut R) -> f64 {
    if high > low { rng.gen_range(low..=high) } else { low }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn storm_brings_thunderstorms_and_low_visibility() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let weather = build(WeatherPreset::Storm, 20, 10, 15.0, &mut rng);
        assert_eq!(weather.precipitation, Precipitation::Thunderstorm);
        assert_eq!(weather.cloud_density, 10);
        assert!(weather.visibility_m <= 10_000.0);
        assert!((740.0..=752.0).contains(&weather.qnh_mmhg));
    }

    #[test]
    fn summer_is_warmer_than_winter() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let july = build(WeatherPreset::Clear, 0, 7, 15.0, &mut rng);
        let january = build(WeatherPreset::Clear, 0, 1, 15.0, &mut rng);
        assert!(july.temperature_c > january.temperature_c);
        assert_eq!(july.cloud_density, 0);
    }

    #[test]
    fn wind_strengthens_with_altitude() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let weather = build(WeatherPreset::LightClouds, 10, 4, 15.0, &mut rng);
        assert!((weather.wind_ground.speed_mps - kts_to_mps(10.0)).abs() < 1e-9);
        assert!(weather.wind_2000.speed_mps > weather.wind_ground.speed_mps);
        assert!(weather.wind_8000.speed_mps > weather.wind_2000.speed_mps);
        for wind in [weather.wind_ground, weather.wind_2000, weather.wind_8000] {
            assert!((0.0..360.0).contains(&wind.direction_deg));
        }
    }
}
