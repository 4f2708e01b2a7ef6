//! One draw per randomized template field.

use chrono::{Datelike, NaiveDate};
use forge_core::time::clock_to_seconds;
use forge_core::units::nm_to_m;
use forge_mission::Skill;
use forge_template::{MissionTemplate, SkillLevel, TimeOfDay, WeatherPreset};
use rand::Rng;

use super::GenerationError;

/// Concrete values chosen for every randomized template field.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    pub objective_count: u32,
    /// Allowed distance band from home in metres; each candidate zone is checked against it.
    pub objective_distance_m: (f64, f64),
    /// Units in each objective group.
    pub target_count: u32,
    /// Air-defense groups around each objective.
    pub air_defense_groups: u32,
    pub wind_speed_kts: u32,
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub start_time_seconds: u32,
    /// Never [`WeatherPreset::Random`].
    pub weather: WeatherPreset,
    pub ai_skill: Skill,
}

impl ResolvedParameters {
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Relative odds of each preset when the template asks for random weather.
const WEATHER_WEIGHTS: [(WeatherPreset, u32); 5] = [
    (WeatherPreset::Clear, 30),
    (WeatherPreset::LightClouds, 30),
    (WeatherPreset::Overcast, 20),
    (WeatherPreset::Precipitation, 12),
    (WeatherPreset::Storm, 8),
];

const TIMES_OF_DAY: [TimeOfDay; 4] = [
    TimeOfDay::Dawn,
    TimeOfDay::Day,
    TimeOfDay::Dusk,
    TimeOfDay::Night,
];

const SKILLS: [Skill; 4] = [Skill::Average, Skill::Good, Skill::High, Skill::Excellent];

pub fn resolve<R: Rng + ?Sized>(
    template: &MissionTemplate,
    rng: &mut R,
) -> Result<ResolvedParameters, GenerationError> {
    let objective_count = non_negative(template.objective_count.sample(rng)).max(1);
    let objective_distance_m = (
        nm_to_m(template.objective_distance_nm.min().max(0) as f64),
        nm_to_m(template.objective_distance_nm.max().max(0) as f64),
    );
    let target_count = non_negative(template.target_count.sample(rng)).max(1);
    let air_defense_groups = non_negative(template.enemy_air_defense.sample(rng));
    let wind_speed_kts = non_negative(template.wind_speed_kts.sample(rng));

    let month = match template.date_month.number() {
        Some(month) => month,
        None => rng.gen_range(1..=12),
    };
    let day = rng.gen_range(1..=28);
    let date = NaiveDate::from_ymd_opt(template.date_year, month, day).ok_or_else(|| {
        GenerationError::Internal(format!(
            "invalid date {}-{month:02}-{day:02}",
            template.date_year
        ))
    })?;

    let time_of_day = match template.time_of_day {
        TimeOfDay::Random => TIMES_OF_DAY[rng.gen_range(0..TIMES_OF_DAY.len())],
        chosen => chosen,
    };
    let start_time_seconds = start_time(time_of_day, rng);

    let weather = match template.weather {
        WeatherPreset::Random => pick_weather(rng),
        chosen => chosen,
    };

    let ai_skill = match template.ai_skill {
        SkillLevel::Random => SKILLS[rng.gen_range(0..SKILLS.len())],
        SkillLevel::Average => Skill::Average,
        SkillLevel::Good => Skill::Good,
        SkillLevel::High => Skill::High,
        SkillLevel::Excellent => Skill::Excellent,
    };

    Ok(ResolvedParameters {
        objective_count,
        objective_distance_m,
        target_count,
        air_defense_groups,
        wind_speed_kts,
        date,
        time_of_day,
        start_time_seconds,
        weather,
        ai_skill,
    })
}

fn non_negative(value: i32) -> u32 {
    value.max(0) as u32
}

/// Start time for a concrete time of day, in seconds after midnight.
fn start_time<R: Rng + ?Sized>(time_of_day: TimeOfDay, rng: &mut R) -> u32 {
    // (first, last) start minute after midnight; night wraps past midnight
    let (first, last) = match time_of_day {
        TimeOfDay::Dawn => (5 * 60, 7 * 60),
        TimeOfDay::Dusk => (17 * 60, 19 * 60),
        TimeOfDay::Night => (21 * 60, 27 * 60),
        TimeOfDay::Day | TimeOfDay::Random => (8 * 60, 16 * 60),
    };
    // quarter-hour steps
    let steps = (last - first) / 15;
    let minute = (first + rng.gen_range(0..=steps) * 15) % (24 * 60);
    clock_to_seconds(minute / 60, minute % 60)
}

fn pick_weather<R: Rng + ?Sized>(rng: &mut R) -> WeatherPreset {
    let total: u32 = WEATHER_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.gen_range(0..total);
    for (preset, weight) in WEATHER_WEIGHTS {
        if roll < weight {
            return preset;
        }
        roll -= weight;
    }
    WeatherPreset::Clear
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::BoundedRange;
    use forge_template::MonthChoice;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn fixed_fields_pass_through() {
        let mut template = MissionTemplate::default();
        template.date_month = MonthChoice::March;
        template.time_of_day = TimeOfDay::Dusk;
        template.weather = WeatherPreset::Storm;
        template.ai_skill = SkillLevel::Average;
        template.target_count = BoundedRange::fixed(3);
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let params = resolve(&template, &mut rng).expect("resolve");
        assert_eq!(params.month(), 3);
        assert_eq!(params.time_of_day, TimeOfDay::Dusk);
        assert!((17 * 3600..=19 * 3600).contains(&params.start_time_seconds));
        assert_eq!(params.weather, WeatherPreset::Storm);
        assert_eq!(params.ai_skill, Skill::Average);
        assert_eq!(params.target_count, 3);
    }

    #[test]
    fn random_fields_resolve_to_concrete_values() {
        let mut template = MissionTemplate::default();
        template.time_of_day = TimeOfDay::Random;
        template.ai_skill = SkillLevel::Random;
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        for _ in 0..64 {
            let params = resolve(&template, &mut rng).expect("resolve");
            assert_ne!(params.weather, WeatherPreset::Random);
            assert_ne!(params.time_of_day, TimeOfDay::Random);
            assert_ne!(params.ai_skill, Skill::Random);
            assert!(params.start_time_seconds < 86_400);
            assert!(template.wind_speed_kts.contains(params.wind_speed_kts as i32));
        }
    }

    #[test]
    fn night_wraps_past_midnight() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..64 {
            let t = start_time(TimeOfDay::Night, &mut rng);
            assert!(t >= 21 * 3600 || t <= 3 * 3600, "{t}");
        }
    }

    #[test]
    fn negative_samples_clamp_to_zero() {
        let mut template = MissionTemplate::default();
        template.enemy_air_defense = BoundedRange::new(-5, -1);
        template.objective_distance_nm = BoundedRange::new(-10, 30);
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let params = resolve(&template, &mut rng).expect("resolve");
        assert_eq!(params.air_defense_groups, 0);
        assert_eq!(params.objective_distance_m.0, 0.0);
    }
}
