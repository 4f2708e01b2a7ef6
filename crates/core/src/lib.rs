//! Core value types, constants, and map primitives for the mission forge workspace.

pub mod range;

pub use range::BoundedRange;

use serde::{Deserialize, Serialize};

/// One of the two opposing coalitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    /// Lowercase key the simulator uses for the coalition.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }
}

/// Conversion factors and fixed values used by the generator and exporter.
pub mod constants {
    /// Metres per nautical mile.
    pub const METERS_PER_NM: f64 = 1_852.0;
    /// Metres per foot.
    pub const METERS_PER_FOOT: f64 = 0.3048;
    /// Metres per second per knot.
    pub const MPS_PER_KNOT: f64 = 0.514_444;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: u32 = 86_400;
    /// Largest flight group the simulator accepts for player aircraft.
    pub const MAX_FLIGHT_SIZE: u32 = 4;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{METERS_PER_FOOT, METERS_PER_NM, MPS_PER_KNOT};

    /// Convert nautical miles to metres.
    #[inline]
    pub fn nm_to_m(v: f64) -> f64 {
        v * METERS_PER_NM
    }

    /// Convert metres to nautical miles.
    #[inline]
    pub fn m_to_nm(v: f64) -> f64 {
        v / METERS_PER_NM
    }

    /// Convert feet to metres.
    #[inline]
    pub fn ft_to_m(v: f64) -> f64 {
        v * METERS_PER_FOOT
    }

    /// Convert knots to metres per second.
    #[inline]
    pub fn kts_to_mps(v: f64) -> f64 {
        v * MPS_PER_KNOT
    }

    /// Convert metres per second to knots.
    #[inline]
    pub fn mps_to_kts(v: f64) -> f64 {
        v / MPS_PER_KNOT
    }
}

/// Time-of-day helpers; mission start times are seconds after midnight.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Seconds after midnight for a wall-clock hour and minute.
    #[inline]
    pub fn clock_to_seconds(hour: u32, minute: u32) -> u32 {
        (hour * 3_600 + minute * 60) % SECONDS_PER_DAY
    }

    /// Format seconds after midnight as `HH:MM`.
    pub fn format_clock(seconds: u32) -> String {
        let seconds = seconds % SECONDS_PER_DAY;
        format!("{:02}:{:02}", seconds / 3_600, (seconds % 3_600) / 60)
    }
}

/// Flat map coordinates as used by the simulator: `x` points north, `y` points east, metres.
pub mod coords {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct Coordinates {
        pub x: f64,
        pub y: f64,
    }

    impl Coordinates {
        pub const fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }

        /// Euclidean distance in metres.
        #[inline]
        pub fn distance_to(&self, other: &Coordinates) -> f64 {
            ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
        }

        /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
        #[inline]
        pub fn lerp(&self, other: &Coordinates, t: f64) -> Coordinates {
            Coordinates {
                x: self.x + (other.x - self.x) * t,
                y: self.y + (other.y - self.y) * t,
            }
        }

        /// Heading from `self` to `other` in radians, clockwise from north.
        pub fn heading_to(&self, other: &Coordinates) -> f64 {
            let heading = (other.y - self.y).atan2(other.x - self.x);
            if heading < 0.0 {
                heading + std::f64::consts::TAU
            } else {
                heading
            }
        }

        /// Point `distance` metres away along `heading` radians.
        #[inline]
        pub fn offset(&self, heading: f64, distance: f64) -> Coordinates {
            Coordinates {
                x: self.x + heading.cos() * distance,
                y: self.y + heading.sin() * distance,
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn heading_follows_compass_convention() {
            let origin = Coordinates::new(0.0, 0.0);
            let north = origin.heading_to(&Coordinates::new(10.0, 0.0));
            let east = origin.heading_to(&Coordinates::new(0.0, 10.0));
            let west = origin.heading_to(&Coordinates::new(0.0, -10.0));
            assert!(north.abs() < 1e-12);
            assert!((east - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
            assert!((west - 3.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        }

        #[test]
        fn offset_then_distance_is_consistent() {
            let start = Coordinates::new(-1_000.0, 2_500.0);
            let moved = start.offset(1.1, 4_000.0);
            assert!((start.distance_to(&moved) - 4_000.0).abs() < 1e-6);
            assert!((start.heading_to(&moved) - 1.1).abs() < 1e-9);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::time::{clock_to_seconds, format_clock};
    use super::units::{m_to_nm, nm_to_m};

    #[test]
    fn clock_helpers_wrap_at_midnight() {
        assert_eq!(clock_to_seconds(6, 30), 23_400);
        assert_eq!(clock_to_seconds(24, 0), 0);
        assert_eq!(format_clock(23_400), "06:30");
        assert_eq!(format_clock(86_400 + 60), "00:01");
    }

    #[test]
    fn nautical_mile_conversion_inverts() {
        assert!((m_to_nm(nm_to_m(12.5)) - 12.5).abs() < 1e-12);
    }
}
