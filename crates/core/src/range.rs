//! Closed integer interval used for every "between N and M" template field.

use std::fmt;
use std::ops::{Div, Mul};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Inclusive `[min, max]` integer range.
///
/// The constructor sorts its arguments, so `min <= max` always holds. Text
/// parsing never fails: anything that is not exactly two comma-separated
/// integers becomes `{0,0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundedRange {
    min: i32,
    max: i32,
}

impl BoundedRange {
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A range holding a single value.
    pub const fn fixed(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Number of distinct values in the range.
    pub fn span(&self) -> u64 {
        (i64::from(self.max) - i64::from(self.min) + 1) as u64
    }

    /// True for the `{0,0}` value produced by a failed parse.
    pub fn is_degenerate(&self) -> bool {
        self.min == 0 && self.max == 0
    }

    /// Draw a value uniformly from `[min, max]`, both ends included.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Multiply both bounds by `factor`, saturating at the `i32` limits.
    pub fn scale(&self, factor: i32) -> Self {
        Self::new(
            self.min.saturating_mul(factor),
            self.max.saturating_mul(factor),
        )
    }

    /// Soft parse of `"min,max"`; malformed input yields `{0,0}`.
    pub fn parse(text: &str) -> Self {
        Self::try_parse(text).unwrap_or_default()
    }

    /// Strict parse used where the caller wants to know whether the text was valid.
    pub fn try_parse(text: &str) -> Option<Self> {
        let mut parts = text.split(',');
        let a = parts.next()?.trim().parse::<i32>().ok()?;
        let b = parts.next()?.trim().parse::<i32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(a, b))
    }
}

impl fmt::Display for BoundedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

impl Mul<i32> for BoundedRange {
    type Output = BoundedRange;

    fn mul(self, factor: i32) -> BoundedRange {
        self.scale(factor)
    }
}

impl Div<i32> for BoundedRange {
    type Output = BoundedRange;

    /// Integer division truncating toward zero; dividing by zero panics like `i32` division.
    fn div(self, divisor: i32) -> BoundedRange {
        BoundedRange::new(self.min / divisor, self.max / divisor)
    }
}

impl From<(i32, i32)> for BoundedRange {
    fn from((a, b): (i32, i32)) -> Self {
        Self::new(a, b)
    }
}

impl Serialize for BoundedRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BoundedRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}
