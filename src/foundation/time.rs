use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::math::{div_round_u128, gcd_u128, lcm_u128};

/// Non-negative rational media time: `value / timescale` seconds.
///
/// A zero `timescale` marks the duration as invalid/unset, which is a distinct state from a valid
/// zero. Comparisons and hashing look at the represented time, so `10/1 == 20/2`, while
/// [`Duration::value`] and [`Duration::timescale`] expose the exact stored representation.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Duration {
    value: u64,
    timescale: u64,
}

impl Duration {
    /// Invalid/unset duration.
    pub const INVALID: Self = Self {
        value: 0,
        timescale: 0,
    };

    /// Valid zero-length duration.
    pub const ZERO: Self = Self {
        value: 0,
        timescale: 1,
    };

    /// Create a validated duration of `value / timescale` seconds.
    pub fn new(value: i64, timescale: u64) -> StillclipResult<Self> {
        if value < 0 {
            return Err(StillclipError::invalid_input(format!(
                "duration must not be negative (got {value}/{timescale})"
            )));
        }
        Self::from_ticks(value.unsigned_abs(), timescale)
    }

    /// Create a duration from an unsigned tick count.
    pub fn from_ticks(value: u64, timescale: u64) -> StillclipResult<Self> {
        if timescale == 0 {
            return Err(StillclipError::invalid_input(
                "duration timescale must be > 0",
            ));
        }
        Ok(Self { value, timescale })
    }

    /// Whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self {
            value: secs,
            timescale: 1,
        }
    }

    /// Whole milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self {
            value: millis,
            timescale: 1000,
        }
    }

    /// Stored tick count.
    pub fn value(self) -> u64 {
        self.value
    }

    /// Stored ticks per second; zero for an invalid duration.
    pub fn timescale(self) -> u64 {
        self.timescale
    }

    /// `false` for the invalid/unset state.
    pub fn is_valid(self) -> bool {
        self.timescale != 0
    }

    /// `true` only for a valid zero duration.
    pub fn is_zero(self) -> bool {
        self.is_valid() && self.value == 0
    }

    /// Lossy conversion to floating-point seconds. Invalid durations report `NaN`.
    pub fn as_secs_f64(self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }
        (self.value as f64) / (self.timescale as f64)
    }

    /// Exact sum of two valid durations.
    pub fn checked_add(self, rhs: Self) -> StillclipResult<Self> {
        let (a, b, ts) = common_ticks(self, rhs)?;
        let sum = a
            .checked_add(b)
            .ok_or_else(|| StillclipError::invalid_input("duration addition overflowed"))?;
        reduce(sum, ts)
    }

    /// Exact difference of two valid durations; fails when `rhs > self`.
    pub fn checked_sub(self, rhs: Self) -> StillclipResult<Self> {
        let (a, b, ts) = common_ticks(self, rhs)?;
        let diff = a.checked_sub(b).ok_or_else(|| {
            StillclipError::invalid_input(format!("duration subtraction {self} - {rhs} is negative"))
        })?;
        reduce(diff, ts)
    }

    /// Convert to a sample count at `sample_rate`, rounding to nearest (halves up).
    ///
    /// Invalid durations and a zero rate map to zero samples; a count past `u64` is an error.
    pub fn to_samples(self, sample_rate: u32) -> StillclipResult<u64> {
        if !self.is_valid() || sample_rate == 0 {
            return Ok(0);
        }
        let num = u128::from(self.value) * u128::from(sample_rate);
        u64::try_from(div_round_u128(num, u128::from(self.timescale))).map_err(|_| {
            StillclipError::invalid_input(format!("{self} at {sample_rate} Hz overflows samples"))
        })
    }

    fn cmp_key(self, rhs: Self) -> (u128, u128) {
        (
            u128::from(self.value) * u128::from(rhs.timescale),
            u128::from(rhs.value) * u128::from(self.timescale),
        )
    }
}

/// Express two valid durations on their least common timescale.
///
/// Two `u64` timescales always have an LCM below `u128::MAX`; only the reduced result can fail to
/// fit back into a `Duration`.
fn common_ticks(a: Duration, b: Duration) -> StillclipResult<(u128, u128, u128)> {
    if !a.is_valid() || !b.is_valid() {
        return Err(StillclipError::invalid_input(
            "arithmetic on an invalid duration",
        ));
    }
    let (ta, tb) = (u128::from(a.timescale), u128::from(b.timescale));
    let ts = lcm_u128(ta, tb)
        .ok_or_else(|| StillclipError::invalid_input("duration timescale overflowed"))?;
    Ok((
        u128::from(a.value) * (ts / ta),
        u128::from(b.value) * (ts / tb),
        ts,
    ))
}

fn reduce(value: u128, timescale: u128) -> StillclipResult<Duration> {
    let g = gcd_u128(value, timescale).max(1);
    let (value, timescale) = (value / g, timescale / g);
    let value = u64::try_from(value)
        .map_err(|_| StillclipError::invalid_input("duration value overflowed"))?;
    let timescale = u64::try_from(timescale)
        .map_err(|_| StillclipError::invalid_input("duration timescale overflowed"))?;
    Ok(Duration { value, timescale })
}

impl Default for Duration {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Duration {}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    /// Invalid durations sort before every valid one and equal each other.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => {
                let (a, b) = self.cmp_key(*other);
                a.cmp(&b)
            }
        }
    }
}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if !self.is_valid() {
            state.write_u8(0);
            return;
        }
        let (v, ts) = (u128::from(self.value), u128::from(self.timescale));
        let g = gcd_u128(v, ts).max(1);
        state.write_u8(1);
        state.write_u128(v / g);
        state.write_u128(ts / g);
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}/{}", self.value, self.timescale)
        } else {
            f.write_str("invalid")
        }
    }
}

impl FromStr for Duration {
    type Err = StillclipError;

    /// Parse `value/timescale`, whole seconds (`5`) or decimal seconds (`2.25`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || StillclipError::invalid_input(format!("cannot parse duration '{s}'"));
        if s.is_empty() || s.contains('+') {
            return Err(bad());
        }

        if let Some((v, ts)) = s.split_once('/') {
            let v = v.trim().parse::<i64>().map_err(|_| bad())?;
            let ts = ts.trim().parse::<u64>().map_err(|_| bad())?;
            return Self::new(v, ts);
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.starts_with('-') {
            return Err(StillclipError::invalid_input(format!(
                "duration must not be negative (got '{s}')"
            )));
        }
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 9
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(bad());
        }
        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| bad())?
        };
        let scale = 10u64.pow(frac.len() as u32);
        let frac_val = if frac.is_empty() {
            0
        } else {
            frac.parse::<u64>().map_err(|_| bad())?
        };
        let value = whole
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac_val))
            .ok_or_else(bad)?;
        reduce(u128::from(value), u128::from(scale))
    }
}

/// A span of media time: `[start, start + length)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Range start.
    pub start: Duration,
    /// Range length.
    pub length: Duration,
}

impl TimeRange {
    /// Create a range from two valid durations.
    pub fn new(start: Duration, length: Duration) -> StillclipResult<Self> {
        if !start.is_valid() || !length.is_valid() {
            return Err(StillclipError::invalid_input(
                "time range bounds must be valid durations",
            ));
        }
        Ok(Self { start, length })
    }

    /// Exclusive end.
    pub fn end(self) -> StillclipResult<Duration> {
        self.start.checked_add(self.length)
    }

    /// `true` when the range covers no time.
    pub fn is_empty(self) -> bool {
        self.length.is_zero()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
