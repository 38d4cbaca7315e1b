//! Closed intervals over temperature and heat.
//!
//! A single [`ClosedInterval<D>`] type serves both axes of a pinch diagram.
//! The domain marker `D` keeps temperature and heat ranges from being mixed
//! up and selects the containment tolerance: heat values accumulate
//! floating-point error across cascade sums, temperatures do not.
//!
//! Every constructed interval rounds its ends to [`ROUNDING_DIGITS`] decimal
//! digits, so two ranges built from the same arithmetic on different paths
//! compare equal.

use std::{cmp::Ordering, fmt, marker::PhantomData};

use thiserror::Error;

/// Decimal digits kept at every range construction.
pub const ROUNDING_DIGITS: i32 = 9;

/// Largest magnitude for which scaling by `10^ROUNDING_DIGITS` stays exact.
const MAX_EXACT_SCALED: f64 = 4_503_599_627_370_496.0;

/// Rounds a value to [`ROUNDING_DIGITS`] decimal digits.
///
/// Values too large to scale exactly are returned unchanged, and negative
/// zero is normalized to zero.
#[must_use]
pub fn round(value: f64) -> f64 {
    let scale = 10_f64.powi(ROUNDING_DIGITS);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= MAX_EXACT_SCALED {
        return value;
    }
    let rounded = scaled.round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// The axis an interval lives on.
pub trait Domain: Copy + fmt::Debug {
    /// Human-readable name used in diagnostics.
    const NAME: &'static str;

    /// Slack applied on both ends by [`ClosedInterval::contains`].
    const TOLERANCE: f64;
}

/// Temperature axis, in °C. Containment is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temperature;

impl Domain for Temperature {
    const NAME: &'static str = "temperature";
    const TOLERANCE: f64 = 0.0;
}

/// Heat axis, in W.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heat;

impl Domain for Heat {
    const NAME: &'static str = "heat";
    const TOLERANCE: f64 = 1e-6;
}

pub type TemperatureRange = ClosedInterval<Temperature>;
pub type HeatRange = ClosedInterval<Heat>;

/// Errors from interval algebra.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IntervalError {
    #[error("unmergeable ranges: first={first:?} second={second:?}")]
    Unmergeable {
        first: (f64, f64),
        second: (f64, f64),
    },

    #[error("ranges are not continuous: finish={finish} next_start={next_start}")]
    Discontinuous { finish: f64, next_start: f64 },
}

/// A closed interval `[start, finish]` with `start <= finish`.
///
/// Equality compares both ends. Ordering is by `start`, then by `finish`.
#[derive(Debug, Clone, Copy)]
pub struct ClosedInterval<D: Domain> {
    start: f64,
    finish: f64,
    _domain: PhantomData<D>,
}

impl<D: Domain> ClosedInterval<D> {
    /// Creates an interval from two ends given in either order.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        let (a, b) = (round(a), round(b));
        let (start, finish) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start,
            finish,
            _domain: PhantomData,
        }
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn finish(&self) -> f64 {
        self.finish
    }

    /// Returns `finish - start`.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.finish - self.start
    }

    /// Returns `true` if the interval has zero width.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.delta() == 0.0
    }

    /// Closed containment test using the domain tolerance.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.contains_within(value, D::TOLERANCE)
    }

    /// Closed containment test with an explicit tolerance.
    #[must_use]
    pub fn contains_within(&self, value: f64, tolerance: f64) -> bool {
        self.start - tolerance <= value && value <= self.finish + tolerance
    }

    /// Returns `true` if both ends of `other` lie inside this interval.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.contains(other.start) && self.contains(other.finish)
    }

    /// Returns `true` if the intervals touch end to start in either order.
    #[must_use]
    pub fn mergeable(&self, other: &Self) -> bool {
        self.finish == other.start || self.start == other.finish
    }

    /// Returns the union of two touching intervals.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError::Unmergeable`] if the intervals do not touch.
    pub fn merge(&self, other: &Self) -> Result<Self, IntervalError> {
        if !self.mergeable(other) {
            return Err(IntervalError::Unmergeable {
                first: self.bounds(),
                second: other.bounds(),
            });
        }
        Ok(Self::new(
            self.start.min(other.start),
            self.finish.max(other.finish),
        ))
    }

    /// Returns the interval moved by `offset`.
    #[must_use]
    pub fn shift(&self, offset: f64) -> Self {
        Self::new(self.start + offset, self.finish + offset)
    }

    /// Returns `(start, finish)`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.start, self.finish)
    }

    /// Total ordering by `start`, then by `finish`.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then(self.finish.total_cmp(&other.finish))
    }
}

impl<D: Domain> PartialEq for ClosedInterval<D> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.finish == other.finish
    }
}

impl<D: Domain> PartialOrd for ClosedInterval<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.start.partial_cmp(&other.start)? {
            Ordering::Equal => self.finish.partial_cmp(&other.finish),
            ordering => Some(ordering),
        }
    }
}

impl<D: Domain> fmt::Display for ClosedInterval<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", D::NAME, self.start, self.finish)
    }
}

/// Returns a copy of `ranges` in ascending order.
#[must_use]
pub fn sorted<D: Domain>(ranges: &[ClosedInterval<D>]) -> Vec<ClosedInterval<D>> {
    let mut ranges = ranges.to_vec();
    ranges.sort_by(ClosedInterval::total_cmp);
    ranges
}

/// Returns the first gap or overlap between sorted neighbors.
///
/// The gap is reported as `(finish, next_start)`. An empty or single-element
/// list has no gap.
#[must_use]
pub fn first_gap<D: Domain>(ranges: &[ClosedInterval<D>]) -> Option<(f64, f64)> {
    sorted(ranges)
        .windows(2)
        .find(|pair| pair[0].finish != pair[1].start)
        .map(|pair| (pair[0].finish, pair[1].start))
}

/// Returns `true` if sorted neighbors touch with no gap or overlap.
#[must_use]
pub fn is_continuous<D: Domain>(ranges: &[ClosedInterval<D>]) -> bool {
    first_gap(ranges).is_none()
}

/// Converts a continuous list of ranges into its breakpoints.
///
/// # Errors
///
/// Returns [`IntervalError::Discontinuous`] at the first gap.
pub fn flatten<D: Domain>(ranges: &[ClosedInterval<D>]) -> Result<Vec<f64>, IntervalError> {
    if let Some((finish, next_start)) = first_gap(ranges) {
        return Err(IntervalError::Discontinuous { finish, next_start });
    }

    let ranges = sorted(ranges);
    let Some(first) = ranges.first() else {
        return Ok(Vec::new());
    };

    let mut breakpoints = Vec::with_capacity(ranges.len() + 1);
    breakpoints.push(first.start);
    breakpoints.extend(ranges.iter().map(ClosedInterval::finish));
    Ok(breakpoints)
}

/// Builds consecutive ranges between sorted breakpoints.
///
/// Repeated breakpoints yield zero-width ranges.
#[must_use]
pub fn build_ranges<D: Domain>(breakpoints: &[f64]) -> Vec<ClosedInterval<D>> {
    let mut breakpoints = breakpoints.to_vec();
    breakpoints.sort_by(f64::total_cmp);
    breakpoints
        .windows(2)
        .map(|pair| ClosedInterval::new(pair[0], pair[1]))
        .collect()
}

/// Returns the finest partition shared by several continuous range lists.
///
/// # Errors
///
/// Returns [`IntervalError::Discontinuous`] if any input list has a gap.
pub fn merged_ranges<D: Domain>(
    lists: &[&[ClosedInterval<D>]],
) -> Result<Vec<ClosedInterval<D>>, IntervalError> {
    let mut breakpoints = Vec::new();
    for list in lists {
        breakpoints.extend(flatten(list)?);
    }
    breakpoints.sort_by(f64::total_cmp);
    breakpoints.dedup();
    Ok(build_ranges(&breakpoints))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_orders_and_rounds_ends() {
        let range = TemperatureRange::new(20.0, 10.0);
        assert_eq!(range.bounds(), (10.0, 20.0));
        assert_eq!(range.delta(), 10.0);

        let range = HeatRange::new(0.1 + 0.2, 1.0);
        assert_eq!(range.start(), 0.3);
        assert_eq!(round(-1e-12), 0.0);
        assert!(round(-1e-12).is_sign_positive());
    }

    #[test]
    fn heat_containment_is_tolerant() {
        let heat = HeatRange::new(0.0, 100.0);
        assert!(heat.contains(100.000_000_5));
        assert!(!heat.contains(100.001));

        let temperature = TemperatureRange::new(0.0, 100.0);
        assert!(temperature.contains(100.0));
        assert!(!temperature.contains(100.000_000_5));
    }

    #[test]
    fn merge_touching_ranges() {
        let a = HeatRange::new(0.0, 10.0);
        let b = HeatRange::new(10.0, 25.0);
        assert!(a.mergeable(&b));
        assert_eq!(a.merge(&b).unwrap(), HeatRange::new(0.0, 25.0));
        assert_eq!(b.merge(&a).unwrap(), HeatRange::new(0.0, 25.0));

        let c = HeatRange::new(11.0, 12.0);
        assert_eq!(
            a.merge(&c),
            Err(IntervalError::Unmergeable {
                first: (0.0, 10.0),
                second: (11.0, 12.0),
            })
        );
    }

    #[test]
    fn ordering_is_by_start_then_finish() {
        let a = TemperatureRange::new(0.0, 10.0);
        let b = TemperatureRange::new(0.0, 5.0);
        let c = TemperatureRange::new(1.0, 2.0);
        assert!(b < a);
        assert!(a < c);
        assert_eq!(sorted(&[c, a, b]), vec![b, a, c]);
    }

    #[test]
    fn gap_detection() {
        let ranges = [
            TemperatureRange::new(0.0, 10.0),
            TemperatureRange::new(5.0, 20.0),
        ];
        assert_eq!(first_gap(&ranges), Some((10.0, 5.0)));
        assert!(!is_continuous(&ranges));

        let ranges = [
            TemperatureRange::new(10.0, 20.0),
            TemperatureRange::new(0.0, 10.0),
        ];
        assert!(is_continuous(&ranges));
    }

    #[test]
    fn flatten_requires_continuity() {
        let ranges = [
            HeatRange::new(0.0, 10.0),
            HeatRange::new(10.0, 10.0),
            HeatRange::new(10.0, 30.0),
        ];
        assert_eq!(flatten(&ranges).unwrap(), vec![0.0, 10.0, 10.0, 30.0]);

        let ranges = [HeatRange::new(0.0, 10.0), HeatRange::new(15.0, 30.0)];
        assert_eq!(
            flatten(&ranges),
            Err(IntervalError::Discontinuous {
                finish: 10.0,
                next_start: 15.0,
            })
        );

        assert!(flatten::<Heat>(&[]).unwrap().is_empty());
    }

    #[test]
    fn merged_ranges_builds_finest_partition() {
        let first = [HeatRange::new(0.0, 15.0), HeatRange::new(15.0, 30.0)];
        let second = [HeatRange::new(10.0, 20.0), HeatRange::new(20.0, 31.0)];

        let merged = merged_ranges(&[&first, &second]).unwrap();
        let bounds = [
            (0.0, 10.0),
            (10.0, 15.0),
            (15.0, 20.0),
            (20.0, 30.0),
            (30.0, 31.0),
        ];
        let expected: Vec<HeatRange> = bounds
            .into_iter()
            .map(|(a, b)| HeatRange::new(a, b))
            .collect();
        assert_eq!(merged, expected);

        let broken = [HeatRange::new(0.0, 15.0), HeatRange::new(16.0, 30.0)];
        assert!(merged_ranges(&[&broken, &second]).is_err());
    }

    mod proptests {
        use super::*;

        use proptest::prelude::*;

        proptest! {
            #[test]
            fn flatten_inverts_build_ranges(
                mut quarters in prop::collection::vec(-40_000_i32..40_000, 2..20),
            ) {
                quarters.sort_unstable();
                quarters.dedup();
                prop_assume!(quarters.len() >= 2);
                let breakpoints: Vec<f64> = quarters.iter().map(|&q| f64::from(q) / 4.0).collect();

                let ranges: Vec<TemperatureRange> = build_ranges(&breakpoints);
                prop_assert_eq!(flatten(&ranges).unwrap(), breakpoints);
            }

            #[test]
            fn merge_is_defined_iff_mergeable_and_commutes(
                a in -1_000_i32..1_000,
                b in -1_000_i32..1_000,
                c in -1_000_i32..1_000,
                d in -1_000_i32..1_000,
            ) {
                let first = HeatRange::new(f64::from(a), f64::from(b));
                let second = HeatRange::new(f64::from(c), f64::from(d));

                prop_assert_eq!(first.merge(&second).is_ok(), first.mergeable(&second));
                if let (Ok(left), Ok(right)) = (first.merge(&second), second.merge(&first)) {
                    prop_assert_eq!(left, right);
                }
            }
        }
    }
}
