use std::cmp::Ordering;

use crate::{
    models::thermal::heat_integration::core::stream::{Stream, StreamId, StreamState},
    support::interval::{HeatRange, TemperatureRange},
};

use super::CurveError;

/// A `(heat, temperature)` point.
pub type Point = (f64, f64);

/// A straight line between two points of a TQ diagram.
pub type Line = (Point, Point);

/// One linear piece of a curve.
///
/// Temperature varies affinely with heat across the piece. A piece with a
/// zero-width temperature range is a phase change, and one with a zero-width
/// heat range is a temperature gap in a composite curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSegment {
    heat_range: HeatRange,
    temperature_range: TemperatureRange,
    owner: Option<StreamId>,
    state: StreamState,
    reboiler_or_reactor: bool,
}

impl PlotSegment {
    /// Creates a piece that belongs to no single stream.
    #[must_use]
    pub fn new(heat_range: HeatRange, temperature_range: TemperatureRange) -> Self {
        Self {
            heat_range,
            temperature_range,
            owner: None,
            state: StreamState::Unknown,
            reboiler_or_reactor: false,
        }
    }

    /// Creates a piece owned by `stream`.
    #[must_use]
    pub fn for_stream(
        heat_range: HeatRange,
        temperature_range: TemperatureRange,
        stream: &Stream,
    ) -> Self {
        Self {
            heat_range,
            temperature_range,
            owner: Some(stream.id().clone()),
            state: stream.state(),
            reboiler_or_reactor: stream.reboiler_or_reactor(),
        }
    }

    #[must_use]
    pub fn heat_range(&self) -> HeatRange {
        self.heat_range
    }

    #[must_use]
    pub fn temperature_range(&self) -> TemperatureRange {
        self.temperature_range
    }

    #[must_use]
    pub fn owner(&self) -> Option<&StreamId> {
        self.owner.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> StreamState {
        self.state
    }

    #[must_use]
    pub fn reboiler_or_reactor(&self) -> bool {
        self.reboiler_or_reactor
    }

    #[must_use]
    pub fn start_heat(&self) -> f64 {
        self.heat_range.start()
    }

    #[must_use]
    pub fn finish_heat(&self) -> f64 {
        self.heat_range.finish()
    }

    #[must_use]
    pub fn start_temperature(&self) -> f64 {
        self.temperature_range.start()
    }

    #[must_use]
    pub fn finish_temperature(&self) -> f64 {
        self.temperature_range.finish()
    }

    #[must_use]
    pub fn line(&self) -> Line {
        (
            (self.start_heat(), self.start_temperature()),
            (self.finish_heat(), self.finish_temperature()),
        )
    }

    /// Interpolates the temperature at `heat`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::HeatOutOfRange`] if `heat` is outside the piece.
    pub fn temperature_at_heat(&self, heat: f64) -> Result<f64, CurveError> {
        if !self.heat_range.contains(heat) {
            return Err(CurveError::HeatOutOfRange {
                heat,
                start: self.start_heat(),
                finish: self.finish_heat(),
            });
        }
        if self.heat_range.is_degenerate() {
            return Ok(self.start_temperature());
        }
        let slope = self.temperature_range.delta() / self.heat_range.delta();
        let rise = (heat - self.start_heat()) * slope;
        Ok(self.start_temperature() + rise)
    }

    /// Interpolates the heat at `temperature`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::TemperatureOutOfRange`] if `temperature` is
    /// outside the piece.
    pub fn heat_at_temperature(&self, temperature: f64) -> Result<f64, CurveError> {
        if !self.temperature_range.contains(temperature) {
            return Err(CurveError::TemperatureOutOfRange {
                temperature,
                start: self.start_temperature(),
                finish: self.finish_temperature(),
            });
        }
        if self.temperature_range.is_degenerate() {
            return Ok(self.start_heat());
        }
        let slope = self.heat_range.delta() / self.temperature_range.delta();
        let gain = (temperature - self.start_temperature()) * slope;
        Ok(self.start_heat() + gain)
    }

    /// Returns the part of this piece that lies over `heat_range`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::HeatOutOfRange`] if `heat_range` is not covered.
    pub fn slice(&self, heat_range: HeatRange) -> Result<Self, CurveError> {
        let temperature_range = TemperatureRange::new(
            self.temperature_at_heat(heat_range.start())?,
            self.temperature_at_heat(heat_range.finish())?,
        );
        Ok(self.with_ranges(heat_range, temperature_range))
    }

    /// Returns a copy with the same owner over different ranges.
    #[must_use]
    pub fn with_ranges(&self, heat_range: HeatRange, temperature_range: TemperatureRange) -> Self {
        Self {
            heat_range,
            temperature_range,
            ..self.clone()
        }
    }

    /// Returns a copy moved by `offset` along the heat axis.
    #[must_use]
    pub fn shift_heat(&self, offset: f64) -> Self {
        self.with_ranges(self.heat_range.shift(offset), self.temperature_range)
    }

    /// Returns `true` if `next` continues this piece for the same owner.
    #[must_use]
    pub fn mergeable(&self, next: &Self) -> bool {
        self.owner.is_some()
            && self.owner == next.owner
            && self.finish_heat() == next.start_heat()
            && self.finish_temperature() == next.start_temperature()
    }

    /// Joins this piece with the piece that continues it.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnmergeableSegments`] unless [`Self::mergeable`].
    pub fn merge(&self, next: &Self) -> Result<Self, CurveError> {
        if !self.mergeable(next) {
            return Err(CurveError::UnmergeableSegments {
                first: self.line(),
                second: next.line(),
            });
        }
        Ok(self.with_ranges(
            self.heat_range.merge(&next.heat_range)?,
            TemperatureRange::new(self.start_temperature(), next.finish_temperature()),
        ))
    }

    /// Orders by heat range, then by temperature range.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.heat_range
            .total_cmp(&other.heat_range)
            .then(self.temperature_range.total_cmp(&other.temperature_range))
    }
}

/// Returns the hot-minus-cold temperature differences at both ends.
#[must_use]
pub fn temperature_differences(hot: &PlotSegment, cold: &PlotSegment) -> (f64, f64) {
    (
        hot.start_temperature() - cold.start_temperature(),
        hot.finish_temperature() - cold.finish_temperature(),
    )
}

/// Slices `segments` onto each range, taking the first piece that covers it.
///
/// The result is aligned with `ranges`; a range no piece covers maps to `None`.
pub(crate) fn slice_onto(
    ranges: &[HeatRange],
    segments: &[PlotSegment],
) -> Result<Vec<Option<PlotSegment>>, CurveError> {
    ranges
        .iter()
        .map(|range| {
            segments
                .iter()
                .find(|segment| segment.heat_range.covers(range))
                .map(|segment| segment.slice(*range))
                .transpose()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::thermal::heat_integration::core::test_support::hot;

    fn segment(heats: (f64, f64), temperatures: (f64, f64)) -> PlotSegment {
        PlotSegment::new(
            HeatRange::new(heats.0, heats.1),
            TemperatureRange::new(temperatures.0, temperatures.1),
        )
    }

    #[test]
    fn differences_between_hot_and_cold() {
        let hot = segment((0.0, 100.0), (200.0, 300.0));
        let cold = segment((0.0, 100.0), (50.0, 100.0));
        assert_eq!(temperature_differences(&hot, &cold), (150.0, 200.0));
    }

    #[test]
    fn interpolation_inside_the_piece() {
        let piece = segment((0.0, 100.0), (300.0, 400.0));
        assert_relative_eq!(piece.temperature_at_heat(25.0).unwrap(), 325.0);
        assert_relative_eq!(piece.heat_at_temperature(350.0).unwrap(), 50.0);

        assert!(matches!(
            piece.heat_at_temperature(401.0),
            Err(CurveError::TemperatureOutOfRange { .. })
        ));
        assert!(matches!(
            piece.temperature_at_heat(-1.0),
            Err(CurveError::HeatOutOfRange { .. })
        ));
    }

    #[test]
    fn phase_change_piece_has_constant_temperature() {
        let piece = segment((200.0, 220.0), (40.0, 40.0));
        assert_eq!(piece.temperature_at_heat(210.0).unwrap(), 40.0);
        assert_eq!(piece.heat_at_temperature(40.0).unwrap(), 200.0);
    }

    #[test]
    fn merge_requires_shared_owner_and_touching_ends() {
        let stream = hot("h1", 500.0, 100.0, 400.0);
        let first = PlotSegment::for_stream(
            HeatRange::new(0.0, 100.0),
            TemperatureRange::new(100.0, 300.0),
            &stream,
        );
        let second = PlotSegment::for_stream(
            HeatRange::new(100.0, 200.0),
            TemperatureRange::new(300.0, 500.0),
            &stream,
        );

        let merged = first.merge(&second).unwrap();
        assert_eq!(merged.heat_range(), HeatRange::new(0.0, 200.0));
        assert_eq!(
            merged.temperature_range(),
            TemperatureRange::new(100.0, 500.0)
        );
        assert_eq!(merged.owner(), Some(&StreamId::from("h1")));

        let anonymous = segment((100.0, 200.0), (300.0, 500.0));
        assert!(!first.mergeable(&anonymous));
        assert!(matches!(
            first.merge(&anonymous),
            Err(CurveError::UnmergeableSegments { .. })
        ));
    }

    #[test]
    fn slicing_onto_a_partition() {
        let curve = [
            segment((0.0, 50.0), (0.0, 10.0)),
            segment((50.0, 50.0), (10.0, 20.0)),
            segment((50.0, 150.0), (20.0, 30.0)),
        ];
        let ranges = [
            HeatRange::new(0.0, 25.0),
            HeatRange::new(25.0, 100.0),
            HeatRange::new(50.0, 100.0),
            HeatRange::new(150.0, 160.0),
        ];

        let slices = slice_onto(&ranges, &curve).unwrap();
        assert_eq!(slices[0], Some(segment((0.0, 25.0), (0.0, 5.0))));
        assert_eq!(slices[1], None);
        assert_eq!(slices[2], Some(segment((50.0, 100.0), (20.0, 25.0))));
        assert_eq!(slices[3], None);
    }
}
