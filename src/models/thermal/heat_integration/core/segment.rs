//! Decomposition of aligned composite curves into matched intervals.
//!
//! The shifted hot and cold composites are cut at every heat breakpoint of
//! either curve. Each atomic interval becomes a [`Segment`] that attributes
//! its composite pieces back to the streams that carry them, first as one
//! piece per stream laid end to end ("separated"), then with any piece that
//! comes closer than the minimum approach temperature widened to the full
//! temperature span of the interval ("split"). [`merge_segments`] then joins
//! neighboring intervals served by the same pair of streams.

mod merge;

pub use merge::{MergedCurves, merge_segments};

use tracing::trace;

use crate::support::interval::{HeatRange, TemperatureRange, merged_ranges};

use super::{
    curve::{CurveError, PlotSegment, slice_onto, temperature_differences},
    stream::{Stream, StreamId},
};

/// Slack on the approach check so pieces that touch at exactly the minimum
/// approach temperature are left alone.
const SPLIT_TOLERANCE: f64 = 1e-6;

/// One side of a segment: the composite piece and the streams behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSide {
    plot_segment: PlotSegment,
    streams: Vec<Stream>,
    pieces: Vec<PlotSegment>,
}

impl SegmentSide {
    /// Attributes a composite piece to the streams that carry it.
    ///
    /// Sloped pieces take every non-isothermal stream spanning them, narrowed
    /// to the piece. Phase-change pieces take the isothermal streams at their
    /// temperature, sharing the piece's duty in proportion to their own.
    /// Streams then receive consecutive heat sub-ranges in the given order,
    /// the last one absorbing any rounding remainder.
    ///
    /// # Errors
    ///
    /// Returns a [`CurveError`] if a stream copy cannot be narrowed.
    pub fn new(plot_segment: PlotSegment, streams: &[Stream]) -> Result<Self, CurveError> {
        let temperature_range = plot_segment.temperature_range();
        let heat_range = plot_segment.heat_range();

        let mut contributing = Vec::new();
        if temperature_range.is_degenerate() {
            let latent: Vec<&Stream> = streams
                .iter()
                .filter(|stream| stream.is_isothermal() && stream.spans(&temperature_range))
                .collect();
            let total: f64 = latent.iter().map(|stream| stream.heat_duty()).sum();
            for stream in latent {
                let mut copy = stream.clone();
                if total > 0.0 {
                    copy.update_heat(heat_range.delta() * stream.heat_duty() / total)?;
                }
                contributing.push(copy);
            }
        } else {
            for stream in streams
                .iter()
                .filter(|stream| !stream.is_isothermal() && stream.spans(&temperature_range))
            {
                let mut copy = stream.clone();
                copy.update_temperature(temperature_range.start(), temperature_range.finish())?;
                contributing.push(copy);
            }
        }

        let mut start = heat_range.start();
        let last = contributing.len().saturating_sub(1);
        let pieces = contributing
            .iter()
            .enumerate()
            .map(|(index, stream)| {
                let finish = if index == last {
                    heat_range.finish()
                } else {
                    (start + stream.heat_duty()).min(heat_range.finish())
                };
                let range = HeatRange::new(start, finish);
                start = range.finish();
                PlotSegment::for_stream(range, temperature_range, stream)
            })
            .collect();

        Ok(Self {
            plot_segment,
            streams: contributing,
            pieces,
        })
    }

    /// The composite piece over this segment.
    #[must_use]
    pub fn plot_segment(&self) -> &PlotSegment {
        &self.plot_segment
    }

    /// Stream copies narrowed to this segment.
    #[must_use]
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// One piece per stream, laid end to end along the heat axis.
    #[must_use]
    pub fn pieces(&self) -> &[PlotSegment] {
        &self.pieces
    }
}

/// One atomic heat interval of the aligned curves.
///
/// The separated and split pieces are aligned with [`Segment::heat_ranges`],
/// the finest partition of the interval by either side's stream pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    heat_range: HeatRange,
    hot: Option<SegmentSide>,
    cold: Option<SegmentSide>,
    heat_ranges: Vec<HeatRange>,
    hot_separated: Vec<Option<PlotSegment>>,
    cold_separated: Vec<Option<PlotSegment>>,
    hot_split: Vec<Option<PlotSegment>>,
    cold_split: Vec<Option<PlotSegment>>,
}

impl Segment {
    /// Builds a segment from whichever sides cover `heat_range`.
    ///
    /// # Errors
    ///
    /// Returns a [`CurveError`] if the stream pieces cannot be aligned.
    pub fn new(
        heat_range: HeatRange,
        hot: Option<SegmentSide>,
        cold: Option<SegmentSide>,
    ) -> Result<Self, CurveError> {
        let piece_ranges = |side: &Option<SegmentSide>| -> Vec<HeatRange> {
            side.iter()
                .flat_map(|side| side.pieces.iter().map(PlotSegment::heat_range))
                .collect()
        };
        let hot_ranges = piece_ranges(&hot);
        let cold_ranges = piece_ranges(&cold);

        let mut heat_ranges = merged_ranges(&[&hot_ranges, &cold_ranges])?;
        if heat_ranges.is_empty() {
            heat_ranges.push(heat_range);
        }

        let separate = |side: &Option<SegmentSide>| match side {
            Some(side) => slice_onto(&heat_ranges, &side.pieces),
            None => Ok(vec![None; heat_ranges.len()]),
        };
        let hot_separated = separate(&hot)?;
        let cold_separated = separate(&cold)?;

        Ok(Self {
            heat_range,
            hot_split: hot_separated.clone(),
            cold_split: cold_separated.clone(),
            hot,
            cold,
            heat_ranges,
            hot_separated,
            cold_separated,
        })
    }

    #[must_use]
    pub fn heat_range(&self) -> HeatRange {
        self.heat_range
    }

    #[must_use]
    pub fn hot(&self) -> Option<&SegmentSide> {
        self.hot.as_ref()
    }

    #[must_use]
    pub fn cold(&self) -> Option<&SegmentSide> {
        self.cold.as_ref()
    }

    /// Returns `true` if both curves cover this segment.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.hot.is_some() && self.cold.is_some()
    }

    #[must_use]
    pub fn heat_ranges(&self) -> &[HeatRange] {
        &self.heat_ranges
    }

    #[must_use]
    pub fn hot_separated(&self) -> &[Option<PlotSegment>] {
        &self.hot_separated
    }

    #[must_use]
    pub fn cold_separated(&self) -> &[Option<PlotSegment>] {
        &self.cold_separated
    }

    #[must_use]
    pub fn hot_split(&self) -> &[Option<PlotSegment>] {
        &self.hot_split
    }

    #[must_use]
    pub fn cold_split(&self) -> &[Option<PlotSegment>] {
        &self.cold_split
    }

    /// Widens pieces that violate the minimum approach temperature.
    ///
    /// When a matched pair comes closer than `min_approach_temperature` at
    /// either end, both pieces are replaced by the full temperature span of
    /// their side, and so is every other piece in this segment owned by the
    /// same stream. Passes repeat until nothing changes, so a widening made
    /// late in a pass is checked against earlier pieces too. Heat ranges, and
    /// with them duties, are untouched.
    pub fn split(&mut self, min_approach_temperature: f64) {
        let mut hot = self.hot_separated.clone();
        let mut cold = self.cold_separated.clone();

        if let (Some(hot_side), Some(cold_side)) = (&self.hot, &self.cold) {
            let hot_span = hot_side.plot_segment.temperature_range();
            let cold_span = cold_side.plot_segment.temperature_range();

            loop {
                let mut changed = false;
                for index in 0..self.heat_ranges.len() {
                    let (Some(hot_piece), Some(cold_piece)) = (&hot[index], &cold[index]) else {
                        continue;
                    };
                    let (start, finish) = temperature_differences(hot_piece, cold_piece);
                    if start.min(finish) + SPLIT_TOLERANCE >= min_approach_temperature {
                        continue;
                    }

                    let hot_owner = hot_piece.owner().cloned();
                    let cold_owner = cold_piece.owner().cloned();
                    trace!(
                        heat_range = %self.heat_ranges[index],
                        ?hot_owner,
                        ?cold_owner,
                        start,
                        finish,
                        "forcing full span"
                    );
                    changed |= force_full_span(&mut hot, index, hot_owner.as_ref(), hot_span);
                    changed |= force_full_span(&mut cold, index, cold_owner.as_ref(), cold_span);
                }
                if !changed {
                    break;
                }
            }
        }

        self.hot_split = hot;
        self.cold_split = cold;
    }
}

/// Widens the piece at `index` and every piece sharing its owner.
fn force_full_span(
    pieces: &mut [Option<PlotSegment>],
    index: usize,
    owner: Option<&StreamId>,
    span: TemperatureRange,
) -> bool {
    let mut changed = false;
    for (position, slot) in pieces.iter_mut().enumerate() {
        let Some(piece) = slot.as_ref() else {
            continue;
        };
        let targeted = position == index || (owner.is_some() && piece.owner() == owner);
        if targeted && piece.temperature_range() != span {
            let widened = piece.with_ranges(piece.heat_range(), span);
            *slot = Some(widened);
            changed = true;
        }
    }
    changed
}

/// Cuts the aligned curves into segments.
///
/// `hot_streams` and `cold_streams` fix the order in which streams receive
/// heat inside each segment.
///
/// # Errors
///
/// Returns a [`CurveError`] if either curve is not heat-continuous.
pub fn decompose(
    hot_curve: &[PlotSegment],
    cold_curve: &[PlotSegment],
    hot_streams: &[Stream],
    cold_streams: &[Stream],
) -> Result<Vec<Segment>, CurveError> {
    let hot_ranges: Vec<HeatRange> = hot_curve.iter().map(PlotSegment::heat_range).collect();
    let cold_ranges: Vec<HeatRange> = cold_curve.iter().map(PlotSegment::heat_range).collect();
    let ranges = merged_ranges(&[&hot_ranges, &cold_ranges])?;

    let hot_slices = slice_onto(&ranges, hot_curve)?;
    let cold_slices = slice_onto(&ranges, cold_curve)?;

    ranges
        .into_iter()
        .zip(hot_slices.into_iter().zip(cold_slices))
        .map(|(range, (hot, cold))| {
            let hot = hot
                .map(|piece| SegmentSide::new(piece, hot_streams))
                .transpose()?;
            let cold = cold
                .map(|piece| SegmentSide::new(piece, cold_streams))
                .transpose()?;
            Segment::new(range, hot, cold)
        })
        .collect()
}
