//! Orchestrates one pinch analysis from validated streams to exchangers.

mod config;
mod error;
mod tq;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use tq::{TqDetail, TqLines};

use std::collections::HashSet;

use tracing::debug;

use crate::support::{
    constraint::NonNegative,
    interval::{HeatRange, TemperatureRange, merged_ranges, round},
};

use super::{
    cascade::{CascadeError, GrandCompositeCurve},
    curve::{
        CurveError, PlotSegment, align_curves, composite_curve, slice_onto,
        temperature_differences,
    },
    exchanger::HeatExchanger,
    segment::{MergedCurves, Segment, decompose, merge_segments},
    stream::Stream,
};

/// Results of a pinch analysis at one minimum approach temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    min_approach_temperature: f64,
    admissible_range: TemperatureRange,
    grand_composite_curve: GrandCompositeCurve,
    pinch_temperature: f64,
    streams: Vec<Stream>,
    segments: Vec<Segment>,
    merged: MergedCurves,
    exchangers: Vec<HeatExchanger>,
}

impl Analysis {
    /// Runs the analysis.
    ///
    /// The caller's streams are copied up front. The steps are:
    ///
    /// 1. Validate ids, stream groups, and temperature overlap.
    /// 2. Check the minimum approach temperature against its admissible range.
    /// 3. Cascade the process streams and allocate duty to external streams.
    ///    External streams left without duty are dropped.
    /// 4. Build the hot and cold composites and align them at the pinch.
    /// 5. Decompose, split, and merge the aligned curves.
    /// 6. Size an exchanger for every matched pair.
    ///
    /// A zero approach temperature is admissible when the unshifted
    /// composites touch or cross, but such a network has an exchanger with no
    /// driving force at one end, so sizing fails.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] for invalid input or if any step fails,
    /// including [`ExchangerError::NonPositiveApproach`] when the minimum
    /// approach temperature leaves a matched pair without a positive
    /// temperature difference at both ends.
    ///
    /// [`ExchangerError::NonPositiveApproach`]: super::ExchangerError::NonPositiveApproach
    pub fn new(streams: &[Stream], config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let min_approach_temperature = NonNegative::new(config.min_approach_temperature)
            .map_err(|source| AnalysisError::MinApproachTemperature {
                value: config.min_approach_temperature,
                source,
            })?
            .into_inner();

        let streams = streams.to_vec();
        validate(&streams, config.force_validation)?;

        let admissible_range = min_approach_temperature_range(&streams)?;
        if !admissible_range.contains(min_approach_temperature) {
            return Err(AnalysisError::OutOfRange {
                value: min_approach_temperature,
                lower: admissible_range.start(),
                upper: admissible_range.finish(),
            });
        }
        debug!(
            min_approach_temperature,
            lower = admissible_range.start(),
            upper = admissible_range.finish(),
            "validated streams"
        );

        let grand_composite_curve = GrandCompositeCurve::new(&streams, min_approach_temperature)?;
        let allocations = grand_composite_curve.solve_external_heat()?;

        let mut resolved = Vec::with_capacity(streams.len());
        for mut stream in streams {
            if let Some(allocation) = allocations
                .iter()
                .find(|allocation| &allocation.id == stream.id())
            {
                stream.update_heat(allocation.heat_duty.into_inner())?;
            }
            if stream.heat_duty() != 0.0 {
                resolved.push(stream);
            }
        }

        let (hot_streams, cold_streams) = ordered_groups(&resolved);
        let (pinch_temperature, hot_curve, cold_curve) = align_at_pinch(
            &grand_composite_curve,
            &composite_curve(&hot_streams)?,
            &composite_curve(&cold_streams)?,
            min_approach_temperature,
        )?;
        debug!(
            pinch_temperature,
            hot_pieces = hot_curve.len(),
            cold_pieces = cold_curve.len(),
            "aligned composite curves"
        );

        let mut segments = decompose(&hot_curve, &cold_curve, &hot_streams, &cold_streams)?;
        for segment in &mut segments {
            segment.split(min_approach_temperature);
        }
        let merged = merge_segments(&segments)?;
        debug!(
            segments = segments.len(),
            matched = merged.matched.len(),
            "merged segments"
        );

        let exchangers = merged
            .matched
            .iter()
            .cloned()
            .map(|(hot, cold)| HeatExchanger::new(hot, cold, config.ignore_unknown_coefficients))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = exchangers.len(), "sized heat exchangers");

        Ok(Self {
            min_approach_temperature,
            admissible_range,
            grand_composite_curve,
            pinch_temperature,
            streams: resolved,
            segments,
            merged,
            exchangers,
        })
    }

    #[must_use]
    pub fn min_approach_temperature(&self) -> f64 {
        self.min_approach_temperature
    }

    /// Range of minimum approach temperatures these streams accept.
    #[must_use]
    pub fn admissible_range(&self) -> TemperatureRange {
        self.admissible_range
    }

    /// Pinch temperature the composites were aligned at, on the shifted scale.
    ///
    /// This is the highest pinch that both composites reach.
    #[must_use]
    pub fn pinch_temperature(&self) -> f64 {
        self.pinch_temperature
    }

    #[must_use]
    pub fn grand_composite_curve(&self) -> &GrandCompositeCurve {
        &self.grand_composite_curve
    }

    #[must_use]
    pub fn external_heating_demand(&self) -> f64 {
        self.grand_composite_curve.external_heating_demand()
    }

    #[must_use]
    pub fn external_cooling_demand(&self) -> f64 {
        self.grand_composite_curve.external_cooling_demand()
    }

    /// Every stream with duty, external ones carrying their allocation.
    #[must_use]
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// External streams that received duty.
    pub fn external_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(|stream| stream.is_external())
    }

    /// Summed utility cost of all external streams.
    #[must_use]
    pub fn utility_cost(&self) -> f64 {
        self.external_streams().map(Stream::utility_cost).sum()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn tq_lines(&self, detail: TqDetail) -> TqLines {
        TqLines::new(&self.segments, &self.merged, detail)
    }

    #[must_use]
    pub fn exchangers(&self) -> &[HeatExchanger] {
        &self.exchangers
    }

    /// Summed capital cost of all exchangers.
    #[must_use]
    pub fn capital_cost(&self) -> f64 {
        self.exchangers.iter().map(HeatExchanger::cost).sum()
    }
}

/// Aligns the composites at the highest pinch temperature both curves reach.
fn align_at_pinch(
    grand_composite_curve: &GrandCompositeCurve,
    hot: &[PlotSegment],
    cold: &[PlotSegment],
    min_approach_temperature: f64,
) -> Result<(f64, Vec<PlotSegment>, Vec<PlotSegment>), AnalysisError> {
    let mut error = AnalysisError::from(CascadeError::PinchNotComputed);
    for pinch in grand_composite_curve.pinch_temperatures().into_iter().rev() {
        match align_curves(hot, cold, min_approach_temperature, pinch) {
            Ok((hot, cold)) => return Ok((pinch, hot, cold)),
            Err(missed @ CurveError::PinchNotOnCurve { .. }) => {
                debug!(pinch, "pinch not on both composites");
                error = missed.into();
            }
            Err(other) => return Err(other.into()),
        }
    }
    Err(error)
}

/// Range of minimum approach temperatures the process streams accept.
///
/// The upper bound is the hottest hot inlet less the coldest cold inlet. The
/// lower bound is the smallest vertical distance between the hot and cold
/// composites when they are aligned at their hot end, floored at zero. The
/// cold composite is moved to end with the hot one when the hot side carries
/// at least as much duty, and both start at zero heat otherwise.
///
/// The lower bound is zero whenever the composites touch or cross. It is
/// admissible, but [`Analysis::new`] can only size a network there if no
/// matched pair ends up with a zero temperature difference.
///
/// # Errors
///
/// Returns [`AnalysisError::Infeasible`] if no hot inlet is above the coldest
/// cold inlet, or another [`AnalysisError`] if either process group is empty
/// or a composite cannot be built.
pub fn min_approach_temperature_range(
    streams: &[Stream],
) -> Result<TemperatureRange, AnalysisError> {
    let internal: Vec<Stream> = streams
        .iter()
        .filter(|stream| stream.is_internal())
        .cloned()
        .collect();
    let (hot, cold) = ordered_groups(&internal);
    let (Some(first_hot), Some(first_cold)) = (hot.first(), cold.first()) else {
        return Err(if hot.is_empty() {
            AnalysisError::MissingHotStreams
        } else {
            AnalysisError::MissingColdStreams
        });
    };

    let hot_curve = composite_curve(&hot)?;
    let mut cold_curve = composite_curve(&cold)?;

    let total = |curve: &[PlotSegment]| curve.last().map_or(0.0, PlotSegment::finish_heat);
    let (hot_total, cold_total) = (total(&hot_curve), total(&cold_curve));
    if hot_total >= cold_total {
        let gap = round(hot_total - cold_total);
        cold_curve = cold_curve
            .iter()
            .map(|piece| piece.shift_heat(gap))
            .collect();
    }

    let hot_ranges: Vec<HeatRange> = hot_curve.iter().map(PlotSegment::heat_range).collect();
    let cold_ranges: Vec<HeatRange> = cold_curve.iter().map(PlotSegment::heat_range).collect();
    let ranges = merged_ranges(&[&hot_ranges, &cold_ranges])?;

    let minimum = slice_onto(&ranges, &hot_curve)?
        .iter()
        .zip(slice_onto(&ranges, &cold_curve)?)
        .filter_map(|(hot, cold)| Some(temperature_differences(hot.as_ref()?, cold.as_ref()?)))
        .flat_map(|(start, finish)| [start, finish])
        .fold(f64::INFINITY, f64::min);

    let hot_max = hot
        .iter()
        .map(Stream::inlet_temperature)
        .fold(first_hot.inlet_temperature(), f64::max);
    let cold_min = cold
        .iter()
        .map(Stream::inlet_temperature)
        .fold(first_cold.inlet_temperature(), f64::min);
    if hot_max <= cold_min {
        return Err(AnalysisError::Infeasible { hot_max, cold_min });
    }

    Ok(TemperatureRange::new(minimum.max(0.0), hot_max - cold_min))
}

fn validate(streams: &[Stream], force_validation: bool) -> Result<(), AnalysisError> {
    let mut ids = HashSet::with_capacity(streams.len());
    for stream in streams {
        if !ids.insert(stream.id()) {
            return Err(AnalysisError::DuplicateStreamId {
                id: stream.id().clone(),
            });
        }
    }

    let hot: Vec<&Stream> = streams
        .iter()
        .filter(|stream| stream.is_internal() && stream.is_hot())
        .collect();
    let cold: Vec<&Stream> = streams
        .iter()
        .filter(|stream| stream.is_internal() && stream.is_cold())
        .collect();
    if hot.is_empty() {
        return Err(AnalysisError::MissingHotStreams);
    }
    if cold.is_empty() {
        return Err(AnalysisError::MissingColdStreams);
    }

    let extreme = |group: &[&Stream], temperature: fn(&Stream) -> f64, pick: fn(f64, f64) -> f64| {
        group
            .iter()
            .map(|stream| temperature(stream))
            .reduce(pick)
            .unwrap_or_default()
    };
    let hot_max = extreme(&hot, Stream::inlet_temperature, f64::max);
    let hot_min = extreme(&hot, Stream::outlet_temperature, f64::min);
    let cold_min = extreme(&cold, Stream::inlet_temperature, f64::min);
    let cold_max = extreme(&cold, Stream::outlet_temperature, f64::max);

    if hot_max <= cold_min {
        return Err(AnalysisError::Infeasible { hot_max, cold_min });
    }

    let has_external = streams.iter().any(Stream::is_external);
    if !(has_external || force_validation) && (hot_min < cold_min || hot_max < cold_max) {
        return Err(AnalysisError::TemperatureOverlap {
            hot_min,
            hot_max,
            cold_min,
            cold_max,
        });
    }
    Ok(())
}

/// Splits streams into hot ones ordered by (outlet, id) and cold ones ordered
/// by (inlet, id).
fn ordered_groups(streams: &[Stream]) -> (Vec<Stream>, Vec<Stream>) {
    let (mut hot, mut cold): (Vec<Stream>, Vec<Stream>) =
        streams.iter().cloned().partition(Stream::is_hot);
    hot.sort_by(|a, b| {
        a.outlet_temperature()
            .total_cmp(&b.outlet_temperature())
            .then_with(|| a.id().cmp(b.id()))
    });
    cold.sort_by(|a, b| {
        a.inlet_temperature()
            .total_cmp(&b.inlet_temperature())
            .then_with(|| a.id().cmp(b.id()))
    });
    (hot, cold)
}
