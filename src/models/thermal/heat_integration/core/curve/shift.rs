use tracing::debug;

use crate::support::interval::{HeatRange, first_gap, round};

use super::{CurveError, PlotSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Hot,
    Cold,
}

impl Side {
    fn name(self) -> &'static str {
        match self {
            Side::Hot => "hot",
            Side::Cold => "cold",
        }
    }
}

/// Moves the cold composite along the heat axis so it meets the hot one at
/// the pinch.
///
/// The hot curve is located at `pinch_temperature` and the cold curve at
/// `pinch_temperature - min_approach_temperature`; the cold curve is then
/// shifted by the heat gap between the two points. Both curves are returned
/// sorted by heat.
///
/// # Errors
///
/// Returns a [`CurveError`] if either curve has a heat gap or does not reach
/// its pinch temperature.
pub fn align_curves(
    hot: &[PlotSegment],
    cold: &[PlotSegment],
    min_approach_temperature: f64,
    pinch_temperature: f64,
) -> Result<(Vec<PlotSegment>, Vec<PlotSegment>), CurveError> {
    let hot = sorted_continuous(hot, Side::Hot)?;
    let cold = sorted_continuous(cold, Side::Cold)?;

    let hot_heat = heat_at_pinch(&hot, pinch_temperature, Side::Hot)?;
    let cold_heat = heat_at_pinch(
        &cold,
        round(pinch_temperature - min_approach_temperature),
        Side::Cold,
    )?;

    let gap = round(hot_heat - cold_heat);
    debug!(pinch_temperature, gap, "shifted cold composite");
    let cold = cold.iter().map(|segment| segment.shift_heat(gap)).collect();
    Ok((hot, cold))
}

fn sorted_continuous(curve: &[PlotSegment], side: Side) -> Result<Vec<PlotSegment>, CurveError> {
    let mut curve = curve.to_vec();
    curve.sort_by(PlotSegment::total_cmp);

    let heat_ranges: Vec<HeatRange> = curve.iter().map(PlotSegment::heat_range).collect();
    if let Some((finish, next_start)) = first_gap(&heat_ranges) {
        return Err(CurveError::NotHeatContinuous {
            curve: side.name(),
            finish,
            next_start,
        });
    }
    Ok(curve)
}

/// Finds the heat on `curve` at `temperature`.
///
/// Pieces without duty are skipped. A phase-change piece at `temperature`
/// wins over sloped pieces: the hot curve takes its finish heat and the cold
/// curve its start heat, the ends that face the other curve.
fn heat_at_pinch(curve: &[PlotSegment], temperature: f64, side: Side) -> Result<f64, CurveError> {
    let mut interpolated = None;
    for segment in curve {
        if !segment.temperature_range().contains(temperature)
            || segment.heat_range().is_degenerate()
        {
            continue;
        }
        if segment.temperature_range().is_degenerate() {
            return Ok(match side {
                Side::Hot => segment.finish_heat(),
                Side::Cold => segment.start_heat(),
            });
        }
        if interpolated.is_none() {
            interpolated = Some(segment.heat_at_temperature(temperature)?);
        }
    }

    interpolated.ok_or(CurveError::PinchNotOnCurve {
        curve: side.name(),
        temperature,
    })
}
