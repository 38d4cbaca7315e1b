use crate::models::thermal::heat_integration::core::curve::{CurveError, PlotSegment};

use super::Segment;

/// Split pieces after joining neighbors served by the same pair of streams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedCurves {
    /// Every hot piece, matched or not, in heat order.
    pub hot: Vec<PlotSegment>,

    /// Every cold piece, matched or not, in heat order.
    pub cold: Vec<PlotSegment>,

    /// Hot and cold pieces over the same heat range; one per exchanger.
    pub matched: Vec<(PlotSegment, PlotSegment)>,
}

/// Joins heat-adjacent split pieces when both sides continue the same stream.
///
/// The walk goes through every segment's pieces in heat order. A matched pair
/// is absorbed into the pair before it when the hot pieces and the cold
/// pieces are each mergeable; anything else closes the running pair. Pieces
/// with no counterpart are carried through unchanged.
///
/// # Errors
///
/// Returns a [`CurveError`] if two pieces judged mergeable fail to merge.
pub fn merge_segments(segments: &[Segment]) -> Result<MergedCurves, CurveError> {
    let mut merged = MergedCurves::default();
    let mut running: Option<(PlotSegment, PlotSegment)> = None;

    let pairs = segments.iter().flat_map(|segment| {
        segment
            .hot_split()
            .iter()
            .cloned()
            .zip(segment.cold_split().iter().cloned())
    });

    for pair in pairs {
        match pair {
            (Some(hot), Some(cold)) => {
                running = match running.take() {
                    Some((running_hot, running_cold))
                        if running_hot.mergeable(&hot) && running_cold.mergeable(&cold) =>
                    {
                        Some((running_hot.merge(&hot)?, running_cold.merge(&cold)?))
                    }
                    Some(closed) => {
                        merged.close(closed);
                        Some((hot, cold))
                    }
                    None => Some((hot, cold)),
                };
            }
            (hot, cold) => {
                if let Some(closed) = running.take() {
                    merged.close(closed);
                }
                merged.hot.extend(hot);
                merged.cold.extend(cold);
            }
        }
    }
    if let Some(closed) = running {
        merged.close(closed);
    }

    merged.hot.sort_by(PlotSegment::total_cmp);
    merged.cold.sort_by(PlotSegment::total_cmp);
    Ok(merged)
}

impl MergedCurves {
    fn close(&mut self, (hot, cold): (PlotSegment, PlotSegment)) {
        self.hot.push(hot.clone());
        self.cold.push(cold.clone());
        self.matched.push((hot, cold));
    }
}
