use crate::models::thermal::heat_integration::core::{
    curve::{Line, PlotSegment},
    segment::{MergedCurves, Segment, SegmentSide},
};

/// How far a TQ diagram has been carried through network synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TqDetail {
    /// The aligned composite curves, cut at every heat breakpoint.
    Composite,
    /// One piece per stream in each interval.
    Separated,
    /// Separated pieces widened where they violate the minimum approach.
    Split,
    /// Split pieces joined into exchanger-sized spans.
    Merged,
}

/// Hot and cold lines of a TQ diagram, each ordered by heat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TqLines {
    pub hot: Vec<Line>,
    pub cold: Vec<Line>,
}

impl TqLines {
    pub(super) fn new(segments: &[Segment], merged: &MergedCurves, detail: TqDetail) -> Self {
        match detail {
            TqDetail::Composite => Self {
                hot: composite(segments, Segment::hot),
                cold: composite(segments, Segment::cold),
            },
            TqDetail::Separated => Self {
                hot: pieces(segments, Segment::hot_separated),
                cold: pieces(segments, Segment::cold_separated),
            },
            TqDetail::Split => Self {
                hot: pieces(segments, Segment::hot_split),
                cold: pieces(segments, Segment::cold_split),
            },
            TqDetail::Merged => Self {
                hot: merged.hot.iter().map(PlotSegment::line).collect(),
                cold: merged.cold.iter().map(PlotSegment::line).collect(),
            },
        }
    }
}

fn composite(segments: &[Segment], side: fn(&Segment) -> Option<&SegmentSide>) -> Vec<Line> {
    segments
        .iter()
        .filter_map(side)
        .map(|side| side.plot_segment().line())
        .collect()
}

fn pieces(segments: &[Segment], side: fn(&Segment) -> &[Option<PlotSegment>]) -> Vec<Line> {
    segments
        .iter()
        .flat_map(|segment| side(segment).iter().flatten())
        .map(PlotSegment::line)
        .collect()
}
