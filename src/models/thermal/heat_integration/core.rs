//! Pinch analysis engine.
//!
//! Streams pass through the phases in order: the cascade targets utilities
//! and finds the pinch, the composites are built and aligned at the pinch,
//! the aligned curves are decomposed into matched intervals, and the matched
//! intervals are sized as heat exchangers. Each phase works on its own copies
//! of the streams and curves it receives.

mod analyzer;
mod cascade;
mod curve;
mod exchanger;
mod segment;
mod stream;
mod utilities;

#[cfg(test)]
mod test_support;

pub use analyzer::{
    Analysis, AnalysisConfig, AnalysisError, TqDetail, TqLines, min_approach_temperature_range,
};
pub use cascade::{Allocation, CascadeError, GrandCompositeCurve};
pub use curve::{
    CurveError, Line, PlotSegment, Point, align_curves, composite_curve, temperature_differences,
};
pub use exchanger::{
    ExchangerError, HeatExchanger, counterflow_lmtd, overall_heat_transfer_coefficient,
    parallel_flow_lmtd,
};
pub use segment::{MergedCurves, Segment, SegmentSide, decompose, merge_segments};
pub use stream::{Stream, StreamDescriptor, StreamError, StreamId, StreamRole, StreamState};
pub use utilities::Utility;
