//! Pinch analysis for heat-exchanger network synthesis.
//!
//! [`PinchAnalysis`] is the [`twine_core::Model`] entry point. Given process
//! streams and optional utilities, it targets the minimum external heating and
//! cooling, locates the pinch, and synthesizes one feasible network of heat
//! exchangers with estimated area and capital cost. The computational core is
//! in the internal `core` module; the same engine is available directly
//! through [`Analysis::new`].
//!
//! # Example
//!
//! ```
//! use twine_core::Model;
//! use twine_pinch::models::thermal::heat_integration::{
//!     AnalysisConfig, PinchAnalysis, Stream, StreamDescriptor, TqDetail,
//! };
//!
//! let streams = [
//!     ("c1", 40.0, 90.0, 150.0),
//!     ("c2", 80.0, 110.0, 180.0),
//!     ("h1", 125.0, 80.0, 180.0),
//!     ("h2", 100.0, 60.0, 160.0),
//! ]
//! .into_iter()
//! .map(|(id, inlet, outlet, duty)| Stream::new(StreamDescriptor::new(id, inlet, outlet, duty)))
//! .collect::<Result<Vec<_>, _>>()?;
//!
//! let analysis = PinchAnalysis::new(AnalysisConfig::new(10.0)).call(&streams)?;
//!
//! assert_eq!(analysis.pinch_temperature(), 90.0);
//! assert_eq!(analysis.external_heating_demand(), 30.0);
//! assert_eq!(analysis.external_cooling_demand(), 40.0);
//! assert!(!analysis.tq_lines(TqDetail::Merged).hot.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub(crate) mod core;

pub use self::core::{
    Allocation, Analysis, AnalysisConfig, AnalysisError, CascadeError, CurveError,
    ExchangerError, GrandCompositeCurve, HeatExchanger, Line, MergedCurves, PlotSegment, Point,
    Segment, SegmentSide, Stream, StreamDescriptor, StreamError, StreamId, StreamRole,
    StreamState, TqDetail, TqLines, Utility, align_curves, composite_curve, counterflow_lmtd,
    decompose, merge_segments, min_approach_temperature_range, overall_heat_transfer_coefficient,
    parallel_flow_lmtd, temperature_differences,
};

use twine_core::Model;

/// Pinch analysis at a fixed configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchAnalysis {
    config: AnalysisConfig,
}

impl PinchAnalysis {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl Model for PinchAnalysis {
    type Input = Vec<Stream>;
    type Output = Analysis;
    type Error = AnalysisError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Analysis::new(input, &self.config)
    }
}
