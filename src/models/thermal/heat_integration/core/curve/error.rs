use thiserror::Error;

use crate::{
    models::thermal::heat_integration::core::stream::StreamError,
    support::interval::IntervalError,
};

use super::Line;

/// Errors raised while building, slicing, or aligning curves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// More than two isothermal breakpoints share one temperature.
    #[error("too many duplicate temperatures: temperature={temperature} count={count}")]
    TooManyDuplicateTemperatures { temperature: f64, count: usize },

    /// A composite curve was requested for hot and cold streams together.
    #[error("composite curve streams must all be hot or all be cold")]
    MixedRoles,

    /// A curve has a gap or overlap on the heat axis.
    #[error("{curve} curve is not heat-continuous: finish={finish} next_start={next_start}")]
    NotHeatContinuous {
        curve: &'static str,
        finish: f64,
        next_start: f64,
    },

    /// No piece of a curve carries heat at the pinch temperature.
    #[error("{curve} curve does not reach the pinch: temperature={temperature}")]
    PinchNotOnCurve {
        curve: &'static str,
        temperature: f64,
    },

    #[error("heat outside plot segment: heat={heat} range=({start}, {finish})")]
    HeatOutOfRange { heat: f64, start: f64, finish: f64 },

    #[error(
        "temperature outside plot segment: temperature={temperature} range=({start}, {finish})"
    )]
    TemperatureOutOfRange {
        temperature: f64,
        start: f64,
        finish: f64,
    },

    /// Plot segments do not share an owner or do not touch.
    #[error("unmergeable plot segments: first={first:?} second={second:?}")]
    UnmergeableSegments { first: Line, second: Line },

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}
