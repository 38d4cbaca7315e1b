use thiserror::Error;

use crate::{
    models::thermal::heat_integration::core::{
        cascade::CascadeError, curve::CurveError, exchanger::ExchangerError, stream::StreamError,
        stream::StreamId,
    },
    support::{constraint::ConstraintError, interval::IntervalError},
};

/// Errors raised by a pinch analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Two streams share an id.
    #[error("duplicate stream id: {id}")]
    DuplicateStreamId { id: StreamId },

    /// No internal hot stream was given.
    #[error("at least one internal hot stream is required")]
    MissingHotStreams,

    /// No internal cold stream was given.
    #[error("at least one internal cold stream is required")]
    MissingColdStreams,

    /// The minimum approach temperature is negative or `NaN`.
    #[error("invalid minimum approach temperature: {value}")]
    MinApproachTemperature {
        value: f64,

        #[source]
        source: ConstraintError,
    },

    /// No hot stream starts above the coldest cold stream.
    #[error("infeasible temperatures: hot_max={hot_max} cold_min={cold_min}")]
    Infeasible { hot_max: f64, cold_min: f64 },

    /// The hot streams do not bracket the cold streams from above.
    #[error(
        "hot and cold temperatures do not overlap: hot=({hot_min}, {hot_max}) cold=({cold_min}, {cold_max})"
    )]
    TemperatureOverlap {
        hot_min: f64,
        hot_max: f64,
        cold_min: f64,
        cold_max: f64,
    },

    /// The minimum approach temperature is outside the admissible range.
    ///
    /// `lower` is zero when the unshifted composites touch or cross. That
    /// value passes this check but leaves an exchanger without driving force.
    #[error("minimum approach temperature {value} outside admissible range [{lower}, {upper}]")]
    OutOfRange { value: f64, lower: f64, upper: f64 },

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error(transparent)]
    Exchanger(#[from] ExchangerError),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}
