use thiserror::Error;

use crate::{
    models::thermal::heat_integration::core::{curve::CurveError, stream::StreamId},
    support::{constraint::ConstraintError, interval::IntervalError},
};

/// Errors raised while cascading heat or allocating utilities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CascadeError {
    /// The cascade needs at least one process stream.
    #[error("no internal streams to cascade")]
    NoInternalStreams,

    /// Utility allocation was requested on a cascade with no pinch.
    #[error("pinch point has not been computed")]
    PinchNotComputed,

    /// An allocated utility duty failed validation.
    #[error("invalid duty allocated to {id}: heat_duty={heat_duty}")]
    InvalidAllocation {
        id: StreamId,
        heat_duty: f64,

        #[source]
        source: ConstraintError,
    },

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}
