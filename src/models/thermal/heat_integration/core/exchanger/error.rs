use thiserror::Error;

use crate::{
    models::thermal::heat_integration::core::stream::StreamState,
    support::constraint::ConstraintError,
};

/// Errors raised while sizing a heat exchanger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangerError {
    /// No coefficient is tabulated for this hot-side state.
    #[error("unsupported hot-side state for heat-transfer coefficient: {state:?}")]
    UnsupportedHotState { state: StreamState },

    /// No coefficient is tabulated for this cold-side state.
    #[error("unsupported cold-side state for heat-transfer coefficient: {state:?}")]
    UnsupportedColdState { state: StreamState },

    /// The hot side does not stay above the cold side at both ends.
    #[error("non-positive approach temperature: start={start} finish={finish}")]
    NonPositiveApproach {
        start: f64,
        finish: f64,

        #[source]
        source: ConstraintError,
    },

    /// The two sides cover different heat ranges.
    #[error("hot and cold sides cover different heat: hot={hot:?} cold={cold:?}")]
    MismatchedHeatRanges { hot: (f64, f64), cold: (f64, f64) },
}
