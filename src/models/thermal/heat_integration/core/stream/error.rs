use thiserror::Error;

use crate::support::constraint::ConstraintError;

use super::{StreamId, StreamRole, StreamState};

/// Errors raised while validating or updating a [`Stream`](super::Stream).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// A temperature, duty, or cost was `NaN` or infinite.
    #[error("stream {id}: non-finite input: {field}={value}")]
    NonFinite {
        id: StreamId,
        field: &'static str,
        value: f64,
    },

    /// Inlet and outlet temperatures are equal and no role was given.
    #[error("stream {id}: role required for isothermal stream at {temperature}")]
    RoleRequired { id: StreamId, temperature: f64 },

    /// An internal stream's duty is zero or negative.
    #[error("stream {id}: internal stream duty must be positive: heat_duty={heat_duty}")]
    InternalDuty {
        id: StreamId,
        heat_duty: f64,

        #[source]
        source: ConstraintError,
    },

    /// An external stream was given a duty before allocation.
    #[error("stream {id}: external stream duty must start at zero: heat_duty={heat_duty}")]
    ExternalDuty { id: StreamId, heat_duty: f64 },

    /// The temperature direction contradicts the role.
    #[error(
        "stream {id}: {role:?} stream temperatures out of order: inlet={inlet_temperature} outlet={outlet_temperature}"
    )]
    TemperatureOrder {
        id: StreamId,
        role: StreamRole,
        inlet_temperature: f64,
        outlet_temperature: f64,
    },

    /// Only external streams may carry a unit cost.
    #[error("stream {id}: cost is only allowed on external streams: cost={cost}")]
    InternalCost { id: StreamId, cost: f64 },

    /// A phase-change state on a stream whose temperature changes.
    #[error(
        "stream {id}: {state:?} requires an isothermal stream: inlet={inlet_temperature} outlet={outlet_temperature}"
    )]
    PhaseChangeNotIsothermal {
        id: StreamId,
        state: StreamState,
        inlet_temperature: f64,
        outlet_temperature: f64,
    },

    /// Temperature updates are not defined for isothermal streams.
    #[error("stream {id}: cannot update the temperature of an isothermal stream")]
    IsothermalTemperatureUpdate { id: StreamId },

    /// The duty of a non-isothermal internal stream follows its temperatures.
    #[error("stream {id}: cannot set the duty of a non-isothermal internal stream")]
    SensibleHeatUpdate { id: StreamId },

    /// A duty update would flip the sign of the duty.
    #[error("stream {id}: duty must not be negative: heat_duty={heat_duty}")]
    NegativeDuty { id: StreamId, heat_duty: f64 },
}
