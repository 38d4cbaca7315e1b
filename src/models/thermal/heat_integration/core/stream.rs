//! Process and utility streams.
//!
//! A [`Stream`] is a validated value object. Every phase of the analysis
//! works on its own copies, so duty and temperature updates made while
//! building one curve are never seen by another.

mod error;

pub use error::StreamError;

use std::fmt;

use crate::support::{
    constraint::StrictlyPositive,
    interval::{TemperatureRange, round},
};

/// Tolerance used when matching a stream against a curve piece.
pub(crate) const MATCH_TOLERANCE: f64 = 1e-6;

/// Caller-chosen stream identifier, unique within one analysis.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId(String);

impl StreamId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StreamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StreamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a stream releases or absorbs heat, and whether its duty is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    /// Process stream that absorbs a fixed duty.
    Cold,
    /// Process stream that releases a fixed duty.
    Hot,
    /// Cooling utility whose duty is allocated by the cascade.
    ExternalCold,
    /// Heating utility whose duty is allocated by the cascade.
    ExternalHot,
}

impl StreamRole {
    #[must_use]
    pub fn is_external(self) -> bool {
        matches!(self, Self::ExternalCold | Self::ExternalHot)
    }

    #[must_use]
    pub fn is_hot(self) -> bool {
        matches!(self, Self::Hot | Self::ExternalHot)
    }
}

/// Physical state, used to look up heat-transfer coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StreamState {
    #[default]
    Unknown,
    Liquid,
    Gas,
    GasCondensation,
    LiquidEvaporation,
}

impl StreamState {
    /// Returns `true` for states whose duty is latent heat.
    #[must_use]
    pub fn is_phase_change(self) -> bool {
        matches!(self, Self::GasCondensation | Self::LiquidEvaporation)
    }
}

/// Caller input for one stream.
///
/// Temperatures are in °C, duty in W, and cost per W of duty.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    pub id: StreamId,
    pub inlet_temperature: f64,
    pub outlet_temperature: f64,
    pub heat_duty: f64,

    /// Derived from the temperature direction when `None`.
    pub role: Option<StreamRole>,
    pub state: StreamState,
    pub cost: f64,
    pub reboiler_or_reactor: bool,
}

impl StreamDescriptor {
    /// Creates a descriptor with an unknown state, no cost, and a derived role.
    #[must_use]
    pub fn new(
        id: impl Into<StreamId>,
        inlet_temperature: f64,
        outlet_temperature: f64,
        heat_duty: f64,
    ) -> Self {
        Self {
            id: id.into(),
            inlet_temperature,
            outlet_temperature,
            heat_duty,
            role: None,
            state: StreamState::Unknown,
            cost: 0.0,
            reboiler_or_reactor: false,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: StreamRole) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: StreamState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_reboiler_or_reactor(mut self, reboiler_or_reactor: bool) -> Self {
        self.reboiler_or_reactor = reboiler_or_reactor;
        self
    }
}

/// A validated process or utility stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    id: StreamId,
    role: StreamRole,
    state: StreamState,
    temperature_range: TemperatureRange,
    heat_duty: f64,
    cost: f64,
    reboiler_or_reactor: bool,
}

impl Stream {
    /// Validates a descriptor and builds the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] if any value is non-finite, the role cannot be
    /// derived, or the duty, temperatures, cost, and state are inconsistent.
    pub fn new(descriptor: StreamDescriptor) -> Result<Self, StreamError> {
        let StreamDescriptor {
            id,
            inlet_temperature,
            outlet_temperature,
            heat_duty,
            role,
            state,
            cost,
            reboiler_or_reactor,
        } = descriptor;

        for (field, value) in [
            ("inlet_temperature", inlet_temperature),
            ("outlet_temperature", outlet_temperature),
            ("heat_duty", heat_duty),
            ("cost", cost),
        ] {
            if !value.is_finite() {
                return Err(StreamError::NonFinite { id, field, value });
            }
        }

        let role = match role {
            Some(role) => role,
            None if outlet_temperature > inlet_temperature => StreamRole::Cold,
            None if outlet_temperature < inlet_temperature => StreamRole::Hot,
            None => {
                return Err(StreamError::RoleRequired {
                    id,
                    temperature: inlet_temperature,
                });
            }
        };

        let out_of_order = if role.is_hot() {
            inlet_temperature < outlet_temperature
        } else {
            inlet_temperature > outlet_temperature
        };
        if out_of_order {
            return Err(StreamError::TemperatureOrder {
                id,
                role,
                inlet_temperature,
                outlet_temperature,
            });
        }

        if role.is_external() {
            if heat_duty != 0.0 {
                return Err(StreamError::ExternalDuty { id, heat_duty });
            }
        } else {
            if let Err(source) = StrictlyPositive::new(heat_duty) {
                return Err(StreamError::InternalDuty {
                    id,
                    heat_duty,
                    source,
                });
            }
            if cost != 0.0 {
                return Err(StreamError::InternalCost { id, cost });
            }
        }

        let temperature_range = TemperatureRange::new(inlet_temperature, outlet_temperature);
        if state.is_phase_change() && !temperature_range.is_degenerate() {
            return Err(StreamError::PhaseChangeNotIsothermal {
                id,
                state,
                inlet_temperature,
                outlet_temperature,
            });
        }

        Ok(Self {
            id,
            role,
            state,
            temperature_range,
            heat_duty,
            cost,
            reboiler_or_reactor,
        })
    }

    #[must_use]
    pub fn id(&self) -> &StreamId {
        &self.id
    }

    #[must_use]
    pub fn role(&self) -> StreamRole {
        self.role
    }

    #[must_use]
    pub fn state(&self) -> StreamState {
        self.state
    }

    #[must_use]
    pub fn temperature_range(&self) -> TemperatureRange {
        self.temperature_range
    }

    /// Duty in W. Zero for external streams until the cascade allocates it.
    #[must_use]
    pub fn heat_duty(&self) -> f64 {
        self.heat_duty
    }

    /// Unit cost per W of duty.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Total utility cost, `heat_duty × cost`.
    #[must_use]
    pub fn utility_cost(&self) -> f64 {
        self.heat_duty * self.cost
    }

    #[must_use]
    pub fn reboiler_or_reactor(&self) -> bool {
        self.reboiler_or_reactor
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        self.role.is_external()
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        !self.role.is_external()
    }

    #[must_use]
    pub fn is_hot(&self) -> bool {
        self.role.is_hot()
    }

    #[must_use]
    pub fn is_cold(&self) -> bool {
        !self.role.is_hot()
    }

    /// Returns `true` if inlet and outlet temperatures coincide.
    #[must_use]
    pub fn is_isothermal(&self) -> bool {
        self.temperature_range.is_degenerate()
    }

    #[must_use]
    pub fn inlet_temperature(&self) -> f64 {
        if self.is_hot() {
            self.temperature_range.finish()
        } else {
            self.temperature_range.start()
        }
    }

    #[must_use]
    pub fn outlet_temperature(&self) -> f64 {
        if self.is_hot() {
            self.temperature_range.start()
        } else {
            self.temperature_range.finish()
        }
    }

    /// Returns a copy whose temperatures are moved by `offset`.
    #[must_use]
    pub(crate) fn shifted(&self, offset: f64) -> Self {
        Self {
            temperature_range: self.temperature_range.shift(offset),
            ..self.clone()
        }
    }

    /// Returns `true` if the stream's temperatures cover `range`.
    pub(crate) fn spans(&self, range: &TemperatureRange) -> bool {
        self.temperature_range
            .contains_within(range.start(), MATCH_TOLERANCE)
            && self
                .temperature_range
                .contains_within(range.finish(), MATCH_TOLERANCE)
    }

    /// Narrows the temperatures and rescales duty by the change in span.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::IsothermalTemperatureUpdate`] for isothermal
    /// streams, whose duty is not tied to a temperature span.
    pub fn update_temperature(
        &mut self,
        inlet_temperature: f64,
        outlet_temperature: f64,
    ) -> Result<(), StreamError> {
        if self.is_isothermal() {
            return Err(StreamError::IsothermalTemperatureUpdate {
                id: self.id.clone(),
            });
        }

        let range = TemperatureRange::new(inlet_temperature, outlet_temperature);
        self.heat_duty = self.heat_duty * range.delta() / self.temperature_range.delta();
        self.temperature_range = range;
        Ok(())
    }

    /// Sets the duty directly.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SensibleHeatUpdate`] for non-isothermal internal
    /// streams and [`StreamError::NegativeDuty`] for negative duties.
    pub fn update_heat(&mut self, heat_duty: f64) -> Result<(), StreamError> {
        if self.is_internal() && !self.is_isothermal() {
            return Err(StreamError::SensibleHeatUpdate {
                id: self.id.clone(),
            });
        }
        if heat_duty < 0.0 {
            return Err(StreamError::NegativeDuty {
                id: self.id.clone(),
                heat_duty,
            });
        }
        self.heat_duty = round(heat_duty);
        Ok(())
    }
}

impl TryFrom<StreamDescriptor> for Stream {
    type Error = StreamError;

    fn try_from(descriptor: StreamDescriptor) -> Result<Self, Self::Error> {
        Self::new(descriptor)
    }
}
