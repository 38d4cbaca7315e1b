//! Standard utility streams.
//!
//! Steam levels and refrigerants commonly offered to a process plant. A preset
//! fixes the temperatures, role, and state; the caller picks the id and the
//! unit cost.

use super::stream::{Stream, StreamDescriptor, StreamError, StreamId, StreamRole, StreamState};

/// A standard utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Utility {
    /// Condensing steam at 254 °C.
    HighPressureSteam,
    /// Condensing steam at 186 °C.
    MediumPressureSteam,
    /// Condensing steam at 160 °C.
    LowPressureSteam,
    /// Cooling water warming from 30 °C to 40 °C.
    CoolingWater,
    /// Evaporating refrigerant at −33 °C.
    RefrigerantMinus33,
    /// Evaporating refrigerant at −18 °C.
    RefrigerantMinus18,
    /// Evaporating refrigerant at 0 °C.
    Refrigerant0,
    /// Evaporating refrigerant at 21 °C.
    Refrigerant21,
}

impl Utility {
    /// Every preset, heaters first.
    pub const ALL: [Self; 8] = [
        Self::HighPressureSteam,
        Self::MediumPressureSteam,
        Self::LowPressureSteam,
        Self::CoolingWater,
        Self::RefrigerantMinus33,
        Self::RefrigerantMinus18,
        Self::Refrigerant0,
        Self::Refrigerant21,
    ];

    /// Inlet and outlet temperatures in °C.
    #[must_use]
    pub fn temperatures(self) -> (f64, f64) {
        match self {
            Self::HighPressureSteam => (254.0, 254.0),
            Self::MediumPressureSteam => (186.0, 186.0),
            Self::LowPressureSteam => (160.0, 160.0),
            Self::CoolingWater => (30.0, 40.0),
            Self::RefrigerantMinus33 => (-33.0, -33.0),
            Self::RefrigerantMinus18 => (-18.0, -18.0),
            Self::Refrigerant0 => (0.0, 0.0),
            Self::Refrigerant21 => (21.0, 21.0),
        }
    }

    #[must_use]
    pub fn role(self) -> StreamRole {
        match self {
            Self::HighPressureSteam | Self::MediumPressureSteam | Self::LowPressureSteam => {
                StreamRole::ExternalHot
            }
            _ => StreamRole::ExternalCold,
        }
    }

    #[must_use]
    pub fn state(self) -> StreamState {
        match self {
            Self::HighPressureSteam | Self::MediumPressureSteam | Self::LowPressureSteam => {
                StreamState::GasCondensation
            }
            Self::CoolingWater => StreamState::Liquid,
            _ => StreamState::LiquidEvaporation,
        }
    }

    /// Describes this utility with the given id and unit cost.
    #[must_use]
    pub fn descriptor(self, id: impl Into<StreamId>, cost: f64) -> StreamDescriptor {
        let (inlet, outlet) = self.temperatures();
        StreamDescriptor::new(id, inlet, outlet, 0.0)
            .with_role(self.role())
            .with_state(self.state())
            .with_cost(cost)
    }

    /// Builds this utility as a stream.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] if `cost` is not finite.
    pub fn stream(self, id: impl Into<StreamId>, cost: f64) -> Result<Stream, StreamError> {
        Stream::new(self.descriptor(id, cost))
    }
}
