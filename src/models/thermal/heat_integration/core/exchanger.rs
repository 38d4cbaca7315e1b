//! Heat exchanger sizing and costing.

mod error;

pub use error::ExchangerError;

use uom::si::{
    area::square_meter,
    f64::{Area, HeatTransfer, Power, TemperatureInterval, ThermalConductance},
    heat_transfer::watt_per_square_meter_kelvin,
    power::watt,
    temperature_interval::kelvin as delta_kelvin,
};

use crate::support::{constraint::StrictlyPositive, interval::HeatRange};

use super::{
    curve::{PlotSegment, temperature_differences},
    stream::StreamState,
};

/// Area reported when no coefficient is tabulated and the lookup is waived.
const PLACEHOLDER_AREA: f64 = 1.0;

/// Capital cost per `m²^0.65` of area.
const COST_FACTOR: f64 = 1_500_000.0;

const COST_EXPONENT: f64 = 0.65;

/// Looks up the overall heat-transfer coefficient for a pair of states.
///
/// | hot \ cold        | Liquid | Gas | LiquidEvaporation |
/// |-------------------|--------|-----|-------------------|
/// | Liquid            | 300    | 200 | 1000              |
/// | Gas               | 200    | 150 | 500               |
/// | GasCondensation   | 1000   | 500 | 1500              |
///
/// Values are in W/(m²·K).
///
/// # Errors
///
/// Returns [`ExchangerError::UnsupportedHotState`] or
/// [`ExchangerError::UnsupportedColdState`] for states outside the table,
/// checking the hot side first.
pub fn overall_heat_transfer_coefficient(
    hot: StreamState,
    cold: StreamState,
) -> Result<HeatTransfer, ExchangerError> {
    use StreamState::{Gas, GasCondensation, Liquid, LiquidEvaporation};

    let value = match (hot, cold) {
        (Liquid, Liquid) => 300.0,
        (Liquid, Gas) | (Gas, Liquid) => 200.0,
        (Liquid, LiquidEvaporation) | (GasCondensation, Liquid) => 1000.0,
        (Gas, Gas) => 150.0,
        (Gas, LiquidEvaporation) | (GasCondensation, Gas) => 500.0,
        (GasCondensation, LiquidEvaporation) => 1500.0,
        (Liquid | Gas | GasCondensation, state) => {
            return Err(ExchangerError::UnsupportedColdState { state });
        }
        (state, _) => return Err(ExchangerError::UnsupportedHotState { state }),
    };
    Ok(HeatTransfer::new::<watt_per_square_meter_kelvin>(value))
}

fn log_mean(start: f64, finish: f64) -> f64 {
    if start == finish {
        start
    } else {
        (start - finish) / (start / finish).ln()
    }
}

/// Counterflow LMTD of a matched pair.
///
/// # Errors
///
/// Returns [`ExchangerError::NonPositiveApproach`] unless the hot side is
/// above the cold side at both ends.
pub fn counterflow_lmtd(hot: &PlotSegment, cold: &PlotSegment) -> Result<f64, ExchangerError> {
    let (start, finish) = temperature_differences(hot, cold);
    for difference in [start, finish] {
        StrictlyPositive::new(difference).map_err(|source| ExchangerError::NonPositiveApproach {
            start,
            finish,
            source,
        })?;
    }
    Ok(log_mean(start, finish))
}

/// Parallel-flow LMTD of a matched pair, or `None` if the hot outlet would
/// not stay above the cold outlet.
#[must_use]
pub fn parallel_flow_lmtd(hot: &PlotSegment, cold: &PlotSegment) -> Option<f64> {
    let inlet = hot.finish_temperature() - cold.start_temperature();
    let outlet = hot.start_temperature() - cold.finish_temperature();
    (inlet > 0.0 && outlet > 0.0).then(|| log_mean(inlet, outlet))
}

/// A sized and costed heat exchanger between one hot and one cold piece.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatExchanger {
    heat_range: HeatRange,
    hot: PlotSegment,
    cold: PlotSegment,
    counterflow_lmtd: TemperatureInterval,
    parallel_flow_lmtd: Option<TemperatureInterval>,
    coefficient: Option<HeatTransfer>,
    area: Area,
    cost: f64,
}

impl HeatExchanger {
    /// Sizes an exchanger for a matched pair.
    ///
    /// Area is `duty / (LMTD × U)` with the counterflow LMTD. Cost is
    /// `1.5e6 × area^0.65`, doubled for reboilers and reactors. With
    /// `ignore_unknown_coefficients`, a pair with no tabulated coefficient
    /// gets a 1 m² placeholder area instead of an error.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangerError`] if the pieces cover different heat, cross
    /// in temperature, or have no tabulated coefficient.
    pub fn new(
        hot: PlotSegment,
        cold: PlotSegment,
        ignore_unknown_coefficients: bool,
    ) -> Result<Self, ExchangerError> {
        if hot.heat_range() != cold.heat_range() {
            return Err(ExchangerError::MismatchedHeatRanges {
                hot: hot.heat_range().bounds(),
                cold: cold.heat_range().bounds(),
            });
        }

        let heat_range = hot.heat_range();
        let counterflow_lmtd =
            TemperatureInterval::new::<delta_kelvin>(counterflow_lmtd(&hot, &cold)?);
        let parallel_flow_lmtd =
            parallel_flow_lmtd(&hot, &cold).map(TemperatureInterval::new::<delta_kelvin>);

        let coefficient = match overall_heat_transfer_coefficient(hot.state(), cold.state()) {
            Ok(coefficient) => Some(coefficient),
            Err(_) if ignore_unknown_coefficients => None,
            Err(error) => return Err(error),
        };
        let area: Area = match coefficient {
            Some(coefficient) => {
                let duty = Power::new::<watt>(heat_range.delta());
                let ua: ThermalConductance = duty / counterflow_lmtd;
                ua / coefficient
            }
            None => Area::new::<square_meter>(PLACEHOLDER_AREA),
        };

        let multiplier = if hot.reboiler_or_reactor() || cold.reboiler_or_reactor() {
            2.0
        } else {
            1.0
        };
        let cost = COST_FACTOR * area.get::<square_meter>().powf(COST_EXPONENT) * multiplier;

        Ok(Self {
            heat_range,
            hot,
            cold,
            counterflow_lmtd,
            parallel_flow_lmtd,
            coefficient,
            area,
            cost,
        })
    }

    #[must_use]
    pub fn heat_range(&self) -> HeatRange {
        self.heat_range
    }

    #[must_use]
    pub fn duty(&self) -> Power {
        Power::new::<watt>(self.heat_range.delta())
    }

    #[must_use]
    pub fn hot(&self) -> &PlotSegment {
        &self.hot
    }

    #[must_use]
    pub fn cold(&self) -> &PlotSegment {
        &self.cold
    }

    #[must_use]
    pub fn counterflow_lmtd(&self) -> TemperatureInterval {
        self.counterflow_lmtd
    }

    #[must_use]
    pub fn parallel_flow_lmtd(&self) -> Option<TemperatureInterval> {
        self.parallel_flow_lmtd
    }

    /// Tabulated coefficient, or `None` if the placeholder area was used.
    #[must_use]
    pub fn overall_heat_transfer_coefficient(&self) -> Option<HeatTransfer> {
        self.coefficient
    }

    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns `true` if either side is a reboiler or reactor.
    #[must_use]
    pub fn reboiler_or_reactor(&self) -> bool {
        self.hot.reboiler_or_reactor() || self.cold.reboiler_or_reactor()
    }
}
