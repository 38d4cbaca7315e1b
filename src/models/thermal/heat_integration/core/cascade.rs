//! Problem-table heat cascade and utility targeting.
//!
//! Cold streams are shifted up by the minimum approach temperature so that
//! hot and cold duties can be summed on one temperature scale. Cascading the
//! net duty of each band from the coldest upward and lifting the result so
//! its minimum is zero gives the grand composite curve. Its zeros are pinch
//! points, its top value is the minimum external heating, and its bottom value
//! is the minimum external cooling.

mod error;

pub use error::CascadeError;

use tracing::debug;

use crate::support::{
    constraint::{Constrained, NonNegative},
    interval::{Domain, Heat, TemperatureRange, flatten, round},
};

use super::{
    curve::temperature_bands,
    stream::{Stream, StreamId},
};

/// Duty assigned to one external stream by the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub id: StreamId,
    pub heat_duty: Constrained<f64, NonNegative>,
}

/// The grand composite curve of a set of streams.
///
/// `heats[i]` is the heat flowing down through shifted temperature
/// `temperatures[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrandCompositeCurve {
    temperatures: Vec<f64>,
    heats: Vec<f64>,
    pinch_indices: Vec<usize>,

    /// External streams, with cold ones already shifted.
    external_streams: Vec<Stream>,
}

impl GrandCompositeCurve {
    /// Cascades the internal streams at the given minimum approach temperature.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NoInternalStreams`] if every stream is external.
    pub fn new(streams: &[Stream], min_approach_temperature: f64) -> Result<Self, CascadeError> {
        let (internal, external_streams): (Vec<Stream>, Vec<Stream>) = streams
            .iter()
            .map(|stream| {
                if stream.is_cold() {
                    stream.shifted(min_approach_temperature)
                } else {
                    stream.clone()
                }
            })
            .partition(Stream::is_internal);

        if internal.is_empty() {
            return Err(CascadeError::NoInternalStreams);
        }

        let bands = temperature_bands(&internal)?;
        let ranges: Vec<TemperatureRange> = bands.iter().map(|band| band.range).collect();
        let temperatures = flatten(&ranges)?;

        let mut cumulative = Vec::with_capacity(bands.len() + 1);
        let mut heat = 0.0;
        cumulative.push(heat);
        for band in &bands {
            heat -= band.net_duty();
            cumulative.push(heat);
        }

        let floor = cumulative.iter().copied().fold(f64::INFINITY, f64::min);
        let heats: Vec<f64> = cumulative
            .iter()
            .map(|heat| snap_to_zero(round(heat - floor)))
            .collect();
        let pinch_indices = heats
            .iter()
            .enumerate()
            .filter_map(|(index, &heat)| (heat == 0.0).then_some(index))
            .collect();

        let gcc = Self {
            temperatures,
            heats,
            pinch_indices,
            external_streams,
        };
        debug!(
            pinch = ?gcc.pinch_temperatures(),
            heating = gcc.external_heating_demand(),
            cooling = gcc.external_cooling_demand(),
            "cascaded internal streams"
        );
        Ok(gcc)
    }

    /// Shifted temperatures, ascending.
    #[must_use]
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Cascaded heat at each temperature. The minimum is exactly zero.
    #[must_use]
    pub fn heats(&self) -> &[f64] {
        &self.heats
    }

    /// Every shifted temperature where the cascade reaches zero, ascending.
    #[must_use]
    pub fn pinch_temperatures(&self) -> Vec<f64> {
        self.pinch_indices
            .iter()
            .map(|&index| self.temperatures[index])
            .collect()
    }

    /// Lowest pinch temperature.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::PinchNotComputed`] on an empty cascade.
    pub fn minimum_pinch_temperature(&self) -> Result<f64, CascadeError> {
        self.pinch_indices
            .first()
            .map(|&index| self.temperatures[index])
            .ok_or(CascadeError::PinchNotComputed)
    }

    /// Highest pinch temperature.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::PinchNotComputed`] on an empty cascade.
    pub fn maximum_pinch_temperature(&self) -> Result<f64, CascadeError> {
        self.pinch_indices
            .last()
            .map(|&index| self.temperatures[index])
            .ok_or(CascadeError::PinchNotComputed)
    }

    /// Minimum external heating, the heat left at the top of the cascade.
    #[must_use]
    pub fn external_heating_demand(&self) -> f64 {
        self.heats.last().copied().unwrap_or_default()
    }

    /// Minimum external cooling, the heat left at the bottom of the cascade.
    #[must_use]
    pub fn external_cooling_demand(&self) -> f64 {
        self.heats.first().copied().unwrap_or_default()
    }

    /// Assigns duty to the external streams.
    ///
    /// Heaters draw on the cascade above the highest pinch and coolers on the
    /// cascade below the lowest. Within each group, candidates are served in
    /// order of outlet distance from the pinch, then unit cost, then id. A
    /// candidate whose outlet sits on the wrong side of the pinch gets
    /// nothing. Otherwise its duty is the cascade heat at its outlet
    /// temperature, limited to the demand still open; a candidate beyond the
    /// end of the cascade takes whatever remains.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::PinchNotComputed`] on an empty cascade.
    pub fn solve_external_heat(&self) -> Result<Vec<Allocation>, CascadeError> {
        let (Some(&lowest), Some(&highest)) =
            (self.pinch_indices.first(), self.pinch_indices.last())
        else {
            return Err(CascadeError::PinchNotComputed);
        };

        let (heaters, coolers): (Vec<&Stream>, Vec<&Stream>) = self
            .external_streams
            .iter()
            .partition(|stream| stream.is_hot());

        let mut allocations = allocate(
            heaters,
            &self.heats[highest..],
            &self.temperatures[highest..],
        )?;

        let below_heats: Vec<f64> = self.heats[..=lowest].iter().rev().copied().collect();
        let below_temperatures: Vec<f64> =
            self.temperatures[..=lowest].iter().rev().copied().collect();
        allocations.extend(allocate(coolers, &below_heats, &below_temperatures)?);

        debug!(count = allocations.len(), "allocated external duty");
        Ok(allocations)
    }
}

/// Cascade heats within the heat tolerance of zero are pinch points.
fn snap_to_zero(heat: f64) -> f64 {
    if heat.abs() <= Heat::TOLERANCE {
        0.0
    } else {
        heat
    }
}

/// Serves one group of utilities from a cascade slice that starts at the pinch.
fn allocate(
    mut candidates: Vec<&Stream>,
    heats: &[f64],
    temperatures: &[f64],
) -> Result<Vec<Allocation>, CascadeError> {
    let (Some(&pinch), Some(&demand)) = (temperatures.first(), heats.last()) else {
        return Ok(Vec::new());
    };

    candidates.sort_by(|a, b| {
        (a.outlet_temperature() - pinch)
            .abs()
            .total_cmp(&(b.outlet_temperature() - pinch).abs())
            .then(a.cost().total_cmp(&b.cost()))
            .then_with(|| a.id().cmp(b.id()))
    });

    let mut remaining = demand;
    let mut allocations = Vec::new();
    for stream in candidates {
        let outlet = stream.outlet_temperature();
        let wrong_side = if stream.is_hot() {
            outlet < pinch
        } else {
            outlet > pinch
        };
        if wrong_side {
            continue;
        }

        let Some(heat) = heat_at_outlet(stream.is_hot(), outlet, heats, temperatures) else {
            continue;
        };
        let heat_duty = round(heat.clamp(0.0, remaining.max(0.0)));
        remaining -= heat_duty;

        let heat_duty =
            NonNegative::new(heat_duty).map_err(|source| CascadeError::InvalidAllocation {
                id: stream.id().clone(),
                heat_duty,
                source,
            })?;
        allocations.push(Allocation {
            id: stream.id().clone(),
            heat_duty,
        });
    }
    Ok(allocations)
}

/// Reads the cascade heat at a utility outlet temperature.
///
/// Returns `None` when the outlet lies inside the slice but only on pieces
/// with no heat change, or short of the slice's open end.
fn heat_at_outlet(is_hot: bool, outlet: f64, heats: &[f64], temperatures: &[f64]) -> Option<f64> {
    let last = temperatures.len().checked_sub(1)?;

    for index in 0..last {
        let (h0, h1) = (heats[index], heats[index + 1]);
        let (t0, t1) = (temperatures[index], temperatures[index + 1]);
        if h0 == h1 || !TemperatureRange::new(t0, t1).contains(outlet) {
            continue;
        }
        if t0 == t1 {
            return Some(h0);
        }
        return Some(h0 + (outlet - t0) * (h1 - h0) / (t1 - t0));
    }

    let end = temperatures[last];
    let beyond_end = (is_hot && outlet >= end) || (!is_hot && outlet <= end);
    beyond_end.then_some(heats[last])
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::thermal::heat_integration::core::{
        stream::StreamRole,
        test_support::{cold, hot, textbook_streams, utility},
    };

    fn duty_of(allocations: &[Allocation], id: &str) -> Option<f64> {
        allocations
            .iter()
            .find(|allocation| allocation.id.as_str() == id)
            .map(|allocation| allocation.heat_duty.into_inner())
    }

    #[test]
    fn textbook_cascade() {
        let gcc = GrandCompositeCurve::new(&textbook_streams(), 10.0).unwrap();

        assert_eq!(
            gcc.temperatures(),
            &[50.0, 60.0, 80.0, 90.0, 100.0, 120.0, 125.0]
        );
        assert_eq!(gcc.heats(), &[40.0, 70.0, 50.0, 0.0, 10.0, 50.0, 30.0]);
        assert_eq!(gcc.pinch_temperatures(), vec![90.0]);
        assert_eq!(gcc.minimum_pinch_temperature().unwrap(), 90.0);
        assert_eq!(gcc.maximum_pinch_temperature().unwrap(), 90.0);
        assert_eq!(gcc.external_heating_demand(), 30.0);
        assert_eq!(gcc.external_cooling_demand(), 40.0);
    }

    #[test]
    fn pinch_band_reports_both_ends() {
        let streams = [hot("h", 100.0, 50.0, 100.0), cold("c", 40.0, 90.0, 100.0)];
        let gcc = GrandCompositeCurve::new(&streams, 10.0).unwrap();

        assert_eq!(gcc.heats(), &[0.0, 0.0]);
        assert_eq!(gcc.minimum_pinch_temperature().unwrap(), 50.0);
        assert_eq!(gcc.maximum_pinch_temperature().unwrap(), 100.0);
    }

    #[test]
    fn near_zero_cascade_heat_is_a_pinch() {
        // At this approach temperature the cascade reaches zero at 116 °C
        // only up to accumulated rounding error.
        let streams = [
            hot("h0", 155.0, 94.0, 357.0),
            hot("h1", 116.0, 82.0, 173.0),
            cold("c0", 22.0, 59.0, 314.0),
            cold("c1", 48.0, 75.0, 105.0),
        ];
        let gcc = GrandCompositeCurve::new(&streams, 71.522_606_244).unwrap();

        assert_eq!(gcc.temperatures()[3], 116.0);
        assert_eq!(gcc.heats()[3], 0.0);
        assert_eq!(gcc.pinch_temperatures(), vec![116.0, 155.0]);
        assert_eq!(gcc.external_heating_demand(), 0.0);
        assert_relative_eq!(gcc.external_cooling_demand(), 111.0, epsilon = 1e-6);
    }

    #[test]
    fn equally_close_heaters_are_served_by_cost() {
        let mut streams = textbook_streams();
        streams.push(utility("a", 150.0, 150.0, StreamRole::ExternalHot, 2.0));
        streams.push(utility("b", 150.0, 150.0, StreamRole::ExternalHot, 1.0));

        let allocations = GrandCompositeCurve::new(&streams, 10.0)
            .unwrap()
            .solve_external_heat()
            .unwrap();

        assert_eq!(allocations[0].id.as_str(), "b");
        assert_eq!(duty_of(&allocations, "b"), Some(30.0));
        assert_eq!(duty_of(&allocations, "a"), Some(0.0));
    }

    #[test]
    fn equally_close_and_priced_coolers_are_served_by_id() {
        let mut streams = textbook_streams();
        streams.push(utility("w2", 20.0, 30.0, StreamRole::ExternalCold, 1.0));
        streams.push(utility("w1", 20.0, 30.0, StreamRole::ExternalCold, 1.0));

        let allocations = GrandCompositeCurve::new(&streams, 10.0)
            .unwrap()
            .solve_external_heat()
            .unwrap();

        assert_eq!(allocations[0].id.as_str(), "w1");
        assert_eq!(duty_of(&allocations, "w1"), Some(40.0));
        assert_eq!(duty_of(&allocations, "w2"), Some(0.0));
    }

    #[test]
    fn utilities_beyond_the_cascade_take_the_remainder() {
        let mut streams = textbook_streams();
        streams.push(utility("steam", 150.0, 150.0, StreamRole::ExternalHot, 2.0));
        streams.push(utility("water", 20.0, 30.0, StreamRole::ExternalCold, 1.0));

        let allocations = GrandCompositeCurve::new(&streams, 10.0)
            .unwrap()
            .solve_external_heat()
            .unwrap();

        assert_eq!(duty_of(&allocations, "steam"), Some(30.0));
        assert_eq!(duty_of(&allocations, "water"), Some(40.0));
    }

    #[test]
    fn closest_heater_is_served_first() {
        let mut streams = textbook_streams();
        streams.push(utility("hp", 150.0, 150.0, StreamRole::ExternalHot, 1.0));
        streams.push(utility("lp", 95.0, 95.0, StreamRole::ExternalHot, 3.0));
        streams.push(utility("low", 80.0, 80.0, StreamRole::ExternalHot, 0.0));

        let allocations = GrandCompositeCurve::new(&streams, 10.0)
            .unwrap()
            .solve_external_heat()
            .unwrap();

        assert_relative_eq!(duty_of(&allocations, "lp").unwrap(), 5.0);
        assert_relative_eq!(duty_of(&allocations, "hp").unwrap(), 25.0);
        assert_eq!(duty_of(&allocations, "low"), None);
    }

    #[test]
    fn closest_cooler_can_take_all_demand() {
        let mut streams = textbook_streams();
        streams.push(utility("water", 20.0, 30.0, StreamRole::ExternalCold, 1.0));
        streams.push(utility("chill", 65.0, 65.0, StreamRole::ExternalCold, 5.0));

        let allocations = GrandCompositeCurve::new(&streams, 10.0)
            .unwrap()
            .solve_external_heat()
            .unwrap();

        assert_eq!(duty_of(&allocations, "chill"), Some(40.0));
        assert_eq!(duty_of(&allocations, "water"), Some(0.0));
    }

    #[test]
    fn empty_cascade_has_no_pinch() {
        let gcc = GrandCompositeCurve::default();
        assert_eq!(
            gcc.solve_external_heat(),
            Err(CascadeError::PinchNotComputed)
        );
        assert_eq!(
            gcc.maximum_pinch_temperature(),
            Err(CascadeError::PinchNotComputed)
        );

        let only_utilities = [utility("steam", 150.0, 150.0, StreamRole::ExternalHot, 1.0)];
        assert_eq!(
            GrandCompositeCurve::new(&only_utilities, 10.0),
            Err(CascadeError::NoInternalStreams)
        );
    }

    mod proptests {
        use super::*;

        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cascade_floor_is_exactly_zero(
                specs in prop::collection::vec(
                    (0_i32..200, 1_i32..100, 1_i32..500, any::<bool>()),
                    1..8,
                ),
            ) {
                let streams: Vec<Stream> = specs
                    .iter()
                    .enumerate()
                    .map(|(index, &(low, span, duty, is_hot))| {
                        let (low, high) = (f64::from(low), f64::from(low + span));
                        let id = format!("s{index}");
                        if is_hot {
                            hot(&id, high, low, f64::from(duty))
                        } else {
                            cold(&id, low, high, f64::from(duty))
                        }
                    })
                    .collect();

                let gcc = GrandCompositeCurve::new(&streams, 10.0).unwrap();
                prop_assert_eq!(gcc.heats().len(), gcc.temperatures().len());
                prop_assert!(gcc.heats().iter().all(|&heat| heat >= 0.0));
                prop_assert!(gcc.heats().iter().any(|&heat| heat == 0.0));
                prop_assert!(gcc.maximum_pinch_temperature().is_ok());
            }
        }
    }
}
