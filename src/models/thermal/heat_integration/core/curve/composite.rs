use crate::{
    models::thermal::heat_integration::core::stream::Stream,
    support::interval::{HeatRange, TemperatureRange, build_ranges},
};

use super::{CurveError, PlotSegment};

/// One temperature sub-range with per-stream copies restricted to it.
#[derive(Debug, Clone)]
pub(crate) struct TemperatureBand {
    pub(crate) range: TemperatureRange,
    pub(crate) streams: Vec<Stream>,
}

impl TemperatureBand {
    /// Net duty released in this band: hot duty minus cold duty.
    pub(crate) fn net_duty(&self) -> f64 {
        self.streams
            .iter()
            .map(|stream| {
                if stream.is_hot() {
                    stream.heat_duty()
                } else {
                    -stream.heat_duty()
                }
            })
            .sum()
    }

    /// Total duty carried in this band, regardless of role.
    pub(crate) fn duty(&self) -> f64 {
        self.streams.iter().map(Stream::heat_duty).sum()
    }
}

/// Collects the temperature breakpoints needed to sum the streams' duties.
///
/// Non-isothermal streams add both ends once. An isothermal stream needs its
/// temperature twice so that a zero-width range exists for its latent duty;
/// copies already present count toward the two.
fn temperature_breakpoints(streams: &[Stream]) -> Result<Vec<f64>, CurveError> {
    let mut breakpoints: Vec<f64> = streams
        .iter()
        .filter(|stream| !stream.is_isothermal())
        .flat_map(|stream| {
            let range = stream.temperature_range();
            [range.start(), range.finish()]
        })
        .collect();
    breakpoints.sort_by(f64::total_cmp);
    breakpoints.dedup();

    for stream in streams.iter().filter(|stream| stream.is_isothermal()) {
        let temperature = stream.temperature_range().start();
        let count = breakpoints.iter().filter(|&&t| t == temperature).count();
        match count {
            0 => breakpoints.extend([temperature, temperature]),
            1 => breakpoints.push(temperature),
            2 => {}
            count => {
                return Err(CurveError::TooManyDuplicateTemperatures { temperature, count });
            }
        }
    }

    breakpoints.sort_by(f64::total_cmp);
    Ok(breakpoints)
}

/// Partitions the streams' temperatures into bands.
///
/// Each band holds a copy of every stream spanning it. Non-isothermal copies
/// are narrowed to the band, which rescales their duty pro rata. Zero-width
/// bands hold only the isothermal streams at that temperature.
pub(crate) fn temperature_bands(streams: &[Stream]) -> Result<Vec<TemperatureBand>, CurveError> {
    let breakpoints = temperature_breakpoints(streams)?;

    build_ranges(&breakpoints)
        .into_iter()
        .map(|range: TemperatureRange| {
            let mut band_streams = Vec::new();
            for stream in streams {
                if stream.is_isothermal() != range.is_degenerate() || !stream.spans(&range) {
                    continue;
                }
                let mut copy = stream.clone();
                if !copy.is_isothermal() {
                    copy.update_temperature(range.start(), range.finish())?;
                }
                band_streams.push(copy);
            }
            Ok(TemperatureBand {
                range,
                streams: band_streams,
            })
        })
        .collect()
}

/// Builds the composite curve of a set of hot streams or a set of cold streams.
///
/// The curve starts at zero heat at its lowest temperature and accumulates
/// duty band by band, so it is monotone in both heat and temperature.
///
/// # Errors
///
/// Returns a [`CurveError`] if the streams mix roles or an isothermal
/// temperature is repeated more than twice.
pub fn composite_curve(streams: &[Stream]) -> Result<Vec<PlotSegment>, CurveError> {
    let mixed = streams
        .windows(2)
        .any(|pair| pair[0].is_hot() != pair[1].is_hot());
    if mixed {
        return Err(CurveError::MixedRoles);
    }

    let mut heat = 0.0;
    let segments = temperature_bands(streams)?
        .into_iter()
        .map(|band| {
            let start = heat;
            heat += band.duty();
            PlotSegment::new(HeatRange::new(start, heat), band.range)
        })
        .collect();
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::thermal::heat_integration::core::{
        stream::StreamRole,
        test_support::{cold, hot, isothermal},
    };

    fn segment(heats: (f64, f64), temperatures: (f64, f64)) -> PlotSegment {
        PlotSegment::new(
            HeatRange::new(heats.0, heats.1),
            TemperatureRange::new(temperatures.0, temperatures.1),
        )
    }

    #[test]
    fn overlapping_cold_streams() {
        let streams = [cold("a", 0.0, 20.0, 100.0), cold("b", 10.0, 30.0, 100.0)];

        assert_eq!(
            composite_curve(&streams).unwrap(),
            vec![
                segment((0.0, 50.0), (0.0, 10.0)),
                segment((50.0, 150.0), (10.0, 20.0)),
                segment((150.0, 200.0), (20.0, 30.0)),
            ]
        );
    }

    #[test]
    fn isothermal_stream_above_the_others() {
        let streams = [
            cold("a", 0.0, 20.0, 100.0),
            cold("b", 10.0, 30.0, 100.0),
            isothermal("c", 40.0, 20.0, StreamRole::Cold),
        ];

        assert_eq!(
            composite_curve(&streams).unwrap(),
            vec![
                segment((0.0, 50.0), (0.0, 10.0)),
                segment((50.0, 150.0), (10.0, 20.0)),
                segment((150.0, 200.0), (20.0, 30.0)),
                segment((200.0, 200.0), (30.0, 40.0)),
                segment((200.0, 220.0), (40.0, 40.0)),
            ]
        );
    }

    #[test]
    fn isothermal_stream_inside_the_others() {
        let streams = [
            cold("a", 0.0, 20.0, 100.0),
            cold("b", 10.0, 30.0, 100.0),
            isothermal("c", 15.0, 20.0, StreamRole::Cold),
        ];

        assert_eq!(
            composite_curve(&streams).unwrap(),
            vec![
                segment((0.0, 50.0), (0.0, 10.0)),
                segment((50.0, 100.0), (10.0, 15.0)),
                segment((100.0, 120.0), (15.0, 15.0)),
                segment((120.0, 170.0), (15.0, 20.0)),
                segment((170.0, 220.0), (20.0, 30.0)),
            ]
        );
    }

    #[test]
    fn isothermal_streams_share_a_band() {
        let streams = [
            isothermal("a", 100.0, 20.0, StreamRole::Hot),
            isothermal("b", 100.0, 30.0, StreamRole::Hot),
        ];

        assert_eq!(
            composite_curve(&streams).unwrap(),
            vec![segment((0.0, 50.0), (100.0, 100.0))]
        );

        let bands = temperature_bands(&streams).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].streams.len(), 2);
    }

    #[test]
    fn breakpoint_duplicate_rule() {
        let streams = [
            cold("a", 10.0, 20.0, 10.0),
            isothermal("b", 20.0, 5.0, StreamRole::Cold),
            isothermal("c", 20.0, 5.0, StreamRole::Cold),
        ];
        assert_eq!(
            temperature_breakpoints(&streams).unwrap(),
            vec![10.0, 20.0, 20.0]
        );

        let streams = [
            isothermal("a", 20.0, 5.0, StreamRole::Cold),
            isothermal("b", 20.0, 5.0, StreamRole::Cold),
            cold("c", 10.0, 20.0, 10.0),
        ];
        assert_eq!(
            temperature_breakpoints(&streams).unwrap(),
            vec![10.0, 20.0, 20.0]
        );
    }

    #[test]
    fn mixed_roles_are_rejected() {
        let streams = [cold("a", 0.0, 20.0, 100.0), hot("b", 30.0, 10.0, 100.0)];
        assert_eq!(composite_curve(&streams), Err(CurveError::MixedRoles));
    }

    #[test]
    fn band_net_duty() {
        let streams = [hot("h", 100.0, 60.0, 160.0), cold("c", 50.0, 100.0, 150.0)];
        let bands = temperature_bands(&streams).unwrap();

        let ranges: Vec<_> = bands.iter().map(|band| band.range.bounds()).collect();
        assert_eq!(ranges, vec![(50.0, 60.0), (60.0, 100.0)]);
        assert_relative_eq!(bands[0].net_duty(), -30.0);
        assert_relative_eq!(bands[1].net_duty(), 40.0);
    }
}
