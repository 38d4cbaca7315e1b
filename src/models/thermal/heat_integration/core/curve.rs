//! Piecewise-linear heat-versus-temperature curves.

mod composite;
mod error;
mod plot_segment;
mod shift;

pub use composite::composite_curve;
pub use error::CurveError;
pub use plot_segment::{Line, PlotSegment, Point, temperature_differences};
pub use shift::align_curves;

pub(crate) use composite::{TemperatureBand, temperature_bands};
pub(crate) use plot_segment::slice_onto;
