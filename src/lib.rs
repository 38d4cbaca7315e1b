//! # Twine Pinch
//!
//! Pinch analysis and heat-exchanger network synthesis for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given a set of process streams, the analysis targets the minimum external
//! heating and cooling, locates the pinch, builds the composite and grand
//! composite curves, and synthesizes one feasible network of heat exchangers
//! with estimated area and capital cost.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Engine-specific helpers stay in a model's internal `core` module until they
//! are useful elsewhere, at which point they move to [`support`].

pub mod models;
pub mod support;
