//! Thermal systems models.
//!
//! This module contains models for process heat integration.

pub mod heat_integration;
