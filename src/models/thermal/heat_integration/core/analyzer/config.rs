/// Settings for one pinch analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Minimum approach temperature between hot and cold sides, in K.
    pub min_approach_temperature: f64,

    /// Skip the hot/cold temperature overlap checks.
    ///
    /// The checks are also skipped whenever external streams are present.
    pub force_validation: bool,

    /// Size exchangers with no tabulated coefficient at a placeholder 1 m²
    /// instead of failing.
    pub ignore_unknown_coefficients: bool,
}

impl AnalysisConfig {
    /// Creates a configuration with the default flags.
    #[must_use]
    pub fn new(min_approach_temperature: f64) -> Self {
        Self {
            min_approach_temperature,
            force_validation: false,
            ignore_unknown_coefficients: true,
        }
    }

    #[must_use]
    pub fn with_force_validation(mut self, force_validation: bool) -> Self {
        self.force_validation = force_validation;
        self
    }

    #[must_use]
    pub fn with_ignore_unknown_coefficients(mut self, ignore_unknown_coefficients: bool) -> Self {
        self.ignore_unknown_coefficients = ignore_unknown_coefficients;
        self
    }
}
