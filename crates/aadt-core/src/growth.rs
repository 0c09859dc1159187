use crate::error::{PipelineError, Result};

/// Annual growth factor used when factoring short traffic counts.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.0261;
pub const DEFAULT_PROJECTED_YEARS: usize = 2;

const SCALE: u128 = 1_000_000;

/// Multiplicative growth factor held in millionths so that the rounded-up
/// projection is computed exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthFactor {
    millionths: u64,
}

impl GrowthFactor {
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(PipelineError::Config(format!(
                "growth factor must be a positive number, got {value}"
            )));
        }
        let millionths = (value * SCALE as f64).round();
        if millionths < 1.0 || millionths > u64::MAX as f64 {
            return Err(PipelineError::Config(format!(
                "growth factor {value} is outside the supported range"
            )));
        }
        Ok(Self {
            millionths: millionths as u64,
        })
    }

    pub fn as_f64(&self) -> f64 {
        self.millionths as f64 / SCALE as f64
    }

    /// `ceil(basis * factor)`, saturating at `u64::MAX`.
    pub fn apply(&self, basis: u64) -> u64 {
        let scaled = basis as u128 * self.millionths as u128;
        let rounded = scaled.div_ceil(SCALE);
        u64::try_from(rounded).unwrap_or(u64::MAX)
    }

    /// Grows the first non-zero value of `chain` (newest first). A chain of
    /// zeros has no data and projects to zero.
    pub fn project<I>(&self, chain: I) -> u64
    where
        I: IntoIterator<Item = u64>,
    {
        chain
            .into_iter()
            .find(|value| *value != 0)
            .map(|basis| self.apply(basis))
            .unwrap_or(0)
    }
}

impl Default for GrowthFactor {
    fn default() -> Self {
        Self {
            millionths: 1_026_100,
        }
    }
}

/// How many years to project and at what rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthProjection {
    pub factor: GrowthFactor,
    pub years: usize,
}

impl GrowthProjection {
    pub fn new(factor: GrowthFactor, years: usize) -> Result<Self> {
        if years == 0 {
            return Err(PipelineError::Config(
                "at least one projected year is required".to_string(),
            ));
        }
        Ok(Self { factor, years })
    }

    /// Projects forward from `observed` (oldest first). Each projected year
    /// falls back through the years already projected, newest first, and then
    /// the observed years from newest to oldest.
    pub fn project(&self, observed: &[u64]) -> Vec<u64> {
        let mut projected: Vec<u64> = Vec::with_capacity(self.years);
        for _ in 0..self.years {
            let chain = projected
                .iter()
                .rev()
                .chain(observed.iter().rev())
                .copied();
            let next = self.factor.project(chain);
            projected.push(next);
        }
        projected
    }
}

impl Default for GrowthProjection {
    fn default() -> Self {
        Self {
            factor: GrowthFactor::default(),
            years: DEFAULT_PROJECTED_YEARS,
        }
    }
}
