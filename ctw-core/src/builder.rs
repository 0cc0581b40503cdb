//! Builder utilities for configuring a [`Generator`].
//!
//! Exposes the capacity policy and execution strategy selection surface and
//! the validation run before any record is sampled.

use std::num::NonZeroUsize;

use crate::{
    Result, error::GenerationError, generator::Generator, sampling::cables::CableSampler,
    sampling::normal_cavities::light_load_model, validate::Overrides,
};

/// Number of records generated when no count is configured.
pub const DEFAULT_RECORD_COUNT: usize = 600;

/// What happens when a record violates a capacity constraint.
///
/// # Examples
/// ```
/// use ctw_core::CapacityPolicy;
///
/// assert_eq!(CapacityPolicy::default(), CapacityPolicy::Abort);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Stop the run at the first rejected record.
    #[default]
    Abort,
    /// Redraw a rejected record from its own stream.
    Resample {
        /// Attempts per record, the first draw included.
        max_attempts: u32,
    },
}

/// How records are scheduled across threads.
///
/// Output is identical under both strategies for the same seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Generate records one after another on the calling thread.
    #[default]
    Sequential,
    /// Generate records on the rayon global pool.
    Parallel,
}

/// Configures and constructs [`Generator`] instances.
///
/// # Examples
/// ```
/// use ctw_core::{ExecutionStrategy, GeneratorBuilder, Overrides};
///
/// let generator = GeneratorBuilder::new()
///     .with_overrides(Overrides { insertion_jobs: Some(50), ..Overrides::default() })
///     .with_record_count(10)
///     .with_seed(7)
///     .with_execution_strategy(ExecutionStrategy::Parallel)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(generator.record_count().get(), 10);
/// assert_eq!(generator.seed(), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    overrides: Overrides,
    record_count: usize,
    seed: Option<u64>,
    capacity_policy: CapacityPolicy,
    execution_strategy: ExecutionStrategy,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            overrides: Overrides::default(),
            record_count: DEFAULT_RECORD_COUNT,
            seed: None,
            capacity_policy: CapacityPolicy::default(),
            execution_strategy: ExecutionStrategy::default(),
        }
    }
}

impl GeneratorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use ctw_core::{CapacityPolicy, GeneratorBuilder};
    ///
    /// let builder = GeneratorBuilder::new();
    /// assert_eq!(builder.record_count(), 600);
    /// assert_eq!(builder.capacity_policy(), CapacityPolicy::Abort);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Returns the configured overrides.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        self.overrides
    }

    /// Overrides the number of records to generate.
    #[must_use]
    pub fn with_record_count(mut self, count: usize) -> Self {
        self.record_count = count;
        self
    }

    /// Returns the configured record count.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Fixes the base seed so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured base seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Sets the policy applied to rejected records.
    ///
    /// # Examples
    /// ```
    /// use ctw_core::{CapacityPolicy, GeneratorBuilder};
    ///
    /// let policy = CapacityPolicy::Resample { max_attempts: 5 };
    /// let builder = GeneratorBuilder::new().with_capacity_policy(policy);
    /// assert_eq!(builder.capacity_policy(), policy);
    /// ```
    #[must_use]
    pub fn with_capacity_policy(mut self, policy: CapacityPolicy) -> Self {
        self.capacity_policy = policy;
        self
    }

    /// Returns the configured capacity policy.
    #[must_use]
    pub fn capacity_policy(&self) -> CapacityPolicy {
        self.capacity_policy
    }

    /// Sets the execution strategy.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`Generator`].
    ///
    /// # Errors
    /// Returns [`GenerationError::Validation`] when the overrides violate a
    /// constraint, [`GenerationError::InvalidRecordCount`] for a zero count
    /// and [`GenerationError::InvalidMaxAttempts`] for a resample policy
    /// without attempts.
    ///
    /// # Examples
    /// ```
    /// use ctw_core::{GenerationErrorCode, GeneratorBuilder};
    ///
    /// let err = GeneratorBuilder::new()
    ///     .with_record_count(0)
    ///     .build()
    ///     .expect_err("zero records are rejected");
    /// assert_eq!(err.code(), GenerationErrorCode::InvalidRecordCount);
    /// ```
    pub fn build(self) -> Result<Generator> {
        let fixed = self.overrides.validate()?;
        let record_count =
            NonZeroUsize::new(self.record_count).ok_or(GenerationError::InvalidRecordCount {
                got: self.record_count,
            })?;
        if let CapacityPolicy::Resample { max_attempts: 0 } = self.capacity_policy {
            return Err(GenerationError::InvalidMaxAttempts);
        }

        Ok(Generator::new(
            fixed,
            record_count,
            self.seed,
            self.capacity_policy,
            self.execution_strategy,
            CableSampler::new()?,
            light_load_model()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::error::{GenerationErrorCode, ValidationErrorCode};

    #[test]
    fn defaults_match_reference_run() {
        let builder = GeneratorBuilder::new();
        assert_eq!(builder.record_count(), DEFAULT_RECORD_COUNT);
        assert_eq!(builder.seed(), None);
        assert_eq!(builder.overrides(), Overrides::default());
        assert_eq!(builder.execution_strategy(), ExecutionStrategy::Sequential);
    }

    #[test]
    fn invalid_overrides_fail_before_sampling() {
        let err = GeneratorBuilder::new()
            .with_overrides(Overrides {
                insertion_jobs: Some(10),
                two_sided_cables: Some(10),
                one_sided_cables: Some(5),
                side_cables: None,
            })
            .build()
            .expect_err("inconsistent overrides");
        assert_eq!(err.code(), GenerationErrorCode::Validation);
        let GenerationError::Validation { source } = err else {
            panic!("expected validation error");
        };
        assert!(source.contains(ValidationErrorCode::InsertionJobsMismatch));
    }

    #[rstest]
    #[case(CapacityPolicy::Resample { max_attempts: 0 }, false)]
    #[case(CapacityPolicy::Resample { max_attempts: 1 }, true)]
    #[case(CapacityPolicy::Abort, true)]
    fn resample_policy_needs_attempts(#[case] policy: CapacityPolicy, #[case] valid: bool) {
        let result = GeneratorBuilder::new().with_capacity_policy(policy).build();
        match result {
            Ok(generator) => {
                assert!(valid);
                assert_eq!(generator.capacity_policy(), policy);
            }
            Err(err) => {
                assert!(!valid);
                assert_eq!(err, GenerationError::InvalidMaxAttempts);
            }
        }
    }
}
