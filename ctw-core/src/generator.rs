//! Record generation for the CTW meta-variable pipeline.
//!
//! Provides the [`Generator`] runtime entry point, which chains the sampling
//! stages for every record and applies the configured capacity policy.

use std::num::NonZeroUsize;

use rand::{Rng, RngCore};
use rayon::prelude::*;
use tracing::{Span, debug, field, info, instrument, trace, warn};

use crate::{
    Result,
    builder::{CapacityPolicy, ExecutionStrategy},
    distributions::ScaledInverseGaussian,
    error::{GenerationError, RejectionReason},
    record::MetaVariableRecord,
    sampling::{
        cables::CableSampler,
        central_cavities::{CentralCavityContext, sample_central_cavities},
        housing_types::{HousingTypeContext, sample_housing_types},
        housings::sample_housings,
        normal_cavities::{NormalCavityContext, sample_normal_cavities},
        side_cables::{SideCableContext, sample_side_cables},
    },
    seed::record_rng,
    validate::FixedValues,
};

/// Records produced by one [`Generator::generate`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBatch {
    seed: u64,
    records: Vec<MetaVariableRecord>,
    resampled: usize,
}

impl GeneratedBatch {
    /// Base seed the records were derived from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generated records in index order.
    #[must_use]
    pub fn records(&self) -> &[MetaVariableRecord] {
        &self.records
    }

    /// Records that needed more than one attempt.
    #[must_use]
    pub fn resampled(&self) -> usize {
        self.resampled
    }

    /// Consumes the batch and returns its records.
    #[must_use]
    pub fn into_records(self) -> Vec<MetaVariableRecord> {
        self.records
    }
}

/// A record together with whether it had to be redrawn.
struct Drawn {
    record: MetaVariableRecord,
    resampled: bool,
}

/// Entry point for generating meta-variable records.
///
/// # Examples
/// ```
/// use ctw_core::GeneratorBuilder;
///
/// let generator = GeneratorBuilder::new()
///     .with_record_count(5)
///     .with_seed(11)
///     .build()
///     .expect("builder must succeed");
/// let batch = generator.generate().expect("generation must succeed");
/// assert_eq!(batch.records().len(), 5);
/// assert_eq!(batch.seed(), 11);
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    fixed: FixedValues,
    record_count: NonZeroUsize,
    seed: Option<u64>,
    capacity_policy: CapacityPolicy,
    execution_strategy: ExecutionStrategy,
    cables: CableSampler,
    light_load: ScaledInverseGaussian,
}

impl Generator {
    pub(crate) fn new(
        fixed: FixedValues,
        record_count: NonZeroUsize,
        seed: Option<u64>,
        capacity_policy: CapacityPolicy,
        execution_strategy: ExecutionStrategy,
        cables: CableSampler,
        light_load: ScaledInverseGaussian,
    ) -> Self {
        Self {
            fixed,
            record_count,
            seed,
            capacity_policy,
            execution_strategy,
            cables,
            light_load,
        }
    }

    /// Validated overrides applied to every record.
    #[must_use]
    pub fn fixed_values(&self) -> FixedValues {
        self.fixed
    }

    /// Number of records each run produces.
    #[must_use]
    pub fn record_count(&self) -> NonZeroUsize {
        self.record_count
    }

    /// Configured base seed; `None` draws a fresh one per run.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Policy applied to rejected records.
    #[must_use]
    pub fn capacity_policy(&self) -> CapacityPolicy {
        self.capacity_policy
    }

    /// How records are scheduled.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Runs every sampling stage once and assembles a record.
    ///
    /// # Errors
    /// Returns the [`RejectionReason`] of the first stage that cannot satisfy
    /// its constraints.
    pub fn sample_record(
        &self,
        rng: &mut dyn RngCore,
    ) -> core::result::Result<MetaVariableRecord, RejectionReason> {
        let cables = self.cables.sample(&self.fixed, rng)?;
        trace!(
            stage = "cables",
            insertion_jobs = cables.insertion_jobs,
            two_sided_cables = cables.two_sided_cables,
            one_sided_cables = cables.one_sided_cables,
            "stage completed"
        );
        let housings = sample_housings(cables.insertion_jobs, rng)?;
        trace!(stage = "housings", value = housings, "stage completed");
        let side_cables = sample_side_cables(
            &SideCableContext {
                two_sided_cables: cables.two_sided_cables,
                housings,
            },
            self.fixed.side_cables,
            rng,
        )?;
        trace!(stage = "side_cables", value = side_cables, "stage completed");
        let housing_types = sample_housing_types(
            &HousingTypeContext {
                two_sided_cables: cables.two_sided_cables,
                housings,
            },
            rng,
        )?;
        trace!(stage = "housing_types", value = housing_types, "stage completed");
        let central = CentralCavityContext {
            insertion_jobs: cables.insertion_jobs,
            housings,
            housing_types,
            two_sided_cables: cables.two_sided_cables,
            side_cables,
        };
        let free_central_cavities = sample_central_cavities(&central, rng)?;
        trace!(
            stage = "central_cavities",
            value = free_central_cavities,
            "stage completed"
        );
        let free_normal_cavities = sample_normal_cavities(
            &NormalCavityContext {
                insertion_jobs: cables.insertion_jobs,
                housings,
                housing_types,
                needed_small_cavities: side_cables
                    + cables.two_sided_cables
                    + cables.one_sided_cables,
                needed_central_cavities: central.central_load() + free_central_cavities,
                light_load: self.light_load,
            },
            rng,
        )?;
        trace!(
            stage = "normal_cavities",
            value = free_normal_cavities,
            "stage completed"
        );

        Ok(MetaVariableRecord {
            two_sided_cables: cables.two_sided_cables,
            one_sided_cables: cables.one_sided_cables,
            side_cables,
            housings,
            housing_types,
            free_central_cavities,
            free_normal_cavities,
        })
    }

    /// Generates the configured number of records.
    ///
    /// Record `i` draws from a stream derived from the base seed and `i`, so
    /// the output does not depend on the execution strategy.
    ///
    /// # Errors
    /// Returns [`GenerationError::Rejected`] or
    /// [`GenerationError::AttemptsExhausted`] for the lowest-indexed record
    /// that could not be completed under the capacity policy.
    #[instrument(
        name = "core.generate",
        err,
        skip(self),
        fields(
            records = self.record_count.get(),
            policy = ?self.capacity_policy,
            strategy = ?self.execution_strategy,
            seed = field::Empty,
        ),
    )]
    pub fn generate(&self) -> Result<GeneratedBatch> {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        Span::current().record("seed", seed);

        let count = self.record_count.get();
        let drawn: Vec<Drawn> = match self.execution_strategy {
            ExecutionStrategy::Sequential => (0..count)
                .map(|index| self.draw_record(seed, index))
                .collect::<Result<_>>()?,
            ExecutionStrategy::Parallel => {
                let outcomes: Vec<Result<Drawn>> = (0..count)
                    .into_par_iter()
                    .map(|index| self.draw_record(seed, index))
                    .collect();
                // Report the lowest-indexed failure, as the sequential run does.
                outcomes.into_iter().collect::<Result<_>>()?
            }
        };

        let resampled = drawn.iter().filter(|drawn| drawn.resampled).count();
        if resampled > 0 {
            warn!(resampled, "records were resampled after capacity rejections");
        }
        let records: Vec<MetaVariableRecord> =
            drawn.into_iter().map(|drawn| drawn.record).collect();
        info!(records = records.len(), seed, "generation completed");
        Ok(GeneratedBatch {
            seed,
            records,
            resampled,
        })
    }

    fn draw_record(&self, seed: u64, index: usize) -> Result<Drawn> {
        let mut rng = record_rng(seed, index);
        match self.capacity_policy {
            CapacityPolicy::Abort => self
                .sample_record(&mut rng)
                .map(|record| Drawn {
                    record,
                    resampled: false,
                })
                .map_err(|reason| {
                    log_rejection(index, 1, reason);
                    GenerationError::Rejected {
                        record: index,
                        reason,
                    }
                }),
            CapacityPolicy::Resample { max_attempts } => {
                let mut attempt = 1;
                loop {
                    match self.sample_record(&mut rng) {
                        Ok(record) => {
                            return Ok(Drawn {
                                record,
                                resampled: attempt > 1,
                            });
                        }
                        Err(reason) => {
                            log_rejection(index, attempt, reason);
                            if attempt >= max_attempts {
                                return Err(GenerationError::AttemptsExhausted {
                                    record: index,
                                    attempts: attempt,
                                    last: reason,
                                });
                            }
                            attempt += 1;
                        }
                    }
                }
            }
        }
    }
}

fn log_rejection(index: usize, attempt: u32, reason: RejectionReason) {
    debug!(
        record = index,
        attempt,
        code = reason.code().as_str(),
        %reason,
        "record rejected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{
        builder::GeneratorBuilder, error::RejectionReasonCode, invariants, validate::Overrides,
    };

    fn generator(overrides: Overrides, policy: CapacityPolicy) -> Generator {
        GeneratorBuilder::new()
            .with_overrides(overrides)
            .with_record_count(200)
            .with_seed(2024)
            .with_capacity_policy(policy)
            .build()
            .expect("configuration is valid")
    }

    #[rstest]
    #[case(Overrides::default())]
    #[case(Overrides { insertion_jobs: Some(50), ..Overrides::default() })]
    #[case(Overrides {
        two_sided_cables: Some(40),
        side_cables: Some(10),
        ..Overrides::default()
    })]
    #[case(Overrides {
        insertion_jobs: Some(7),
        one_sided_cables: Some(1),
        ..Overrides::default()
    })]
    fn generated_records_satisfy_invariants(#[case] overrides: Overrides) {
        let policy = CapacityPolicy::Resample { max_attempts: 50 };
        let batch = generator(overrides, policy)
            .generate()
            .expect("generation succeeds");
        assert_eq!(batch.records().len(), 200);
        for record in batch.records() {
            invariants::check(record).expect("record is healthy");
        }
    }

    #[test]
    fn fixed_side_cables_above_sampled_two_sided_cables_abort() {
        // Sampled B drops below three in about one record out of twenty.
        let overrides = Overrides {
            one_sided_cables: Some(20),
            side_cables: Some(3),
            ..Overrides::default()
        };
        let err = GeneratorBuilder::new()
            .with_overrides(overrides)
            .with_record_count(400)
            .with_seed(5)
            .build()
            .expect("configuration is valid")
            .generate()
            .expect_err("some sampled B fall below three side cables");
        assert_eq!(
            err.rejection_code(),
            Some(RejectionReasonCode::SideCablesExceedTwoSided)
        );
    }

    #[test]
    fn abort_reports_lowest_failing_record_in_parallel() {
        let build = |strategy| {
            GeneratorBuilder::new()
                .with_overrides(Overrides {
                    side_cables: Some(2),
                    ..Overrides::default()
                })
                .with_record_count(300)
                .with_seed(99)
                .with_execution_strategy(strategy)
                .build()
                .expect("configuration is valid")
        };
        let sequential = build(ExecutionStrategy::Sequential).generate();
        let parallel = build(ExecutionStrategy::Parallel).generate();
        assert!(sequential.is_err());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn resampling_recovers_from_rejections() {
        let overrides = Overrides {
            side_cables: Some(2),
            ..Overrides::default()
        };
        let batch = generator(overrides, CapacityPolicy::Resample { max_attempts: 200 })
            .generate()
            .expect("resampling finds valid records");
        assert!(batch.resampled() > 0);
        assert!(batch.records().iter().all(|record| record.side_cables == 2));
    }

    #[test]
    fn exhausted_attempts_report_last_reason() {
        let overrides = Overrides {
            two_sided_cables: Some(0),
            one_sided_cables: Some(0),
            ..Overrides::default()
        };
        let err = generator(overrides, CapacityPolicy::Resample { max_attempts: 3 })
            .generate()
            .expect_err("zero cables never yield a record");
        assert_eq!(
            err,
            GenerationError::AttemptsExhausted {
                record: 0,
                attempts: 3,
                last: RejectionReason::NoInsertionJobs,
            }
        );
    }

    #[test]
    fn generator_exposes_validated_overrides_and_owned_records() {
        let overrides = Overrides {
            insertion_jobs: Some(30),
            side_cables: Some(1),
            ..Overrides::default()
        };
        let generator = generator(overrides, CapacityPolicy::Resample { max_attempts: 50 });
        let fixed = generator.fixed_values();
        assert_eq!(fixed.insertion_jobs, Some(30));
        assert_eq!(fixed.two_sided_cables, None);
        assert_eq!(fixed.side_cables, Some(1));

        let batch = generator.generate().expect("generation succeeds");
        let borrowed = batch.records().to_vec();
        let owned = batch.into_records();
        assert_eq!(owned, borrowed);
        assert!(owned.iter().all(|record| record.insertion_jobs() == 30));
    }

    #[test]
    fn unseeded_runs_report_their_seed() {
        let generator = GeneratorBuilder::new()
            .with_record_count(3)
            .build()
            .expect("configuration is valid");
        let batch = generator.generate().expect("generation succeeds");
        let replay = GeneratorBuilder::new()
            .with_record_count(3)
            .with_seed(batch.seed())
            .build()
            .expect("configuration is valid")
            .generate()
            .expect("generation succeeds");
        assert_eq!(batch.records(), replay.records());
    }
}
