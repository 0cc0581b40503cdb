//! Two-sided and one-sided cable counts.
//!
//! Two-sided cables follow the empirical distribution observed for instances
//! with at most 40 two-sided cables, with a uniform tail above that. One-sided
//! cables are drawn conditionally on either the two-sided cables or a fixed
//! insertion-job count.

use rand::{Rng, RngCore, distributions::WeightedIndex};
use rand_distr::Distribution;

use crate::{
    distributions::{ExponentialPower, Lomax, round_count},
    error::{GenerationError, RejectionReason},
    limits::{MAX_INSERTION_JOBS, MAX_ONE_SIDED_CABLES, MAX_SAMPLED_TWO_SIDED_CABLES},
    validate::FixedValues,
};

use super::to_count;

/// Observed frequencies of two-sided cable counts `0..=40`.
const TWO_SIDED_WEIGHTS: [u32; 41] = [
    3, 3, 4, 8, 3, 2, 10, 2, 10, 5, 10, 1, 10, 7, 1, 5, 2, 4, 8, 3, 17, 3, 4, 5, 5, 9, 2, 5, 2, 7,
    8, 4, 5, 1, 10, 9, 1, 3, 3, 5, 9,
];
/// Share of instances with more than 40 two-sided cables.
const TWO_SIDED_TAIL_PROBABILITY: f64 = 0.105;
const TWO_SIDED_TAIL_MIN: u32 = 41;

/// Share of instances without any one-sided cable.
const NO_ONE_SIDED_PROBABILITY: f64 = 0.8;
/// Cap applied to one-sided cables when fewer than four two-sided cables exist.
const FEW_TWO_SIDED_ONE_SIDED_CAP: u32 = 10;
const FEW_TWO_SIDED_THRESHOLD: u32 = 4;

/// The cable counts of one record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CableCounts {
    /// Insertion jobs `k = 2B + O`.
    pub insertion_jobs: u32,
    /// Two-sided cables `B`.
    pub two_sided_cables: u32,
    /// One-sided cables `O`.
    pub one_sided_cables: u32,
}

/// Draws [`CableCounts`], honouring any fixed overrides.
#[derive(Clone, Debug)]
pub struct CableSampler {
    two_sided_bins: WeightedIndex<u32>,
    one_sided_given_two_sided: Lomax,
    one_sided_given_insertion_jobs: ExponentialPower,
}

impl CableSampler {
    /// Builds the sampler from the fitted cable models.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidModel`] when a model rejects its
    /// parameters.
    pub fn new() -> Result<Self, GenerationError> {
        let two_sided_bins =
            WeightedIndex::new(TWO_SIDED_WEIGHTS).map_err(|err| GenerationError::InvalidModel {
                model: "two-sided cables",
                reason: err.to_string(),
            })?;
        let one_sided_given_two_sided =
            Lomax::new(5.09, 1.00, 18.29).map_err(|reason| GenerationError::InvalidModel {
                model: "one-sided cables given two-sided cables",
                reason,
            })?;
        let one_sided_given_insertion_jobs = ExponentialPower::new(0.68, 2.00, 7.59).map_err(
            |reason| GenerationError::InvalidModel {
                model: "one-sided cables given insertion jobs",
                reason,
            },
        )?;
        Ok(Self {
            two_sided_bins,
            one_sided_given_two_sided,
            one_sided_given_insertion_jobs,
        })
    }

    /// Draws the cable counts of one record.
    ///
    /// Which variables are sampled depends on which of `k` and `B` are fixed;
    /// a fixed `O` replaces the sampled one in every branch.
    ///
    /// # Errors
    /// Returns [`RejectionReason::NoInsertionJobs`] when the draw yields zero
    /// cables and [`RejectionReason::InsertionJobsExceedLimit`] when `2B + O`
    /// exceeds 198.
    pub fn sample(
        &self,
        fixed: &FixedValues,
        rng: &mut dyn RngCore,
    ) -> Result<CableCounts, RejectionReason> {
        let counts = match (fixed.insertion_jobs, fixed.two_sided_cables) {
            (Some(insertion_jobs), Some(two_sided_cables)) => CableCounts {
                insertion_jobs,
                two_sided_cables,
                one_sided_cables: insertion_jobs.saturating_sub(2 * two_sided_cables),
            },
            (Some(insertion_jobs), None) => {
                let one_sided_cables = fixed.one_sided_cables.unwrap_or_else(|| {
                    self.one_sided_given_insertion_jobs(insertion_jobs, rng)
                });
                CableCounts {
                    insertion_jobs,
                    two_sided_cables: insertion_jobs.saturating_sub(one_sided_cables) / 2,
                    one_sided_cables,
                }
            }
            (None, two_sided_cables) => {
                let two_sided_cables = two_sided_cables.unwrap_or_else(|| {
                    let sampled = self.two_sided(rng);
                    // A fixed O keeps B + O within the sampled range.
                    fixed.one_sided_cables.map_or(sampled, |one_sided_cables| {
                        sampled.min(MAX_SAMPLED_TWO_SIDED_CABLES.saturating_sub(one_sided_cables))
                    })
                });
                let one_sided_cables = fixed
                    .one_sided_cables
                    .unwrap_or_else(|| self.one_sided_given_two_sided(two_sided_cables, rng));
                CableCounts {
                    insertion_jobs: 2 * two_sided_cables + one_sided_cables,
                    two_sided_cables,
                    one_sided_cables,
                }
            }
        };
        if counts.insertion_jobs == 0 {
            return Err(RejectionReason::NoInsertionJobs);
        }
        if counts.insertion_jobs > MAX_INSERTION_JOBS {
            return Err(RejectionReason::InsertionJobsExceedLimit {
                insertion_jobs: counts.insertion_jobs,
            });
        }
        Ok(counts)
    }

    /// Draws two-sided cables from the empirical distribution.
    pub fn two_sided(&self, rng: &mut dyn RngCore) -> u32 {
        if rng.gen_bool(TWO_SIDED_TAIL_PROBABILITY) {
            return rng.gen_range(TWO_SIDED_TAIL_MIN..=MAX_SAMPLED_TWO_SIDED_CABLES);
        }
        let bin = self.two_sided_bins.sample(rng);
        u32::try_from(bin).unwrap_or(TWO_SIDED_TAIL_MIN - 1)
    }

    /// Draws one-sided cables for a record with `two_sided_cables`.
    ///
    /// The result keeps `B + O` at or below 99.
    pub fn one_sided_given_two_sided(&self, two_sided_cables: u32, rng: &mut dyn RngCore) -> u32 {
        if two_sided_cables != 0 && rng.gen_bool(NO_ONE_SIDED_PROBABILITY) {
            return 0;
        }
        let mut value = to_count(round_count(self.one_sided_given_two_sided.sample(rng)))
            .min(MAX_ONE_SIDED_CABLES);
        if two_sided_cables < FEW_TWO_SIDED_THRESHOLD {
            value = value.min(FEW_TWO_SIDED_ONE_SIDED_CAP);
        }
        value.min(MAX_SAMPLED_TWO_SIDED_CABLES.saturating_sub(two_sided_cables))
    }

    /// Draws one-sided cables for a fixed `insertion_jobs`.
    ///
    /// The result never exceeds `insertion_jobs` and leaves an even remainder
    /// so the two-sided cables stay integral.
    pub fn one_sided_given_insertion_jobs(
        &self,
        insertion_jobs: u32,
        rng: &mut dyn RngCore,
    ) -> u32 {
        if rng.gen_bool(NO_ONE_SIDED_PROBABILITY) {
            return insertion_jobs % 2;
        }
        let value = to_count(round_count(self.one_sided_given_insertion_jobs.sample(rng)))
            .min(MAX_ONE_SIDED_CABLES);
        if value > insertion_jobs {
            insertion_jobs
        } else if (insertion_jobs - value) % 2 == 1 {
            value.checked_sub(1).unwrap_or(1)
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::sampling::test_support::{DRAWS, rng};

    fn sampler() -> CableSampler {
        CableSampler::new().expect("fitted models are valid")
    }

    fn fixed(
        insertion_jobs: Option<u32>,
        two_sided_cables: Option<u32>,
        one_sided_cables: Option<u32>,
    ) -> FixedValues {
        FixedValues {
            insertion_jobs,
            two_sided_cables,
            one_sided_cables,
            side_cables: None,
        }
    }

    #[test]
    fn sampled_two_sided_cables_stay_in_range() {
        let sampler = sampler();
        let mut rng = rng(1);
        let draws: Vec<u32> = (0..DRAWS).map(|_| sampler.two_sided(&mut rng)).collect();
        assert!(draws.iter().all(|&value| value <= MAX_SAMPLED_TWO_SIDED_CABLES));
        let tail = draws.iter().filter(|&&value| value > 40).count();
        // Expected share is 10.5%.
        assert!((100..=330).contains(&tail), "tail draws: {tail}");
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(3)]
    #[case(50)]
    #[case(95)]
    #[case(100)]
    fn one_sided_given_two_sided_respects_caps(#[case] two_sided_cables: u32) {
        let sampler = sampler();
        let mut rng = rng(u64::from(two_sided_cables));
        for _ in 0..DRAWS {
            let value = sampler.one_sided_given_two_sided(two_sided_cables, &mut rng);
            assert!(value <= MAX_ONE_SIDED_CABLES);
            assert!(two_sided_cables >= 99 || two_sided_cables + value <= 99);
            if two_sided_cables < 4 {
                assert!(value <= 10);
            }
        }
    }

    #[test]
    fn zero_two_sided_cables_always_draw_one_sided_cables() {
        let sampler = sampler();
        let mut rng = rng(9);
        assert!((0..DRAWS).all(|_| sampler.one_sided_given_two_sided(0, &mut rng) >= 1));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    #[case(50)]
    #[case(51)]
    #[case(198)]
    fn one_sided_given_insertion_jobs_preserves_parity(#[case] insertion_jobs: u32) {
        let sampler = sampler();
        let mut rng = rng(u64::from(insertion_jobs) + 100);
        for _ in 0..DRAWS {
            let value = sampler.one_sided_given_insertion_jobs(insertion_jobs, &mut rng);
            assert!(value <= insertion_jobs.min(MAX_ONE_SIDED_CABLES));
            assert_eq!((insertion_jobs - value) % 2, 0);
        }
    }

    #[test]
    fn both_fixed_derives_one_sided_cables() {
        let counts = sampler()
            .sample(&fixed(Some(50), Some(20), None), &mut rng(0))
            .expect("fixed counts are consistent");
        assert_eq!(
            counts,
            CableCounts {
                insertion_jobs: 50,
                two_sided_cables: 20,
                one_sided_cables: 10,
            }
        );
    }

    #[rstest]
    #[case::k_fixed(fixed(Some(50), None, None))]
    #[case::k_and_o_fixed(fixed(Some(51), None, Some(3)))]
    #[case::b_fixed(fixed(None, Some(30), None))]
    #[case::b_and_o_fixed(fixed(None, Some(30), Some(4)))]
    #[case::unset(fixed(None, None, None))]
    #[case::o_fixed(fixed(None, None, Some(2)))]
    fn sampled_counts_keep_insertion_jobs_consistent(#[case] values: FixedValues) {
        let sampler = sampler();
        let mut rng = rng(77);
        for _ in 0..DRAWS {
            let counts = sampler
                .sample(&values, &mut rng)
                .expect("draws with these overrides are never empty");
            assert_eq!(
                counts.insertion_jobs,
                2 * counts.two_sided_cables + counts.one_sided_cables
            );
            if let Some(insertion_jobs) = values.insertion_jobs {
                assert_eq!(counts.insertion_jobs, insertion_jobs);
            }
            if let Some(two_sided_cables) = values.two_sided_cables {
                assert_eq!(counts.two_sided_cables, two_sided_cables);
            }
            if let Some(one_sided_cables) = values.one_sided_cables {
                assert_eq!(counts.one_sided_cables, one_sided_cables);
            }
        }
    }

    #[rstest]
    #[case::full_two_sided(fixed(None, Some(100), None), 200)]
    #[case::two_sided_and_one_sided(fixed(None, Some(99), Some(20)), 218)]
    fn draws_above_the_job_limit_are_rejected(
        #[case] values: FixedValues,
        #[case] insertion_jobs: u32,
    ) {
        let err = sampler()
            .sample(&values, &mut rng(4))
            .expect_err("2B + O is above 198");
        assert_eq!(err, RejectionReason::InsertionJobsExceedLimit { insertion_jobs });
    }

    #[test]
    fn largest_fixed_two_sided_cables_fill_the_job_limit() {
        let sampler = sampler();
        let mut rng = rng(12);
        for _ in 0..DRAWS {
            let counts = sampler
                .sample(&fixed(None, Some(99), None), &mut rng)
                .expect("99 two-sided cables leave no room for one-sided cables");
            assert_eq!(counts.insertion_jobs, MAX_INSERTION_JOBS);
        }
    }

    #[test]
    fn fixed_one_sided_cables_cap_sampled_two_sided_cables() {
        let sampler = sampler();
        let mut rng = rng(31);
        for _ in 0..DRAWS {
            let counts = sampler
                .sample(&fixed(None, None, Some(20)), &mut rng)
                .expect("twenty one-sided cables are never empty");
            assert!(counts.two_sided_cables + counts.one_sided_cables <= 99);
        }
    }

    #[test]
    fn empty_draw_is_rejected() {
        let err = sampler()
            .sample(&fixed(None, Some(0), Some(0)), &mut rng(0))
            .expect_err("zero cables must be rejected");
        assert_eq!(err, RejectionReason::NoInsertionJobs);
    }
}
