//! Conditional sampling stages of the meta-variable pipeline.
//!
//! Each stage consumes only the variables produced by the stages before it:
//!
//! 1. [`cables`]: two-sided and one-sided cables, hence insertion jobs.
//! 2. [`housings`]: normal housings from insertion jobs.
//! 3. [`side_cables`]: side cables from housings and two-sided cables.
//! 4. [`housing_types`]: distinct housing types.
//! 5. [`central_cavities`]: free central-plug cavities.
//! 6. [`normal_cavities`]: free cavities across the normal housings.
//!
//! Piecewise models are expressed as [`crate::rules::RuleTable`]s; fixed
//! corrections that follow a draw are plain functions next to their table.

pub mod cables;
pub mod central_cavities;
pub mod housing_types;
pub mod housings;
pub mod normal_cavities;
pub mod side_cables;

/// Converts a rounded model value into a count, clamping negatives to zero.
pub(crate) fn to_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Seeded RNG helpers shared by the stage tests.

    use rand::{SeedableRng, rngs::SmallRng};

    /// Number of draws used by distributional stage tests.
    pub(crate) const DRAWS: u64 = 2_000;

    pub(crate) fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }
}
