//! Normal-housing count as a noisy piecewise-linear function of `k`.
//!
//! Instances with fewer than five insertion jobs are literal special cases
//! and bypass the noisy model.

use rand::{Rng, RngCore};

use crate::{
    distributions::{gaussian_noise, round_count},
    error::RejectionReason,
    limits::MAX_HOUSINGS,
    rules::{Rule, RuleTable},
};

use super::to_count;

/// Inputs of the housing-count model.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HousingContext {
    /// Insertion jobs `k`.
    pub insertion_jobs: u32,
}

static HOUSING_RULES: [Rule<HousingContext, u32>; 6] = [
    Rule {
        label: "single_job",
        applies: single_job,
        draw: draw_single_job,
    },
    Rule {
        label: "few_jobs",
        applies: few_jobs,
        draw: draw_few_jobs,
    },
    Rule {
        label: "small",
        applies: small,
        draw: draw_small,
    },
    Rule {
        label: "medium",
        applies: medium,
        draw: draw_medium,
    },
    Rule {
        label: "large",
        applies: large,
        draw: draw_large,
    },
    Rule {
        label: "very_large",
        applies: very_large,
        draw: draw_very_large,
    },
];

/// Housing-count model keyed on insertion jobs.
pub static HOUSINGS: RuleTable<HousingContext, u32> = RuleTable::new("housings", &HOUSING_RULES);

/// Draws the normal-housing count for `insertion_jobs`.
///
/// # Errors
/// Returns [`RejectionReason::RuleTableExhausted`] if the model does not
/// cover `insertion_jobs`.
pub fn sample_housings(insertion_jobs: u32, rng: &mut dyn RngCore) -> Result<u32, RejectionReason> {
    HOUSINGS.evaluate(&HousingContext { insertion_jobs }, rng)
}

const fn single_job(context: &HousingContext) -> bool {
    context.insertion_jobs == 1
}

const fn few_jobs(context: &HousingContext) -> bool {
    context.insertion_jobs < 5
}

const fn small(context: &HousingContext) -> bool {
    context.insertion_jobs < 20
}

const fn medium(context: &HousingContext) -> bool {
    context.insertion_jobs < 71
}

const fn large(context: &HousingContext) -> bool {
    context.insertion_jobs < 110
}

const fn very_large(_: &HousingContext) -> bool {
    true
}

fn draw_single_job(_: &HousingContext, _: &mut dyn RngCore) -> u32 {
    1
}

fn draw_few_jobs(_: &HousingContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(1..=2)
}

fn draw_small(context: &HousingContext, rng: &mut dyn RngCore) -> u32 {
    let mean = 0.2 * f64::from(context.insertion_jobs);
    settle(context, mean + gaussian_noise(rng, 1.5))
}

fn draw_medium(context: &HousingContext, rng: &mut dyn RngCore) -> u32 {
    let mean = 0.2 * f64::from(context.insertion_jobs);
    settle(context, mean + gaussian_noise(rng, 2.5))
}

fn draw_large(context: &HousingContext, rng: &mut dyn RngCore) -> u32 {
    let value = 10.0 + gaussian_noise(rng, 2.5);
    settle(context, if value <= 4.5 { 5.0 } else { value })
}

fn draw_very_large(context: &HousingContext, rng: &mut dyn RngCore) -> u32 {
    settle(context, 10.0 + gaussian_noise(rng, 1.5))
}

/// Rounds a noisy housing value and applies the floors and caps shared by
/// every noisy regime.
fn settle(context: &HousingContext, value: f64) -> u32 {
    let mut housings = round_count(value);
    if housings <= 1 {
        housings = if context.insertion_jobs > 6 { 2 } else { 1 };
    }
    to_count(housings)
        .min(context.insertion_jobs / 2)
        .min(MAX_HOUSINGS)
}
