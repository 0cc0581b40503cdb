//! Distinct housing types among the normal housings.

use rand::{Rng, RngCore};

use crate::{
    distributions::{gaussian_noise, round_count},
    error::RejectionReason,
    rules::{Rule, RuleTable},
};

use super::to_count;

/// Inputs of the housing-type model.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HousingTypeContext {
    /// Two-sided cables `B`.
    pub two_sided_cables: u32,
    /// Normal housings.
    pub housings: u32,
}

static HOUSING_TYPE_RULES: [Rule<HousingTypeContext, u32>; 4] = [
    Rule {
        label: "many_two_sided",
        applies: many_two_sided,
        draw: draw_many_two_sided,
    },
    Rule {
        label: "few_housings",
        applies: few_housings,
        draw: draw_few_housings,
    },
    Rule {
        label: "some_housings",
        applies: some_housings,
        draw: draw_some_housings,
    },
    Rule {
        label: "many_housings",
        applies: many_housings,
        draw: draw_many_housings,
    },
];

/// Housing-type model keyed on two-sided cables and housings.
pub static HOUSING_TYPES: RuleTable<HousingTypeContext, u32> =
    RuleTable::new("housing_types", &HOUSING_TYPE_RULES);

/// Draws the number of distinct housing types.
///
/// # Errors
/// Returns [`RejectionReason::RuleTableExhausted`] if the model does not
/// cover the context.
pub fn sample_housing_types(
    context: &HousingTypeContext,
    rng: &mut dyn RngCore,
) -> Result<u32, RejectionReason> {
    HOUSING_TYPES.evaluate(context, rng)
}

const fn many_two_sided(context: &HousingTypeContext) -> bool {
    context.two_sided_cables > 37
}

const fn few_housings(context: &HousingTypeContext) -> bool {
    context.housings < 3
}

const fn some_housings(context: &HousingTypeContext) -> bool {
    context.housings < 13
}

const fn many_housings(_: &HousingTypeContext) -> bool {
    true
}

fn draw_many_two_sided(context: &HousingTypeContext, rng: &mut dyn RngCore) -> u32 {
    let value = to_count(3 + round_count(gaussian_noise(rng, 1.0)));
    value.max(2).min(context.housings).max(1)
}

fn draw_few_housings(context: &HousingTypeContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(1..=context.housings.max(1))
}

fn draw_some_housings(context: &HousingTypeContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(2..=context.housings)
}

fn draw_many_housings(context: &HousingTypeContext, rng: &mut dyn RngCore) -> u32 {
    if rng.gen_bool(0.9) {
        to_count(8 + round_count(gaussian_noise(rng, 1.0)))
            .min(context.housings)
            .max(1)
    } else {
        rng.gen_range(2..=6)
    }
}
