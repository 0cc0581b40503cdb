//! Ordered rule tables for the piecewise statistical models.
//!
//! Each piecewise model is a static list of [`Rule`]s. The first rule whose
//! predicate matches the stage context supplies the draw, so every regime of
//! a model can be inspected and exercised on its own.

use rand::RngCore;
use tracing::trace;

use crate::error::RejectionReason;

/// One regime of a piecewise model.
pub struct Rule<C, T> {
    /// Short name reported in traces and tests.
    pub label: &'static str,
    /// Returns `true` when this regime covers the context.
    pub applies: fn(&C) -> bool,
    /// Draws a value for a context covered by [`Self::applies`].
    pub draw: fn(&C, &mut dyn RngCore) -> T,
}

/// A named, ordered list of [`Rule`]s evaluated first-match.
///
/// # Examples
/// ```
/// use ctw_core::rules::{Rule, RuleTable};
/// use rand::{RngCore, SeedableRng, rngs::SmallRng};
///
/// fn small(value: &u32) -> bool { *value < 10 }
/// fn always(_: &u32) -> bool { true }
/// fn zero(_: &u32, _: &mut dyn RngCore) -> u32 { 0 }
/// fn double(value: &u32, _: &mut dyn RngCore) -> u32 { value * 2 }
///
/// static RULES: [Rule<u32, u32>; 2] = [
///     Rule { label: "small", applies: small, draw: zero },
///     Rule { label: "large", applies: always, draw: double },
/// ];
/// static TABLE: RuleTable<u32, u32> = RuleTable::new("demo", &RULES);
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// assert_eq!(TABLE.evaluate(&4, &mut rng), Ok(0));
/// assert_eq!(TABLE.evaluate(&12, &mut rng), Ok(24));
/// ```
pub struct RuleTable<C: 'static, T: 'static> {
    name: &'static str,
    rules: &'static [Rule<C, T>],
}

impl<C: 'static, T: 'static> RuleTable<C, T> {
    /// Creates a table named `name` from `rules` in evaluation order.
    #[must_use]
    pub const fn new(name: &'static str, rules: &'static [Rule<C, T>]) -> Self {
        Self { name, rules }
    }

    /// Returns the table name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub const fn rules(&self) -> &'static [Rule<C, T>] {
        self.rules
    }

    /// Returns the first rule covering `context`.
    #[must_use]
    pub fn select(&self, context: &C) -> Option<&'static Rule<C, T>> {
        self.rules.iter().find(|rule| (rule.applies)(context))
    }

    /// Draws a value from the first rule covering `context`.
    ///
    /// # Errors
    /// Returns [`RejectionReason::RuleTableExhausted`] when no rule covers
    /// `context`.
    pub fn evaluate(&self, context: &C, rng: &mut dyn RngCore) -> Result<T, RejectionReason> {
        let rule = self
            .select(context)
            .ok_or(RejectionReason::RuleTableExhausted { table: self.name })?;
        trace!(table = self.name, rule = rule.label, "rule selected");
        Ok((rule.draw)(context, rng))
    }
}
