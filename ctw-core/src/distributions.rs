//! Continuous distributions fitted to the observed CTW instance data.
//!
//! Parameters follow the `loc`/`scale` convention of the fitted models: a
//! standardised draw `x` becomes `loc + scale * x`.

use rand::Rng;
use rand_distr::{Distribution, InverseGaussian, Pareto, StandardNormal};

/// Lomax (Pareto type II) distribution.
///
/// A Lomax variate is a unit-scale Pareto variate shifted down by one.
#[derive(Clone, Copy, Debug)]
pub struct Lomax {
    pareto: Pareto<f64>,
    loc: f64,
    scale: f64,
}

impl Lomax {
    /// Builds a Lomax distribution with tail index `shape`.
    ///
    /// # Errors
    /// Returns a description of the rejected parameter when `shape` is not
    /// strictly positive.
    pub fn new(shape: f64, loc: f64, scale: f64) -> Result<Self, String> {
        let pareto = Pareto::new(1.0, shape).map_err(|err| err.to_string())?;
        Ok(Self { pareto, loc, scale })
    }
}

impl Distribution<f64> for Lomax {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.loc + self.scale * (self.pareto.sample(rng) - 1.0)
    }
}

/// Exponential power distribution with CDF `1 - exp(1 - exp(x^b))`.
///
/// Sampled by inverting the CDF.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialPower {
    shape: f64,
    loc: f64,
    scale: f64,
}

impl ExponentialPower {
    /// Builds an exponential power distribution with exponent `shape`.
    ///
    /// # Errors
    /// Returns a description of the rejected parameter when `shape` is not
    /// a positive finite number.
    pub fn new(shape: f64, loc: f64, scale: f64) -> Result<Self, String> {
        if !shape.is_finite() || shape <= 0.0 {
            return Err(format!("shape must be positive and finite (got {shape})"));
        }
        Ok(Self { shape, loc, scale })
    }
}

impl Distribution<f64> for ExponentialPower {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let uniform: f64 = rng.r#gen();
        // 1 - u lies in (0, 1], so the inner logarithm is non-negative.
        let standard = (1.0 - (1.0 - uniform).ln()).ln().powf(self.shape.recip());
        self.loc + self.scale * standard
    }
}

/// Inverse Gaussian distribution with unit shape, shifted and scaled.
#[derive(Clone, Copy, Debug)]
pub struct ScaledInverseGaussian {
    inner: InverseGaussian<f64>,
    loc: f64,
    scale: f64,
}

impl ScaledInverseGaussian {
    /// Builds the distribution of `loc + scale * IG(mean, 1)`.
    ///
    /// # Errors
    /// Returns a description of the rejected parameter when `mean` is not
    /// strictly positive.
    pub fn new(mean: f64, loc: f64, scale: f64) -> Result<Self, String> {
        let inner = InverseGaussian::new(mean, 1.0).map_err(|err| err.to_string())?;
        Ok(Self { inner, loc, scale })
    }
}

impl Distribution<f64> for ScaledInverseGaussian {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.loc + self.scale * self.inner.sample(rng)
    }
}

/// Zero-mean Gaussian noise with standard deviation `sigma`.
pub fn gaussian_noise<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    let standard: f64 = rng.sample(StandardNormal);
    sigma * standard
}

/// Rounds half to even, the rounding the fitted models were evaluated with.
#[must_use]
pub fn round_count(value: f64) -> i64 {
    // Saturating float-to-int conversion; all modelled values are small.
    value.round_ties_even() as i64
}
