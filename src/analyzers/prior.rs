//! Empirical-Bayes smoothing of block success rates.
//!
//! A Beta prior is fit once, by moment matching, over the players with enough
//! plays to have a stable rate. It is then applied to every player, so a
//! lineman with a handful of snaps is pulled toward the population mean while
//! a full-season starter keeps roughly their observed rate.

use serde::Serialize;

use crate::analyzers::utility::{mean, sample_variance};
use crate::error::{RankingError, Result};
use crate::stats::PlayerAggregate;

/// Variances at or below this are treated as zero.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Beta(alpha0, beta0) prior on block-success probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaPrior {
    pub alpha0: f64,
    pub beta0: f64,
}

impl BetaPrior {
    /// Both parameters must be finite and strictly positive.
    pub fn new(alpha0: f64, beta0: f64) -> Result<Self> {
        if !(alpha0.is_finite() && beta0.is_finite() && alpha0 > 0.0 && beta0 > 0.0) {
            return Err(RankingError::degenerate(format!(
                "non-positive beta parameters (alpha0 = {alpha0}, beta0 = {beta0})"
            )));
        }
        Ok(Self { alpha0, beta0 })
    }

    /// Prior mean, the estimate for a player with no plays.
    pub fn mean(&self) -> f64 {
        self.alpha0 / (self.alpha0 + self.beta0)
    }

    /// Posterior mean after observing `successes` out of `trials`.
    pub fn posterior_mean(&self, successes: u32, trials: u32) -> f64 {
        (successes as f64 + self.alpha0) / (trials as f64 + self.alpha0 + self.beta0)
    }
}

/// Closed-form moment-matching fit of a Beta distribution to a mean and
/// variance.
///
/// Requires `0 < mu < 1` and `0 < variance < mu * (1 - mu)`.
pub fn estimate_beta_params(mu: f64, variance: f64) -> Result<BetaPrior> {
    if !(mu > 0.0 && mu < 1.0) {
        return Err(RankingError::degenerate(format!(
            "mean success rate {mu} is outside (0, 1)"
        )));
    }
    if variance.is_nan() || variance <= VARIANCE_EPSILON {
        return Err(RankingError::degenerate(format!(
            "success rates have no spread (variance = {variance})"
        )));
    }
    let max_variance = mu * (1.0 - mu);
    if variance >= max_variance {
        return Err(RankingError::degenerate(format!(
            "variance {variance} is not below mu(1 - mu) = {max_variance}"
        )));
    }

    let alpha0 = ((1.0 - mu) / variance - 1.0 / mu) * mu.powi(2);
    let beta0 = alpha0 * (1.0 / mu - 1.0);

    BetaPrior::new(alpha0, beta0)
}

/// Fits the global prior from the aggregates with at least `min_plays` plays.
///
/// # Errors
///
/// [`RankingError::DegeneratePriorFit`] if fewer than two players qualify or
/// their rates cannot be matched by a Beta distribution.
pub fn fit_prior<'a>(
    aggregates: impl IntoIterator<Item = &'a PlayerAggregate>,
    min_plays: u32,
) -> Result<BetaPrior> {
    let rates: Vec<f64> = aggregates
        .into_iter()
        .filter(|a| a.total_plays >= min_plays)
        .map(PlayerAggregate::raw_rate)
        .collect();

    let mu = mean(&rates);
    let Some(variance) = sample_variance(&rates, mu) else {
        return Err(RankingError::degenerate(format!(
            "{} player(s) with at least {min_plays} plays, need at least 2",
            rates.len()
        )));
    };

    let prior = estimate_beta_params(mu, variance)?;
    tracing::info!(
        qualifying = rates.len(),
        mu,
        variance,
        alpha0 = prior.alpha0,
        beta0 = prior.beta0,
        "Beta prior fit"
    );
    Ok(prior)
}

/// Shrunk success rate for one player.
pub fn apply_smoothing(aggregate: &PlayerAggregate, prior: &BetaPrior) -> f64 {
    prior.posterior_mean(aggregate.successful_blocks, aggregate.total_plays)
}
