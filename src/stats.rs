//! # Moment Statistics
//!
//! $$
//! \mu = 252\,\bar r, \qquad \Sigma = 252\,\widehat{\mathrm{Cov}}(r)
//! $$
//!
//! Annualized sample moments of a return sample and portfolio summary
//! statistics for a given weight vector.

use ndarray::Array1;
use ndarray::Array2;

use crate::data::ReturnTable;

/// Trading days per year, applied once whenever statistics are computed.
pub const TRADING_DAYS: f64 = 252.0;

/// Annualized per-asset mean of a return sample.
pub fn annualized_mean(returns: &Array2<f64>) -> Array1<f64> {
  let rows = returns.nrows();
  let cols = returns.ncols();
  let mut mu = Array1::<f64>::zeros(cols);
  if rows == 0 {
    return mu;
  }

  for j in 0..cols {
    let mut s = 0.0;
    for i in 0..rows {
      s += returns[[i, j]];
    }
    mu[j] = s / rows as f64 * TRADING_DAYS;
  }

  mu
}

/// Annualized sample covariance of a return sample.
///
/// Uses the unbiased `n - 1` denominator. With fewer than two observations
/// the covariance is the zero matrix, matching the single-observation
/// convention used throughout the crate.
pub fn annualized_cov(returns: &Array2<f64>) -> Array2<f64> {
  let rows = returns.nrows();
  let cols = returns.ncols();
  let mut cov = Array2::<f64>::zeros((cols, cols));
  if rows < 2 {
    return cov;
  }

  let mut mean = vec![0.0; cols];
  for j in 0..cols {
    let mut s = 0.0;
    for i in 0..rows {
      s += returns[[i, j]];
    }
    mean[j] = s / rows as f64;
  }

  for j in 0..cols {
    for k in j..cols {
      let mut acc = 0.0;
      for i in 0..rows {
        acc += (returns[[i, j]] - mean[j]) * (returns[[i, k]] - mean[k]);
      }
      let c = acc / (rows - 1) as f64 * TRADING_DAYS;
      cov[[j, k]] = c;
      cov[[k, j]] = c;
    }
  }

  cov
}

/// Annualized summary statistics of a fixed-weight portfolio.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortfolioStats {
  /// Annualized expected portfolio return `w · μ`.
  pub annual_return: f64,
  /// Annualized portfolio volatility `√(wᵀΣw)`.
  pub annual_volatility: f64,
  /// Sharpe ratio at zero risk-free rate.
  pub sharpe: f64,
}

/// Compute [`PortfolioStats`] for a weight vector over a return table.
pub fn portfolio_stats(weights: &Array1<f64>, returns: &ReturnTable) -> PortfolioStats {
  let mu = annualized_mean(returns.values());
  let cov = annualized_cov(returns.values());

  let annual_return = weights.dot(&mu);
  let annual_volatility = weights.dot(&cov.dot(weights)).max(0.0).sqrt();
  let sharpe = if annual_volatility > 1e-15 {
    annual_return / annual_volatility
  } else {
    0.0
  };

  PortfolioStats {
    annual_return,
    annual_volatility,
    sharpe,
  }
}
