//! # Constrained Optimizer
//!
//! $$
//! \mathbf{w} \leftarrow \Pi_\Delta\!\left(\mathbf{w} + \eta\,(\mu_b - \lambda\,\Sigma_b\,\mathbf{w})\right)
//! $$
//!
//! Projected mini-batch gradient descent over the probability simplex,
//! maximizing the mean-variance objective `w·μ − (λ/2)·wᵀΣw`. The returned
//! loss trajectory tracks the negative full-sample objective per epoch.

use ndarray::Array1;
use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::data::ReturnTable;
use crate::error::PortfolioError;
use crate::simplex::project_to_simplex;
use crate::stats::annualized_cov;
use crate::stats::annualized_mean;

/// Hyperparameters for [`optimize`].
#[derive(Clone, Debug)]
pub struct SgdConfig {
  /// Step size for each mini-batch update. Must be positive and finite.
  pub learning_rate: f64,
  /// Number of full passes over the return sample. Must be at least 1.
  pub epochs: usize,
  /// Risk-aversion coefficient λ. Must be non-negative and finite.
  pub risk_aversion: f64,
  /// Rows per gradient step. Must be in `1..=n_rows`; the final chunk of an
  /// epoch may be smaller when the row count does not divide evenly.
  pub batch_size: usize,
  /// Seed for the per-epoch permutation draw. A fixed seed makes the full
  /// trajectory and final weights exactly reproducible.
  pub random_seed: Option<u64>,
}

impl Default for SgdConfig {
  fn default() -> Self {
    Self {
      learning_rate: 0.01,
      epochs: 500,
      risk_aversion: 0.1,
      batch_size: 20,
      random_seed: None,
    }
  }
}

/// Final weights and per-epoch loss trajectory produced by [`optimize`].
#[derive(Clone, Debug)]
pub struct SgdOutcome {
  /// Simplex-constrained portfolio weights, index-aligned with the return
  /// table's columns.
  pub weights: Array1<f64>,
  /// Negative full-sample objective after each epoch; diagnostic only.
  pub losses: Vec<f64>,
}

/// Maximize `w·μ − (λ/2)·wᵀΣw` over the probability simplex.
///
/// Each epoch draws a fresh uniform permutation of the row indices, walks it
/// in chunks of `batch_size`, and for every chunk computes annualized batch
/// moments, takes one gradient step and projects back onto the simplex. The
/// full-sample moments are computed once up front and used only for the
/// per-epoch diagnostic loss, never for the gradient.
///
/// All precondition violations surface before any gradient step runs.
/// Non-finite values arising from degenerate but valid input are not caught
/// here; they propagate into the returned weights and it is the caller's job
/// to validate finiteness before use.
pub fn optimize(returns: &ReturnTable, config: &SgdConfig) -> Result<SgdOutcome, PortfolioError> {
  let m = returns.n_rows();
  let n = returns.n_assets();

  if m == 0 || n == 0 {
    return Err(PortfolioError::InsufficientData(format!(
      "return table is {m}x{n}, need at least one row and one asset"
    )));
  }
  if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
    return Err(PortfolioError::InvalidConfig(format!(
      "learning_rate must be positive and finite, got {}",
      config.learning_rate
    )));
  }
  if config.epochs == 0 {
    return Err(PortfolioError::InvalidConfig(
      "epochs must be at least 1".into(),
    ));
  }
  if !config.risk_aversion.is_finite() || config.risk_aversion < 0.0 {
    return Err(PortfolioError::InvalidConfig(format!(
      "risk_aversion must be non-negative and finite, got {}",
      config.risk_aversion
    )));
  }
  if config.batch_size == 0 || config.batch_size > m {
    return Err(PortfolioError::InvalidConfig(format!(
      "batch_size must be in 1..={m}, got {}",
      config.batch_size
    )));
  }

  let mu_full = annualized_mean(returns.values());
  let sigma_full = annualized_cov(returns.values());

  let mut w = Array1::from_elem(n, 1.0 / n as f64);
  let mut losses = Vec::with_capacity(config.epochs);

  let mut rng = match config.random_seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let mut order: Vec<usize> = (0..m).collect();

  for epoch in 1..=config.epochs {
    order.shuffle(&mut rng);

    for start in (0..m).step_by(config.batch_size) {
      let end = (start + config.batch_size).min(m);
      let batch = returns.values().select(Axis(0), &order[start..end]);

      let mu_b = annualized_mean(&batch);
      let sigma_b = annualized_cov(&batch);

      // Gradient of the negative objective: -(μ_b − λ·Σ_b·w).
      let grad = sigma_b.dot(&w) * config.risk_aversion - mu_b;
      w = w - grad * config.learning_rate;
      w = project_to_simplex(&w)?;
    }

    let obj = w.dot(&mu_full) - 0.5 * config.risk_aversion * w.dot(&sigma_full.dot(&w));
    losses.push(-obj);

    if epoch % 100 == 0 {
      debug!(epoch, loss = losses[epoch - 1], "sgd epoch complete");
    }
  }

  Ok(SgdOutcome { weights: w, losses })
}
