//! # Max-Sharpe Baseline
//!
//! $$
//! \mathbf{w}^\* = \arg\max_{\mathbf{w}\in\Delta^{n-1}} \frac{\mathbf{w}^\top\mu - r_f}{\sqrt{\mathbf{w}^\top\Sigma\,\mathbf{w}}}
//! $$
//!
//! Thin closed-form-style alternative to the gradient optimizer: Nelder-Mead
//! over softmax-reparameterized weights, maximizing the Sharpe ratio.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use ndarray::Array2;

use crate::data::ReturnTable;
use crate::error::PortfolioError;
use crate::stats::annualized_cov;
use crate::stats::annualized_mean;

fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

/// Output of the max-Sharpe solve.
#[derive(Clone, Debug, Default)]
pub struct FrontierResult {
  /// Long-only portfolio weights, index-aligned with the return table.
  pub weights: Array1<f64>,
  /// Annualized expected portfolio return.
  pub expected_return: f64,
  /// Annualized portfolio volatility.
  pub volatility: f64,
  /// Sharpe ratio `(expected_return - risk_free) / volatility`.
  pub sharpe: f64,
}

/// Find Sharpe-optimal long-only weights for a return table.
///
/// Needs at least two return rows for a meaningful covariance. The softmax
/// reparameterization keeps every Nelder-Mead iterate strictly inside the
/// simplex; on solver failure the uniform portfolio is reported instead.
pub fn max_sharpe(returns: &ReturnTable, risk_free: f64) -> Result<FrontierResult, PortfolioError> {
  let n = returns.n_assets();
  if n == 0 || returns.n_rows() < 2 {
    return Err(PortfolioError::InsufficientData(format!(
      "max_sharpe needs at least 2 return rows and 1 asset, got {}x{}",
      returns.n_rows(),
      n
    )));
  }

  let mu = annualized_mean(returns.values());
  let cov = annualized_cov(returns.values());

  struct SharpeCost {
    mu: Array1<f64>,
    cov: Array2<f64>,
    risk_free: f64,
  }

  impl CostFunction for SharpeCost {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
      let w = Array1::from_vec(softmax(x));
      let port_ret = w.dot(&self.mu);
      let port_vol = w.dot(&self.cov.dot(&w)).max(0.0).sqrt();
      if port_vol < 1e-12 {
        return Ok(1e10);
      }

      Ok(-(port_ret - self.risk_free) / port_vol)
    }
  }

  let cost = SharpeCost {
    mu: mu.clone(),
    cov: cov.clone(),
    risk_free,
  };

  let x0 = vec![0.0; n];
  let mut simplex = Vec::with_capacity(n + 1);
  simplex.push(x0.clone());
  for i in 0..n {
    let mut point = x0.clone();
    point[i] = 1.0;
    simplex.push(point);
  }

  let w = match NelderMead::new(simplex).with_sd_tolerance(1e-8) {
    Ok(solver) => {
      match Executor::new(cost, solver)
        .configure(|state| state.max_iters(5000))
        .run()
      {
        Ok(res) => {
          let best_x = res.state.best_param.unwrap_or(x0);
          softmax(&best_x)
        }
        Err(_) => vec![1.0 / n as f64; n],
      }
    }
    Err(_) => vec![1.0 / n as f64; n],
  };

  let w = Array1::from_vec(w);
  let expected_return = w.dot(&mu);
  let volatility = w.dot(&cov.dot(&w)).max(0.0).sqrt();
  let sharpe = if volatility > 1e-15 {
    (expected_return - risk_free) / volatility
  } else {
    0.0
  };

  Ok(FrontierResult {
    weights: w,
    expected_return,
    volatility,
    sharpe,
  })
}
