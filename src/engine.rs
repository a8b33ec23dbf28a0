//! # Allocation Engine
//!
//! $$
//! \text{prices} \to \text{returns} \to \mathbf{w}
//! $$
//!
//! Configuration-driven orchestration: turn a price table into a
//! ticker-keyed allocation using the selected optimization method.

use ndarray::Array1;
use tracing::info;

use crate::data::PriceTable;
use crate::data::compute_returns;
use crate::error::PortfolioError;
use crate::frontier::max_sharpe;
use crate::sgd::SgdConfig;
use crate::sgd::optimize;
use crate::stats::PortfolioStats;
use crate::stats::portfolio_stats;

/// Supported allocation methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AllocationMethod {
  /// Projected mini-batch gradient descent over the simplex.
  #[default]
  Sgd,
  /// Nelder-Mead max-Sharpe baseline.
  MaxSharpe,
}

impl AllocationMethod {
  /// Parse a string into an [`AllocationMethod`].
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "sharpe" | "max-sharpe" | "maxsharpe" => Self::MaxSharpe,
      _ => Self::Sgd,
    }
  }
}

/// Runtime configuration for [`PortfolioEngine`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
  /// Method used by [`PortfolioEngine::allocate`].
  pub method: AllocationMethod,
  /// Hyperparameters for the gradient optimizer.
  pub sgd: SgdConfig,
  /// Risk-free rate used by the max-Sharpe baseline.
  pub risk_free: f64,
}

/// Final allocation with per-ticker weights and summary statistics.
#[derive(Clone, Debug)]
pub struct Allocation {
  /// Asset identifiers, index-aligned with `weights`.
  pub tickers: Vec<String>,
  /// Simplex-constrained portfolio weights.
  pub weights: Array1<f64>,
  /// Per-epoch loss trajectory; `None` for the max-Sharpe method.
  pub losses: Option<Vec<f64>>,
  /// Annualized summary statistics of the final portfolio.
  pub stats: PortfolioStats,
}

impl Allocation {
  /// Weight assigned to a ticker, if it survived column validation.
  pub fn weight_of(&self, ticker: &str) -> Option<f64> {
    self
      .tickers
      .iter()
      .position(|t| t == ticker)
      .map(|i| self.weights[i])
  }

  /// Iterate ticker/weight pairs.
  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
    self
      .tickers
      .iter()
      .map(String::as_str)
      .zip(self.weights.iter().copied())
  }
}

/// Single entry point from price history to portfolio weights.
#[derive(Clone, Debug, Default)]
pub struct PortfolioEngine {
  config: EngineConfig,
}

impl PortfolioEngine {
  /// Construct a new engine with explicit configuration.
  pub fn new(config: EngineConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Compute returns from the price table and run the configured optimizer.
  pub fn allocate(&self, prices: &PriceTable) -> Result<Allocation, PortfolioError> {
    let returns = compute_returns(prices)?;

    let (weights, losses) = match self.config.method {
      AllocationMethod::Sgd => {
        let out = optimize(&returns, &self.config.sgd)?;
        (out.weights, Some(out.losses))
      }
      AllocationMethod::MaxSharpe => {
        let result = max_sharpe(&returns, self.config.risk_free)?;
        (result.weights, None)
      }
    };

    let stats = portfolio_stats(&weights, &returns);
    info!(
      method = ?self.config.method,
      assets = returns.n_assets(),
      rows = returns.n_rows(),
      "portfolio allocation complete"
    );

    Ok(Allocation {
      tickers: returns.tickers().to_vec(),
      weights,
      losses,
      stats,
    })
  }
}
