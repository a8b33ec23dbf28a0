//! # portfolio-rs
//!
//! $$
//! \max_{\mathbf{w}\in\Delta^{n-1}} \ \mathbf{w}^\top\mu - \frac{\lambda}{2}\,\mathbf{w}^\top\Sigma\,\mathbf{w}
//! $$
//!
//! Mean-variance portfolio allocation from historical price series. The core
//! is a projected mini-batch gradient descent optimizer over the probability
//! simplex; a Nelder-Mead max-Sharpe solver is included as a comparison
//! baseline.

pub mod data;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod sgd;
pub mod simplex;
pub mod stats;

pub use data::PriceTable;
pub use data::ReturnTable;
pub use data::compute_returns;
pub use engine::Allocation;
pub use engine::AllocationMethod;
pub use engine::EngineConfig;
pub use engine::PortfolioEngine;
pub use error::PortfolioError;
pub use frontier::FrontierResult;
pub use frontier::max_sharpe;
pub use sgd::SgdConfig;
pub use sgd::SgdOutcome;
pub use sgd::optimize;
pub use simplex::project_to_simplex;
pub use stats::PortfolioStats;
pub use stats::TRADING_DAYS;
pub use stats::annualized_cov;
pub use stats::annualized_mean;
pub use stats::portfolio_stats;
