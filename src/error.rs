//! # Errors
//!
//! Typed failure kinds surfaced by the allocation core. All of them are
//! deterministic input-validation or numerical-degeneracy signals; nothing
//! here is transient or retryable.

use thiserror::Error;

/// Error kinds raised by the allocation core.
#[derive(Debug, Error)]
pub enum PortfolioError {
  /// Fewer rows (or columns) than the requested computation needs.
  #[error("insufficient data: {0}")]
  InsufficientData(String),
  /// Caller-supplied hyperparameter or table shape outside its valid domain.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
  /// The simplex projection received an empty vector.
  #[error("empty input vector in simplex projection")]
  EmptyInput,
  /// No valid projection threshold exists; only reachable for non-finite input.
  #[error("no valid simplex projection found, check input values")]
  Projection,
}
