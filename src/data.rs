//! # Price and Return Tables
//!
//! $$
//! r_t = \frac{p_t - p_{t-1}}{p_{t-1}}
//! $$
//!
//! Timestamped asset tables and the period-over-period returns engine.

use std::collections::HashSet;

use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::PortfolioError;

fn check_table_shape(
  dates: &[NaiveDate],
  tickers: &[String],
  values: &Array2<f64>,
) -> Result<(), PortfolioError> {
  if dates.len() != values.nrows() || tickers.len() != values.ncols() {
    return Err(PortfolioError::InvalidConfig(format!(
      "table shape mismatch: {} dates, {} tickers, {}x{} values",
      dates.len(),
      tickers.len(),
      values.nrows(),
      values.ncols()
    )));
  }

  let mut seen = HashSet::new();
  for ticker in tickers {
    if !seen.insert(ticker.as_str()) {
      return Err(PortfolioError::InvalidConfig(format!(
        "duplicate ticker column '{ticker}'"
      )));
    }
  }

  for pair in dates.windows(2) {
    if pair[1] <= pair[0] {
      return Err(PortfolioError::InvalidConfig(format!(
        "rows must be strictly ordered by date, got {} after {}",
        pair[1], pair[0]
      )));
    }
  }

  Ok(())
}

/// Historical close prices, one row per date and one column per asset.
#[derive(Clone, Debug)]
pub struct PriceTable {
  dates: Vec<NaiveDate>,
  tickers: Vec<String>,
  values: Array2<f64>,
}

impl PriceTable {
  /// Build a validated price table.
  ///
  /// Rows must be strictly ascending by date and tickers unique. Columns
  /// without a single finite observation are dropped, so a provider may pass
  /// through invalid or delisted tickers without failing the whole table.
  pub fn new(
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    values: Array2<f64>,
  ) -> Result<Self, PortfolioError> {
    check_table_shape(&dates, &tickers, &values)?;

    let keep: Vec<usize> = (0..values.ncols())
      .filter(|&j| values.column(j).iter().any(|v| v.is_finite()))
      .collect();

    let (tickers, values) = if keep.len() == values.ncols() {
      (tickers, values)
    } else {
      let kept = keep.iter().map(|&j| tickers[j].clone()).collect();
      (kept, values.select(Axis(1), &keep))
    };

    Ok(Self {
      dates,
      tickers,
      values,
    })
  }

  /// Row dates, strictly ascending.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Asset identifiers, one per column.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Price matrix, rows by assets.
  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  pub fn n_rows(&self) -> usize {
    self.values.nrows()
  }

  pub fn n_assets(&self) -> usize {
    self.values.ncols()
  }
}

/// Period-over-period percentage returns derived from a [`PriceTable`].
#[derive(Clone, Debug)]
pub struct ReturnTable {
  dates: Vec<NaiveDate>,
  tickers: Vec<String>,
  values: Array2<f64>,
}

impl ReturnTable {
  /// Build a return table directly from precomputed returns.
  pub fn new(
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    values: Array2<f64>,
  ) -> Result<Self, PortfolioError> {
    check_table_shape(&dates, &tickers, &values)?;
    Ok(Self {
      dates,
      tickers,
      values,
    })
  }

  /// Row dates, aligned with the second and later price rows.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Asset identifiers, one per column.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Return matrix, rows by assets.
  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  pub fn n_rows(&self) -> usize {
    self.values.nrows()
  }

  pub fn n_assets(&self) -> usize {
    self.values.ncols()
  }
}

/// Compute `(p[t] - p[t-1]) / p[t-1]` per asset, dropping the first row.
///
/// The output has exactly one fewer row than the input and the same column
/// set. A zero or near-zero price yields a non-finite return for that entry;
/// such values are passed through unmodified and it is the caller's job to
/// validate finiteness downstream.
pub fn compute_returns(prices: &PriceTable) -> Result<ReturnTable, PortfolioError> {
  if prices.n_assets() == 0 {
    return Err(PortfolioError::InsufficientData(
      "price table has no asset columns".into(),
    ));
  }
  if prices.n_rows() < 2 {
    return Err(PortfolioError::InsufficientData(format!(
      "price table has {} row(s), need at least 2 to compute returns",
      prices.n_rows()
    )));
  }

  let rows = prices.n_rows() - 1;
  let cols = prices.n_assets();
  let mut out = Array2::<f64>::zeros((rows, cols));

  for t in 1..prices.n_rows() {
    for j in 0..cols {
      let prev = prices.values[[t - 1, j]];
      out[[t - 1, j]] = (prices.values[[t, j]] - prev) / prev;
    }
  }

  Ok(ReturnTable {
    dates: prices.dates[1..].to_vec(),
    tickers: prices.tickers.clone(),
    values: out,
  })
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
  }

  fn two_asset_prices() -> PriceTable {
    PriceTable::new(
      vec![day(1), day(2), day(3)],
      vec!["A".to_string(), "B".to_string()],
      array![[100.0, 200.0], [110.0, 210.0], [105.0, 220.0]],
    )
    .unwrap()
  }

  #[test]
  fn returns_have_one_fewer_row_and_same_columns() {
    let prices = PriceTable::new(
      vec![day(1), day(2), day(3), day(4), day(5)],
      vec!["A".to_string(), "B".to_string()],
      array![
        [100.0, 50.0],
        [101.0, 51.0],
        [102.0, 49.0],
        [103.0, 50.0],
        [104.0, 52.0]
      ],
    )
    .unwrap();

    let rets = compute_returns(&prices).unwrap();
    assert_eq!(rets.n_rows(), 4);
    assert_eq!(rets.n_assets(), 2);
    assert_eq!(rets.tickers(), prices.tickers());
    assert_eq!(rets.dates(), &prices.dates()[1..]);
  }

  #[test]
  fn returns_match_percent_change() {
    let rets = compute_returns(&two_asset_prices()).unwrap();

    assert!((rets.values()[[0, 0]] - 0.10).abs() < 1e-12);
    assert!((rets.values()[[1, 0]] - (105.0 / 110.0 - 1.0)).abs() < 1e-12);
    assert!((rets.values()[[0, 1]] - 0.05).abs() < 1e-12);
    assert!((rets.values()[[1, 1]] - (220.0 / 210.0 - 1.0)).abs() < 1e-12);
  }

  #[test]
  fn single_row_table_is_rejected() {
    let prices = PriceTable::new(
      vec![day(1)],
      vec!["A".to_string()],
      array![[100.0]],
    )
    .unwrap();

    let err = compute_returns(&prices).unwrap_err();
    assert!(matches!(err, PortfolioError::InsufficientData(_)));
  }

  #[test]
  fn zero_column_table_is_rejected() {
    let prices = PriceTable::new(
      vec![day(1), day(2)],
      Vec::new(),
      Array2::<f64>::zeros((2, 0)),
    )
    .unwrap();

    let err = compute_returns(&prices).unwrap_err();
    assert!(matches!(err, PortfolioError::InsufficientData(_)));
  }

  #[test]
  fn zero_price_passes_through_as_non_finite() {
    let prices = PriceTable::new(
      vec![day(1), day(2)],
      vec!["A".to_string()],
      array![[0.0], [100.0]],
    )
    .unwrap();

    let rets = compute_returns(&prices).unwrap();
    assert!(!rets.values()[[0, 0]].is_finite());
  }

  #[test]
  fn all_nan_columns_are_dropped() {
    let prices = PriceTable::new(
      vec![day(1), day(2)],
      vec!["A".to_string(), "GONE".to_string(), "B".to_string()],
      array![[100.0, f64::NAN, 200.0], [110.0, f64::NAN, 210.0]],
    )
    .unwrap();

    assert_eq!(prices.n_assets(), 2);
    assert_eq!(prices.tickers(), &["A".to_string(), "B".to_string()]);
  }

  #[test]
  fn unordered_dates_are_rejected() {
    let err = PriceTable::new(
      vec![day(2), day(1)],
      vec!["A".to_string()],
      array![[100.0], [110.0]],
    )
    .unwrap_err();

    assert!(matches!(err, PortfolioError::InvalidConfig(_)));
  }

  #[test]
  fn duplicate_tickers_are_rejected() {
    let err = PriceTable::new(
      vec![day(1), day(2)],
      vec!["A".to_string(), "A".to_string()],
      array![[100.0, 200.0], [110.0, 210.0]],
    )
    .unwrap_err();

    assert!(matches!(err, PortfolioError::InvalidConfig(_)));
  }
}
