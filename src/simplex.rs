//! # Simplex Projection
//!
//! $$
//! \Pi_\Delta(\mathbf{w}) = \arg\min_{\mathbf{v}\in\Delta^{n-1}} \lVert \mathbf{v}-\mathbf{w}\rVert_2
//! $$
//!
//! Euclidean projection onto the probability simplex (Duchi et al. 2008).

use std::cmp::Ordering;

use ndarray::Array1;

use crate::error::PortfolioError;

/// Project a vector onto the probability simplex.
///
/// The output is the closest point to the input, in Euclidean distance, with
/// non-negative entries summing to one. Sort the entries descending, take
/// cumulative sums, find the largest index `ρ` with
/// `u[ρ]·(ρ+1) > cssv[ρ] − 1`, and clamp at the threshold
/// `θ = (cssv[ρ] − 1)/(ρ+1)`. No valid `ρ` exists only for non-finite input,
/// which surfaces as [`PortfolioError::Projection`] rather than a silent
/// wrong answer.
pub fn project_to_simplex(w: &Array1<f64>) -> Result<Array1<f64>, PortfolioError> {
  if w.is_empty() {
    return Err(PortfolioError::EmptyInput);
  }

  let mut u = w.to_vec();
  u.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

  let mut theta = None;
  let mut cssv = 0.0;
  for (i, &ui) in u.iter().enumerate() {
    cssv += ui;
    let rank = (i + 1) as f64;
    if ui * rank > cssv - 1.0 {
      theta = Some((cssv - 1.0) / rank);
    }
  }

  let theta = theta.ok_or(PortfolioError::Projection)?;
  Ok(w.mapv(|x| (x - theta).max(0.0)))
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  fn assert_on_simplex(w: &Array1<f64>) {
    assert!(w.iter().all(|&x| x >= 0.0));
    assert_abs_diff_eq!(w.sum(), 1.0, epsilon = 1e-9);
  }

  #[test]
  fn projects_arbitrary_vectors_onto_simplex() {
    for input in [
      array![-0.4, 1.7, 0.3],
      array![5.0, -3.0, 0.1, 2.2],
      array![0.0, 0.0, 0.0],
      array![2.0, 2.0, 2.0, 2.0],
    ] {
      let p = project_to_simplex(&input).unwrap();
      assert_on_simplex(&p);
    }
  }

  #[test]
  fn projection_is_idempotent() {
    let w = array![0.2, 0.3, 0.5];
    let p = project_to_simplex(&w).unwrap();

    for (a, b) in p.iter().zip(w.iter()) {
      assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
  }

  #[test]
  fn all_equal_vector_projects_to_uniform() {
    let p = project_to_simplex(&array![2.0, 2.0, 2.0, 2.0]).unwrap();

    for &x in p.iter() {
      assert_abs_diff_eq!(x, 0.25, epsilon = 1e-12);
    }
  }

  #[test]
  fn single_entry_projects_to_one() {
    let p = project_to_simplex(&array![5.0]).unwrap();
    assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-12);
  }

  #[test]
  fn empty_input_is_rejected() {
    let err = project_to_simplex(&Array1::<f64>::zeros(0)).unwrap_err();
    assert!(matches!(err, PortfolioError::EmptyInput));
  }

  #[test]
  fn non_finite_input_surfaces_projection_error() {
    let err = project_to_simplex(&array![f64::NAN, f64::NAN]).unwrap_err();
    assert!(matches!(err, PortfolioError::Projection));
  }
}
