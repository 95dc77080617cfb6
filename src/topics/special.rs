// Dirichlet expectations for variational LDA, built on statrs' digamma.

use ndarray::{Array1, Array2, ArrayView1};
use statrs::function::gamma::digamma;

/// E[log θ] for θ ~ Dirichlet(params): ψ(params_i) - ψ(Σ params).
pub fn dirichlet_expectation(params: ArrayView1<'_, f64>) -> Array1<f64> {
    let total = digamma(params.sum());
    params.mapv(|p| digamma(p) - total)
}

/// Row-wise `dirichlet_expectation` over a matrix of Dirichlet parameters.
pub fn dirichlet_expectation_rows(params: &Array2<f64>) -> Array2<f64> {
    let mut out = params.mapv(digamma);
    for (mut row, source) in out.rows_mut().into_iter().zip(params.rows()) {
        let total = digamma(source.sum());
        row.mapv_inplace(|v| v - total);
    }
    out
}

/// log Σ exp(values), stable for large magnitudes.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
