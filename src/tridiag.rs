//! Tridiagonal LDLᵀ factorization (Thomas algorithm), shared by the Newton solver (C5) and the
//! uncertainty computer (C7). A single factorization serves both: the forward/backward sweeps
//! that solve `H·Δ = g` are the same sweeps that expose the diagonal of `H⁻¹`.
//!
//! A history of a single day collapses to a 1×1 system here rather than taking a special-cased
//! direct branch — the recurrences below are already correct for `n = 1` (no off-diagonal
//! entries), so no separate code path is needed.

use ndarray::Array1;

/// The LDLᵀ decomposition of a symmetric positive-definite tridiagonal matrix `H`, with `D`
/// diagonal and `L` unit lower-bidiagonal. `multipliers[i]` is `L_{i+1,i}`, the factor coupling
/// row `i+1` to row `i` (and, by symmetry, `Lᵀ_{i,i+1}`).
pub struct LdlFactorization {
    diagonal: Array1<f64>,
    multipliers: Array1<f64>,
}

impl LdlFactorization {
    /// Factors a symmetric tridiagonal matrix given its main diagonal (`n` entries) and
    /// off-diagonal (`n - 1` entries, where `off[i] = H_{i, i+1}`). Every leading principal
    /// minor is assumed strictly positive (the Hessian is PD by construction — see the solver).
    pub fn factor(diag: &Array1<f64>, off: &Array1<f64>) -> Self {
        let n = diag.len();
        let mut d = Array1::zeros(n);
        let mut l = Array1::zeros(n.saturating_sub(1));
        d[0] = diag[0];
        for i in 1..n {
            let multiplier = off[i - 1] / d[i - 1];
            d[i] = diag[i] - multiplier * off[i - 1];
            l[i - 1] = multiplier;
        }
        Self {
            diagonal: d,
            multipliers: l,
        }
    }

    /// Solves `H · x = rhs` via forward elimination then back-substitution, both O(n).
    pub fn solve(&self, rhs: &Array1<f64>) -> Array1<f64> {
        let n = self.diagonal.len();
        let mut y = Array1::zeros(n);
        y[0] = rhs[0];
        for i in 1..n {
            y[i] = rhs[i] - self.multipliers[i - 1] * y[i - 1];
        }

        let mut z = Array1::zeros(n);
        for i in 0..n {
            z[i] = y[i] / self.diagonal[i];
        }

        let mut x = z;
        for i in (0..n.saturating_sub(1)).rev() {
            let next = x[i + 1];
            x[i] -= self.multipliers[i] * next;
        }
        x
    }

    /// The diagonal of `H⁻¹`, via the backward recurrence `v_i = 1/d_i + u_i² v_{i+1}`
    /// (§4.6), where `u_i` is the same multiplier used in the forward elimination.
    pub fn diagonal_variances(&self) -> Array1<f64> {
        let n = self.diagonal.len();
        let mut v = Array1::zeros(n);
        v[n - 1] = 1.0 / self.diagonal[n - 1];
        for i in (0..n.saturating_sub(1)).rev() {
            let u = self.multipliers[i];
            v[i] = 1.0 / self.diagonal[i] + u * u * v[i + 1];
        }
        v
    }
}
