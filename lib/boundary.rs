//! Transcendental matching relations for the box boundary conditions and the
//! Newton search converting a boundary parameter into allowed wavenumbers.
//!
//! For a box of length `L` with boundary parameter `γ`, the wavenumber of
//! eigenstate `l` is a root of one of four relations, selected by the parity
//! of `l` and by which branch (oscillatory or evanescent) the state falls on.
//! All relations are solved in the dimensionless variable `k̃ = k·L`, with
//! `γ′ = atan(γ·L)`:
//!
//! ```text
//! even, oscillatory:  γ′ − atan(k̃·tan(k̃/2))  = 0
//! odd,  oscillatory:  γ′ + atan(k̃/tan(k̃/2))  = 0
//! even, evanescent:   γ′ + atan(κ̃·tanh(κ̃/2)) = 0
//! odd,  evanescent:   γ′ + atan(κ̃/tanh(κ̃/2)) = 0
//! ```
//!
//! States with `l > 2` are always oscillatory; the two lowest states cross
//! onto the evanescent branch when `γ′` drops below `0` (`l = 1`) or
//! `atan(−2)` (`l = 2`).

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ Arr1, error::RootError, DEF_EPSILON, DEF_MAXITERS };

pub type RootResult<T> = Result<T, RootError>;

/// Spatial parity of an eigenfunction, fixed by its quantum number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parity {
    /// cos/cosh family (`l` odd).
    Even,
    /// sin/sinh family (`l` even).
    Odd,
}

impl Parity {
    /// Parity of eigenstate `l`.
    pub fn of(l: usize) -> Self {
        if l % 2 == 1 { Self::Even } else { Self::Odd }
    }
}

// matching relations in dimensionless form
fn rel_osc_even(gp: f64, k: f64) -> f64 { gp - (k * (k / 2.0).tan()).atan() }
fn rel_osc_odd(gp: f64, k: f64) -> f64 { gp + (k / (k / 2.0).tan()).atan() }
fn rel_evan_even(gp: f64, k: f64) -> f64 { gp + (k * (k / 2.0).tanh()).atan() }
fn rel_evan_odd(gp: f64, k: f64) -> f64 { gp + (k / (k / 2.0).tanh()).atan() }

// branch threshold in γ′ for the two lowest states
fn branch_threshold(l: usize) -> f64 {
    if l == 1 { 0.0 } else { (-2.0_f64).atan() }
}

// Newton–Raphson with a central-difference derivative
fn newton<F>(f: F, x0: f64, epsilon: f64, maxiters: usize) -> Option<f64>
where F: Fn(f64) -> f64
{
    const H: f64 = 1e-7;
    let mut x = x0;
    for _ in 0..maxiters {
        let fx = f(x);
        if !fx.is_finite() { return None; }
        if fx.abs() < epsilon { return Some(x); }
        let df = (f(x + H) - f(x - H)) / (2.0 * H);
        if df == 0.0 || !df.is_finite() { return None; }
        x -= fx / df;
        if !x.is_finite() { return None; }
    }
    None
}

/// Solve the matching relation for the wavenumber of eigenstate `l`, given
/// boundary parameter `gamma` and box length `length`.
///
/// A zero imaginary part marks an oscillatory state; a zero real part marks
/// an evanescent one. A failed Newton search is reported as
/// [`RootError::NoConvergence`] rather than returned as a numeric value.
pub fn gamma_to_k(gamma: f64, l: usize, length: f64) -> RootResult<C64> {
    gamma_to_k_with(gamma, l, length, DEF_EPSILON, DEF_MAXITERS)
}

/// Like [`gamma_to_k`], with an explicit residual tolerance and iteration
/// cap for the Newton search.
pub fn gamma_to_k_with(
    gamma: f64,
    l: usize,
    length: f64,
    epsilon: f64,
    maxiters: usize,
) -> RootResult<C64> {
    if l == 0 { return Err(RootError::BadIndex(l)); }
    let gp = (gamma * length).atan();
    let err = || RootError::NoConvergence { gamma, l };
    if l > 2 {
        // initial guess centered on the branch containing the root
        let guess = (l as f64 - 1.0) * PI;
        let k = match Parity::of(l) {
            Parity::Even =>
                newton(|k| rel_osc_even(gp, k), guess, epsilon, maxiters),
            Parity::Odd =>
                newton(|k| rel_osc_odd(gp, k), guess, epsilon, maxiters),
        }.ok_or_else(err)?;
        return Ok(C64::from(k.abs() / length));
    }
    if gp >= branch_threshold(l) {
        let (rel, guess): (fn(f64, f64) -> f64, f64) = match Parity::of(l) {
            Parity::Even => (rel_osc_even, PI / 2.0),
            Parity::Odd => (rel_osc_odd, PI),
        };
        let k = newton(|k| rel(gp, k), guess, epsilon, maxiters)
            .ok_or_else(err)?;
        Ok(C64::from(k.abs() / length))
    } else {
        let rel: fn(f64, f64) -> f64 = match Parity::of(l) {
            Parity::Even => rel_evan_even,
            Parity::Odd => rel_evan_odd,
        };
        // for κ̃ ≫ 1 the relations reduce to γ′ + atan(κ̃) ≈ 0
        let kappa = newton(|k| rel(gp, k), -gp.tan(), epsilon, maxiters)
            .ok_or_else(err)?;
        Ok(C64::new(0.0, kappa.abs() / length))
    }
}

/// Solve for a batch of boundary parameter values at a fixed eigenstate
/// index.
///
/// For `l ∈ {1, 2}` the input values are split at the branch threshold and
/// evanescent-branch results are concatenated first, each branch preserving
/// input order; for `l > 2` the output order matches the input order. The
/// output length always equals the input length.
pub fn gamma_to_k_batch<S>(gammas: &Arr1<S>, l: usize, length: f64)
    -> RootResult<nd::Array1<C64>>
where S: nd::Data<Elem = f64>
{
    if l == 0 { return Err(RootError::BadIndex(l)); }
    if l > 2 {
        return gammas.iter()
            .map(|&g| gamma_to_k(g, l, length))
            .collect();
    }
    let threshold = branch_threshold(l);
    let (evan, osc): (Vec<f64>, Vec<f64>) = gammas.iter()
        .partition(|&&g| (g * length).atan() < threshold);
    evan.into_iter().chain(osc)
        .map(|g| gamma_to_k(g, l, length))
        .collect()
}

/// Evaluate the matching relation for a candidate wavenumber; a converged
/// root gives a residual within solver tolerance of zero.
pub fn matching_residual(gamma: f64, l: usize, length: f64, k: C64) -> f64 {
    let gp = (gamma * length).atan();
    match (Parity::of(l), k.im == 0.0) {
        (Parity::Even, true) => rel_osc_even(gp, k.re * length),
        (Parity::Odd, true) => rel_osc_odd(gp, k.re * length),
        (Parity::Even, false) => rel_evan_even(gp, k.im * length),
        (Parity::Odd, false) => rel_evan_odd(gp, k.im * length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_index_is_rejected() {
        assert!(matches!(
            gamma_to_k(1.0, 0, PI),
            Err(RootError::BadIndex(0)),
        ));
    }

    #[test]
    fn residuals_vanish_above_ground_states() {
        for l in 3..10 {
            for gamma in [-5.0, -1.0, 0.0, 0.5, 10.0] {
                let k = gamma_to_k(gamma, l, PI).unwrap();
                assert_eq!(k.im, 0.0);
                assert!(matching_residual(gamma, l, PI, k).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn neumann_odd_ground_state() {
        // γ = 0: the lowest odd-parity state sits exactly at k·L = π
        let k = gamma_to_k(0.0, 2, PI).unwrap();
        assert!((k.re - 1.0).abs() < 1e-9);
        assert_eq!(k.im, 0.0);
    }

    #[test]
    fn dirichlet_limit() {
        // γ → ∞: k_l → l·π/L
        let L = 2.0;
        for l in 1..6 {
            let k = gamma_to_k(1e6, l, L).unwrap();
            assert!((k.re - l as f64 * PI / L).abs() < 1e-4);
        }
    }

    #[test]
    fn ground_states_go_evanescent() {
        let k1 = gamma_to_k(-1.5, 1, PI).unwrap();
        assert_eq!(k1.re, 0.0);
        assert!(k1.im > 0.0);
        assert!(matching_residual(-1.5, 1, PI, k1).abs() < 1e-9);

        // l = 2 crosses at γ′ = atan(−2), i.e. γ·L = −2
        let k2 = gamma_to_k(-3.0, 2, 1.0).unwrap();
        assert_eq!(k2.re, 0.0);
        assert!(k2.im > 0.0);
        let k2_osc = gamma_to_k(-1.0, 2, 1.0).unwrap();
        assert_eq!(k2_osc.im, 0.0);
    }

    #[test]
    fn batch_puts_evanescent_first() {
        let gammas: nd::Array1<f64> = nd::array![-5.0, 1.0, -3.0, 2.0];
        let ks = gamma_to_k_batch(&gammas, 1, PI).unwrap();
        assert_eq!(ks.len(), 4);
        assert!(ks[0].re == 0.0 && ks[0].im > 0.0);
        assert!(ks[1].re == 0.0 && ks[1].im > 0.0);
        assert!(ks[2].im == 0.0);
        assert!(ks[3].im == 0.0);
        // branch-internal ordering follows the input
        assert_eq!(ks[0], gamma_to_k(-5.0, 1, PI).unwrap());
        assert_eq!(ks[1], gamma_to_k(-3.0, 1, PI).unwrap());
        assert_eq!(ks[2], gamma_to_k(1.0, 1, PI).unwrap());
        assert_eq!(ks[3], gamma_to_k(2.0, 1, PI).unwrap());
    }
}
