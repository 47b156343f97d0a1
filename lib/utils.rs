//! Miscellaneous numerical tools.

use ndarray::{ self as nd, Ix1 };
use num_complex::Complex64 as C64;
use num_traits::Num;

/// Integrate using the trapezoidal rule.
///
/// Assumes `y` is sampled over even intervals.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Num + Copy,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    let mid = y.iter().skip(1).take(n - 2)
        .fold(A::zero(), |acc, yk| acc + *yk);
    dx / two * (y[0] + two * mid + y[n - 1])
}

/// Calculate the squared norm of a complex wavefunction sampled over a
/// uniform grid.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S>(q: &nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    trapz(&q.mapv(|qk| qk.norm_sqr()), dx)
}
