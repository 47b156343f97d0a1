//! Closed-form position-space eigenfunctions and momentum-space projection
//! kernels for the four parity/wavenumber families.
//!
//! Each family carries its own normalization factor; even/odd and
//! oscillatory/evanescent cases use distinct trigonometric vs. hyperbolic
//! forms. Momentum kernels follow the convention
//! `⟨p|l⟩ = (2π)^(−1/2) ∫ ψ_l(x) e^(−ipx) dx`, evaluated analytically over
//! the box; odd-parity kernels are purely imaginary under this convention.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ Arr1, boundary::Parity };

/// Eigenfunction family, selected by quantum number parity and the character
/// of the wavenumber.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    /// `cos(kx)`, real wavenumber.
    OscEven,
    /// `sin(kx)`, real wavenumber.
    OscOdd,
    /// `cosh(κx)`, imaginary wavenumber.
    EvanEven,
    /// `sinh(κx)`, imaginary wavenumber.
    EvanOdd,
}

impl Family {
    /// Select the family for eigenstate `l` with wavenumber `k`.
    pub fn of(l: usize, k: C64) -> Self {
        match (Parity::of(l), k.im == 0.0) {
            (Parity::Even, true) => Self::OscEven,
            (Parity::Odd, true) => Self::OscOdd,
            (Parity::Even, false) => Self::EvanEven,
            (Parity::Odd, false) => Self::EvanOdd,
        }
    }

    // wavenumber magnitude entering the closed forms
    fn k_mag(self, k: C64) -> f64 {
        match self {
            Self::OscEven | Self::OscOdd => k.re,
            Self::EvanEven | Self::EvanOdd => k.im,
        }
    }

    // family normalization factor; the √(2/L) prefactor is kept separate
    fn norm_factor(self, kl: f64) -> f64 {
        match self {
            Self::OscEven => (1.0 + kl.sin() / kl).powf(-0.5),
            Self::OscOdd => (1.0 - kl.sin() / kl).powf(-0.5),
            Self::EvanEven => (1.0 + kl.sinh() / kl).powf(-0.5),
            Self::EvanOdd => (-1.0 + kl.sinh() / kl).powf(-0.5),
        }
    }
}

// sin(u/2)/u with its removable singularity at u = 0
fn half_sinc(u: f64) -> f64 {
    if u.abs() < 1e-12 { 0.5 } else { (u / 2.0).sin() / u }
}

/// Evaluate the normalized position-space eigenfunction of eigenstate `l`
/// with wavenumber `k` over a position array.
pub fn eigenfunction<S>(length: f64, k: C64, l: usize, x: &Arr1<S>)
    -> nd::Array1<C64>
where S: nd::Data<Elem = f64>
{
    let family = Family::of(l, k);
    let km = family.k_mag(k);
    let a = (2.0 / length).sqrt() * family.norm_factor(km * length);
    match family {
        Family::OscEven => x.mapv(|xk| C64::from(a * (km * xk).cos())),
        Family::OscOdd => x.mapv(|xk| C64::from(a * (km * xk).sin())),
        Family::EvanEven => x.mapv(|xk| C64::from(a * (km * xk).cosh())),
        Family::EvanOdd => x.mapv(|xk| C64::from(a * (km * xk).sinh())),
    }
}

/// Evaluate the momentum-space projection kernel `⟨p|l⟩` of eigenstate `l`
/// with wavenumber `k` over a momentum array.
pub fn momentum_kernel<S>(length: f64, k: C64, l: usize, p: &Arr1<S>)
    -> nd::Array1<C64>
where S: nd::Data<Elem = f64>
{
    let family = Family::of(l, k);
    let km = family.k_mag(k);
    let kl = km * length;
    let a = (length / PI).sqrt() * family.norm_factor(kl);
    match family {
        Family::OscEven => p.mapv(|pk| {
            let pl = pk * length;
            C64::from(a * (half_sinc(kl + pl) + half_sinc(kl - pl)))
        }),
        Family::OscOdd => p.mapv(|pk| {
            let pl = pk * length;
            C64::i() * (a * (half_sinc(kl + pl) - half_sinc(kl - pl)))
        }),
        Family::EvanEven => p.mapv(|pk| {
            let pl = pk * length;
            let den = kl.powi(2) + pl.powi(2);
            C64::from(
                2.0 * a
                * (kl * (kl / 2.0).sinh() * (pl / 2.0).cos()
                    + pl * (kl / 2.0).cosh() * (pl / 2.0).sin())
                / den
            )
        }),
        Family::EvanOdd => p.mapv(|pk| {
            let pl = pk * length;
            let den = kl.powi(2) + pl.powi(2);
            -C64::i() * (
                2.0 * a
                * (kl * (kl / 2.0).cosh() * (pl / 2.0).sin()
                    - pl * (kl / 2.0).sinh() * (pl / 2.0).cos())
                / den
            )
        }),
    }
}
