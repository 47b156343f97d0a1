//! Momentum-space sample grids and the projection of an eigenstate
//! superposition onto them.
//!
//! Two spectra are carried side by side: a fine *continuous* grid, sampling
//! the momentum amplitude as a continuum-normalized function, and a unit-step
//! *discrete* grid of quantized box momenta. The discrete aggregate carries
//! an extra factor of `√(π/L)` relative to the continuous one, reflecting the
//! quantized spectral measure.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::Arr1;

/// Paired momentum-space sample grids, both in units of `π/L` and spanning
/// `[−bound, bound]`.
///
/// Grids are rebuilt whenever the bound, the continuous step, or the box
/// length changes; they are never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentumGrid {
    bound: usize,
    cstep: f64,
    length: f64,
    k_cont: nd::Array1<f64>,
    k_disc: nd::Array1<f64>,
}

impl MomentumGrid {
    /// Default continuous-grid step, in units of `π/L`.
    pub const DEF_CSTEP: f64 = 0.01;

    /// Build both grids for a box of length `length`.
    pub fn new(bound: usize, cstep: f64, length: f64) -> Self {
        let unit = PI / length;
        let b = bound as f64;
        let k_cont: nd::Array1<f64>
            = nd::Array1::range(-b, b + cstep / 2.0, cstep)
            .mapv(|n| n * unit);
        let k_disc: nd::Array1<f64>
            = (-(bound as isize)..=bound as isize)
            .map(|n| n as f64 * unit)
            .collect();
        Self { bound, cstep, length, k_cont, k_disc }
    }

    /// Number of discrete grid points on either side of zero.
    pub fn bound(&self) -> usize { self.bound }

    /// Continuous-grid step, in units of `π/L`.
    pub fn cstep(&self) -> f64 { self.cstep }

    /// Box length the grids were derived for.
    pub fn length(&self) -> f64 { self.length }

    /// Continuous-spectrum sample points.
    pub fn k_cont(&self) -> &nd::Array1<f64> { &self.k_cont }

    /// Discrete-spectrum sample points.
    pub fn k_disc(&self) -> &nd::Array1<f64> { &self.k_disc }

    /// Spacing of the discrete grid, `π/L`.
    pub fn disc_spacing(&self) -> f64 { PI / self.length }
}

/// Amplitude-weighted aggregate of per-eigenstate kernel rows over a
/// continuous momentum grid of `npoints` samples.
///
/// An empty eigenstate set yields all zeros. `rows` and `amps` are expected
/// to have matching lengths, with every row `npoints` long.
pub fn project_continuous<S>(
    rows: &[nd::Array1<C64>],
    amps: &Arr1<S>,
    npoints: usize,
) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let mut acc: nd::Array1<C64> = nd::Array1::zeros(npoints);
    for (row, a) in rows.iter().zip(amps) {
        nd::Zip::from(&mut acc).and(row)
            .for_each(|acck, rk| { *acck += *a * *rk; });
    }
    acc
}

/// Like [`project_continuous`], but carrying the extra `√(π/L)` factor of
/// the quantized spectral measure.
pub fn project_discrete<S>(
    length: f64,
    rows: &[nd::Array1<C64>],
    amps: &Arr1<S>,
    npoints: usize,
) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let w = (PI / length).sqrt();
    let mut acc = project_continuous(rows, amps, npoints);
    acc.map_inplace(|ak| { *ak *= w; });
    acc
}

/// Elementwise squared magnitude of a momentum amplitude array.
pub fn probability<S>(amps: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    amps.mapv(|ak| ak.norm_sqr())
}
