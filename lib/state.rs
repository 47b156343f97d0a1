//! Central representation of a particle-in-a-box superposition state.
//!
//! A [`BoxState`] owns the physical parameters (boundary parameter γ, box
//! length `L`, particle mass `m`), the set of active eigenstate indices with
//! their complex amplitudes, and all derived data: solved wavenumbers,
//! per-eigenstate momentum kernel rows over both sample grids, the `t = 0`
//! momentum-space aggregates, and their probability distributions. Every
//! mutating operation leaves the amplitude vector normalized and the derived
//! caches consistent with the active set; parameter changes rebuild into a
//! fresh structure and swap it in only on success, so a failed solve never
//! leaves the state partially updated.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    basis,
    boundary,
    error::{ LengthError, StateError },
    momentum::{ self, MomentumGrid },
    utils::trapz,
};

pub type StateResult<T> = Result<T, StateError>;

/// Default half-width of the momentum grids, in units of `π/L`.
pub const DEF_BOUND: usize = 15;

/// Default particle mass.
pub const DEF_MASS: f64 = 1.0;

/// A normalized superposition of box eigenstates, with cached momentum-space
/// projections.
///
/// Eigenstate indices are kept in ascending order; the amplitude and
/// wavenumber arrays are parallel to the index list.
#[derive(Clone, Debug)]
pub struct BoxState {
    gamma: f64,
    length: f64,
    mass: f64,
    levels: Vec<usize>,
    amps: nd::Array1<C64>,
    ks: nd::Array1<C64>,
    grid: MomentumGrid,
    kernels_cont: Vec<nd::Array1<C64>>,
    kernels_disc: Vec<nd::Array1<C64>>,
    phi_cont: nd::Array1<C64>,
    phi_disc: nd::Array1<C64>,
    prob_cont: nd::Array1<f64>,
    prob_disc: nd::Array1<f64>,
}

impl BoxState {
    /// Create an empty state for boundary parameter `gamma` and box length
    /// `length`, with default mass and momentum grids.
    pub fn new(gamma: f64, length: f64) -> Self {
        let grid = MomentumGrid::new(DEF_BOUND, MomentumGrid::DEF_CSTEP, length);
        let nc = grid.k_cont().len();
        let nd_ = grid.k_disc().len();
        Self {
            gamma,
            length,
            mass: DEF_MASS,
            levels: Vec::new(),
            amps: nd::Array1::zeros(0),
            ks: nd::Array1::zeros(0),
            grid,
            kernels_cont: Vec::new(),
            kernels_disc: Vec::new(),
            phi_cont: nd::Array1::zeros(nc),
            phi_disc: nd::Array1::zeros(nd_),
            prob_cont: nd::Array1::zeros(nc),
            prob_disc: nd::Array1::zeros(nd_),
        }
    }

    /// Create a state populated with eigenstate indices `levels` and
    /// (pre-normalization) amplitudes `amps`.
    pub fn with_levels<S>(
        gamma: f64,
        length: f64,
        levels: &[usize],
        amps: &Arr1<S>,
    ) -> StateResult<Self>
    where S: nd::Data<Elem = C64>
    {
        let mut state = Self::new(gamma, length);
        state.add_levels(levels, amps)?;
        Ok(state)
    }

    /// Boundary parameter γ.
    pub fn gamma(&self) -> f64 { self.gamma }

    /// Box length `L`.
    pub fn length(&self) -> f64 { self.length }

    /// Particle mass `m`.
    pub fn mass(&self) -> f64 { self.mass }

    /// Active eigenstate indices, ascending.
    pub fn levels(&self) -> &[usize] { &self.levels }

    /// Normalized amplitudes, parallel to [`levels`][Self::levels].
    pub fn amplitudes(&self) -> &nd::Array1<C64> { &self.amps }

    /// Solved wavenumbers, parallel to [`levels`][Self::levels]. Purely real
    /// values mark oscillatory states, purely imaginary values evanescent
    /// ones.
    pub fn wavenumbers(&self) -> &nd::Array1<C64> { &self.ks }

    /// Momentum sample grids.
    pub fn grid(&self) -> &MomentumGrid { &self.grid }

    /// Cached continuous-spectrum momentum aggregate at `t = 0`.
    pub fn momentum_cont(&self) -> &nd::Array1<C64> { &self.phi_cont }

    /// Cached discrete-spectrum momentum aggregate at `t = 0`.
    pub fn momentum_disc(&self) -> &nd::Array1<C64> { &self.phi_disc }

    /// Cached continuous-spectrum probability density at `t = 0`.
    pub fn prob_cont(&self) -> &nd::Array1<f64> { &self.prob_cont }

    /// Cached discrete-spectrum probability distribution at `t = 0`.
    pub fn prob_disc(&self) -> &nd::Array1<f64> { &self.prob_disc }

    /// Number of active eigenstates.
    pub fn len(&self) -> usize { self.levels.len() }

    /// `true` if no eigenstates are active.
    pub fn is_empty(&self) -> bool { self.levels.is_empty() }

    /// Add a batch of eigenstates with (pre-normalization) amplitudes.
    ///
    /// All wavenumbers are solved before any part of the state is touched;
    /// an index already present, or repeated within the batch, is a
    /// [`StateError::Duplicate`] and likewise leaves the state unchanged, as
    /// does an all-zero amplitude batch added to an empty state
    /// ([`StateError::ZeroNorm`]).
    pub fn add_levels<S>(&mut self, levels: &[usize], amps: &Arr1<S>)
        -> StateResult<()>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(levels.len(), amps.len())?;
        for (n, &l) in levels.iter().enumerate() {
            if self.levels.contains(&l) || levels[..n].contains(&l) {
                return Err(StateError::Duplicate(l));
            }
        }
        let total: f64
            = self.amps.iter().chain(amps.iter())
            .map(|a| a.norm_sqr())
            .sum();
        if self.levels.len() + levels.len() > 0 && total == 0.0 {
            return Err(StateError::ZeroNorm);
        }
        let new_ks: Vec<C64> = levels.iter()
            .map(|&l| boundary::gamma_to_k(self.gamma, l, self.length))
            .collect::<Result<_, _>>()?;
        let mut entries: Vec<(usize, C64, C64)>
            = self.levels.iter().copied()
            .zip(self.amps.iter().copied())
            .zip(self.ks.iter().copied())
            .map(|((l, a), k)| (l, a, k))
            .collect();
        entries.extend(
            levels.iter().copied()
            .zip(amps.iter().copied())
            .zip(new_ks)
            .map(|((l, a), k)| (l, a, k))
        );
        entries.sort_by_key(|(l, ..)| *l);
        self.levels = entries.iter().map(|(l, ..)| *l).collect();
        self.amps = entries.iter().map(|(_, a, _)| *a).collect();
        self.ks = entries.iter().map(|(.., k)| *k).collect();
        self.normalize();
        self.refresh_derived();
        Ok(())
    }

    /// Add a single eigenstate; see [`add_levels`][Self::add_levels].
    pub fn add_level(&mut self, l: usize, amp: C64) -> StateResult<()> {
        self.add_levels(&[l], &nd::array![amp])
    }

    /// Remove a batch of eigenstates.
    ///
    /// Every named index must be present (and appear only once in the
    /// batch); otherwise the state is left unchanged and the offending index
    /// is reported as [`StateError::NotFound`]. A removal that would leave
    /// only zero amplitudes behind is rejected as [`StateError::ZeroNorm`];
    /// removing every eigenstate is fine.
    pub fn remove_levels(&mut self, levels: &[usize]) -> StateResult<()> {
        for (n, &l) in levels.iter().enumerate() {
            if !self.levels.contains(&l) || levels[..n].contains(&l) {
                return Err(StateError::NotFound(l));
            }
        }
        let total: f64
            = self.levels.iter().zip(&self.amps)
            .filter(|&(l, _)| !levels.contains(l))
            .map(|(_, a)| a.norm_sqr())
            .sum();
        if self.levels.len() > levels.len() && total == 0.0 {
            return Err(StateError::ZeroNorm);
        }
        let entries: Vec<(usize, C64, C64)>
            = self.levels.iter().copied()
            .zip(self.amps.iter().copied())
            .zip(self.ks.iter().copied())
            .filter(|((l, _), _)| !levels.contains(l))
            .map(|((l, a), k)| (l, a, k))
            .collect();
        self.levels = entries.iter().map(|(l, ..)| *l).collect();
        self.amps = entries.iter().map(|(_, a, _)| *a).collect();
        self.ks = entries.iter().map(|(.., k)| *k).collect();
        self.normalize();
        self.refresh_derived();
        Ok(())
    }

    /// Remove a single eigenstate; see
    /// [`remove_levels`][Self::remove_levels].
    pub fn remove_level(&mut self, l: usize) -> StateResult<()> {
        self.remove_levels(&[l])
    }

    /// Overwrite the amplitudes of a batch of already-present eigenstates,
    /// then renormalize.
    ///
    /// An overwrite that would zero out the whole amplitude vector is
    /// rejected as [`StateError::ZeroNorm`] with the state unchanged.
    pub fn set_amplitudes<S>(&mut self, levels: &[usize], amps: &Arr1<S>)
        -> StateResult<()>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(levels.len(), amps.len())?;
        let idx: Vec<usize> = levels.iter()
            .map(|l| {
                self.levels.iter().position(|ll| ll == l)
                    .ok_or(StateError::NotFound(*l))
            })
            .collect::<Result<_, _>>()?;
        let mut trial = self.amps.clone();
        for (i, a) in idx.into_iter().zip(amps) { trial[i] = *a; }
        let total: f64 = trial.iter().map(|a| a.norm_sqr()).sum();
        if !trial.is_empty() && total == 0.0 {
            return Err(StateError::ZeroNorm);
        }
        self.amps = trial;
        self.normalize();
        self.refresh_derived();
        Ok(())
    }

    /// Overwrite a single amplitude; see
    /// [`set_amplitudes`][Self::set_amplitudes].
    pub fn set_amplitude(&mut self, l: usize, amp: C64) -> StateResult<()> {
        self.set_amplitudes(&[l], &nd::array![amp])
    }

    /// Re-solve all wavenumbers and rebuild every derived cache from the
    /// current parameters.
    ///
    /// The rebuild happens in a fresh copy that replaces `self` only on
    /// success.
    pub fn recompute_all(&mut self) -> StateResult<()> {
        let mut next = self.clone();
        next.rebuild()?;
        *self = next;
        Ok(())
    }

    /// Change the boundary parameter and recompute atomically.
    pub fn set_gamma(&mut self, gamma: f64) -> StateResult<()> {
        let mut next = self.clone();
        next.gamma = gamma;
        next.rebuild()?;
        *self = next;
        Ok(())
    }

    /// Change the box length and recompute atomically.
    pub fn set_length(&mut self, length: f64) -> StateResult<()> {
        let mut next = self.clone();
        next.length = length;
        next.rebuild()?;
        *self = next;
        Ok(())
    }

    /// Change the particle mass. Mass enters only energies and phases, so no
    /// cache depends on it.
    pub fn set_mass(&mut self, mass: f64) { self.mass = mass; }

    /// Change the momentum-grid half-width and recompute atomically.
    pub fn set_bound(&mut self, bound: usize) -> StateResult<()> {
        let mut next = self.clone();
        next.grid = MomentumGrid::new(bound, self.grid.cstep(), self.length);
        next.rebuild()?;
        *self = next;
        Ok(())
    }

    /// Change the continuous-grid step and recompute atomically.
    pub fn set_cstep(&mut self, cstep: f64) -> StateResult<()> {
        let mut next = self.clone();
        next.grid = MomentumGrid::new(self.grid.bound(), cstep, self.length);
        next.rebuild()?;
        *self = next;
        Ok(())
    }

    // full recompute in place: wavenumbers, grids, kernels, aggregates
    fn rebuild(&mut self) -> StateResult<()> {
        self.ks = self.levels.iter()
            .map(|&l| boundary::gamma_to_k(self.gamma, l, self.length))
            .collect::<Result<_, _>>()?;
        self.grid = MomentumGrid::new(
            self.grid.bound(), self.grid.cstep(), self.length);
        self.normalize();
        self.refresh_derived();
        Ok(())
    }

    // rescale amplitudes to unit total probability; empty states are left
    // alone, and the mutation guards keep a zero norm unreachable here
    fn normalize(&mut self) {
        if self.amps.is_empty() { return; }
        let norm: f64 = self.amps.iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt();
        self.amps.map_inplace(|a| { *a /= norm; });
    }

    // rebuild kernel rows and the t = 0 aggregates from the current
    // wavenumbers, amplitudes, and grids
    fn refresh_derived(&mut self) {
        self.kernels_cont = self.levels.iter().zip(&self.ks)
            .map(|(&l, &k)| {
                basis::momentum_kernel(self.length, k, l, self.grid.k_cont())
            })
            .collect();
        self.kernels_disc = self.levels.iter().zip(&self.ks)
            .map(|(&l, &k)| {
                basis::momentum_kernel(self.length, k, l, self.grid.k_disc())
            })
            .collect();
        self.phi_cont = momentum::project_continuous(
            &self.kernels_cont, &self.amps, self.grid.k_cont().len());
        self.phi_disc = momentum::project_discrete(
            self.length,
            &self.kernels_disc, &self.amps, self.grid.k_disc().len());
        self.prob_cont = momentum::probability(&self.phi_cont);
        self.prob_disc = momentum::probability(&self.phi_disc);
    }

    /// Energy of active eigenstate `l`, `E_l = k_l²/(2m)`; negative for
    /// evanescent states.
    pub fn energy(&self, l: usize) -> StateResult<f64> {
        self.levels.iter().position(|ll| *ll == l)
            .map(|i| {
                let k = self.ks[i];
                (k * k).re / (2.0 * self.mass)
            })
            .ok_or(StateError::NotFound(l))
    }

    /// Energies of all active eigenstates, parallel to
    /// [`levels`][Self::levels].
    pub fn energies(&self) -> nd::Array1<f64> {
        self.ks.mapv(|k| (k * k).re / (2.0 * self.mass))
    }

    /// Revival time of the Dirichlet box, `4mL²/π`.
    pub fn revival_time(&self) -> f64 {
        4.0 * self.mass * self.length.powi(2) / PI
    }

    // amplitudes with their time-evolution phases attached
    fn phased_amps(&self, t: f64) -> nd::Array1<C64> {
        self.amps.iter().zip(self.energies())
            .map(|(a, e)| *a * C64::cis(-e * t))
            .collect()
    }

    /// Evaluate the position-space wavefunction
    /// `Σ_l c_l ψ_l(x) e^(−iE_l t)` over a caller-supplied position array.
    pub fn position_wavefunction<S>(&self, x: &Arr1<S>, t: f64)
        -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        let phased = self.phased_amps(t);
        let mut acc: nd::Array1<C64> = nd::Array1::zeros(x.len());
        for ((&l, &k), a) in self.levels.iter().zip(&self.ks).zip(&phased) {
            let psi = basis::eigenfunction(self.length, k, l, x);
            nd::Zip::from(&mut acc).and(&psi)
                .for_each(|acck, pk| { *acck += *a * *pk; });
        }
        acc
    }

    /// Continuous-spectrum momentum wavefunction at time `t` over the owned
    /// grid.
    pub fn momentum_wavefunction_cont(&self, t: f64) -> nd::Array1<C64> {
        momentum::project_continuous(
            &self.kernels_cont,
            &self.phased_amps(t),
            self.grid.k_cont().len(),
        )
    }

    /// Discrete-spectrum momentum wavefunction at time `t` over the owned
    /// grid.
    pub fn momentum_wavefunction_disc(&self, t: f64) -> nd::Array1<C64> {
        momentum::project_discrete(
            self.length,
            &self.kernels_disc,
            &self.phased_amps(t),
            self.grid.k_disc().len(),
        )
    }

    /// Position expectation value `⟨x⟩(t)` by trapezoidal integration over a
    /// `res`-point grid spanning the box.
    ///
    /// *Panics if `res` is less than 2*.
    pub fn position_expectation(&self, t: f64, res: usize) -> f64 {
        let x: nd::Array1<f64>
            = nd::Array1::linspace(-self.length / 2.0, self.length / 2.0, res);
        let dx = x[1] - x[0];
        let psi = self.position_wavefunction(&x, t);
        let integrand: nd::Array1<f64> = x.iter().zip(&psi)
            .map(|(&xk, pk)| xk * pk.norm_sqr())
            .collect();
        trapz(&integrand, dx)
    }

    /// Momentum expectation value `Σ_n k_n·|φ_n(t)|²` over the discrete
    /// grid.
    pub fn momentum_expectation(&self, t: f64) -> f64 {
        let phi = self.momentum_wavefunction_disc(t);
        self.grid.k_disc().iter().zip(&phi)
            .map(|(&kn, pn)| kn * pn.norm_sqr())
            .sum()
    }
}
