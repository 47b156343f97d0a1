#![allow(dead_code, non_snake_case)]

//! Provides the core machinery for representing and evolving the state of a
//! single quantum particle confined to a one-dimensional box with
//! parameterized ("leaky") boundary conditions.
//!
//! A state is a superposition of box eigenstates. For a boundary parameter γ
//! and box length L, the allowed wavenumbers are roots of a transcendental
//! matching relation per eigenstate index; they may be real (oscillatory
//! states) or purely imaginary (evanescent states). The crate covers:
//! - [`boundary`]: matching relations and the Newton search converting γ into
//!   wavenumbers
//! - [`basis`]: closed-form position-space eigenfunctions and momentum-space
//!   projection kernels for the four parity/wavenumber families
//! - [`state`]: the central superposition type with incremental add/remove
//!   operations, normalization, and cached derived data
//! - [`momentum`]: momentum sample grids and the projection of a
//!   superposition onto them (continuous and discrete spectra)
//! - [`anim`]: frame-driven advancement of a state across time, box length,
//!   or boundary parameter, producing presentation-ready data arrays
//!
//! Natural units with ħ = 1 are used throughout; figure handling, color, and
//! file or video output are left to downstream presentation code.

pub mod error;
pub mod boundary;
pub mod basis;
pub mod momentum;
pub mod state;
pub mod anim;
pub mod utils;

pub(crate) const DEF_EPSILON: f64 = 1e-12;
pub(crate) const DEF_MAXITERS: usize = 1000;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
