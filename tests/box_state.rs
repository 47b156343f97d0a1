#![allow(non_snake_case)]

//! End-to-end checks running the solver, basis, state, and driver together.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use pibox::{
    anim::{ Driver, DriveVar, FrameConfig, MomentumBars, PlotMode, PositionCurve },
    basis,
    boundary,
    state::BoxState,
};

#[test]
fn solved_wavenumbers_satisfy_their_matching_relations() {
    let state = BoxState::with_levels(
        0.75, 2.0,
        &[3, 4, 5, 6],
        &nd::Array1::from_elem(4, C64::from(1.0)),
    ).unwrap();
    for (&l, &k) in state.levels().iter().zip(state.wavenumbers()) {
        let res = boundary::matching_residual(0.75, l, 2.0, k);
        assert!(res.abs() < 1e-9, "l = {}: residual {}", l, res);
    }
}

#[test]
fn normalization_survives_a_mixed_edit_sequence() {
    let mut state = BoxState::new(1.0, PI);
    state.add_levels(
        &[1, 2, 3],
        &nd::array![C64::from(0.2), C64::i(), C64::new(1.0, -1.0)],
    ).unwrap();
    state.set_amplitude(2, C64::from(4.0)).unwrap();
    state.remove_level(1).unwrap();
    state.add_level(6, C64::new(0.0, 0.3)).unwrap();
    state.set_gamma(-5.0).unwrap();
    state.set_length(1.5).unwrap();
    state.recompute_all().unwrap();
    let total: f64 = state.amplitudes().iter().map(|a| a.norm_sqr()).sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert_eq!(state.levels(), &[2, 3, 6]);
}

#[test]
fn discrete_aggregate_is_the_kernel_row_scaled_by_the_spectral_measure() {
    let L = 2.0;
    let state = BoxState::with_levels(
        0.75, L,
        &[3],
        &nd::array![C64::from(1.0)],
    ).unwrap();
    let k = state.wavenumbers()[0];
    let row = basis::momentum_kernel(L, k, 3, state.grid().k_disc());
    let w = (PI / L).sqrt();
    for (phi, kern) in state.momentum_disc().iter().zip(&row) {
        assert!((*phi - *kern * w).norm() < 1e-12);
    }
}

// with L = π the spectral-measure factor √(π/L) is exactly 1, so the two
// aggregates agree wherever the grids share a sample point
#[test]
fn aggregates_coincide_on_shared_points_when_length_is_pi() {
    let state = BoxState::with_levels(
        0.75, PI,
        &[3],
        &nd::array![C64::from(1.0)],
    ).unwrap();
    let kc = state.grid().k_cont();
    let phic = state.momentum_cont();
    let pairs = state.grid().k_disc().iter().zip(state.momentum_disc());
    for (n, (kd, phid)) in pairs.enumerate() {
        // cstep = 0.01 in units of π/L puts a shared point every 100 samples
        let i = n * 100;
        assert!((kc[i] - kd).abs() < 1e-9);
        assert!((phic[i] - *phid).norm() < 1e-9);
    }
}

#[test]
fn cached_probabilities_are_squared_magnitudes() {
    let state = BoxState::with_levels(
        0.5, PI,
        &[1, 4],
        &nd::array![C64::new(1.0, 0.5), C64::from(-2.0)],
    ).unwrap();
    for (p, phi) in state.prob_cont().iter().zip(state.momentum_cont()) {
        assert!((*p - phi.norm_sqr()).abs() < 1e-12);
        assert!(*p >= 0.0);
    }
    for (p, phi) in state.prob_disc().iter().zip(state.momentum_disc()) {
        assert!((*p - phi.norm_sqr()).abs() < 1e-12);
        assert!(*p >= 0.0);
    }
}

// γ = 0: the lowest even state has k → 0 and the next state sits exactly at
// k·L = π
#[test]
fn neumann_box_closed_forms() {
    let L = PI;
    let x: nd::Array1<f64> = nd::Array1::linspace(-L / 2.0, L / 2.0, 201);

    let ground = BoxState::with_levels(
        0.0, L,
        &[1],
        &nd::array![C64::from(1.0)],
    ).unwrap();
    let k = ground.wavenumbers()[0];
    assert_eq!(k.im, 0.0);
    let n = (2.0 / L).sqrt() * (1.0 + (k.re * L).sin() / (k.re * L)).powf(-0.5);
    let psi = ground.position_wavefunction(&x, 0.0);
    for (&xk, pk) in x.iter().zip(&psi) {
        assert!((pk.re - n * (k.re * xk).cos()).abs() < 1e-8);
        assert_eq!(pk.im, 0.0);
    }

    let first = BoxState::with_levels(
        0.0, L,
        &[2],
        &nd::array![C64::from(1.0)],
    ).unwrap();
    assert!((first.wavenumbers()[0].re - PI / L).abs() < 1e-9);
    let psi = first.position_wavefunction(&x, 0.0);
    for (&xk, pk) in x.iter().zip(&psi) {
        let expected = (2.0 / L).sqrt() * (PI * xk / L).sin();
        assert!((pk.re - expected).abs() < 1e-8);
    }
}

#[test]
fn time_sweep_emits_finite_frames_throughout() {
    let state = BoxState::with_levels(
        1.0, PI,
        &[1, 2, 3],
        &nd::array![C64::from(1.0), C64::from(1.0), C64::from(1.0)],
    ).unwrap();
    let frames = FrameConfig::new(0.0, 0.5, 20.0, 1.0).unwrap();
    let mut driver = Driver::new(state, DriveVar::Time, frames);
    driver.add_artifact(Box::new(PositionCurve::new(PlotMode::AbsSquare, 201)));
    driver.add_artifact(Box::new(MomentumBars::new(PlotMode::Real)));
    let out = driver.run().unwrap();
    assert_eq!(out.len(), frames.num_frames());
    for frame in &out {
        for data in frame {
            match data {
                pibox::anim::FrameData::Curve { y, .. }
                | pibox::anim::FrameData::Bars { y, .. } => {
                    assert!(y.iter().all(|yk| yk.is_finite()));
                }
                pibox::anim::FrameData::VLine { x } => {
                    assert!(x.is_finite());
                }
            }
        }
    }
}

#[test]
fn gamma_sweep_crosses_the_evanescent_threshold() {
    let state = BoxState::with_levels(
        0.5, 1.0,
        &[1],
        &nd::array![C64::from(1.0)],
    ).unwrap();
    let frames = FrameConfig::new(0.5, -1.5, 10.0, -2.0);
    assert!(frames.is_err());
    let frames = FrameConfig::new(-1.5, 0.5, 10.0, 2.0).unwrap();
    let mut driver = Driver::new(state, DriveVar::Gamma, frames);
    driver.add_artifact(Box::new(MomentumBars::new(PlotMode::AbsSquare)));
    driver.plot().unwrap();
    assert!(driver.state().wavenumbers()[0].im > 0.0);
    for _ in 1..frames.num_frames() { driver.tick().unwrap(); }
    assert!(driver.state().wavenumbers()[0].im == 0.0);
}
