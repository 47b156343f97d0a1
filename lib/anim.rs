//! Frame-driven advancement of a [`BoxState`] across time, box length, or
//! boundary parameter.
//!
//! The driver is composition-based: it owns the state and a collection of
//! [`Artifact`]s, each of which knows how to derive one presentation-ready
//! data series from the state. Advancing time only re-evaluates values on
//! each artifact's existing sample grid; driving the box length or the
//! boundary parameter rebuilds the state and re-derives the grids, since both
//! change the domains the artifacts sample over. Rendering, color, encoding,
//! and file output are left to downstream code.

use std::str::FromStr;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ error::AnimError, state::BoxState };

pub type AnimResult<T> = Result<T, AnimError>;

/// Default sample resolution for position-space artifacts.
pub const DEF_RES: usize = 1000;

/// Quantity advanced from frame to frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriveVar {
    /// Evolve in time at fixed box parameters.
    Time,
    /// Sweep the box length at `t = 0`.
    Length,
    /// Sweep the boundary parameter at `t = 0`.
    Gamma,
}

impl FromStr for DriveVar {
    type Err = AnimError;

    fn from_str(s: &str) -> AnimResult<Self> {
        match s {
            "t" => Ok(Self::Time),
            "L" => Ok(Self::Length),
            "gamma" => Ok(Self::Gamma),
            _ => Err(AnimError::UnknownDriveVar(s.to_string())),
        }
    }
}

/// Frame timing: the driven quantity sweeps `[start, stop]` at `speed` units
/// per second of playback, rendered at `fps` frames per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameConfig {
    pub start: f64,
    pub stop: f64,
    pub fps: f64,
    pub speed: f64,
}

impl FrameConfig {
    /// Create a new frame configuration.
    ///
    /// Non-positive `fps` or `speed` is [`AnimError::BadFrameRate`].
    pub fn new(start: f64, stop: f64, fps: f64, speed: f64)
        -> AnimResult<Self>
    {
        if fps <= 0.0 || speed <= 0.0 {
            return Err(AnimError::BadFrameRate { fps, speed });
        }
        Ok(Self { start, stop, fps, speed })
    }

    /// Change in the driven quantity per frame.
    pub fn step(&self) -> f64 { self.speed / self.fps }

    /// Total number of frames covering `[start, stop]`.
    pub fn num_frames(&self) -> usize {
        (((self.stop - self.start) * self.fps / self.speed).max(0.0))
            as usize
    }
}

/// Scalar reduction applied to complex wavefunction values before plotting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlotMode {
    /// `|ψ|²`
    AbsSquare,
    /// `Re ψ`
    Real,
    /// `Im ψ`
    Imag,
}

impl PlotMode {
    fn apply(self, z: C64) -> f64 {
        match self {
            Self::AbsSquare => z.norm_sqr(),
            Self::Real => z.re,
            Self::Imag => z.im,
        }
    }
}

/// One frame's worth of data emitted by a single artifact.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameData {
    /// A sampled curve over a continuous axis.
    Curve { x: nd::Array1<f64>, y: nd::Array1<f64> },
    /// Bar heights over discrete sample points.
    Bars { x: nd::Array1<f64>, y: nd::Array1<f64> },
    /// A vertical marker line.
    VLine { x: f64 },
}

/// A presentation-ready data series derived from a [`BoxState`].
///
/// `initialize` re-derives the artifact's sample grid from the state before
/// evaluating; `update` re-evaluates on the existing grid only.
pub trait Artifact {
    fn initialize(&mut self, state: &BoxState, t: f64);
    fn update(&mut self, state: &BoxState, t: f64);
    fn data(&self) -> FrameData;

    /// Advance one frame under the given drive: time advances on the
    /// existing grid, while length and boundary-parameter drives re-derive
    /// the sample domains.
    fn tick(&mut self, state: &BoxState, drive: DriveVar, t: f64) {
        match drive {
            DriveVar::Time => self.update(state, t),
            DriveVar::Length | DriveVar::Gamma => self.initialize(state, t),
        }
    }
}

/// Position-space wavefunction curve over the box interior.
pub struct PositionCurve {
    mode: PlotMode,
    res: usize,
    x: nd::Array1<f64>,
    y: nd::Array1<f64>,
}

impl PositionCurve {
    pub fn new(mode: PlotMode, res: usize) -> Self {
        Self {
            mode,
            res,
            x: nd::Array1::zeros(0),
            y: nd::Array1::zeros(0),
        }
    }
}

impl Default for PositionCurve {
    fn default() -> Self { Self::new(PlotMode::AbsSquare, DEF_RES) }
}

impl Artifact for PositionCurve {
    fn initialize(&mut self, state: &BoxState, t: f64) {
        let half = state.length() / 2.0;
        self.x = nd::Array1::linspace(-half, half, self.res);
        self.update(state, t);
    }

    fn update(&mut self, state: &BoxState, t: f64) {
        let psi = state.position_wavefunction(&self.x, t);
        self.y = psi.mapv(|z| self.mode.apply(z));
    }

    fn data(&self) -> FrameData {
        FrameData::Curve { x: self.x.clone(), y: self.y.clone() }
    }
}

/// Continuous-spectrum momentum wavefunction curve.
pub struct MomentumCurve {
    mode: PlotMode,
    x: nd::Array1<f64>,
    y: nd::Array1<f64>,
}

impl MomentumCurve {
    pub fn new(mode: PlotMode) -> Self {
        Self { mode, x: nd::Array1::zeros(0), y: nd::Array1::zeros(0) }
    }
}

impl Artifact for MomentumCurve {
    fn initialize(&mut self, state: &BoxState, t: f64) {
        self.x = state.grid().k_cont().clone();
        self.update(state, t);
    }

    fn update(&mut self, state: &BoxState, t: f64) {
        let phi = state.momentum_wavefunction_cont(t);
        self.y = phi.mapv(|z| self.mode.apply(z));
    }

    fn data(&self) -> FrameData {
        FrameData::Curve { x: self.x.clone(), y: self.y.clone() }
    }
}

/// Discrete-spectrum momentum amplitudes as bar heights.
pub struct MomentumBars {
    mode: PlotMode,
    x: nd::Array1<f64>,
    y: nd::Array1<f64>,
}

impl MomentumBars {
    pub fn new(mode: PlotMode) -> Self {
        Self { mode, x: nd::Array1::zeros(0), y: nd::Array1::zeros(0) }
    }
}

impl Artifact for MomentumBars {
    fn initialize(&mut self, state: &BoxState, t: f64) {
        self.x = state.grid().k_disc().clone();
        self.update(state, t);
    }

    fn update(&mut self, state: &BoxState, t: f64) {
        let phi = state.momentum_wavefunction_disc(t);
        self.y = phi.mapv(|z| self.mode.apply(z));
    }

    fn data(&self) -> FrameData {
        FrameData::Bars { x: self.x.clone(), y: self.y.clone() }
    }
}

/// Vertical marker at `⟨x⟩(t)`.
pub struct PositionExpectationLine {
    res: usize,
    x: f64,
}

impl PositionExpectationLine {
    pub fn new(res: usize) -> Self { Self { res, x: 0.0 } }
}

impl Default for PositionExpectationLine {
    fn default() -> Self { Self::new(DEF_RES) }
}

impl Artifact for PositionExpectationLine {
    fn initialize(&mut self, state: &BoxState, t: f64) {
        self.update(state, t);
    }

    fn update(&mut self, state: &BoxState, t: f64) {
        self.x = state.position_expectation(t, self.res);
    }

    fn data(&self) -> FrameData { FrameData::VLine { x: self.x } }
}

/// Vertical marker at `⟨k⟩(t)`.
pub struct MomentumExpectationLine {
    x: f64,
}

impl MomentumExpectationLine {
    pub fn new() -> Self { Self { x: 0.0 } }
}

impl Default for MomentumExpectationLine {
    fn default() -> Self { Self::new() }
}

impl Artifact for MomentumExpectationLine {
    fn initialize(&mut self, state: &BoxState, t: f64) {
        self.update(state, t);
    }

    fn update(&mut self, state: &BoxState, t: f64) {
        self.x = state.momentum_expectation(t);
    }

    fn data(&self) -> FrameData { FrameData::VLine { x: self.x } }
}

/// Which expectation value an evolution curve tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExpectationKind {
    Position,
    Momentum,
}

/// Expectation-value history, `⟨x⟩(t)` or `⟨k⟩(t)` sampled over a fixed
/// time window.
///
/// The window is independent of the frame clock: the whole series is
/// re-evaluated whenever the state changes, so under a length or
/// boundary-parameter drive the curve reshapes frame to frame while under a
/// time drive it stays put.
pub struct ExpectationEvolution {
    kind: ExpectationKind,
    t_start: f64,
    t_stop: f64,
    res: usize,
    xres: usize,
    t: nd::Array1<f64>,
    y: nd::Array1<f64>,
}

impl ExpectationEvolution {
    pub fn new(kind: ExpectationKind, t_start: f64, t_stop: f64, res: usize)
        -> Self
    {
        Self {
            kind,
            t_start,
            t_stop,
            res,
            xres: DEF_RES,
            t: nd::Array1::zeros(0),
            y: nd::Array1::zeros(0),
        }
    }

    /// Change the sampled time window; takes effect on the next
    /// initialization.
    pub fn set_t_range(&mut self, t_start: f64, t_stop: f64) {
        self.t_start = t_start;
        self.t_stop = t_stop;
    }
}

impl Artifact for ExpectationEvolution {
    fn initialize(&mut self, state: &BoxState, t: f64) {
        self.t = nd::Array1::linspace(self.t_start, self.t_stop, self.res);
        self.update(state, t);
    }

    fn update(&mut self, state: &BoxState, _t: f64) {
        let y = self.t.mapv(|tk| match self.kind {
            ExpectationKind::Position
                => state.position_expectation(tk, self.xres),
            ExpectationKind::Momentum => state.momentum_expectation(tk),
        });
        self.y = y;
    }

    fn data(&self) -> FrameData {
        FrameData::Curve { x: self.t.clone(), y: self.y.clone() }
    }
}

/// Owns a [`BoxState`] and a set of [`Artifact`]s, advancing the driven
/// quantity one frame at a time.
pub struct Driver {
    state: BoxState,
    drive: DriveVar,
    frames: FrameConfig,
    artifacts: Vec<Box<dyn Artifact>>,
    frame: usize,
}

impl Driver {
    pub fn new(state: BoxState, drive: DriveVar, frames: FrameConfig)
        -> Self
    {
        Self { state, drive, frames, artifacts: Vec::new(), frame: 0 }
    }

    /// Like [`new`][Self::new], resolving the drive variable from its name
    /// (`"t"`, `"L"`, or `"gamma"`).
    pub fn from_drive_name(
        state: BoxState,
        drive: &str,
        frames: FrameConfig,
    ) -> AnimResult<Self> {
        Ok(Self::new(state, drive.parse()?, frames))
    }

    pub fn add_artifact(&mut self, artifact: Box<dyn Artifact>) {
        self.artifacts.push(artifact);
    }

    pub fn state(&self) -> &BoxState { &self.state }

    pub fn frame(&self) -> usize { self.frame }

    // driven value at a given frame
    fn driven(&self, frame: usize) -> f64 {
        self.frames.start + frame as f64 * self.frames.step()
    }

    // apply a drive value to the state; time is handled per artifact
    fn apply_drive(&mut self, v: f64) -> AnimResult<f64> {
        match self.drive {
            DriveVar::Time => Ok(v),
            DriveVar::Length => {
                self.state.set_length(v)?;
                Ok(0.0)
            }
            DriveVar::Gamma => {
                self.state.set_gamma(v)?;
                Ok(0.0)
            }
        }
    }

    /// Produce the first frame: apply the starting drive value and fully
    /// initialize every artifact.
    pub fn plot(&mut self) -> AnimResult<Vec<FrameData>> {
        let t = self.apply_drive(self.driven(0))?;
        self.frame = 0;
        for artifact in self.artifacts.iter_mut() {
            artifact.initialize(&self.state, t);
        }
        Ok(self.artifacts.iter().map(|a| a.data()).collect())
    }

    /// Advance the driven quantity by one frame and produce the next frame.
    ///
    /// Time advancement re-evaluates artifacts on their existing grids;
    /// length or boundary-parameter advancement rebuilds the state and
    /// reinitializes the artifacts, since both re-derive the sample domains.
    /// A failed advance leaves the frame counter and the state where they
    /// were, so the same frame can be retried.
    pub fn tick(&mut self) -> AnimResult<Vec<FrameData>> {
        let t = self.apply_drive(self.driven(self.frame + 1))?;
        self.frame += 1;
        for artifact in self.artifacts.iter_mut() {
            artifact.tick(&self.state, self.drive, t);
        }
        Ok(self.artifacts.iter().map(|a| a.data()).collect())
    }

    /// Produce every frame of the configured sweep in order.
    pub fn run(&mut self) -> AnimResult<Vec<Vec<FrameData>>> {
        let n = self.frames.num_frames().max(1);
        let mut out = Vec::with_capacity(n);
        out.push(self.plot()?);
        for _ in 1..n { out.push(self.tick()?); }
        Ok(out)
    }
}
