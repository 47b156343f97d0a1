//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;

/// Returned when an operation requiring equal-length inputs encounters inputs
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check(na: usize, nb: usize) -> Result<(), Self> {
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from the transcendental boundary-condition root finder.
#[derive(Debug, Error)]
pub enum RootError {
    /// Returned when the Newton iteration fails to converge, or walks onto a
    /// non-finite iterate, for a requested (γ, l) pair.
    #[error("root search failed to converge for gamma = {gamma:e}, l = {l}")]
    NoConvergence { gamma: f64, l: usize },

    /// Returned when a non-positive eigenstate index is encountered.
    #[error("eigenstate indices start at 1; got {0}")]
    BadIndex(usize),
}

/// Returned from mutating operations on a [`BoxState`][crate::state::BoxState].
#[derive(Debug, Error)]
pub enum StateError {
    /// Returned when an eigenstate index named for removal or amplitude
    /// overwrite is not part of the current configuration.
    #[error("eigenstate {0} is not present in the current configuration")]
    NotFound(usize),

    /// Returned when an eigenstate index named for addition is already part
    /// of the current configuration (or appears twice in one batch).
    #[error("eigenstate {0} is already present in the current configuration")]
    Duplicate(usize),

    /// Returned when an operation would leave a non-empty state with zero
    /// total amplitude, which cannot be normalized.
    #[error("operation would leave a non-empty state with zero total amplitude")]
    ZeroNorm,

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`RootError`]
    #[error("root error: {0}")]
    Root(#[from] RootError),
}

/// Returned from the frame driver in [`anim`][crate::anim].
#[derive(Debug, Error)]
pub enum AnimError {
    /// Returned when a drive-variable name is not one of `"t"`, `"L"`, or
    /// `"gamma"`.
    #[error("unrecognized drive variable {0:?}; expected \"t\", \"L\", or \"gamma\"")]
    UnknownDriveVar(String),

    /// Returned when a frame configuration carries a non-positive frame rate
    /// or playback speed.
    #[error("frame rate and playback speed must be positive; got fps = {fps}, speed = {speed}")]
    BadFrameRate { fps: f64, speed: f64 },

    /// [`StateError`]
    #[error("state error: {0}")]
    State(#[from] StateError),
}
