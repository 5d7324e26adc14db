//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from [`find_resonances`][crate::spectrum::find_resonances] when
/// data arrays are too short to interpolate over.
#[derive(Debug, Error)]
#[error("sampled spectra must be longer than 4 elements; got {0}")]
pub struct LagrangeError(pub usize);

impl LagrangeError {
    pub(crate) fn check<S, A>(a: &nd::ArrayBase<S, nd::Ix1>)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let n = a.len();
        (n > 4).then_some(()).ok_or(Self(n))
    }
}

/// Main error type.
#[derive(Debug, Error)]
pub enum QError {
    /// Returned when a region would be empty, inverted, narrower than the
    /// minimum region width, or overlap one of its neighbors.
    #[error("invalid bounds for region {index}: [{start}, {end})")]
    InvalidRegionBounds { index: usize, start: f64, end: f64 },

    /// Returned for out-of-range indices and degenerate parameter values.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Returned when no solver handles the shape of a potential, or when a
    /// solver is asked to handle a shape different from the one it was built
    /// for.
    #[error("unsupported potential topology: {0}")]
    UnsupportedTopology(String),

    /// Returned when no closed-form solver exists for a kind of potential.
    #[error("unsupported potential type: {0}")]
    UnsupportedPotentialType(String),

    /// Returned from checked complex division by exactly zero.
    #[error("complex division by zero")]
    DivisionByZero,

    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`LagrangeError`]
    #[error("lagrange error: {0}")]
    Lagrange(#[from] LagrangeError),

    /// Malformed configuration.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Unreadable configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl QError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_index(index: usize, len: usize, what: &str)
        -> Result<(), Self>
    {
        (index < len).then_some(())
            .ok_or_else(|| {
                Self::InvalidArgument(
                    format!("{what} index {index} out of range (len {len})")
                )
            })
    }
}

pub type QResult<T> = Result<T, QError>;
