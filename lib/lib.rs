//! Closed-form solutions for quantum tunneling through one-dimensional,
//! piecewise-constant potentials.
//!
//! A [`potential::Potential`] is a list of contiguous regions of constant
//! potential energy. For a total energy *E* and a direction of incidence, a
//! plane-wave [`solver`] computes the amplitudes of the forward- and
//! backward-moving waves in every region by transfer-matrix matching, after
//! which the wave function can be evaluated anywhere at any time along with
//! the transmission and reflection coefficients.
//!
//! Provided:
//! - Plane-wave solvers for constant, step, single-barrier and double-barrier
//!   potentials, selected by [`Solver::for_potential`][solver::Solver::for_potential]
//! - Observable total and potential energies that keep a subscribed solver
//!   up to date ([`energy`], [`factory::create_solver`])
//! - Transmission spectra and resonance search ([`spectrum`])
//! - Gaussian wave packets propagated by the split-step Fourier method
//!   ([`packet`])
//! - A simulation model tying all of the above to a clock ([`model`]) and
//!   JSON configuration ([`config`])
//!
//! Lengths are in nm, energies in eV and times in fs throughout. See [`docs`]
//! for theoretical background.

pub mod error;
pub mod complex;
pub mod units;
pub mod region;
pub mod observe;
pub mod potential;
pub mod energy;
pub mod solver;
pub mod factory;
pub mod spectrum;
pub mod packet;
pub mod config;
pub mod model;
pub mod utils;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
