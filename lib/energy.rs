//! Observable model inputs: the particle's total energy and the potential
//! energy profile it moves in.
//!
//! Both are meant to be shared (`Rc`) between the code that edits them and
//! the solvers that [observe][crate::observe] them.

use std::{ cell::Ref, rc::Rc };
use crate::{
    error::{ QError, QResult },
    observe::{ Observable, Observer, Subscription },
    potential::{ Potential, Topology },
};

/// Default total energy (eV).
pub const DEFAULT_TOTAL_ENERGY: f64 = 0.3;

/// Observable total energy `E` (eV).
#[derive(Debug)]
pub struct TotalEnergy {
    inner: Observable<f64>,
}

impl TotalEnergy {
    /// *Panics if `energy` is not finite*.
    pub fn new(energy: f64) -> Self {
        assert!(energy.is_finite(), "total energy must be finite");
        Self { inner: Observable::new(energy) }
    }

    pub fn energy(&self) -> f64 { *self.inner.get() }

    /// Set the energy, notifying observers if it changed.
    pub fn set_energy(&self, energy: f64) -> QResult<()> {
        if !energy.is_finite() {
            return Err(QError::InvalidArgument(
                format!("total energy must be finite; got {energy}")
            ));
        }
        if energy != self.energy() { self.inner.set(energy); }
        Ok(())
    }

    pub fn subscribe<O>(&self, observer: &Rc<O>) -> Subscription
    where O: Observer + 'static
    {
        self.inner.subscribe(observer)
    }

    pub fn observer_count(&self) -> usize { self.inner.observer_count() }

    /// See [`Observable::with_notifications_suppressed`].
    pub fn with_notifications_suppressed<F, R>(&self, f: F) -> R
    where F: FnOnce() -> R
    {
        self.inner.with_notifications_suppressed(f)
    }
}

impl Default for TotalEnergy {
    fn default() -> Self { Self::new(DEFAULT_TOTAL_ENERGY) }
}

/// Observable [`Potential`].
///
/// Every successful mutation notifies observers once; failed mutations change
/// nothing and notify no one.
#[derive(Debug)]
pub struct PotentialEnergy {
    inner: Observable<Potential>,
}

impl PotentialEnergy {
    pub fn new<P>(potential: P) -> Self
    where P: Into<Potential>
    {
        Self { inner: Observable::new(potential.into()) }
    }

    /// Borrow the current potential.
    pub fn get(&self) -> Ref<'_, Potential> { self.inner.get() }

    pub fn snapshot(&self) -> Potential { self.inner.snapshot() }

    pub fn topology(&self) -> Topology { self.inner.get().topology() }

    pub fn number_of_regions(&self) -> usize {
        self.inner.get().number_of_regions()
    }

    /// See [`Potential::set_region`].
    pub fn set_region(&self, index: usize, start: f64, end: f64, energy: f64)
        -> QResult<()>
    {
        self.inner.update(|p| p.set_region(index, start, end, energy))
    }

    /// See [`Potential::set_energy`].
    pub fn set_energy(&self, index: usize, energy: f64) -> QResult<()> {
        self.inner.update(|p| p.set_energy(index, energy))
    }

    /// See [`StepPotential::set_step_position`][crate::potential::StepPotential::set_step_position].
    pub fn set_step_position(&self, x: f64) -> QResult<()> {
        self.inner.update(|p| p.as_step_mut()?.set_step_position(x))
    }

    /// See [`BarrierPotential::set_barrier_position`][crate::potential::BarrierPotential::set_barrier_position].
    pub fn set_barrier_position(&self, barrier: usize, x: f64) -> QResult<()> {
        self.inner.update(|p| p.as_barrier_mut()?.set_barrier_position(barrier, x))
    }

    /// See [`BarrierPotential::set_barrier_width`][crate::potential::BarrierPotential::set_barrier_width].
    pub fn set_barrier_width(&self, barrier: usize, width: f64) -> QResult<()> {
        self.inner.update(|p| p.as_barrier_mut()?.set_barrier_width(barrier, width))
    }

    pub fn subscribe<O>(&self, observer: &Rc<O>) -> Subscription
    where O: Observer + 'static
    {
        self.inner.subscribe(observer)
    }

    pub fn observer_count(&self) -> usize { self.inner.observer_count() }

    /// See [`Observable::with_notifications_suppressed`].
    pub fn with_notifications_suppressed<F, R>(&self, f: F) -> R
    where F: FnOnce() -> R
    {
        self.inner.with_notifications_suppressed(f)
    }
}
