//! A solver kept up to date with the energies it was built from.

use std::{
    cell::{ Ref, RefCell },
    rc::Rc,
};
use ndarray as nd;
use crate::{
    Arr1,
    complex::C64,
    energy::{ PotentialEnergy, TotalEnergy },
    error::QResult,
    observe::{ Observer, Subscription },
    potential::Topology,
};
use super::{ Direction, PlaneWaveSolver, Solver, WaveComponent };

struct SolverCore {
    solver: RefCell<Solver>,
    total_energy: Rc<TotalEnergy>,
    potential_energy: Rc<PotentialEnergy>,
}

impl SolverCore {
    fn refresh(&self) -> QResult<()> {
        let energy = self.total_energy.energy();
        let potential = self.potential_energy.get();
        self.solver.borrow_mut().update_coefficients(energy, &potential)
    }
}

impl Observer for SolverCore {
    fn changed(&self) {
        match self.refresh() {
            Ok(()) => {
                log::debug!(
                    "refreshed {} solver coefficients at E = {}",
                    self.solver.borrow().topology(),
                    self.total_energy.energy(),
                );
            },
            Err(err) => {
                log::error!("failed to refresh solver coefficients: {err}");
            },
        }
    }
}

/// A [`Solver`] subscribed to a [`TotalEnergy`] and a [`PotentialEnergy`].
///
/// Every change to either input recomputes the coefficients before the
/// mutating call returns, so evaluation always reflects the current inputs.
/// Dropping the `ObservingSolver` unsubscribes it from both.
pub struct ObservingSolver {
    core: Rc<SolverCore>,
    _total_sub: Subscription,
    _potential_sub: Subscription,
}

impl ObservingSolver {
    /// Wrap `solver`, which must have been built for the current values of
    /// `total_energy` and `potential_energy`.
    pub(crate) fn new(
        solver: Solver,
        total_energy: &Rc<TotalEnergy>,
        potential_energy: &Rc<PotentialEnergy>,
    ) -> Self
    {
        let core = Rc::new(SolverCore {
            solver: RefCell::new(solver),
            total_energy: Rc::clone(total_energy),
            potential_energy: Rc::clone(potential_energy),
        });
        let _total_sub = total_energy.subscribe(&core);
        let _potential_sub = potential_energy.subscribe(&core);
        Self { core, _total_sub, _potential_sub }
    }

    /// Borrow the underlying solver.
    pub fn solver(&self) -> Ref<'_, Solver> { self.core.solver.borrow() }

    /// Clone out the underlying solver.
    pub fn snapshot(&self) -> Solver { self.core.solver.borrow().clone() }

    pub fn total_energy(&self) -> &Rc<TotalEnergy> { &self.core.total_energy }

    pub fn potential_energy(&self) -> &Rc<PotentialEnergy> {
        &self.core.potential_energy
    }

    pub fn topology(&self) -> Topology { self.solver().topology() }

    pub fn direction(&self) -> Direction { self.solver().direction() }

    /// Change the direction of incidence, recomputing the coefficients.
    pub fn set_direction(&self, direction: Direction) -> QResult<()> {
        let energy = self.core.total_energy.energy();
        let potential = self.core.potential_energy.get();
        let solver = Solver::for_potential(energy, &potential, direction)?;
        *self.core.solver.borrow_mut() = solver;
        Ok(())
    }

    /// Recompute the coefficients from the current inputs.
    pub fn refresh(&self) -> QResult<()> { self.core.refresh() }

    pub fn solve(&self, x: f64, t: f64) -> C64 { self.solver().solve(x, t) }

    pub fn solve_component(&self, x: f64, t: f64, component: WaveComponent)
        -> C64
    {
        self.solver().solve_component(x, t, component)
    }

    pub fn solve_range<S>(&self, x: &Arr1<S>, t: f64) -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        self.solver().solve_range(x, t)
    }

    pub fn solve_range_component<S>(
        &self,
        x: &Arr1<S>,
        t: f64,
        component: WaveComponent,
    ) -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        self.solver().solve_range_component(x, t, component)
    }

    pub fn transmission(&self) -> f64 { self.solver().transmission() }

    pub fn reflection(&self) -> f64 { self.solver().reflection() }
}

impl std::fmt::Debug for ObservingSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservingSolver")
            .field("solver", &*self.core.solver.borrow())
            .finish()
    }
}
