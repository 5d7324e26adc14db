//! Selection of a closed-form solver from the shape of a potential.
//!
//! | topology         | solver                  |
//! |------------------|-------------------------|
//! | `Constant`       | [`ConstantSolver`]      |
//! | `Step`           | [`StepSolver`]          |
//! | `Barrier(1)`     | [`SingleBarrierSolver`] |
//! | `Barrier(2)`     | [`DoubleBarrierSolver`] |
//! | `Barrier(n)`     | `UnsupportedTopology`   |
//! | `Piecewise(_)`   | `UnsupportedPotentialType` |
//!
//! A solver is only ever asked to handle the topology it was built for, so a
//! new one has to be created whenever the topology of the potential changes.

use std::rc::Rc;
use crate::{
    energy::{ PotentialEnergy, TotalEnergy },
    error::{ QError, QResult },
    potential::{ Potential, Topology },
    solver::{
        ConstantSolver,
        Direction,
        DoubleBarrierSolver,
        ObservingSolver,
        SingleBarrierSolver,
        Solver,
        StepSolver,
    },
};

impl Solver {
    /// Build the solver matching the topology of `potential` and compute its
    /// coefficients for total energy `energy`.
    pub fn for_potential(energy: f64, potential: &Potential, direction: Direction)
        -> QResult<Self>
    {
        match potential.topology() {
            Topology::Constant => {
                ConstantSolver::new(energy, potential, direction).map(Self::from)
            },
            Topology::Step => {
                StepSolver::new(energy, potential, direction).map(Self::from)
            },
            Topology::Barrier(1) => {
                SingleBarrierSolver::new(energy, potential, direction)
                    .map(Self::from)
            },
            Topology::Barrier(2) => {
                DoubleBarrierSolver::new(energy, potential, direction)
                    .map(Self::from)
            },
            Topology::Barrier(n) => Err(QError::UnsupportedTopology(
                format!("no solver for a potential with {n} barriers")
            )),
            topology @ Topology::Piecewise(_) => {
                Err(QError::UnsupportedPotentialType(
                    format!("no closed-form solver for a {topology} potential")
                ))
            },
        }
    }
}

/// Build a solver for the current state of `potential_energy` and subscribe it
/// to both inputs.
pub fn create_solver(
    total_energy: &Rc<TotalEnergy>,
    potential_energy: &Rc<PotentialEnergy>,
    direction: Direction,
) -> QResult<ObservingSolver>
{
    let solver = {
        let potential = potential_energy.get();
        Solver::for_potential(total_energy.energy(), &potential, direction)?
    };
    log::debug!(
        "created {} solver ({direction:?}) at E = {}",
        potential_energy.topology(),
        total_energy.energy(),
    );
    Ok(ObservingSolver::new(solver, total_energy, potential_energy))
}

#[cfg(test)]
mod tests {
    use crate::{
        potential::{ BarrierPotential, ConstantPotential, PiecewisePotential, StepPotential },
        region::RegionList,
        solver::PlaneWaveSolver,
    };
    use super::*;

    fn build(p: Potential) -> QResult<Solver> {
        Solver::for_potential(0.3, &p, Direction::LeftToRight)
    }

    #[test]
    fn dispatch_on_topology() {
        assert!(build(ConstantPotential::default().into()).unwrap().is_constant());
        assert!(build(StepPotential::default().into()).unwrap().is_step());
        assert!(build(BarrierPotential::single().into()).unwrap().is_single_barrier());
        assert!(build(BarrierPotential::double().into()).unwrap().is_double_barrier());
    }

    #[test]
    fn three_barriers_are_unsupported() {
        let p = BarrierPotential::new(
            &[(-2.0, 0.5), (0.0, 0.5), (2.0, 0.5)], 0.0, 0.5).unwrap();
        assert!(matches!(build(p.into()), Err(QError::UnsupportedTopology(_))));
    }

    #[test]
    fn piecewise_is_unsupported() {
        let regions = RegionList::from_boundaries(
            &[-4.0, -1.0, 1.0, 4.0], &[0.0, 0.2, 0.1], 0.1).unwrap();
        let p = PiecewisePotential::new(regions);
        assert!(matches!(
            build(p.into()),
            Err(QError::UnsupportedPotentialType(_))
        ));
    }

    #[test]
    fn observing_solver_follows_inputs() {
        let te = Rc::new(TotalEnergy::new(0.3));
        let pe = Rc::new(PotentialEnergy::new(BarrierPotential::single()));
        let solver = create_solver(&te, &pe, Direction::LeftToRight).unwrap();
        let t0 = solver.transmission();
        te.set_energy(0.45).unwrap();
        assert!(solver.transmission() > t0);
        assert_eq!(solver.solver().energy(), 0.45);
        pe.set_barrier_width(0, 1.5).unwrap();
        let fresh = Solver::for_potential(0.45, &pe.get(), Direction::LeftToRight)
            .unwrap();
        assert_eq!(*solver.solver(), fresh);
    }

    #[test]
    fn dropping_unsubscribes() {
        let te = Rc::new(TotalEnergy::new(0.3));
        let pe = Rc::new(PotentialEnergy::new(StepPotential::default()));
        let solver = create_solver(&te, &pe, Direction::LeftToRight).unwrap();
        assert_eq!(te.observer_count(), 1);
        assert_eq!(pe.observer_count(), 1);
        drop(solver);
        assert_eq!(te.observer_count(), 0);
        assert_eq!(pe.observer_count(), 0);
        te.set_energy(0.9).unwrap();
    }

    #[test]
    fn energy_round_trip_is_bit_identical() {
        let te = Rc::new(TotalEnergy::new(0.22));
        let pe = Rc::new(PotentialEnergy::new(BarrierPotential::double()));
        let solver = create_solver(&te, &pe, Direction::LeftToRight).unwrap();
        let before = solver.snapshot();
        te.set_energy(0.37).unwrap();
        assert_ne!(solver.snapshot(), before);
        te.set_energy(0.22).unwrap();
        assert_eq!(solver.snapshot(), before);
    }
}
