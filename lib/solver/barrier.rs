//! Tunneling through one or more rectangular barriers.

use crate::{
    error::QResult,
    potential::{ Potential, Topology },
};
use super::{
    Direction,
    PlaneWaveSolver,
    WaveFunction,
    check_topology,
    transfer::solve_chain,
};

/// Solver for a [`BarrierPotential`][crate::potential::BarrierPotential] with
/// exactly `N` barriers (`2N + 1` regions).
///
/// Coefficients come from the full transfer-matrix chain over `2N`
/// boundaries. For `N = 2` the chain reproduces resonant tunneling: at
/// energies near the quasi-bound levels of the well between the barriers the
/// transmission rises sharply toward 1.
#[derive(Clone, Debug, PartialEq)]
pub struct BarrierSolver<const N: usize> {
    wf: WaveFunction,
}

/// Solver for a single barrier (3 regions).
pub type SingleBarrierSolver = BarrierSolver<1>;

/// Solver for a double barrier (5 regions).
pub type DoubleBarrierSolver = BarrierSolver<2>;

impl<const N: usize> BarrierSolver<N> {
    pub fn new(energy: f64, potential: &Potential, direction: Direction)
        -> QResult<Self>
    {
        check_topology(Topology::Barrier(N), potential)?;
        let wf = solve_chain(energy, potential.regions().as_slice(), direction)?;
        Ok(Self { wf })
    }

    pub fn number_of_barriers(&self) -> usize { N }
}

impl<const N: usize> PlaneWaveSolver for BarrierSolver<N> {
    fn topology(&self) -> Topology { Topology::Barrier(N) }

    fn wave_function(&self) -> &WaveFunction { &self.wf }

    fn update_coefficients(&mut self, energy: f64, potential: &Potential)
        -> QResult<()>
    {
        check_topology(Topology::Barrier(N), potential)?;
        self.wf = solve_chain(
            energy, potential.regions().as_slice(), self.wf.direction)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::QError,
        potential::BarrierPotential,
    };
    use super::*;

    #[test]
    fn transmission_is_a_probability() {
        let single: Potential = BarrierPotential::single().into();
        let double: Potential = BarrierPotential::double().into();
        for j in 0..200 {
            let e = 0.005 + 0.01 * j as f64;
            let s = SingleBarrierSolver::new(e, &single, Direction::LeftToRight)
                .unwrap();
            let d = DoubleBarrierSolver::new(e, &double, Direction::LeftToRight)
                .unwrap();
            for (t, r) in [(s.transmission(), s.reflection()),
                           (d.transmission(), d.reflection())]
            {
                assert!((-1e-12..=1.0 + 1e-9).contains(&t), "E = {e}: T = {t}");
                assert!((t + r - 1.0).abs() < 1e-9, "E = {e}: R + T = {}", t + r);
            }
        }
    }

    #[test]
    fn thin_barrier_tunnels_more() {
        let thick: Potential
            = BarrierPotential::new(&[(0.0, 1.0)], 0.0, 0.5).unwrap().into();
        let thin: Potential
            = BarrierPotential::new(&[(0.0, 0.2)], 0.0, 0.5).unwrap().into();
        let t_thick
            = SingleBarrierSolver::new(0.3, &thick, Direction::LeftToRight)
            .unwrap().transmission();
        let t_thin
            = SingleBarrierSolver::new(0.3, &thin, Direction::LeftToRight)
            .unwrap().transmission();
        assert!(0.0 < t_thick && t_thick < t_thin && t_thin < 1.0);
    }

    #[test]
    fn transmission_does_not_depend_on_direction() {
        let p: Potential
            = BarrierPotential::new(&[(-1.3, 0.4), (0.6, 0.7)], 0.0, 0.6)
            .unwrap()
            .into();
        for &e in [0.1, 0.35, 0.6, 0.9].iter() {
            let l = DoubleBarrierSolver::new(e, &p, Direction::LeftToRight)
                .unwrap();
            let r = DoubleBarrierSolver::new(e, &p, Direction::RightToLeft)
                .unwrap();
            assert!((l.transmission() - r.transmission()).abs() < 1e-9);
        }
    }

    #[test]
    fn barrier_count_must_match() {
        let double: Potential = BarrierPotential::double().into();
        assert!(matches!(
            SingleBarrierSolver::new(0.3, &double, Direction::LeftToRight),
            Err(QError::UnsupportedTopology(_))
        ));
    }
}
