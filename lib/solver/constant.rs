//! Plane waves over a single flat region.

use crate::{
    complex::C64,
    error::QResult,
    potential::{ Potential, Topology },
    region::Region,
};
use super::{
    Coefficients,
    Direction,
    PlaneWaveSolver,
    WaveFunction,
    check_topology,
    transfer::wave_numbers,
};

/// Solver for a [`ConstantPotential`][crate::potential::ConstantPotential].
///
/// For `E ≥ V₀` the solution is the unit plane wave `exp(±ikx) exp(-iEt/ħ)`,
/// travelling in the direction of incidence. For `E < V₀` it is identically
/// zero: with no boundary to decay away from, no evanescent solution is
/// produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantSolver {
    wf: WaveFunction,
}

impl ConstantSolver {
    pub fn new(energy: f64, potential: &Potential, direction: Direction)
        -> QResult<Self>
    {
        check_topology(Topology::Constant, potential)?;
        Ok(Self { wf: plane_wave(energy, potential.regions().as_slice(), direction) })
    }
}

fn plane_wave(energy: f64, regions: &[Region], direction: Direction)
    -> WaveFunction
{
    // k = 0 at E = V₀ is a valid uniform wave here, so no offset
    let k = wave_numbers(energy, regions);
    let reference = vec![0.0];
    if energy < regions[0].energy {
        return WaveFunction::zero(energy, direction, regions.to_vec(), reference, k);
    }
    let one = C64::new(1.0, 0.0);
    let zero = C64::new(0.0, 0.0);
    let c
        = match direction {
            Direction::LeftToRight => Coefficients::new(one, zero),
            Direction::RightToLeft => Coefficients::new(zero, one),
        };
    WaveFunction {
        energy,
        direction,
        regions: regions.to_vec(),
        reference,
        k,
        coeffs: vec![c],
        transmission: 1.0,
        reflection: 0.0,
    }
}

impl PlaneWaveSolver for ConstantSolver {
    fn topology(&self) -> Topology { Topology::Constant }

    fn wave_function(&self) -> &WaveFunction { &self.wf }

    fn update_coefficients(&mut self, energy: f64, potential: &Potential)
        -> QResult<()>
    {
        check_topology(Topology::Constant, potential)?;
        self.wf = plane_wave(energy, potential.regions().as_slice(), self.wf.direction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::QError,
        potential::{ ConstantPotential, StepPotential },
    };
    use super::*;

    fn flat(v: f64) -> Potential { ConstantPotential::new(v).unwrap().into() }

    #[test]
    fn unit_wave_at_origin() {
        let s = ConstantSolver::new(1.0, &flat(0.0), Direction::LeftToRight)
            .unwrap();
        assert_eq!(s.solve(0.0, 0.0), C64::new(1.0, 0.0));
    }

    #[test]
    fn forbidden_energy_gives_zero() {
        let s = ConstantSolver::new(0.2, &flat(0.5), Direction::LeftToRight)
            .unwrap();
        for &x in [-10.0, -4.0, 0.0, 3.9, 4.0, 12.0].iter() {
            for &t in [0.0, 1.0, 100.0].iter() {
                assert_eq!(s.solve(x, t), C64::new(0.0, 0.0));
            }
        }
        assert_eq!(s.transmission(), 0.0);
    }

    #[test]
    fn allowed_energy_has_unit_modulus() {
        for direction in [Direction::LeftToRight, Direction::RightToLeft] {
            for &e in [0.5, 0.50001, 2.0].iter() {
                let s = ConstantSolver::new(e, &flat(0.5), direction).unwrap();
                for &x in [-7.0, -1.3, 0.0, 2.2, 9.0].iter() {
                    assert!((s.solve(x, 3.3).norm() - 1.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn direction_sets_the_sign_of_k() {
        let p = flat(0.0);
        let l = ConstantSolver::new(1.0, &p, Direction::LeftToRight).unwrap();
        let r = ConstantSolver::new(1.0, &p, Direction::RightToLeft).unwrap();
        assert!((l.solve(0.7, 0.0) - r.solve(0.7, 0.0).conj()).norm() < 1e-12);
    }

    #[test]
    fn wrong_topology_is_rejected() {
        let mut s = ConstantSolver::new(1.0, &flat(0.0), Direction::LeftToRight)
            .unwrap();
        let before = s.clone();
        let step: Potential = StepPotential::default().into();
        assert!(matches!(
            s.update_coefficients(1.0, &step),
            Err(QError::UnsupportedTopology(_))
        ));
        assert_eq!(s, before);
    }
}
