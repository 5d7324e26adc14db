//! Scattering from a single potential step.

use crate::{
    complex::{ C64, checked_div },
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
    transfer::{
        flux_ratio,
        matching_energy,
        outer_regions,
        reference_points,
        wave_numbers,
    },
};

/// Solver for a [`StepPotential`][crate::potential::StepPotential].
///
/// Both regions are referred to the step, where the amplitudes follow in
/// closed form:
/// ```text
/// r = (k_in - k_out) / (k_in + k_out)
/// t = 2 k_in / (k_in + k_out)
/// ```
/// Below the step, `k_out` is the decaying root and the transmitted wave is
/// evanescent.
#[derive(Clone, Debug, PartialEq)]
pub struct StepSolver {
    wf: WaveFunction,
}

impl StepSolver {
    pub fn new(energy: f64, potential: &Potential, direction: Direction)
        -> QResult<Self>
    {
        check_topology(Topology::Step, potential)?;
        let wf = solve_step(energy, potential.regions().as_slice(), direction)?;
        Ok(Self { wf })
    }
}

fn solve_step(energy: f64, regions: &[Region], direction: Direction)
    -> QResult<WaveFunction>
{
    let e = matching_energy(energy, regions);
    let k = wave_numbers(e, regions);
    let reference = reference_points(regions);
    let (i_in, i_out) = outer_regions(2, direction);
    if e < regions[i_in].energy {
        return Ok(
            WaveFunction::zero(energy, direction, regions.to_vec(), reference, k)
        );
    }
    let (k_in, k_out) = (k[i_in], k[i_out]);
    let r = checked_div(k_in - k_out, k_in + k_out)?;
    let t = checked_div(2.0 * k_in, k_in + k_out)?;
    let one = C64::new(1.0, 0.0);
    let zero = C64::new(0.0, 0.0);
    let coeffs
        = match direction {
            Direction::LeftToRight => vec![
                Coefficients::new(one, r),
                Coefficients::new(t, zero),
            ],
            Direction::RightToLeft => vec![
                Coefficients::new(zero, t),
                Coefficients::new(r, one),
            ],
        };
    Ok(WaveFunction {
        energy,
        direction,
        regions: regions.to_vec(),
        reference,
        k,
        coeffs,
        transmission: flux_ratio(k_in, k_out) * t.norm_sqr(),
        reflection: r.norm_sqr(),
    })
}

impl PlaneWaveSolver for StepSolver {
    fn topology(&self) -> Topology { Topology::Step }

    fn wave_function(&self) -> &WaveFunction { &self.wf }

    fn update_coefficients(&mut self, energy: f64, potential: &Potential)
        -> QResult<()>
    {
        check_topology(Topology::Step, potential)?;
        self.wf = solve_step(
            energy, potential.regions().as_slice(), self.wf.direction)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        potential::StepPotential,
        solver::transfer::solve_chain,
    };
    use super::*;

    fn step() -> Potential { StepPotential::default().into() }

    #[test]
    fn flux_is_conserved() {
        let p = step();
        for direction in [Direction::LeftToRight, Direction::RightToLeft] {
            for &e in [0.3, 0.5, 0.51, 0.75, 1.0, 2.0, 10.0].iter() {
                let s = StepSolver::new(e, &p, direction).unwrap();
                let total = s.transmission() + s.reflection();
                if e >= 0.5 || direction.is_left_to_right() {
                    assert!((total - 1.0).abs() < 1e-9, "E = {e}: R + T = {total}");
                }
            }
        }
    }

    #[test]
    fn evanescent_side_decays() {
        let s = StepSolver::new(0.3, &step(), Direction::LeftToRight).unwrap();
        assert_eq!(s.transmission(), 0.0);
        let mut last = s.solve(0.0, 0.0).norm();
        assert!(last > 0.0);
        for j in 1..40 {
            let x = 0.1 * j as f64;
            let cur = s.solve(x, 0.0).norm();
            assert!(cur < last, "|ψ| grew at x = {x}");
            last = cur;
        }
    }

    #[test]
    fn closed_form_agrees_with_transfer_matrix() {
        let p = step();
        for direction in [Direction::LeftToRight, Direction::RightToLeft] {
            for &e in [0.2, 0.5, 0.9].iter() {
                let s = StepSolver::new(e, &p, direction).unwrap();
                let chained
                    = solve_chain(e, p.regions().as_slice(), direction).unwrap();
                let pairs = s.coefficients().iter().zip(chained.coefficients());
                for (c, d) in pairs {
                    assert!((c.a - d.a).norm() < 1e-9);
                    assert!((c.b - d.b).norm() < 1e-9);
                }
                assert!((s.transmission() - chained.transmission()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn reflection_is_total_below_the_step() {
        let s = StepSolver::new(0.25, &step(), Direction::LeftToRight).unwrap();
        assert!((s.reflection() - 1.0).abs() < 1e-12);
    }
}
