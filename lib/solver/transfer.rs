//! Transfer-matrix chaining across region boundaries.
//!
//! At the boundary `d` between regions `i` and `i + 1`, continuity of `ψ` and
//! `ψ'` gives
//! ```text
//! a_i + b_i = A_{i+1} + B_{i+1}
//! k_i (a_i - b_i) = k_{i+1} (A_{i+1} - B_{i+1})
//! ```
//! with `a_i = A_i exp(i k_i (d - r_i))` and `b_i = B_i exp(-i k_i (d - r_i))`,
//! so that `(A_{i+1}, B_{i+1}) = M_i (A_i, B_i)` with
//! ```text
//!        1 | (1 + ρ) e^{+iφ}   (1 - ρ) e^{-iφ} |
//! M_i = ---|                                    |,   ρ = k_i / k_{i+1},  φ = k_i (d - r_i)
//!        2 | (1 - ρ) e^{+iφ}   (1 + ρ) e^{-iφ} |
//! ```
//! The product `M = M_{n-2} ⋯ M_0` relates the two outer regions, where one
//! amplitude is fixed by the incident wave and the other by the absence of a
//! wave coming in from infinity.

use ndarray as nd;
use crate::{
    Arr2,
    complex::{ C64, checked_div, checked_recip, wave_number },
    error::QResult,
    region::Region,
    units::MASS_ELECTRON,
};
use super::{ Coefficients, Direction, WaveFunction };

/// Amount (eV) added to the total energy when it coincides exactly with the
/// potential energy of a region, where `k = 0` would make boundary matching
/// singular.
pub const DEGENERATE_ENERGY_OFFSET: f64 = 1e-9;

/// Total energy to match boundaries with.
pub fn matching_energy(energy: f64, regions: &[Region]) -> f64 {
    if regions.iter().any(|r| r.energy == energy) {
        energy + DEGENERATE_ENERGY_OFFSET
    } else {
        energy
    }
}

/// Region reference points: left boundaries, except for the leftmost region.
pub fn reference_points(regions: &[Region]) -> Vec<f64> {
    regions.iter().enumerate()
        .map(|(i, r)| if i == 0 { r.end } else { r.start })
        .collect()
}

/// Per-region electron wave numbers at total energy `energy`.
pub fn wave_numbers(energy: f64, regions: &[Region]) -> Vec<C64> {
    regions.iter()
        .map(|r| wave_number(MASS_ELECTRON, energy, r.energy))
        .collect()
}

/// Indices of the incident and outgoing regions.
pub(crate) fn outer_regions(n: usize, direction: Direction) -> (usize, usize) {
    match direction {
        Direction::LeftToRight => (0, n - 1),
        Direction::RightToLeft => (n - 1, 0),
    }
}

/// Ratio of outgoing to incident probability current per unit squared
/// amplitude; zero if the outgoing region is classically forbidden.
pub(crate) fn flux_ratio(k_in: C64, k_out: C64) -> f64 {
    if k_out.re == 0.0 { 0.0 } else { (k_out / k_in).re.max(0.0) }
}

/// Matrix carrying `(A_i, B_i)` to `(A_{i+1}, B_{i+1})` for a boundary a
/// distance `dist` right of region `i`'s reference point.
pub fn boundary_matrix(k_left: C64, k_right: C64, dist: f64)
    -> QResult<nd::Array2<C64>>
{
    let rho = checked_div(k_left, k_right)?;
    let phi = C64::i() * k_left * dist;
    let (p, q) = (phi.exp(), (-phi).exp());
    Ok(nd::array![
        [0.5 * (1.0 + rho) * p, 0.5 * (1.0 - rho) * q],
        [0.5 * (1.0 - rho) * p, 0.5 * (1.0 + rho) * q],
    ])
}

fn boundary_matrices(regions: &[Region], k: &[C64], reference: &[f64])
    -> QResult<Vec<nd::Array2<C64>>>
{
    (0..regions.len() - 1)
        .map(|i| boundary_matrix(k[i], k[i + 1], regions[i].end - reference[i]))
        .collect()
}

fn chain<S>(steps: &[Arr2<S>]) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    steps.iter()
        .fold(nd::Array2::eye(2), |acc, m| m.dot(&acc))
}

/// Propagate the amplitudes of the leftmost region through every boundary.
fn propagate<S>(steps: &[Arr2<S>], first: Coefficients) -> Vec<Coefficients>
where S: nd::Data<Elem = C64>
{
    let mut coeffs: Vec<Coefficients> = Vec::with_capacity(steps.len() + 1);
    coeffs.push(first);
    let mut v: nd::Array1<C64> = nd::array![first.a, first.b];
    for m in steps.iter() {
        v = m.dot(&v);
        coeffs.push(Coefficients::new(v[0], v[1]));
    }
    coeffs
}

/// Solve for every region's amplitudes with a unit-amplitude wave incident
/// from `direction`.
///
/// If the incident region is classically forbidden there is no incident wave
/// and the zero solution is returned.
pub fn solve_chain(energy: f64, regions: &[Region], direction: Direction)
    -> QResult<WaveFunction>
{
    let e = matching_energy(energy, regions);
    let k = wave_numbers(e, regions);
    let reference = reference_points(regions);
    let (i_in, i_out) = outer_regions(regions.len(), direction);
    if e < regions[i_in].energy {
        log::trace!("incident region {i_in} is forbidden at E = {energy}");
        return Ok(
            WaveFunction::zero(energy, direction, regions.to_vec(), reference, k)
        );
    }

    let steps = boundary_matrices(regions, &k, &reference)?;
    let m = chain(&steps);
    let one = C64::new(1.0, 0.0);
    let zero = C64::new(0.0, 0.0);
    let (first, r, t)
        = match direction {
            // (t, 0) = M (1, r)
            Direction::LeftToRight => {
                let r = -checked_div(m[[1, 0]], m[[1, 1]])?;
                let t = m[[0, 0]] + m[[0, 1]] * r;
                (Coefficients::new(one, r), r, t)
            },
            // (r, 1) = M (0, t)
            Direction::RightToLeft => {
                let t = checked_recip(m[[1, 1]])?;
                let r = m[[0, 1]] * t;
                (Coefficients::new(zero, t), r, t)
            },
        };
    let coeffs = propagate(&steps, first);
    let transmission = flux_ratio(k[i_in], k[i_out]) * t.norm_sqr();
    let reflection = r.norm_sqr();
    Ok(WaveFunction {
        energy,
        direction,
        regions: regions.to_vec(),
        reference,
        k,
        coeffs,
        transmission,
        reflection,
    })
}
