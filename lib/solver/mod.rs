//! Closed-form plane-wave solutions for piecewise-constant potentials.
//!
//! In every region `i` the energy eigenstate has the form
//! ```text
//! ψ_i(x, t) = [A_i exp(i k_i (x - r_i)) + B_i exp(-i k_i (x - r_i))] exp(-i E t / ħ)
//! k_i = √(2 m (E - V_i)) / ħ
//! ```
//! where `r_i` is the region's reference point: its left boundary, except for
//! the leftmost region, which is referred to its right boundary. `k_i` is taken
//! as the principal complex root, so it is purely imaginary in classically
//! forbidden regions and `exp(i k_i x)` decays to the right there.
//!
//! Solvers compute `k_i` and `(A_i, B_i)` once per change of their inputs and
//! cache them in a [`WaveFunction`]; evaluation is then a lookup and two
//! exponentials. See [`docs`][crate::docs#transfer-matrices] for how the
//! coefficients are found.

use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    Arr1,
    complex::C64,
    error::{ QError, QResult },
    potential::{ Potential, Topology },
    region::Region,
    units::HBAR,
};

pub mod transfer;
pub mod constant;
pub mod step;
pub mod barrier;
pub mod observing;

pub use transfer::DEGENERATE_ENERGY_OFFSET;
pub use constant::ConstantSolver;
pub use step::StepSolver;
pub use barrier::{ BarrierSolver, SingleBarrierSolver, DoubleBarrierSolver };
pub use observing::ObservingSolver;

const ZERO: C64 = C64::new(0.0, 0.0);

/// Side of the potential the incident wave comes from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Incident from the left, travelling right.
    #[default]
    LeftToRight,
    /// Incident from the right, travelling left.
    RightToLeft,
}

impl Direction {
    /// Return `true` if `self` is `LeftToRight`.
    pub fn is_left_to_right(&self) -> bool {
        matches!(self, Self::LeftToRight)
    }

    /// Return `true` if `self` is `RightToLeft`.
    pub fn is_right_to_left(&self) -> bool {
        matches!(self, Self::RightToLeft)
    }
}

/// Selects which part of the wave function to evaluate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WaveComponent {
    /// The full wave function.
    #[default]
    Sum,
    /// The part travelling (or decaying) in the direction of incidence.
    Incident,
    /// The counter-propagating part.
    Reflected,
}

/// Amplitudes of the right- (`a`) and left-going (`b`) waves in one region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients {
    pub a: C64,
    pub b: C64,
}

impl Coefficients {
    pub const ZERO: Self = Self { a: ZERO, b: ZERO };

    pub fn new(a: C64, b: C64) -> Self { Self { a, b } }
}

/// Memoized solution for one total energy over one partition.
///
/// A `WaveFunction` is a pure function of the energy, the regions and the
/// direction of incidence: building it twice from the same inputs gives
/// bit-identical results.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveFunction {
    pub(crate) energy: f64,
    pub(crate) direction: Direction,
    pub(crate) regions: Vec<Region>,
    pub(crate) reference: Vec<f64>,
    pub(crate) k: Vec<C64>,
    pub(crate) coeffs: Vec<Coefficients>,
    pub(crate) transmission: f64,
    pub(crate) reflection: f64,
}

impl WaveFunction {
    /// The identically zero wave function, used when the incident side is
    /// classically forbidden.
    pub(crate) fn zero(
        energy: f64,
        direction: Direction,
        regions: Vec<Region>,
        reference: Vec<f64>,
        k: Vec<C64>,
    ) -> Self
    {
        let n = regions.len();
        Self {
            energy,
            direction,
            regions,
            reference,
            k,
            coeffs: vec![Coefficients::ZERO; n],
            transmission: 0.0,
            reflection: 0.0,
        }
    }

    /// Total energy the solution was computed for (eV).
    pub fn energy(&self) -> f64 { self.energy }

    pub fn direction(&self) -> Direction { self.direction }

    /// Per-region wave numbers (nm⁻¹).
    pub fn wave_numbers(&self) -> &[C64] { &self.k }

    /// Per-region amplitudes.
    pub fn coefficients(&self) -> &[Coefficients] { &self.coeffs }

    /// Per-region reference points (nm).
    pub fn reference_points(&self) -> &[f64] { &self.reference }

    /// Transmitted fraction of the incident probability current.
    pub fn transmission(&self) -> f64 { self.transmission }

    /// Reflected fraction of the incident probability current.
    pub fn reflection(&self) -> f64 { self.reflection }

    /// Index of the region that `x` is evaluated in.
    ///
    /// Points left of the domain belong to the first region and points on or
    /// right of its right edge to the last one.
    pub fn region_index_at(&self, x: f64) -> usize {
        let last = self.regions.len() - 1;
        if x < self.regions[0].start { return 0; }
        self.regions.iter()
            .position(|r| r.contains(x))
            .unwrap_or(last)
    }

    /// Evaluate `ψ(x, t)`.
    pub fn solve(&self, x: f64, t: f64) -> C64 {
        self.spatial(x, WaveComponent::Sum) * self.phase(t)
    }

    /// Evaluate one [component][WaveComponent] of `ψ(x, t)`.
    pub fn solve_component(&self, x: f64, t: f64, component: WaveComponent)
        -> C64
    {
        self.spatial(x, component) * self.phase(t)
    }

    /// Evaluate `ψ(x, t)` over an array of positions.
    pub fn solve_range<S>(&self, x: &Arr1<S>, t: f64) -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        self.solve_range_component(x, t, WaveComponent::Sum)
    }

    /// Evaluate one [component][WaveComponent] of `ψ(x, t)` over an array of
    /// positions.
    pub fn solve_range_component<S>(
        &self,
        x: &Arr1<S>,
        t: f64,
        component: WaveComponent,
    ) -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        let phase = self.phase(t);
        x.mapv(|xk| self.spatial(xk, component) * phase)
    }

    fn phase(&self, t: f64) -> C64 { C64::cis(-self.energy * t / HBAR) }

    fn spatial(&self, x: f64, component: WaveComponent) -> C64 {
        let i = self.region_index_at(x);
        let Coefficients { a, b } = self.coeffs[i];
        let ikx = C64::i() * self.k[i] * (x - self.reference[i]);
        // zero amplitudes stay zero even where the exponential overflows
        let right = if a == ZERO { a } else { a * ikx.exp() };
        let left = if b == ZERO { b } else { b * (-ikx).exp() };
        match (component, self.direction) {
            (WaveComponent::Sum, _) => right + left,
            (WaveComponent::Incident, Direction::LeftToRight) => right,
            (WaveComponent::Incident, Direction::RightToLeft) => left,
            (WaveComponent::Reflected, Direction::LeftToRight) => left,
            (WaveComponent::Reflected, Direction::RightToLeft) => right,
        }
    }
}

pub(crate) fn check_topology(expected: Topology, potential: &Potential)
    -> QResult<()>
{
    let found = potential.topology();
    (found == expected).then_some(())
        .ok_or_else(|| {
            QError::UnsupportedTopology(
                format!("a {expected} solver cannot handle a {found} potential")
            )
        })
}

/// Common interface of the closed-form solvers.
///
/// Implementors only need to say which potential shape they handle and how
/// to recompute their [`WaveFunction`]; evaluation is shared.
pub trait PlaneWaveSolver {
    /// Shape of the potentials this solver handles.
    fn topology(&self) -> Topology;

    /// The cached solution.
    fn wave_function(&self) -> &WaveFunction;

    /// Recompute every wave number and amplitude for a new total energy or a
    /// changed potential.
    ///
    /// Fails with [`QError::UnsupportedTopology`][crate::error::QError::UnsupportedTopology]
    /// if `potential` does not have the solver's topology, in which case the
    /// cache is left as it was.
    fn update_coefficients(&mut self, energy: f64, potential: &Potential)
        -> QResult<()>;

    fn solve(&self, x: f64, t: f64) -> C64 {
        self.wave_function().solve(x, t)
    }

    fn solve_component(&self, x: f64, t: f64, component: WaveComponent) -> C64 {
        self.wave_function().solve_component(x, t, component)
    }

    fn solve_range<S>(&self, x: &Arr1<S>, t: f64) -> nd::Array1<C64>
    where
        S: nd::Data<Elem = f64>,
        Self: Sized,
    {
        self.wave_function().solve_range(x, t)
    }

    fn solve_range_component<S>(
        &self,
        x: &Arr1<S>,
        t: f64,
        component: WaveComponent,
    ) -> nd::Array1<C64>
    where
        S: nd::Data<Elem = f64>,
        Self: Sized,
    {
        self.wave_function().solve_range_component(x, t, component)
    }

    fn transmission(&self) -> f64 { self.wave_function().transmission() }

    fn reflection(&self) -> f64 { self.wave_function().reflection() }

    fn coefficients(&self) -> &[Coefficients] {
        self.wave_function().coefficients()
    }

    fn wave_numbers(&self) -> &[C64] { self.wave_function().wave_numbers() }

    fn energy(&self) -> f64 { self.wave_function().energy() }

    fn direction(&self) -> Direction { self.wave_function().direction() }
}

/// Any of the closed-form solvers.
#[derive(Clone, Debug, PartialEq)]
pub enum Solver {
    Constant(ConstantSolver),
    Step(StepSolver),
    SingleBarrier(SingleBarrierSolver),
    DoubleBarrier(DoubleBarrierSolver),
}

impl Solver {
    /// Return `true` if `self` is `Constant`.
    pub fn is_constant(&self) -> bool { matches!(self, Self::Constant(_)) }

    /// Return `true` if `self` is `Step`.
    pub fn is_step(&self) -> bool { matches!(self, Self::Step(_)) }

    /// Return `true` if `self` is `SingleBarrier`.
    pub fn is_single_barrier(&self) -> bool {
        matches!(self, Self::SingleBarrier(_))
    }

    /// Return `true` if `self` is `DoubleBarrier`.
    pub fn is_double_barrier(&self) -> bool {
        matches!(self, Self::DoubleBarrier(_))
    }

    fn inner(&self) -> &dyn PlaneWaveSolver {
        match self {
            Self::Constant(s) => s,
            Self::Step(s) => s,
            Self::SingleBarrier(s) => s,
            Self::DoubleBarrier(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PlaneWaveSolver {
        match self {
            Self::Constant(s) => s,
            Self::Step(s) => s,
            Self::SingleBarrier(s) => s,
            Self::DoubleBarrier(s) => s,
        }
    }
}

impl PlaneWaveSolver for Solver {
    fn topology(&self) -> Topology { self.inner().topology() }

    fn wave_function(&self) -> &WaveFunction { self.inner().wave_function() }

    fn update_coefficients(&mut self, energy: f64, potential: &Potential)
        -> QResult<()>
    {
        self.inner_mut().update_coefficients(energy, potential)
    }
}

impl From<ConstantSolver> for Solver {
    fn from(s: ConstantSolver) -> Self { Self::Constant(s) }
}

impl From<StepSolver> for Solver {
    fn from(s: StepSolver) -> Self { Self::Step(s) }
}

impl From<SingleBarrierSolver> for Solver {
    fn from(s: SingleBarrierSolver) -> Self { Self::SingleBarrier(s) }
}

impl From<DoubleBarrierSolver> for Solver {
    fn from(s: DoubleBarrierSolver) -> Self { Self::DoubleBarrier(s) }
}
