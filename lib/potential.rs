//! Piecewise-constant potential energy profiles.
//!
//! Each kind of potential constrains the number and meaning of its regions:
//!
//! | kind                  | regions  | notes                                  |
//! |-----------------------|----------|----------------------------------------|
//! | [`ConstantPotential`] | 1        |                                        |
//! | [`StepPotential`]     | 2        | the step sits at the shared boundary   |
//! | [`BarrierPotential`]  | 2N + 1   | barrier `b` is region `2b + 1`         |
//! | [`PiecewisePotential`]| any      | no closed-form solver; packets only    |
//!
//! No operation changes the number of regions of a potential, so its
//! [`Topology`] is fixed at construction.

use ndarray as nd;
use crate::{
    Arr1,
    error::{ QError, QResult },
    region::{ Region, RegionList },
};

/// Default spatial domain (nm).
pub const DEFAULT_DOMAIN: (f64, f64) = (-4.0, 4.0);

/// Default height of steps and barriers (eV).
pub const DEFAULT_BARRIER_ENERGY: f64 = 0.5;

/// Default barrier width (nm).
pub const DEFAULT_BARRIER_WIDTH: f64 = 0.5;

/// The shape of a potential, as far as solver selection is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Topology {
    Constant,
    Step,
    /// Barrier potential with the given number of barriers.
    Barrier(usize),
    /// Arbitrary partition with the given number of regions.
    Piecewise(usize),
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Step => write!(f, "step"),
            Self::Barrier(n) => write!(f, "barrier ({n} barriers)"),
            Self::Piecewise(n) => write!(f, "piecewise ({n} regions)"),
        }
    }
}

/// A single region of constant potential.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantPotential {
    regions: RegionList,
}

impl ConstantPotential {
    /// Create a new constant potential over the [default
    /// domain][DEFAULT_DOMAIN].
    pub fn new(energy: f64) -> QResult<Self> {
        Self::with_domain(DEFAULT_DOMAIN, energy)
    }

    pub fn with_domain(domain: (f64, f64), energy: f64) -> QResult<Self> {
        let regions
            = RegionList::new(vec![Region::new(domain.0, domain.1, energy)])?;
        Ok(Self { regions })
    }

    /// Wrap an existing single-region list.
    pub fn from_regions(regions: RegionList) -> QResult<Self> {
        check_count(&regions, |n| n == 1, "constant")?;
        Ok(Self { regions })
    }

    pub fn energy(&self) -> f64 { self.regions.as_slice()[0].energy }
}

impl Default for ConstantPotential {
    fn default() -> Self {
        Self::new(0.0).expect("default constant potential is valid")
    }
}

/// Two regions separated by a step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepPotential {
    regions: RegionList,
}

impl StepPotential {
    /// Create a new step over the [default domain][DEFAULT_DOMAIN].
    pub fn new(position: f64, left: f64, right: f64) -> QResult<Self> {
        Self::with_domain(DEFAULT_DOMAIN, position, left, right)
    }

    pub fn with_domain(
        domain: (f64, f64),
        position: f64,
        left: f64,
        right: f64,
    ) -> QResult<Self>
    {
        let regions = RegionList::from_boundaries(
            &[domain.0, position, domain.1],
            &[left, right],
            RegionList::DEFAULT_MIN_WIDTH,
        )?;
        Ok(Self { regions })
    }

    /// Wrap an existing two-region list.
    pub fn from_regions(regions: RegionList) -> QResult<Self> {
        check_count(&regions, |n| n == 2, "step")?;
        Ok(Self { regions })
    }

    pub fn step_position(&self) -> f64 { self.regions.as_slice()[1].start }

    /// Move the step.
    ///
    /// Fails with [`QError::InvalidArgument`] if `x` lies on or outside either
    /// edge of the domain, and with [`QError::InvalidRegionBounds`] if either
    /// region would become narrower than the minimum region width.
    pub fn set_step_position(&mut self, x: f64) -> QResult<()> {
        let (a, b) = (self.regions.domain_start(), self.regions.domain_end());
        if !(a < x && x < b) {
            return Err(QError::InvalidArgument(
                format!("step position {x} must lie strictly inside ({a}, {b})")
            ));
        }
        self.regions.set_boundary(0, x)
    }
}

impl Default for StepPotential {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_BARRIER_ENERGY)
            .expect("default step potential is valid")
    }
}

/// `N` barriers separated by (and surrounded by) flat regions, `2N + 1`
/// regions in total.
#[derive(Clone, Debug, PartialEq)]
pub struct BarrierPotential {
    regions: RegionList,
}

impl BarrierPotential {
    /// Create a new barrier potential over the [default
    /// domain][DEFAULT_DOMAIN] from `(position, width)` pairs, all barriers
    /// having the same height above a flat floor.
    pub fn new(barriers: &[(f64, f64)], floor: f64, height: f64)
        -> QResult<Self>
    {
        Self::with_domain(DEFAULT_DOMAIN, barriers, floor, height)
    }

    pub fn with_domain(
        domain: (f64, f64),
        barriers: &[(f64, f64)],
        floor: f64,
        height: f64,
    ) -> QResult<Self>
    {
        if barriers.is_empty() {
            return Err(QError::InvalidArgument(
                "a barrier potential needs at least one barrier".into()
            ));
        }
        let mut boundaries: Vec<f64> = Vec::with_capacity(2 * barriers.len() + 2);
        let mut energies: Vec<f64> = Vec::with_capacity(2 * barriers.len() + 1);
        boundaries.push(domain.0);
        energies.push(floor);
        for &(position, width) in barriers.iter() {
            boundaries.push(position);
            boundaries.push(position + width);
            energies.push(height);
            energies.push(floor);
        }
        boundaries.push(domain.1);
        let regions = RegionList::from_boundaries(
            &boundaries, &energies, RegionList::DEFAULT_MIN_WIDTH)?;
        Ok(Self { regions })
    }

    /// Wrap an existing list of `2N + 1` regions, `N ≥ 1`.
    pub fn from_regions(regions: RegionList) -> QResult<Self> {
        check_count(&regions, |n| n >= 3 && n % 2 == 1, "barrier")?;
        Ok(Self { regions })
    }

    /// The default single barrier: `[0, 0.5)` nm.
    pub fn single() -> Self {
        Self::new(&[(0.0, DEFAULT_BARRIER_WIDTH)], 0.0, DEFAULT_BARRIER_ENERGY)
            .expect("default single barrier is valid")
    }

    /// The default double barrier: `[-1, -0.5)` and `[0.5, 1)` nm, enclosing a
    /// 1 nm well.
    pub fn double() -> Self {
        Self::new(
            &[(-1.0, DEFAULT_BARRIER_WIDTH), (0.5, DEFAULT_BARRIER_WIDTH)],
            0.0,
            DEFAULT_BARRIER_ENERGY,
        )
        .expect("default double barrier is valid")
    }

    pub fn number_of_barriers(&self) -> usize { (self.regions.len() - 1) / 2 }

    /// Region index of barrier `b`.
    pub fn to_region_index(barrier: usize) -> usize { 2 * barrier + 1 }

    /// Barrier index of region `r`, if it is a barrier.
    pub fn to_barrier_index(region: usize) -> Option<usize> {
        Self::is_barrier(region).then(|| (region - 1) / 2)
    }

    pub fn is_barrier(region: usize) -> bool { region % 2 == 1 }

    fn barrier(&self, barrier: usize) -> QResult<Region> {
        QError::check_index(barrier, self.number_of_barriers(), "barrier")?;
        Ok(self.regions.as_slice()[Self::to_region_index(barrier)])
    }

    /// Left edge of barrier `b`.
    pub fn barrier_position(&self, barrier: usize) -> QResult<f64> {
        self.barrier(barrier).map(|r| r.start)
    }

    pub fn barrier_width(&self, barrier: usize) -> QResult<f64> {
        self.barrier(barrier).map(|r| r.width())
    }

    pub fn barrier_energy(&self, barrier: usize) -> QResult<f64> {
        self.barrier(barrier).map(|r| r.energy)
    }

    /// Move barrier `b` so that it starts at `x`, keeping its width.
    pub fn set_barrier_position(&mut self, barrier: usize, x: f64)
        -> QResult<()>
    {
        let r = self.barrier(barrier)?;
        self.regions.set_region(
            Self::to_region_index(barrier), x, x + r.width(), r.energy)
    }

    /// Resize barrier `b`, keeping its left edge.
    pub fn set_barrier_width(&mut self, barrier: usize, width: f64)
        -> QResult<()>
    {
        let r = self.barrier(barrier)?;
        self.regions.set_region(
            Self::to_region_index(barrier), r.start, r.start + width, r.energy)
    }
}

fn check_count<F>(regions: &RegionList, ok: F, kind: &str) -> QResult<()>
where F: FnOnce(usize) -> bool
{
    let n = regions.len();
    ok(n).then_some(())
        .ok_or_else(|| {
            QError::InvalidArgument(
                format!("{n} regions cannot form a {kind} potential")
            )
        })
}

/// An arbitrary partition, typically read from a configuration file.
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewisePotential {
    regions: RegionList,
}

impl PiecewisePotential {
    pub fn new(regions: RegionList) -> Self { Self { regions } }
}

/// Any potential energy profile.
#[derive(Clone, Debug, PartialEq)]
pub enum Potential {
    Constant(ConstantPotential),
    Step(StepPotential),
    Barrier(BarrierPotential),
    Piecewise(PiecewisePotential),
}

impl From<ConstantPotential> for Potential {
    fn from(p: ConstantPotential) -> Self { Self::Constant(p) }
}

impl From<StepPotential> for Potential {
    fn from(p: StepPotential) -> Self { Self::Step(p) }
}

impl From<BarrierPotential> for Potential {
    fn from(p: BarrierPotential) -> Self { Self::Barrier(p) }
}

impl From<PiecewisePotential> for Potential {
    fn from(p: PiecewisePotential) -> Self { Self::Piecewise(p) }
}

impl Potential {
    pub fn regions(&self) -> &RegionList {
        match self {
            Self::Constant(p) => &p.regions,
            Self::Step(p) => &p.regions,
            Self::Barrier(p) => &p.regions,
            Self::Piecewise(p) => &p.regions,
        }
    }

    fn regions_mut(&mut self) -> &mut RegionList {
        match self {
            Self::Constant(p) => &mut p.regions,
            Self::Step(p) => &mut p.regions,
            Self::Barrier(p) => &mut p.regions,
            Self::Piecewise(p) => &mut p.regions,
        }
    }

    pub fn topology(&self) -> Topology {
        match self {
            Self::Constant(_) => Topology::Constant,
            Self::Step(_) => Topology::Step,
            Self::Barrier(p) => Topology::Barrier(p.number_of_barriers()),
            Self::Piecewise(p) => Topology::Piecewise(p.regions.len()),
        }
    }

    pub fn number_of_regions(&self) -> usize { self.regions().len() }

    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions().get(index)
    }

    /// Start of region `index`; NaN if there is no such region.
    pub fn start(&self, index: usize) -> f64 {
        self.region(index).map_or(f64::NAN, |r| r.start)
    }

    /// End of region `index`; NaN if there is no such region.
    pub fn end(&self, index: usize) -> f64 {
        self.region(index).map_or(f64::NAN, |r| r.end)
    }

    /// Width of region `index`; NaN if there is no such region.
    pub fn width(&self, index: usize) -> f64 {
        self.region(index).map_or(f64::NAN, |r| r.width())
    }

    /// Midpoint of region `index`; NaN if there is no such region.
    pub fn middle(&self, index: usize) -> f64 {
        self.region(index).map_or(f64::NAN, |r| r.middle())
    }

    /// Potential energy of region `index`; NaN if there is no such region.
    pub fn energy(&self, index: usize) -> f64 {
        self.region(index).map_or(f64::NAN, |r| r.energy)
    }

    /// Index of the region containing `x`; see [`RegionList::index_at`].
    pub fn region_index_at(&self, x: f64) -> usize {
        self.regions().index_at(x)
    }

    /// Potential energy at `x`.
    pub fn energy_at(&self, x: f64) -> f64 { self.regions().energy_at(x) }

    /// Sample the potential over a coordinate array.
    pub fn sample<S>(&self, x: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        x.mapv(|xk| self.energy_at(xk))
    }

    /// Smallest and largest region energies.
    pub fn energy_bounds(&self) -> (f64, f64) {
        self.regions().iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.energy), hi.max(r.energy))
            })
    }

    pub fn set_region(&mut self, index: usize, start: f64, end: f64, energy: f64)
        -> QResult<()>
    {
        self.regions_mut().set_region(index, start, end, energy)
    }

    pub fn set_energy(&mut self, index: usize, energy: f64) -> QResult<()> {
        self.regions_mut().set_energy(index, energy)
    }

    pub fn as_step_mut(&mut self) -> QResult<&mut StepPotential> {
        match self {
            Self::Step(p) => Ok(p),
            other => Err(QError::UnsupportedPotentialType(
                format!("expected a step potential; got {}", other.topology())
            )),
        }
    }

    pub fn as_barrier(&self) -> QResult<&BarrierPotential> {
        match self {
            Self::Barrier(p) => Ok(p),
            other => Err(QError::UnsupportedPotentialType(
                format!("expected a barrier potential; got {}", other.topology())
            )),
        }
    }

    pub fn as_barrier_mut(&mut self) -> QResult<&mut BarrierPotential> {
        match self {
            Self::Barrier(p) => Ok(p),
            other => Err(QError::UnsupportedPotentialType(
                format!("expected a barrier potential; got {}", other.topology())
            )),
        }
    }
}
