//! A complete tunneling simulation: a clock, a total energy, one potential of
//! each supported type, the solver for whichever is active, and optionally a
//! wave packet.
//!
//! Each potential type keeps its own [`PotentialEnergy`], so edits made to one
//! survive switching away from it and back. Switching types builds a new
//! [`ObservingSolver`]; the old one is dropped and stops listening.
//!
//! Any change to the total energy, the active potential, the potential type
//! or the direction sets the clock back to zero and relaunches the wave
//! packet at the total energy in the current direction. Changes made through
//! the shared energy handles are picked up by [`TunnelingModel::sync`], which
//! every tick runs first.

use std::{ cell::Cell, rc::Rc };
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    Arr1,
    complex::C64,
    config::SimulationConfig,
    energy::{ PotentialEnergy, TotalEnergy },
    error::{ QError, QResult },
    factory::create_solver,
    observe::{ Observer, Subscription },
    packet::{ DEFAULT_GRID_POINTS, PacketParams, WavePacket },
    potential::{
        BarrierPotential,
        ConstantPotential,
        DEFAULT_BARRIER_ENERGY,
        DEFAULT_DOMAIN,
        Potential,
        StepPotential,
        Topology,
    },
    region::RegionList,
    solver::{ Direction, ObservingSolver, WaveComponent },
};

/// Longest single split-step (fs) taken while ticking a wave packet.
pub const MAX_PACKET_STEP: f64 = 0.01;

/// Kinds of potential the model can switch between.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialType {
    Constant,
    Step,
    #[default]
    SingleBarrier,
    DoubleBarrier,
}

impl PotentialType {
    pub const ALL: [Self; 4]
        = [Self::Constant, Self::Step, Self::SingleBarrier, Self::DoubleBarrier];

    fn index(self) -> usize {
        match self {
            Self::Constant => 0,
            Self::Step => 1,
            Self::SingleBarrier => 2,
            Self::DoubleBarrier => 3,
        }
    }

    /// The potential type with a given topology, if the model supports it.
    pub fn from_topology(topology: Topology) -> QResult<Self> {
        match topology {
            Topology::Constant => Ok(Self::Constant),
            Topology::Step => Ok(Self::Step),
            Topology::Barrier(1) => Ok(Self::SingleBarrier),
            Topology::Barrier(2) => Ok(Self::DoubleBarrier),
            Topology::Barrier(n) => Err(QError::UnsupportedTopology(
                format!("no potential type with {n} barriers")
            )),
            t @ Topology::Piecewise(_) => Err(QError::UnsupportedPotentialType(
                format!("{t} potentials have no closed-form solver")
            )),
        }
    }

    /// The default potential of this type over `domain`.
    ///
    /// Features are placed relative to the domain: the step and the single
    /// barrier start at its middle, barriers are 1/16 of its width wide, and
    /// the double barrier encloses a well 1/8 of its width wide. Over
    /// [`DEFAULT_DOMAIN`] this gives the barriers of
    /// [`BarrierPotential::single`] and [`BarrierPotential::double`].
    pub fn default_potential(self, domain: (f64, f64), min_width: f64)
        -> QResult<Potential>
    {
        let (a, b) = domain;
        let len = b - a;
        let mid = (a + b) / 2.0;
        let w = len / 16.0;
        let v = DEFAULT_BARRIER_ENERGY;
        let regions = |boundaries: &[f64], energies: &[f64]| {
            RegionList::from_boundaries(boundaries, energies, min_width)
        };
        let p: Potential = match self {
            Self::Constant => {
                ConstantPotential::from_regions(regions(&[a, b], &[0.0])?)?.into()
            },
            Self::Step => {
                StepPotential::from_regions(
                    regions(&[a, mid, b], &[0.0, v])?)?.into()
            },
            Self::SingleBarrier => {
                BarrierPotential::from_regions(
                    regions(&[a, mid, mid + w, b], &[0.0, v, 0.0])?)?.into()
            },
            Self::DoubleBarrier => {
                let (x0, x1) = (mid - 2.0 * w, mid + w);
                BarrierPotential::from_regions(
                    regions(
                        &[a, x0, x0 + w, x1, x1 + w, b],
                        &[0.0, v, 0.0, v, 0.0],
                    )?
                )?.into()
            },
        };
        Ok(p)
    }
}

/// Raised by any change to an observed energy.
#[derive(Debug, Default)]
struct ChangeFlag(Cell<bool>);

impl Observer for ChangeFlag {
    fn changed(&self) { self.0.set(true); }
}

/// Top-level simulation state.
#[derive(Debug)]
pub struct TunnelingModel {
    time: f64,
    total_energy: Rc<TotalEnergy>,
    potentials: [Rc<PotentialEnergy>; 4],
    active: PotentialType,
    solver: ObservingSolver,
    packet: Option<WavePacket>,
    changed: Rc<ChangeFlag>,
    _total_sub: Subscription,
    potential_sub: Subscription,
}

impl TunnelingModel {
    /// Build a model over the default domain with every default setting.
    pub fn new() -> QResult<Self> {
        Self::build(
            Rc::new(TotalEnergy::default()),
            DEFAULT_DOMAIN,
            RegionList::DEFAULT_MIN_WIDTH,
            None,
            Direction::default(),
        )
    }

    /// Build a model from a configuration. The configured potential replaces
    /// the default of its type and becomes active; the other types get their
    /// [defaults][PotentialType::default_potential] over the configured
    /// domain, subject to the configured minimum region width.
    ///
    /// Fails with [`QError::UnsupportedPotentialType`] for piecewise
    /// potentials, which have no closed-form solver.
    pub fn from_config(config: &SimulationConfig) -> QResult<Self> {
        let potential = config.build_potential()?;
        let mut model = Self::build(
            Rc::new(config.build_total_energy()?),
            config.domain,
            config.min_region_width,
            Some(potential),
            config.direction,
        )?;
        if let Some(params) = config.packet_params() {
            let grid = config.packet.map(|p| p.grid_points)
                .unwrap_or(DEFAULT_GRID_POINTS);
            model.packet = Some(model.launch(params, grid)?);
        }
        Ok(model)
    }

    fn build(
        total_energy: Rc<TotalEnergy>,
        domain: (f64, f64),
        min_width: f64,
        initial: Option<Potential>,
        direction: Direction,
    ) -> QResult<Self>
    {
        let active = match &initial {
            Some(p) => PotentialType::from_topology(p.topology())?,
            None => PotentialType::default(),
        };
        let slot = |ty: PotentialType| -> QResult<Rc<PotentialEnergy>> {
            let p = match &initial {
                Some(p) if ty == active => p.clone(),
                _ => ty.default_potential(domain, min_width)?,
            };
            Ok(Rc::new(PotentialEnergy::new(p)))
        };
        let potentials = [
            slot(PotentialType::Constant)?,
            slot(PotentialType::Step)?,
            slot(PotentialType::SingleBarrier)?,
            slot(PotentialType::DoubleBarrier)?,
        ];
        let solver = create_solver(
            &total_energy, &potentials[active.index()], direction)?;
        let changed = Rc::new(ChangeFlag::default());
        let _total_sub = total_energy.subscribe(&changed);
        let potential_sub = potentials[active.index()].subscribe(&changed);
        Ok(Self {
            time: 0.0,
            total_energy,
            potentials,
            active,
            solver,
            packet: None,
            changed,
            _total_sub,
            potential_sub,
        })
    }

    /// Elapsed simulation time (fs). Zero while a change is waiting for
    /// [`Self::sync`].
    pub fn time(&self) -> f64 {
        if self.changed.0.get() { 0.0 } else { self.time }
    }

    /// Advance the clock by `dt` (fs), propagating the wave packet if there is
    /// one. Pending changes are applied first.
    pub fn tick(&mut self, dt: f64) -> QResult<()> {
        QError::check_epsilon(dt)?;
        self.sync()?;
        if let Some(packet) = self.packet.as_mut() {
            packet.evolve(dt, MAX_PACKET_STEP)?;
        }
        self.time += dt;
        Ok(())
    }

    /// Apply changes made to the total or active potential energy since the
    /// last call: the clock goes back to zero and the packet is relaunched
    /// over the edited potential.
    pub fn sync(&mut self) -> QResult<()> {
        if self.changed.0.get() { self.restart()?; }
        Ok(())
    }

    fn restart(&mut self) -> QResult<()> {
        self.changed.0.set(false);
        self.time = 0.0;
        let energy = self.total_energy.energy();
        let direction = self.solver.direction();
        if let Some(packet) = self.packet.as_mut() {
            packet.set_potential(&self.potentials[self.active.index()].get())?;
            packet.relaunch(energy, direction);
        }
        log::debug!("clock reset at E = {energy} eV, {direction:?}");
        Ok(())
    }

    /// Set the clock back to zero and restore the packet's initial state.
    pub fn reset_clock(&mut self) {
        self.time = 0.0;
        if let Some(packet) = self.packet.as_mut() {
            packet.reset();
        }
    }

    pub fn total_energy(&self) -> &Rc<TotalEnergy> { &self.total_energy }

    /// Set the total energy (eV), resetting the clock and relaunching the
    /// packet if it changed.
    pub fn set_total_energy(&mut self, energy: f64) -> QResult<()> {
        self.total_energy.set_energy(energy)?;
        self.sync()
    }

    /// The potential kept for a given type, active or not.
    pub fn potential_energy(&self, ty: PotentialType) -> &Rc<PotentialEnergy> {
        &self.potentials[ty.index()]
    }

    pub fn active_potential(&self) -> &Rc<PotentialEnergy> {
        self.potential_energy(self.active)
    }

    pub fn potential_type(&self) -> PotentialType { self.active }

    /// Make another potential type active, replacing the solver and resetting
    /// the clock.
    pub fn set_potential_type(&mut self, ty: PotentialType) -> QResult<()> {
        if ty == self.active { return Ok(()); }
        let direction = self.solver.direction();
        self.solver = create_solver(
            &self.total_energy, &self.potentials[ty.index()], direction)?;
        self.potential_sub = self.potentials[ty.index()].subscribe(&self.changed);
        log::debug!("switched potential type {:?} -> {ty:?}", self.active);
        self.active = ty;
        self.restart()
    }

    pub fn solver(&self) -> &ObservingSolver { &self.solver }

    pub fn direction(&self) -> Direction { self.solver.direction() }

    /// Change the direction of incidence of both the plane wave and the
    /// packet, resetting the clock.
    pub fn set_direction(&mut self, direction: Direction) -> QResult<()> {
        self.solver.set_direction(direction)?;
        self.restart()
    }

    /// Sample the plane wave at the current time.
    pub fn sample_wave<S>(&self, x: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        self.solver.solve_range(x, self.time())
    }

    /// Sample one component of the plane wave at the current time.
    pub fn sample_component<S>(&self, x: &Arr1<S>, component: WaveComponent)
        -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        self.solver.solve_range_component(x, self.time(), component)
    }

    pub fn packet(&self) -> Option<&WavePacket> { self.packet.as_ref() }

    pub fn packet_mut(&mut self) -> Option<&mut WavePacket> {
        self.packet.as_mut()
    }

    fn launch(&self, params: PacketParams, grid_points: usize)
        -> QResult<WavePacket>
    {
        let params = PacketParams {
            energy: self.total_energy.energy(),
            direction: self.direction(),
            ..params
        };
        WavePacket::with_grid(&self.active_potential().get(), params, grid_points)
    }

    /// Launch a new wave packet over the active potential, or remove the
    /// current one with `None`. The packet's energy and direction are taken
    /// from the model, not from `params`.
    pub fn set_packet(&mut self, params: Option<PacketParams>) -> QResult<()> {
        self.packet = params
            .map(|p| self.launch(p, DEFAULT_GRID_POINTS))
            .transpose()?;
        Ok(())
    }
}
