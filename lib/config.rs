//! JSON configuration for a tunneling simulation.
//!
//! Every field is optional; omitted fields take the values of
//! [`SimulationConfig::default`]. An example double-barrier configuration:
//!
//! ```json
//! {
//!   "total_energy": 0.25,
//!   "direction": "left_to_right",
//!   "min_region_width": 0.1,
//!   "domain": [-4.0, 4.0],
//!   "potential": {
//!     "type": "barrier",
//!     "floor": 0.0,
//!     "barriers": [
//!       { "position": -1.0, "width": 0.5, "height": 0.5 },
//!       { "position": 0.5, "width": 0.5, "height": 0.5 }
//!     ]
//!   },
//!   "spectrum": { "min": 0.01, "max": 1.0, "points": 1000 },
//!   "packet": { "center": -2.0, "width": 0.5, "grid_points": 1024 }
//! }
//! ```

use std::path::Path;
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    energy::{ DEFAULT_TOTAL_ENERGY, TotalEnergy },
    error::{ QError, QResult },
    packet::{ DEFAULT_GRID_POINTS, PacketParams, WavePacket },
    potential::{
        BarrierPotential,
        ConstantPotential,
        DEFAULT_BARRIER_ENERGY,
        DEFAULT_BARRIER_WIDTH,
        DEFAULT_DOMAIN,
        PiecewisePotential,
        Potential,
        StepPotential,
    },
    region::RegionList,
    solver::Direction,
};

/// One rectangular barrier.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarrierConfig {
    /// Left edge (nm).
    pub position: f64,
    /// Width (nm).
    pub width: f64,
    /// Potential energy inside the barrier (eV).
    pub height: f64,
}

/// Shape of the potential.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PotentialConfig {
    Constant {
        energy: f64,
    },
    Step {
        position: f64,
        left: f64,
        right: f64,
    },
    Barrier {
        floor: f64,
        barriers: Vec<BarrierConfig>,
    },
    /// Any partition of the domain; only wave packets can run on these.
    Piecewise {
        /// Interior boundaries (nm); the domain edges are implied.
        boundaries: Vec<f64>,
        energies: Vec<f64>,
    },
}

impl Default for PotentialConfig {
    fn default() -> Self {
        Self::Barrier {
            floor: 0.0,
            barriers: vec![BarrierConfig {
                position: 0.0,
                width: DEFAULT_BARRIER_WIDTH,
                height: DEFAULT_BARRIER_ENERGY,
            }],
        }
    }
}

/// Energy range sampled by transmission spectra.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl Default for SpectrumConfig {
    fn default() -> Self { Self { min: 0.01, max: 1.0, points: 1000 } }
}

impl SpectrumConfig {
    /// Sampled energies (eV).
    pub fn energies(&self) -> QResult<nd::Array1<f64>> {
        if !(self.min < self.max) || self.points < 2 {
            return Err(QError::InvalidArgument(format!(
                "bad spectrum range [{}, {}] with {} points",
                self.min, self.max, self.points,
            )));
        }
        Ok(nd::Array1::linspace(self.min, self.max, self.points))
    }
}

/// Wave packet settings. A packet is launched at the total energy in the
/// configured direction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    pub center: f64,
    pub width: f64,
    pub grid_points: usize,
}

impl Default for PacketConfig {
    fn default() -> Self {
        let params = PacketParams::default();
        Self {
            center: params.center,
            width: params.width,
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total energy (eV).
    pub total_energy: f64,
    pub direction: Direction,
    /// Minimum width of any region (nm).
    pub min_region_width: f64,
    /// Domain edges (nm).
    pub domain: (f64, f64),
    pub potential: PotentialConfig,
    pub spectrum: SpectrumConfig,
    pub packet: Option<PacketConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_energy: DEFAULT_TOTAL_ENERGY,
            direction: Direction::LeftToRight,
            min_region_width: RegionList::DEFAULT_MIN_WIDTH,
            domain: DEFAULT_DOMAIN,
            potential: PotentialConfig::default(),
            spectrum: SpectrumConfig::default(),
            packet: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(s: &str) -> QResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P>(path: P) -> QResult<Self>
    where P: AsRef<Path>
    {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> QResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn regions(&self, interior: &[f64], energies: &[f64]) -> QResult<RegionList> {
        let boundaries: Vec<f64>
            = std::iter::once(self.domain.0)
            .chain(interior.iter().copied())
            .chain(std::iter::once(self.domain.1))
            .collect();
        RegionList::from_boundaries(&boundaries, energies, self.min_region_width)
    }

    /// Build the configured potential.
    pub fn build_potential(&self) -> QResult<Potential> {
        match &self.potential {
            PotentialConfig::Constant { energy } => {
                let regions = self.regions(&[], &[*energy])?;
                Ok(ConstantPotential::from_regions(regions)?.into())
            },
            PotentialConfig::Step { position, left, right } => {
                let regions = self.regions(&[*position], &[*left, *right])?;
                Ok(StepPotential::from_regions(regions)?.into())
            },
            PotentialConfig::Barrier { floor, barriers } => {
                if barriers.is_empty() {
                    return Err(QError::InvalidArgument(
                        "a barrier potential needs at least one barrier".into()
                    ));
                }
                let interior: Vec<f64>
                    = barriers.iter()
                    .flat_map(|b| [b.position, b.position + b.width])
                    .collect();
                let energies: Vec<f64>
                    = std::iter::once(*floor)
                    .chain(barriers.iter().flat_map(|b| [b.height, *floor]))
                    .collect();
                let regions = self.regions(&interior, &energies)?;
                Ok(BarrierPotential::from_regions(regions)?.into())
            },
            PotentialConfig::Piecewise { boundaries, energies } => {
                let regions = self.regions(boundaries, energies)?;
                Ok(PiecewisePotential::new(regions).into())
            },
        }
    }

    pub fn build_total_energy(&self) -> QResult<TotalEnergy> {
        let te = TotalEnergy::default();
        te.set_energy(self.total_energy)?;
        Ok(te)
    }

    /// Packet parameters, if a packet is configured.
    pub fn packet_params(&self) -> Option<PacketParams> {
        self.packet.map(|p| {
            PacketParams {
                center: p.center,
                width: p.width,
                energy: self.total_energy,
                direction: self.direction,
            }
        })
    }

    /// Build the configured packet over `potential`, if any.
    pub fn build_packet(&self, potential: &Potential)
        -> QResult<Option<WavePacket>>
    {
        self.packet.zip(self.packet_params())
            .map(|(p, params)| WavePacket::with_grid(potential, params, p.grid_points))
            .transpose()
    }
}
