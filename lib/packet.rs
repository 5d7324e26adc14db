//! Gaussian wave packets propagated through a potential.
//!
//! The packet lives on a uniform grid spanning the potential's domain plus an
//! absorbing layer on either side, and is advanced with the symmetric
//! split-step Fourier method in [natural units][crate::units::Units], where
//! the TDSE reads
//! ```text
//! i ∂ψ/∂t = -∂²ψ/∂x² + V(x) ψ
//! ```
//! so that one step of length `dt` is
//! ```text
//! ψ ← exp(-i V dt / 2) F⁻¹ exp(-i k² dt) F exp(-i V dt / 2) ψ
//! ```
//! After every step the wave function is damped across each layer by a
//! `cos^(1/8)` mask falling from 1 at the domain edge to 0 at the grid edge.
//! What the mask removes is tallied per side and counted as having left the
//! domain on that side, so nothing wraps around the periodic grid and the
//! reflected and transmitted probabilities settle once the packet has gone.
//!
//! Grid positions, times and energies exposed by [`WavePacket`] are in nm, fs
//! and eV.

use std::f64::consts::{ FRAC_PI_2, TAU };
use ndarray as nd;
use crate::{
    complex::{ C64, wave_number },
    error::{ QError, QResult },
    potential::Potential,
    solver::Direction,
    units::Units,
    utils::{
        FftPair,
        cumulative_integral,
        fft_freq,
        periodic_integral,
        wf_norm,
        wf_renormalize,
    },
};

/// Default number of grid points.
pub const DEFAULT_GRID_POINTS: usize = 1024;

/// Width (nm) of the packet left behind by a position measurement.
pub const MEASURED_WIDTH: f64 = 0.1;

/// Width of the absorbing layer on each side of the domain, as a fraction of
/// the domain's width.
pub const ABSORBING_FRACTION: f64 = 0.5;

/// Initial shape of a Gaussian packet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PacketParams {
    /// Initial center (nm).
    pub center: f64,
    /// Standard deviation of `|ψ|²` (nm).
    pub width: f64,
    /// Mean total energy (eV).
    pub energy: f64,
    pub direction: Direction,
}

impl Default for PacketParams {
    fn default() -> Self {
        Self {
            center: -2.0,
            width: 0.5,
            energy: 0.3,
            direction: Direction::LeftToRight,
        }
    }
}

/// A wave packet sampled on a grid with absorbing edges.
#[derive(Clone, Debug)]
pub struct WavePacket {
    params: PacketParams,
    units: Units,
    domain: (f64, f64),
    x: nd::Array1<f64>,
    dx: f64,
    mask: nd::Array1<f64>,
    // probability absorbed beyond the left and right domain edges
    absorbed: (f64, f64),
    // both in natural units
    v: nd::Array1<f64>,
    k2: nd::Array1<f64>,
    // interaction zone: left edge of the first feature, right edge of the last
    zone: (f64, f64),
    psi: nd::Array1<C64>,
    time: f64,
    fft: FftPair,
}

fn gaussian(
    x: &nd::Array1<f64>,
    center: f64,
    width: f64,
    k0: f64,
) -> nd::Array1<C64>
{
    x.mapv(|xk| {
        let u = (xk - center) / width;
        C64::from_polar((-u * u / 4.0).exp(), k0 * (xk - center))
    })
}

fn absorbing_mask(x: &nd::Array1<f64>, domain: (f64, f64), layer: f64)
    -> nd::Array1<f64>
{
    let (a, b) = domain;
    x.mapv(|xk| {
        let depth = if xk < a { a - xk } else if xk >= b { xk - b } else { 0.0 };
        (FRAC_PI_2 * (depth / layer).min(1.0)).cos().max(0.0).powf(0.125)
    })
}

fn interaction_zone(potential: &Potential) -> (f64, f64) {
    let regions = potential.regions();
    let n = regions.len();
    if n < 2 {
        let middle = (regions.domain_start() + regions.domain_end()) / 2.0;
        (middle, middle)
    } else {
        (regions.as_slice()[0].end, regions.as_slice()[n - 1].start)
    }
}

impl WavePacket {
    /// Build a normalized packet over the domain of `potential` with
    /// [`DEFAULT_GRID_POINTS`] points, absorbing layers included.
    pub fn new(potential: &Potential, params: PacketParams) -> QResult<Self> {
        Self::with_grid(potential, params, DEFAULT_GRID_POINTS)
    }

    /// Build a normalized packet over the domain of `potential` with `n` grid
    /// points, absorbing layers included.
    pub fn with_grid(potential: &Potential, params: PacketParams, n: usize)
        -> QResult<Self>
    {
        if n < 8 {
            return Err(QError::InvalidArgument(
                format!("wave packets need at least 8 grid points; got {n}")
            ));
        }
        if !(params.width.is_finite() && params.width > 0.0) {
            return Err(QError::InvalidArgument(
                format!("packet width must be positive; got {}", params.width)
            ));
        }
        let regions = potential.regions();
        let (a, b) = (regions.domain_start(), regions.domain_end());
        if !(a <= params.center && params.center < b) {
            return Err(QError::InvalidArgument(format!(
                "packet center {} lies outside the domain [{a}, {b})",
                params.center,
            )));
        }
        let units = Units::electron_nm();
        let layer = ABSORBING_FRACTION * (b - a);
        let dx = (b - a + 2.0 * layer) / n as f64;
        let x: nd::Array1<f64>
            = (0..n).map(|j| a - layer + dx * j as f64).collect();
        let mask = absorbing_mask(&x, (a, b), layer);
        let k2 = fft_freq(n, units.to_nat_length(dx)).mapv(|f| (TAU * f).powi(2));
        let mut packet = Self {
            params,
            units,
            domain: (a, b),
            x,
            dx,
            mask,
            absorbed: (0.0, 0.0),
            v: nd::Array1::zeros(n),
            k2,
            zone: (a, b),
            psi: nd::Array1::zeros(n),
            time: 0.0,
            fft: FftPair::new(n),
        };
        packet.set_potential(potential)?;
        packet.reset();
        Ok(packet)
    }

    /// Resample the potential, keeping the current wave function. The edge
    /// regions extend across the absorbing layers.
    ///
    /// Fails if `potential` is defined over a different domain.
    pub fn set_potential(&mut self, potential: &Potential) -> QResult<()> {
        let regions = potential.regions();
        let (a, b) = self.domain;
        let same_domain
            = (regions.domain_start() - a).abs() < 1e-9
            && (regions.domain_end() - b).abs() < 1e-9;
        if !same_domain {
            return Err(QError::InvalidArgument(
                "potential domain differs from the packet grid".into()
            ));
        }
        self.v = potential.sample(&self.x).mapv(|vk| self.units.to_nat_energy(vk));
        self.zone = interaction_zone(potential);
        Ok(())
    }

    /// Restore the initial Gaussian and set the time back to zero.
    pub fn reset(&mut self) {
        let PacketParams { center, width, energy, direction } = self.params;
        let j = ((center - self.x[0]) / self.dx) as usize;
        let v0 = self.units.from_nat_energy(self.v[j.min(self.x.len() - 1)]);
        let k = wave_number(self.units.m, energy, v0).re;
        let k0 = if direction.is_left_to_right() { k } else { -k };
        self.psi = gaussian(&self.x, center, width, k0);
        wf_renormalize(&mut self.psi, self.dx);
        self.absorbed = (0.0, 0.0);
        self.time = 0.0;
    }

    /// Start over from the initial center and width with a new mean energy
    /// (eV) and direction.
    pub fn relaunch(&mut self, energy: f64, direction: Direction) {
        self.params.energy = energy;
        self.params.direction = direction;
        self.reset();
    }

    pub fn params(&self) -> PacketParams { self.params }

    /// Edges (nm) of the potential's domain; the grid extends beyond both.
    pub fn domain(&self) -> (f64, f64) { self.domain }

    /// Elapsed time (fs).
    pub fn time(&self) -> f64 { self.time }

    /// Grid positions (nm).
    pub fn x(&self) -> &nd::Array1<f64> { &self.x }

    /// Grid spacing (nm).
    pub fn dx(&self) -> f64 { self.dx }

    /// Wave function values, normalized over nm.
    pub fn psi(&self) -> &nd::Array1<C64> { &self.psi }

    /// `|ψ|²` (nm⁻¹).
    pub fn probability_density(&self) -> nd::Array1<f64> {
        self.psi.mapv(|q| q.norm_sqr())
    }

    /// Probability still on the grid.
    pub fn grid_probability(&self) -> f64 { wf_norm(&self.psi, self.dx) }

    /// Probability absorbed beyond the left and right edges of the domain.
    pub fn absorbed_probability(&self) -> (f64, f64) { self.absorbed }

    /// Probability on the grid plus what has been absorbed; stays 1 up to
    /// rounding.
    pub fn total_probability(&self) -> f64 {
        self.grid_probability() + self.absorbed.0 + self.absorbed.1
    }

    fn probability_where<F>(&self, mut keep: F) -> f64
    where F: FnMut(f64) -> bool
    {
        let rho: nd::Array1<f64>
            = self.x.iter().zip(&self.psi)
            .map(|(&xk, qk)| if keep(xk) { qk.norm_sqr() } else { 0.0 })
            .collect();
        periodic_integral(&rho, self.dx)
    }

    /// Probability of having been reflected: found on the incident side of
    /// every feature of the potential, or absorbed beyond that side.
    pub fn reflected_probability(&self) -> f64 {
        let (l, r) = self.zone;
        match self.params.direction {
            Direction::LeftToRight
                => self.probability_where(|x| x < l) + self.absorbed.0,
            Direction::RightToLeft
                => self.probability_where(|x| x >= r) + self.absorbed.1,
        }
    }

    /// Probability of having been transmitted: found beyond every feature of
    /// the potential, or absorbed beyond the far side.
    pub fn transmitted_probability(&self) -> f64 {
        let (l, r) = self.zone;
        match self.params.direction {
            Direction::LeftToRight
                => self.probability_where(|x| x >= r) + self.absorbed.1,
            Direction::RightToLeft
                => self.probability_where(|x| x < l) + self.absorbed.0,
        }
    }

    /// Position expectation value (nm).
    pub fn mean_position(&self) -> f64 {
        let rho = self.probability_density();
        periodic_integral(&(&rho * &self.x), self.dx)
            / periodic_integral(&rho, self.dx)
    }

    /// Advance by a single time step `dt` (fs).
    pub fn step(&mut self, dt: f64) {
        let dt_nat: f64 = self.units.to_nat_time(dt);
        self.apply_potential(dt_nat / 2.0);
        self.apply_kinetic(dt_nat);
        self.apply_potential(dt_nat / 2.0);
        self.absorb();
        self.time += dt;
    }

    /// Advance by `duration` (fs) in steps no longer than `dt`, returning the
    /// number of steps taken.
    pub fn evolve(&mut self, duration: f64, dt: f64) -> QResult<usize> {
        QError::check_epsilon(dt)?;
        if duration <= 0.0 { return Ok(0); }
        let steps = (duration / dt).ceil() as usize;
        let h = duration / steps as f64;
        (0..steps).for_each(|_| self.step(h));
        Ok(steps)
    }

    fn apply_potential(&mut self, dt: f64) {
        self.psi.iter_mut().zip(&self.v)
            .for_each(|(q, v)| { *q *= C64::cis(-v * dt); });
    }

    fn absorb(&mut self) {
        let a = self.domain.0;
        let dx = self.dx;
        let (mut left, mut right) = (0.0, 0.0);
        self.psi.iter_mut().zip(&self.mask).zip(&self.x)
            .filter(|((_, m), _)| **m < 1.0)
            .for_each(|((q, &m), &xk)| {
                let lost = q.norm_sqr() * (1.0 - m * m) * dx;
                if xk < a { left += lost; } else { right += lost; }
                *q *= m;
            });
        self.absorbed.0 += left;
        self.absorbed.1 += right;
    }

    fn apply_kinetic(&mut self, dt: f64) {
        self.fft.forward(&mut self.psi);
        self.psi.iter_mut().zip(&self.k2)
            .for_each(|(q, k2)| { *q *= C64::cis(-k2 * dt); });
        self.fft.inverse(&mut self.psi);
    }

    /// Collapse the packet onto a narrow Gaussian at position `x` (nm), keeping
    /// its mean wave number. Absorbed probability is forgotten.
    pub fn collapse_at(&mut self, x: f64) {
        let k = self.mean_wave_number();
        self.psi = gaussian(&self.x, x, MEASURED_WIDTH, k);
        wf_renormalize(&mut self.psi, self.dx);
        self.absorbed = (0.0, 0.0);
    }

    /// Measure position, collapsing onto the most probable grid point, which is
    /// returned.
    pub fn measure(&mut self) -> f64 {
        let j = self.psi.iter()
            .map(|q| q.norm_sqr())
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (j, p)| {
                if p > best.1 { (j, p) } else { best }
            })
            .0;
        let x = self.x[j];
        self.collapse_at(x);
        log::debug!("measured packet at x = {x} nm");
        x
    }

    /// Measure position by sampling `|ψ|²` with a uniform deviate `u ∈ [0,
    /// 1)`, collapsing onto the sampled grid point, which is returned.
    pub fn measure_sampled(&mut self, u: f64) -> QResult<f64> {
        if !(0.0..1.0).contains(&u) {
            return Err(QError::InvalidArgument(
                format!("uniform deviate must lie in [0, 1); got {u}")
            ));
        }
        let rho = self.probability_density();
        let total = periodic_integral(&rho, self.dx);
        let cdf = cumulative_integral(&rho, self.dx);
        let j = cdf.iter()
            .position(|&c| c >= u * total)
            .unwrap_or(cdf.len() - 1);
        let x = self.x[j];
        self.collapse_at(x);
        log::debug!("measured packet at x = {x} nm (u = {u})");
        Ok(x)
    }

    /// Expectation value of the wave number (nm⁻¹).
    pub fn mean_wave_number(&self) -> f64 {
        let mut phi = self.psi.clone();
        self.fft.forward(&mut phi);
        let k = fft_freq(self.x.len(), self.dx).mapv(|f| TAU * f);
        let (num, den)
            = phi.iter().zip(&k)
            .fold((0.0, 0.0), |(num, den), (p, kk)| {
                (num + kk * p.norm_sqr(), den + p.norm_sqr())
            });
        if den > 0.0 { num / den } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use crate::potential::{ BarrierPotential, ConstantPotential };
    use super::*;

    fn free_space() -> Potential {
        ConstantPotential::with_domain((-20.0, 20.0), 0.0).unwrap().into()
    }

    #[test]
    fn norm_is_conserved() {
        let p: Potential = BarrierPotential::single().into();
        let mut packet = WavePacket::new(&p, PacketParams::default()).unwrap();
        assert!((packet.total_probability() - 1.0).abs() < 1e-9);
        packet.evolve(20.0, 0.05).unwrap();
        assert!((packet.total_probability() - 1.0).abs() < 1e-9);
        assert!((packet.time() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn free_packet_moves_at_group_velocity() {
        let params = PacketParams {
            center: -10.0,
            width: 1.0,
            energy: 0.5,
            direction: Direction::LeftToRight,
        };
        let mut packet = WavePacket::new(&free_space(), params).unwrap();
        let x0 = packet.mean_position();
        let k0 = packet.mean_wave_number();
        // v = ħ k / m
        let v = crate::units::HBAR * k0 / crate::units::MASS_ELECTRON;
        packet.evolve(10.0, 0.05).unwrap();
        let x1 = packet.mean_position();
        assert!(((x1 - x0) - v * 10.0).abs() < 0.05, "moved {}", x1 - x0);
    }

    #[test]
    fn direction_sets_the_sign_of_momentum() {
        let params = PacketParams { direction: Direction::RightToLeft, ..Default::default() };
        let packet = WavePacket::new(&free_space(), params).unwrap();
        assert!(packet.mean_wave_number() < 0.0);
    }

    #[test]
    fn high_barrier_reflects() {
        let p: Potential
            = BarrierPotential::with_domain((-30.0, 30.0), &[(0.0, 1.0)], 0.0, 2.0)
            .unwrap()
            .into();
        let params = PacketParams {
            center: -8.0,
            width: 1.5,
            energy: 0.3,
            direction: Direction::LeftToRight,
        };
        let mut packet = WavePacket::with_grid(&p, params, 2048).unwrap();
        assert!(packet.reflected_probability() > 0.999);
        packet.evolve(60.0, 0.02).unwrap();
        assert!(packet.transmitted_probability() < 1e-3);
        assert!(packet.reflected_probability() > 0.99);
    }

    #[test]
    fn escaped_probability_is_absorbed() {
        let p: Potential = BarrierPotential::single().into();
        let mut packet = WavePacket::new(&p, PacketParams::default()).unwrap();
        assert_eq!(packet.x().len(), DEFAULT_GRID_POINTS);
        assert!(packet.x()[0] < p.start(0));
        assert!(*packet.x().last().unwrap() > p.end(2));
        packet.evolve(40.0, 0.01).unwrap();
        let (r40, t40) = (packet.reflected_probability(), packet.transmitted_probability());
        packet.evolve(20.0, 0.01).unwrap();
        let (r60, t60) = (packet.reflected_probability(), packet.transmitted_probability());
        let (left, right) = packet.absorbed_probability();
        assert!(left + right > 0.5, "absorbed {left}, {right}");
        assert!(left > right);
        assert!((packet.total_probability() - 1.0).abs() < 1e-9);
        assert!((r60 - r40).abs() < 2e-3, "R = {r40}, {r60}");
        assert!((t60 - t40).abs() < 2e-3, "T = {t40}, {t60}");
        assert!((r60 + t60 - 1.0).abs() < 1e-2);
        assert!(t60 > 0.2 && t60 < 0.5, "T = {t60}");
        packet.reset();
        assert_eq!(packet.absorbed_probability(), (0.0, 0.0));
    }

    #[test]
    fn relaunch_reverses_the_packet() {
        let mut packet
            = WavePacket::new(&free_space(), PacketParams::default()).unwrap();
        packet.evolve(1.0, 0.05).unwrap();
        packet.relaunch(0.6, Direction::RightToLeft);
        assert_eq!(packet.time(), 0.0);
        assert_eq!(packet.params().energy, 0.6);
        assert!(packet.mean_wave_number() < 0.0);
        assert!((packet.mean_position() - PacketParams::default().center).abs() < 1e-6);
    }

    #[test]
    fn measurement_collapses() {
        let mut packet
            = WavePacket::new(&free_space(), PacketParams::default()).unwrap();
        let x = packet.measure();
        assert!((x - PacketParams::default().center).abs() < 0.1);
        assert!((packet.total_probability() - 1.0).abs() < 1e-9);
        let x = packet.measure_sampled(0.5).unwrap();
        assert!((x - packet.mean_position()).abs() < 0.1);
        assert!(packet.measure_sampled(1.0).is_err());
    }

    #[test]
    fn bad_parameters() {
        let p = free_space();
        let off = PacketParams { center: 25.0, ..Default::default() };
        assert!(WavePacket::new(&p, off).is_err());
        let flat = PacketParams { width: 0.0, ..Default::default() };
        assert!(WavePacket::new(&p, flat).is_err());
        assert!(WavePacket::with_grid(&p, PacketParams::default(), 4).is_err());
    }
}
