#![allow(non_upper_case_globals)]

//! Physical constants and conversion to and from naturalized units.
//!
//! The model works in electron-volts, nanometers and femtoseconds. Concrete
//! constants are taken from NIST; the eV/nm/fs values are derived from them.

use std::f64::consts::PI;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// elementary charge (C)
pub const e: f64 = 1.602176634e-19;
//             +/- 0 (exact)

/// electron mass (kg)
pub const me: f64 = 9.1093837015e-31;
//              +/- 0.0000000028e-31

/// Reduced Planck constant in eV fs.
pub const HBAR: f64 = hbar / e * 1e15;

/// Electron mass in eV fs^2 nm^-2.
pub const MASS_ELECTRON: f64 = me / e * 1e12;

/// A collection of natural unit scaling factors relative to the eV/nm/fs
/// system.
///
/// In natural units the time-dependent Schrödinger equation reads
/// `i ∂ψ/∂t = -∂²ψ/∂x² + V ψ`. See [`docs/units`][crate::docs#units].
#[derive(Copy, Clone, Debug)]
pub struct Units {
    /// Particle mass (eV fs^2 nm^-2).
    pub m: f64,
    /// Base length scale (nm).
    pub a: f64,
    /// Associated energy scale (eV).
    pub e: f64,
    /// Associated (angular) time scale (fs).
    pub t: f64,
}

impl Units {
    /// Construct from a mass (eV fs² nm⁻²) and a length scale (nm).
    pub fn new(mass: f64, a: f64) -> Self {
        let e_unit = HBAR.powi(2) / 2.0 / mass / a.powi(2);
        let t_unit = HBAR / e_unit;
        Self { m: mass, a, e: e_unit, t: t_unit }
    }

    /// Natural units for an electron with a length scale of 1 nm.
    pub fn electron_nm() -> Self { Self::new(MASS_ELECTRON, 1.0) }

    /// Convert a quantity with dimensions of length to natural units.
    pub fn to_nat_length<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.a.recip()
    }

    /// Convert a dimensionless quantity to nm.
    pub fn from_nat_length<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.a
    }

    /// Convert a quantity with dimensions of energy to natural units.
    pub fn to_nat_energy<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.e.recip()
    }

    /// Convert a dimensionless quantity to eV.
    pub fn from_nat_energy<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.e
    }

    /// Convert a quantity with dimensions of time to natural units.
    pub fn to_nat_time<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.t.recip()
    }

    /// Convert a dimensionless quantity to fs.
    pub fn from_nat_time<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.t
    }
}
