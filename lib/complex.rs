//! Complex arithmetic on top of [`num_complex::Complex64`].
//!
//! [`C64`] already provides value-semantics `+`, `*`, `/`, `conj`, `norm`,
//! `arg` and `cis`. What is added here is division that refuses to produce
//! infinities, the per-region wave number, and the projections used to plot a
//! complex wave function.
//!
//! ```
//! use qtunnel::complex::{ C64, checked_div };
//!
//! let z = checked_div(C64::new(1.0, 1.0), C64::new(0.0, 2.0)).unwrap();
//! assert!((z - C64::new(0.5, -0.5)).norm() < 1e-15);
//! assert!(checked_div(z, C64::new(0.0, 0.0)).is_err());
//! ```

pub use num_complex::Complex64 as C64;
use crate::{
    error::{ QError, QResult },
    units,
};

/// `a / b`, failing with [`QError::DivisionByZero`] when `|b| == 0`.
pub fn checked_div(a: C64, b: C64) -> QResult<C64> {
    if b.re == 0.0 && b.im == 0.0 {
        Err(QError::DivisionByZero)
    } else {
        Ok(a / b)
    }
}

/// `1 / z`, failing with [`QError::DivisionByZero`] when `|z| == 0`.
pub fn checked_recip(z: C64) -> QResult<C64> {
    checked_div(C64::new(1.0, 0.0), z)
}

/// Wave number `k = √(2 m (E - V)) / ħ` for a particle of mass `mass`
/// (eV fs² nm⁻²) with total energy `energy` in a region of constant potential
/// `potential` (both eV), in nm⁻¹.
///
/// The principal root is taken, so `k` is real and non-negative for `E ≥ V`
/// and purely imaginary with positive imaginary part for `E < V`. With that
/// choice `e^{ikx}` is a wave travelling to the right or a wave decaying to
/// the right.
pub fn wave_number(mass: f64, energy: f64, potential: f64) -> C64 {
    C64::new(2.0 * mass * (energy - potential), 0.0).sqrt() / units::HBAR
}

/// Projection of a complex value onto a plottable real quantity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComplexPart {
    Real,
    Imaginary,
    Magnitude,
    Phase,
}

impl ComplexPart {
    /// Project `z` onto `self`.
    ///
    /// NaN inputs are passed through; plotting code tolerates them.
    pub fn of(self, z: C64) -> f64 {
        match self {
            Self::Real => z.re,
            Self::Imaginary => z.im,
            Self::Magnitude => z.norm(),
            Self::Phase => z.arg(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recip_of_zero_fails() {
        assert!(matches!(
            checked_recip(C64::new(0.0, 0.0)),
            Err(QError::DivisionByZero)
        ));
        assert!(matches!(
            checked_recip(C64::new(-0.0, 0.0)),
            Err(QError::DivisionByZero)
        ));
    }

    #[test]
    fn wave_number_branches() {
        let m = units::MASS_ELECTRON;
        let k = wave_number(m, 1.0, 0.0);
        assert!(k.im == 0.0 && k.re > 0.0);
        let q = wave_number(m, 0.0, 1.0);
        assert!(q.re.abs() < 1e-15 && q.im > 0.0);
        assert!((k.re - q.im).abs() < 1e-12);
        assert_eq!(wave_number(m, 0.3, 0.3), C64::new(0.0, 0.0));
    }

    #[test]
    fn parts() {
        let z = C64::new(0.0, 2.0);
        assert_eq!(ComplexPart::Real.of(z), 0.0);
        assert_eq!(ComplexPart::Imaginary.of(z), 2.0);
        assert_eq!(ComplexPart::Magnitude.of(z), 2.0);
        assert!((ComplexPart::Phase.of(z) - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
