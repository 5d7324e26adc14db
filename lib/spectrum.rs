//! Transmission spectra and resonance search.
//!
//! Resonances are located at the sample maxima of `T(E)` and refined to the
//! vertex of the parabola through each maximum and its two neighbors.
//!
//! ```
//! use ndarray as nd;
//! use qtunnel::{
//!     potential::BarrierPotential,
//!     solver::Direction,
//!     spectrum::{ find_resonances, transmission_spectrum },
//! };
//!
//! let potential = BarrierPotential::double().into();
//! let energy: nd::Array1<f64> = nd::Array1::linspace(0.02, 0.48, 500);
//! let t = transmission_spectrum(&potential, &energy, Direction::LeftToRight)
//!     .unwrap();
//! let resonances = find_resonances(&energy, &t).unwrap();
//! assert!(!resonances.is_empty());
//! assert!(resonances.iter().all(|e| (0.02..0.48).contains(e)));
//! ```

use std::cmp;
use ndarray as nd;
use num_traits::Num;
use crate::{
    Arr1,
    error::{ LagrangeError, LengthError, QError, QResult },
    potential::Potential,
    solver::{ Direction, PlaneWaveSolver, Solver },
};

/// Specifies a set of zeros to look for in [`find_zeros`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zero {
    /// Points at which a function changes from positive to negative.
    Falling,
    /// Points at which a function changes from negative to positive.
    Rising,
    /// Either/both of the above.
    All,
}

impl Zero {
    fn matches<A>(&self, a: &A, b: &A) -> bool
    where A: PartialEq + PartialOrd
    {
        match self {
            Self::Falling if a > b => true,
            Self::Rising if a < b => true,
            Self::All if a != b => true,
            _ => false,
        }
    }
}

/// Compute the value of a sampled function via a Lagrange polynomial.
pub fn lagrange<S, T, A>(data_x: &Arr1<S>, data_y: &Arr1<T>, x: A) -> QResult<A>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + Copy
{
    LengthError::check(data_x, data_y)?;
    let res: A
        = data_x.iter().zip(data_y).enumerate()
        .map(|(j, (xj, yj))| {
            let xj = *xj;
            let inner
                = data_x.iter().enumerate()
                .filter(|(m, _)| *m != j)
                .map(|(_, xm)| (x - *xm) / (xj - *xm))
                .fold(A::one(), A::mul);
            *yj * inner
        })
        .fold(A::zero(), A::add);
    Ok(res)
}

/// Return a list of all zeros of a given kind in a sampled function.
///
/// The function must be locally invertible on the scale of a few grid points.
pub fn find_zeros<S, T, A>(data_x: &Arr1<S>, data_y: &Arr1<T>, kind: Zero)
    -> QResult<Vec<A>>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + PartialOrd + Copy,
{
    LengthError::check(data_x, data_y)?;
    LagrangeError::check(data_x)?;
    let n = data_x.len();
    let z = A::zero();
    data_x.iter().zip(data_y).skip(1)
        .zip(data_y)
        .enumerate()
        .filter_map(|(i, ((xi, yi), yim1))| {
            if *yi == z {
                Some(Ok(*xi))
            } else if *yi * *yim1 < z && kind.matches(yim1, yi) {
                let il = i.saturating_sub(2);
                let ir = cmp::min(n, i + 2);
                if ir - il < 4 {
                    log::warn!(
                        "interpolating near an edge of the sampled data; \
                        some accuracy may be lost"
                    );
                }
                let interp
                    = lagrange(
                        &data_y.slice(nd::s![il..ir]),
                        &data_x.slice(nd::s![il..ir]),
                        z,
                    );
                Some(interp)
            } else {
                None
            }
        })
        .collect()
}

fn sample_spectrum<S, F>(
    potential: &Potential,
    energies: &Arr1<S>,
    direction: Direction,
    coefficient: F,
) -> QResult<nd::Array1<f64>>
where
    S: nd::Data<Elem = f64>,
    F: Fn(&Solver) -> f64,
{
    let Some(&e0) = energies.get(0) else { return Ok(nd::Array1::zeros(0)); };
    let mut solver = Solver::for_potential(e0, potential, direction)?;
    energies.iter()
        .map(|&e| {
            solver.update_coefficients(e, potential)?;
            Ok(coefficient(&solver))
        })
        .collect()
}

/// Sample the transmission coefficient over an array of total energies.
///
/// A single solver is built and its coefficients recomputed for each energy.
/// Fails if no closed-form solver handles `potential`.
pub fn transmission_spectrum<S>(
    potential: &Potential,
    energies: &Arr1<S>,
    direction: Direction,
) -> QResult<nd::Array1<f64>>
where S: nd::Data<Elem = f64>
{
    sample_spectrum(potential, energies, direction, |s| s.transmission())
}

/// Sample the reflection coefficient over an array of total energies.
pub fn reflection_spectrum<S>(
    potential: &Potential,
    energies: &Arr1<S>,
    direction: Direction,
) -> QResult<nd::Array1<f64>>
where S: nd::Data<Elem = f64>
{
    sample_spectrum(potential, energies, direction, |s| s.reflection())
}

// abscissa of the vertex of the parabola through three points
fn parabola_vertex(x: [f64; 3], y: [f64; 3]) -> f64 {
    let (l, r) = (x[1] - x[0], x[1] - x[2]);
    let num = l * l * (y[1] - y[2]) - r * r * (y[1] - y[0]);
    let den = l * (y[1] - y[2]) - r * (y[1] - y[0]);
    if den == 0.0 { x[1] } else { x[1] - num / den / 2.0 }
}

/// Locate the local maxima of a sampled transmission spectrum.
///
/// Each sample strictly above its left neighbor and at least its right one is
/// a maximum; its position is refined by fitting `T(E)` with a parabola
/// through the maximum and both neighbors. Maxima at either end of the range
/// are not reported.
///
/// `energies` must be strictly increasing and longer than 4 elements.
pub fn find_resonances<S, T>(energies: &Arr1<S>, transmission: &Arr1<T>)
    -> QResult<Vec<f64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(energies, transmission)?;
    LagrangeError::check(energies)?;
    if energies.iter().zip(energies.iter().skip(1)).any(|(a, b)| !(a < b)) {
        return Err(QError::InvalidArgument(
            "energies must be strictly increasing".into()
        ));
    }
    let e = energies;
    let t = transmission;
    let res: Vec<f64>
        = (1..e.len() - 1)
        .filter(|&i| t[i - 1] < t[i] && t[i] >= t[i + 1])
        .map(|i| {
            parabola_vertex(
                [e[i - 1], e[i], e[i + 1]],
                [t[i - 1], t[i], t[i + 1]],
            )
        })
        .collect();
    Ok(res)
}

#[cfg(test)]
mod tests {
    use crate::potential::{ BarrierPotential, PiecewisePotential };
    use crate::region::RegionList;
    use super::*;

    #[test]
    fn zeros_of_a_cubic() {
        let x: nd::Array1<f64> = nd::Array::linspace(-5.0, 5.0, 1000);
        let y = x.mapv(|xk| (xk + 3.0) * (xk - 0.5) * (xk - 2.0));
        let rising = find_zeros(&x, &y, Zero::Rising).unwrap();
        let falling = find_zeros(&x, &y, Zero::Falling).unwrap();
        assert_eq!(rising.len(), 2);
        assert_eq!(falling.len(), 1);
        assert!((falling[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn exact_zero_sample_counted_once() {
        let x: nd::Array1<f64> = nd::Array::linspace(-1.0, 1.0, 9);
        let y = x.mapv(|xk| xk * (xk - 2.0));
        assert_eq!(y[4], 0.0);
        assert_eq!(find_zeros(&x, &y, Zero::All).unwrap(), vec![0.0]);
    }

    #[test]
    fn peak_of_a_lorentzian() {
        let e: nd::Array1<f64> = nd::Array::linspace(0.0, 1.0, 201);
        let t = e.mapv(|ek| 1.0 / (1.0 + ((ek - 0.4137) / 0.02).powi(2)));
        let res = find_resonances(&e, &t).unwrap();
        assert_eq!(res.len(), 1);
        assert!((res[0] - 0.4137).abs() < 1e-4, "peak at {}", res[0]);
        // a plateau of equal samples gives one resonance
        let flat = nd::array![0.0, 0.5, 1.0, 1.0, 0.5, 0.0];
        let e6: nd::Array1<f64> = nd::Array::linspace(0.0, 0.5, 6);
        assert_eq!(find_resonances(&e6, &flat).unwrap().len(), 1);
    }

    #[test]
    fn double_barrier_resonance() {
        let p: Potential = BarrierPotential::double().into();
        let e: nd::Array1<f64> = nd::Array::linspace(0.02, 0.48, 2000);
        let t = transmission_spectrum(&p, &e, Direction::LeftToRight).unwrap();
        let (imax, tmax)
            = t.iter().copied().enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, tk)| {
                if tk > acc.1 { (i, tk) } else { acc }
            });
        let tmin = t.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(0 < imax && imax < e.len() - 1);
        assert!(tmax > 0.5, "peak transmission {tmax}");
        assert!(tmin < 0.1 * tmax);
        let res = find_resonances(&e, &t).unwrap();
        assert!(res.iter().any(|r| (r - e[imax]).abs() < 2e-3));
    }

    #[test]
    fn bad_inputs() {
        let e = nd::array![0.1, 0.2, 0.2, 0.3, 0.4, 0.5, 0.6];
        let t = nd::Array1::<f64>::zeros(7);
        assert!(matches!(find_resonances(&e, &t), Err(QError::InvalidArgument(_))));
        let short = nd::array![0.1, 0.2, 0.3];
        assert!(matches!(
            find_resonances(&short, &nd::array![0.0, 1.0, 0.0]),
            Err(QError::Lagrange(_))
        ));
        let regions = RegionList::from_boundaries(
            &[-4.0, 0.0, 4.0], &[0.0, 0.1], 0.1).unwrap();
        let p: Potential = PiecewisePotential::new(regions).into();
        assert!(transmission_spectrum(&p, &e, Direction::LeftToRight).is_err());
    }
}
