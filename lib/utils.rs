//! Miscellaneous numerical tools.

use std::sync::Arc;
use ndarray::{ self as nd, concatenate };
use rustfft as fft;
use crate::{ Arr1, complex::C64 };

/// Integrate a function sampled on a uniform periodic grid.
///
/// The grid holds one period without its repeated endpoint, so this is the
/// rectangle rule, which is exact for band-limited periodic functions.
pub fn periodic_integral<S>(y: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = f64>
{
    dx * y.sum()
}

/// Running integral over a periodic grid, taking each sample at the middle of
/// its cell: element `k` covers everything left of `x[k]`.
pub fn cumulative_integral<S>(y: &Arr1<S>, dx: f64) -> nd::Array1<f64>
where S: nd::Data<Elem = f64>
{
    let mut acc: f64 = 0.0;
    y.iter()
        .map(|yk| {
            let mid = acc + dx * yk / 2.0;
            acc += dx * yk;
            mid
        })
        .collect()
}

/// Calculate the norm of a wavefunction on a periodic grid.
pub fn wf_norm<S>(q: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    dx * q.iter().map(|qk| qk.norm_sqr()).sum::<f64>()
}

/// Renormalize a wavefunction in place.
pub fn wf_renormalize<S>(q: &mut Arr1<S>, dx: f64)
where S: nd::DataMut<Elem = C64>
{
    let norm = wf_norm(q, dx).sqrt();
    q.iter_mut().for_each(|qk| { *qk /= norm; });
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling interval `dt`.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    let np = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let fp: nd::Array1<f64>
        = (0..np)
        .map(|k| k as f64 / (n as f64 * dt))
        .collect();
    let fm: nd::Array1<f64>
        = (1..n - np + 1).rev()
        .map(|k| -(k as f64) / (n as f64 * dt))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

/// Forward and inverse complex FFT plans for a fixed length.
#[derive(Clone)]
pub struct FftPair {
    n: usize,
    forward: Arc<dyn fft::Fft<f64>>,
    inverse: Arc<dyn fft::Fft<f64>>,
}

impl FftPair {
    pub fn new(n: usize) -> Self {
        let mut planner = fft::FftPlanner::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        Self { n, forward, inverse }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.n }

    /// Perform the forward FFT in place.
    ///
    /// *Panics if `x` does not have the planned length*.
    pub fn forward<S>(&self, x: &mut Arr1<S>)
    where S: nd::DataMut<Elem = C64>
    {
        process(self.forward.as_ref(), x);
    }

    /// Perform the normalized inverse FFT in place.
    ///
    /// *Panics if `x` does not have the planned length*.
    pub fn inverse<S>(&self, x: &mut Arr1<S>)
    where S: nd::DataMut<Elem = C64>
    {
        process(self.inverse.as_ref(), x);
        let n = self.n as f64;
        x.map_inplace(|xk| { *xk /= n; });
    }
}

impl std::fmt::Debug for FftPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftPair").field("n", &self.n).finish()
    }
}

fn process<S>(plan: &dyn fft::Fft<f64>, x: &mut Arr1<S>)
where S: nd::DataMut<Elem = C64>
{
    assert_eq!(x.len(), plan.len(), "FFT length mismatch");
    if let Some(buf) = x.as_slice_mut() {
        plan.process(buf);
    } else {
        let mut buf: Vec<C64> = x.to_vec();
        plan.process(&mut buf);
        x.iter_mut().zip(buf).for_each(|(xk, bk)| { *xk = bk; });
    }
}
