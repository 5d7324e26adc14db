//! Theoretical background.
//!
//! # Contents
//! - [Plane waves](#plane-waves)
//! - [Transfer matrices](#transfer-matrices)
//! - [Transmission and reflection](#transmission-and-reflection)
//! - [Units](#units)
//! - [Wave packets](#wave-packets)
//!
//! # Plane waves
//! For a potential that is constant on each of a sequence of regions
//! [*x*ᵢ, *x*ᵢ₊₁), the time-independent Schrödinger equation
//! ```text
//!    ħ² ∂²
//! - --- --- ψ(x) + V(x) ψ(x) = E ψ(x)
//!   2 m ∂x²
//! ```
//! is solved exactly on region *i* by a pair of counter-propagating plane
//! waves,
//! ```text
//! ψᵢ(x) = Aᵢ exp(i kᵢ (x - rᵢ)) + Bᵢ exp(-i kᵢ (x - rᵢ))
//!
//!       √(2 m (E - Vᵢ))
//! kᵢ = -----------------
//!             ħ
//! ```
//! where the square root takes its principal branch. Where *E* < *V*ᵢ the wave
//! number is purely imaginary and the two terms become growing and decaying
//! exponentials. *r*ᵢ is a reference point for the phase of region *i*: its
//! left boundary, except for the leftmost region, which uses its right
//! boundary. Measuring every phase from a point inside or on the edge of its
//! region keeps the exponentials evaluated while matching bounded by the
//! region widths.
//!
//! The full solution carries the stationary time factor
//! ```text
//! ψ(x, t) = ψ(x) exp(-i E t / ħ)
//! ```
//! which is a global phase.
//!
//! # Transfer matrices
//! At a boundary *d* between regions *i* and *i* + 1, both ψ and ∂ψ/∂x are
//! continuous. Writing ρ = *k*ᵢ / *k*ᵢ₊₁ and φ = *k*ᵢ (*d* - *r*ᵢ), the two
//! conditions relate the coefficients on either side by
//! ```text
//! ⎡Aᵢ₊₁⎤   1 ⎡(1 + ρ) exp(iφ)   (1 - ρ) exp(-iφ)⎤ ⎡Aᵢ⎤
//! ⎢    ⎥ = - ⎢                                   ⎥ ⎢  ⎥
//! ⎣Bᵢ₊₁⎦   2 ⎣(1 - ρ) exp(iφ)   (1 + ρ) exp(-iφ)⎦ ⎣Bᵢ⎦
//! ```
//! since *r*ᵢ₊₁ = *d*. Multiplying these together from left to right gives a
//! single 2×2 matrix *M* carrying (*A*₀, *B*₀) to (*A*ₙ₋₁, *B*ₙ₋₁).
//!
//! For a wave incident from the left, the outgoing side has no left-moving
//! component, so with *A*₀ = 1, *B*₀ = *r*,
//! ```text
//! Bₙ₋₁ = 0  ⇒  r = -M₁₀ / M₁₁,  t = Aₙ₋₁ = M₀₀ + M₀₁ r
//! ```
//! For a wave incident from the right, *A*₀ = 0 and *B*ₙ₋₁ = 1, so that
//! ```text
//! t = B₀ = 1 / M₁₁,  r = Aₙ₋₁ = M₀₁ t
//! ```
//! The remaining coefficients follow by applying the boundary matrices one at
//! a time from the left.
//!
//! When *E* equals the potential energy of any region, that region's wave
//! number vanishes and ρ is undefined. The matching is then done at an energy
//! offset upward by a tiny amount
//! ([`DEGENERATE_ENERGY_OFFSET`][crate::solver::DEGENERATE_ENERGY_OFFSET]).
//!
//! # Transmission and reflection
//! The probability current of a plane wave is proportional to Re(*k*) |*A*|²,
//! so the transmission and reflection coefficients are
//! ```text
//!     Re(k_out)
//! T = --------- |t|²,  R = |r|²
//!      k_in
//! ```
//! with *T* = 0 whenever the outgoing region is classically forbidden. Current
//! conservation then guarantees *R* + *T* = 1. If the incident region is itself
//! classically forbidden no wave arrives at all, and the solution is taken to
//! be identically zero.
//!
//! # Units
//! Plane-wave solvers work directly in nm, eV, and fs, with the electron mass
//! expressed as [`MASS_ELECTRON`][crate::units::MASS_ELECTRON] in eV fs² nm⁻².
//! Wave packets, however, are propagated in natural (dimensionless) units.
//! Starting from the time-dependent Schrödinger equation
//! ```text
//!    ħ² ∂²                               ∂
//! - --- --- ψ(x, t) + V(x) ψ(x, t) = i ħ -- ψ(x, t)
//!   2 m ∂x²                              ∂t
//! ```
//! we first choose a characteristic length scale *a* and change variables
//! using *x'* ≡ *x* / *a*, giving
//! ```text
//! dx = a dx' ⇒ (∂²/∂x²) = (1/a²) (∂²/∂(x')²)
//! ψ(x) → ψ'(x') = ψ(a x') / √a
//! ```
//! The kinetic coefficient becomes *ħ*²/2 *m* *a*² ≡ *ε*, which has units of
//! energy and serves as the natural energy scale. Dividing through by *ε*,
//! ```text
//! V(x) → V'(x') = V(a x') / ε
//! E → E' = E / ε
//! ```
//! and the coefficient on the right-hand side becomes *ħ* / *ε* ≡ *τ*, the
//! natural time scale. With *t'* ≡ *t* / *τ*,
//! ```text
//!     ∂²                                          ∂
//! - ------ ψ''(x', t') + V'(x') ψ''(x', t') = i ----- ψ''(x', t')
//!   ∂(x')²                                      ∂(t')
//! ```
//! [`Units`][crate::units::Units] handles the conversions; for an electron
//! with *a* = 1 nm, *ε* ≈ 38.1 meV and *τ* ≈ 17.3 fs.
//!
//! # Wave packets
//! A Gaussian packet
//! ```text
//! ψ(x, 0) ∝ exp(-(x - x₀)² / 4σ² + i k₀ (x - x₀))
//! ```
//! with *k*₀ the wave number of its mean energy at *x*₀ is propagated with the
//! symmetric split-step Fourier method,
//! ```text
//! ψ(t + δt) = exp(-i V δt / 2) F⁻¹ exp(-i k² δt) F exp(-i V δt / 2) ψ(t)
//! ```
//! which is unitary for any step and accurate to *O*(*δt*³) per step. Near a
//! sharp, high step in the potential the splitting error grows quickly with
//! *δt*, so steps of 0.01 fs to 0.02 fs are used in practice.
//!
//! The discrete Fourier transform makes the grid periodic. To keep outgoing
//! probability from re-entering on the opposite side, the grid extends past
//! each edge of the domain by an absorbing layer across which ψ is multiplied
//! after every step by
//! ```text
//! m(s) = cos(π s / 2)^(1/8)
//! ```
//! where *s* runs from 0 at the domain edge to 1 at the grid edge. The
//! probability removed is tallied per side. Once the packet has left the
//! barrier region, the probability found or absorbed beyond it approximates
//! the energy-averaged transmission coefficient.
