use proptest::prelude::*;
use qtunnel::{
    complex::C64,
    energy::{ PotentialEnergy, TotalEnergy },
    factory::create_solver,
    potential::{ BarrierPotential, ConstantPotential, Potential, StepPotential },
    solver::{
        ConstantSolver,
        Direction,
        DoubleBarrierSolver,
        PlaneWaveSolver,
        SingleBarrierSolver,
        StepSolver,
    },
};
use std::rc::Rc;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::LeftToRight), Just(Direction::RightToLeft)]
}

fn single_barrier() -> impl Strategy<Value = Potential> {
    (-3.5f64..3.0, 0.1f64..0.5, 0.0f64..1.0)
        .prop_map(|(x, w, v)| BarrierPotential::new(&[(x, w)], 0.0, v).unwrap().into())
}

fn double_barrier() -> impl Strategy<Value = Potential> {
    (-3.0f64..-1.0, 0.1f64..0.5, 0.1f64..1.5, 0.1f64..0.5, 0.0f64..1.0)
        .prop_map(|(x, w1, gap, w2, v)| {
            BarrierPotential::new(&[(x, w1), (x + w1 + gap, w2)], 0.0, v)
                .unwrap()
                .into()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]

    /// Points beyond either end of the domain use the nearest edge region.
    #[test]
    fn outside_domain_resolves_to_edge_regions(
        p in single_barrier(),
        e in 0.01f64..1.5,
        dx in 0.0f64..5.0,
        dir in direction(),
    ) {
        let s = SingleBarrierSolver::new(e, &p, dir).unwrap();
        let wf = s.wave_function();
        prop_assert_eq!(wf.region_index_at(p.start(0) - dx), 0);
        prop_assert_eq!(wf.region_index_at(p.end(2) + dx), 2);
        prop_assert!(s.solve(p.start(0) - dx, 0.0).is_finite());
        prop_assert!(s.solve(p.end(2) + dx, 0.0).is_finite());
    }

    #[test]
    fn constant_is_zero_when_forbidden(
        v0 in 0.0f64..1.0,
        de in 1e-6f64..1.0,
        x in -10.0f64..10.0,
        t in 0.0f64..100.0,
        dir in direction(),
    ) {
        let p: Potential = ConstantPotential::new(v0).unwrap().into();
        let s = ConstantSolver::new(v0 - de, &p, dir).unwrap();
        prop_assert_eq!(s.solve(x, t), C64::new(0.0, 0.0));
        prop_assert_eq!(s.transmission(), 0.0);
    }

    #[test]
    fn constant_has_unit_modulus(
        v0 in -1.0f64..1.0,
        de in 0.0f64..2.0,
        x in -10.0f64..10.0,
        t in 0.0f64..100.0,
        dir in direction(),
    ) {
        let p: Potential = ConstantPotential::new(v0).unwrap().into();
        let s = ConstantSolver::new(v0 + de, &p, dir).unwrap();
        prop_assert!((s.solve(x, t).norm() - 1.0).abs() < 1e-12);
    }

    /// Incident flux equals reflected plus transmitted flux above the step.
    #[test]
    fn step_conserves_flux(
        x0 in -3.0f64..3.0,
        v in 0.0f64..1.0,
        de in 1e-3f64..2.0,
        dir in direction(),
    ) {
        let p: Potential = StepPotential::new(x0, 0.0, v).unwrap().into();
        let s = StepSolver::new(v + de, &p, dir).unwrap();
        let (r, t) = (s.reflection(), s.transmission());
        prop_assert!((r + t - 1.0).abs() < 1e-9, "R = {r}, T = {t}");
        prop_assert!(t > 0.0);
    }

    /// Below the step the transmitted side decays away from the boundary.
    #[test]
    fn step_decays_when_forbidden(
        x0 in -3.0f64..3.0,
        v in 0.05f64..1.0,
        frac in 0.01f64..0.99,
        d1 in 0.0f64..0.5,
        d2 in 0.0f64..0.5,
    ) {
        let p: Potential = StepPotential::new(x0, 0.0, v).unwrap().into();
        let s = StepSolver::new(frac * v, &p, Direction::LeftToRight).unwrap();
        let (near, far) = (x0 + d1.min(d2), x0 + d1.max(d2));
        let a_near = s.solve(near, 0.0).norm();
        let a_far = s.solve(far, 0.0).norm();
        prop_assert!(a_far <= a_near * (1.0 + 1e-12));
        prop_assert!((s.reflection() - 1.0).abs() < 1e-9);
        prop_assert_eq!(s.transmission(), 0.0);
    }

    #[test]
    fn single_barrier_coefficients_are_probabilities(
        p in single_barrier(),
        e in 0.001f64..2.0,
        dir in direction(),
    ) {
        let s = SingleBarrierSolver::new(e, &p, dir).unwrap();
        let (r, t) = (s.reflection(), s.transmission());
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&t), "T = {t}");
        prop_assert!((r + t - 1.0).abs() < 1e-8, "R = {r}, T = {t}");
    }

    #[test]
    fn double_barrier_coefficients_are_probabilities(
        p in double_barrier(),
        e in 0.001f64..2.0,
        dir in direction(),
    ) {
        let s = DoubleBarrierSolver::new(e, &p, dir).unwrap();
        let (r, t) = (s.reflection(), s.transmission());
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&t), "T = {t}");
        prop_assert!((r + t - 1.0).abs() < 1e-8, "R = {r}, T = {t}");
    }

    /// Transmission through a lossless potential is the same from either side.
    #[test]
    fn transmission_is_reciprocal(p in double_barrier(), e in 0.001f64..2.0) {
        let ltr = DoubleBarrierSolver::new(e, &p, Direction::LeftToRight).unwrap();
        let rtl = DoubleBarrierSolver::new(e, &p, Direction::RightToLeft).unwrap();
        prop_assert!((ltr.transmission() - rtl.transmission()).abs() < 1e-8);
    }

    /// Reverting the total energy reproduces the exact same coefficients.
    #[test]
    fn energy_round_trip(
        p in double_barrier(),
        e0 in 0.01f64..1.5,
        e1 in 0.01f64..1.5,
        dir in direction(),
    ) {
        let te = Rc::new(TotalEnergy::new(e0));
        let pe = Rc::new(PotentialEnergy::new(p));
        let solver = create_solver(&te, &pe, dir).unwrap();
        let before = solver.snapshot();
        te.set_energy(e1).unwrap();
        te.set_energy(e0).unwrap();
        prop_assert_eq!(solver.snapshot(), before);
    }
}
