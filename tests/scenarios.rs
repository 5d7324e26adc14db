use ndarray as nd;
use qtunnel::{
    complex::C64,
    config::SimulationConfig,
    error::QError,
    model::{ PotentialType, TunnelingModel },
    packet::{ PacketParams, WavePacket },
    potential::{ BarrierPotential, ConstantPotential, Potential },
    solver::{ ConstantSolver, Direction, PlaneWaveSolver, Solver },
    spectrum::{ find_resonances, transmission_spectrum },
};

#[test]
fn constant_plane_wave_at_the_origin() {
    let p: Potential = ConstantPotential::new(0.0).unwrap().into();
    let s = ConstantSolver::new(1.0, &p, Direction::LeftToRight).unwrap();
    assert_eq!(s.solve(0.0, 0.0), C64::new(1.0, 0.0));
}

#[test]
fn factory_picks_barrier_solvers_by_count() {
    let one: Potential = BarrierPotential::single().into();
    let two: Potential = BarrierPotential::double().into();
    let three: Potential = BarrierPotential::new(
        &[(-2.0, 0.5), (0.0, 0.5), (2.0, 0.5)], 0.0, 0.5).unwrap().into();
    let d = Direction::LeftToRight;
    assert!(matches!(Solver::for_potential(0.3, &one, d), Ok(Solver::SingleBarrier(_))));
    assert!(matches!(Solver::for_potential(0.3, &two, d), Ok(Solver::DoubleBarrier(_))));
    assert!(matches!(
        Solver::for_potential(0.3, &three, d),
        Err(QError::UnsupportedTopology(_))
    ));
}

#[test]
fn double_barrier_has_a_sharp_resonance() {
    let p: Potential = BarrierPotential::double().into();
    let e: nd::Array1<f64> = nd::Array1::linspace(0.01, 0.49, 4000);
    let t = transmission_spectrum(&p, &e, Direction::LeftToRight).unwrap();
    let resonances = find_resonances(&e, &t).unwrap();
    assert!(!resonances.is_empty());
    let e0 = resonances[0];
    let t0 = Solver::for_potential(e0, &p, Direction::LeftToRight)
        .unwrap()
        .transmission();
    let below = Solver::for_potential(e0 - 0.02, &p, Direction::LeftToRight)
        .unwrap()
        .transmission();
    let above = Solver::for_potential(e0 + 0.02, &p, Direction::LeftToRight)
        .unwrap()
        .transmission();
    assert!(t0 > 5.0 * below.max(above), "T = {below}, {t0}, {above}");
}

#[test]
fn packet_splits_at_a_barrier() {
    let p: Potential = BarrierPotential::single().into();
    let params = PacketParams { energy: 0.4, ..Default::default() };
    let mut packet = WavePacket::new(&p, params).unwrap();
    assert!(packet.transmitted_probability() < 1e-6);
    packet.evolve(8.0, 0.01).unwrap();
    let (r, t) = (packet.reflected_probability(), packet.transmitted_probability());
    assert!((packet.total_probability() - 1.0).abs() < 1e-9);
    assert!(t > 0.05 && r > 0.05, "R = {r}, T = {t}");
}

#[test]
fn model_from_default_config() {
    let mut model = TunnelingModel::from_config(&SimulationConfig::default()).unwrap();
    assert_eq!(model.potential_type(), PotentialType::SingleBarrier);
    for ty in PotentialType::ALL {
        model.set_potential_type(ty).unwrap();
        let r = model.solver().reflection();
        let t = model.solver().transmission();
        assert!((r + t - 1.0).abs() < 1e-9, "{ty:?}: R = {r}, T = {t}");
    }
}
