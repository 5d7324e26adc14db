use criterion::{ BenchmarkId, Criterion, criterion_group, criterion_main };
use ndarray as nd;
use qtunnel::{
    potential::{ BarrierPotential, Potential },
    solver::{ Direction, PlaneWaveSolver, Solver },
    spectrum::transmission_spectrum,
};

fn pixel_counts() -> Vec<usize> {
    vec![500, 2000]
}

fn bench_solve_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_range");
    let p: Potential = BarrierPotential::double().into();
    let solver = Solver::for_potential(0.3, &p, Direction::LeftToRight).unwrap();
    for &n in &pixel_counts() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-4.0, 4.0, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &x, |b, x| {
            b.iter(|| std::hint::black_box(solver.solve_range(x, 1.0)));
        });
    }
    group.finish();
}

fn bench_solve_pointwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_pointwise");
    let p: Potential = BarrierPotential::double().into();
    let solver = Solver::for_potential(0.3, &p, Direction::LeftToRight).unwrap();
    for &n in &pixel_counts() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-4.0, 4.0, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &x, |b, x| {
            b.iter(|| {
                let psi: nd::Array1<_> = x.iter().map(|&xk| solver.solve(xk, 1.0)).collect();
                std::hint::black_box(psi)
            });
        });
    }
    group.finish();
}

fn bench_update_coefficients(c: &mut Criterion) {
    let p: Potential = BarrierPotential::double().into();
    let mut solver = Solver::for_potential(0.3, &p, Direction::LeftToRight).unwrap();
    c.bench_function("update_coefficients", |b| {
        b.iter(|| {
            solver.update_coefficients(std::hint::black_box(0.31), &p).unwrap();
        });
    });
}

fn bench_spectrum(c: &mut Criterion) {
    let p: Potential = BarrierPotential::double().into();
    let e: nd::Array1<f64> = nd::Array1::linspace(0.01, 1.0, 1000);
    c.bench_function("transmission_spectrum", |b| {
        b.iter(|| transmission_spectrum(&p, &e, Direction::LeftToRight).unwrap());
    });
}

criterion_group!(
    benches,
    bench_solve_range,
    bench_solve_pointwise,
    bench_update_coefficients,
    bench_spectrum,
);
criterion_main!(benches);
