use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pendulum::{dynamics, InitialState, PhysicalParameters, Simulation, FRAME_DT};

fn bench_frame_step(c: &mut Criterion) {
    let mut sim = Simulation::new(InitialState::REFERENCE, PhysicalParameters::default())
        .expect("default parameters are valid");
    c.bench_function("frame_step", |b| {
        b.iter(|| sim.step(black_box(FRAME_DT)).expect("step failed"));
    });
}

fn bench_derivative(c: &mut Criterion) {
    let params = PhysicalParameters::default();
    let state = InitialState::REFERENCE.to_radians();
    c.bench_function("derivative", |b| {
        b.iter(|| dynamics::derivative(black_box(&state), 0.0, black_box(&params)));
    });
}

criterion_group!(benches, bench_frame_step, bench_derivative);
criterion_main!(benches);
