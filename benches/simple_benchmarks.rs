/// Simple custom benchmarking without criterion
use std::time::Instant;

use bevy::prelude::*;
use ink2d::solver::relax_pass;
use ink2d::{Field, FluidParams, FluidPipeline, PointerTracker};
use rand::Rng;

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

fn random_field(width: usize, height: usize) -> Field {
    let mut rng = rand::rng();
    let mut field = Field::new(width, height);
    for y in 0..height {
        for x in 0..width {
            field.set(
                x,
                y,
                Vec4::new(
                    rng.random_range(-4.0..=4.0),
                    rng.random_range(-4.0..=4.0),
                    rng.random_range(0.5..=3.0),
                    rng.random_range(-0.25..=0.25),
                ),
            );
        }
    }
    field
}

fn stirring_pointer() -> PointerTracker {
    let mut pointer = PointerTracker::default();
    pointer.move_to(Vec2::new(0.45, 0.5), 0.0);
    pointer.move_to(Vec2::new(0.5, 0.52), 0.0);
    pointer
}

fn main() {
    let params = FluidParams::default();
    let pointer = stirring_pointer();

    let (width, height) = (960, 540);
    let front = random_field(width, height);
    let mut back = Field::new(width, height);
    time_it("relax_pass 960x540", 50, || {
        relax_pass(&front, &mut back, &pointer, &params);
    });

    let mut pipeline = FluidPipeline::new(width, height);
    let mut elapsed = 0.0;
    time_it("full tick 960x540", 50, || {
        elapsed += 1.0 / 60.0;
        pipeline.tick(&pointer, &params, elapsed);
    });
}
