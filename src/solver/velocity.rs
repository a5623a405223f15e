//! Velocity relaxation kernel
//!
//! One pass advects, diffuses and re-energizes the velocity field while
//! transporting the density channel and storing curl in the aux channel.
//! Three of these passes are chained per displayed frame; each is a pure
//! function of the previous pass's output, so a pass never observes its own
//! writes.

use bevy::prelude::*;
use bevy::tasks::ParallelSliceMut;

use crate::config::{
    DENSITY_INVARIANCE_K, DENSITY_MAX, DENSITY_MIN, DRAG_CLAMP, DRAG_FORCE_GAIN, DRAG_SCALE,
    FluidParams, NUDGE_GAIN, NUDGE_RADIUS, VELOCITY_DECAY,
};
use crate::core::{Field, PointerTracker};
use crate::math::smoothstep;
use crate::solver::task_pool;

/// One relaxation sweep: reads `front`, writes every cell of `back`.
///
/// Rows are independent within a pass, so they are mapped in parallel on the
/// compute pool; cells only ever read `front`, which stays immutable for the
/// whole sweep.
pub fn relax_pass(
    front: &Field,
    back: &mut Field,
    pointer: &PointerTracker,
    params: &FluidParams,
) {
    debug_assert_eq!(front.width(), back.width());
    debug_assert_eq!(front.height(), back.height());

    let width = front.width();
    back.cells_mut()
        .par_chunk_map_mut(task_pool(), width, |row, cells| {
            for (x, cell) in cells.iter_mut().enumerate() {
                *cell = relax_cell(front, x, row, pointer, params);
            }
        });
}

/// Per-cell relaxation update. Pure function of the front-buffer neighborhood
/// and the pointer pair.
pub fn relax_cell(
    front: &Field,
    x: usize,
    y: usize,
    pointer: &PointerTracker,
    params: &FluidParams,
) -> Vec4 {
    let step = front.step_size();
    let uv = front.uv(x, y);
    let (xi, yi) = (x as i32, y as i32);

    let center = front.texel(xi, yi);
    let fr = front.texel(xi + 1, yi);
    let fl = front.texel(xi - 1, yi);
    let ft = front.texel(xi, yi + 1);
    let fd = front.texel(xi, yi - 1);

    let ddx = (fr - fl).truncate() * 0.5;
    let ddy = (ft - fd).truncate() * 0.5;
    let divergence = ddx.x + ddy.y;
    let density_gradient = Vec2::new(ddx.z, ddy.z);

    let mut data = center;

    // Density transport from the local gradient and divergence.
    data.z -= params.dt
        * Vec3::new(density_gradient.x, density_gradient.y, divergence).dot(data.truncate());

    // Viscous diffusion of the velocity channels.
    let laplacian = (fr + fl + ft + fd - 4.0 * center).truncate().truncate();
    let viscosity_force = params.viscosity_threshold * laplacian;

    // Semi-Lagrangian advection: back-trace along the current velocity and
    // pull velocity and aux from the history sample. Density keeps the value
    // computed above.
    let density_invariance = (DENSITY_INVARIANCE_K / params.dt) * density_gradient;
    let history = front.sample_bilinear(uv - params.dt * Vec2::new(data.x, data.y) * step);
    data.x = history.x;
    data.y = history.y;
    data.w = history.w;

    // Inverse-square pointer force. The guard compares the current strength
    // channel and the previous flag channel against 1.0, so plain binary
    // activation never trips it; see the characterization test below.
    let mouse = pointer.current;
    let prev = pointer.previous;
    let mut ext_force = Vec2::ZERO;
    if mouse.strength > 1.0 && prev.active > 1.0 {
        let drag = ((mouse.position - prev.position) * step * DRAG_SCALE)
            .clamp(Vec2::splat(-DRAG_CLAMP), Vec2::splat(DRAG_CLAMP));
        let offset = uv - mouse.position;
        ext_force += DRAG_FORCE_GAIN / offset.length_squared().max(1e-5) * drag;
    }

    let mut velocity = Vec2::new(data.x, data.y)
        + params.dt * (viscosity_force - density_invariance + ext_force);

    // Constant-magnitude decay toward rest.
    velocity = (velocity.abs() - VELOCITY_DECAY).max(Vec2::ZERO) * velocity.signum();

    // Curl into the aux channel, then vorticity confinement.
    let curl = fd.x - ft.x + fr.y - fl.y;
    data.w = curl;
    let mut vorticity = Vec2::new(ft.w.abs() - fd.w.abs(), fl.w.abs() - fr.w.abs());
    vorticity *= params.vorticity_threshold / (vorticity.length() + 1e-5) * curl;
    velocity += vorticity;

    // Smooth no-slip damping toward the grid border.
    velocity.y *= smoothstep(0.8, 0.48, (uv.y - 0.5).abs());
    velocity.x *= smoothstep(0.5, 0.49, (uv.x - 0.5).abs());

    // Direct velocity nudge in a small radius around an active pointer; this
    // is the path that stirs the fluid under ordinary binary activation.
    if mouse.is_active() {
        let dist = uv.distance(mouse.position);
        if dist < NUDGE_RADIUS {
            velocity += (mouse.position - prev.position) * (1.0 - dist / NUDGE_RADIUS) * NUDGE_GAIN;
        }
    }

    data.x = velocity.x;
    data.y = velocity.y;

    // Stability clamp: the solver's only guard against divergence.
    let vt = params.velocity_threshold;
    let wt = params.vorticity_threshold;
    data.clamp(
        Vec4::new(-vt, -vt, DENSITY_MIN, -wt),
        Vec4::new(vt, vt, DENSITY_MAX, wt),
    )
}
