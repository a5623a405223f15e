//! Ink advection kernel
//!
//! Advects the color field by the final relaxed velocity, injects hue-cycling
//! splats at an active pointer and applies the dissipation clamp. Unlike the
//! velocity passes there is no diffusion term; ink only moves, accumulates
//! and decays.

use bevy::prelude::*;
use bevy::tasks::ParallelSliceMut;

use crate::config::{FluidParams, INK_MAX, SPLAT_FALLOFF_POWER, SPLAT_GAIN};
use crate::core::{Field, PointerTracker};
use crate::math::{hash1, hsv_to_rgb, smoothstep};
use crate::solver::task_pool;

/// Advect `color_front` by `velocity` into `color_back`, splatting at the
/// pointer when both the current and previous samples are active.
///
/// `elapsed` is wall-clock seconds since startup and only seeds the hue hash.
pub fn ink_pass(
    velocity: &Field,
    color_front: &Field,
    color_back: &mut Field,
    pointer: &PointerTracker,
    params: &FluidParams,
    elapsed: f32,
) {
    debug_assert_eq!(velocity.width(), color_front.width());
    debug_assert_eq!(velocity.height(), color_front.height());
    debug_assert_eq!(color_front.width(), color_back.width());
    debug_assert_eq!(color_front.height(), color_back.height());

    let width = velocity.width();
    let step = velocity.step_size();
    let mouse = pointer.current;
    let prev = pointer.previous;

    let splat = if mouse.is_active() && prev.is_active() {
        let seed = mouse.active + width as f32 * mouse.active.abs() + elapsed;
        let hue = hash1(seed as u32);
        let rgb = hsv_to_rgb(hue, 1.0, 1.0).extend(1.0);
        // Bloom widens with the drag distance of the stroke.
        let bloom = smoothstep(-0.5, 0.5, mouse.position.distance(prev.position));
        Some(rgb * bloom * SPLAT_GAIN)
    } else {
        None
    };

    color_back
        .cells_mut()
        .par_chunk_map_mut(task_pool(), width, |row, cells| {
            for (x, cell) in cells.iter_mut().enumerate() {
                let uv = velocity.uv(x, row);
                let vel = velocity.texel(x as i32, row as i32);

                // Pure back-traced advection of the previous ink state.
                let history_uv =
                    uv - params.dt * Vec2::new(vel.x, vel.y) * step * params.advection_scale;
                let mut color = color_front.sample_bilinear(history_uv);

                if let Some(splat) = splat {
                    let dist = uv.distance(mouse.position);
                    color += splat / dist.powf(SPLAT_FALLOFF_POWER).max(1e-6);
                }

                // Saturation clamp, then exponential-style dissipation.
                color = color.clamp(Vec4::ZERO, Vec4::splat(INK_MAX));
                *cell = (color - color * params.ink_decay).max(Vec4::ZERO);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_pass(
        velocity: &Field,
        color: &Field,
        pointer: &PointerTracker,
        elapsed: f32,
    ) -> Field {
        let mut back = Field::new(color.width(), color.height());
        ink_pass(
            velocity,
            color,
            &mut back,
            pointer,
            &FluidParams::default(),
            elapsed,
        );
        back
    }

    fn active_pointer_at(position: Vec2) -> PointerTracker {
        let mut tracker = PointerTracker::default();
        tracker.move_to(position, 0.0);
        tracker.move_to(position, 0.0);
        tracker
    }

    #[test]
    fn idle_ink_decays_monotonically_toward_zero() {
        let params = FluidParams::default();
        let velocity = Field::new(8, 8);
        let mut color = Field::new(8, 8);
        color.fill(Vec4::new(0.5, 0.25, 1.0, 1.0));

        for _ in 0..4 {
            let next = run_pass(&velocity, &color, &PointerTracker::default(), 0.0);
            for (&after, &before) in next.cells().iter().zip(color.cells()) {
                assert!(after.x <= before.x && after.y <= before.y && after.z <= before.z);
                assert!(after.cmpge(Vec4::ZERO).all());
            }
            // With zero velocity the advection is an identity, so the decay
            // step is exact.
            let before = color.texel(3, 3);
            assert_eq!(next.texel(3, 3), before - before * params.ink_decay);
            color = next;
        }
    }

    #[test]
    fn zero_ink_stays_zero_without_input() {
        let velocity = Field::new(8, 8);
        let color = Field::new(8, 8);
        let next = run_pass(&velocity, &color, &PointerTracker::default(), 1.0);
        assert!(next.cells().iter().all(|&c| c == Vec4::ZERO));
    }

    #[test]
    fn splat_requires_two_active_frames() {
        let velocity = Field::new(8, 8);
        let color = Field::new(8, 8);

        // Only the current sample is active: edge-trigger must not fire.
        let mut tracker = PointerTracker::default();
        tracker.move_to(Vec2::new(0.5, 0.5), 0.0);
        let next = run_pass(&velocity, &color, &tracker, 0.0);
        assert!(next.cells().iter().all(|&c| c == Vec4::ZERO));
    }

    #[test]
    fn splat_intensity_peaks_at_the_pointer() {
        let velocity = Field::new(32, 32);
        let color = Field::new(32, 32);
        let pointer = active_pointer_at(Vec2::new(0.5, 0.5));

        let next = run_pass(&velocity, &color, &pointer, 2.5);

        let center = next.texel(16, 16).truncate().length();
        let mid = next.texel(22, 16).truncate().length();
        let far = next.texel(30, 30).truncate().length();
        assert!(center > 0.0, "cells at the pointer must receive ink");
        assert!(center > mid, "intensity must fall off with distance");
        assert!(mid > far, "falloff must be monotone outward");
    }

    #[test]
    fn splat_color_is_clamped_before_decay() {
        let velocity = Field::new(8, 8);
        let mut color = Field::new(8, 8);
        color.fill(Vec4::splat(INK_MAX));
        let pointer = active_pointer_at(Vec2::new(0.5, 0.5));

        let params = FluidParams::default();
        let next = run_pass(&velocity, &color, &pointer, 0.0);
        for &cell in next.cells() {
            assert!(cell.cmple(Vec4::splat(INK_MAX)).all());
            // Post-decay ceiling: clamp happens first, decay second.
            let ceiling = INK_MAX - INK_MAX * params.ink_decay;
            assert!(cell.cmple(Vec4::splat(ceiling)).all());
        }
    }
}
