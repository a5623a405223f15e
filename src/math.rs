//! Shader-style math helpers shared by the solver kernels.

use bevy::prelude::*;

/// Hermite smoothstep. Edges may be given in falling order for a
/// decreasing curve, matching GLSL semantics.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic integer hash mapped to `[0, 1]`, used to pick splat hues.
#[inline]
pub fn hash1(mut n: u32) -> f32 {
    n = (n << 13) ^ n;
    n = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589);
    (n & 0x7fff_ffff) as f32 / 0x7fff_ffff as f32
}

/// HSV to RGB with smoothed band transitions.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let band = |offset: f32| {
        let x = (((h * 6.0 + offset).rem_euclid(6.0) - 3.0).abs() - 1.0).clamp(0.0, 1.0);
        x * x * (3.0 - 2.0 * x)
    };
    let rgb = Vec3::new(band(0.0), band(4.0), band(2.0));
    Vec3::ONE.lerp(rgb, s) * v
}
