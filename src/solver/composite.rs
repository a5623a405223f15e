//! Composite pass
//!
//! Maps the accumulated ink field to display bytes: optional pixelation with
//! darkened block borders, bottom-row blanking and a square-root tone curve
//! (cheap gamma). This is the only buffer the host ever presents.

use bevy::prelude::*;
use bevy::tasks::ParallelSliceMut;

use crate::config::FluidParams;
use crate::core::Field;
use crate::solver::task_pool;

/// Number of bytes per display pixel (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Tone-map `color` into `out`, a tightly packed RGBA8 image.
///
/// Output rows run top to bottom as textures expect, while the field's row 0
/// is the bottom of the viewport; the pass flips vertically while writing.
pub fn composite_pass(color: &Field, params: &FluidParams, mut out: &mut [u8]) {
    let width = color.width();
    let height = color.height();
    debug_assert_eq!(out.len(), width * height * BYTES_PER_PIXEL);

    out.par_chunk_map_mut(task_pool(), width * BYTES_PER_PIXEL, |row, bytes| {
        let y = height - 1 - row;
        for (x, pixel) in bytes.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let rgb = composite_cell(color, x, y, params);
            pixel[0] = (rgb.x * 255.0 + 0.5) as u8;
            pixel[1] = (rgb.y * 255.0 + 0.5) as u8;
            pixel[2] = (rgb.z * 255.0 + 0.5) as u8;
            pixel[3] = 255;
        }
    });
}

/// Display color of one cell, in linear `[0, 1]` per channel after the tone
/// curve.
pub fn composite_cell(color: &Field, x: usize, y: usize, params: &FluidParams) -> Vec3 {
    let step = color.step_size();
    let uv = color.uv(x, y);

    let mut col = if params.pixelated {
        // Quantize the sample position to the block origin.
        let dxy = params.pixel_size * step;
        let quantized = dxy * (uv / dxy).floor() + step;
        let mut col = color.sample_bilinear(quantized);

        // Darken the trailing edge of each block to draw a grid line. Offsets
        // are measured from the pixel center so the edge rule can trigger on
        // the last row and column of a block.
        let offset = Vec2::new(
            params.pixel_size * (((x as f32 + 0.5) / params.pixel_size).fract() - 0.5),
            params.pixel_size * (((y as f32 + 0.5) / params.pixel_size).fract() - 0.5),
        );
        if offset.x.max(offset.y) + params.border_thickness - params.pixel_size * 0.5 > 0.0 {
            col = Vec4::ZERO;
        }
        col
    } else {
        color.texel(x as i32, y as i32)
    };

    // Blank the bottommost rows; the edge clamp makes them sample artifacts.
    let cutoff = if params.pixelated { params.pixel_size } else { 1.0 };
    if (y as f32 + 0.5) < cutoff {
        col = Vec4::ZERO;
    }

    let mut rgb = col.truncate().clamp(Vec3::ZERO, Vec3::ONE);
    if params.invert_colors {
        rgb = Vec3::ONE - rgb;
    }
    Vec3::new(rgb.x.sqrt(), rgb.y.sqrt(), rgb.z.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_color(width: usize, height: usize, value: f32) -> Field {
        let mut field = Field::new(width, height);
        field.fill(Vec4::new(value, value, value, 1.0));
        field
    }

    fn run_pass(color: &Field, params: &FluidParams) -> Vec<u8> {
        let mut out = vec![0u8; color.width() * color.height() * BYTES_PER_PIXEL];
        composite_pass(color, params, &mut out);
        out
    }

    #[test]
    fn tone_curve_is_square_root() {
        let color = uniform_color(4, 4, 0.25);
        let rgb = composite_cell(&color, 1, 2, &FluidParams::default());
        assert_eq!(rgb, Vec3::splat(0.5));
    }

    #[test]
    fn inversion_flips_before_the_tone_curve() {
        let color = uniform_color(4, 4, 0.0);
        let params = FluidParams::default().with_inverted_colors();
        assert_eq!(composite_cell(&color, 1, 2, &params), Vec3::ONE);
    }

    #[test]
    fn accumulated_ink_saturates_to_white() {
        // Ink can accumulate up to 5.0; display output still caps at 1.0.
        let color = uniform_color(4, 4, 5.0);
        let rgb = composite_cell(&color, 2, 2, &FluidParams::default());
        assert_eq!(rgb, Vec3::ONE);
    }

    #[test]
    fn bottom_row_is_blanked() {
        let color = uniform_color(8, 8, 1.0);
        let out = run_pass(&color, &FluidParams::default());

        // Field row 0 lands in the last byte row of the flipped image.
        let last_row = &out[out.len() - 8 * BYTES_PER_PIXEL..];
        for pixel in last_row.chunks_exact(BYTES_PER_PIXEL) {
            assert_eq!(&pixel[..3], &[0, 0, 0]);
            assert_eq!(pixel[3], 255);
        }

        // The row above survives.
        let second_row = &out[out.len() - 16 * BYTES_PER_PIXEL..out.len() - 8 * BYTES_PER_PIXEL];
        assert!(second_row.chunks_exact(BYTES_PER_PIXEL).all(|p| p[0] == 255));
    }

    #[test]
    fn pixelation_darkens_block_borders() {
        let color = uniform_color(27, 27, 1.0);
        let params = FluidParams::default().with_pixelation(9.0);

        // Interior of a block keeps its color, trailing edge goes dark.
        assert!(composite_cell(&color, 12, 12, &params).x > 0.0);
        assert_eq!(composite_cell(&color, 17, 12, &params), Vec3::ZERO);
        assert_eq!(composite_cell(&color, 12, 17, &params), Vec3::ZERO);
    }
}
