use anyhow::{Result, ensure};
use bevy::prelude::*;

use super::constants;

/// Solver parameters for the fluid and ink passes.
///
/// Fixed for the lifetime of a pipeline; [`FluidParams::validate`] is run once
/// at startup so bad values surface before the first tick instead of as
/// silent visual divergence.
#[derive(Resource, Clone)]
pub struct FluidParams {
    /// Integration time step per relaxation pass.
    pub dt: f32,

    /// Vorticity confinement strength (0.0 disables it, max 0.3).
    pub vorticity_threshold: f32,

    /// Stability clamp on velocity components.
    pub velocity_threshold: f32,

    /// Diffusion strength (higher means lower viscosity, max 0.8).
    pub viscosity_threshold: f32,

    /// Fraction of accumulated ink removed each tick.
    pub ink_decay: f32,

    /// Ink back-trace scale relative to the velocity passes.
    pub advection_scale: f32,

    /// Quantize the composite output into coarse blocks.
    pub pixelated: bool,

    /// Block edge length in display pixels when pixelated.
    pub pixel_size: f32,

    /// Darkened border width inside each block, in display pixels.
    pub border_thickness: f32,

    /// Invert the composite output before the tone curve.
    pub invert_colors: bool,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            dt: constants::DT,
            vorticity_threshold: constants::VORTICITY_THRESHOLD,
            velocity_threshold: constants::VELOCITY_THRESHOLD,
            viscosity_threshold: constants::VISCOSITY_THRESHOLD,
            ink_decay: constants::INK_DECAY,
            advection_scale: constants::ADVECTION_SCALE,
            pixelated: false,
            pixel_size: constants::PIXEL_SIZE,
            border_thickness: constants::BORDER_THICKNESS,
            invert_colors: false,
        }
    }
}

impl FluidParams {
    /// Enable the pixelated composite with the given block size.
    pub fn with_pixelation(mut self, pixel_size: f32) -> Self {
        self.pixelated = true;
        self.pixel_size = pixel_size.max(1.0);
        self
    }

    /// Invert composite colors.
    pub fn with_inverted_colors(mut self) -> Self {
        self.invert_colors = true;
        self
    }

    /// Set vorticity confinement strength (clamped to the stable range).
    pub fn with_vorticity_threshold(mut self, threshold: f32) -> Self {
        self.vorticity_threshold = threshold.clamp(0.0, 0.3);
        self
    }

    /// Check every parameter against its stable range.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.dt > 0.0, "dt must be positive, got {}", self.dt);
        ensure!(
            (0.0..=0.3).contains(&self.vorticity_threshold),
            "vorticity_threshold must lie in [0, 0.3], got {}",
            self.vorticity_threshold
        );
        ensure!(
            self.velocity_threshold > 0.0,
            "velocity_threshold must be positive, got {}",
            self.velocity_threshold
        );
        ensure!(
            self.viscosity_threshold > 0.0 && self.viscosity_threshold <= 0.8,
            "viscosity_threshold must lie in (0, 0.8], got {}",
            self.viscosity_threshold
        );
        ensure!(
            (0.0..1.0).contains(&self.ink_decay),
            "ink_decay must lie in [0, 1), got {}",
            self.ink_decay
        );
        ensure!(
            self.advection_scale > 0.0,
            "advection_scale must be positive, got {}",
            self.advection_scale
        );
        ensure!(
            self.pixel_size >= 1.0,
            "pixel_size must be at least one display pixel, got {}",
            self.pixel_size
        );
        ensure!(
            self.border_thickness >= 0.0,
            "border_thickness must be non-negative, got {}",
            self.border_thickness
        );
        Ok(())
    }
}
