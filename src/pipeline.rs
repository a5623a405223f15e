//! Frame pipeline
//!
//! Owns every double-buffered field and sequences the solver passes each
//! tick: three chained velocity relaxation sweeps, the ink advection pass and
//! the composite pass, in that order with strict data dependencies. Kernels
//! only ever see read-only and write-only views handed out here, so no pass
//! can alias its own output.

use bevy::prelude::*;

use crate::config::FluidParams;
use crate::core::{Field, FieldPair, PointerTracker};
use crate::solver::composite::BYTES_PER_PIXEL;
use crate::solver::{composite_pass, ink_pass, relax_pass};

/// All simulation state for one viewport.
///
/// Per tick the three velocity pairs relax in sequence (A feeds B feeds C),
/// the ink pair advects by C's output, and the composite writes the display
/// bytes. Each step's output is the next step's input; reordering is not
/// permitted.
#[derive(Resource)]
pub struct FluidPipeline {
    width: usize,
    height: usize,
    pass_a: FieldPair,
    pass_b: FieldPair,
    pass_c: FieldPair,
    color: FieldPair,
    display: Vec<u8>,
}

impl FluidPipeline {
    pub fn new(width: usize, height: usize) -> Self {
        info!("allocating fluid pipeline at {width}x{height}");
        Self {
            width,
            height,
            pass_a: FieldPair::new(width, height),
            pass_b: FieldPair::new(width, height),
            pass_c: FieldPair::new(width, height),
            color: FieldPair::new(width, height),
            display: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate every field pair at a new resolution. Simulation state
    /// resets to empty; the old content is not resampled.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        info!(
            "resizing fluid pipeline {}x{} -> {width}x{height}",
            self.width, self.height
        );
        *self = Self::new(width, height);
    }

    /// Advance the simulation by one frame.
    ///
    /// `elapsed` is seconds since startup, used only to seed splat hues.
    pub fn tick(&mut self, pointer: &PointerTracker, params: &FluidParams, elapsed: f32) {
        // Pass A relaxes its own pair in place.
        {
            let (front, back) = self.pass_a.views();
            relax_pass(front, back, pointer, params);
        }
        self.pass_a.swap();

        // Passes B and C each consume the previous pass's fresh front.
        relax_pass(self.pass_a.front(), self.pass_b.back_mut(), pointer, params);
        self.pass_b.swap();

        relax_pass(self.pass_b.front(), self.pass_c.back_mut(), pointer, params);
        self.pass_c.swap();

        // Ink advects by the final relaxed velocity, never an intermediate.
        let (ink_front, ink_back) = self.color.views();
        ink_pass(self.pass_c.front(), ink_front, ink_back, pointer, params, elapsed);

        // Composite reads the freshly written ink buffer, then the color pair
        // swaps for the next frame.
        composite_pass(self.color.back(), params, &mut self.display);
        self.color.swap();
    }

    /// Final relaxed velocity field of the last tick.
    pub fn velocity(&self) -> &Field {
        self.pass_c.front()
    }

    /// Ink field of the last tick.
    pub fn ink(&self) -> &Field {
        self.color.front()
    }

    /// RGBA8 display image of the last tick, rows top to bottom.
    pub fn display(&self) -> &[u8] {
        &self.display
    }
}
