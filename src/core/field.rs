//! Grid state for the solver passes.
//!
//! A [`Field`] is a dense `width x height` grid of four-channel cells
//! addressed with clamp-to-edge semantics. Solver passes always read one
//! field and write another; [`FieldPair`] packages that double buffering so a
//! pass can never alias its own output.

use bevy::prelude::*;

/// Dense 2D grid of `Vec4` cells.
///
/// Channel meaning depends on the pass: the velocity passes use
/// `(vx, vy, density, curl)`, the ink pass uses `(r, g, b, coverage)`.
#[derive(Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<Vec4>,
}

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "field dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![Vec4::ZERO; width * height],
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

    /// Normalized cell size `(1/width, 1/height)`.
    #[inline]
    pub fn step_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    /// Normalized coordinates of the cell center (origin bottom-left).
    #[inline]
    pub fn uv(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Cell fetch with clamp-to-edge addressing.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> Vec4 {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.cells[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: Vec4) {
        self.cells[y * self.width + x] = value;
    }

    /// Bilinear sample at a normalized position, clamped at the border.
    ///
    /// Texel centers sit at `((x + 0.5) / width, (y + 0.5) / height)`, so
    /// sampling a cell's own `uv` returns that cell exactly.
    pub fn sample_bilinear(&self, uv: Vec2) -> Vec4 {
        let pos = Vec2::new(uv.x * self.width as f32, uv.y * self.height as f32) - 0.5;
        let base = pos.floor();
        let frac = pos - base;
        let (x0, y0) = (base.x as i32, base.y as i32);

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0 + 1, y0);
        let c01 = self.texel(x0, y0 + 1);
        let c11 = self.texel(x0 + 1, y0 + 1);

        c00.lerp(c10, frac.x).lerp(c01.lerp(c11, frac.x), frac.y)
    }

    #[inline]
    pub fn cells(&self) -> &[Vec4] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Vec4] {
        &mut self.cells
    }

    pub fn fill(&mut self, value: Vec4) {
        self.cells.fill(value);
    }
}

/// Double-buffered field: `front` is read by the current pass, `back` is
/// written, then the two are exchanged by value.
///
/// At any frame boundary exactly one buffer holds the most recently computed
/// state; swapping moves whole values instead of reassigning shared handles,
/// so a stale alias onto the written buffer cannot exist.
pub struct FieldPair {
    front: Field,
    back: Field,
}

impl FieldPair {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            front: Field::new(width, height),
            back: Field::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.front.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.front.height()
    }

    #[inline]
    pub fn front(&self) -> &Field {
        &self.front
    }

    #[inline]
    pub fn back(&self) -> &Field {
        &self.back
    }

    #[inline]
    pub fn back_mut(&mut self) -> &mut Field {
        &mut self.back
    }

    /// Disjoint read view of `front` and write view of `back` for a pass that
    /// relaxes a pair in place.
    #[inline]
    pub fn views(&mut self) -> (&Field, &mut Field) {
        (&self.front, &mut self.back)
    }

    /// Exchange the buffer roles after a pass has written `back`.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}
