// Solver constants for the ink fluid pipeline

/// Explicit integration time step used by every solver pass.
pub const DT: f32 = 0.15;

/// Vorticity confinement strength. 0 disables confinement, practical max 0.3.
pub const VORTICITY_THRESHOLD: f32 = 0.25;
/// Hard bound on velocity components after each relaxation pass.
pub const VELOCITY_THRESHOLD: f32 = 24.0;
/// Diffusion strength. Higher means lower effective viscosity, practical max 0.8.
pub const VISCOSITY_THRESHOLD: f32 = 0.64;

// Density channel clamp range; DENSITY_MIN doubles as the rest density of an
// empty grid.
pub const DENSITY_MIN: f32 = 0.5;
pub const DENSITY_MAX: f32 = 3.0;

/// Coupling constant for the density-invariance force (`k / dt` per pass).
pub const DENSITY_INVARIANCE_K: f32 = 0.2;
/// Constant velocity magnitude removed every pass (dissipation floor).
pub const VELOCITY_DECAY: f32 = 5e-6;

// Pointer forcing.
pub const DRAG_SCALE: f32 = 600.0;
pub const DRAG_CLAMP: f32 = 10.0;
pub const DRAG_FORCE_GAIN: f32 = 1e-3;
/// Normalized radius of the direct velocity nudge around an active pointer.
pub const NUDGE_RADIUS: f32 = 0.05;
pub const NUDGE_GAIN: f32 = 0.01;

// Ink field.
pub const INK_DECAY: f32 = 8e-3;
pub const INK_MAX: f32 = 5.0;
/// Ink back-trace scale relative to the velocity passes.
pub const ADVECTION_SCALE: f32 = 3.0;
pub const SPLAT_GAIN: f32 = 8e-4;
pub const SPLAT_FALLOFF_POWER: f32 = 1.6;

// Composite defaults.
pub const PIXEL_SIZE: f32 = 9.0;
pub const BORDER_THICKNESS: f32 = 0.51;
