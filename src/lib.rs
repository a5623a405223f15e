use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub mod config;
pub mod core;
pub mod math;
pub mod pipeline;
pub mod solver;

// Public re-exports for clean API
pub use crate::config::FluidParams;
pub use crate::core::{Field, FieldPair, PointerState, PointerTracker};
pub use crate::pipeline::FluidPipeline;

/// System set wrapping the per-frame simulation step. Hosts feed pointer
/// input in systems ordered before this set and present the display buffer
/// after it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FluidStep;

/// Bevy integration for the ink fluid pipeline.
///
/// Owns the [`FluidPipeline`] resource: allocates it against the primary
/// window at startup and reallocates on viewport resizes. Everything else
/// (camera, pointer feed, presentation) stays with the host.
pub struct InkFluidPlugin {
    /// Divisor applied to the window's physical resolution when sizing the
    /// simulation grid. 1 simulates at native resolution.
    pub downsample: u32,
    pub params: FluidParams,
}

impl Default for InkFluidPlugin {
    fn default() -> Self {
        Self {
            downsample: 1,
            params: FluidParams::default(),
        }
    }
}

#[derive(Resource, Clone, Copy)]
struct Downsample(u32);

impl Plugin for InkFluidPlugin {
    fn build(&self, app: &mut App) {
        // Bad parameters are fatal before the first tick rather than a
        // slowly diverging picture.
        if let Err(err) = self.params.validate() {
            panic!("invalid fluid parameters: {err}");
        }

        app.insert_resource(self.params.clone())
            .insert_resource(Downsample(self.downsample.max(1)))
            .init_resource::<PointerTracker>()
            .add_systems(Startup, setup_pipeline)
            .add_systems(
                Update,
                (sync_resolution, advance_simulation)
                    .chain()
                    .in_set(FluidStep),
            );
    }
}

fn target_resolution(window: Option<&Window>, downsample: u32) -> (usize, usize) {
    let (width, height) = window
        .map(|w| (w.physical_width(), w.physical_height()))
        .unwrap_or((640, 360));
    (
        (width / downsample).max(1) as usize,
        (height / downsample).max(1) as usize,
    )
}

fn setup_pipeline(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    downsample: Res<Downsample>,
) {
    let (width, height) = target_resolution(windows.single().ok(), downsample.0);
    commands.insert_resource(FluidPipeline::new(width, height));
}

/// Track viewport resizes; reallocation resets the simulation state.
fn sync_resolution(
    windows: Query<&Window, With<PrimaryWindow>>,
    downsample: Res<Downsample>,
    mut pipeline: ResMut<FluidPipeline>,
) {
    let (width, height) = target_resolution(windows.single().ok(), downsample.0);
    pipeline.resize(width, height);
}

fn advance_simulation(
    time: Res<Time>,
    pointer: Res<PointerTracker>,
    params: Res<FluidParams>,
    mut pipeline: ResMut<FluidPipeline>,
) {
    pipeline.tick(&pointer, &params, time.elapsed_secs());
}
