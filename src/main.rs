use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;

use ink2d::{FluidParams, FluidPipeline, FluidStep, InkFluidPlugin, PointerTracker};

/// Simulate at half the physical resolution; the sprite upscales the result.
const DOWNSAMPLE: u32 = 2;

/// Strength fed to the pointer while the left button is held. Above the 1.0
/// guard threshold, so dragging with the button down engages the
/// inverse-square force on top of the ordinary nudge.
const PRESSED_STRENGTH: f32 = 2.0;

#[derive(Resource)]
struct DisplayTarget {
    image: Handle<Image>,
    size: (usize, usize),
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "ink2d".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(InkFluidPlugin {
            downsample: DOWNSAMPLE,
            params: FluidParams::default(),
        })
        .add_systems(Startup, setup)
        .add_systems(Update, feed_pointer.before(FluidStep))
        .add_systems(Update, present.after(FluidStep))
        .run();
}

fn display_image(width: u32, height: u32) -> Image {
    // The composite already applies its own tone curve, so the texture stays
    // linear instead of Srgb.
    Image::new_fill(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    commands.spawn(Camera2d);

    let (width, height, logical) = windows
        .single()
        .map(|w| {
            (
                (w.physical_width() / DOWNSAMPLE).max(1),
                (w.physical_height() / DOWNSAMPLE).max(1),
                Vec2::new(w.width(), w.height()),
            )
        })
        .unwrap_or((640, 360, Vec2::new(1280.0, 720.0)));

    let image = images.add(display_image(width, height));
    commands.spawn((
        Sprite {
            image: image.clone(),
            custom_size: Some(logical),
            ..default()
        },
        Transform::default(),
    ));
    commands.insert_resource(DisplayTarget {
        image,
        size: (width as usize, height as usize),
    });
}

/// Poll the cursor into the pointer tracker. A position change records a
/// move event; losing the cursor records a leave event.
fn feed_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerTracker>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    match window.cursor_position() {
        Some(position) => {
            // Cursor coordinates are top-left origin; the solver wants
            // bottom-left.
            let normalized = Vec2::new(
                position.x / window.width(),
                1.0 - position.y / window.height(),
            );
            if !pointer.current.is_active() || normalized != pointer.current.position {
                let strength = if buttons.pressed(MouseButton::Left) {
                    PRESSED_STRENGTH
                } else {
                    0.0
                };
                pointer.move_to(normalized, strength);
            }
        }
        None => {
            if pointer.current.is_active() {
                pointer.leave();
            }
        }
    }
}

/// Upload the latest composite output into the sprite's texture, recreating
/// it when the pipeline was resized.
fn present(
    pipeline: Res<FluidPipeline>,
    mut target: ResMut<DisplayTarget>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<&mut Sprite>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let size = (pipeline.width(), pipeline.height());
    if size != target.size {
        target.size = size;
        images.insert(&target.image, display_image(size.0 as u32, size.1 as u32));
    }

    if let Some(image) = images.get_mut(&target.image) {
        if let Some(data) = image.data.as_mut() {
            data.copy_from_slice(pipeline.display());
        }
    }

    if let (Ok(mut sprite), Ok(window)) = (sprites.single_mut(), windows.single()) {
        sprite.custom_size = Some(Vec2::new(window.width(), window.height()));
    }
}
