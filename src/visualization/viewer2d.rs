use anyhow::{bail, Result};
use bevy::app::AppExit;
use bevy::input::mouse::MouseWheel;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowResolution};

use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, Bounds};
use crate::visualization::camera::Camera as ViewCamera;

/// Component tagging each sprite with the id of the body it draws
#[derive(Component)]
struct BodyId(pub u32);

/// Size the sprite was spawned with, merges grow bodies past it
#[derive(Component)]
struct BaseSize(Vec2);

#[derive(Resource)]
struct CameraState(ViewCamera);

#[derive(Resource)]
struct DrawBounds(bool);

const BOUNDS_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);

// fallback fill for bodies without a sprite
const PALETTE: [Color; 4] = [
    Color::srgb(0.35, 0.55, 1.0),
    Color::srgb(1.0, 0.75, 0.3),
    Color::srgb(0.9, 0.35, 0.35),
    Color::srgb(0.8, 0.8, 0.8),
];

fn body_size(b: &Body) -> Vec2 {
    match b.bounds {
        Bounds::Box { w, h } => Vec2::new(w as f32, h as f32),
        Bounds::Circle { r } => Vec2::splat(2.0 * r as f32),
    }
}

fn body_transform(b: &Body, base: Vec2) -> Transform {
    let size = body_size(b);
    Transform {
        translation: Vec3::new(b.x.x as f32, b.x.y as f32, b.id as f32 * 0.01),
        rotation: Quat::from_rotation_z(b.rot as f32),
        scale: (size / base).extend(1.0),
    }
}

/// Open the viewer window and run the scenario until the window closes,
/// `q` is pressed or the end time is reached
pub fn run_2d(scenario: Scenario) -> Result<()> {
    let window = scenario.window.clone();
    let camera = ViewCamera::new(&scenario.camera, window.width as f64, window.height as f64);

    let exit = App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(CameraState(camera))
        .insert_resource(DrawBounds(window.draw_bounds))
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title.clone(),
                resolution: WindowResolution::new(window.width, window.height),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup_bodies_system)
        .add_systems(
            Update,
            (
                input_system,
                physics_step_system,
                sync_bodies_system,
                sync_camera_system,
                draw_bounds_system.run_if(|d: Res<DrawBounds>| d.0),
                exit_when_finished_system,
            )
                .chain(),
        )
        .run();

    if let AppExit::Error(code) = exit {
        bail!("viewer exited with code {code}");
    }
    Ok(())
}

fn setup_bodies_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    info!("run_2d: starting Bevy 2D viewer with {} bodies", scenario.system.bodies.len());

    commands.spawn(Camera2dBundle::default());

    for (i, body) in scenario.system.bodies.iter().enumerate() {
        let base = body_size(body);
        let transform = body_transform(body, base);
        let tags = (BodyId(body.id), BaseSize(base));

        match (&body.sprite, body.bounds) {
            (Some(path), _) => {
                commands.spawn((
                    SpriteBundle {
                        texture: asset_server.load(path.clone()),
                        sprite: Sprite {
                            custom_size: Some(base),
                            ..default()
                        },
                        transform,
                        ..default()
                    },
                    tags,
                ));
            }
            (None, Bounds::Circle { r }) => {
                commands.spawn((
                    MaterialMesh2dBundle {
                        mesh: Mesh2dHandle(meshes.add(Circle::new(r as f32))),
                        material: materials.add(ColorMaterial::from(PALETTE[i % PALETTE.len()])),
                        transform,
                        ..default()
                    },
                    tags,
                ));
            }
            (None, Bounds::Box { .. }) => {
                commands.spawn((
                    SpriteBundle {
                        sprite: Sprite {
                            color: PALETTE[i % PALETTE.len()],
                            custom_size: Some(base),
                            ..default()
                        },
                        transform,
                        ..default()
                    },
                    tags,
                ));
            }
        }
    }
}

/// Arrows pan, wheel zooms, space thrusts, a/d turn, [ and ] halve or
/// double the time scale, escape steps once, p pauses, b toggles bounds, q quits
fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut wheel: EventReader<MouseWheel>,
    time: Res<Time>,
    mut scenario: ResMut<Scenario>,
    mut camera: ResMut<CameraState>,
    mut draw_bounds: ResMut<DrawBounds>,
    mut exit: EventWriter<AppExit>,
) {
    let cam = &mut camera.0;
    if keys.just_pressed(KeyCode::ArrowRight) {
        cam.pan(1.0, 0.0);
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        cam.pan(-1.0, 0.0);
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        cam.pan(0.0, 1.0);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        cam.pan(0.0, -1.0);
    }

    // one zoom notch per event, whatever its magnitude
    for ev in wheel.read() {
        cam.zoom(ev.y as f64);
    }

    let dt = time.delta_seconds_f64();
    if keys.pressed(KeyCode::KeyA) {
        scenario.turn(1.0, dt);
    }
    if keys.pressed(KeyCode::KeyD) {
        scenario.turn(-1.0, dt);
    }
    if keys.pressed(KeyCode::Space) {
        scenario.apply_thrust(1.0);
    }

    for (key, factor) in [(KeyCode::BracketLeft, 0.5), (KeyCode::BracketRight, 2.0)] {
        if keys.just_pressed(key) {
            let time_scale = scenario.clock.time_scale() * factor;
            scenario.clock.set_time_scale(time_scale);
            info!(time_scale, "time scale changed");
        }
    }

    if keys.just_pressed(KeyCode::Escape) {
        let contacts = scenario.step_once();
        debug!(t = scenario.system.t, contacts = contacts.len(), "single step");
    }
    if keys.just_pressed(KeyCode::KeyP) {
        scenario.paused = !scenario.paused;
        info!(paused = scenario.paused, t = scenario.system.t, "pause toggled");
    }
    if keys.just_pressed(KeyCode::KeyB) {
        draw_bounds.0 = !draw_bounds.0;
    }
    if keys.just_pressed(KeyCode::KeyQ) {
        exit.send(AppExit::Success);
    }
}

fn physics_step_system(time: Res<Time>, mut scenario: ResMut<Scenario>) {
    let contacts = scenario.advance(time.delta_seconds_f64());
    for c in contacts.iter().filter(|c| c.absorbed.is_some()) {
        info!(a = c.a, b = c.b, absorbed = ?c.absorbed, "bodies merged");
    }
}

fn sync_bodies_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    camera: Res<CameraState>,
    mut query: Query<(Entity, &BodyId, &BaseSize, &mut Transform, &mut Visibility)>,
) {
    for (entity, BodyId(id), BaseSize(base), mut transform, mut visibility) in &mut query {
        let Some(b) = scenario.system.body(*id) else {
            // absorbed by a merge
            commands.entity(entity).despawn_recursive();
            continue;
        };

        *transform = body_transform(b, *base);
        *visibility = if camera.0.is_visible(b) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn sync_camera_system(
    mut camera: ResMut<CameraState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut query: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
) {
    if let Ok(window) = windows.get_single() {
        let (w, h) = (window.width() as f64, window.height() as f64);
        if w != camera.0.viewport_w || h != camera.0.viewport_h {
            camera.0.resize(w, h);
        }
    }

    let cam = &camera.0;
    for (mut transform, mut projection) in &mut query {
        transform.translation.x = cam.pos.x as f32;
        transform.translation.y = cam.pos.y as f32;
        projection.scale = (1.0 / cam.scale) as f32;
    }
}

/// Centre, rotation and size of the outline drawn for box bounds.
/// Collision boxes stay axis aligned whatever the heading
fn box_outline(b: &Body, w: f64, h: f64) -> (Vec2, f32, Vec2) {
    (Vec2::new(b.x.x as f32, b.x.y as f32), 0.0, Vec2::new(w as f32, h as f32))
}

fn draw_bounds_system(mut gizmos: Gizmos, scenario: Res<Scenario>) {
    for b in &scenario.system.bodies {
        let pos = Vec2::new(b.x.x as f32, b.x.y as f32);
        match b.bounds {
            Bounds::Box { w, h } => {
                let (centre, rotation, size) = box_outline(b, w, h);
                gizmos.rect_2d(centre, rotation, size, BOUNDS_COLOR);
            }
            Bounds::Circle { r } => {
                gizmos.circle_2d(pos, r as f32, BOUNDS_COLOR);
            }
        }
    }
}

fn exit_when_finished_system(scenario: Res<Scenario>, mut exit: EventWriter<AppExit>) {
    if scenario.finished() {
        info!(t = scenario.system.t, "end time reached");
        exit.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NVec2;

    #[test]
    fn box_outline_ignores_heading() {
        let mut b = Body::new(0, "rocket", 1.0, NVec2::new(3.0, -4.0), Bounds::Box { w: 20.0, h: 10.0 });
        b.rot = 1.047197;

        let (centre, rotation, size) = box_outline(&b, 20.0, 10.0);

        assert_eq!(centre, Vec2::new(3.0, -4.0));
        assert_eq!(rotation, 0.0);
        assert_eq!(size, Vec2::new(20.0, 10.0));
    }
}
