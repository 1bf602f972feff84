/*!
Toggleable wireframe view of the world index's occupied octree cells.

Reads the collision index only; the cells are recomputed whenever a different world
is installed.
*/

use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use shared::collision::settings::DEBUG_CELL_DEPTH;

use crate::{FrameSet, convert, input::InputAction, viewer::Viewer, vr::HideInVr};

const CELL_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);

#[derive(Resource, Default)]
struct DebugOverlay {
    enabled: bool,
    /// Generation of the world the cells were computed for.
    built_for: Option<u64>,
    /// Centre and size of every cell.
    cells: Vec<(Vec3, Vec3)>,
}

#[derive(Component)]
struct DebugButton;

#[derive(Component)]
struct DebugButtonLabel;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlay>();
    app.add_systems(Startup, spawn_debug_button);
    app.add_systems(
        Update,
        (on_debug_button, on_debug_key).in_set(FrameSet::Prepare),
    );
    app.add_systems(
        Update,
        (refresh_cells, draw_cells, update_label)
            .chain()
            .in_set(FrameSet::Present),
    );
}

fn spawn_debug_button(mut commands: Commands) {
    commands.spawn((
        Name::new("Debug Button"),
        DebugButton,
        HideInVr,
        Button,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            right: Val::Px(10.0),
            width: Val::Px(100.0),
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.8)),
        children![(
            DebugButtonLabel,
            Text::new("debug: off"),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::WHITE),
        )],
    ));
}

fn on_debug_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<DebugButton>)>,
    mut overlay: ResMut<DebugOverlay>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            overlay.enabled = !overlay.enabled;
        }
    }
}

fn on_debug_key(actions: Res<ActionState<InputAction>>, mut overlay: ResMut<DebugOverlay>) {
    if actions.just_pressed(&InputAction::ToggleDebug) {
        overlay.enabled = !overlay.enabled;
    }
}

fn refresh_cells(viewer: Res<Viewer>, mut overlay: ResMut<DebugOverlay>) {
    if !overlay.enabled {
        return;
    }
    let generation = viewer.world_generation();
    if overlay.built_for == Some(generation) {
        return;
    }

    overlay.cells = viewer
        .world()
        .debug_cells(DEBUG_CELL_DEPTH)
        .iter()
        .map(convert::aabb_center_size)
        .collect();
    overlay.built_for = Some(generation);
    debug!("Debug overlay: {} occupied cells", overlay.cells.len());
}

fn draw_cells(overlay: Res<DebugOverlay>, mut gizmos: Gizmos) {
    if !overlay.enabled {
        return;
    }
    for &(center, size) in &overlay.cells {
        gizmos.primitive_3d(
            &Cuboid::from_size(size),
            Isometry3d::from_translation(center),
            CELL_COLOR,
        );
    }
}

fn update_label(
    overlay: Res<DebugOverlay>,
    mut labels: Query<&mut Text, With<DebugButtonLabel>>,
) {
    if !overlay.is_changed() {
        return;
    }
    for mut text in &mut labels {
        text.0 = format!("debug: {}", if overlay.enabled { "on" } else { "off" });
    }
}
