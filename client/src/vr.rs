/*!
Side-by-side stereo ("VR") display mode.

Entering VR switches the window to borderless fullscreen, hides the on-screen UI and splits
the window between the two eye cameras. Leaving restores the windowed mono view.
*/

use bevy::{
    camera::Viewport,
    prelude::*,
    window::{MonitorSelection, PrimaryWindow, WindowMode, WindowResized},
};
use leafwing_input_manager::prelude::*;

use crate::{FrameSet, camera::CameraRole, input::InputAction, viewer::Viewer};

/// Request to enter (`true`) or leave (`false`) the stereo mode.
#[derive(Message, Clone, Copy, Debug)]
pub struct SetVrMode(pub bool);

/// UI that is hidden while in VR.
#[derive(Component)]
pub struct HideInVr;

#[derive(Component)]
struct VrButton;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<SetVrMode>();
    app.add_systems(Startup, spawn_vr_button);
    app.add_systems(
        Update,
        (
            (on_vr_button, on_vr_keys, on_fullscreen_lost),
            apply_vr_mode,
            update_eye_viewports,
        )
            .chain()
            .in_set(FrameSet::Prepare),
    );
}

fn spawn_vr_button(mut commands: Commands) {
    commands.spawn((
        Name::new("VR Button"),
        VrButton,
        HideInVr,
        Button,
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(20.0),
            right: Val::Px(20.0),
            padding: UiRect::axes(Val::Px(18.0), Val::Px(10.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        children![(
            Text::new("VR"),
            TextFont {
                font_size: 20.0,
                ..default()
            },
            TextColor(Color::WHITE),
        )],
    ));
}

fn on_vr_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<VrButton>)>,
    mut requests: MessageWriter<SetVrMode>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            requests.write(SetVrMode(true));
        }
    }
}

fn on_vr_keys(
    actions: Res<ActionState<InputAction>>,
    viewer: Res<Viewer>,
    mut requests: MessageWriter<SetVrMode>,
) {
    if actions.just_pressed(&InputAction::ExitVr) && viewer.vr_mode() {
        requests.write(SetVrMode(false));
    }
    if actions.just_pressed(&InputAction::ToggleVr) {
        requests.write(SetVrMode(!viewer.vr_mode()));
    }
}

/// Leave VR when the window drops out of fullscreen behind our back (OS shortcut,
/// browser Esc), so the UI and mono view come back.
fn on_fullscreen_lost(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    viewer: Res<Viewer>,
    mut requests: MessageWriter<SetVrMode>,
) {
    for window in &windows {
        if fullscreen_lost(viewer.vr_mode(), &window.mode) {
            debug!("Window left fullscreen while in VR");
            requests.write(SetVrMode(false));
        }
    }
}

#[inline]
fn fullscreen_lost(vr_mode: bool, mode: &WindowMode) -> bool {
    vr_mode && !matches!(mode, WindowMode::BorderlessFullscreen(_))
}

fn apply_vr_mode(
    mut requests: MessageReader<SetVrMode>,
    mut viewer: ResMut<Viewer>,
    mut window: Single<&mut Window, With<PrimaryWindow>>,
    mut hidden: Query<&mut Visibility, With<HideInVr>>,
) {
    let Some(&SetVrMode(on)) = requests.read().last() else {
        return;
    };
    if viewer.vr_mode() == on {
        return;
    }

    viewer.set_vr_mode(on);
    window.mode = if on {
        WindowMode::BorderlessFullscreen(MonitorSelection::Current)
    } else {
        WindowMode::Windowed
    };
    for mut visibility in &mut hidden {
        *visibility = if on {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

/// Split the window between the eye cameras. Recomputed on resize.
fn update_eye_viewports(
    mut resized: MessageReader<WindowResized>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&CameraRole, &mut Camera)>,
    mut initialized: Local<bool>,
) {
    let resized = resized.read().count() > 0;
    if *initialized && !resized {
        return;
    }

    let size = window.physical_size();
    let Some((left, right)) = eye_viewports(size) else {
        return;
    };
    *initialized = true;

    for (role, mut camera) in &mut cameras {
        camera.viewport = match role {
            CameraRole::Mono => None,
            CameraRole::LeftEye => Some(left.clone()),
            CameraRole::RightEye => Some(right.clone()),
        };
    }
}

/// Left and right halves of a window of `size` physical pixels, `None` while it is too
/// small to split.
fn eye_viewports(size: UVec2) -> Option<(Viewport, Viewport)> {
    if size.x < 2 || size.y == 0 {
        return None;
    }
    let half = size.x / 2;
    let left = Viewport {
        physical_position: UVec2::ZERO,
        physical_size: UVec2::new(half, size.y),
        ..default()
    };
    let right = Viewport {
        physical_position: UVec2::new(half, 0),
        physical_size: UVec2::new(size.x - half, size.y),
        ..default()
    };
    Some((left, right))
}
