use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    prelude::*,
};
use shared::camera::CameraOutput;

use crate::{FrameSet, convert, viewer::LatestFrame, world::SKY_COLOR};

const FOV_DEGREES: f32 = 70.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const FOG_END: f32 = 50.0;

/// Which view a camera renders. Eye cameras only render in VR mode.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraRole {
    Mono,
    LeftEye,
    RightEye,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_cameras);
    app.add_systems(Update, apply_camera_output.in_set(FrameSet::Present));
}

fn add_cameras(mut commands: Commands) {
    for (role, order, name) in [
        (CameraRole::Mono, 0, "Mono Camera"),
        (CameraRole::LeftEye, 1, "Left Eye Camera"),
        (CameraRole::RightEye, 2, "Right Eye Camera"),
    ] {
        let mut camera = commands.spawn((
            Name::new(name),
            role,
            Camera3d::default(),
            Camera {
                order,
                is_active: role == CameraRole::Mono,
                ..default()
            },
            Projection::Perspective(PerspectiveProjection {
                fov: FOV_DEGREES.to_radians(),
                near: NEAR,
                far: FAR,
                ..default()
            }),
            Tonemapping::AcesFitted,
            DistanceFog {
                color: SKY_COLOR,
                falloff: FogFalloff::Linear {
                    start: 0.0,
                    end: FOG_END,
                },
                ..default()
            },
            Transform::from_xyz(0.0, 0.5, -0.4).looking_at(Vec3::new(0.0, 0.35, 0.0), Vec3::Y),
        ));
        if role == CameraRole::Mono {
            camera.insert(IsDefaultUiCamera);
        }
    }
}

/// Place and activate cameras from the latest frame.
fn apply_camera_output(
    latest: Res<LatestFrame>,
    mut cameras: Query<(&CameraRole, &mut Camera, &mut Transform)>,
) {
    let Some(frame) = latest.0.as_ref() else {
        return;
    };

    for (role, mut camera, mut transform) in &mut cameras {
        let pose = match (&frame.camera, role) {
            (CameraOutput::Mono(pose), CameraRole::Mono) => Some(pose),
            (CameraOutput::Stereo(pair), CameraRole::LeftEye) => Some(&pair.left),
            (CameraOutput::Stereo(pair), CameraRole::RightEye) => Some(&pair.right),
            _ => None,
        };

        let active = pose.is_some();
        if camera.is_active != active {
            camera.is_active = active;
        }
        if let Some(pose) = pose {
            *transform = convert::camera_transform(pose);
        }
    }
}
