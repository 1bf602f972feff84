use bevy::prelude::*;

use crate::{FrameSet, convert, viewer::LatestFrame};

const CHARACTER_SCENE: &str = "models/character/Ch22_nonPBR.glb";

/// The character model is authored in centimetres at a much larger scale than the city.
const MODEL_SCALE: f32 = 0.001;

/// Root of the rendered character. Its transform is owned by the core's body pose.
#[derive(Component)]
pub struct PlayerModel;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_player);
    app.add_systems(Update, follow_body.in_set(FrameSet::Present));
}

fn spawn_player(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Name::new("Player"),
        PlayerModel,
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(CHARACTER_SCENE))),
        Transform::from_xyz(0.0, 0.15, 0.0).with_scale(Vec3::splat(MODEL_SCALE)),
    ));
}

/// Force the model onto the physical body every frame, regardless of what the skeleton does.
fn follow_body(latest: Res<LatestFrame>, mut model: Single<&mut Transform, With<PlayerModel>>) {
    let Some(frame) = latest.0.as_ref() else {
        return;
    };
    let scale = model.scale;
    **model = convert::body_transform(&frame.body, scale);
}
