/*!
Dance clip playback.

The core owns the clip clock (`shared::animation::Animator`). Bevy's `AnimationPlayer` only
samples the bones: it is paused and seeked to the core's clip time every frame, so switching
or restarting a clip in the core is reflected here without extra bookkeeping.
*/

use bevy::{prelude::*, scene::SceneInstanceReady};
use shared::animation::{ClipInfo, LoopMode, PlayOutcome};

use crate::{FrameSet, player::PlayerModel, viewer::Viewer};

const DANCE_ANIMATION: &str = "models/character/hip_hop_dancing.glb";

/// Name the dance clip is registered under in the core animator.
pub const DANCE_CLIP: &str = "hipHopDancing";

#[derive(Resource)]
struct DanceClip {
    clip: Handle<AnimationClip>,
    graph: Handle<AnimationGraph>,
    node: AnimationNodeIndex,
    registered: bool,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, load_dance_clip);
    app.add_observer(attach_animation_graph);
    app.add_systems(
        Update,
        register_dance_clip
            .in_set(FrameSet::Prepare)
            .run_if(resource_exists::<DanceClip>),
    );
    app.add_systems(
        Update,
        sync_animation_players
            .in_set(FrameSet::Present)
            .run_if(resource_exists::<DanceClip>),
    );
}

fn load_dance_clip(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    let clip = asset_server.load(GltfAssetLabel::Animation(0).from_asset(DANCE_ANIMATION));
    let (graph, node) = AnimationGraph::from_clip(clip.clone());

    commands.insert_resource(DanceClip {
        clip,
        graph: graphs.add(graph),
        node,
        registered: false,
    });
}

/// Hand the clip to the core once its metadata is known, then start it.
fn register_dance_clip(
    mut dance: ResMut<DanceClip>,
    clips: Res<Assets<AnimationClip>>,
    mut viewer: ResMut<Viewer>,
) {
    if dance.registered {
        return;
    }
    let Some(clip) = clips.get(&dance.clip) else {
        return;
    };

    let animator = viewer.animator_mut();
    animator.register_clip(
        ClipInfo::new(DANCE_CLIP, clip.duration(), clip.curves().len()),
        LoopMode::Repeat,
    );
    if animator.play_clip(DANCE_CLIP) == PlayOutcome::Started {
        info!("Dance animation loaded and playing");
    }
    dance.registered = true;
}

/// Animation player belonging to the character skeleton.
#[derive(Component)]
struct DanceSkeleton;

/// Give every animation player inside the character scene the dance graph.
fn attach_animation_graph(
    ready: On<SceneInstanceReady>,
    mut commands: Commands,
    models: Query<(), With<PlayerModel>>,
    children: Query<&Children>,
    mut players: Query<(Entity, &mut AnimationPlayer)>,
    dance: Option<Res<DanceClip>>,
) {
    if !models.contains(ready.entity) {
        return;
    }
    let Some(dance) = dance else {
        return;
    };

    let mut found = false;
    for entity in children.iter_descendants(ready.entity) {
        let Ok((entity, mut player)) = players.get_mut(entity) else {
            continue;
        };
        player.play(dance.node).repeat();
        commands
            .entity(entity)
            .insert((AnimationGraphHandle(dance.graph.clone()), DanceSkeleton));
        found = true;
    }

    if !found {
        warn!("No skeleton found in the player model; animations will not play");
    }
}

/// Drive the bone animation from the core's clip clock.
fn sync_animation_players(
    dance: Res<DanceClip>,
    viewer: Res<Viewer>,
    mut players: Query<&mut AnimationPlayer, With<DanceSkeleton>>,
) {
    let current = viewer
        .animator()
        .current()
        .filter(|action| action.info().name == DANCE_CLIP && action.is_enabled());

    for mut player in &mut players {
        match current {
            Some(action) => {
                if !player.is_playing_animation(dance.node) {
                    player.play(dance.node).repeat();
                }
                if let Some(active) = player.animation_mut(dance.node) {
                    active
                        .set_speed(0.0)
                        .set_weight(action.weight())
                        .seek_to(action.time());
                }
            }
            None => {
                player.stop_all();
            }
        }
    }
}
