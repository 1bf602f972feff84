/*!
Bevy home of the core viewer state.

`Viewer` is the only place the core is mutated per frame; every presentation system reads
the published `LatestFrame` instead.
*/

use bevy::prelude::*;
use shared::viewer::{FrameSnapshot, ViewerConfig, ViewerCore};

use crate::FrameSet;

#[derive(Resource, Deref, DerefMut)]
pub struct Viewer(pub ViewerCore);

impl Default for Viewer {
    fn default() -> Self {
        Self(ViewerCore::new(ViewerConfig::default()))
    }
}

/// Snapshot produced by the most recent core step.
#[derive(Resource, Default)]
pub struct LatestFrame(pub Option<FrameSnapshot>);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Viewer>();
    app.init_resource::<LatestFrame>();
    app.add_systems(Update, step_viewer.in_set(FrameSet::Step));
}

fn step_viewer(time: Res<Time>, mut viewer: ResMut<Viewer>, mut latest: ResMut<LatestFrame>) {
    let snapshot = viewer.frame(time.delta_secs());
    if snapshot.teleported {
        info!("Player recovered from out of bounds");
    }
    latest.0 = Some(snapshot);
}
