// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod animation;
mod camera;
mod convert;
mod debug_overlay;
mod input;
mod player;
mod viewer;
mod vr;
mod world;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

/// Per-frame ordering: the core steps first, everything else presents its output.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Input and asset-ready transitions that feed the core.
    Prepare,
    /// Advance the core once.
    Step,
    /// Push the published frame into the scene.
    Present,
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Window {
                title: "City Dance Viewer".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }
            .into(),
            ..default()
        }));

        app.configure_sets(
            Update,
            (FrameSet::Prepare, FrameSet::Step, FrameSet::Present).chain(),
        );

        app.add_plugins((
            viewer::plugin,
            world::plugin,
            player::plugin,
            animation::plugin,
            camera::plugin,
            input::plugin,
            vr::plugin,
            debug_overlay::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
