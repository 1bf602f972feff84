use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Leave the stereo display mode.
    ExitVr,
    ToggleVr,
    ToggleDebug,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::ExitVr, KeyCode::Escape);
    input_map.insert(InputAction::ToggleVr, KeyCode::KeyV);
    input_map.insert(InputAction::ToggleDebug, KeyCode::F3);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}
