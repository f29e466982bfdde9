//! Loading screen: nothing to stream in yet, so it hands over to gameplay on the first frame.

use bevy::prelude::*;

use super::GameState;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        check_loading_complete.run_if(in_state(GameState::Loading)),
    );
}

fn check_loading_complete(mut next_state: ResMut<NextState<GameState>>) {
    info!("Loading complete, entering game");
    next_state.set(GameState::InGame);
}
