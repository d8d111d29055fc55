//! Core plugin that sets up game states, events, and game flow.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused)
/// - Global events (DamageEvent, DeathEvent)
/// - Pause handling
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()

            // Tunables are loaded when the plugins build, so Loading only
            // lasts one frame.
            .add_systems(OnEnter(GameState::Loading), transition_to_game)

            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused)))
            );
    }
}

fn transition_to_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut time: ResMut<Time<Virtual>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => {
                time.pause();
                next_state.set(GameState::Paused);
            }
            GameState::Paused => {
                time.unpause();
                next_state.set(GameState::InGame);
            }
            _ => {}
        }
    }
}
