//! Mask plugin - wearing masks and regenerating mana.

use bevy::prelude::*;

use super::components::*;
use crate::core::{GameState, PlayState};
use crate::player::Player;

/// Mask plugin - handles mask swapping, their world effects, and mana.
pub struct MaskPlugin;

impl Plugin for MaskPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (wear_mask_input, sync_time_scale, mana_regen)
                .chain()
                .run_if(in_state(GameState::InGame))
                .run_if(in_state(PlayState::Exploring)),
        );
    }
}

const MASK_KEYS: [(KeyCode, Mask); 3] = [
    (KeyCode::Digit1, Mask::Fury),
    (KeyCode::Digit2, Mask::Feather),
    (KeyCode::Digit3, Mask::Hourglass),
];

/// Number keys put masks on and take them off.
fn wear_mask_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&mut MaskSlot, &mut MaskContext), With<Player>>,
) {
    let Ok((mut slot, mut context)) = query.get_single_mut() else {
        return;
    };

    for (key, mask) in MASK_KEYS {
        if keyboard.just_pressed(key) && slot.toggle(mask, &mut context) {
            match slot.worn {
                Some(worn) => info!("Wearing {}", worn.name()),
                None => info!("Took off {}", mask.name()),
            }
        }
    }
}

/// Game time follows the worn mask; weapon timers read real time instead.
fn sync_time_scale(
    query: Query<&MaskContext, (With<Player>, Changed<MaskContext>)>,
    mut time: ResMut<Time<Virtual>>,
) {
    if let Ok(context) = query.get_single() {
        time.set_relative_speed(context.time_scale);
    }
}

fn mana_regen(time: Res<Time>, mut query: Query<&mut Mana>) {
    for mut mana in query.iter_mut() {
        mana.regenerate(time.delta_secs());
    }
}
