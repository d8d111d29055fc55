//! In-game HUD - throw crosshair and mana display.

use bevy::prelude::*;

use crate::core::GameState;
use crate::masks::{Mana, MaskContext};
use crate::player::Player;
use crate::weapon::{AimState, Boomerang, IndicatorState, WeaponConfig};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for mana bar fill.
#[derive(Component)]
pub struct ManaBar;

/// Centre-screen throw indicator.
#[derive(Component, Debug, Default)]
pub struct Crosshair {
    state: IndicatorState,
}

impl Crosshair {
    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Returns true when the state actually changed.
    pub fn set_indicator_state(&mut self, state: IndicatorState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    pub fn color(&self) -> Color {
        match self.state {
            IndicatorState::Idle => Color::srgba(1.0, 1.0, 1.0, 0.5),
            IndicatorState::Aiming => Color::srgba(1.0, 0.9, 0.6, 0.85),
            IndicatorState::OnTarget => Color::srgb(0.95, 0.25, 0.2),
            IndicatorState::Unavailable => Color::srgba(0.4, 0.4, 0.45, 0.35),
        }
    }
}

/// Pick the indicator for this frame.
///
/// `ready` is whether the weapon is in hand, `affordable` whether the
/// wielder can pay for a throw.
pub fn indicator_for(aim: &AimState, ready: bool, affordable: bool) -> IndicatorState {
    if !ready || !affordable {
        IndicatorState::Unavailable
    } else if aim.aiming && aim.on_target {
        IndicatorState::OnTarget
    } else if aim.aiming {
        IndicatorState::Aiming
    } else {
        IndicatorState::Idle
    }
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnExit(GameState::Loading), spawn_hud).add_systems(
        Update,
        (update_crosshair, update_mana_bar).run_if(in_state(GameState::InGame)),
    );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Mana bar (bottom-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        Text::new("Mana"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.7, 0.7, 0.75)),
                        Node {
                            width: Val::Px(60.0),
                            ..default()
                        },
                    ));
                    row.spawn((
                        Node {
                            width: Val::Px(200.0),
                            height: Val::Px(12.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.1, 0.1, 0.12)),
                    ))
                    .with_children(|track| {
                        track.spawn((
                            Node {
                                width: Val::Percent(100.0),
                                height: Val::Percent(100.0),
                                ..default()
                            },
                            BackgroundColor(Color::srgb(0.3, 0.45, 0.9)),
                            ManaBar,
                        ));
                    });
                });
        });

    // Crosshair (center of screen)
    let crosshair = Crosshair::default();
    let color = crosshair.color();
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(6.0),
                    height: Val::Px(6.0),
                    ..default()
                },
                BackgroundColor(color),
                crosshair,
            ));
        });
}

/// Tint the crosshair from aim, weapon and mana state.
fn update_crosshair(
    aim: Res<AimState>,
    config: Res<WeaponConfig>,
    player_query: Query<(&Mana, &MaskContext), With<Player>>,
    weapon_query: Query<&Boomerang>,
    mut crosshair_query: Query<(&mut Crosshair, &mut BackgroundColor)>,
) {
    let ready = weapon_query.iter().any(|weapon| weapon.is_held());
    let affordable = player_query
        .get_single()
        .map(|(mana, masks)| mana.covers(masks.throw_cost(&config)))
        .unwrap_or(false);
    let state = indicator_for(&aim, ready, affordable);

    for (mut crosshair, mut background) in crosshair_query.iter_mut() {
        if crosshair.set_indicator_state(state) {
            *background = crosshair.color().into();
        }
    }
}

/// Update mana bar width.
fn update_mana_bar(
    player_query: Query<&Mana, (With<Player>, Changed<Mana>)>,
    mut bar_query: Query<&mut Node, With<ManaBar>>,
) {
    let Ok(mana) = player_query.get_single() else {
        return;
    };
    for mut node in bar_query.iter_mut() {
        node.width = Val::Percent(mana.percentage() * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosshair_reports_only_real_changes() {
        let mut crosshair = Crosshair::default();
        assert!(!crosshair.set_indicator_state(IndicatorState::Idle));
        assert!(crosshair.set_indicator_state(IndicatorState::OnTarget));
        assert_eq!(crosshair.state(), IndicatorState::OnTarget);
    }

    #[test]
    fn indicator_follows_aim_and_availability() {
        let mut aim = AimState::default();
        assert_eq!(indicator_for(&aim, true, true), IndicatorState::Idle);
        aim.aiming = true;
        assert_eq!(indicator_for(&aim, true, true), IndicatorState::Aiming);
        aim.on_target = true;
        assert_eq!(indicator_for(&aim, true, true), IndicatorState::OnTarget);
        assert_eq!(indicator_for(&aim, false, true), IndicatorState::Unavailable);
        assert_eq!(indicator_for(&aim, true, false), IndicatorState::Unavailable);
    }
}
