//! Collision groups shared by every rapier collider in the game.
//!
//! - `WORLD`: static level geometry
//! - `PLAYER`: the wielder's character capsule
//! - `ENEMY`: enemy bodies
//! - `WEAPON`: the boomerang

use bevy_rapier3d::prelude::*;

pub const WORLD: Group = Group::GROUP_1;
pub const PLAYER: Group = Group::GROUP_2;
pub const ENEMY: Group = Group::GROUP_3;
pub const WEAPON: Group = Group::GROUP_4;

pub fn world_groups() -> CollisionGroups {
    CollisionGroups::new(WORLD, Group::ALL)
}

pub fn player_groups() -> CollisionGroups {
    CollisionGroups::new(PLAYER, Group::ALL)
}

pub fn enemy_groups() -> CollisionGroups {
    CollisionGroups::new(ENEMY, Group::ALL)
}

/// Weapon groups; `ignore_wielder` drops the player from the filter.
pub fn weapon_groups(ignore_wielder: bool) -> CollisionGroups {
    let filter = if ignore_wielder {
        Group::ALL.difference(PLAYER)
    } else {
        Group::ALL
    };
    CollisionGroups::new(WEAPON, filter)
}
