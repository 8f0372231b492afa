//! Group lifecycle and collision passes
//!
//! Every pass walks an id snapshot of the group it removes from, so members
//! removed mid-pass are simply skipped when their id comes up.

use glam::Vec2;

use super::entity::{Body, Entity};
use super::group::Group;
use super::state::{EntityIds, GameEvent};

/// Where collision side effects land
pub struct Effects<'a> {
    pub explosions: &'a mut Group,
    pub ids: &'a mut EntityIds,
    pub events: &'a mut Vec<GameEvent>,
}

impl Effects<'_> {
    /// Spawn an explosion at `pos`
    pub fn explode(&mut self, pos: Vec2) {
        let id = self.ids.next_id();
        self.explosions.insert(Entity::explosion(id, pos, self.events));
    }
}

/// Advance every member once and drop the ones that expire; returns how many expired
pub fn advance_group(group: &mut Group, bounds: Vec2) -> usize {
    let mut expired = 0;
    for id in group.snapshot() {
        let Some(entity) = group.get_mut(id) else {
            continue;
        };
        if entity.advance(bounds) {
            group.remove(id);
            expired += 1;
        }
    }
    expired
}

/// Remove every member touching `other`, exploding each one; returns the hit count
pub fn group_vs_single<B: Body + ?Sized>(group: &mut Group, other: &B, fx: &mut Effects) -> u32 {
    let mut hits = 0;
    for id in group.snapshot() {
        let Some(member) = group.get(id) else {
            continue;
        };
        if member.collides_with(other) {
            let pos = member.pos;
            fx.explode(pos);
            group.remove(id);
            hits += 1;
        }
    }
    hits
}

/// For each member of `a`, sweep `b` with [`group_vs_single`]; a member of `a`
/// that hit anything is removed too. Returns how many members of `a` were removed.
pub fn group_vs_group(a: &mut Group, b: &mut Group, fx: &mut Effects) -> u32 {
    let mut removed = 0;
    for id in a.snapshot() {
        let Some(member) = a.get(id) else {
            continue;
        };
        if group_vs_single(b, member, fx) > 0 {
            a.remove(id);
            removed += 1;
        }
    }
    removed
}
