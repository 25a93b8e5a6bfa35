//! Buffered hits awaiting the next simulation step.

use bevy::prelude::{Entity, Resource};
use glam::Vec3;

/// A hit against the creature mirrored by `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    /// Entity carrying the creature's tag.
    pub target: Entity,
    /// Damage; negatives are clamped to zero.
    pub amount: i32,
    /// Where the blow came from; drives knockback direction.
    pub hit_origin: Vec3,
}

/// Hits queued by observers, applied before the next step.
#[derive(Resource, Default)]
pub struct DamageInbox {
    requests: Vec<DamageRequest>,
}

impl DamageInbox {
    /// Queues one hit.
    pub fn push(&mut self, request: DamageRequest) {
        self.requests.push(request);
    }

    /// Queues several hits in order.
    pub fn extend<I>(&mut self, requests: I)
    where
        I: IntoIterator<Item = DamageRequest>,
    {
        self.requests.extend(requests);
    }

    /// Takes every queued hit, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, DamageRequest> {
        self.requests.drain(..)
    }

    /// `true` when no hit is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::World;
    use rstest::rstest;

    fn hit(target: Entity, amount: i32) -> DamageRequest {
        DamageRequest {
            target,
            amount,
            hit_origin: Vec3::ZERO,
        }
    }

    #[rstest]
    fn drain_preserves_arrival_order() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let mut inbox = DamageInbox::default();
        assert!(inbox.is_empty());
        inbox.push(hit(first, 3));
        inbox.extend([hit(second, 4), hit(first, 5)]);
        let drained: Vec<_> = inbox.drain().map(|r| r.amount).collect();
        assert_eq!(drained, vec![3, 4, 5]);
        assert!(inbox.is_empty());
    }
}
