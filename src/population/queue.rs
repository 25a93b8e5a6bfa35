//! Backlog of creature kinds waiting to be spawned.

use std::collections::VecDeque;
use std::iter;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::kind::CreatureKind;

/// FIFO of spawn requests. Duplicates are never coalesced: each death adds
/// exactly one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RespawnQueue {
    pending: VecDeque<CreatureKind>,
}

impl RespawnQueue {
    /// Fills the queue with `per_kind` requests for every kind in `kinds`,
    /// shuffled so the first wave arrives in unpredictable order.
    ///
    /// # Examples
    /// ```
    /// use menagerie::kind::CreatureKind;
    /// use menagerie::population::RespawnQueue;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let queue = RespawnQueue::seeded(&CreatureKind::MONSTERS, 5, &mut rng);
    /// assert_eq!(queue.len(), 15);
    /// assert_eq!(queue.count(CreatureKind::Slime), 5);
    /// ```
    pub fn seeded<R: Rng>(kinds: &[CreatureKind], per_kind: usize, rng: &mut R) -> Self {
        let mut requests: Vec<CreatureKind> = kinds
            .iter()
            .flat_map(|kind| iter::repeat_n(*kind, per_kind))
            .collect();
        requests.shuffle(rng);
        Self {
            pending: requests.into(),
        }
    }

    /// Appends a request at the back.
    pub fn push(&mut self, kind: CreatureKind) {
        self.pending.push_back(kind);
    }

    /// Takes the oldest request.
    pub fn pop(&mut self) -> Option<CreatureKind> {
        self.pending.pop_front()
    }

    /// Number of queued requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// `true` when nothing waits to spawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued requests for `kind`.
    #[must_use]
    pub fn count(&self, kind: CreatureKind) -> usize {
        self.pending.iter().filter(|queued| **queued == kind).count()
    }

    /// Queued kinds, front first.
    pub fn iter(&self) -> impl Iterator<Item = CreatureKind> + '_ {
        self.pending.iter().copied()
    }
}
