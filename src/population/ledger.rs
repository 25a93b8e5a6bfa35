//! Bookkeeping of live creatures per kind.

use hashbrown::{HashMap, HashSet};

use crate::creature::CreatureHandle;
use crate::kind::CreatureKind;

/// Kind → set of live handles. Used for counts and removal only.
#[derive(Debug, Clone, Default)]
pub struct PopulationLedger {
    alive: HashMap<CreatureKind, HashSet<CreatureHandle>>,
}

impl PopulationLedger {
    /// Records `handle` as alive. Returns `false` if it was already present.
    pub fn insert(&mut self, kind: CreatureKind, handle: CreatureHandle) -> bool {
        self.alive.entry(kind).or_default().insert(handle)
    }

    /// Forgets `handle`. Returns `false` if it was not tracked under `kind`.
    pub fn remove(&mut self, kind: CreatureKind, handle: CreatureHandle) -> bool {
        self.alive
            .get_mut(&kind)
            .is_some_and(|handles| handles.remove(&handle))
    }

    /// `true` while `handle` is alive under `kind`.
    #[must_use]
    pub fn contains(&self, kind: CreatureKind, handle: CreatureHandle) -> bool {
        self.alive
            .get(&kind)
            .is_some_and(|handles| handles.contains(&handle))
    }

    /// Live creatures of `kind`.
    #[must_use]
    pub fn count(&self, kind: CreatureKind) -> usize {
        self.alive.get(&kind).map_or(0, HashSet::len)
    }

    /// Live creatures of every kind.
    #[must_use]
    pub fn total(&self) -> usize {
        self.alive.values().map(HashSet::len).sum()
    }

    /// Live handles of `kind`, in no particular order.
    pub fn handles(&self, kind: CreatureKind) -> impl Iterator<Item = CreatureHandle> + '_ {
        self.alive
            .get(&kind)
            .into_iter()
            .flat_map(|handles| handles.iter().copied())
    }
}
