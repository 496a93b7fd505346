//! Entity table pairing each visual handle with its physics body.
//!
//! Every row holds both halves, so removal can never desynchronize them. Ids are
//! generational: a despawned id stays dead even after its slot is reused.

use std::collections::HashMap;
use std::hash::Hash;

/// Stable identity of a live visual/physics pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ball,
    Coin,
}

impl EntityKind {
    const COUNT: usize = 2;

    fn slot(self) -> usize {
        match self {
            EntityKind::Ball => 0,
            EntityKind::Coin => 1,
        }
    }
}

/// A visual object and its physics body sharing one logical identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityPair<V, H> {
    pub kind: EntityKind,
    pub visual: V,
    pub physics: H,
}

#[derive(Debug, Clone)]
struct Slot<V, H> {
    generation: u32,
    /// Spawn sequence number of the current occupant
    spawned_at: u64,
    pair: Option<EntityPair<V, H>>,
}

#[derive(Debug, Clone)]
pub struct EntityRegistry<V, H> {
    slots: Vec<Slot<V, H>>,
    free: Vec<u32>,
    by_physics: HashMap<H, EntityId>,
    counts: [usize; EntityKind::COUNT],
    next_spawn: u64,
}

impl<V, H> Default for EntityRegistry<V, H> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_physics: HashMap::new(),
            counts: [0; EntityKind::COUNT],
            next_spawn: 0,
        }
    }
}

impl<V: Copy, H: Copy + Eq + Hash> EntityRegistry<V, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pair and return its id.
    pub fn spawn(&mut self, kind: EntityKind, visual: V, physics: H) -> EntityId {
        debug_assert!(
            !self.by_physics.contains_key(&physics),
            "physics body registered twice"
        );

        let pair = Some(EntityPair {
            kind,
            visual,
            physics,
        });
        let spawned_at = self.next_spawn;
        self.next_spawn += 1;

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.pair = pair;
                slot.spawned_at = spawned_at;
                EntityId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    spawned_at,
                    pair,
                });
                EntityId {
                    index,
                    generation: 0,
                }
            }
        };

        self.by_physics.insert(physics, id);
        self.counts[kind.slot()] += 1;
        id
    }

    /// Remove both halves of a pair. Stale or unknown ids are a no-op returning `None`.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityPair<V, H>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let pair = slot.pair.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.by_physics.remove(&pair.physics);
        self.counts[pair.kind.slot()] -= 1;
        Some(pair)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityPair<V, H>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.pair.as_ref()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Reverse lookup from a physics body to the pair that owns it.
    pub fn find_by_physics(&self, physics: H) -> Option<(EntityId, &EntityPair<V, H>)> {
        let id = *self.by_physics.get(&physics)?;
        self.get(id).map(|pair| (id, pair))
    }

    /// Visit every live pair of one kind, in slot order.
    pub fn for_each(&self, kind: EntityKind, mut f: impl FnMut(EntityId, &EntityPair<V, H>)) {
        for (id, pair) in self.iter() {
            if pair.kind == kind {
                f(id, pair);
            }
        }
    }

    /// All live pairs, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityPair<V, H>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.pair.as_ref().map(|pair| {
                (
                    EntityId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    pair,
                )
            })
        })
    }

    /// Longest-lived pair of a kind.
    pub fn oldest(&self, kind: EntityKind) -> Option<EntityId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.pair.as_ref().is_some_and(|p| p.kind == kind))
            .min_by_key(|(_, slot)| slot.spawned_at)
            .map(|(index, slot)| EntityId {
                index: index as u32,
                generation: slot.generation,
            })
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.counts[kind.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}
