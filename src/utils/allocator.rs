use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Generational handle to a body stored in an [`Arena`].
///
/// A handle keeps the generation of the slot it was issued for, so a handle to a
/// removed body never resolves to whatever later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct BodyId {
    index: u32,
    generation: u32,
}

impl BodyId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Placeholder handle for bodies not yet inserted; never valid in any arena.
impl Default for BodyId {
    fn default() -> Self {
        Self::new(u32::MAX, 0)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with generation tracking. Iteration order is slot order, which
/// is insertion order until slots start being reused.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_list: VecDeque<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: VecDeque::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> BodyId {
        self.len += 1;
        if let Some(index) = self.free_list.pop_front() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return BodyId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        BodyId::new(index, 0)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: BodyId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Borrows two distinct live entries mutably at once.
    pub fn get2_mut(&mut self, id_a: BodyId, id_b: BodyId) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() || !self.contains(id_a) || !self.contains(id_b) {
            return None;
        }

        let flipped = id_a.index() > id_b.index();
        let (low, high) = if flipped { (id_b, id_a) } else { (id_a, id_b) };

        let (left, right) = self.slots.split_at_mut(high.index());
        let low_value = left[low.index()].value.as_mut()?;
        let high_value = right[0].value.as_mut()?;

        if flipped {
            Some((high_value, low_value))
        } else {
            Some((low_value, high_value))
        }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<T> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push_back(id.index() as u32);
        self.len -= 1;
        Some(value)
    }

    pub fn clear(&mut self) {
        let ids: Vec<BodyId> = self.ids().collect();
        for id in ids {
            self.remove(id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (BodyId::new(index as u32, slot.generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (BodyId::new(index as u32, generation), value))
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
