//! Reusable-slot pool for transient entities.

/// Addresses a pool slot at a specific reuse generation. A key taken when a
/// slot is activated stops matching once that slot is released, so a holder
/// can never touch a slot recycled in the interim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotKey {
    pub index: usize,
    pub generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    item: T,
    active: bool,
    generation: u32,
}

/// Generic reusable-slot container: acquisition reuses the first inactive
/// slot and grows by one when none is free. Items are built once and kept
/// for the life of the pool; activation toggles them.
#[derive(Debug, Default)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Activate the first inactive slot, building a new item with `make`
    /// only when the pool has to grow.
    pub fn acquire(&mut self, make: impl FnOnce() -> T) -> (SlotKey, &mut T) {
        let index = match self.slots.iter().position(|s| !s.active) {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    item: make(),
                    active: false,
                    generation: 0,
                });
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.active = true;
        (
            SlotKey {
                index,
                generation: slot.generation,
            },
            &mut slot.item,
        )
    }

    /// Deactivate the slot addressed by `key`, bumping its generation so
    /// outstanding copies of the key go stale. Returns the item for the
    /// caller to tear down, or `None` if the key no longer matches.
    pub fn release(&mut self, key: SlotKey) -> Option<&T> {
        let slot = self.slots.get_mut(key.index)?;
        if !slot.active || slot.generation != key.generation {
            return None;
        }
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        Some(&slot.item)
    }

    /// The active item addressed by `key`, if the key is still current.
    pub fn get(&self, key: SlotKey) -> Option<&T> {
        let slot = self.slots.get(key.index)?;
        (slot.active && slot.generation == key.generation).then_some(&slot.item)
    }

    /// Total slot count, active or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (SlotKey, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.active.then_some((
                SlotKey {
                    index,
                    generation: slot.generation,
                },
                &slot.item,
            ))
        })
    }
}
