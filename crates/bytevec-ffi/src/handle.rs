//! Slot+generation handle table for vectors owned on behalf of C callers.
//!
//! C code never sees a Rust pointer: it holds a `u64` handle whose upper
//! half is a slot index and lower half a generation. Destroying a vector
//! bumps the slot's generation, so a destroyed or forged handle resolves
//! to `None` instead of dangling memory, and a second destroy is a no-op.

/// Handle encoding: upper 32 bits = slot index, lower 32 bits = generation.
fn encode(slot: u32, generation: u32) -> u64 {
    ((slot as u64) << 32) | (generation as u64)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

impl<T> Slot<T> {
    fn live(&self, generation: u32) -> Option<&T> {
        if self.generation != generation {
            return None;
        }
        self.value.as_ref()
    }

    fn live_mut(&mut self, generation: u32) -> Option<&mut T> {
        if self.generation != generation {
            return None;
        }
        self.value.as_mut()
    }
}

/// Maps `u64` handles to owned values, recycling slots through a free list.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Take ownership of `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.value = Some(value);
            return encode(idx, slot.generation);
        }
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        encode(idx, 0)
    }

    pub fn get(&self, handle: u64) -> Option<&T> {
        let (idx, generation) = decode(handle);
        self.slots.get(idx as usize)?.live(generation)
    }

    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (idx, generation) = decode(handle);
        self.slots.get_mut(idx as usize)?.live_mut(generation)
    }

    /// Borrow one value mutably and a different one immutably.
    ///
    /// Returns `None` if either handle is stale or both name the same slot.
    pub fn get_pair_mut(&mut self, target: u64, source: u64) -> Option<(&mut T, &T)> {
        let (t_idx, t_gen) = decode(target);
        let (s_idx, s_gen) = decode(source);
        let (t_idx, s_idx) = (t_idx as usize, s_idx as usize);
        if t_idx == s_idx || t_idx >= self.slots.len() || s_idx >= self.slots.len() {
            return None;
        }
        let (t_slot, s_slot) = if t_idx < s_idx {
            let (lo, hi) = self.slots.split_at_mut(s_idx);
            (&mut lo[t_idx], &hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(t_idx);
            (&mut hi[0], &lo[s_idx])
        };
        Some((t_slot.live_mut(t_gen)?, s_slot.live(s_gen)?))
    }

    /// Remove and return the value behind `handle`.
    ///
    /// A slot whose generation wraps to 0 is retired rather than recycled,
    /// so handles from its first epoch can never resolve again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (idx, generation) = decode(handle);
        let slot = self.slots.get_mut(idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(idx);
        }
        Some(value)
    }

    /// Number of live values.
    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }
}
