//! One category's growable id array, stored in the queue's arena.

use strata_arena::{Allocation, Arena, ArenaError};

use crate::info::DrawId;

const ID_SIZE: usize = std::mem::size_of::<DrawId>();
const ID_ALIGN: usize = std::mem::align_of::<DrawId>();

/// `{ storage, count, capacity }` for one queue category.
///
/// The bin owns no memory itself. Growth allocates a doubled array from
/// the arena and copies the live prefix; the old array stays behind as
/// scrap until the arena is reset.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct QueueBin {
    storage: Option<Allocation>,
    count: usize,
    capacity: usize,
}

impl QueueBin {
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `id`, growing to `initial_capacity` or double the current
    /// capacity when full. On error the bin is unchanged.
    pub(crate) fn push(
        &mut self,
        arena: &mut Arena,
        id: DrawId,
        initial_capacity: usize,
    ) -> Result<(), ArenaError> {
        let storage = match self.storage {
            Some(storage) if self.count < self.capacity => storage,
            _ => self.grow(arena, initial_capacity)?,
        };
        arena.slice_mut::<DrawId>(storage)?[self.count] = id;
        self.count += 1;
        Ok(())
    }

    fn grow(&mut self, arena: &mut Arena, initial_capacity: usize) -> Result<Allocation, ArenaError> {
        let capacity = if self.capacity == 0 {
            initial_capacity
        } else {
            self.capacity.saturating_mul(2)
        };
        let fresh = arena.allocate(capacity.saturating_mul(ID_SIZE), ID_ALIGN)?;
        if let Some(old) = self.storage {
            arena.copy_bytes(old, fresh, self.count * ID_SIZE)?;
        }
        log::trace!("queue bin: grew {} -> {capacity} entries", self.capacity);
        self.storage = Some(fresh);
        self.capacity = capacity;
        Ok(fresh)
    }

    /// The live ids.
    pub(crate) fn ids<'a>(&self, arena: &'a Arena) -> &'a [DrawId] {
        match self.storage {
            None => &[],
            Some(storage) => {
                let ids = arena
                    .slice::<DrawId>(storage)
                    .expect("bin storage lives until the queue resets");
                &ids[..self.count]
            }
        }
    }

    /// The live ids, mutably.
    pub(crate) fn ids_mut<'a>(&self, arena: &'a mut Arena) -> &'a mut [DrawId] {
        match self.storage {
            None => &mut [],
            Some(storage) => {
                let ids = arena
                    .slice_mut::<DrawId>(storage)
                    .expect("bin storage lives until the queue resets");
                &mut ids[..self.count]
            }
        }
    }

    /// Forget the array. Called alongside an arena reset.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
