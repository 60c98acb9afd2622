//! Fixed-capacity entity pools
//!
//! Slots are allocated once when a level starts and then only toggled between
//! active and idle. Iteration order is slot order, which keeps spawn and
//! collision processing stable from tick to tick.

/// An entity that lives in a `Pool` slot
pub trait Pooled {
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}

/// Contiguous slot storage with an active flag per entry
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Pooled> Pool<T> {
    /// Build `capacity` idle slots
    pub fn new(capacity: usize, mut make: impl FnMut() -> T) -> Self {
        let slots = (0..capacity)
            .map(|_| {
                let mut slot = make();
                slot.deactivate();
                slot
            })
            .collect();
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|s| s.is_active())
    }

    /// Indices of idle slots, in slot order
    pub fn inactive_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_active())
            .map(|(i, _)| i)
            .collect()
    }

    /// Active entries other than `skip`
    pub fn others_active(&self, skip: usize) -> impl Iterator<Item = &T> {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(i, s)| *i != skip && s.is_active())
            .map(|(_, s)| s)
    }

    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Dot {
        active: bool,
    }

    impl Pooled for Dot {
        fn is_active(&self) -> bool {
            self.active
        }
        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    #[test]
    fn test_pool_starts_idle() {
        let pool = Pool::new(4, || Dot { active: true });
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.inactive_slots(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_pool_slots_are_reused() {
        let mut pool = Pool::new(3, Dot::default);
        pool.get_mut(1).unwrap().active = true;
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.inactive_slots(), vec![0, 2]);
        assert_eq!(pool.others_active(1).count(), 0);
        assert_eq!(pool.others_active(0).count(), 1);

        pool.deactivate_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 3);
    }
}
