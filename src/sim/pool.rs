//! Bounded free-list of reusable entity records
//!
//! Records move by value between the pool and the owning subsystem's active list, so a
//! record is never reachable from both at once.

/// A free-list pool parameterized over the concrete entity struct
#[derive(Debug, Clone)]
pub struct Pool<T> {
    free: Vec<T>,
    capacity: usize,
    created: u64,
    discarded: u64,
}

impl<T: Default> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            created: 0,
            discarded: 0,
        }
    }

    /// Take a recycled record, or a fresh one when the free list is empty.
    ///
    /// The record's fields are stale; callers must overwrite every field before the
    /// record becomes visible to update/draw.
    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(record) => record,
            None => {
                self.created += 1;
                T::default()
            }
        }
    }

    /// Return a record to the free list. Beyond capacity the record is dropped.
    pub fn release(&mut self, record: T) {
        if self.free.len() < self.capacity {
            self.free.push(record);
        } else {
            self.discarded += 1;
        }
    }

    /// Records currently waiting in the free list
    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    /// Fresh records ever handed out
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Records dropped because the free list was full
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}
