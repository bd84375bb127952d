// Fixed-capacity sample history (circular buffer over an owned arena)

/// Number of samples kept for display unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 16;

/// Ring buffer holding the most recent `capacity` values.
///
/// `head` is the slot the next push writes to; once `len == capacity` that slot
/// holds the oldest value, so a push overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    slots: Box<[T]>,
    head: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Capacity is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity.max(1)].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value`, overwriting the oldest entry when full.
    pub fn push(&mut self, value: T) {
        self.slots[self.head] = value;
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
    }

    /// Index into `slots` of the oldest held value.
    fn tail(&self) -> usize {
        (self.head + self.capacity() - self.len) % self.capacity()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        let tail = self.tail();
        let cap = self.capacity();
        (0..self.len).map(move |i| self.slots[(tail + i) % cap])
    }

    /// Copy of the held values, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Up to `n` most recent values, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<T> {
        let skip = self.len.saturating_sub(n);
        self.iter().skip(skip).collect()
    }
}

impl<T: Copy + Default> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
