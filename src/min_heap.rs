use thiserror::Error;

/// Binary min-heap over a 0-indexed vector.
///
/// Ordering is whatever `T: Ord` says; ties are not resolved here, so callers
/// that need a stable order must fold a sequence number into the key.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapErr {
    #[error("index {0} out of range for heap of size {1}")]
    KeyError(usize, usize),
    #[error("extract from empty heap")]
    HeapUnderflow,
}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Result<Self, HeapErr> {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i)?;
        }
        Ok(heap)
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    /// Sift the element at `i` down until both children are no smaller.
    pub fn min_heapify(&mut self, mut i: usize) -> Result<(), HeapErr> {
        let n = self.heap_size();
        if i >= n && n > 0 {
            return Err(HeapErr::KeyError(i, n));
        }
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return Ok(());
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[p] <= self.elements[i] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let result = self.elements.swap_remove(0);
        if !self.is_empty() {
            self.min_heapify(0)?;
        }
        Ok(result)
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        MinHeap { elements: vec![] }
    }
}
