use {
    crate::RawStorage,
    core::{fmt, iter::FusedIterator, ptr, slice},
};

/// An owning iterator over the elements of a [`DynamicArray`].
///
/// Elements not yet yielded are dropped with the iterator.
///
/// [`DynamicArray`]: crate::DynamicArray
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    // [next, end) is still live
    next: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(storage: RawStorage<T>, len: usize) -> Self {
        Self {
            storage,
            next: 0,
            end: len,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [next, end) is live
        unsafe { slice::from_raw_parts(self.storage.offset(self.next), self.end - self.next) }
    }

    /// Mutable version of [`as_slice`](Self::as_slice).
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.end - self.next;
        // SAFETY: [next, end) is live
        unsafe { slice::from_raw_parts_mut(self.storage.offset_mut(self.next), len) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next == self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        // SAFETY: slot index was live and is no longer counted
        Some(unsafe { self.storage.offset(index).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining: *mut [T] = self.as_mut_slice();
        self.next = self.end;
        // SAFETY: the remaining elements are live and dropped exactly once
        unsafe { ptr::drop_in_place(remaining) }
    }
}
