use {
    crate::{
        error::handle_reserve_error, polyfill::grown_capacity, EmplaceError, IntoIter, RawStorage,
        TryReserveError,
    },
    core::{
        cmp::Ordering,
        convert::Infallible,
        fmt,
        hash::{Hash, Hasher},
        mem,
        ops::{Deref, DerefMut, Index, IndexMut},
        ptr,
        slice::{self, SliceIndex},
    },
};

/// A contiguous growable array built directly on a [`RawStorage`].
///
/// Slots `[0, len)` of the storage always hold live elements and slots
/// `[len, capacity)` are always uninitialized. Every operation below keeps
/// that split exact, including when `T`'s `Clone`, `Default`, `Drop` or a
/// constructor closure panics partway through.
///
/// Appending to a full array doubles its capacity (starting from one slot),
/// so a run of pushes costs amortized O(1) each. Capacity is never reduced
/// implicitly.
///
/// # Failure guarantees
///
/// Growth, `try_*` insertion and `clone_from` into a too-small array are
/// all-or-nothing: when they fail, length, capacity and every element are
/// exactly as before. Growth builds the new element in the new block first
/// and only then moves existing elements over; moving is a bitwise copy that
/// cannot fail, so nothing is ever cloned during reallocation.
///
/// When there is spare capacity, insertion runs the constructor before it
/// shifts anything, so a failing constructor leaves the array untouched as
/// well. Operations that fill element-by-element (`resize_with`,
/// `extend`, `clone_from` into an array with enough capacity) give the
/// weaker guarantee: a panic from `T` leaves a consistent array holding
/// whatever was completed so far.
pub struct DynamicArray<T> {
    storage: RawStorage<T>,
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Create an empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::new(),
            len: 0,
        }
    }

    /// Create an empty array with room for exactly `capacity` elements.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: RawStorage::with_capacity(capacity),
            len: 0,
        }
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            storage: RawStorage::try_with_capacity(capacity)?,
            len: 0,
        })
    }

    /// Create an array of `len` default values, with capacity exactly `len`.
    #[track_caller]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(len);
        array.resize_with(len, T::default);
        array
    }

    /// Create an array of `n` clones of `value`.
    #[track_caller]
    pub fn from_elem(value: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(n);
        if n > 0 {
            for _ in 1..n {
                array.push(value.clone());
            }
            array.push(value);
        }
        array
    }

    /// The number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of elements the array can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first len slots are live
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first len slots are live
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Get a pointer valid *for reads only* to the first element.
    ///
    /// The pointer is invalidated by any operation that reallocates.
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Get a pointer valid for reads and writes to the first element.
    ///
    /// The pointer is invalidated by any operation that reallocates.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Ensure the capacity is at least `capacity`.
    ///
    /// Unlike `Vec::reserve`, the argument is the total capacity wanted, not
    /// the additional room. If the array has to grow, the new capacity is
    /// exactly `capacity`.
    #[track_caller]
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            handle_reserve_error(err)
        }
    }

    /// Fallible version of [`reserve`](Self::reserve). On error the array is
    /// unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let grown = RawStorage::try_with_capacity(capacity)?;
        // SAFETY: grown has at least len slots
        unsafe { self.relocate(grown, None) };
        Ok(())
    }

    // Reserve room for `additional` more elements, amortizing like a push.
    fn try_reserve_amortized(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        if needed <= self.capacity() {
            return Ok(());
        }
        let doubled = grown_capacity(self.capacity())?;
        self.try_reserve(needed.max(doubled))
    }

    /// Move every live element into `grown` and adopt it. If `gap` is given,
    /// elements from `gap` on land one slot further right.
    ///
    /// # Safety
    ///
    /// - `grown` must have room for `len` elements (`len + 1` with a gap).
    /// - `gap`, if given, must be `<= len`.
    unsafe fn relocate(&mut self, mut grown: RawStorage<T>, gap: Option<usize>) {
        let len = self.len;
        let src = self.storage.as_ptr();
        let dst = grown.as_mut_ptr();
        unsafe {
            match gap {
                None => ptr::copy_nonoverlapping(src, dst, len),
                Some(index) => {
                    ptr::copy_nonoverlapping(src, dst, index);
                    ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
                }
            }
        }
        log::trace!(
            "DynamicArray<{}> grew from {} to {} slots",
            core::any::type_name::<T>(),
            self.storage.capacity(),
            grown.capacity()
        );
        // Every slot of the old block is now logically uninit; dropping it
        // only frees the memory.
        self.storage.swap(&mut grown);
    }

    /// Resize to `new_len`, dropping the tail or appending default values.
    #[track_caller]
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Fallible version of [`resize`](Self::resize). Allocation failure
    /// leaves the array unchanged.
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), TryReserveError>
    where
        T: Default,
    {
        self.try_resize_with(new_len, T::default)
    }

    /// Resize to `new_len`, dropping the tail or appending values from `f`.
    ///
    /// When growing, the capacity becomes at least `new_len` (exactly
    /// `new_len` if it had to grow).
    #[track_caller]
    pub fn resize_with(&mut self, new_len: usize, f: impl FnMut() -> T) {
        if let Err(err) = self.try_resize_with(new_len, f) {
            handle_reserve_error(err)
        }
    }

    /// Fallible version of [`resize_with`](Self::resize_with).
    pub fn try_resize_with(
        &mut self,
        new_len: usize,
        mut f: impl FnMut() -> T,
    ) -> Result<(), TryReserveError> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.try_reserve(new_len)?;
        while self.len < new_len {
            let value = f();
            // SAFETY: len < new_len <= capacity
            unsafe { self.storage.as_mut_ptr().add(self.len).write(value) };
            self.len += 1;
        }
        Ok(())
    }

    /// Drop every element from `new_len` on. No-op if already that short.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail_len = self.len - new_len;
        // SAFETY: [new_len, len) is live
        let tail = unsafe {
            ptr::slice_from_raw_parts_mut(self.storage.as_mut_ptr().add(new_len), tail_len)
        };
        // Shrink first so a panicking destructor can't lead to a double drop.
        self.len = new_len;
        // SAFETY: the tail is no longer counted as live
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Append `value` and return a reference to it.
    #[track_caller]
    pub fn push(&mut self, value: T) -> &mut T {
        self.emplace_back_with(|| value)
    }

    /// Fallible version of [`push`](Self::push). On error the array is
    /// unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<&mut T, TryReserveError> {
        self.try_emplace_back_with(|| Ok::<_, Infallible>(value))
            .map_err(|err| match err {
                EmplaceError::Reserve(err) => err,
                EmplaceError::Construct(never) => match never {},
            })
    }

    /// Append the value built by `f` and return a reference to it.
    ///
    /// If the array has to grow, `f` runs after the new block is allocated.
    #[track_caller]
    pub fn emplace_back_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        let index = self.len;
        unwrap_infallible(self.emplace_impl(index, || Ok(f())))
    }

    /// Append the value built by the fallible `f`.
    ///
    /// On any error the array is unchanged, capacity included.
    pub fn try_emplace_back_with<E>(
        &mut self,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, EmplaceError<E>> {
        let index = self.len;
        self.emplace_impl(index, f)
    }

    /// Remove the last element and return it, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot len was live and is no longer counted
        Some(unsafe { self.storage.as_ptr().add(self.len).read() })
    }

    /// Drop the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        assert!(self.len != 0, "pop_back on an empty DynamicArray");
        drop(self.pop());
    }

    /// Insert `value` before position `index`, shifting later elements
    /// right. Returns `index`, the position of the new element.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace_with(index, || value)
    }

    /// Insert the value built by `f` before position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn emplace_with(&mut self, index: usize, f: impl FnOnce() -> T) -> usize {
        unwrap_infallible(self.emplace_impl(index, || Ok(f())));
        index
    }

    /// Insert the value built by the fallible `f` before position `index`.
    ///
    /// On any error the array is unchanged, capacity included.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_emplace_with<E>(
        &mut self,
        index: usize,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<usize, EmplaceError<E>> {
        self.emplace_impl(index, f)?;
        Ok(index)
    }

    #[track_caller]
    fn emplace_impl<E>(
        &mut self,
        index: usize,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, EmplaceError<E>> {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if len < self.capacity() {
            // Build the value before anything moves; if f fails or panics
            // there is nothing to undo.
            let value = f().map_err(EmplaceError::Construct)?;
            // SAFETY: index <= len < capacity, and [index, len) shifted right
            // by one still ends within capacity
            unsafe {
                let slot = self.storage.as_mut_ptr().add(index);
                if index < len {
                    ptr::copy(slot, slot.add(1), len - index);
                }
                slot.write(value);
            }
        } else {
            let mut grown: RawStorage<T> =
                RawStorage::try_with_capacity(grown_capacity(self.capacity())?)?;
            // The new element goes into its final slot first. Until relocate
            // runs, a failure here only drops `grown`.
            let value = f().map_err(EmplaceError::Construct)?;
            // SAFETY: index <= len < grown capacity
            unsafe { grown.offset_mut(index).write(value) };
            // SAFETY: grown has at least len + 1 slots, index <= len
            unsafe { self.relocate(grown, Some(index)) };
        }

        self.len = len + 1;
        // SAFETY: slot index was just initialized
        Ok(unsafe { &mut *self.storage.as_mut_ptr().add(index) })
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        // SAFETY: index < len, and [index + 1, len) shifted left by one stays
        // within the live range
        unsafe {
            let slot = self.storage.as_mut_ptr().add(index);
            let removed = slot.read();
            ptr::copy(slot.add(1), slot, len - index - 1);
            self.len = len - 1;
            removed
        }
    }

    /// Drop the element at `index`, shifting later elements left. Returns
    /// `index`, which now names the element that followed the removed one
    /// (or the end).
    ///
    /// Never reallocates.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Clone and append every element of `other`.
    #[track_caller]
    pub fn extend_from_slice(&mut self, other: &[T])
    where
        T: Clone,
    {
        if let Err(err) = self.try_reserve_amortized(other.len()) {
            handle_reserve_error(err)
        }
        for item in other {
            self.push(item.clone());
        }
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Move the contents out, leaving `self` empty with capacity zero.
    pub fn take(&mut self) -> Self {
        Self {
            storage: self.storage.take(),
            len: mem::replace(&mut self.len, 0),
        }
    }

    pub(crate) fn into_raw_parts(mut self) -> (RawStorage<T>, usize) {
        let parts = (self.storage.take(), self.len);
        self.len = 0;
        parts
    }
}

#[track_caller]
fn unwrap_infallible<R>(result: Result<R, EmplaceError<Infallible>>) -> R {
    match result {
        Ok(it) => it,
        Err(EmplaceError::Reserve(err)) => handle_reserve_error(err),
        Err(EmplaceError::Construct(never)) => match never {},
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: the live elements are dropped exactly once; the storage
        // drops afterwards and frees the block
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        copy.extend_from_slice(self);
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            // Build the whole copy aside; a panicking clone leaves self alone.
            let mut copy = source.clone();
            self.swap_with(&mut copy);
            return;
        }

        let common = self.len.min(source.len);
        for (dst, src) in self[..common].iter_mut().zip(&source[..common]) {
            dst.clone_from(src);
        }
        if source.len < self.len {
            self.truncate(source.len);
        } else {
            // fits in the current capacity, so this never reallocates
            self.extend_from_slice(&source[common..]);
        }
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    #[track_caller]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state)
    }
}

macro_rules! impl_slice_eq {
    ([$($vars:tt)*] $rhs:ty) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for DynamicArray<T>
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: &$rhs) -> bool {
                self[..] == other[..]
            }
        }
    };
}

impl_slice_eq! { [] DynamicArray<U> }
impl_slice_eq! { [] [U] }
impl_slice_eq! { [] &[U] }
impl_slice_eq! { [] &mut [U] }
impl_slice_eq! { [] alloc::vec::Vec<U> }
impl_slice_eq! { [const N: usize] [U; N] }
impl_slice_eq! { [const N: usize] &[U; N] }

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialOrd> PartialOrd for DynamicArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        PartialOrd::partial_cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: Ord> Ord for DynamicArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(self.as_slice(), other.as_slice())
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(err) = self.try_reserve_amortized(lower) {
            handle_reserve_error(err)
        }
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        <Self as Extend<T>>::extend(self, iter.into_iter().copied())
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(items: [T; N]) -> Self {
        let mut array = Self::with_capacity(N);
        array.extend(items);
        array
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(items: &[T]) -> Self {
        let mut array = Self::with_capacity(items.len());
        array.extend_from_slice(items);
        array
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (storage, len) = self.into_raw_parts();
        IntoIter::new(storage, len)
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Create a [`DynamicArray`] containing the arguments.
///
/// Like `vec!`, this comes in two forms: a list of elements, or
/// `dynamic_array![value; n]` for `n` clones of `value`.
#[macro_export]
macro_rules! dynamic_array {
    () => {
        $crate::DynamicArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynamicArray::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($x),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // With zero-sized elements the array can be full at a capacity whose
    // doubling overflows, without allocating or constructing anything.
    fn full_at_largest_capacity() -> DynamicArray<()> {
        let mut array = DynamicArray::with_capacity(usize::MAX / 2 + 1);
        array.len = array.capacity();
        array
    }

    #[test]
    fn growth_overflow_is_reported_before_construction() {
        let mut array = full_at_largest_capacity();
        let mut called = false;
        let result = array.try_emplace_back_with(|| {
            called = true;
            Ok::<(), &str>(())
        });
        assert!(matches!(
            result,
            Err(EmplaceError::Reserve(TryReserveError::CapacityOverflow))
        ));
        assert!(!called);
        assert_eq!(array.len(), usize::MAX / 2 + 1);
        assert_eq!(array.capacity(), usize::MAX / 2 + 1);
    }

    #[test]
    fn growth_overflow_in_the_middle_leaves_array_unchanged() {
        let mut array = full_at_largest_capacity();
        let result = array.try_emplace_with(1, || Err::<(), _>("never built"));
        assert!(matches!(
            result,
            Err(EmplaceError::Reserve(TryReserveError::CapacityOverflow))
        ));
        assert_eq!(
            array.try_push(()).map(|_| ()),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(array.len(), usize::MAX / 2 + 1);
        assert_eq!(array.capacity(), usize::MAX / 2 + 1);
    }
}
