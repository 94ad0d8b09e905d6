use {
    crate::{
        error::handle_reserve_error,
        polyfill::{array_layout, is_zst},
        TryReserveError,
    },
    alloc::alloc::{alloc, dealloc},
    core::{
        fmt,
        marker::PhantomData,
        mem::{self, MaybeUninit},
        ptr::NonNull,
        slice,
    },
};

/// An owned block of uninitialized slots for `T`.
///
/// The storage only knows how many slots it has, never which of them hold a
/// live `T`. Whoever owns the storage tracks liveness and must drop any live
/// elements before the storage itself is dropped; dropping the storage only
/// returns the memory to the allocator.
///
/// Zero-sized `T` and zero capacity never touch the allocator. In both cases
/// the pointer is dangling (but well aligned).
pub struct RawStorage<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawStorage<T> {}
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    /// Create an empty storage with no slots. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate storage for exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the block would exceed `isize::MAX` bytes. Allocator failure
    /// aborts via [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(storage) => storage,
            Err(err) => handle_reserve_error(err),
        }
    }

    /// Allocate storage for exactly `capacity` slots, reporting failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let layout = array_layout::<T>(capacity)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        // SAFETY: layout has nonzero size
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(TryReserveError::AllocError { layout })?;
        log::trace!(
            "allocated {} slots ({} bytes) of {}",
            capacity,
            layout.size(),
            core::any::type_name::<T>()
        );
        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// The number of slots in this storage, live or not.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a pointer valid *for reads only* to the first slot.
    ///
    /// The pointer is invalidated when the storage is moved out of, swapped,
    /// or used mutably.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Get a pointer valid for reads and writes to the first slot.
    ///
    /// The pointer is invalidated when the storage is moved out of or swapped.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset == capacity` is allowed and yields the one-past-the-end
    /// address, which must not be dereferenced.
    ///
    /// # Panics
    ///
    /// Panics if `offset > capacity`.
    #[track_caller]
    pub fn offset(&self, offset: usize) -> *const T {
        assert!(
            offset <= self.capacity,
            "offset {offset} out of range for storage of capacity {}",
            self.capacity
        );
        // SAFETY: within the allocation, or one past its end
        unsafe { self.as_ptr().add(offset) }
    }

    /// Mutable version of [`offset`](Self::offset).
    #[track_caller]
    pub fn offset_mut(&mut self, offset: usize) -> *mut T {
        assert!(
            offset <= self.capacity,
            "offset {offset} out of range for storage of capacity {}",
            self.capacity
        );
        // SAFETY: within the allocation, or one past its end
        unsafe { self.as_mut_ptr().add(offset) }
    }

    /// The slot at `index`, which may or may not hold a live `T`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn slot(&self, index: usize) -> &MaybeUninit<T> {
        &self.as_uninit_slice()[index]
    }

    /// Mutable version of [`slot`](Self::slot).
    #[track_caller]
    pub fn slot_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        &mut self.as_uninit_slice_mut()[index]
    }

    /// View every slot as possibly-uninitialized memory.
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: capacity slots are allocated (or T is zero-sized), and
        // MaybeUninit has no validity requirement
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Mutable version of [`as_uninit_slice`](Self::as_uninit_slice).
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: see as_uninit_slice; &mut self guarantees uniqueness
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Exchange blocks with `other`. Slot contents are not touched.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the block out, leaving `self` empty with capacity zero.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if self.capacity == 0 || is_zst::<T>() {
            return;
        }
        let Ok(layout) = array_layout::<T>(self.capacity) else {
            unreachable!("layout was validated at allocation")
        };
        // SAFETY: ptr was allocated by `alloc` with this exact layout
        unsafe { dealloc(self.ptr.as_ptr().cast(), layout) }
    }
}
