use {
    crate::TryReserveError,
    core::{alloc::Layout, mem},
};

pub(crate) const fn is_zst<T>() -> bool {
    mem::size_of::<T>() == 0
}

// Layout::array already refuses anything over isize::MAX bytes, which is the
// only overflow we care about here.
pub(crate) fn array_layout<T>(capacity: usize) -> Result<Layout, TryReserveError> {
    Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)
}

/// Capacity after one amortized growth step: double, but at least one slot.
pub(crate) fn grown_capacity(capacity: usize) -> Result<usize, TryReserveError> {
    match capacity {
        0 => Ok(1),
        n => n.checked_mul(2).ok_or(TryReserveError::CapacityOverflow),
    }
}
