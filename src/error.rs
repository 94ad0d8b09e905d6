use core::{alloc::Layout, error::Error, fmt};

/// The global allocator could not satisfy a request.
///
/// (This is a stand-in for `core::alloc::AllocError`, which is not yet
/// usable on stable.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

impl Error for AllocError {}

/// Errors from reserving capacity in a [`RawStorage`] or [`DynamicArray`].
///
/// [`RawStorage`]: crate::RawStorage
/// [`DynamicArray`]: crate::DynamicArray
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TryReserveError {
    /// The requested capacity does not fit in `isize::MAX` bytes.
    CapacityOverflow,
    /// The allocator refused the request.
    AllocError {
        /// Layout of the rejected request.
        layout: Layout,
    },
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => {
                f.write_str("capacity overflow: requested size exceeds isize::MAX bytes")
            }
            Self::AllocError { layout } => {
                write!(
                    f,
                    "memory allocation of {} bytes (align {}) failed",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for TryReserveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CapacityOverflow => None,
            Self::AllocError { .. } => Some(&AllocError),
        }
    }
}

/// Errors from the fallible `try_emplace*` family.
///
/// Either making room for the element failed, or the element's constructor
/// reported an error of its own. In both cases the array is left exactly as
/// it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmplaceError<E> {
    /// Growing the storage failed.
    Reserve(TryReserveError),
    /// The constructor closure returned an error.
    Construct(E),
}

impl<E> From<TryReserveError> for EmplaceError<E> {
    fn from(err: TryReserveError) -> Self {
        Self::Reserve(err)
    }
}

impl<E: fmt::Display> fmt::Display for EmplaceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserve(err) => write!(f, "could not make room for element: {err}"),
            Self::Construct(err) => write!(f, "element construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for EmplaceError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reserve(err) => Some(err),
            Self::Construct(err) => Some(err),
        }
    }
}

/// Escalate a reservation failure from an infallible entry point.
#[cold]
#[track_caller]
pub(crate) fn handle_reserve_error(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => panic!("capacity overflow"),
        TryReserveError::AllocError { layout } => {
            log::error!(
                "allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            );
            alloc::alloc::handle_alloc_error(layout)
        }
    }
}
