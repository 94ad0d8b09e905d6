//! A growable contiguous array, built from first principles in two layers.
//!
//! - [`RawStorage`]: an owned block of uninitialized slots; allocation only
//! - [`DynamicArray`]: the typed container on top, which tracks which slots
//!   are live and does all construction, destruction and growth
//!
//! Keeping the layers apart means the growth logic never deals with the
//! allocator directly, and the storage never has to know about `T`'s
//! destructor.
//!
//! ```
//! use dynamic_array::{dynamic_array, DynamicArray};
//!
//! let mut array = DynamicArray::new();
//! for i in 0..5 {
//!     array.push(i);
//! }
//! assert_eq!(array, [0, 1, 2, 3, 4]);
//! assert_eq!(array.capacity(), 8);
//!
//! let mut other = dynamic_array![1, 2, 3, 4];
//! other.insert(2, 99);
//! assert_eq!(other, [1, 2, 99, 3, 4]);
//! other.erase(1);
//! assert_eq!(other, [1, 99, 3, 4]);
//! ```
//!
//! Fallible entry points report allocation and constructor failures instead
//! of aborting, and leave the array unchanged when they do:
//!
//! ```
//! use dynamic_array::{DynamicArray, EmplaceError};
//!
//! let mut array = DynamicArray::from([1u8, 2]);
//! let result = array.try_emplace_back_with(|| "x".parse::<u8>());
//! assert!(matches!(result, Err(EmplaceError::Construct(_))));
//! assert_eq!(array, [1, 2]);
//! assert_eq!(array.capacity(), 2);
//! ```
//!
//! Growth events are reported at `trace` level through the [`log`] facade.

#![no_std]

extern crate alloc;

mod dynamic_array;
mod error;
mod into_iter;
mod polyfill;
mod raw_storage;

#[doc(inline)]
pub use crate::{
    dynamic_array::DynamicArray,
    error::{AllocError, EmplaceError, TryReserveError},
    into_iter::IntoIter,
    raw_storage::RawStorage,
};
