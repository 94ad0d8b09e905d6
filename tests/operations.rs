use {
    cool_asserts::assert_panics,
    dynamic_array::{dynamic_array, DynamicArray},
    std::collections::hash_map::DefaultHasher,
    std::hash::{Hash, Hasher},
};

#[test]
fn insert_in_the_middle() {
    let mut array = dynamic_array![1, 2, 3, 4];
    assert_eq!(array.insert(2, 99), 2);
    assert_eq!(array, [1, 2, 99, 3, 4]);
}

#[test]
fn insert_at_both_ends_with_spare_capacity() {
    let mut array = DynamicArray::with_capacity(8);
    array.extend([2, 3]);
    array.insert(0, 1);
    array.insert(3, 4);
    assert_eq!(array, [1, 2, 3, 4]);
    assert_eq!(array.capacity(), 8);
}

#[test]
fn insert_that_grows_keeps_order() {
    let mut array = dynamic_array![1, 2, 3, 4];
    assert_eq!(array.capacity(), 4);
    array.insert(1, 10);
    assert_eq!(array, [1, 10, 2, 3, 4]);
    assert_eq!(array.capacity(), 8);

    let mut empty = DynamicArray::new();
    empty.insert(0, "only");
    assert_eq!(empty, ["only"]);
    assert_eq!(empty.capacity(), 1);
}

#[test]
fn emplace_builds_in_place() {
    let mut array = dynamic_array![String::from("a"), String::from("c")];
    let at = array.emplace_with(1, || "b".repeat(2));
    assert_eq!(at, 1);
    assert_eq!(array, ["a", "bb", "c"]);
}

#[test]
fn erase_shifts_left() {
    let mut array = dynamic_array![1, 2, 3, 4];
    assert_eq!(array.erase(1), 1);
    assert_eq!(array, [1, 3, 4]);
    assert_eq!(array[1], 3);
    assert_eq!(array.capacity(), 4);

    assert_eq!(array.erase(2), 2);
    assert_eq!(array, [1, 3]);
}

#[test]
fn remove_returns_the_element() {
    let mut array = dynamic_array![String::from("x"), String::from("y")];
    assert_eq!(array.remove(0), "x");
    assert_eq!(array, ["y"]);
}

#[test]
fn pop_and_pop_back() {
    let mut array = dynamic_array![1, 2];
    assert_eq!(array.pop(), Some(2));
    array.pop_back();
    assert!(array.is_empty());
    assert_eq!(array.pop(), None);
}

#[test]
fn resize_grows_with_defaults_and_truncates() {
    let mut array = dynamic_array![7, 8, 9];
    array.resize(5);
    assert_eq!(array, [7, 8, 9, 0, 0]);
    assert_eq!(array.capacity(), 5);
    array.resize(2);
    assert_eq!(array, [7, 8]);

    let mut counter = 0;
    array.resize_with(4, || {
        counter += 1;
        counter
    });
    assert_eq!(array, [7, 8, 1, 2]);
}

#[test]
fn with_len_default_constructs() {
    let array = DynamicArray::<String>::with_len(3);
    assert_eq!(array.len(), 3);
    assert_eq!(array.capacity(), 3);
    assert!(array.iter().all(String::is_empty));
}

#[test]
fn reserve_is_exact_and_idempotent() {
    let mut array = dynamic_array![1, 2];
    array.reserve(10);
    assert_eq!(array.capacity(), 10);
    array.reserve(3);
    assert_eq!(array.capacity(), 10);
    assert_eq!(array, [1, 2]);
}

#[test]
fn clone_is_independent() {
    let original = dynamic_array![String::from("a"), String::from("b")];
    let mut copy = original.clone();
    assert_eq!(copy, original);
    assert_eq!(copy.capacity(), 2);
    copy[0].push('!');
    copy.push(String::from("c"));
    assert_eq!(original, ["a", "b"]);
    assert_eq!(copy, ["a!", "b", "c"]);
}

#[test]
fn clone_from_reuses_capacity() {
    let mut target = DynamicArray::with_capacity(8);
    target.extend([1, 2, 3, 4, 5]);
    let ptr = target.as_ptr();

    target.clone_from(&dynamic_array![9, 8]);
    assert_eq!(target, [9, 8]);
    target.clone_from(&dynamic_array![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(target, [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(target.as_ptr(), ptr);
    assert_eq!(target.capacity(), 8);
}

#[test]
fn clone_from_larger_source_replaces_storage() {
    let mut target = dynamic_array![1];
    let source: DynamicArray<i32> = (0..6).collect();
    target.clone_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.capacity(), 6);
}

#[test]
fn take_leaves_source_empty() {
    let mut source = dynamic_array![1, 2, 3];
    let taken = source.take();
    assert_eq!(taken, [1, 2, 3]);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
    source.push(4);
    assert_eq!(source, [4]);
}

#[test]
fn swap_with_exchanges_everything() {
    let mut a = dynamic_array![1, 2, 3];
    let mut b = DynamicArray::with_capacity(10);
    b.push(9);
    a.swap_with(&mut b);
    assert_eq!((a.len(), a.capacity()), (1, 10));
    assert_eq!(b, [1, 2, 3]);
}

#[test]
fn iteration_covers_live_range() {
    let mut array = DynamicArray::with_capacity(10);
    array.extend([1, 2, 3]);
    for value in &mut array {
        *value *= 10;
    }
    let seen: Vec<_> = (&array).into_iter().copied().collect();
    assert_eq!(seen, [10, 20, 30]);

    let mut owned = array.into_iter();
    assert_eq!(owned.len(), 3);
    assert_eq!(owned.next(), Some(10));
    assert_eq!(owned.as_slice(), [20, 30]);
    assert_eq!(format!("{owned:?}"), "IntoIter([20, 30])");
}

#[test]
fn macro_forms() {
    let empty: DynamicArray<u8> = dynamic_array![];
    assert!(empty.is_empty());
    assert_eq!(dynamic_array![String::from("z"); 3], ["z", "z", "z"]);
    assert_eq!(dynamic_array![0u8; 0].capacity(), 0);
    assert_eq!(dynamic_array![1, 2, 3,], [1, 2, 3]);
}

#[test]
fn comparisons_and_hashing() {
    let a = dynamic_array![1, 2, 3];
    let b = DynamicArray::from(&[1, 2, 3][..]);
    assert_eq!(a, b);
    assert_eq!(a, vec![1, 2, 3]);
    assert_eq!(a, &[1, 2, 3][..]);
    assert!(a < dynamic_array![1, 2, 4]);
    assert_eq!(format!("{a:?}"), "[1, 2, 3]");

    let hash = |array: &DynamicArray<i32>| {
        let mut hasher = DefaultHasher::new();
        array.hash(&mut hasher);
        hasher.finish()
    };
    assert_eq!(hash(&a), hash(&b));
}

#[test]
fn extend_by_reference() {
    let mut array = dynamic_array![1];
    array.extend(&[2, 3]);
    array.extend_from_slice(&[4]);
    assert_eq!(array, [1, 2, 3, 4]);
}

#[test]
fn out_of_bounds_index_panics() {
    let array = dynamic_array![1, 2, 3];
    assert_panics!(
        {
            let value: i32 = array[3];
            value
        },
        includes("index out of bounds")
    );
}

#[test]
fn bad_positions_panic() {
    assert_panics!(
        {
            let mut array = dynamic_array![1, 2];
            array.insert(3, 0)
        },
        includes("insertion index (is 3) should be <= len (is 2)")
    );
    assert_panics!(
        {
            let mut array = dynamic_array![1, 2];
            array.erase(2)
        },
        includes("removal index (is 2) should be < len (is 2)")
    );
    assert_panics!(
        {
            let mut array = DynamicArray::<i32>::new();
            array.pop_back()
        },
        includes("pop_back on an empty DynamicArray")
    );
}
