//! Unit tests for BalancedMap.

use balanced_map::avl::{BalancedMap, BalancedMapError, DuplicateKeyError, KeyNotFoundError};
use rstest::{fixture, rstest};

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn numbers() -> BalancedMap<String, i32> {
    let mut map = BalancedMap::new();
    for (key, value) in [("one", 1), ("two", 2), ("three", 3), ("four", 4), ("five", 5)] {
        map.insert(key.to_string(), value).unwrap();
    }
    map
}

fn shape<K: Clone, V>(map: &BalancedMap<K, V>) -> Vec<Vec<Option<K>>> {
    map.rows()
        .map(|row| row.into_iter().map(|slot| slot.cloned()).collect())
        .collect()
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: BalancedMap<i32, String> = BalancedMap::new();
    assert!(map.is_empty());
    assert_eq!(map.count(), 0);
    assert_eq!(map.height(), 0);
}

#[rstest]
fn test_default_creates_empty_map() {
    let map: BalancedMap<i32, String> = BalancedMap::default();
    assert!(map.is_empty());
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[rstest]
fn test_contains_all_inserted_keys(numbers: BalancedMap<String, i32>) {
    for key in ["one", "two", "three", "four", "five"] {
        assert!(numbers.contains_key(key), "missing {key}");
    }
    assert_eq!(numbers.count(), 5);
}

#[rstest]
fn test_remove_then_lookup(mut numbers: BalancedMap<String, i32>) {
    assert_eq!(numbers.remove("three"), Some(3));
    assert!(!numbers.contains_key("three"));
    assert_eq!(numbers.count(), 4);
    assert!(numbers.is_height_balanced());
}

#[rstest]
#[case("one", Some(1))]
#[case("five", Some(5))]
#[case("six", None)]
fn test_get(numbers: BalancedMap<String, i32>, #[case] key: &str, #[case] expected: Option<i32>) {
    assert_eq!(numbers.get(key).copied(), expected);
}

#[rstest]
fn test_try_get_missing_key(numbers: BalancedMap<String, i32>) {
    assert_eq!(numbers.try_get("four"), Ok(&4));
    assert_eq!(numbers.try_get("zero"), Err(KeyNotFoundError));
}

#[rstest]
fn test_get_on_empty_map_returns_none() {
    let map: BalancedMap<i32, i32> = BalancedMap::new();
    assert_eq!(map.get(&1), None);
    assert!(!map.contains_key(&1));
}

// =============================================================================
// Insert Tests
// =============================================================================

#[rstest]
fn test_balanced_after_every_insert() {
    let mut map = BalancedMap::new();
    for key in [12, 8, 11, 4, 10, 18, 17, 5] {
        map.insert(key, 0).unwrap();
        assert!(map.is_height_balanced(), "unbalanced after inserting {key}");
    }
    assert_eq!(map.count(), 8);
    assert_eq!(map.height(), 4);
}

#[rstest]
fn test_ascending_inserts_stay_logarithmic() {
    let mut map = BalancedMap::new();
    for key in 0..1023 {
        map.insert(key, key).unwrap();
    }
    assert!(map.is_height_balanced());
    assert_eq!(map.height(), 10);
}

#[rstest]
fn test_duplicate_insert_leaves_map_unchanged(mut numbers: BalancedMap<String, i32>) {
    let before = numbers.clone();
    let rows_before = shape(&numbers);

    let result = numbers.insert("two".to_string(), 22);

    assert_eq!(
        result,
        Err(DuplicateKeyError {
            key: "two".to_string(),
            value: 22
        })
    );
    assert_eq!(numbers, before);
    assert_eq!(shape(&numbers), rows_before);
    assert_eq!(numbers.count(), 5);
}

#[rstest]
fn test_errors_compose_with_question_mark() {
    fn run(map: &mut BalancedMap<i32, i32>) -> Result<i32, BalancedMapError<i32, i32>> {
        map.insert(1, 10)?;
        let value = *map.try_get(&2)?;
        Ok(value)
    }

    let mut map = BalancedMap::new();
    assert_eq!(run(&mut map), Err(BalancedMapError::KeyNotFound(KeyNotFoundError)));
    assert_eq!(
        run(&mut map),
        Err(BalancedMapError::DuplicateKey(DuplicateKeyError { key: 1, value: 10 }))
    );
}

// =============================================================================
// Remove Tests
// =============================================================================

#[rstest]
fn test_remove_absent_key_is_noop(mut numbers: BalancedMap<String, i32>) {
    let rows_before = shape(&numbers);
    assert_eq!(numbers.remove("zero"), None);
    assert_eq!(numbers.count(), 5);
    assert_eq!(shape(&numbers), rows_before);
}

#[rstest]
fn test_remove_from_empty_map() {
    let mut map: BalancedMap<i32, i32> = BalancedMap::new();
    assert_eq!(map.remove(&1), None);
    assert!(map.is_empty());
}

#[rstest]
fn test_remove_everything_in_insertion_order() {
    let keys = [12, 8, 11, 4, 10, 18, 17, 5];
    let mut map = BalancedMap::try_from_entries(keys.map(|key| (key, key))).unwrap();
    for (removed, key) in keys.iter().enumerate() {
        assert_eq!(map.remove(key), Some(*key));
        assert!(map.is_height_balanced());
        assert_eq!(map.count(), keys.len() - removed - 1);
    }
    assert!(map.is_empty());
}

#[rstest]
fn test_remove_root_with_two_children() {
    let mut map = BalancedMap::try_from_entries((1..=7).map(|key| (key, ()))).unwrap();
    assert_eq!(map.row(0), vec![Some(&4)]);

    map.remove(&4);

    assert_eq!(map.row(0), vec![Some(&5)]);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7]);
}

// =============================================================================
// Clear and Copy Tests
// =============================================================================

#[rstest]
fn test_clear_then_reuse(mut numbers: BalancedMap<String, i32>) {
    numbers.clear();
    assert!(numbers.is_empty());
    assert_eq!(numbers.count(), 0);

    numbers.insert("fifty five".to_string(), 55).unwrap();
    numbers.insert("thirty nine".to_string(), 39).unwrap();
    assert_eq!(numbers.get("fifty five"), Some(&55));
    assert_eq!(numbers.get("thirty nine"), Some(&39));
}

#[rstest]
fn test_copy_is_independent() {
    let mut original = BalancedMap::new();
    original.insert("fifty five".to_string(), 55).unwrap();
    original.insert("thirty nine".to_string(), 39).unwrap();

    let copy = original.clone();
    original.remove("fifty five");
    original.remove("thirty nine");

    assert!(!original.contains_key("fifty five"));
    assert!(!original.contains_key("thirty nine"));
    assert_eq!(copy.get("fifty five"), Some(&55));
    assert_eq!(copy.get("thirty nine"), Some(&39));
}

#[rstest]
fn test_copy_has_same_shape() {
    let original =
        BalancedMap::try_from_entries([12, 8, 11, 4, 10, 18, 17, 5].map(|key| (key, ()))).unwrap();
    let copy = original.clone();
    assert_eq!(shape(&copy), shape(&original));
}

#[rstest]
fn test_clone_from_assigns_deep_copy(numbers: BalancedMap<String, i32>) {
    let mut target = BalancedMap::new();
    target.insert("stale".to_string(), 0).unwrap();

    target.clone_from(&numbers);

    assert_eq!(target, numbers);
    assert!(!target.contains_key("stale"));
}

// =============================================================================
// Traversal Tests
// =============================================================================

#[rstest]
fn test_iter_returns_entries_in_sorted_order(numbers: BalancedMap<String, i32>) {
    let keys: Vec<&str> = numbers.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["five", "four", "one", "three", "two"]);
}

#[rstest]
fn test_rows_render_every_level() {
    let map =
        BalancedMap::try_from_entries([12, 8, 11, 4, 10, 18, 17, 5].map(|key| (key, ()))).unwrap();

    let rendered: Vec<String> = map
        .rows()
        .map(|row| {
            row.into_iter()
                .map(|slot| slot.map_or_else(|| "N".to_string(), ToString::to_string))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    assert_eq!(
        rendered,
        vec!["11", "8 17", "4 10 12 18", "N 5 N N N N N N"]
    );
}

#[rstest]
fn test_row_past_leaves() {
    let mut map = BalancedMap::new();
    map.insert(1, ()).unwrap();
    assert_eq!(map.row(1), vec![None, None]);
    assert!(map.row(2).is_empty());
}

#[rstest]
fn test_insertion_order_changes_shape_not_contents() {
    let ascending = BalancedMap::try_from_entries((1..=4).map(|key| (key, ()))).unwrap();
    let descending = BalancedMap::try_from_entries((1..=4).rev().map(|key| (key, ()))).unwrap();

    assert_eq!(ascending, descending);
    assert_eq!(ascending.row(2), vec![None, None, None, Some(&4)]);
    assert_eq!(descending.row(2), vec![Some(&1), None, None, None]);
}
