use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Once};

use degree_btree::{BTree, Degree, DuplicatePolicy, Error, InsertOutcome, NaturalOrder, Reverse};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Routes the crate's trace events to the test output when `RUST_LOG` asks for them.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("degree_btree=warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

/// Records the target of every event it sees.
#[derive(Clone, Default)]
struct TargetRecorder(Arc<Mutex<Vec<String>>>);

impl TargetRecorder {
    fn targets(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> Layer<S> for TargetRecorder {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(event.metadata().target().to_owned());
    }
}

fn key_strategy() -> impl Strategy<Value = i64> {
    // Small enough relative to TEST_SIZE to make collisions common.
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn degree_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(2usize), Just(3), 4usize..12, Just(Degree::DEFAULT.get())]
}

fn collect_keys<C>(tree: &BTree<i64, i64, C>) -> Vec<i64> {
    tree.keys().copied().collect()
}

// ─── Worked scenarios ────────────────────────────────────────────────────────

#[test]
fn remove_from_ascending_degree_three_tree() {
    init_tracing();
    let mut tree = BTree::new(3).unwrap();
    for key in 1..=12 {
        tree.add(key, key * 100).unwrap();
    }

    assert_eq!(tree.remove(&7), Some(700));
    assert_eq!(tree.len(), 11);
    assert_eq!(collect_keys(&tree), [1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12]);
    assert_eq!(tree.get(&7), None);
}

#[test]
fn scrambled_inserts_drain_in_order() {
    init_tracing();
    let keys = [10, 11, 12, 4, 5, 13, 8, 16, 17, 1, 14, 15, 6, 7, 2, 3, 9];
    let mut tree = BTree::new(5).unwrap();
    for key in keys {
        tree.add(key, key.to_string()).unwrap();
    }

    assert_eq!(tree.max(), Ok((&17, &String::from("17"))));
    assert_eq!(tree.min(), Ok((&1, &String::from("1"))));

    let mut drained = Vec::new();
    for _ in 0..keys.len() {
        let (key, value) = tree.pop_min().unwrap();
        assert_eq!(value, key.to_string());
        drained.push(key);
    }
    assert_eq!(drained, (1..=17).collect::<Vec<_>>());
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.pop_min(), Err(Error::EmptyCollection));
}

#[test]
fn duplicate_add_fails_and_keeps_count() {
    let mut tree = BTree::new(2).unwrap();
    tree.add("k", 1).unwrap();
    assert_eq!(tree.add("k", 2), Err(Error::DuplicateKey));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[&"k"], 1);
}

/// Smallest and largest height a tree of degree `t` holding `n` entries can have.
fn height_bounds(t: usize, n: usize) -> (usize, usize) {
    // Height h holds at most (2t)^(h+1) - 1 entries and at least 2t^h - 1.
    let mut min = 0;
    while (2 * t).pow(u32::try_from(min + 1).unwrap()) - 1 < n {
        min += 1;
    }
    let mut max = 0;
    while 2 * t.pow(u32::try_from(max + 1).unwrap()) - 1 <= n {
        max += 1;
    }
    (min, max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn thousand_random_keys_degree_eight(keys in prop::collection::hash_set(any::<i64>(), 1_000)) {
        let mut tree = BTree::new(8).unwrap();
        for &key in &keys {
            tree.add(key, key.wrapping_mul(3)).unwrap();
        }

        prop_assert_eq!(tree.len(), 1_000);
        for &key in &keys {
            prop_assert_eq!(tree.get(&key), Some(&key.wrapping_mul(3)));
        }

        let (min, max) = height_bounds(8, 1_000);
        prop_assert!((min..=max).contains(&tree.height()), "height {} outside {min}..={max}", tree.height());
        // ceil(log_8(1000)) = 4
        prop_assert!(tree.height() <= 4);
    }
}

#[test]
fn second_removal_borrows_from_sibling() {
    let mut tree = BTree::new(3).unwrap();
    tree.extend((1..=12).map(|k| (k, k)));

    let first = TargetRecorder::default();
    {
        let _guard = tracing_subscriber::registry().with(first.clone()).set_default();
        assert_eq!(tree.remove(&3), Some(3));
    }
    assert!(first.targets().iter().any(|target| target == "degree_btree::merge"));

    let second = TargetRecorder::default();
    {
        let _guard = tracing_subscriber::registry().with(second.clone()).set_default();
        assert_eq!(tree.remove(&7), Some(7));
    }
    assert!(
        second.targets().iter().any(|target| target == "degree_btree::rotate"),
        "expected a sibling borrow, saw {:?}",
        second.targets()
    );

    let remaining: Vec<i32> = tree.keys().copied().collect();
    let expected: Vec<i32> = (1..=12).filter(|k| *k != 3 && *k != 7).collect();
    assert_eq!(remaining, expected);
}

// ─── Boundary behavior ───────────────────────────────────────────────────────

#[test]
fn degree_below_two_is_rejected() {
    for degree in [0, 1] {
        assert_eq!(
            BTree::<i32, i32>::new(degree).unwrap_err(),
            Error::InvalidDegree { degree, min: 2 }
        );
        assert!(Degree::try_from(degree).is_err());
    }
    assert_eq!(BTree::<i32, i32>::new(2).unwrap().degree().get(), 2);
}

#[test]
fn duplicate_policies_on_repeated_key() {
    let mut tree = BTree::new(2).unwrap();
    assert_eq!(tree.insert_with(1, "first", DuplicatePolicy::Error), Ok(InsertOutcome::Added));

    assert_eq!(tree.insert_with(1, "second", DuplicatePolicy::Overwrite), Ok(InsertOutcome::Updated("first")));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(&1), Some(&"second"));

    assert_eq!(tree.insert_with(1, "third", DuplicatePolicy::Reject), Ok(InsertOutcome::Rejected));
    assert_eq!(tree.get(&1), Some(&"second"));

    assert_eq!(tree.insert_with(1, "fourth", DuplicatePolicy::Error), Err(Error::DuplicateKey));
    assert_eq!(tree.get(&1), Some(&"second"));
    assert_eq!(tree.len(), 1);
}

#[test]
fn only_entry_removal_empties_tree() {
    let mut tree = BTree::new(4).unwrap();
    tree.insert(42, ());
    assert_eq!(tree.remove_entry(&42), Some((42, ())));
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.first_key_value(), None);
    assert_eq!(tree.max(), Err(Error::EmptyCollection));
}

#[test]
fn root_with_single_child_collapses() {
    let mut tree = BTree::new(2).unwrap();
    tree.extend([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    assert_eq!(tree.height(), 1);

    tree.remove(&4);
    tree.remove(&1);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.iter().collect::<Vec<_>>(), [(&2, &'b'), (&3, &'c')]);
}

#[test]
fn remove_missing_key_is_not_an_error() {
    let mut tree = BTree::new(3).unwrap();
    tree.extend((0..100).map(|k| (k, k)));
    assert_eq!(tree.remove(&1_000), None);
    assert_eq!(tree.len(), 100);
    assert!(!tree.contains_key(&1_000));
}

#[test]
fn custom_comparator_drives_order() {
    let mut tree = BTree::with_comparator(2, Reverse(NaturalOrder)).unwrap();
    tree.extend((0..40).map(|k| (k, ())));
    let keys: Vec<i32> = tree.keys().copied().collect();
    assert_eq!(keys, (0..40).rev().collect::<Vec<_>>());
    assert_eq!(tree.first_key_value(), Some((&39, &())));

    let mut by_len = BTree::with_comparator(3, |a: &&str, b: &&str| a.len().cmp(&b.len())).unwrap();
    assert!(by_len.try_add("ccc", 3));
    assert!(by_len.try_add("a", 1));
    // Same length as "a", so it counts as the same key.
    assert!(!by_len.try_add("b", 2));
    assert_eq!(by_len.get_key_value(&"z"), Some((&"a", &1)));
}

#[test]
fn partially_consumed_into_iter_drops_the_rest() {
    let mut tree = BTree::new(2).unwrap();
    tree.extend((0..200).map(|k| (k, k.to_string())));
    let mut iter = tree.into_iter();
    assert_eq!(iter.next(), Some((0, String::from("0"))));
    assert_eq!(iter.len(), 199);
    drop(iter);
}

// ─── Model-based operations (compared against BTreeMap) ──────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Add(i64, i64),
    TryAdd(i64, i64),
    Remove(i64),
    Get(i64),
    GetMut(i64, i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Add(k, v)),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::TryAdd(k, v)),
        4 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::GetMut(k, v)),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both trees and compares every result.
    #[test]
    fn ops_match_btreemap(
        degree in degree_strategy(),
        ops in prop::collection::vec(map_op_strategy(), TEST_SIZE),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in ops {
            match op {
                MapOp::Insert(k, v) => prop_assert_eq!(tree.insert(k, v), model.insert(k, v)),
                MapOp::Add(k, v) => {
                    let expected = if model.contains_key(&k) {
                        Err(Error::DuplicateKey)
                    } else {
                        model.insert(k, v);
                        Ok(())
                    };
                    prop_assert_eq!(tree.add(k, v), expected);
                }
                MapOp::TryAdd(k, v) => {
                    let added = !model.contains_key(&k);
                    if added {
                        model.insert(k, v);
                    }
                    prop_assert_eq!(tree.try_add(k, v), added);
                }
                MapOp::Remove(k) => prop_assert_eq!(tree.remove(&k), model.remove(&k)),
                MapOp::Get(k) => prop_assert_eq!(tree.get(&k), model.get(&k)),
                MapOp::GetMut(k, v) => {
                    if let Some(value) = tree.get_mut(&k) {
                        *value = v;
                    }
                    if let Some(value) = model.get_mut(&k) {
                        *value = v;
                    }
                }
                MapOp::ContainsKey(k) => prop_assert_eq!(tree.contains_key(&k), model.contains_key(&k)),
                MapOp::GetKeyValue(k) => prop_assert_eq!(tree.get_key_value(&k), model.get_key_value(&k)),
                MapOp::FirstKeyValue => prop_assert_eq!(tree.first_key_value(), model.first_key_value()),
                MapOp::LastKeyValue => prop_assert_eq!(tree.last_key_value(), model.last_key_value()),
                MapOp::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                MapOp::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert!(tree.iter().map(|(k, v)| (*k, *v)).eq(model.iter().map(|(k, v)| (*k, *v))));
        prop_assert_eq!(tree.iter().count(), tree.len());
    }

    #[test]
    fn iterators_match_btreemap(
        degree in degree_strategy(),
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE),
    ) {
        let tree: BTree<i64, i64> = {
            let mut tree = BTree::new(degree).unwrap();
            tree.extend(entries.iter().copied());
            tree
        };
        let model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(tree.iter().len(), model.len());
        prop_assert!(tree.iter().eq(model.iter()));
        prop_assert!(tree.keys().eq(model.keys()));
        prop_assert!(tree.values().eq(model.values()));
        prop_assert!((&tree).into_iter().eq(&model));
        prop_assert!(tree.clone().into_iter().eq(model.clone()));
    }

    #[test]
    fn values_mut_updates_every_entry(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE),
    ) {
        let mut tree: BTree<i64, i64> = entries.iter().copied().collect();
        let mut model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for value in tree.values_mut() {
            *value = value.wrapping_add(1);
        }
        for value in model.values_mut() {
            *value = value.wrapping_add(1);
        }
        for (key, value) in &mut tree {
            *value ^= *key;
        }
        for (key, value) in &mut model {
            *value ^= *key;
        }
        prop_assert!(tree.iter().eq(model.iter()));
    }
}

// ─── Order independence and full teardown ────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The same key set inserted in any order gives the same traversal.
    #[test]
    fn insertion_order_does_not_matter(
        degree in degree_strategy(),
        first in Just((0..600i64).collect::<Vec<_>>()).prop_shuffle(),
        second in Just((0..600i64).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut a = BTree::new(degree).unwrap();
        let mut b = BTree::new(degree).unwrap();
        for key in first {
            a.add(key, -key).unwrap();
        }
        for key in second {
            b.add(key, -key).unwrap();
        }
        prop_assert_eq!(collect_keys(&a), (0..600).collect::<Vec<_>>());
        prop_assert_eq!(a, b);
    }

    /// Removing every key, in any order, leaves an empty tree of height 0.
    #[test]
    fn delete_all_in_any_order(
        degree in degree_strategy(),
        inserts in Just((0..600i64).collect::<Vec<_>>()).prop_shuffle(),
        removes in Just((0..600i64).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        for key in inserts {
            tree.add(key, key).unwrap();
        }
        for (removed, key) in removes.iter().enumerate() {
            prop_assert_eq!(tree.remove(key), Some(*key));
            prop_assert_eq!(tree.len(), 600 - removed - 1);
            prop_assert_eq!(tree.get(key), None);
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 0);
        prop_assert_eq!(tree.iter().next(), None);
        prop_assert_eq!(tree.min(), Err(Error::EmptyCollection));
    }

    #[test]
    fn clear_empties_tree(entries in prop::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let mut tree: BTree<i64, i64> = entries.into_iter().collect();
        tree.clear();
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 0);
        tree.insert(1, 1);
        prop_assert_eq!(tree.len(), 1);
    }
}
