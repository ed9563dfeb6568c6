use itertools::Itertools as _;
use std::collections::HashMap;
use std::hash::Hash;

/// A nested loop join: the cross product of both sources, filtered on the
/// join predicate. Rows follow left order, then right order.
pub fn nested_loop<'a, L, R>(
    left: &'a [L],
    right: &'a [R],
    predicate: impl Fn(&L, &R) -> bool,
) -> Vec<(&'a L, &'a R)> {
    left.iter()
        .cartesian_product(right.iter())
        .filter(|(l, r)| predicate(*l, *r))
        .collect()
}

/// Executes a hash join on key equality. Emits the same rows, in the same
/// order, as a nested loop join whose predicate compares the two keys.
pub fn hash<'a, L, R, K: Hash + Eq>(
    left: &'a [L],
    left_key: impl Fn(&'a L) -> K,
    right: &'a [R],
    right_key: impl Fn(&'a R) -> K,
) -> Vec<(&'a L, &'a R)> {
    group_join(left, left_key, right, right_key)
        .into_iter()
        .flat_map(|(l, matches)| std::iter::repeat(l).zip(matches))
        .collect()
}

/// Joins every left record with the (possibly empty) group of right records
/// sharing its key. Emits exactly one entry per left record, in left order;
/// matches keep right order.
pub fn group_join<'a, L, R, K: Hash + Eq>(
    left: &'a [L],
    left_key: impl Fn(&'a L) -> K,
    right: &'a [R],
    right_key: impl Fn(&'a R) -> K,
) -> Vec<(&'a L, Vec<&'a R>)> {
    // Build the hash table from the right source.
    let mut table: HashMap<K, Vec<&'a R>> = HashMap::new();
    for record in right {
        table.entry(right_key(record)).or_default().push(record);
    }

    left.iter()
        .map(|record| {
            let matches = table.get(&left_key(record)).cloned().unwrap_or_default();
            (record, matches)
        })
        .collect()
}
