use crate::common::Result;
use crate::types::Field;
use itertools::{izip, Itertools as _};
use std::cmp::Ordering;

/// Extracts a value from a record. Extraction is fallible so that a record
/// violating the data model fails the query instead of being misplaced.
pub type Expression<'k, T> = Box<dyn Fn(&T) -> Result<Field> + 'k>;

/// Wraps an infallible extractor as an Expression.
pub fn column<'k, T: 'k>(extract: impl Fn(&T) -> Field + 'k) -> Expression<'k, T> {
    Box::new(move |record| Ok(extract(record)))
}

/// A sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Filters the input records (i.e. WHERE), preserving their order.
pub fn filter<'a, T: 'a>(
    source: impl IntoIterator<Item = &'a T>,
    predicate: impl Fn(&T) -> bool,
) -> Vec<&'a T> {
    source.into_iter().filter(|record| predicate(*record)).collect()
}

/// Projects the records (i.e. SELECT).
pub fn project<'a, T: 'a, U>(
    source: impl IntoIterator<Item = &'a T>,
    projection: impl FnMut(&'a T) -> U,
) -> Vec<U> {
    source.into_iter().map(projection).collect()
}

/// Sorts the records (i.e. ORDER BY) by the given keys in priority order.
///
/// The sort is stable: records whose keys are all equal keep their input
/// order. `Field::Null` sorts before any value, so absent keys come first when
/// ascending and last when descending.
pub fn order<'a, T: 'a>(
    source: impl IntoIterator<Item = &'a T>,
    order: &[(Expression<'_, T>, Direction)],
) -> Result<Vec<&'a T>> {
    // Key extraction is fallible and directions vary per key, so we can't use
    // sort_by_cached_key(). Precompute the sort values instead, and look them
    // up by the record's input index.
    let records = source.into_iter().collect_vec();
    let mut sort_values = Vec::with_capacity(records.len());
    for record in &records {
        let values: Vec<Field> = order
            .iter()
            .map(|(expr, _)| expr(*record))
            .try_collect()?;
        sort_values.push(values);
    }

    let mut indexes = (0..records.len()).collect_vec();
    indexes.sort_by(|&a, &b| {
        let dirs = order.iter().map(|(_, dir)| dir);
        for (a, b, dir) in izip!(&sort_values[a], &sort_values[b], dirs) {
            match a.cmp(b) {
                Ordering::Equal => {}
                order if *dir == Direction::Descending => return order.reverse(),
                order => return order,
            }
        }
        Ordering::Equal
    });

    Ok(indexes.into_iter().map(|i| records[i]).collect())
}
