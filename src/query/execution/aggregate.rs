use crate::common::Result;
use crate::query::execution::transform::Expression;
use crate::types::Field;
use itertools::Itertools as _;
use std::collections::BTreeMap;

/// An aggregate function over an extracted value.
pub enum Aggregate<'k, T> {
    Average(Expression<'k, T>),
    Count(Expression<'k, T>),
    Max(Expression<'k, T>),
    Min(Expression<'k, T>),
    Sum(Expression<'k, T>),
}

/// Groups records by key (i.e. GROUP BY). Buckets iterate in ascending key
/// order; records within a bucket keep their input order.
pub fn group_by<'a, T: 'a, K: Ord>(
    source: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&'a T) -> K,
) -> BTreeMap<K, Vec<&'a T>> {
    let mut buckets: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for record in source {
        buckets.entry(key(record)).or_default().push(record);
    }
    buckets
}

/// Groups records by an outer key, then by an inner key within each outer
/// bucket. Both levels iterate in ascending key order.
pub fn nest<'a, T: 'a, K1: Ord, K2: Ord>(
    source: impl IntoIterator<Item = &'a T>,
    outer: impl Fn(&'a T) -> K1,
    inner: impl Fn(&'a T) -> K2,
) -> BTreeMap<K1, BTreeMap<K2, Vec<&'a T>>> {
    group_by(source, outer)
        .into_iter()
        .map(|(key, records)| (key, group_by(records, &inner)))
        .collect()
}

/// Aggregates record values according to the aggregates, using the group_by
/// expressions as buckets. Emits, per bucket, the aggregate values in the
/// given order.
pub fn aggregate<'a, T: 'a>(
    source: impl IntoIterator<Item = &'a T>,
    group_by: Vec<Expression<'_, T>>,
    aggregates: Vec<Aggregate<'_, T>>,
) -> Result<BTreeMap<Vec<Field>, Vec<Field>>> {
    let mut aggregator = Aggregator::new(group_by, aggregates);
    for record in source {
        aggregator.add(record)?;
    }
    aggregator.into_buckets()
}

/// Computes bucketed aggregates for records.
struct Aggregator<'k, T> {
    /// Bucketed accumulators (by group_by values).
    buckets: BTreeMap<Vec<Field>, Vec<Accumulator>>,
    /// The set of empty accumulators. Used to create new buckets.
    empty: Vec<Accumulator>,
    /// Group by expressions. Indexes map to bucket values.
    group_by: Vec<Expression<'k, T>>,
    /// Expressions to accumulate. Indexes map to accumulators.
    expressions: Vec<Expression<'k, T>>,
}

impl<'k, T> Aggregator<'k, T> {
    fn new(group_by: Vec<Expression<'k, T>>, aggregates: Vec<Aggregate<'k, T>>) -> Self {
        use Aggregate::*;
        let accumulators = aggregates.iter().map(Accumulator::new).collect();
        let expressions = aggregates
            .into_iter()
            .map(|aggregate| match aggregate {
                Average(expr) | Count(expr) | Max(expr) | Min(expr) | Sum(expr) => expr,
            })
            .collect();
        Self {
            buckets: BTreeMap::new(),
            empty: accumulators,
            group_by,
            expressions,
        }
    }

    fn add(&mut self, record: &T) -> Result<()> {
        let bucket: Vec<Field> = self.group_by.iter().map(|expr| expr(record)).try_collect()?;
        let accumulators = self
            .buckets
            .entry(bucket)
            .or_insert_with(|| self.empty.clone());
        for (accumulator, expr) in accumulators.iter_mut().zip(&self.expressions) {
            accumulator.add(expr(record)?)?;
        }
        Ok(())
    }

    fn into_buckets(self) -> Result<BTreeMap<Vec<Field>, Vec<Field>>> {
        // With no records and no group_by expressions, emit a single bucket of
        // empty accumulators, e.g. the count of an empty collection is 0.
        if self.buckets.is_empty() && self.group_by.is_empty() {
            let values: Vec<Field> = self.empty.into_iter().map(|acc| acc.value()).try_collect()?;
            return Ok(BTreeMap::from([(Vec::new(), values)]));
        }

        self.buckets
            .into_iter()
            .map(|(bucket, accumulators)| {
                let values: Vec<Field> = accumulators.into_iter().map(|acc| acc.value()).try_collect()?;
                Ok((bucket, values))
            })
            .collect()
    }
}

/// Accumulates aggregate values. Uses an enum rather than a trait since we need
/// to keep these in a vector.
#[derive(Clone, Debug)]
enum Accumulator {
    Average { count: i64, sum: Field },
    Count(i64),
    Max(Option<Field>),
    Min(Option<Field>),
    Sum(Option<Field>),
}

impl Accumulator {
    fn new<T>(aggregate: &Aggregate<'_, T>) -> Self {
        match aggregate {
            Aggregate::Average(_) => Self::Average {
                count: 0,
                sum: Field::Integer(0),
            },
            Aggregate::Count(_) => Self::Count(0),
            Aggregate::Max(_) => Self::Max(None),
            Aggregate::Min(_) => Self::Min(None),
            Aggregate::Sum(_) => Self::Sum(None),
        }
    }

    /// Adds a value to the accumulator. Nulls are skipped by every aggregate.
    fn add(&mut self, value: Field) -> Result<()> {
        use Accumulator::*;
        if value.is_null() {
            return Ok(());
        }
        match self {
            Average { count, sum } => {
                *count += 1;
                *sum = sum.checked_add(&value)?;
            }
            Count(count) => *count += 1,
            Max(max @ None) => *max = Some(value),
            Max(Some(max)) if value > *max => *max = value,
            Max(_) => {}
            Min(min @ None) => *min = Some(value),
            Min(Some(min)) if value < *min => *min = value,
            Min(_) => {}
            Sum(sum @ None) => *sum = Some(Field::Integer(0).checked_add(&value)?),
            Sum(Some(sum)) => *sum = sum.checked_add(&value)?,
        }
        Ok(())
    }

    /// Returns the aggregate value. An empty average is Null rather than a
    /// division by zero.
    fn value(self) -> Result<Field> {
        Ok(match self {
            Self::Average { count: 0, .. } => Field::Null,
            Self::Average { count, sum } => sum.checked_div(&Field::Integer(count))?,
            Self::Count(count) => Field::Integer(count),
            Self::Max(value) | Self::Min(value) | Self::Sum(value) => value.unwrap_or(Field::Null),
        })
    }
}
