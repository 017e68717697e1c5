//! Group-by aggregation over runs of equal keys.
//!
//! Groups are maximal runs of consecutive equal keys, so keys are expected
//! to be sorted. A key that reappears after a different key starts a new
//! group.

use crate::core::Batch;
use crate::error::{Result, TsError};
use statrs::statistics::{Data, Median, Statistics};

/// Reduction applied to every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    Sum,
    #[default]
    Mean,
    Min,
    Max,
    Median,
    /// Number of values in the group.
    Count,
    /// Sample variance (`NaN` for single-value groups).
    Variance,
    /// Sample standard deviation (`NaN` for single-value groups).
    StdDev,
}

impl Aggregation {
    /// Reduce one run of values.
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Mean => values.iter().mean(),
            Aggregation::Min => Statistics::min(values.iter()),
            Aggregation::Max => Statistics::max(values.iter()),
            Aggregation::Median => Data::new(values.to_vec()).median(),
            Aggregation::Count => values.len() as f64,
            Aggregation::Variance => values.iter().variance(),
            Aggregation::StdDev => values.iter().std_dev(),
        }
    }
}

/// Result of [`group_by`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedAggregate<K> {
    /// Key of every group, in input order.
    pub keys: Vec<K>,
    /// One series per input series, one value per group.
    pub values: Batch,
}

/// Aggregate every series of `values` over runs of equal `keys`.
///
/// # Example
///
/// ```
/// use tsbatch::aggregate::{group_by, Aggregation};
/// use tsbatch::core::Batch;
///
/// let keys = [1, 1, 2, 2, 2, 3];
/// let values = Batch::from_series(&[vec![1.0, 3.0, 2.0, 4.0, 6.0, 10.0]]).unwrap();
/// let grouped = group_by(&keys, &values, Aggregation::Mean).unwrap();
///
/// assert_eq!(grouped.keys, vec![1, 2, 3]);
/// assert_eq!(grouped.values.series(0), &[2.0, 4.0, 10.0]);
/// ```
pub fn group_by<K>(keys: &[K], values: &Batch, aggregation: Aggregation) -> Result<GroupedAggregate<K>>
where
    K: PartialEq + Clone,
{
    if keys.is_empty() || values.count() == 0 {
        return Err(TsError::EmptyData);
    }
    if keys.len() != values.series_len() {
        return Err(TsError::DimensionMismatch {
            expected: values.series_len(),
            got: keys.len(),
        });
    }

    let runs = runs(keys);
    let group_keys: Vec<K> = runs.iter().map(|r| keys[r.start].clone()).collect();

    let mut data = Vec::with_capacity(runs.len() * values.count());
    for series in values.iter() {
        data.extend(runs.iter().map(|r| aggregation.apply(&series[r.clone()])));
    }

    Ok(GroupedAggregate {
        keys: group_keys,
        values: Batch::from_column_major(data, runs.len(), values.count())?
            .with_precision(values.precision()),
    })
}

fn runs<K: PartialEq>(keys: &[K]) -> Vec<std::ops::Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=keys.len() {
        if i == keys.len() || keys[i] != keys[start] {
            out.push(start..i);
            start = i;
        }
    }
    out
}
