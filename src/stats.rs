use serde::Serialize;
use tracing::warn;

use crate::config::{Category, Selector};
use crate::error::{CensusError, Result};
use crate::parser::StatisticalTable;

/// Per-category integer totals for one statistic, in category definition
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    entries: Vec<(&'static str, i64)>,
}

impl CategoryTotals {
    /// Every category of `categories` at zero.
    pub fn zeroed(categories: &[Category]) -> Self {
        Self {
            entries: categories.iter().map(|c| (c.name, 0)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `other` into `self` category by category and returns the sum of
    /// everything that was added.
    pub fn accumulate(&mut self, other: &CategoryTotals) -> i64 {
        let mut added = 0;
        for (name, value) in other.iter() {
            match self.entries.iter_mut().find(|(n, _)| *n == name) {
                Some((_, total)) => *total += value,
                None => self.entries.push((name, value)),
            }
            added += value;
        }
        added
    }
}

impl FromIterator<(&'static str, i64)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (&'static str, i64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Buckets one geography's estimates from `table` into `categories`.
///
/// Each contributing column is truncated toward zero before summing. A
/// label that matches no column contributes nothing; that is logged but not
/// an error, so a renamed upstream column shows up as an undercount.
///
/// # Errors
///
/// Returns [`CensusError::Lookup`] if the geography has no estimates in the
/// table, or if a selected column has no estimate.
pub fn categorize(
    table: &StatisticalTable,
    geo_id: &str,
    categories: &[Category],
) -> Result<CategoryTotals> {
    let estimates = table.estimates_for(geo_id)?;

    let estimate = |column_id: &str| -> Result<i64> {
        estimates
            .get(column_id)
            .map(|v| v.trunc() as i64)
            .ok_or_else(|| {
                CensusError::lookup(format!("estimate {column_id} for {geo_id} in {}", table.id))
            })
    };

    let mut totals = CategoryTotals::default();
    for category in categories {
        let mut total = 0;
        match category.selector {
            Selector::Labels(labels) => {
                for label in labels.iter().copied() {
                    let mut matched = 0;
                    for column_id in table.columns_labelled(label) {
                        total += estimate(column_id)?;
                        matched += 1;
                    }
                    if matched == 0 {
                        warn!(
                            table_id = %table.id,
                            geo_id,
                            category = category.name,
                            label,
                            "Label matched no columns"
                        );
                    }
                }
            }
            Selector::Columns(column_ids) => {
                for column_id in column_ids.iter().copied() {
                    total += estimate(column_id)?;
                }
            }
        }
        totals.entries.push((category.name, total));
    }

    Ok(totals)
}
