//! Data types used by the aggregation pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Statistic;
use crate::stats::CategoryTotals;

/// Category totals of a single geography, one entry per statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoTotals {
    pub geo_id: String,
    pub by_statistic: BTreeMap<Statistic, CategoryTotals>,
}

impl GeoTotals {
    pub fn new(geo_id: &str) -> Self {
        Self {
            geo_id: geo_id.to_string(),
            by_statistic: BTreeMap::new(),
        }
    }

    pub fn get(&self, statistic: Statistic) -> Option<&CategoryTotals> {
        self.by_statistic.get(&statistic)
    }
}

/// Running sums over every geography of a hub.
///
/// `grand_totals` is the percentage denominator for each statistic. It is
/// accumulated alongside the category sums rather than derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubTotals {
    pub hub: String,
    pub geographies: usize,
    pub by_statistic: BTreeMap<Statistic, CategoryTotals>,
    pub grand_totals: BTreeMap<Statistic, i64>,
}

impl HubTotals {
    /// Empty totals with every category of every statistic present at zero.
    pub fn new(hub: &str) -> Self {
        let by_statistic = Statistic::ALL
            .iter()
            .map(|s| (*s, CategoryTotals::zeroed(s.categories())))
            .collect();
        let grand_totals = Statistic::ALL.iter().map(|s| (*s, 0)).collect();

        Self {
            hub: hub.to_string(),
            geographies: 0,
            by_statistic,
            grand_totals,
        }
    }

    pub fn accumulate(&mut self, geo: &GeoTotals) {
        for (statistic, totals) in &geo.by_statistic {
            let added = self
                .by_statistic
                .entry(*statistic)
                .or_default()
                .accumulate(totals);
            *self.grand_totals.entry(*statistic).or_default() += added;
        }
        self.geographies += 1;
    }

    pub fn category(&self, statistic: Statistic, name: &str) -> i64 {
        self.by_statistic
            .get(&statistic)
            .and_then(|t| t.get(name))
            .unwrap_or(0)
    }

    pub fn grand_total(&self, statistic: Statistic) -> i64 {
        self.grand_totals.get(&statistic).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(geo_id: &str, english: i64, spanish: i64, other: i64) -> GeoTotals {
        let mut totals = GeoTotals::new(geo_id);
        totals.by_statistic.insert(
            Statistic::Language,
            [("English Only", english), ("Spanish", spanish), ("Other", other)]
                .into_iter()
                .collect(),
        );
        totals
    }

    #[test]
    fn test_new_hub_totals_are_zeroed() {
        let totals = HubTotals::new("Empty");
        assert_eq!(totals.geographies, 0);
        for statistic in Statistic::ALL {
            assert_eq!(totals.grand_total(statistic), 0);
            assert_eq!(
                totals.by_statistic[&statistic].len(),
                statistic.categories().len()
            );
        }
    }

    #[test]
    fn test_accumulate_sums_categories_and_grand_total() {
        let mut totals = HubTotals::new("Test");
        totals.accumulate(&geo("a", 10, 5, 1));
        totals.accumulate(&geo("b", 20, 0, 4));

        assert_eq!(totals.geographies, 2);
        assert_eq!(totals.category(Statistic::Language, "English Only"), 30);
        assert_eq!(totals.category(Statistic::Language, "Other"), 5);
        assert_eq!(totals.grand_total(Statistic::Language), 40);
        assert_eq!(totals.grand_total(Statistic::Age), 0);
    }

    #[test]
    fn test_unknown_category_reads_zero() {
        let totals = HubTotals::new("Test");
        assert_eq!(totals.category(Statistic::Race, "Martian"), 0);
    }
}
