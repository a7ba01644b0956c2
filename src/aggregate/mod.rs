use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::grade::Category;
use crate::model::{LongRecord, MonthlyAggregate};

/// The long table split by grade taxonomy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPartition {
    pub numeric: Vec<LongRecord>,
    pub alpha: Vec<LongRecord>,
    pub unknown: Vec<LongRecord>,
}

impl CategoryPartition {
    pub fn get(&self, category: Category) -> &[LongRecord] {
        match category {
            Category::NumericGroup => &self.numeric,
            Category::AlphaGroup => &self.alpha,
            Category::Unknown => &self.unknown,
        }
    }

    pub fn len(&self) -> usize {
        self.numeric.len() + self.alpha.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Places every record in the subset of its category, keeping input order.
pub fn partition(records: &[LongRecord]) -> CategoryPartition {
    let mut split = CategoryPartition::default();
    for record in records {
        let target = match record.category() {
            Category::NumericGroup => &mut split.numeric,
            Category::AlphaGroup => &mut split.alpha,
            Category::Unknown => &mut split.unknown,
        };
        target.push(record.clone());
    }
    split
}

/// Mean climbs per (month, grade) over the records of one category.
///
/// Results are ordered by month, then grade text. No matching records yields
/// an empty vector.
pub fn monthly_means(records: &[LongRecord], category: Category) -> Vec<MonthlyAggregate> {
    let mut groups: BTreeMap<(NaiveDate, &str), (u64, u64)> = BTreeMap::new();
    for record in records.iter().filter(|record| record.category() == category) {
        let entry = groups
            .entry((record.month(), record.difficulty.as_str()))
            .or_insert((0, 0));
        entry.0 += u64::from(record.n_climbs);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((month, difficulty), (sum, count))| MonthlyAggregate {
            month,
            difficulty: difficulty.to_string(),
            mean_n_climbs: sum as f64 / count as f64,
        })
        .collect()
}
