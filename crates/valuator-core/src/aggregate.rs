//! Grouped statistics over normalized monthly records.

use std::collections::BTreeMap;

use crate::{AnnualAverage, MonthlyLeader, MonthlyPrice};

/// Most valuable company of every calendar month, ordered by `YYYY-MM`.
///
/// On equal values the record seen first wins.
pub fn most_valuable_company(records: &[MonthlyPrice]) -> Vec<MonthlyLeader> {
    let mut leaders: BTreeMap<String, &MonthlyPrice> = BTreeMap::new();

    for record in records {
        leaders
            .entry(record.year_month())
            .and_modify(|current| {
                if record.value() > current.value() {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    leaders
        .into_iter()
        .map(|(year_month, record)| MonthlyLeader {
            year_month,
            company: record.company().to_owned(),
            value: record.value(),
        })
        .collect()
}

/// Sum of all values recorded for `company` (exact, case-sensitive match).
pub fn total_value(records: &[MonthlyPrice], company: &str) -> f64 {
    records
        .iter()
        .filter(|record| record.company() == company)
        .map(MonthlyPrice::value)
        .sum()
}

/// Mean value per company and calendar year.
pub fn average_by_company_and_year(
    records: &[MonthlyPrice],
) -> BTreeMap<String, BTreeMap<i32, f64>> {
    let mut buckets: BTreeMap<&str, BTreeMap<i32, (f64, usize)>> = BTreeMap::new();

    for record in records {
        let (sum, count) = buckets
            .entry(record.company())
            .or_default()
            .entry(record.year())
            .or_insert((0.0, 0));
        *sum += record.value();
        *count += 1;
    }

    buckets
        .into_iter()
        .map(|(company, years)| {
            let means = years
                .into_iter()
                .map(|(year, (sum, count))| (year, sum / count as f64))
                .collect();
            (company.to_owned(), means)
        })
        .collect()
}

/// Flatten per-company yearly means into post-ready records.
pub fn annual_averages(
    averages: &BTreeMap<String, BTreeMap<i32, f64>>,
    currency: &str,
) -> Vec<AnnualAverage> {
    averages
        .iter()
        .flat_map(|(company, years)| {
            years.iter().map(move |(year, value)| AnnualAverage {
                year: *year,
                value: *value,
                company: company.clone(),
                currency: currency.to_owned(),
            })
        })
        .collect()
}
