use serde::{Deserialize, Serialize};

/// Highest single valuation within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyLeader {
    pub year_month: String,
    pub company: String,
    pub value: f64,
}

/// Mean valuation of a company over one calendar year.
///
/// Field order is the wire order of the `annual-data` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualAverage {
    pub year: i32,
    pub value: f64,
    pub company: String,
    pub currency: String,
}
