//! Financial aggregation over the joined, year-filtered row set
//!
//! The aggregation is a single pass of explicit accumulation: one map keyed
//! by calendar month for the monthly breakdown, one keyed by company name
//! for the supplier ranking. No ordering is assumed on the input rows.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::Datelike;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use super::invoice::InvoiceRow;

/// Maximum number of companies in the supplier ranking
pub const TOP_SUPPLIER_LIMIT: usize = 5;

/// Per-month rollup of the invoices due in that month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// Sum of invoice amounts, at the stored currency precision
    pub total_value: Decimal,
    /// Number of invoices due in the month
    pub count: u64,
    /// Number of those invoices with a payment date set
    pub paid_count: u64,
}

/// Yearly financial report, or an explicit "no data" marker.
///
/// The two shapes are distinguishable on the wire: a populated report has
/// `year`/`monthly`/`top_suppliers` fields, the sentinel has only `message`.
/// Zeroed buckets are never synthesized.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FinancialReport {
    NoData {
        message: &'static str,
    },
    Year {
        year: i32,
        /// Only months present in the data appear, keyed 1–12 in order
        monthly: BTreeMap<u32, MonthlySummary>,
        /// Ranked order, total value descending
        top_suppliers: IndexMap<String, Decimal>,
    },
}

impl FinancialReport {
    fn no_data() -> Self {
        FinancialReport::NoData {
            message: "no data for the requested year",
        }
    }
}

/// Compute the yearly report from the joined, year-filtered row set.
///
/// The caller is responsible for having restricted `rows` to the requested
/// year; this function only groups and sums. Companies with equal summed
/// amounts rank by name ascending, which makes the result deterministic for
/// identical input rows.
pub fn compute_yearly_report(rows: &[InvoiceRow], year: i32) -> FinancialReport {
    if rows.is_empty() {
        return FinancialReport::no_data();
    }

    let mut monthly: BTreeMap<u32, MonthlySummary> = BTreeMap::new();
    let mut by_company: HashMap<String, Decimal> = HashMap::new();

    for row in rows {
        let summary = monthly
            .entry(row.invoice.due_date.month())
            .or_insert(MonthlySummary {
                total_value: Decimal::ZERO,
                count: 0,
                paid_count: 0,
            });
        summary.total_value += row.invoice.amount;
        summary.count += 1;
        if row.invoice.is_paid() {
            summary.paid_count += 1;
        }

        *by_company.entry(row.company_name.clone()).or_default() += row.invoice.amount;
    }

    let mut ranked: Vec<(String, Decimal)> = by_company.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_SUPPLIER_LIMIT);

    FinancialReport::Year {
        year,
        monthly,
        top_suppliers: ranked.into_iter().collect(),
    }
}
