//! Query/filter layer over the invoice×company join
//!
//! Filters are parsed once at the HTTP boundary and handed to the storage
//! backend, which produces the joined row set. The in-memory backend applies
//! [`InvoiceFilter::matches`] directly; the SQL backend translates the same
//! semantics into predicates.

use chrono::{Datelike, NaiveDate};

use super::error::ApiError;
use super::invoice::{Invoice, InvoiceStatus};

/// Status filter accepted by `GET /invoices/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Paid,
    Overdue,
    Open,
}

impl StatusFilter {
    /// Parse an optional raw query value.
    ///
    /// The empty string means "no filter" (the query parameter was present
    /// but blank). Any other unknown value is rejected at this boundary,
    /// before the store is consulted.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, ApiError> {
        match raw {
            None | Some("") => Ok(None),
            Some("paid") => Ok(Some(StatusFilter::Paid)),
            Some("overdue") => Ok(Some(StatusFilter::Overdue)),
            Some("open") => Ok(Some(StatusFilter::Open)),
            Some(other) => Err(ApiError::validation(format!(
                "invalid status '{}': expected one of 'paid', 'overdue', 'open'",
                other
            ))),
        }
    }

    /// The wire value, used by the SQL backend
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Paid => "paid",
            StatusFilter::Overdue => "overdue",
            StatusFilter::Open => "open",
        }
    }

    fn status(&self) -> InvoiceStatus {
        match self {
            StatusFilter::Paid => InvoiceStatus::Paid,
            StatusFilter::Overdue => InvoiceStatus::Overdue,
            StatusFilter::Open => InvoiceStatus::Open,
        }
    }
}

/// Combined filter over the invoice×company join.
///
/// All fields are optional; an empty filter matches every invoice. The
/// year/month fields are used by the report and export paths and restrict
/// on the due date's calendar components.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub status: Option<StatusFilter>,
    /// Case-insensitive substring match against the company name
    pub company_name: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl InvoiceFilter {
    /// Filter for a whole calendar year
    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    /// Filter for one month of one year
    pub fn for_month(year: i32, month: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            ..Self::default()
        }
    }

    /// Row-level predicate used by the in-memory backend.
    ///
    /// `today` fixes the evaluation instant for the status classification so
    /// that a single request sees a consistent partition.
    pub fn matches(&self, invoice: &Invoice, company_name: &str, today: NaiveDate) -> bool {
        self.status
            .is_none_or(|s| invoice.status_on(today) == s.status())
            && self.company_name.as_ref().is_none_or(|needle| {
                company_name.to_lowercase().contains(&needle.to_lowercase())
            })
            && self.year.is_none_or(|year| invoice.due_date.year() == year)
            && self.month.is_none_or(|month| invoice.due_date.month() == month)
    }
}
