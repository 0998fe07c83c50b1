//! Invoice records, creation payloads and status classification

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A payable invoice belonging to exactly one company.
///
/// `paid_on` is a meaningful business state, not just a missing value:
/// `None` means unpaid. Once set it is never unset — the only mutation an
/// invoice supports is the one-shot pay transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_on: Option<NaiveDate>,
    pub barcode: String,
    pub created_at: DateTime<Utc>,
    pub company_id: Uuid,
}

impl Invoice {
    /// Create a new invoice with a fresh id and creation timestamp
    pub fn new(
        description: String,
        amount: Decimal,
        due_date: NaiveDate,
        paid_on: Option<NaiveDate>,
        barcode: String,
        company_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            amount,
            due_date,
            paid_on,
            barcode,
            created_at: Utc::now(),
            company_id,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.paid_on.is_some()
    }

    /// Classify this invoice at the given evaluation date.
    ///
    /// Exactly one status applies at any instant: paid invoices stay paid,
    /// unpaid invoices are overdue strictly after their due date and open
    /// through it.
    pub fn status_on(&self, today: NaiveDate) -> InvoiceStatus {
        if self.is_paid() {
            InvoiceStatus::Paid
        } else if self.due_date < today {
            InvoiceStatus::Overdue
        } else {
            InvoiceStatus::Open
        }
    }
}

/// Tri-state invoice status derived per row at a fixed evaluation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Overdue,
    Open,
}

/// One row of the invoice×company join produced by the query/filter layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRow {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub company_name: String,
}

/// Request payload for creating an invoice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInvoice {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,

    #[validate(custom(function = amount_positive))]
    pub amount: Decimal,

    pub due_date: NaiveDate,

    /// Optional at creation; absent means the invoice starts unpaid
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,

    #[validate(length(min = 1, message = "barcode must not be empty"))]
    pub barcode: String,

    pub company_id: Uuid,
}

/// Request payload for the pay transition
#[derive(Debug, Clone, Deserialize)]
pub struct PayInvoice {
    pub paid_on: NaiveDate,
}

fn amount_positive(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("amount must be positive".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invoice(due: NaiveDate, paid_on: Option<NaiveDate>) -> Invoice {
        Invoice::new(
            "hosting".to_string(),
            dec!(100.00),
            due,
            paid_on,
            "0001".to_string(),
            Uuid::new_v4(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn paid_invoice_is_paid_regardless_of_due_date() {
        let today = date(2024, 6, 15);
        let inv = invoice(date(2024, 1, 1), Some(date(2024, 1, 2)));
        assert_eq!(inv.status_on(today), InvoiceStatus::Paid);
    }

    #[test]
    fn unpaid_invoice_past_due_is_overdue() {
        let today = date(2024, 6, 15);
        let inv = invoice(date(2024, 6, 14), None);
        assert_eq!(inv.status_on(today), InvoiceStatus::Overdue);
    }

    #[test]
    fn unpaid_invoice_due_today_or_later_is_open() {
        let today = date(2024, 6, 15);
        assert_eq!(
            invoice(date(2024, 6, 15), None).status_on(today),
            InvoiceStatus::Open
        );
        assert_eq!(
            invoice(date(2024, 12, 31), None).status_on(today),
            InvoiceStatus::Open
        );
    }

    #[test]
    fn exactly_one_status_classifies_each_invoice() {
        let today = date(2024, 6, 15);
        let candidates = [
            invoice(date(2024, 1, 1), None),
            invoice(date(2024, 6, 15), None),
            invoice(date(2025, 1, 1), None),
            invoice(date(2024, 1, 1), Some(date(2024, 1, 5))),
            invoice(date(2025, 1, 1), Some(date(2024, 6, 1))),
        ];

        for inv in &candidates {
            let statuses = [
                InvoiceStatus::Paid,
                InvoiceStatus::Overdue,
                InvoiceStatus::Open,
            ];
            let matching = statuses
                .iter()
                .filter(|s| inv.status_on(today) == **s)
                .count();
            assert_eq!(matching, 1);
        }
    }

    #[test]
    fn non_positive_amounts_fail_validation() {
        let mut payload = NewInvoice {
            description: "hosting".to_string(),
            amount: dec!(0),
            due_date: date(2024, 6, 1),
            paid_on: None,
            barcode: "0001".to_string(),
            company_id: Uuid::new_v4(),
        };
        assert!(payload.validate().is_err());

        payload.amount = dec!(-10.50);
        assert!(payload.validate().is_err());

        payload.amount = dec!(0.01);
        assert!(payload.validate().is_ok());
    }
}
