//! Storage backends for companies and invoices
//!
//! The [`Store`] trait is the persistence seam: handlers receive an
//! `Arc<dyn Store>` constructed once at startup. Uniqueness of the company
//! tax id and the invoice barcode is enforced inside the backend — under the
//! write lock for the in-memory store, by UNIQUE constraints for PostgreSQL.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::{ApiError, Company, Invoice, InvoiceFilter, InvoiceRow};

/// Persistence operations required by the API.
///
/// All reads are side-effect free; the two writes (`create_*`) and the pay
/// transition are single-row commits. `filter_invoices` returns the
/// invoice×company join with no ordering guarantee.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new company; fails with a conflict if the tax id is taken
    async fn create_company(&self, company: Company) -> Result<Company, ApiError>;

    /// List all companies
    async fn list_companies(&self) -> Result<Vec<Company>, ApiError>;

    /// Get a company by id
    async fn get_company(&self, id: &Uuid) -> Result<Option<Company>, ApiError>;

    /// Persist a new invoice; fails with not-found if the owning company is
    /// missing and with a conflict if the barcode is taken
    async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, ApiError>;

    /// Get an invoice by id
    async fn get_invoice(&self, id: &Uuid) -> Result<Option<Invoice>, ApiError>;

    /// Set the payment date of an unpaid invoice.
    ///
    /// Fails with not-found if the invoice is missing and with a conflict if
    /// it already has a payment date (the transition happens exactly once).
    async fn mark_invoice_paid(&self, id: &Uuid, paid_on: NaiveDate) -> Result<Invoice, ApiError>;

    /// Produce the filtered invoice×company join.
    ///
    /// `today` fixes the evaluation date for the status classification.
    async fn filter_invoices(
        &self,
        filter: &InvoiceFilter,
        today: NaiveDate,
    ) -> Result<Vec<InvoiceRow>, ApiError>;
}
