//! Core module containing the domain model, filters, aggregation and export logic

pub mod company;
pub mod error;
pub mod export;
pub mod filter;
pub mod invoice;
pub mod report;

pub use company::{Company, NewCompany};
pub use error::{ApiError, ErrorResponse};
pub use export::{ExportFile, write_report};
pub use filter::{InvoiceFilter, StatusFilter};
pub use invoice::{Invoice, InvoiceRow, InvoiceStatus, NewInvoice, PayInvoice};
pub use report::{FinancialReport, MonthlySummary, compute_yearly_report};
