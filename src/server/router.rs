//! Router assembly for the payables API
//!
//! Routes (mirroring the HTTP contract):
//! - POST /companies/ - Create a company
//! - GET /companies/ - List all companies
//! - GET /invoices/ - List invoices, filters: status, company_name
//! - POST /invoices/ - Create an invoice
//! - PATCH /invoices/{id}/pay - One-shot pay transition
//! - GET /reports/financial/{year} - Yearly aggregation
//! - GET /reports/export/{year} - Annual spreadsheet export
//! - GET /reports/export/{year}/{month} - Monthly spreadsheet export

use axum::Router;
use axum::routing::{get, patch};

use super::handlers::{
    AppState, create_company, create_invoice, export_annual, export_monthly, financial_report,
    list_companies, list_invoices, pay_invoice,
};

/// Build the API router over the given state.
///
/// Cross-cutting layers (CORS, request tracing) are applied by the binary on
/// top of this router, which keeps tests free to drive the bare API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/companies/", get(list_companies).post(create_company))
        .route("/invoices/", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}/pay", patch(pay_invoice))
        .route("/reports/financial/{year}", get(financial_report))
        .route("/reports/export/{year}", get(export_annual))
        .route("/reports/export/{year}/{month}", get(export_monthly))
        .with_state(state)
}
