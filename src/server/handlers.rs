//! HTTP handlers for companies, invoices and reports

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::core::export::XLSX_CONTENT_TYPE;
use crate::core::{
    ApiError, Company, FinancialReport, Invoice, InvoiceFilter, InvoiceRow, NewCompany,
    NewInvoice, PayInvoice, StatusFilter, compute_yearly_report, write_report,
};
use crate::storage::Store;

/// Shared application state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

/// Query parameters accepted by `GET /invoices/`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListInvoicesParams {
    pub status: Option<String>,
    pub company_name: Option<String>,
}

/// The evaluation date for status classification: the current date at call time
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<NewCompany>,
) -> Result<Json<Company>, ApiError> {
    payload.validate()?;

    let company = Company::new(payload.name, payload.tax_id);
    let created = state.store.create_company(company).await?;

    Ok(Json(created))
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = state.store.list_companies().await?;
    Ok(Json(companies))
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListInvoicesParams>,
) -> Result<Json<Vec<InvoiceRow>>, ApiError> {
    let filter = InvoiceFilter {
        status: StatusFilter::parse(params.status.as_deref())?,
        company_name: params.company_name.filter(|s| !s.is_empty()),
        ..InvoiceFilter::default()
    };

    let rows = state.store.filter_invoices(&filter, today()).await?;
    Ok(Json(rows))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<NewInvoice>,
) -> Result<Json<Invoice>, ApiError> {
    payload.validate()?;

    let invoice = Invoice::new(
        payload.description,
        payload.amount,
        payload.due_date,
        payload.paid_on,
        payload.barcode,
        payload.company_id,
    );
    let created = state.store.create_invoice(invoice).await?;

    Ok(Json(created))
}

pub async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(payload): Json<PayInvoice>,
) -> Result<Json<Invoice>, ApiError> {
    let paid = state.store.mark_invoice_paid(&id, payload.paid_on).await?;
    Ok(Json(paid))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

pub async fn financial_report(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<FinancialReport>, ApiError> {
    let rows = state
        .store
        .filter_invoices(&InvoiceFilter::for_year(year), today())
        .await?;

    Ok(Json(compute_yearly_report(&rows, year)))
}

pub async fn export_annual(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Response, ApiError> {
    run_export(state, year, None).await
}

pub async fn export_monthly(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Response, ApiError> {
    run_export(state, year, Some(month)).await
}

async fn run_export(state: AppState, year: i32, month: Option<u32>) -> Result<Response, ApiError> {
    if let Some(month) = month {
        if !(1..=12).contains(&month) {
            return Err(ApiError::validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
    }

    let filter = match month {
        Some(month) => InvoiceFilter::for_month(year, month),
        None => InvoiceFilter::for_year(year),
    };
    let rows = state.store.filter_invoices(&filter, today()).await?;

    let file = write_report(&rows, year, month)?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
