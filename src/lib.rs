//! # Payables
//!
//! A small financial record-keeping API: companies and their payable
//! invoices, with CRUD endpoints, monthly/yearly financial aggregates and
//! spreadsheet export of filtered result sets.
//!
//! ## Features
//!
//! - **Companies & Invoices**: one-to-many, with unique tax ids and barcodes
//! - **Status Filters**: paid / overdue / open classification over the
//!   invoice×company join, evaluated at request time
//! - **Yearly Reports**: monthly rollups (total, count, paid count) and a
//!   top-5 supplier ranking, with an explicit "no data" result
//! - **XLSX Export**: in-memory workbook with a derived status column
//! - **Pluggable Storage**: in-memory backend by default, PostgreSQL via
//!   the `postgres` Cargo feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use payables::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let app = build_router(AppState { store });
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and functions
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, Company, FinancialReport, Invoice, InvoiceFilter, InvoiceRow, InvoiceStatus,
        MonthlySummary, NewCompany, NewInvoice, StatusFilter, compute_yearly_report, write_report,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryStore, Store};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Server ===
    pub use crate::server::{AppState, build_router};

    // === Config ===
    pub use crate::config::AppConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use rust_decimal::Decimal;
    pub use uuid::Uuid;
}
