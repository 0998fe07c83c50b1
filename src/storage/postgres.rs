//! PostgreSQL storage backend using sqlx.
//!
//! Provides a [`PostgresStore`] implementation backed by a PostgreSQL
//! database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! payables = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Companies and invoices live in two tables with UNIQUE constraints on the
//! tax id and the barcode, and a foreign key from invoice to company. The
//! unique-key and referential races the application-level checks cannot close
//! are settled by these constraints; violations are mapped back to the
//! conflict/not-found error categories.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::core::{ApiError, Company, Invoice, InvoiceFilter, InvoiceRow};

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS companies (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            tax_id TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow::anyhow!("failed to create companies table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id UUID PRIMARY KEY,
            description TEXT NOT NULL,
            amount NUMERIC NOT NULL,
            due_date DATE NOT NULL,
            paid_on DATE NULL,
            barcode TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL,
            company_id UUID NOT NULL REFERENCES companies(id)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow::anyhow!("failed to create invoices table: {}", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_due_date ON invoices (due_date)")
        .execute(pool)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create due date index: {}", e))?;

    Ok(())
}

type CompanyTuple = (Uuid, String, String, DateTime<Utc>);
type InvoiceTuple = (
    Uuid,
    String,
    Decimal,
    NaiveDate,
    Option<NaiveDate>,
    String,
    DateTime<Utc>,
    Uuid,
);

fn company_from(row: CompanyTuple) -> Company {
    let (id, name, tax_id, created_at) = row;
    Company {
        id,
        name,
        tax_id,
        created_at,
    }
}

fn invoice_from(row: InvoiceTuple) -> Invoice {
    let (id, description, amount, due_date, paid_on, barcode, created_at, company_id) = row;
    Invoice {
        id,
        description,
        amount,
        due_date,
        paid_on,
        barcode,
        created_at,
        company_id,
    }
}

/// Store backed by PostgreSQL
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the given database URL and apply the schema
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to PostgreSQL: {}", e))?;
        ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn storage_err(context: &str, err: sqlx::Error) -> ApiError {
    ApiError::storage(format!("{}: {}", context, err))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

#[async_trait]
impl Store for PostgresStore {
    async fn create_company(&self, company: Company) -> Result<Company, ApiError> {
        sqlx::query(
            "INSERT INTO companies (id, name, tax_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(company.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::tax_id_taken(&company.tax_id)
            } else {
                storage_err("failed to create company", e)
            }
        })?;

        Ok(company)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ApiError> {
        let rows = sqlx::query_as::<_, CompanyTuple>(
            "SELECT id, name, tax_id, created_at FROM companies",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to list companies", e))?;

        Ok(rows.into_iter().map(company_from).collect())
    }

    async fn get_company(&self, id: &Uuid) -> Result<Option<Company>, ApiError> {
        let row = sqlx::query_as::<_, CompanyTuple>(
            "SELECT id, name, tax_id, created_at FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to get company", e))?;

        Ok(row.map(company_from))
    }

    async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, ApiError> {
        sqlx::query(
            "INSERT INTO invoices \
             (id, description, amount, due_date, paid_on, barcode, created_at, company_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(invoice.id)
        .bind(&invoice.description)
        .bind(invoice.amount)
        .bind(invoice.due_date)
        .bind(invoice.paid_on)
        .bind(&invoice.barcode)
        .bind(invoice.created_at)
        .bind(invoice.company_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::barcode_taken(&invoice.barcode)
            } else if is_foreign_key_violation(&e) {
                ApiError::not_found("company", invoice.company_id)
            } else {
                storage_err("failed to create invoice", e)
            }
        })?;

        Ok(invoice)
    }

    async fn get_invoice(&self, id: &Uuid) -> Result<Option<Invoice>, ApiError> {
        let row = sqlx::query_as::<_, InvoiceTuple>(
            "SELECT id, description, amount, due_date, paid_on, barcode, created_at, company_id \
             FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to get invoice", e))?;

        Ok(row.map(invoice_from))
    }

    async fn mark_invoice_paid(&self, id: &Uuid, paid_on: NaiveDate) -> Result<Invoice, ApiError> {
        // Guarded update: the WHERE clause keeps the transition one-shot even
        // under concurrent pay calls.
        let row = sqlx::query_as::<_, InvoiceTuple>(
            "UPDATE invoices SET paid_on = $2 \
             WHERE id = $1 AND paid_on IS NULL \
             RETURNING id, description, amount, due_date, paid_on, barcode, created_at, company_id",
        )
        .bind(id)
        .bind(paid_on)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_err("failed to pay invoice", e))?;

        if let Some(row) = row {
            return Ok(invoice_from(row));
        }

        match self.get_invoice(id).await? {
            Some(_) => Err(ApiError::already_paid(*id)),
            None => Err(ApiError::not_found("invoice", *id)),
        }
    }

    async fn filter_invoices(
        &self,
        filter: &InvoiceFilter,
        today: NaiveDate,
    ) -> Result<Vec<InvoiceRow>, ApiError> {
        let status = filter.status.map(|s| s.as_str().to_string());
        let month = filter.month.map(|m| m as i32);

        let rows = sqlx::query_as::<_, (
            Uuid,
            String,
            Decimal,
            NaiveDate,
            Option<NaiveDate>,
            String,
            DateTime<Utc>,
            Uuid,
            String,
        )>(
            "SELECT i.id, i.description, i.amount, i.due_date, i.paid_on, i.barcode, \
                    i.created_at, i.company_id, c.name \
             FROM invoices i \
             JOIN companies c ON c.id = i.company_id \
             WHERE ($1::text IS NULL OR c.name ILIKE '%' || $1 || '%') \
               AND ($2::int IS NULL OR EXTRACT(YEAR FROM i.due_date)::int = $2) \
               AND ($3::int IS NULL OR EXTRACT(MONTH FROM i.due_date)::int = $3) \
               AND (CASE $4::text \
                      WHEN 'paid' THEN i.paid_on IS NOT NULL \
                      WHEN 'overdue' THEN i.paid_on IS NULL AND i.due_date < $5 \
                      WHEN 'open' THEN i.paid_on IS NULL AND i.due_date >= $5 \
                      ELSE TRUE \
                    END)",
        )
        .bind(&filter.company_name)
        .bind(filter.year)
        .bind(month)
        .bind(status)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_err("failed to filter invoices", e))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, description, amount, due_date, paid_on, barcode, created_at, company_id, company_name)| {
                    InvoiceRow {
                        invoice: invoice_from((
                            id, description, amount, due_date, paid_on, barcode, created_at,
                            company_id,
                        )),
                        company_name,
                    }
                },
            )
            .collect())
    }
}
