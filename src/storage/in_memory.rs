//! In-memory implementation of the store for testing and development

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::Store;
use crate::core::{ApiError, Company, Invoice, InvoiceFilter, InvoiceRow};

/// In-memory store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// uniqueness checks run inside the write lock so concurrent creations
/// cannot both pass the duplicate check.
#[derive(Clone)]
pub struct InMemoryStore {
    companies: Arc<RwLock<HashMap<Uuid, Company>>>,
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            companies: Arc::new(RwLock::new(HashMap::new())),
            invoices: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_company(&self, company: Company) -> Result<Company, ApiError> {
        let mut companies = self
            .companies
            .write()
            .map_err(|e| ApiError::storage(format!("failed to acquire write lock: {}", e)))?;

        if companies.values().any(|c| c.tax_id == company.tax_id) {
            return Err(ApiError::tax_id_taken(&company.tax_id));
        }

        companies.insert(company.id, company.clone());

        Ok(company)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ApiError> {
        let companies = self
            .companies
            .read()
            .map_err(|e| ApiError::storage(format!("failed to acquire read lock: {}", e)))?;

        Ok(companies.values().cloned().collect())
    }

    async fn get_company(&self, id: &Uuid) -> Result<Option<Company>, ApiError> {
        let companies = self
            .companies
            .read()
            .map_err(|e| ApiError::storage(format!("failed to acquire read lock: {}", e)))?;

        Ok(companies.get(id).cloned())
    }

    async fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, ApiError> {
        {
            let companies = self
                .companies
                .read()
                .map_err(|e| ApiError::storage(format!("failed to acquire read lock: {}", e)))?;
            if !companies.contains_key(&invoice.company_id) {
                return Err(ApiError::not_found("company", invoice.company_id));
            }
        }

        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| ApiError::storage(format!("failed to acquire write lock: {}", e)))?;

        if invoices.values().any(|i| i.barcode == invoice.barcode) {
            return Err(ApiError::barcode_taken(&invoice.barcode));
        }

        invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn get_invoice(&self, id: &Uuid) -> Result<Option<Invoice>, ApiError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| ApiError::storage(format!("failed to acquire read lock: {}", e)))?;

        Ok(invoices.get(id).cloned())
    }

    async fn mark_invoice_paid(&self, id: &Uuid, paid_on: NaiveDate) -> Result<Invoice, ApiError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| ApiError::storage(format!("failed to acquire write lock: {}", e)))?;

        let invoice = invoices
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found("invoice", *id))?;

        if invoice.is_paid() {
            return Err(ApiError::already_paid(*id));
        }

        invoice.paid_on = Some(paid_on);

        Ok(invoice.clone())
    }

    async fn filter_invoices(
        &self,
        filter: &InvoiceFilter,
        today: NaiveDate,
    ) -> Result<Vec<InvoiceRow>, ApiError> {
        let companies = self
            .companies
            .read()
            .map_err(|e| ApiError::storage(format!("failed to acquire read lock: {}", e)))?;
        let invoices = self
            .invoices
            .read()
            .map_err(|e| ApiError::storage(format!("failed to acquire read lock: {}", e)))?;

        Ok(invoices
            .values()
            .filter_map(|invoice| {
                // Referential integrity is checked at creation; a missing
                // company here would be a store bug, not a user error.
                let company = companies.get(&invoice.company_id)?;
                filter
                    .matches(invoice, &company.name, today)
                    .then(|| InvoiceRow {
                        invoice: invoice.clone(),
                        company_name: company.name.clone(),
                    })
            })
            .collect())
    }
}
