//! Company records and creation payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered invoice-issuing company.
///
/// Companies are created once and never mutated or deleted; the tax id is
/// unique across all companies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company with a fresh id and creation timestamp
    pub fn new(name: String, tax_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tax_id,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for creating a company
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCompany {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "tax id must not be empty"))]
    pub tax_id: String,
}
