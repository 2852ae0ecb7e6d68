//! Collaborators the invoice desk talks to: the remote inventory service and
//! the document exporter.

pub mod document;
pub mod http;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::{CatalogEntry, Invoice};
use crate::InvoicingError;

pub use document::TextDocumentExporter;
pub use http::HttpInventoryClient;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Failed to fetch grocery items: {0}")]
    Fetch(String),
    #[error("{0}")]
    Create(String),
}

/// Remote inventory and invoice service.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ServiceError>;
    async fn create_catalog_entry(&self, item: &NewCatalogItem) -> Result<CatalogEntry, ServiceError>;
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), ServiceError>;
}

/// Fire-and-forget invoice document output. Failures never reach the caller.
pub trait DocumentExporter: Send + Sync {
    fn export_document(&self, invoice: &Invoice);
}

/// Item creation request, as entered on the desk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

impl NewCatalogItem {
    pub fn new(name: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self { name: name.into(), price, stock }
    }

    /// Trim the name and check the item before it is sent anywhere.
    pub fn validated(self) -> Result<Self, InvoicingError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(InvoicingError::InvalidItem("Name is required".into()));
        }
        if self.price <= Decimal::ZERO {
            return Err(InvoicingError::InvalidItem("Price must be a positive number".into()));
        }
        if u32::try_from(self.stock).is_err() {
            return Err(InvoicingError::InvalidItem("Stock must be a non-negative integer".into()));
        }
        Ok(Self { name, ..self })
    }
}
