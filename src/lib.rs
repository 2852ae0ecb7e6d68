//! FreshMart Invoicing
//!
//! Point-of-sale invoicing desk for a grocery store.
//!
//! ## Features
//! - Catalog mirror of the inventory service with live stock levels
//! - Cart with stock reconciliation (every cart edit moves units out of or back into stock)
//! - 18% GST totals
//! - Invoice persistence through the inventory service
//! - Tax invoice document export

pub mod api;
pub mod config;
pub mod desk;
pub mod domain;
pub mod services;

use thiserror::Error;

pub use config::AppConfig;
pub use desk::InvoiceDesk;
pub use domain::aggregates::{
    Cart, CartError, CartLine, CartOperation, Catalog, CatalogEntry, Customer, Invoice, InvoiceError,
    InvoiceSession, InvoiceTotals,
};
pub use domain::value_objects::{CatalogId, InvoiceNumber, Money, TaxRate};
pub use services::{DocumentExporter, InventoryService, NewCatalogItem, ServiceError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum InvoicingError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    InvalidItem(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InvoicingError>;
