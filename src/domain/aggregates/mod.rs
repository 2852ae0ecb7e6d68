//! Aggregates module
pub mod catalog;
pub mod cart;
pub mod invoice;
pub mod session;

pub use catalog::{Catalog, CatalogEntry};
pub use cart::{Cart, CartError, CartLine};
pub use invoice::{Customer, Invoice, InvoiceError, InvoiceTotals};
pub use session::{CartOperation, InvoiceSession};
