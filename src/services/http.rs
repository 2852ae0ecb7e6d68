//! HTTP client for the inventory service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{CatalogEntry, Customer, Invoice};
use crate::domain::value_objects::{CatalogId, InvoiceNumber, Money};
use crate::services::{InventoryService, NewCatalogItem, ServiceError};

pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct CreatedItem {
    item: CatalogEntry,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoicePayload<'a> {
    customer: &'a Customer,
    items: Vec<InvoiceItemPayload<'a>>,
    invoice_number: InvoiceNumber,
}

#[derive(Serialize)]
struct InvoiceItemPayload<'a> {
    id: CatalogId,
    name: &'a str,
    price: Money,
    quantity: u32,
    total: Money,
}

impl HttpInventoryClient {
    /// Without a timeout a hung request waits forever.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Pull the server's `{ "error": ... }` message out of a failed response.
async fn error_message(response: Response, fallback: &str) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(message) }) if !message.is_empty() => message,
        _ => fallback.to_string(),
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ServiceError> {
        let url = self.url("/api/grocery-items");
        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to send GET request to {}: {}", url, e);
            ServiceError::Fetch(e.to_string())
        })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "catalog fetch rejected");
            return Err(ServiceError::Fetch(format!("status {}", response.status())));
        }

        let entries = response
            .json::<Vec<CatalogEntry>>()
            .await
            .map_err(|e| ServiceError::Fetch(e.to_string()))?;
        tracing::debug!(entries = entries.len(), "catalog fetched");
        Ok(entries)
    }

    async fn create_catalog_entry(&self, item: &NewCatalogItem) -> Result<CatalogEntry, ServiceError> {
        let url = self.url("/api/add-grocery-items-in-store");
        let response = self.client.post(&url).json(item).send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            ServiceError::Create(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::Create(error_message(response, "Failed to add grocery item").await));
        }

        let created = response
            .json::<CreatedItem>()
            .await
            .map_err(|e| ServiceError::Create(e.to_string()))?;
        Ok(created.item)
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), ServiceError> {
        let url = self.url("/api/invoices");
        let payload = InvoicePayload {
            customer: invoice.customer(),
            items: invoice
                .lines()
                .iter()
                .map(|line| InvoiceItemPayload {
                    id: line.catalog_id,
                    name: &line.name,
                    price: line.unit_price,
                    quantity: line.quantity,
                    total: line.line_total(),
                })
                .collect(),
            invoice_number: invoice.invoice_number(),
        };

        let response = self.client.post(&url).json(&payload).send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            ServiceError::Create(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::Create(error_message(response, "Failed to create invoice").await));
        }
        Ok(())
    }
}
