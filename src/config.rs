//! Environment configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{InvoicingError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub inventory_url: String,
    pub port: u16,
    pub invoice_dir: PathBuf,
    pub store_name: String,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inventory_url: "http://localhost:5000".to_string(),
            port: 8084,
            invoice_dir: PathBuf::from("invoices"),
            store_name: "FreshMart Grocery".to_string(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// Read `INVENTORY_URL`, `PORT`, `INVOICE_DIR`, `STORE_NAME` and `REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            inventory_url: lookup("INVENTORY_URL").unwrap_or(defaults.inventory_url),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            invoice_dir: lookup("INVOICE_DIR").map(PathBuf::from).unwrap_or(defaults.invoice_dir),
            store_name: lookup("STORE_NAME").unwrap_or(defaults.store_name),
            request_timeout: parse::<u64, _>(&lookup, "REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs),
        })
    }
}

fn parse<T: FromStr, F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> Result<Option<T>> {
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().map_err(|_| InvoicingError::Config(format!("{key} must be a number, got {raw:?}"))))
        .transpose()
}
