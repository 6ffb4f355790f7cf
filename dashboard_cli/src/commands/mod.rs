//! CLI subcommand implementations.

pub mod auth;
pub mod categories;
pub mod procurement;
pub mod product_actions;
pub mod products;
pub mod rate_limit;

use std::sync::Arc;

use anyhow::{bail, Result};
use dashboard_lib::{ApiConfig, SecureClient, SortConfig, SortDirection};

/// Shared state handed to every subcommand.
pub struct Context {
    pub config: ApiConfig,
    /// Client for the product catalog.
    pub catalog: Arc<SecureClient>,
    /// Client for the procurement service.
    pub procurement: Arc<SecureClient>,
}

/// Parses `field` or `field:asc|desc` into a sort key.
pub fn parse_sort_key(raw: &str) -> Result<SortConfig> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, dir)) => match dir.parse::<SortDirection>() {
            Ok(d) => (field, d),
            Err(()) => bail!("invalid sort direction '{}' (use asc or desc)", dir),
        },
        None => (raw, SortDirection::Asc),
    };
    if field.trim().is_empty() {
        bail!("sort key '{}' has no field name", raw);
    }
    Ok(SortConfig::new(field.trim(), direction))
}
