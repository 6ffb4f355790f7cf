use anyhow::Result;
use chrono::Local;

use super::Context;
use crate::output::{print_key_values, OutputFormat};

/// Shows the local request budget of this client.
pub fn run(ctx: &Context, format: &OutputFormat) -> Result<()> {
    let client = &ctx.catalog;
    let mut pairs = vec![
        ("Client ID", client.client_id()?),
        ("Enabled", ctx.config.enable_rate_limit.to_string()),
    ];

    if let Some(limiter) = client.rate_limiter() {
        let remaining = client.remaining_requests()?.unwrap_or(limiter.max_requests());
        let reset = client.rate_limit_reset()?;
        let resets_in = reset
            .map(|d| format!("{}s", d.as_secs()))
            .unwrap_or_else(|| "-".to_string());
        let resets_at = reset
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| (Local::now() + d).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let stats = limiter.stats();
        pairs.extend([
            ("Window", format!("{}s", limiter.window().as_secs())),
            ("Limit", limiter.max_requests().to_string()),
            ("Remaining", remaining.to_string()),
            ("Resets In", resets_in),
            ("Resets At", resets_at),
            ("Tracked Clients", limiter.tracked_clients().to_string()),
            ("Allowed", stats.allowed.to_string()),
            ("Rejected", stats.rejected.to_string()),
        ]);
    }

    print_key_values(&pairs, *format)
}
