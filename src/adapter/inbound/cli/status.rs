//! Handler for the `status` command.

use std::path::Path;

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::dispatch::load_config;
use super::output;
use crate::domain::fixed::format_wad;
use crate::error::Result;
use crate::infrastructure::bootstrap;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Pending")]
    pending: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Expired")]
    expired: String,
    #[tabled(rename = "Cached PNL")]
    pnl: String,
    #[tabled(rename = "Cached delta")]
    delta: String,
}

/// Print position counts and cached risk for every market. Read only.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    // Reads only, so never ask for a signing key.
    let runtime = bootstrap::build(&config, true)?;

    let mut rows = Vec::new();
    let mut entries = Vec::new();
    for market in &runtime.deployment.markets {
        match runtime.keeper.market_status(market).await {
            Ok(status) => {
                entries.push(json!({
                    "market": market.name().as_str(),
                    "collection": market.collection().to_string(),
                    "pending": status.pending,
                    "active": status.active,
                    "expired": status.expired,
                    "cached_pnl": format_wad(status.cached.pnl),
                    "cached_delta": format_wad(status.cached.delta),
                }));
                rows.push(StatusRow {
                    market: market.name().to_string(),
                    pending: status.pending.to_string(),
                    active: status.active.to_string(),
                    expired: status.expired.to_string(),
                    pnl: format_wad(status.cached.pnl),
                    delta: format_wad(status.cached.delta),
                });
            }
            Err(e) => {
                entries.push(json!({
                    "market": market.name().as_str(),
                    "error": e.to_string(),
                }));
                output::warning(&format!("{}: {e}", market.name()));
                rows.push(StatusRow {
                    market: market.name().to_string(),
                    pending: "?".into(),
                    active: "?".into(),
                    expired: "?".into(),
                    pnl: "?".into(),
                    delta: "?".into(),
                });
            }
        }
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "status",
            "network": config.network.name,
            "markets": entries,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Network", &config.network.name);
    output::field("RPC", output::muted(&config.network.rpc_url));
    if rows.is_empty() {
        output::hint("no markets configured");
    } else {
        output::lines(&Table::new(rows).with(Style::rounded()).to_string());
    }
    Ok(())
}
