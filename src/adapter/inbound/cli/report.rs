//! Rendering of keeper reports for operators.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output;
use crate::application::orchestration::{CycleReport, MarketReport};
use crate::domain::fixed::format_wad;
use crate::domain::{BatchOutcome, TxReceipt};

#[derive(Tabled)]
struct MarketRow {
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Closed")]
    closed: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Activated")]
    activated: String,
    #[tabled(rename = "Stuck")]
    stuck: usize,
}

fn outcome_cell(outcome: &BatchOutcome) -> String {
    if outcome.submitted() == 0 {
        return "-".into();
    }
    format!("{}/{}", outcome.succeeded().len(), outcome.submitted())
}

fn row(report: &MarketReport) -> MarketRow {
    MarketRow {
        market: report.market.to_string(),
        closed: outcome_cell(&report.closed),
        risk: if report.risk.updated() {
            "updated".into()
        } else {
            "unchanged".into()
        },
        activated: outcome_cell(&report.activated),
        stuck: report.failed_positions(),
    }
}

fn outcome_json(outcome: &BatchOutcome) -> serde_json::Value {
    json!({
        "mode": format!("{:?}", outcome.mode()).to_lowercase(),
        "submitted": outcome.submitted(),
        "succeeded": outcome.succeeded().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "failed": outcome
            .failed()
            .iter()
            .map(|(id, reason)| json!({ "id": id.to_string(), "reason": reason }))
            .collect::<Vec<_>>(),
        "transactions": outcome.transactions(),
        "gas_used": outcome.gas_used(),
    })
}

fn market_json(report: &MarketReport) -> serde_json::Value {
    json!({
        "market": report.market.as_str(),
        "closed": outcome_json(&report.closed),
        "risk": {
            "updated": report.risk.updated(),
            "forced": report.risk.forced,
            "cached_pnl": format_wad(report.risk.cached.pnl),
            "cached_delta": format_wad(report.risk.cached.delta),
            "pnl": format_wad(report.risk.computed.pnl),
            "delta": format_wad(report.risk.computed.delta),
        },
        "activated": outcome_json(&report.activated),
    })
}

fn receipt_json(receipt: &TxReceipt) -> serde_json::Value {
    json!({
        "tx_hash": receipt.tx_hash.to_string(),
        "gas_used": receipt.gas_used,
        "block": receipt.block_number,
    })
}

fn print_failures(market: &str, outcome: &BatchOutcome) {
    for (id, reason) in outcome.failed() {
        output::warning(&format!("{market} position {id}: {reason}"));
    }
}

/// Print a single market's report.
pub fn print_market(report: &MarketReport) {
    if output::is_json() {
        output::json_output(json!({ "command": "cycle", "market": market_json(report) }));
        return;
    }

    output::section(&format!("Market {}", report.market));
    output::lines(&Table::new([row(report)]).with(Style::rounded()).to_string());
    print_failures(report.market.as_str(), &report.closed);
    print_failures(report.market.as_str(), &report.activated);
}

/// Print a fleet cycle report.
pub fn print_cycle(report: &CycleReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "cycle",
            "started_at": report.started_at.to_rfc3339(),
            "finished_at": report.finished_at.map(|t| t.to_rfc3339()),
            "markets": report.markets.iter().map(market_json).collect::<Vec<_>>(),
            "failures": report
                .failures
                .iter()
                .map(|f| json!({ "market": f.market.as_str(), "reason": f.reason }))
                .collect::<Vec<_>>(),
            "global_refresh": report.global_refresh.as_ref().map(receipt_json),
            "gas_used": report.gas_used(),
        }));
        return;
    }

    output::section("Cycle");
    if !report.markets.is_empty() {
        let rows: Vec<MarketRow> = report.markets.iter().map(row).collect();
        output::lines(&Table::new(rows).with(Style::rounded()).to_string());
    }
    for market in &report.markets {
        print_failures(market.market.as_str(), &market.closed);
        print_failures(market.market.as_str(), &market.activated);
    }
    for failure in &report.failures {
        output::warning(&format!("{} skipped: {}", failure.market, failure.reason));
    }

    output::field("Closed", output::positive(report.positions_closed()));
    output::field("Activated", output::positive(report.positions_activated()));
    output::field("Risk updates", report.risk_updates());
    output::field(
        "PNL refresh",
        report
            .global_refresh
            .map_or_else(|| output::muted("not needed"), |r| output::highlight(r.tx_hash)),
    );
    output::field("Gas used", report.gas_used());

    if report.is_clean() {
        output::success("Cycle complete");
    } else {
        output::warning(&format!(
            "Cycle complete with {} stuck positions and {} failed markets",
            output::negative(report.failed_positions()),
            report.failures.len()
        ));
    }
}

/// Print the result of a direct batch operation.
pub fn print_outcome(command: &str, market: &str, outcome: &BatchOutcome) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "market": market,
            "outcome": outcome_json(outcome),
        }));
        return;
    }

    output::field("Market", market);
    output::field("Result", outcome);
    print_failures(market, outcome);
    if outcome.has_failures() {
        output::hint("rerun with the failed ids after checking their ledger state");
    } else {
        output::success("Done");
    }
}

/// Print a single confirmed write.
pub fn print_receipt(command: &str, market: &str, receipt: &TxReceipt) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "market": market,
            "receipt": receipt_json(receipt),
        }));
        return;
    }

    output::field("Market", market);
    output::field("Tx hash", output::highlight(receipt.tx_hash));
    output::field("Gas used", receipt.gas_used);
    output::success("Done");
}
