//! Configuration loading and address resolution from files on disk.

use std::fs;
use std::path::Path;

use alloy_primitives::Address;
use rust_decimal_macros::dec;
use surge_keeper::domain::{Collaborator, Materiality};
use surge_keeper::infrastructure::config::deployment::Deployment;
use surge_keeper::infrastructure::config::settings::Config;
use tempfile::TempDir;

const BASE_BOOK: &str = r#"{
    "KeeperHelper": { "sepolia": { "address": "0x1111111111111111111111111111111111111111" } },
    "AssetRiskCache": { "sepolia": { "address": "0x2222222222222222222222222222222222222222" } },
    "Vault": { "sepolia": { "address": "0x3333333333333333333333333333333333333333" } },
    "BAYC": { "sepolia": { "address": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" } },
    "MAYC": { "sepolia": { "address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" } }
}"#;

const MARKET_BOOK: &str = r#"{
    "OptionToken": { "sepolia": { "BAYC": "0xcccccccccccccccccccccccccccccccccccccccc" } }
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path.display().to_string()
}

fn keeper_config(dir: &TempDir) -> String {
    let base = write(dir.path(), "base.json", BASE_BOOK);
    let market = write(dir.path(), "market.json", MARKET_BOOK);
    format!(
        r#"
[network]
name = "sepolia"
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111

[deployment]
base_file = "{base}"
market_file = "{market}"

[[markets]]
name = "BAYC"
weight = 0.6

[[markets]]
name = "MAYC"
weight = 0.4

[risk]
materiality = "relative"
change_scale = 50

[transactions]
confirmations = 2
timeout_secs = 90
max_fee_per_gas = 30000000000
max_priority_fee_per_gas = 1000000000

[schedule]
interval_secs = 60

[logging]
level = "debug"
format = "json"
"#
    )
}

#[test]
fn full_config_loads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "config.toml", &keeper_config(&dir));

    let config = Config::load(&path).unwrap();

    assert_eq!(config.network.chain_id, 11_155_111);
    assert_eq!(config.markets.len(), 2);
    assert_eq!(config.markets[1].weight, dec!(0.4));
    assert_eq!(config.risk.materiality(), Materiality::Relative { scale: 50 });
    assert_eq!(config.schedule.interval().as_secs(), 60);
    assert_eq!(config.logging.level, "debug");

    let policy = config.transactions.policy();
    assert_eq!(policy.confirmations, 2);
    assert_eq!(policy.timeout.as_secs(), 90);
    assert_eq!(policy.max_fee_per_gas, Some(30_000_000_000));
    assert_eq!(policy.max_priority_fee_per_gas, Some(1_000_000_000));
    assert_eq!(policy.gas_limit, None);
}

#[test]
fn address_book_resolves_every_collaborator() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "config.toml", &keeper_config(&dir));
    let config = Config::load(&path).unwrap();

    let deployment = Deployment::resolve(&config).unwrap();

    assert!(deployment.addresses.ensure_deployed().is_ok());
    assert_eq!(
        deployment.addresses.vault,
        Some(Address::repeat_byte(0x33))
    );

    let names: Vec<_> = deployment
        .markets
        .iter()
        .map(|m| m.name().as_str().to_string())
        .collect();
    assert_eq!(names, ["BAYC", "MAYC"]);

    let bayc = &deployment.markets[0];
    assert_eq!(bayc.collection(), Address::repeat_byte(0xbb));
    assert_eq!(bayc.option_token().unwrap(), Address::repeat_byte(0xcc));

    // MAYC has a collection but no option token in the book.
    let err = deployment.markets[1].option_token().unwrap_err();
    assert!(!err.is_fatal_for_cycle());
    assert!(err.to_string().contains("OptionToken for MAYC"));
}

#[test]
fn missing_global_contract_is_reported_by_name() {
    let dir = TempDir::new().unwrap();
    let base = write(
        dir.path(),
        "base.json",
        r#"{ "BAYC": { "sepolia": { "address": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" } } }"#,
    );
    let toml = format!(
        r#"
[network]
name = "sepolia"
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111

[contracts]
keeper_helper = "0x1111111111111111111111111111111111111111"

[deployment]
base_file = "{base}"

[[markets]]
name = "BAYC"
weight = 1.0
"#
    );
    let config = Config::parse_toml(&toml).unwrap();
    let deployment = Deployment::resolve(&config).unwrap();

    let err = deployment.addresses.ensure_deployed().unwrap_err();
    assert!(err.is_fatal_for_cycle());
    assert_eq!(
        err.to_string(),
        format!("{} is not deployed", Collaborator::RiskCache)
    );
}

#[test]
fn unreadable_address_book_fails_resolution() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json").display().to_string();
    let toml = format!(
        r#"
[network]
name = "sepolia"
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111

[deployment]
base_file = "{missing}"
"#
    );
    let config = Config::parse_toml(&toml).unwrap();

    let err = Deployment::resolve(&config).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn missing_config_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn unknown_materiality_is_rejected() {
    let toml = r#"
[network]
name = "sepolia"
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111

[risk]
materiality = "sometimes"
"#;
    let err = Config::parse_toml(toml).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
}
