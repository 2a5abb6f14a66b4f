//! Architecture contract tests.

mod support;

use support::architecture::SourceTree;

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = SourceTree::load().lines_matching(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "alloy_provider",
            "alloy_contract",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn application_depends_on_ports_not_adapters() {
    let hits = SourceTree::load().lines_matching(
        "src/application",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "alloy_provider",
            "alloy_contract",
        ],
    );

    assert!(
        hits.is_empty(),
        "found adapter imports in application layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = SourceTree::load().lines_matching(
        "src/port",
        &["crate::adapter", "crate::application", "crate::infrastructure"],
    );

    assert!(hits.is_empty(), "found outer layer imports in ports: {hits:#?}");
}

#[test]
fn contract_bindings_stay_inside_the_chain_adapter() {
    let hits: Vec<_> = SourceTree::load()
        .lines_matching("src", &["sol!"])
        .into_iter()
        .filter(|hit| !hit.path.starts_with("src/adapter/outbound/chain/"))
        .collect();

    assert!(
        hits.is_empty(),
        "contract bindings defined outside the chain adapter: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = SourceTree::load().non_export_mod_lines();
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn testkit_is_the_only_in_memory_chain() {
    let tree = SourceTree::load();
    assert!(tree.has_file("src/testkit/chain.rs"));
    let hits = tree.lines_matching("src/adapter", &["MockChain"]);
    assert!(hits.is_empty(), "adapters must not reference the test chain: {hits:#?}");
}
