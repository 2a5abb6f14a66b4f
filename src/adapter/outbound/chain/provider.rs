//! JSON-RPC provider construction.

use alloy_provider::network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use url::Url;

/// Build a type-erased HTTP provider, signing with `signer` when given.
pub fn connect(rpc_url: Url, signer: Option<PrivateKeySigner>) -> DynProvider {
    match signer {
        Some(signer) => ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased(),
        None => ProviderBuilder::new().connect_http(rpc_url).erased(),
    }
}
