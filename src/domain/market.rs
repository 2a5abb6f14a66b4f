//! Markets and the collaborator contracts the keeper depends on.

use std::fmt;

use alloy_primitives::Address;
use rust_decimal::Decimal;

use super::id::MarketName;
use crate::error::{KeeperError, Result};

/// One NFT collection traded against the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    name: MarketName,
    collection: Address,
    weight: Decimal,
    option_token: Option<Address>,
}

impl Market {
    /// Create a market description.
    pub fn new(
        name: impl Into<MarketName>,
        collection: Address,
        weight: Decimal,
        option_token: Option<Address>,
    ) -> Self {
        Self {
            name: name.into(),
            collection,
            weight,
            option_token,
        }
    }

    /// Market name.
    #[must_use]
    pub fn name(&self) -> &MarketName {
        &self.name
    }

    /// Collection address, the market's identity on the ledger.
    #[must_use]
    pub const fn collection(&self) -> Address {
        self.collection
    }

    /// Share of vault capital allocated to this market.
    #[must_use]
    pub const fn weight(&self) -> Decimal {
        self.weight
    }

    /// Option-token contract, failing fast if it was never deployed.
    ///
    /// # Errors
    ///
    /// Returns [`KeeperError::CollaboratorNotDeployed`] when missing.
    pub fn option_token(&self) -> Result<Address> {
        self.option_token.ok_or_else(|| {
            KeeperError::CollaboratorNotDeployed {
                collaborator: Collaborator::OptionToken(self.name.clone()),
            }
            .into()
        })
    }
}

/// A contract the keeper needs in order to do its work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Position ledger helper exposing the batched queries and transitions.
    KeeperHelper,
    /// Per-market `{PNL, delta}` cache.
    RiskCache,
    /// Settlement vault; owns the protocol-wide PNL refresh.
    Vault,
    /// Option token of one market; its supply is the market's notional.
    OptionToken(MarketName),
}

impl Collaborator {
    /// Global collaborators are shared by every market, so their absence is a
    /// deployment error that aborts a whole cycle.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        !matches!(self, Self::OptionToken(_))
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeeperHelper => f.write_str("KeeperHelper"),
            Self::RiskCache => f.write_str("AssetRiskCache"),
            Self::Vault => f.write_str("Vault"),
            Self::OptionToken(market) => write!(f, "OptionToken for {market}"),
        }
    }
}

/// Resolved addresses of the global collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    /// Ledger helper contract.
    pub keeper_helper: Option<Address>,
    /// Risk cache contract.
    pub risk_cache: Option<Address>,
    /// Vault contract.
    pub vault: Option<Address>,
}

impl ContractAddresses {
    /// Look up a global collaborator's address.
    ///
    /// # Errors
    ///
    /// Returns [`KeeperError::CollaboratorNotDeployed`] if it is missing.
    /// Option tokens are per market and resolved through [`Market::option_token`].
    pub fn require(&self, collaborator: Collaborator) -> Result<Address> {
        let address = match collaborator {
            Collaborator::KeeperHelper => self.keeper_helper,
            Collaborator::RiskCache => self.risk_cache,
            Collaborator::Vault => self.vault,
            Collaborator::OptionToken(_) => None,
        };
        address.ok_or_else(|| KeeperError::CollaboratorNotDeployed { collaborator }.into())
    }

    /// Check that every global collaborator has an address.
    ///
    /// # Errors
    ///
    /// Returns [`KeeperError::CollaboratorNotDeployed`] for the first gap,
    /// checked in the order helper, risk cache, vault.
    pub fn ensure_deployed(&self) -> Result<()> {
        for collaborator in [
            Collaborator::KeeperHelper,
            Collaborator::RiskCache,
            Collaborator::Vault,
        ] {
            self.require(collaborator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_option_token_fails_fast() {
        let market = Market::new("BAYC", Address::repeat_byte(1), dec!(0.5), None);
        match market.option_token() {
            Err(Error::Keeper(KeeperError::CollaboratorNotDeployed { collaborator })) => {
                assert_eq!(collaborator, Collaborator::OptionToken(MarketName::from("BAYC")));
                assert!(!collaborator.is_global());
            }
            other => panic!("expected CollaboratorNotDeployed, got {other:?}"),
        }
    }

    #[test]
    fn require_returns_configured_address() {
        let addresses = ContractAddresses {
            keeper_helper: Some(Address::repeat_byte(7)),
            ..Default::default()
        };
        assert_eq!(
            addresses.require(Collaborator::KeeperHelper).unwrap(),
            Address::repeat_byte(7)
        );
        assert!(addresses.require(Collaborator::RiskCache).is_err());
    }

    #[test]
    fn ensure_deployed_reports_first_gap() {
        let addresses = ContractAddresses {
            keeper_helper: Some(Address::repeat_byte(1)),
            risk_cache: Some(Address::repeat_byte(2)),
            vault: None,
        };
        match addresses.ensure_deployed() {
            Err(Error::Keeper(KeeperError::CollaboratorNotDeployed { collaborator })) => {
                assert_eq!(collaborator, Collaborator::Vault);
            }
            other => panic!("expected CollaboratorNotDeployed, got {other:?}"),
        }
        assert!(ContractAddresses::default().ensure_deployed().is_err());
    }

    #[test]
    fn collaborator_display_names_contracts() {
        assert_eq!(Collaborator::RiskCache.to_string(), "AssetRiskCache");
        assert_eq!(
            Collaborator::OptionToken(MarketName::from("MAYC")).to_string(),
            "OptionToken for MAYC"
        );
    }
}
