//! Codec options: which contracts the codec knows about.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bcp_core::types::{Address, TokenTicker};

/// Ticker of the native currency.
pub const ETHER_TICKER: &str = "ETH";
/// Wei per ether, as a power of ten.
pub const ETHER_FRACTIONAL_DIGITS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Options {
    pub contract_address: Address,
    pub decimals: u32,
    pub symbol: TokenTicker,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EthereumCodecOptions {
    /// Contract handling ether atomic swaps. Swap kinds fail without it.
    pub atomic_swap_ether_contract: Option<Address>,
    pub erc20_tokens: BTreeMap<TokenTicker, Erc20Options>,
}

impl EthereumCodecOptions {
    pub fn with_atomic_swap_ether_contract(mut self, contract: Address) -> Self {
        self.atomic_swap_ether_contract = Some(contract);
        self
    }

    pub fn with_erc20(mut self, token: Erc20Options) -> Self {
        self.erc20_tokens.insert(token.symbol.clone(), token);
        self
    }

    /// Token whose contract lives at `contract`, compared case-insensitively.
    pub fn erc20_by_contract(&self, contract: &Address) -> Option<&Erc20Options> {
        self.erc20_tokens
            .values()
            .find(|t| t.contract_address.as_str().eq_ignore_ascii_case(contract.as_str()))
    }

    pub fn is_swap_contract(&self, contract: &Address) -> bool {
        self.atomic_swap_ether_contract
            .as_ref()
            .is_some_and(|c| c.as_str().eq_ignore_ascii_case(contract.as_str()))
    }
}
