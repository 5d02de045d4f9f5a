//! Connected wallet account.

use alloy::primitives::Address;
use serde::Serialize;

/// Identity able to authorize transactions for the session.
///
/// Created by a `WalletProvider` on connect and dropped on disconnect.
/// Signing material never lives here; the wallet keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Account {
    address: Address,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}
