//! Battle client settings loaded from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `AVENGERS_ACCOUNT` | unset (no local identity) |
//! | `AVENGERS_CONTRACT_ADDRESS` | deployed `NftGame` contract |
//! | `AVENGERS_MARKETPLACE_URL` | testnet marketplace asset URL |
//! | `AVENGERS_NOTIFICATION_WINDOW_MS` | 5000 |
//! | `AVENGERS_HIT_RESET_MS` | 2000 |
//! | `AVENGERS_PENDING_TIMEOUT_MS` | unset (pending attacks never time out) |
//!
//! Values that fail to parse fall back to the default with a warning.

use std::time::Duration;

use avengers_domain::{AccountAddress, TokenId};

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x8985F2dd2b076a67908eDFA9B4c9Dbe74A28F4ab";
pub const DEFAULT_MARKETPLACE_URL: &str = "https://testnets.opensea.io/assets";
pub const DEFAULT_NOTIFICATION_WINDOW_MS: u64 = 5_000;
pub const DEFAULT_HIT_RESET_MS: u64 = 2_000;

const ACCOUNT_VAR: &str = "AVENGERS_ACCOUNT";
const CONTRACT_ADDRESS_VAR: &str = "AVENGERS_CONTRACT_ADDRESS";
const MARKETPLACE_URL_VAR: &str = "AVENGERS_MARKETPLACE_URL";
const NOTIFICATION_WINDOW_VAR: &str = "AVENGERS_NOTIFICATION_WINDOW_MS";
const HIT_RESET_VAR: &str = "AVENGERS_HIT_RESET_MS";
const PENDING_TIMEOUT_VAR: &str = "AVENGERS_PENDING_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct BattleSettings {
    /// Identity of the local session
    pub account: AccountAddress,
    pub contract_address: String,
    pub marketplace_url: String,
    /// How long a combat notification stays visible
    pub notification_window: Duration,
    /// How long an actor shows `Hit` before returning to `Idle`
    pub hit_reset: Duration,
    /// Revert a `Pending` attack that never gets a confirmation event.
    /// `None` waits indefinitely.
    pub pending_timeout: Option<Duration>,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            account: AccountAddress::unset(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
            notification_window: Duration::from_millis(DEFAULT_NOTIFICATION_WINDOW_MS),
            hit_reset: Duration::from_millis(DEFAULT_HIT_RESET_MS),
            pending_timeout: None,
        }
    }
}

impl BattleSettings {
    /// Settings for `account` with every other value at its default.
    pub fn for_account(account: AccountAddress) -> Self {
        Self {
            account,
            ..Self::default()
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            account: non_empty(ACCOUNT_VAR)
                .map(AccountAddress::new)
                .unwrap_or(defaults.account),
            contract_address: non_empty(CONTRACT_ADDRESS_VAR)
                .unwrap_or(defaults.contract_address),
            marketplace_url: non_empty(MARKETPLACE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.marketplace_url),
            notification_window: parse_millis(NOTIFICATION_WINDOW_VAR, non_empty(NOTIFICATION_WINDOW_VAR))
                .unwrap_or(defaults.notification_window),
            hit_reset: parse_millis(HIT_RESET_VAR, non_empty(HIT_RESET_VAR))
                .unwrap_or(defaults.hit_reset),
            pending_timeout: parse_millis(PENDING_TIMEOUT_VAR, non_empty(PENDING_TIMEOUT_VAR)),
        }
    }

    /// Marketplace page for a minted token.
    pub fn token_url(&self, token_id: TokenId) -> String {
        format!(
            "{}/{}/{}",
            self.marketplace_url, self.contract_address, token_id
        )
    }
}

fn parse_millis(key: &str, value: Option<String>) -> Option<Duration> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring invalid duration, using default");
            None
        }
        Ok(ms) => Some(Duration::from_millis(ms)),
    }
}
