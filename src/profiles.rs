//! Built-in watch-list profiles.

use crate::models::Symbol;
use std::fmt;

/// Identifier of a built-in profile, in picker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileId {
    /// No active profile: the watch-list is whatever the user made of it.
    #[default]
    Custom,
    TopCrypto,
    TopStocks,
    TechStocks,
    AllMarkets,
}

impl ProfileId {
    /// Every profile in the order the picker shows them.
    pub const ALL: [ProfileId; 5] = [
        ProfileId::Custom,
        ProfileId::TopCrypto,
        ProfileId::TopStocks,
        ProfileId::TechStocks,
        ProfileId::AllMarkets,
    ];

    /// Profile at a picker position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ProfileId::Custom => "Custom",
            ProfileId::TopCrypto => "Top 10 Crypto",
            ProfileId::TopStocks => "Top 10 Stocks",
            ProfileId::TechStocks => "Tech Stocks",
            ProfileId::AllMarkets => "All Markets",
        }
    }

    /// Raw symbol list. Empty for `Custom`.
    pub fn symbol_names(self) -> &'static [&'static str] {
        match self {
            ProfileId::Custom => &[],
            ProfileId::TopCrypto => &[
                "BTCUSDT", "ETHUSDT", "BNBUSDT", "XRPUSDT", "ADAUSDT", "DOGEUSDT", "SOLUSDT",
                "DOTUSDT", "MATICUSDT", "AVAXUSDT",
            ],
            ProfileId::TopStocks => &[
                "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "V", "JPM", "WMT",
            ],
            ProfileId::TechStocks => &[
                "AAPL", "MSFT", "GOOGL", "META", "NVDA", "AMD", "INTC", "NFLX", "ADBE", "CRM",
            ],
            ProfileId::AllMarkets => &[
                "BTCUSDT", "ETHUSDT", "AAPL", "GOOGL", "MSFT", "TSLA", "NVDA", "BNBUSDT",
                "XRPUSDT", "META",
            ],
        }
    }

    pub fn symbols(self) -> Vec<Symbol> {
        self.symbol_names()
            .iter()
            .filter_map(|s| Symbol::new(s))
            .collect()
    }

    pub fn is_custom(self) -> bool {
        self == ProfileId::Custom
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_five_entries_custom_first() {
        assert_eq!(ProfileId::ALL.len(), 5);
        assert_eq!(ProfileId::from_index(0), Some(ProfileId::Custom));
        assert_eq!(ProfileId::from_index(5), None);
    }

    #[test]
    fn test_custom_profile_is_empty() {
        assert!(ProfileId::Custom.symbols().is_empty());
        assert!(ProfileId::Custom.is_custom());
    }

    #[test]
    fn test_top_crypto_is_all_crypto() {
        let symbols = ProfileId::TopCrypto.symbols();
        assert_eq!(symbols.len(), 10);
        assert!(
            symbols
                .iter()
                .all(|s| s.asset_class() == crate::models::AssetClass::Crypto)
        );
    }

    #[test]
    fn test_profiles_have_unique_symbols() {
        for profile in ProfileId::ALL {
            let symbols = profile.symbols();
            let unique: HashSet<_> = symbols.iter().collect();
            assert_eq!(unique.len(), symbols.len(), "{profile}");
        }
    }
}
