//! Core data types: symbols, asset classes and quotes.

use std::fmt;

/// Quote-currency suffixes that mark a symbol as a crypto trading pair.
pub const CRYPTO_SUFFIXES: [&str; 5] = ["USDT", "BTC", "ETH", "BUSD", "USDC"];

/// A normalized ticker identifier (trimmed, uppercase, never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize raw user or file input into a symbol.
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the symbol. Recomputed every call, never cached.
    pub fn asset_class(&self) -> AssetClass {
        AssetClass::of(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which provider a symbol is quoted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Equity,
    Crypto,
}

impl AssetClass {
    /// Pure classification by quote-currency suffix.
    pub fn of(symbol: &str) -> Self {
        if CRYPTO_SUFFIXES.iter().any(|suffix| symbol.ends_with(suffix)) {
            AssetClass::Crypto
        } else {
            AssetClass::Equity
        }
    }

    /// Short label shown next to each watch-list row.
    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Equity => "STOCK",
            AssetClass::Crypto => "CRYPTO",
        }
    }
}

/// Last known price and daily percentage change for a symbol.
///
/// A zero price is the "unavailable" sentinel: no tracked instrument
/// trades at exactly zero, so it doubles as "not loaded yet" and
/// "fetch failed".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quote {
    pub price: f64,
    pub change_percent: f64,
}

impl Quote {
    pub const UNAVAILABLE: Quote = Quote {
        price: 0.0,
        change_percent: 0.0,
    };

    pub fn new(price: f64, change_percent: f64) -> Self {
        Self {
            price,
            change_percent,
        }
    }

    pub fn is_available(&self) -> bool {
        self.price > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(Symbol::new("  btcusdt \n").unwrap().as_str(), "BTCUSDT");
        assert_eq!(Symbol::new("aapl").unwrap().as_str(), "AAPL");
        assert!(Symbol::new("   ").is_none());
        assert!(Symbol::new("").is_none());
    }

    #[test]
    fn test_crypto_suffixes() {
        for symbol in ["BTCUSDT", "ETHBTC", "LINKETH", "BNBBUSD", "SOLUSDC"] {
            assert_eq!(AssetClass::of(symbol), AssetClass::Crypto, "{symbol}");
        }
    }

    #[test]
    fn test_equity_classification() {
        for symbol in ["AAPL", "MSFT", "V", "BTCX", "USDT1"] {
            assert_eq!(AssetClass::of(symbol), AssetClass::Equity, "{symbol}");
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let symbol = Symbol::new("ethusdt").unwrap();
        let first = symbol.asset_class();
        for _ in 0..10 {
            assert_eq!(symbol.asset_class(), first);
        }
        assert_eq!(first, AssetClass::Crypto);
    }

    #[test]
    fn test_sentinel_quote() {
        assert_eq!(Quote::default(), Quote::UNAVAILABLE);
        assert!(!Quote::UNAVAILABLE.is_available());
        assert!(Quote::new(61234.5, -2.31).is_available());
    }
}
